/// 服务器配置 - 结算引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/mandi/settlement | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ESCROW_EXPIRY_DAYS | 30 | 托管账户过期天数 (创建后) |
/// | LEADERBOARD_LIMIT | 50 | 排行榜默认条数 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/mandi HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 托管账户过期天数 (固定策略: created_at + N 天)
    pub escrow_expiry_days: i64,
    /// 排行榜默认条数
    pub leaderboard_limit: usize,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/mandi/settlement".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            escrow_expiry_days: std::env::var("ESCROW_EXPIRY_DAYS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            leaderboard_limit: std::env::var("LEADERBOARD_LIMIT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(50),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
