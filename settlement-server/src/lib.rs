//! Mandi Settlement Server - B2B 采购市场的托管结算与信誉评分引擎
//!
//! # 架构概述
//!
//! 本模块是结算引擎的主入口，提供以下核心功能：
//!
//! - **托管状态机** (`escrow`): Pending → Funded → Released/Disputed/Refunded
//! - **结算编排** (`settlement`): 状态转换 + 指标更新 + 通知扇出
//! - **信誉评分** (`trust`): 确定性加权评分，无任何随机性
//! - **徽章与排行榜** (`gamification`): 徽章解锁、积分、等级、排名
//! - **账本存储** (`ledger`, `db`): 条件更新保证并发安全
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! settlement-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── escrow/        # 托管状态机与金额校验
//! ├── settlement/    # 结算编排器 (唯一带副作用的组件)
//! ├── trust/         # 信誉评分引擎 (纯函数)
//! ├── gamification/  # 徽章、积分、排行榜 (纯函数)
//! ├── ledger/        # 账本存储接口 + 内存实现
//! ├── db/            # SurrealDB 仓储层
//! ├── notify/        # 通知总线 (fire-and-forget)
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod escrow;
pub mod gamification;
pub mod ledger;
pub mod notify;
pub mod settlement;
pub mod trust;
pub mod utils;

// Re-export 公共类型
pub use self::core::{Config, Server, ServerState};
pub use escrow::{EscrowError, EscrowResult};
pub use gamification::{BadgeProgress, LeaderboardEntry};
pub use ledger::{LedgerStore, MemoryLedgerStore, SettlementOutcome};
pub use notify::{ChannelNotifier, MemorySink, NotificationSink};
pub use settlement::SettlementOrchestrator;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = std::path::Path::new(&config.work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___                  __
   /  |/  /___ _____  ____/ /
  / /|_/ / __ `/ __ \/ __  /   Settlement Engine
 / /  / / /_/ / / / / /_/ /    escrow · trust · leaderboard
/_/  /_/\__,_/_/ /_/\__,_/
"#
    );
}
