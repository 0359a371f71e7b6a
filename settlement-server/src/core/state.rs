use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::{DbService, SurrealLedgerStore};
use crate::ledger::{LedgerStore, MemoryLedgerStore};
use crate::notify::ChannelNotifier;
use crate::settlement::SettlementOrchestrator;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是结算引擎的核心数据结构。使用 Arc 实现浅拷贝，
/// 所有依赖通过构造函数显式注入，没有任何模块级单例。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Option<Surreal<Db>> | 嵌入式数据库 (内存模式下为空) |
/// | ledger | Arc<dyn LedgerStore> | 账本存储 |
/// | notifier | Arc<ChannelNotifier> | 通知总线 |
/// | orchestrator | Arc<SettlementOrchestrator> | 结算编排器 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Option<Surreal<Db>>,
    /// 账本存储
    pub ledger: Arc<dyn LedgerStore>,
    /// 通知总线
    pub notifier: Arc<ChannelNotifier>,
    /// 结算编排器
    pub orchestrator: Arc<SettlementOrchestrator>,
}

impl ServerState {
    /// 初始化服务器状态 (磁盘数据库)
    pub async fn initialize(config: &Config) -> crate::core::Result<Self> {
        let db_service = DbService::new(&config.work_dir)
            .await
            .map_err(|e| crate::core::ServerError::Database(e.to_string()))?;
        let ledger: Arc<dyn LedgerStore> =
            Arc::new(SurrealLedgerStore::new(db_service.db.clone()));
        Ok(Self::assemble(config.clone(), Some(db_service.db), ledger))
    }

    /// 内存模式 - 测试与本地开发
    pub fn in_memory(config: Config) -> Self {
        let ledger: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
        Self::assemble(config, None, ledger)
    }

    fn assemble(config: Config, db: Option<Surreal<Db>>, ledger: Arc<dyn LedgerStore>) -> Self {
        let notifier = Arc::new(ChannelNotifier::new());
        let orchestrator = Arc::new(SettlementOrchestrator::new(
            ledger.clone(),
            notifier.clone(),
            config.escrow_expiry_days,
        ));
        Self {
            config,
            db,
            ledger,
            notifier,
            orchestrator,
        }
    }
}
