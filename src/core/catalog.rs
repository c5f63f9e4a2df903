//! 模块目录存储
//!
//! 目录文件记录每个模块的 id、排序值和激活状态。外部安装程序或管理员
//! 可以直接编辑该文件，存储层负责读入内存快照并在状态变更时写回。

use crate::config::CatalogWaitConfig;
use crate::types::{eq_ignore_case, ModuleId, ModuleStatus};
use crate::{PluginShellError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// 目录中的单条模块记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub order: i64,
    pub status: ModuleStatus,
}

impl ModuleRecord {
    pub fn new(id: &str, order: i64, status: ModuleStatus) -> Self {
        Self {
            id: id.to_string(),
            order,
            status,
        }
    }
}

/// 模块目录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
}

impl Catalog {
    pub fn new(modules: Vec<ModuleRecord>) -> Self {
        Self { modules }
    }

    /// 解析目录文本
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| PluginShellError::parse(path, e))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PluginShellError::configuration(&format!("Failed to serialize catalog: {}", e)))
    }

    /// 按 id 查找记录（不区分大小写）
    pub fn record(&self, module_id: &str) -> Option<&ModuleRecord> {
        self.modules.iter().find(|m| eq_ignore_case(&m.id, module_id))
    }

    fn record_mut(&mut self, module_id: &str) -> Option<&mut ModuleRecord> {
        self.modules.iter_mut().find(|m| eq_ignore_case(&m.id, module_id))
    }

    pub fn is_active(&self, module_id: &str) -> bool {
        self.record(module_id)
            .map(|m| m.status == ModuleStatus::Active)
            .unwrap_or(false)
    }

    /// 按 order 升序排列的记录，order 相同保持文件中的顺序
    pub fn ordered(&self) -> Vec<&ModuleRecord> {
        let mut records: Vec<&ModuleRecord> = self.modules.iter().collect();
        records.sort_by_key(|m| m.order);
        records
    }

    pub fn ids_with_status(&self, status: ModuleStatus) -> Vec<ModuleId> {
        self.modules
            .iter()
            .filter(|m| m.status == status)
            .map(|m| m.id.clone())
            .collect()
    }
}

/// 目录存储
pub struct CatalogStore {
    /// 目录文件路径
    path: PathBuf,
    /// 文件等待策略
    wait: CatalogWaitConfig,
    /// 内存快照
    catalog: RwLock<Catalog>,
    /// 正在进行的自身写入数量，非零时监控器忽略事件
    suspended_writes: AtomicUsize,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>, wait: CatalogWaitConfig) -> Self {
        Self {
            path: path.into(),
            wait,
            catalog: RwLock::new(Catalog::default()),
            suspended_writes: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取目录文件，替换内存快照
    pub async fn load(&self) -> Result<()> {
        let content = self.wait_and_read().await?;
        let catalog = Catalog::parse(&self.path, &content)?;
        debug!("Loaded catalog {:?} with {} modules", self.path, catalog.modules.len());
        *self.catalog.write() = catalog;
        Ok(())
    }

    /// 将内存快照写回目录文件
    pub async fn save(&self) -> Result<()> {
        let content = self.catalog.read().to_yaml()?;
        let _suspension = self.suspend_watch();
        tokio::fs::write(&self.path, content).await?;
        info!("Catalog saved to {:?}", self.path);
        Ok(())
    }

    pub fn is_active(&self, module_id: &str) -> bool {
        self.catalog.read().is_active(module_id)
    }

    pub fn snapshot(&self) -> Catalog {
        self.catalog.read().clone()
    }

    pub fn record(&self, module_id: &str) -> Option<ModuleRecord> {
        self.catalog.read().record(module_id).cloned()
    }

    /// 按 order 排列的模块 id
    pub fn ordered_ids(&self) -> Vec<ModuleId> {
        self.catalog
            .read()
            .ordered()
            .into_iter()
            .map(|m| m.id.clone())
            .collect()
    }

    /// 修改内存中的状态；记录不存在时返回 false
    pub fn set_status(&self, module_id: &str, status: ModuleStatus) -> bool {
        let mut catalog = self.catalog.write();
        match catalog.record_mut(module_id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    /// 直接替换内存快照，不写文件
    pub fn replace(&self, catalog: Catalog) {
        *self.catalog.write() = catalog;
    }

    pub fn is_watch_suspended(&self) -> bool {
        self.suspended_writes.load(Ordering::SeqCst) > 0
    }

    fn suspend_watch(&self) -> WatchSuspension<'_> {
        self.suspended_writes.fetch_add(1, Ordering::SeqCst);
        WatchSuspension { store: self }
    }

    async fn wait_and_read(&self) -> Result<String> {
        let attempts = self.wait.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match tokio::fs::read_to_string(&self.path).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    debug!(
                        "Catalog {:?} not readable (attempt {}/{}): {}",
                        self.path, attempt, attempts, e
                    );
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.wait.retry_interval()).await;
                    }
                }
            }
        }

        match last_error {
            Some(e) if e.kind() != std::io::ErrorKind::NotFound => Err(PluginShellError::Io(e)),
            _ => Err(PluginShellError::CatalogUnavailable {
                path: self.path.clone(),
                attempts,
            }),
        }
    }
}

/// 自身写入期间暂停监控
struct WatchSuspension<'a> {
    store: &'a CatalogStore,
}

impl Drop for WatchSuspension<'_> {
    fn drop(&mut self) {
        self.store.suspended_writes.fetch_sub(1, Ordering::SeqCst);
    }
}
