//! 模块生命周期控制
//!
//! 负责模块的启用、禁用、刷新以及入口对象的启动和关闭。
//! 状态迁移：Pending → Inactive → Active，Active ↔ Inactive；
//! Pending 只能由外部安装程序改写目录文件离开。

use crate::manager::ModuleManager;
use crate::types::{ModuleId, ModuleStatus};
use crate::Result;
use tracing::{debug, info, warn};

impl ModuleManager {
    /// 启用模块
    ///
    /// `persist` 为 true 时写回目录文件。目录中没有记录或未注册的模块直接忽略。
    pub async fn enable(&self, module_id: &str, persist: bool) -> Result<()> {
        self.transition(module_id, ModuleStatus::Active, persist).await
    }

    /// 禁用模块
    pub async fn disable(&self, module_id: &str, persist: bool) -> Result<()> {
        self.transition(module_id, ModuleStatus::Inactive, persist).await
    }

    /// 入口对象的回调在持有重建锁时执行，回调中不能再调用启用/禁用
    async fn transition(&self, module_id: &str, target: ModuleStatus, persist: bool) -> Result<()> {
        let _guard = self.lock_rebuild().await;

        let Some(record) = self.catalog().record(module_id) else {
            debug!("Module '{}' has no catalog record, ignoring {}", module_id, target);
            return Ok(());
        };
        let Some(descriptor) = self.find(module_id) else {
            debug!("Module '{}' is not registered, ignoring {}", module_id, target);
            return Ok(());
        };
        if record.status == ModuleStatus::Pending {
            warn!("Module '{}' is pending installation, refusing to set {}", module_id, target);
            return Ok(());
        }

        self.catalog().set_status(module_id, target);
        let hook = match target {
            ModuleStatus::Active => descriptor.plugin.on_enabled().await,
            _ => descriptor.plugin.on_disabled().await,
        };
        if let Err(e) = hook {
            self.catalog().set_status(module_id, record.status);
            return Err(e);
        }

        if persist {
            if let Err(e) = self.catalog().save().await {
                self.catalog().set_status(module_id, record.status);
                return Err(e);
            }
        }
        info!("Module '{}' is now {}", record.id, target);

        self.rebuild_locked().await?;
        Ok(())
    }

    /// 刷新全部模块
    ///
    /// 先记下当前 Active 的模块，把所有已注册模块置为 Inactive，再恢复记下的
    /// 模块，最后重建一次导出树。不写回目录文件。
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.lock_rebuild().await;
        let active = self.catalog().snapshot().ids_with_status(ModuleStatus::Active);

        for descriptor in self.registry().list_all() {
            match self.catalog().record(&descriptor.id) {
                Some(record) if record.status != ModuleStatus::Pending => {}
                _ => continue,
            }
            self.catalog().set_status(&descriptor.id, ModuleStatus::Inactive);
            if let Err(e) = descriptor.plugin.on_disabled().await {
                warn!("Module '{}' failed to disable during refresh: {}", descriptor.id, e);
            }
        }

        for module_id in &active {
            let Some(descriptor) = self.find(module_id) else {
                continue;
            };
            self.catalog().set_status(module_id, ModuleStatus::Active);
            if let Err(e) = descriptor.plugin.on_enabled().await {
                warn!("Module '{}' failed to enable during refresh: {}", module_id, e);
            }
        }

        info!("Refreshed {} active modules", active.len());
        self.rebuild_locked().await?;
        Ok(())
    }

    /// 目录中是否有等待安装的模块
    pub fn has_pending_installation(&self) -> bool {
        !self.list_pending().is_empty()
    }

    pub fn list_pending(&self) -> Vec<ModuleId> {
        self.catalog().snapshot().ids_with_status(ModuleStatus::Pending)
    }

    /// 按注册顺序启动所有模块，遇到第一个失败即返回
    pub async fn start_all(&self) -> Result<()> {
        for descriptor in self.registry().list_all() {
            descriptor.plugin.start().await?;
            debug!("Module '{}' started", descriptor.id);
        }
        info!("All modules started");
        Ok(())
    }

    /// 按注册顺序关闭所有模块；单个失败不影响其它模块，最后返回第一个错误
    pub async fn shutdown_all(&self) -> Result<()> {
        let mut first_error = None;
        for descriptor in self.registry().list_all() {
            if let Err(e) = descriptor.plugin.shutdown().await {
                warn!("Module '{}' failed to shut down: {}", descriptor.id, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("All modules stopped");
                Ok(())
            }
        }
    }
}
