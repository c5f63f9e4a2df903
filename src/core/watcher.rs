//! 目录文件监控器
//!
//! 监控模块根目录（非递归），只关心目录文件本身的创建、修改、删除和重命名。
//! 事件经 tokio 通道交给后台任务，由后台任务调用管理器的统一重建入口。

use crate::manager::ModuleManager;
use crate::Result;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 目录文件变化类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogChange {
    Created,
    Modified,
    Removed,
    Renamed,
}

impl CatalogChange {
    /// 将 notify 事件归类，访问类事件返回 None
    pub fn classify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Renamed),
            EventKind::Modify(_) => Some(Self::Modified),
            EventKind::Remove(_) => Some(Self::Removed),
            _ => None,
        }
    }
}

/// 目录文件监控器句柄
pub struct CatalogWatcher {
    watcher: Option<RecommendedWatcher>,
    task: Option<JoinHandle<()>>,
}

impl CatalogWatcher {
    /// 开始监控，必须在 tokio 运行时中调用
    pub fn spawn(manager: Arc<ModuleManager>) -> Result<Self> {
        let root = manager.config().modules_root.clone();
        let file_name = OsString::from(&manager.config().catalog_file_name);
        let (tx, mut rx) = mpsc::unbounded_channel::<CatalogChange>();

        let filter_manager = manager.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    error!("Catalog watcher error: {}", e);
                    return;
                }
            };

            let touches_catalog = event
                .paths
                .iter()
                .any(|path| path.file_name() == Some(file_name.as_os_str()));
            if !touches_catalog {
                return;
            }
            let Some(change) = CatalogChange::classify(&event.kind) else {
                return;
            };
            if filter_manager.catalog().is_watch_suspended() {
                debug!("Ignoring {:?} during catalog save", change);
                return;
            }
            // 接收端已关闭说明监控正在停止
            let _ = tx.send(change);
        })?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;
        info!("Watching catalog {:?}", manager.config().catalog_path());

        let task = tokio::spawn(async move {
            while let Some(change) = rx.recv().await {
                debug!("Catalog change detected: {:?}", change);
                if let Err(e) = manager.reload_and_rebuild().await {
                    error!("Failed to rebuild export tree after catalog change: {}", e);
                }
            }
        });

        Ok(Self {
            watcher: Some(watcher),
            task: Some(task),
        })
    }

    /// 停止监控并结束后台任务
    pub fn stop(&mut self) {
        self.watcher.take();
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Catalog watcher stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl Drop for CatalogWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
