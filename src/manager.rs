//! 模块管理器
//!
//! 持有目录存储、模块注册表、单元解析器和当前可见的导出树。
//! 宿主创建一个实例并以 `Arc<ModuleManager>` 在各协作方之间共享。

use crate::config::ShellConfig;
use crate::core::catalog::CatalogStore;
use crate::plugins::core::{ActivationQuery, LoadedUnit, ModuleDescriptor};
use crate::plugins::dynamic_loader::{ResolveRequest, UnitResolver};
use crate::plugins::export_tree::{build_export_tree, ExportNode};
use crate::plugins::metadata::ExportManifest;
use crate::plugins::registry::ModuleRegistry;
use crate::types::ModuleStatus;
use crate::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// 模块管理器
pub struct ModuleManager {
    config: ShellConfig,
    catalog: CatalogStore,
    registry: ModuleRegistry,
    resolver: UnitResolver,
    /// 当前可见的导出树，构建成功后整体替换
    export_tree: RwLock<Arc<ExportNode>>,
    /// 串行化所有修改目录和重建导出树的路径
    rebuild_lock: Mutex<()>,
}

impl ModuleManager {
    pub fn new(config: ShellConfig) -> Self {
        let catalog = CatalogStore::new(config.catalog_path(), config.catalog_wait.clone());
        Self {
            config,
            catalog,
            registry: ModuleRegistry::new(),
            resolver: UnitResolver::new(),
            export_tree: RwLock::new(Arc::new(ExportNode::root())),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &UnitResolver {
        &self.resolver
    }

    /// 注册模块描述符，返回是否新增
    pub fn register(&self, descriptor: ModuleDescriptor) -> bool {
        self.registry.register(descriptor)
    }

    pub fn find(&self, module_id: &str) -> Option<Arc<ModuleDescriptor>> {
        self.registry.find(module_id)
    }

    /// 模块在目录中是否为 Active
    pub fn is_active(&self, module_id: &str) -> bool {
        self.catalog.is_active(module_id)
    }

    /// 当前导出树的快照
    pub fn export_tree(&self) -> Arc<ExportNode> {
        self.export_tree.read().clone()
    }

    /// 扫描模块根目录并注册发现的模块，返回新注册的数量
    pub async fn discover_modules(&self) -> Result<usize> {
        let discovered = ModuleRegistry::discover(&self.config.modules_root).await?;
        let mut added = 0;
        for descriptor in discovered {
            if self.registry.register(descriptor) {
                added += 1;
            }
        }
        info!("Registered {} discovered modules", added);
        Ok(added)
    }

    /// 只重新读取目录文件
    pub async fn load_catalog(&self) -> Result<()> {
        let _guard = self.rebuild_lock.lock().await;
        self.catalog.load().await
    }

    /// 用当前目录快照重建导出树
    pub async fn rebuild_export_tree(&self) -> Result<Arc<ExportNode>> {
        let _guard = self.rebuild_lock.lock().await;
        self.rebuild_locked().await
    }

    /// 重新读取目录文件并重建导出树，监控器和启动流程都走这里
    pub async fn reload_and_rebuild(&self) -> Result<Arc<ExportNode>> {
        let _guard = self.rebuild_lock.lock().await;
        self.catalog.load().await?;
        self.rebuild_locked().await
    }

    /// 解析代码单元
    pub fn resolve(&self, request: &ResolveRequest) -> Result<LoadedUnit> {
        self.resolver.resolve(request, &self.registry, &self.catalog)
    }

    /// 缓存已加载单元，名称已存在时不覆盖
    pub fn cache_unit(&self, name: &str, unit: LoadedUnit) -> bool {
        self.resolver.cache_unit(name, unit)
    }

    pub(crate) async fn lock_rebuild(&self) -> MutexGuard<'_, ()> {
        self.rebuild_lock.lock().await
    }

    /// 调用方必须持有 `rebuild_lock`
    pub(crate) async fn rebuild_locked(&self) -> Result<Arc<ExportNode>> {
        let shell = ExportManifest::load(&self.config.shell_manifest).await?;
        let catalog = self.catalog.snapshot();
        let tree = Arc::new(build_export_tree(&shell, &catalog, &self.registry)?);

        *self.export_tree.write() = tree.clone();
        info!("Export tree rebuilt with {} nodes", tree.node_count());
        debug!("Active modules: {:?}", catalog.ids_with_status(ModuleStatus::Active));
        Ok(tree)
    }
}

impl ActivationQuery for ModuleManager {
    fn is_active(&self, module_id: &str) -> bool {
        self.catalog.is_active(module_id)
    }
}
