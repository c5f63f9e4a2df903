//! 模块注册表和发现系统
//!
//! 保存所有已发现模块的描述符，与激活状态无关；支持注册、按 id 查找和磁盘发现

use super::core::ModuleDescriptor;
use super::metadata::ExportManifest;
use crate::types::eq_ignore_case;
use crate::Result;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 模块子目录中识别的清单文件名，按优先级排列
pub const MANIFEST_FILE_NAMES: &[&str] = &["manifest.yaml", "manifest.yml", "manifest.json"];

/// 模块注册表
#[derive(Default)]
pub struct ModuleRegistry {
    /// 按注册顺序保存的描述符
    modules: RwLock<Vec<Arc<ModuleDescriptor>>>,
}

impl ModuleRegistry {
    /// 创建新的模块注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册模块；同名（不区分大小写）已存在时忽略，先注册者生效
    pub fn register(&self, descriptor: ModuleDescriptor) -> bool {
        let mut modules = self.modules.write();
        if modules.iter().any(|m| eq_ignore_case(&m.id, &descriptor.id)) {
            debug!("Module '{}' already registered, ignoring", descriptor.id);
            return false;
        }

        info!("Module '{}' registered", descriptor.id);
        modules.push(Arc::new(descriptor));
        true
    }

    /// 按模块自报名称查找
    pub fn find(&self, module_id: &str) -> Option<Arc<ModuleDescriptor>> {
        self.modules
            .read()
            .iter()
            .find(|m| eq_ignore_case(&m.id, module_id))
            .cloned()
    }

    /// 全部描述符，按注册顺序
    pub fn list_all(&self) -> Vec<Arc<ModuleDescriptor>> {
        self.modules.read().clone()
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// 扫描模块根目录下的每个子目录，读取其中的清单
    ///
    /// 子目录按名称排序，保证发现顺序稳定。无法解析的清单跳过并记录警告。
    pub async fn discover<P: AsRef<Path>>(root: P) -> Result<Vec<ModuleDescriptor>> {
        let root = root.as_ref();
        let mut directories = Vec::new();

        let mut entries = tokio::fs::read_dir(root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                directories.push(entry.path());
            }
        }
        directories.sort();

        let mut discovered = Vec::new();
        for directory in directories {
            let Some(manifest_path) = find_manifest(&directory).await else {
                continue;
            };
            let fallback = directory
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string);

            let descriptor = match ExportManifest::load(&manifest_path).await {
                Ok(manifest) => {
                    ModuleDescriptor::from_manifest(manifest, &manifest_path, fallback.as_deref())
                }
                Err(e) => Err(e),
            };

            match descriptor {
                Ok(descriptor) => discovered.push(descriptor),
                Err(e) => warn!("Skipping module manifest {:?}: {}", manifest_path, e),
            }
        }

        info!("Discovered {} modules under {:?}", discovered.len(), root);
        Ok(discovered)
    }
}

async fn find_manifest(directory: &Path) -> Option<PathBuf> {
    for name in MANIFEST_FILE_NAMES {
        let candidate = directory.join(name);
        if tokio::fs::metadata(&candidate)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            return Some(candidate);
        }
    }
    None
}
