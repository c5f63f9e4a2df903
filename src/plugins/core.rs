//! 模块系统核心特征定义
//!
//! 定义模块入口对象（ModulePlugin）、已加载单元句柄和模块描述符

use super::metadata::ExportManifest;
use crate::types::{ModuleId, TimestampNs};
use crate::{PluginShellError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 模块入口对象 - 每个模块注册时提供
///
/// 方法接收 `&self`，需要可变状态的实现自行使用内部可变性。
#[async_trait]
pub trait ModulePlugin: Send + Sync {
    /// 启动模块
    async fn start(&self) -> Result<()>;

    /// 关闭模块
    async fn shutdown(&self) -> Result<()>;

    /// 模块被启用后回调
    async fn on_enabled(&self) -> Result<()> {
        Ok(())
    }

    /// 模块被禁用后回调
    async fn on_disabled(&self) -> Result<()> {
        Ok(())
    }
}

/// 只有清单、没有运行时行为的模块
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestModule;

#[async_trait]
impl ModulePlugin for ManifestModule {
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// 路由协作方使用的激活状态查询
pub trait ActivationQuery: Send + Sync {
    fn is_active(&self, module_id: &str) -> bool;
}

/// 已加载代码单元的不透明句柄
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadedUnit {
    /// 逻辑名称
    pub name: String,
    /// 物理位置（由宿主加载器给出）
    pub location: Option<PathBuf>,
}

impl LoadedUnit {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: None,
        }
    }

    pub fn at(name: &str, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            location: Some(location.into()),
        }
    }
}

/// 模块描述符
///
/// 发现模块时创建一次，进程生命周期内不会移除。
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// 模块自报名称
    pub id: ModuleId,
    /// 版本号（仅展示）
    pub version: Option<String>,
    /// 导出清单
    pub manifest: ExportManifest,
    /// 入口单元
    pub entry_unit: LoadedUnit,
    /// 入口对象
    pub plugin: Arc<dyn ModulePlugin>,
    /// 清单来源
    pub source: Option<PathBuf>,
    /// 创建时间
    pub registered_at: TimestampNs,
}

impl ModuleDescriptor {
    pub fn new(
        id: &str,
        manifest: ExportManifest,
        entry_unit: LoadedUnit,
        plugin: Arc<dyn ModulePlugin>,
    ) -> Self {
        Self {
            id: id.to_string(),
            version: manifest.version.clone(),
            manifest,
            entry_unit,
            plugin,
            source: None,
            registered_at: chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0),
        }
    }

    /// 仅由清单构成的模块，入口单元与模块同名
    pub fn embedded(id: &str, manifest: ExportManifest) -> Self {
        Self::new(id, manifest, LoadedUnit::named(id), Arc::new(ManifestModule))
    }

    /// 从磁盘清单创建描述符；清单未声明名称时使用 `fallback_id`
    pub fn from_manifest(
        manifest: ExportManifest,
        source: &Path,
        fallback_id: Option<&str>,
    ) -> Result<Self> {
        let id = manifest
            .name
            .clone()
            .or_else(|| fallback_id.map(str::to_string))
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                PluginShellError::configuration(&format!(
                    "module manifest {} does not declare a name",
                    source.display()
                ))
            })?;
        let unit_name = manifest.entry_unit.clone().unwrap_or_else(|| id.clone());
        let unit = match source.parent() {
            Some(dir) => LoadedUnit::at(&unit_name, dir),
            None => LoadedUnit::named(&unit_name),
        };

        let mut descriptor = Self::new(&id, manifest, unit, Arc::new(ManifestModule));
        descriptor.source = Some(source.to_path_buf());
        Ok(descriptor)
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn ModulePlugin>) -> Self {
        self.plugin = plugin;
        self
    }

    pub fn with_entry_unit(mut self, unit: LoadedUnit) -> Self {
        self.entry_unit = unit;
        self
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("entry_unit", &self.entry_unit)
            .field("exports", &self.manifest.exports.len())
            .field("source", &self.source)
            .finish()
    }
}
