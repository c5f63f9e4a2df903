//! 代码单元解析器
//!
//! 宿主加载器无法找到某个代码单元时，按名称在已启用模块的入口单元和
//! 解析缓存中查找对应句柄。

use super::core::LoadedUnit;
use super::registry::ModuleRegistry;
use crate::core::catalog::CatalogStore;
use crate::types::eq_ignore_case;
use crate::{PluginShellError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

/// 解析请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// 请求的单元名称，可能带有加载器修饰（`Foo, Version=1.0`）
    pub name: String,
    /// 发起请求的单元
    pub requesting: Option<LoadedUnit>,
}

impl ResolveRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            requesting: None,
        }
    }

    pub fn with_requesting(mut self, unit: LoadedUnit) -> Self {
        self.requesting = Some(unit);
        self
    }
}

/// 去掉加载器修饰，只保留第一个逗号之前的名称
pub fn bare_unit_name(name: &str) -> &str {
    name.split(',').next().unwrap_or(name).trim()
}

/// 代码单元解析器
#[derive(Debug, Default)]
pub struct UnitResolver {
    /// 名称到已加载单元的缓存，只增不改
    cache: DashMap<String, LoadedUnit>,
}

impl UnitResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 缓存单元；名称已存在时保留原值并返回 false
    pub fn cache_unit(&self, name: &str, unit: LoadedUnit) -> bool {
        match self.cache.entry(name.to_string()) {
            Entry::Occupied(_) => {
                debug!("Unit '{}' already cached", name);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(unit);
                true
            }
        }
    }

    pub fn cached(&self, name: &str) -> Option<LoadedUnit> {
        self.cache.get(name).map(|unit| unit.value().clone())
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// 解析代码单元
    ///
    /// 依次尝试：请求方自身、已启用模块的入口单元、缓存中的裸名称、
    /// 缓存中带平台动态库扩展名的名称。
    pub fn resolve(
        &self,
        request: &ResolveRequest,
        registry: &ModuleRegistry,
        catalog: &CatalogStore,
    ) -> Result<LoadedUnit> {
        if let Some(requesting) = &request.requesting {
            return Ok(requesting.clone());
        }

        let bare = bare_unit_name(&request.name);

        let entry_unit = registry
            .list_all()
            .into_iter()
            .filter(|descriptor| catalog.is_active(&descriptor.id))
            .find(|descriptor| eq_ignore_case(&descriptor.entry_unit.name, bare))
            .map(|descriptor| descriptor.entry_unit.clone());
        if let Some(unit) = entry_unit {
            debug!("Unit '{}' resolved to a module entry unit", bare);
            return Ok(unit);
        }

        let with_extension = format!("{}.{}", bare, std::env::consts::DLL_EXTENSION);
        if let Some(unit) = self.cached(bare).or_else(|| self.cached(&with_extension)) {
            debug!("Unit '{}' resolved from cache", bare);
            return Ok(unit);
        }

        info!("Unable to resolve unit '{}'", request.name);
        Err(PluginShellError::resolution(&request.name))
    }
}
