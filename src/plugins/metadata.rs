//! 导出清单（manifest）声明与解析
//!
//! 壳程序和每个模块各自拥有一份清单，按顺序声明要挂到导出树上的扩展点

use crate::{PluginShellError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 清单文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// 根据扩展名判断格式，未知扩展名按 YAML 处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// 导出清单
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// 模块自报名称（壳清单可省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 版本号，仅用于展示
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 入口单元名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_unit: Option<String>,
    /// 描述
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 有序的导出声明
    #[serde(default)]
    pub exports: Vec<ExportDeclaration>,
}

/// 单条导出声明
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDeclaration {
    /// 供其它声明 `extends` 引用的段名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 扩展点类别，必填
    #[serde(default)]
    pub tag: String,
    /// 以 `/` 分隔的挂载路径，`.` 表示根
    #[serde(default)]
    pub extends: String,
    /// 显示标题
    #[serde(default)]
    pub title: String,
    /// 排序值，缺省时由构建器分配
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// 其它宿主自定义属性（url、icon 等），原样带到树节点上
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl ExportDeclaration {
    pub fn new(tag: &str, extends: &str, title: &str) -> Self {
        Self {
            tag: tag.to_string(),
            extends: extends.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_attribute(mut self, key: &str, value: serde_json::Value) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    /// 挂载路径的段列表；空路径表示直接挂到根下
    pub fn extends_path(&self) -> Vec<&str> {
        self.extends
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

impl ExportManifest {
    pub fn new(exports: Vec<ExportDeclaration>) -> Self {
        Self {
            exports,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// 解析清单文本
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        match ManifestFormat::from_path(path) {
            ManifestFormat::Json => {
                serde_json::from_str(content).map_err(|e| PluginShellError::parse(path, e))
            }
            ManifestFormat::Yaml => {
                if content.trim().is_empty() {
                    return Ok(Self::default());
                }
                serde_yaml::from_str(content).map_err(|e| PluginShellError::parse(path, e))
            }
        }
    }

    /// 从文件加载清单
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(path, &content)
    }
}
