//! PluginShell 核心数据类型
//!
//! 模块标识、激活状态以及贯穿各组件的小工具函数

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 基础类型
pub type ModuleId = String;
pub type TimestampNs = i64;

/// 模块激活状态
///
/// 目录文件中的取值不区分大小写，写回时统一为小写。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleStatus {
    /// 已登记、等待安装流程处理
    Pending,
    /// 已安装但未启用
    Inactive,
    /// 已启用
    Active,
}

impl ModuleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleStatus {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = value.trim();
        if normalized.eq_ignore_ascii_case("active") {
            Ok(Self::Active)
        } else if normalized.eq_ignore_ascii_case("inactive") {
            Ok(Self::Inactive)
        } else if normalized.eq_ignore_ascii_case("pending") {
            Ok(Self::Pending)
        } else {
            Err(format!("unknown module status: {normalized}"))
        }
    }
}

impl Serialize for ModuleStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModuleStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 首字母大写，其余字符保持不变
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 不区分大小写的比较（Unicode 小写折叠）
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right) || left.to_lowercase() == right.to_lowercase()
}
