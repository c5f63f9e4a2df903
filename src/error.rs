//! PluginShell 错误处理系统
//!
//! 统一的错误类型和错误处理机制

use std::path::PathBuf;
use thiserror::Error;

/// 框架统一错误类型
#[derive(Error, Debug)]
pub enum PluginShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),

    #[error("Catalog unavailable after {attempts} attempts: {path}")]
    CatalogUnavailable { path: PathBuf, attempts: u32 },

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unable to load unit {unit}")]
    Resolution { unit: String },

    #[error("Module '{module_id}' failed: {message}")]
    Plugin { module_id: String, message: String },
}

impl PluginShellError {
    /// 创建配置相关错误
    pub fn configuration(message: &str) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// 创建单元解析错误
    pub fn resolution(unit: &str) -> Self {
        Self::Resolution {
            unit: unit.to_string(),
        }
    }

    /// 创建文档解析错误
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// 创建模块入口对象错误
    pub fn plugin(module_id: &str, message: &str) -> Self {
        Self::Plugin {
            module_id: module_id.to_string(),
            message: message.to_string(),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PluginShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = PluginShellError::configuration("tag must not be empty");
        assert!(matches!(error, PluginShellError::Configuration { .. }));
        assert_eq!(error.to_string(), "Configuration error: tag must not be empty");
    }

    #[test]
    fn test_resolution_error_names_unit() {
        let error = PluginShellError::resolution("Reporting");
        assert_eq!(error.to_string(), "Unable to load unit Reporting");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let shell_error = PluginShellError::from(io_error);
        assert!(matches!(shell_error, PluginShellError::Io(_)));
    }

    #[test]
    fn test_result_type() {
        let success: Result<i32> = Ok(42);
        let failure: Result<i32> = Err(PluginShellError::plugin("alpha", "start failed"));

        assert!(success.is_ok());
        assert!(failure.is_err());
    }
}
