//! PluginShell 配置管理系统
//!
//! 支持 YAML / TOML 配置文件，按扩展名选择格式

use crate::{PluginShellError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 壳程序配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// 模块根目录，目录文件和各模块子目录都在这里
    pub modules_root: PathBuf,
    /// 目录文件名
    pub catalog_file_name: String,
    /// 壳程序自身的导出清单
    pub shell_manifest: PathBuf,
    /// 是否监控目录文件
    pub watch_catalog: bool,
    /// 启动时是否扫描模块根目录
    pub discover_modules: bool,
    /// 目录文件等待策略
    pub catalog_wait: CatalogWaitConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 目录文件等待策略
///
/// 外部写入者可能短暂占用文件，读取前按此策略重试。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogWaitConfig {
    /// 重试间隔（毫秒）
    pub retry_interval_ms: u64,
    /// 最大尝试次数
    pub max_attempts: u32,
}

impl CatalogWaitConfig {
    pub fn retry_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.retry_interval_ms)
    }
}

impl Default for CatalogWaitConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: 100,
            max_attempts: 50,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 是否输出 ANSI 颜色
    pub ansi: bool,
    /// 是否输出 target
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            ansi: true,
            with_target: false,
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            modules_root: PathBuf::from("./modules"),
            catalog_file_name: "modules.catalog.yaml".to_string(),
            shell_manifest: PathBuf::from("./shell.manifest.yaml"),
            watch_catalog: true,
            discover_modules: true,
            catalog_wait: CatalogWaitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ShellConfig {
    /// 以指定模块根目录创建配置，壳清单放在根目录下
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            modules_root: root.to_path_buf(),
            shell_manifest: root.join("shell.manifest.yaml"),
            ..Default::default()
        }
    }

    /// 目录文件完整路径
    pub fn catalog_path(&self) -> PathBuf {
        self.modules_root.join(&self.catalog_file_name)
    }
}

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: ShellConfig,
}

impl ConfigManager {
    /// 从文件加载配置
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            PluginShellError::configuration(&format!("Failed to read config file: {}", e))
        })?;

        let config: ShellConfig = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => {
                toml::from_str(&content).map_err(|e| PluginShellError::parse(path, e))?
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(&content).map_err(|e| PluginShellError::parse(path, e))?
            }
        };

        Ok(Self { config })
    }

    /// 创建默认配置
    pub fn new_default() -> Self {
        Self {
            config: ShellConfig::default(),
        }
    }

    pub fn from_config(config: ShellConfig) -> Self {
        Self { config }
    }

    /// 保存配置到文件
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => toml::to_string_pretty(&self.config).map_err(|e| {
                PluginShellError::configuration(&format!("Failed to serialize config: {}", e))
            })?,
            ConfigFormat::Yaml => serde_yaml::to_string(&self.config).map_err(|e| {
                PluginShellError::configuration(&format!("Failed to serialize config: {}", e))
            })?,
        };

        tokio::fs::write(path, content).await.map_err(|e| {
            PluginShellError::configuration(&format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// 获取配置
    pub fn get_config(&self) -> &ShellConfig {
        &self.config
    }

    /// 获取可变配置
    pub fn get_config_mut(&mut self) -> &mut ShellConfig {
        &mut self.config
    }

    pub fn into_config(self) -> ShellConfig {
        self.config
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let name = self.config.catalog_file_name.trim();
        if name.is_empty() {
            return Err(PluginShellError::configuration("Catalog file name cannot be empty"));
        }

        if name.contains('/') || name.contains('\\') {
            return Err(PluginShellError::configuration(
                "Catalog file name must be a bare file name",
            ));
        }

        if self.config.modules_root.as_os_str().is_empty() {
            return Err(PluginShellError::configuration("Modules root cannot be empty"));
        }

        if self.config.catalog_wait.max_attempts == 0 {
            return Err(PluginShellError::configuration(
                "Catalog wait must allow at least one attempt",
            ));
        }

        tracing::info!("Configuration validation passed");
        Ok(())
    }
}

/// 生成默认配置文件
pub async fn generate_default_config_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let config_manager = ConfigManager::new_default();
    config_manager.save_to_file(path).await?;
    Ok(())
}
