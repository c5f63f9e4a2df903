//! PluginShell - 模块化宿主的插件注册与扩展点系统
//!
//! 宿主程序由一个壳和若干可独立启用的模块组成。本库负责：
//!
//! - **目录存储**: 读写记录模块排序与激活状态的目录文件
//! - **变更监控**: 外部修改目录文件后自动重建导出树
//! - **模块注册**: 保存已发现模块的描述符和入口对象
//! - **导出树**: 合并壳与已启用模块声明的扩展点，处理占位和标题冲突
//! - **单元解析**: 将代码单元名称映射到已加载的句柄
//! - **生命周期**: 启用、禁用、刷新，以及入口对象的启动和关闭

pub mod types;
pub mod error;
pub mod config;
pub mod core;
pub mod plugins;
pub mod manager;

// 重新导出核心类型
pub use types::*;
pub use error::*;
pub use self::core::*;
pub use plugins::*;
pub use manager::ModuleManager;

use config::LoggingConfig;

/// 框架信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const FRAMEWORK_NAME: &str = "PluginShell";

/// 初始化日志系统，重复调用时保留已安装的订阅者
pub fn initialize(logging: &LoggingConfig) -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .with_max_level(logging.level.as_tracing_level())
        .with_ansi(logging.ansi)
        .with_target(logging.with_target)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Initializing {} v{}", FRAMEWORK_NAME, VERSION);
    }
    Ok(())
}
