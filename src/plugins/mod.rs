//! 模块接口层
//!
//! 模块入口对象、清单、注册表、导出树和代码单元解析。
//! 生命周期操作以 `ModuleManager` 方法的形式定义在 `lifecycle` 中。

pub mod core;
pub mod lifecycle;
pub mod registry;
pub mod metadata;
pub mod export_tree;
pub mod dynamic_loader;

// 重新导出核心组件
pub use self::core::*;
pub use registry::*;
pub use metadata::*;
pub use export_tree::*;
pub use dynamic_loader::*;
