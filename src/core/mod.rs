//! 核心基础层模块
//!
//! 目录文件的存储与监控

pub mod catalog;
pub mod watcher;

// 重新导出核心组件
pub use catalog::*;
pub use watcher::*;
