//! 共享库
//!
//! 包含各二进制共用的配置加载与可观测性基础设施代码。

pub mod config;
pub mod observability;
