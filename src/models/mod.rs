//! # 数据模型模块
//!
//! 定义一次运行中的统计数据。
//!
//! ## 依赖关系
//! - 被 `handlers/` 和 `commands/` 使用
//! - 子模块: summary

pub mod summary;

pub use summary::RunSummary;
