//! # 输出文件命名模块
//!
//! 为扁平输出目录生成互不冲突的字母文件名。
//!
//! ## 依赖关系
//! - 被 `handlers/dispatcher.rs` 使用
//! - 子模块: alpha

pub mod alpha;

pub use alpha::{AlphabeticIndexer, PRIMARY_OFFSET, SECONDARY_OFFSET};
