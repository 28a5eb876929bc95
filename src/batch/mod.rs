//! # 批量处理模块
//!
//! 遍历输入目录并逐个处理条目。
//!
//! ## 功能
//! - 深度优先遍历，跟随符号链接
//! - 单个文件失败隔离
//! - 可选并行处理
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/flatten.rs` 使用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;
pub mod walker;

pub use runner::{BatchResult, BatchRunner, ProcessResult};
pub use walker::{FileEntry, TreeWalker};
