//! # 统一错误处理模块
//!
//! 定义 audioflat 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单个文件的错误（扩展名不支持、外部工具失败、复制失败）由
//! `batch::runner` 捕获并记录，不会中断遍历；只有启动阶段的错误
//! 才会传递到 `main.rs`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// audioflat 统一错误类型
#[derive(Error, Debug)]
pub enum AudioflatError {
    // ─────────────────────────────────────────────────────────────
    // 分派错误
    // ─────────────────────────────────────────────────────────────
    #[error("No handler for extension '{}'", display_extension(.extension))]
    UnsupportedExtension { extension: String },

    #[error("Name sequence for '{category}' is exhausted")]
    IndexExhausted { category: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}: {reason}")]
    ExternalToolFailure { command: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to copy {from} -> {to}: {source}")]
    CopyFailed {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数与运行错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("{failed} entries could not be processed")]
    RunIncomplete { failed: usize },
}

fn display_extension(extension: &str) -> &str {
    if extension.is_empty() {
        "(none)"
    } else {
        extension
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, AudioflatError>;
