//! # 文件处理器模块
//!
//! 根据扩展名选择处理器，将一个源文件转换或复制为输出目录中的一个文件。
//!
//! ## 处理器
//! - `transcode` - flac 解码后重新编码为 mp3（外部 `flac | lame` 管道）
//! - `passthrough` - m4a 原样复制并重命名
//! - `dispatcher` - 扩展名到处理器的映射，负责分配文件名
//!
//! ## 依赖关系
//! - 被 `commands/flatten.rs` 使用
//! - 使用 `naming/` 分配文件名，`models/summary.rs` 记录统计

pub mod dispatcher;
pub mod passthrough;
pub mod transcode;

pub use dispatcher::ExtensionDispatcher;
pub use passthrough::CopyRenameHandler;
pub use transcode::{DecodeReencodeHandler, Tool};

use crate::error::Result;
use std::path::Path;

/// 单个文件处理器
///
/// 处理器只负责生成 `destination`，文件名由调度器分配，
/// 输出目录须事先存在。
pub trait Handler: Send + Sync {
    /// 统计类别（源扩展名，不含点）
    fn category(&self) -> &str;

    /// 输出文件扩展名
    fn output_extension(&self) -> &str;

    /// 由 `source` 生成 `destination`
    fn produce(&self, source: &Path, destination: &Path) -> Result<()>;
}
