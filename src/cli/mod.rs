//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 用法
//! ```text
//! audioflat [OPTIONS] <OUTDIR>
//! ```
//! 当前工作目录为输入根目录，`OUTDIR` 须已存在。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/flatten.rs`

use clap::Parser;
use std::path::PathBuf;

/// audioflat - 将音乐库展平为按序命名的 mp3/m4a 文件
#[derive(Parser, Debug)]
#[command(name = "audioflat")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Flatten the audio files under the current directory into OUTDIR",
    long_about = "Recursively walks the current directory. .flac files are decoded and \
                  re-encoded to .mp3, .m4a files are copied verbatim. Every output gets a \
                  sequential alphabetic name (a, b, ..., z, ba, ...) inside OUTDIR."
)]
pub struct Cli {
    /// Existing output directory
    pub outdir: PathBuf,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Lossless decoder program (invoked as `<PROGRAM> -s -c -d <source>`)
    #[arg(long, value_name = "PROGRAM", default_value = "flac")]
    pub decoder: String,

    /// Lossy encoder program (invoked as `<PROGRAM> --silent --preset insane - <dest>`)
    #[arg(long, value_name = "PROGRAM", default_value = "lame")]
    pub encoder: String,

    /// Print every produced file
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Exit with a non-zero status if any entry could not be processed
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}
