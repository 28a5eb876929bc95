//! # audioflat - 音乐库展平工具
//!
//! 递归遍历当前目录，将 .flac 转码为 .mp3、将 .m4a 原样复制，
//! 全部放入同一个输出目录，并用字母序号命名以避免重名。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (目录遍历与批量执行)
//!   │     ├── handlers/  (扩展名调度与文件处理器)
//!   │     ├── naming/    (字母序号生成)
//!   │     └── models/    (运行统计)
//!   ├── utils/      (输出与进度条)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod handlers;
mod models;
mod naming;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
