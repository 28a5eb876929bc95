//! # 命令执行模块
//!
//! 实现展平命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `handlers/`, `models/`, `utils/`
//! - 子模块: flatten

pub mod flatten;

use crate::cli::Cli;
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    flatten::execute(cli)
}
