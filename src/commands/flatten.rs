//! # flatten 命令实现
//!
//! 将当前目录下的音频文件展平到输出目录。
//!
//! ## 流程
//! 1. 检查输出目录（必须已存在，不会自动创建）
//! 2. 按默认路由创建调度器与零计数统计
//! 3. 遍历输入树，逐个文件调度；失败只记录
//! 4. 全部完成后输出空行与各类别计数
//!
//! ## 依赖关系
//! - 使用 `cli/mod.rs` 定义的参数
//! - 使用 `batch/`, `handlers/`, `models/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchResult, BatchRunner, FileEntry, ProcessResult, TreeWalker};
use crate::cli::Cli;
use crate::error::{AudioflatError, Result};
use crate::handlers::{ExtensionDispatcher, Tool};
use crate::models::RunSummary;
use crate::utils::output;

use std::env;
use std::path::{Path, PathBuf};

/// 展平选项
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    /// 输出目录
    pub outdir: PathBuf,
    /// 并行作业数
    pub jobs: usize,
    pub decoder: Tool,
    pub encoder: Tool,
    pub verbose: bool,
}

impl From<&Cli> for FlattenOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            outdir: cli.outdir.clone(),
            jobs: cli.jobs,
            decoder: Tool::flac_decoder().with_program(&cli.decoder),
            encoder: Tool::lame_encoder().with_program(&cli.encoder),
            verbose: cli.verbose,
        }
    }
}

/// 一次运行的结果
#[derive(Debug)]
pub struct FlattenReport {
    pub summary: RunSummary,
    pub batch: BatchResult,
}

/// 执行 flatten 命令
pub fn execute(cli: Cli) -> Result<()> {
    let root = env::current_dir().map_err(|e| {
        AudioflatError::InvalidArgument(format!("Cannot read current directory: {}", e))
    })?;
    let options = FlattenOptions::from(&cli);

    output::print_info(&format!(
        "Flattening '{}' into '{}'",
        root.display(),
        options.outdir.display()
    ));

    let report = flatten(&root, &options)?;

    println!();
    print!("{}", report.summary);

    output::print_info(&format!(
        "Visited {} entries, wrote {} files, skipped {}",
        report.batch.total(),
        report.summary.total(),
        report.batch.problems()
    ));

    if cli.strict && report.batch.problems() > 0 {
        return Err(AudioflatError::RunIncomplete {
            failed: report.batch.problems(),
        });
    }

    Ok(())
}

/// 将 `root` 下的文件展平到 `options.outdir`
pub fn flatten(root: &Path, options: &FlattenOptions) -> Result<FlattenReport> {
    check_output_dir(&options.outdir)?;

    let dispatcher = ExtensionDispatcher::with_default_handlers(
        &options.outdir,
        options.decoder.clone(),
        options.encoder.clone(),
    );
    let summary = dispatcher.new_summary();

    let walker = TreeWalker::new(root).exclude(&options.outdir);
    let runner = BatchRunner::new(options.jobs).verbose(options.verbose);

    let batch = runner.run(walker.entries(), |entry| {
        process_entry(&dispatcher, &summary, entry)
    })?;

    Ok(FlattenReport { summary, batch })
}

/// 处理单个条目
fn process_entry(
    dispatcher: &ExtensionDispatcher,
    summary: &RunSummary,
    entry: &FileEntry,
) -> ProcessResult {
    match entry {
        FileEntry::File(path) => match dispatcher.dispatch(path, summary) {
            Ok(destination) => ProcessResult::Success(
                path.display().to_string(),
                destination.display().to_string(),
            ),
            Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
        },
        FileEntry::Unprocessable { path, reason } => {
            ProcessResult::Unprocessable(path.display().to_string(), reason.clone())
        }
    }
}

/// 输出目录须已存在且为目录
fn check_output_dir(outdir: &Path) -> Result<()> {
    if !outdir.exists() {
        return Err(AudioflatError::DirectoryNotFound {
            path: outdir.display().to_string(),
        });
    }
    if !outdir.is_dir() {
        return Err(AudioflatError::NotADirectory {
            path: outdir.display().to_string(),
        });
    }
    Ok(())
}
