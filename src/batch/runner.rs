//! # 批量执行器
//!
//! 对遍历得到的每个条目执行处理函数，单个文件失败只记录、不中断。
//!
//! ## 功能
//! - 单线程时按遍历顺序依次处理
//! - 多线程时基于 rayon 的 `par_bridge` 并行处理
//! - spinner 显示进度，日志通过 `suspend` 输出
//! - 错误收集与汇总
//!
//! ## 依赖关系
//! - 被 `commands/flatten.rs` 调用
//! - 使用 `utils/progress.rs` 创建 spinner
//! - 使用 `rayon` 进行并行处理

use super::FileEntry;
use crate::error::{AudioflatError, Result};
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use rayon::prelude::*;

/// 单个条目处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理成功 (源文件, 输出文件)
    Success(String, String),
    /// 处理失败 (文件路径, 错误信息)
    Failed(String, String),
    /// 无法处理的条目 (路径, 原因)
    Unprocessable(String, String),
}

impl ProcessResult {
    /// 控制台日志行；成功时为 None
    pub fn log_line(&self) -> Option<String> {
        match self {
            ProcessResult::Success(_, _) => None,
            ProcessResult::Failed(path, err) => {
                Some(format!("Couldn't process file {}: {}", path, err))
            }
            ProcessResult::Unprocessable(path, reason) => {
                Some(format!("Couldn't process entry {}: {}", path, reason))
            }
        }
    }
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 失败数量（文件）
    pub failed: usize,
    /// 无法处理的条目数量
    pub unprocessable: usize,
    /// 失败详情（含无法处理的条目）
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_, _) => self.success += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
            ProcessResult::Unprocessable(path, reason) => {
                self.unprocessable += 1;
                self.failures.push((path, reason));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.failed + self.unprocessable
    }

    /// 失败与无法处理的条目总数
    pub fn problems(&self) -> usize {
        self.failed + self.unprocessable
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    /// 是否输出成功条目
    verbose: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用 CPU 核数
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 处理所有条目，返回前等待全部任务完成
    pub fn run<I, F>(&self, entries: I, processor: F) -> Result<BatchResult>
    where
        I: Iterator<Item = FileEntry> + Send,
        F: Fn(&FileEntry) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_spinner("Processing");

        let results: Vec<ProcessResult> = if self.jobs <= 1 {
            entries
                .map(|entry| self.process_one(&entry, &processor, &pb))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()
                .map_err(|e| AudioflatError::ThreadPool(e.to_string()))?;

            pool.install(|| {
                entries
                    .par_bridge()
                    .map(|entry| self.process_one(&entry, &processor, &pb))
                    .collect()
            })
        };

        pb.finish_and_clear();

        // 汇总结果
        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        Ok(batch_result)
    }

    fn process_one<F>(&self, entry: &FileEntry, processor: &F, pb: &ProgressBar) -> ProcessResult
    where
        F: Fn(&FileEntry) -> ProcessResult,
    {
        let result = processor(entry);

        match &result {
            ProcessResult::Success(from, to) if self.verbose => {
                pb.suspend(|| output::print_conversion(from, to));
            }
            ProcessResult::Success(_, _) => {}
            _ => {
                if let Some(line) = result.log_line() {
                    pb.suspend(|| output::print_warning(&line));
                }
            }
        }

        pb.inc(1);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entries() -> Vec<FileEntry> {
        vec![
            FileEntry::File(PathBuf::from("a.flac")),
            FileEntry::File(PathBuf::from("b.txt")),
            FileEntry::Unprocessable {
                path: PathBuf::from("broken"),
                reason: "No such file or directory".to_string(),
            },
            FileEntry::File(PathBuf::from("c.m4a")),
        ]
    }

    fn processor(entry: &FileEntry) -> ProcessResult {
        match entry {
            FileEntry::File(path) if path.extension().is_some_and(|e| e == "txt") => {
                ProcessResult::Failed(path.display().to_string(), "unsupported".to_string())
            }
            FileEntry::File(path) => {
                ProcessResult::Success(path.display().to_string(), "out".to_string())
            }
            FileEntry::Unprocessable { path, reason } => {
                ProcessResult::Unprocessable(path.display().to_string(), reason.clone())
            }
        }
    }

    #[test]
    fn test_sequential_run() {
        let result = BatchRunner::new(1)
            .run(entries().into_iter(), processor)
            .unwrap();
        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.unprocessable, 1);
        assert_eq!(result.total(), 4);
        assert_eq!(
            result.failures,
            vec![
                ("b.txt".to_string(), "unsupported".to_string()),
                ("broken".to_string(), "No such file or directory".to_string()),
            ]
        );
    }

    #[test]
    fn test_parallel_run_matches_sequential_counts() {
        let many: Vec<FileEntry> = entries().into_iter().cycle().take(400).collect();
        let result = BatchRunner::new(4).run(many.into_iter(), processor).unwrap();
        assert_eq!(result.success, 200);
        assert_eq!(result.failed, 100);
        assert_eq!(result.unprocessable, 100);
        assert_eq!(result.problems(), 200);
    }

    #[test]
    fn test_zero_jobs_uses_cpu_count() {
        assert_eq!(BatchRunner::new(0).jobs, num_cpus::get());
    }

    #[test]
    fn test_log_lines() {
        assert_eq!(
            ProcessResult::Failed("sub/c.txt".into(), "No handler for extension 'txt'".into())
                .log_line()
                .as_deref(),
            Some("Couldn't process file sub/c.txt: No handler for extension 'txt'")
        );
        assert_eq!(
            ProcessResult::Unprocessable("sock".into(), "not a regular file or directory".into())
                .log_line()
                .as_deref(),
            Some("Couldn't process entry sock: not a regular file or directory")
        );
        assert_eq!(
            ProcessResult::Success("a".into(), "b".into()).log_line(),
            None
        );
    }
}
