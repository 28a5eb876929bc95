//! # 运行统计
//!
//! 按类别（源文件扩展名，不含点）统计成功处理的文件数量。
//!
//! ## 依赖关系
//! - 被 `handlers/dispatcher.rs` 递增
//! - 被 `commands/flatten.rs` 输出报告

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 各类别的成功计数
///
/// 类别在运行开始时注册，计数为零的类别同样会出现在报告中。
#[derive(Debug, Default)]
pub struct RunSummary {
    counts: Vec<(String, AtomicUsize)>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定类别创建统计，重复的类别只保留一次
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut summary = Self::new();
        for category in categories {
            summary.register(category);
        }
        summary
    }

    /// 注册类别
    pub fn register(&mut self, category: impl Into<String>) {
        let category = category.into();
        if self.slot(&category).is_none() {
            self.counts.push((category, AtomicUsize::new(0)));
        }
    }

    /// 成功处理一个文件后递增计数；未注册的类别返回 false
    pub fn record(&self, category: &str) -> bool {
        match self.slot(category) {
            Some(counter) => {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, category: &str) -> Option<usize> {
        self.slot(category).map(|c| c.load(Ordering::SeqCst))
    }

    pub fn total(&self) -> usize {
        self.counts
            .iter()
            .map(|(_, c)| c.load(Ordering::SeqCst))
            .sum()
    }

    /// 按注册顺序返回 (类别, 计数)
    pub fn entries(&self) -> Vec<(&str, usize)> {
        self.counts
            .iter()
            .map(|(name, c)| (name.as_str(), c.load(Ordering::SeqCst)))
            .collect()
    }

    fn slot(&self, category: &str) -> Option<&AtomicUsize> {
        self.counts
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, c)| c)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, count) in self.entries() {
            writeln!(f, "{}:\t{}", category, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counts_are_reported() {
        let summary = RunSummary::with_categories(["flac", "m4a"]);
        assert_eq!(summary.to_string(), "flac:\t0\nm4a:\t0\n");
    }

    #[test]
    fn test_record_and_count() {
        let summary = RunSummary::with_categories(["flac", "m4a", "flac"]);
        assert!(summary.record("flac"));
        assert!(summary.record("flac"));
        assert!(summary.record("m4a"));
        assert!(!summary.record("txt"));

        assert_eq!(summary.count("flac"), Some(2));
        assert_eq!(summary.count("m4a"), Some(1));
        assert_eq!(summary.count("txt"), None);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.entries(), vec![("flac", 2), ("m4a", 1)]);
    }

    #[test]
    fn test_concurrent_record() {
        let summary = RunSummary::with_categories(["flac"]);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..100 {
                        summary.record("flac");
                    }
                });
            }
        });
        assert_eq!(summary.count("flac"), Some(800));
    }
}
