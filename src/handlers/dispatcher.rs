//! # 扩展名调度器
//!
//! 按源文件扩展名（区分大小写、精确匹配）选择处理器，并从该处理器
//! 对应的字母序列中分配输出文件名。
//!
//! ## 并发
//! 每条路由的序列由各自的 `Mutex` 保护，分配文件名是唯一的临界区；
//! 实际转码在锁外执行，可以并行。
//!
//! ## 依赖关系
//! - 被 `commands/flatten.rs` 使用
//! - 使用 `naming/alpha.rs`, `models/summary.rs`

use super::{CopyRenameHandler, DecodeReencodeHandler, Handler, Tool};
use crate::error::{AudioflatError, Result};
use crate::models::RunSummary;
use crate::naming::{AlphabeticIndexer, PRIMARY_OFFSET, SECONDARY_OFFSET};

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 扩展名 -> (处理器, 命名序列)
struct Route {
    extension: String,
    handler: Box<dyn Handler>,
    indexer: Mutex<AlphabeticIndexer>,
}

/// 扩展名调度器
pub struct ExtensionDispatcher {
    /// 扁平输出目录（须已存在）
    output_dir: PathBuf,
    routes: Vec<Route>,
}

impl ExtensionDispatcher {
    /// 创建没有任何路由的调度器
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            routes: Vec::new(),
        }
    }

    /// 默认路由：flac 转码为 mp3，m4a 原样复制
    ///
    /// 主序列上限设为副序列起点，超出后报 `IndexExhausted`，
    /// 不会覆盖副序列已经写出的文件。
    pub fn with_default_handlers(
        output_dir: impl Into<PathBuf>,
        decoder: Tool,
        encoder: Tool,
    ) -> Self {
        Self::new(output_dir)
            .register(
                "flac",
                DecodeReencodeHandler::new(decoder, encoder),
                AlphabeticIndexer::bounded(PRIMARY_OFFSET, SECONDARY_OFFSET),
            )
            .register(
                "m4a",
                CopyRenameHandler::default(),
                AlphabeticIndexer::new(SECONDARY_OFFSET),
            )
    }

    /// 注册路由，已存在的扩展名会被替换
    pub fn register(
        mut self,
        extension: impl Into<String>,
        handler: impl Handler + 'static,
        indexer: AlphabeticIndexer,
    ) -> Self {
        let extension = extension.into();
        self.routes.retain(|r| r.extension != extension);
        self.routes.push(Route {
            extension,
            handler: Box::new(handler),
            indexer: Mutex::new(indexer),
        });
        self
    }

    /// 已注册的统计类别（按注册顺序）
    pub fn categories(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.handler.category()).collect()
    }

    /// 以已注册类别创建零计数的统计
    pub fn new_summary(&self) -> RunSummary {
        RunSummary::with_categories(self.categories())
    }

    /// 处理单个文件，成功时返回输出路径并递增统计
    pub fn dispatch(&self, source: &Path, summary: &RunSummary) -> Result<PathBuf> {
        let route = self.select(source)?;
        let destination = self.allocate(route)?;

        route.handler.produce(source, &destination)?;
        summary.record(route.handler.category());
        Ok(destination)
    }

    fn select(&self, source: &Path) -> Result<&Route> {
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.routes
            .iter()
            .find(|r| r.extension == extension)
            .ok_or(AudioflatError::UnsupportedExtension { extension })
    }

    fn allocate(&self, route: &Route) -> Result<PathBuf> {
        let label = {
            let mut indexer = route.indexer.lock().unwrap_or_else(|e| e.into_inner());
            indexer.next()
        };

        let label = label.ok_or_else(|| AudioflatError::IndexExhausted {
            category: route.handler.category().to_string(),
        })?;

        Ok(self
            .output_dir
            .join(format!("{}.{}", label, route.handler.output_extension())))
    }
}
