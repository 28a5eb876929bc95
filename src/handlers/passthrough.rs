//! # m4a 直接复制
//!
//! 不做转码，按字节原样复制到新文件名。
//!
//! ## 依赖关系
//! - 被 `handlers/dispatcher.rs` 注册

use super::Handler;
use crate::error::{AudioflatError, Result};

use std::fs;
use std::path::Path;

/// 复制并重命名处理器
#[derive(Debug, Clone)]
pub struct CopyRenameHandler {
    category: String,
}

impl CopyRenameHandler {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

impl Default for CopyRenameHandler {
    fn default() -> Self {
        Self::new("m4a")
    }
}

impl Handler for CopyRenameHandler {
    fn category(&self) -> &str {
        &self.category
    }

    fn output_extension(&self) -> &str {
        &self.category
    }

    fn produce(&self, source: &Path, destination: &Path) -> Result<()> {
        fs::copy(source, destination).map_err(|e| AudioflatError::CopyFailed {
            from: source.display().to_string(),
            to: destination.display().to_string(),
            source: e,
        })?;
        Ok(())
    }
}
