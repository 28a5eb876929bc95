//! # 目录遍历
//!
//! 深度优先递归遍历输入目录，将条目分为普通文件和无法处理的条目。
//!
//! ## 规则
//! - 目录（包括指向目录的符号链接）继续向下遍历
//! - 普通文件（包括指向文件的符号链接）交给调度器
//! - 其它条目（悬空链接、套接字、FIFO、无法读取的目录、链接环）
//!   标记为无法处理，遍历继续
//!
//! 遍历顺序即文件系统返回的顺序，不排序，不保证稳定。
//! 被排除的目录（通常是位于输入树内的输出目录）整个跳过。
//!
//! ## 依赖关系
//! - 被 `commands/flatten.rs` 使用
//! - 使用 `walkdir` 遍历目录

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 遍历得到的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// 普通文件
    File(PathBuf),
    /// 既不是目录也不是普通文件
    Unprocessable { path: PathBuf, reason: String },
}

/// 目录遍历器
pub struct TreeWalker {
    /// 遍历根目录
    root: PathBuf,
    /// 跳过的目录（规范化路径）
    excluded: Vec<PathBuf>,
}

impl TreeWalker {
    /// 创建遍历器，始终跟随符号链接
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
        }
    }

    /// 跳过某个目录；目录不存在时忽略
    pub fn exclude(mut self, dir: &Path) -> Self {
        if let Ok(canonical) = fs::canonicalize(dir) {
            self.excluded.push(canonical);
        }
        self
    }

    /// 惰性遍历所有条目（不含根目录本身）
    pub fn entries(&self) -> impl Iterator<Item = FileEntry> {
        let root = self.root.clone();
        let excluded = self.excluded.clone();
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_entry(move |entry| !is_excluded(entry, &excluded))
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        None
                    } else if file_type.is_file() {
                        Some(FileEntry::File(entry.into_path()))
                    } else {
                        Some(FileEntry::Unprocessable {
                            path: entry.into_path(),
                            reason: "not a regular file or directory".to_string(),
                        })
                    }
                }
                Err(err) => {
                    let reason = match err.io_error() {
                        Some(io) => io.to_string(),
                        None => err.to_string(),
                    };
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.clone());
                    Some(FileEntry::Unprocessable { path, reason })
                }
            })
    }
}

fn is_excluded(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    if excluded.is_empty() || !entry.file_type().is_dir() {
        return false;
    }
    fs::canonicalize(entry.path())
        .map(|path| excluded.contains(&path))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sorted_files(walker: &TreeWalker) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walker
            .entries()
            .filter_map(|e| match e {
                FileEntry::File(p) => Some(p),
                FileEntry::Unprocessable { .. } => None,
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_recurses_into_subdirectories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("a.flac"), b"").unwrap();
        fs::write(root.join("sub/b.m4a"), b"").unwrap();
        fs::write(root.join("sub/deeper/c.txt"), b"").unwrap();

        let walker = TreeWalker::new(root);
        assert_eq!(
            sorted_files(&walker),
            vec![
                root.join("a.flac"),
                root.join("sub/b.m4a"),
                root.join("sub/deeper/c.txt"),
            ]
        );
        assert!(walker
            .entries()
            .all(|e| matches!(e, FileEntry::File(_))));
    }

    #[test]
    fn test_excluded_directory_is_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("out")).unwrap();
        fs::write(root.join("a.m4a"), b"").unwrap();
        fs::write(root.join("out/a.m4a"), b"").unwrap();

        let walker = TreeWalker::new(root).exclude(&root.join("out"));
        assert_eq!(sorted_files(&walker), vec![root.join("a.m4a")]);
    }

    #[test]
    fn test_empty_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("empty")).unwrap();
        assert_eq!(TreeWalker::new(temp.path()).entries().count(), 0);
    }

    #[test]
    fn test_missing_root_is_unprocessable() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("gone");
        let entries: Vec<FileEntry> = TreeWalker::new(&root).entries().collect();
        assert_eq!(entries.len(), 1);
        assert!(matches!(&entries[0], FileEntry::Unprocessable { path, .. } if *path == root));
    }

    #[cfg(unix)]
    #[test]
    fn test_follows_directory_symlink() {
        use std::os::unix::fs::symlink;

        let library = TempDir::new().unwrap();
        fs::write(library.path().join("linked.flac"), b"").unwrap();

        let temp = TempDir::new().unwrap();
        symlink(library.path(), temp.path().join("library")).unwrap();

        let files = sorted_files(&TreeWalker::new(temp.path()));
        assert_eq!(files, vec![temp.path().join("library/linked.flac")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_unprocessable() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.flac"), b"").unwrap();
        symlink(temp.path().join("nowhere"), temp.path().join("broken.flac")).unwrap();

        let entries: Vec<FileEntry> = TreeWalker::new(temp.path()).entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&FileEntry::File(temp.path().join("a.flac"))));
        assert!(entries.iter().any(|e| matches!(
            e,
            FileEntry::Unprocessable { path, .. } if *path == temp.path().join("broken.flac")
        )));
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_is_unprocessable() {
        let temp = TempDir::new().unwrap();
        let fifo = temp.path().join("pipe.flac");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let entries: Vec<FileEntry> = TreeWalker::new(temp.path()).entries().collect();
        assert_eq!(
            entries,
            vec![FileEntry::Unprocessable {
                path: fifo,
                reason: "not a regular file or directory".to_string(),
            }]
        );
    }
}
