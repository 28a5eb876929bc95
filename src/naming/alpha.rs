//! # 字母序号生成器
//!
//! 将非负整数转换为以 `a` 为零的 26 进制小写字母串，
//! 并提供可从任意偏移开始的有状态序列。
//!
//! ## 编码规则
//! ```text
//! 0  -> a      25 -> z
//! 26 -> ba     51 -> bz
//! 52 -> ca     17550 -> zza
//! ```
//! 注意 `z` 之后是 `ba` 而不是 `aa`：这是按位的 26 进制，
//! 而非双射计数。
//!
//! ## 依赖关系
//! - 被 `handlers/dispatcher.rs` 使用
//! - 无外部模块依赖

const RADIX: u64 = 26;

/// 主序列（解码重编码）的起始偏移
pub const PRIMARY_OFFSET: u64 = 0;

/// 副序列（直接复制）的起始偏移，首个标签为 `zza`
///
/// 主序列需要生成 17550 个标签才会到达这里。这只是经验上的
/// 避让距离，并不能保证两个序列永不相交。
pub const SECONDARY_OFFSET: u64 = 25 * RADIX * RADIX + 25 * RADIX;

/// 将整数编码为字母标签
pub fn alpha_label(mut n: u64) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'a' + (n % RADIX) as u8);
        n /= RADIX;
        if n == 0 {
            break;
        }
    }
    letters.reverse();
    // 所有字节均在 b'a'..=b'z' 之间
    letters.into_iter().map(char::from).collect()
}

/// 字母标签序列
///
/// 每次调用 `next` 返回当前计数对应的标签，然后计数加一。
/// 设置上限后，计数到达上限时序列结束。
#[derive(Debug, Clone)]
pub struct AlphabeticIndexer {
    /// 下一个要输出的计数
    next: u64,
    /// 可选的上限（不含）
    limit: Option<u64>,
}

impl AlphabeticIndexer {
    /// 创建无上限的序列
    pub fn new(start: u64) -> Self {
        Self {
            next: start,
            limit: None,
        }
    }

    /// 创建有上限的序列，计数到达 `limit` 后不再产生标签
    pub fn bounded(start: u64, limit: u64) -> Self {
        Self {
            next: start,
            limit: Some(limit),
        }
    }
}

impl Iterator for AlphabeticIndexer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.limit.is_some_and(|limit| self.next >= limit) {
            return None;
        }
        let current = self.next;
        self.next = current.checked_add(1)?;
        Some(alpha_label(current))
    }
}
