// AetherOS スタックバックトレース
//
// 保存されたフレームポインタのチェーンを辿り、各フレームのリターンアドレスと
// 引数とみなすワードを読み出して表示する。
//
// フレーム規約:
//   [fp]            呼び出し元のフレームポインタ（0 で終端）
//   [fp + 1ワード]  リターンアドレス
//   [fp + 2..7]     引数とみなす5ワード

use core::fmt;
use core::mem::size_of;

use crate::arch::{FRAME_POINTER_LABEL, RETURN_ADDRESS_LABEL};
use super::symbols::DebugInfoResolver;

/// フレームごとに読み出すワード数
pub const SAVED_WORDS: usize = 5;

/// 16進表示の桁数（1ワード分）
pub const WORD_HEX_WIDTH: usize = size_of::<usize>() * 2;

/// チェーン終端を表す番兵
const SENTINEL: usize = 0;

/// 復元した呼び出しフレーム
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    pub frame_pointer: usize,
    pub return_address: usize,
    pub saved_words: [usize; SAVED_WORDS],
}

impl fmt::Display for CallFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = WORD_HEX_WIDTH;
        write!(
            f,
            "{} {:0w$x} {} {:0w$x} args",
            FRAME_POINTER_LABEL, self.frame_pointer, RETURN_ADDRESS_LABEL, self.return_address,
        )?;
        for word in &self.saved_words {
            write!(f, " {:0w$x}", word)?;
        }
        Ok(())
    }
}

/// フレームポインタチェーンを辿るイテレータ
///
/// 生きているスタックを読むため再実行はできない。消費したら終わり。
#[derive(Debug)]
pub struct FrameWalker {
    /// 次に読むフレームポインタ
    next: usize,
    /// 最大フレーム数
    limit: Option<usize>,
    /// これまでに返したフレーム数
    walked: usize,
    /// 最大フレーム数で打ち切ったか
    truncated: bool,
}

impl FrameWalker {
    /// `frame_pointer` から巻き戻しを開始する
    ///
    /// # Safety
    /// `frame_pointer` から辿れるすべての非ゼロのフレームポインタについて、
    /// 先頭から7ワードが読み出し可能でなければならない。
    /// 壊れたチェーンは検出できず、番兵に当たるまで辿り続ける。
    pub unsafe fn new(frame_pointer: usize) -> Self {
        Self {
            next: frame_pointer,
            limit: None,
            walked: 0,
            truncated: false,
        }
    }

    /// 辿るフレーム数の上限を設定（`None` で無制限）
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// 上限に達して打ち切ったか
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// これまでに返したフレーム数
    pub fn frames_walked(&self) -> usize {
        self.walked
    }
}

/// `base` からワード単位で `index` 番目を読む
///
/// # Safety
/// 読み出し先が読み出し可能なメモリであること。
#[inline]
unsafe fn read_word(base: usize, index: usize) -> usize {
    (base as *const usize).wrapping_add(index).read_unaligned()
}

impl Iterator for FrameWalker {
    type Item = CallFrame;

    fn next(&mut self) -> Option<CallFrame> {
        if self.next == SENTINEL {
            return None;
        }
        if self.limit.is_some_and(|limit| self.walked >= limit) {
            self.truncated = true;
            self.next = SENTINEL;
            return None;
        }

        let frame_pointer = self.next;
        // SAFETY: `new` の契約により、チェーン上のフレームは7ワード読み出せる
        let frame = unsafe {
            let mut saved_words = [0usize; SAVED_WORDS];
            for (i, word) in saved_words.iter_mut().enumerate() {
                *word = read_word(frame_pointer, 2 + i);
            }
            self.next = read_word(frame_pointer, 0);
            CallFrame {
                frame_pointer,
                return_address: read_word(frame_pointer, 1),
                saved_words,
            }
        };

        self.walked += 1;
        Some(frame)
    }
}

impl core::iter::FusedIterator for FrameWalker {}

/// バックトレースを出力する
///
/// フレームごとに1行、リゾルバがリターンアドレスを解決できたときはもう1行
/// `ファイル:行: 関数名+オフセット` を出力する。
pub fn print_backtrace(
    out: &mut dyn fmt::Write,
    mut walker: FrameWalker,
    resolver: &dyn DebugInfoResolver,
) -> fmt::Result {
    writeln!(out, "Stack backtrace:")?;

    for frame in &mut walker {
        writeln!(out, "{}", frame)?;

        if let Some(info) = resolver.resolve(frame.return_address) {
            writeln!(
                out,
                "\t\t{}:{}: {}+{}",
                info.file,
                info.line,
                info.name(),
                info.offset_of(frame.return_address),
            )?;
        }
    }

    if walker.truncated() {
        log::warn!("バックトレースを {} フレームで打ち切りました", walker.frames_walked());
        writeln!(out, "  ... backtrace truncated after {} frames", walker.frames_walked())?;
    }

    Ok(())
}
