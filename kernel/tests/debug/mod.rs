// デバッグ支援テスト


use core::mem::size_of;

use crate::core::debug::backtrace::SAVED_WORDS;

/// 1フレームのワード数（保存フレームポインタ + リターンアドレス + 引数）
pub(crate) const FRAME_WORDS: usize = 2 + SAVED_WORDS;

/// ヒープ上に組んだテスト用フレームチェーン
///
/// 先頭が最内フレーム、最後のフレームの保存フレームポインタが番兵 0。
pub(crate) struct SyntheticStack {
    words: Vec<usize>,
}

impl SyntheticStack {
    /// (リターンアドレス, 引数) の列からチェーンを作る
    pub(crate) fn new(frames: &[(usize, [usize; SAVED_WORDS])]) -> Self {
        let mut words = vec![0usize; frames.len() * FRAME_WORDS];
        let base = words.as_ptr() as usize;

        for (i, (return_address, args)) in frames.iter().enumerate() {
            let slot = i * FRAME_WORDS;
            words[slot] = if i + 1 < frames.len() {
                base + (i + 1) * FRAME_WORDS * size_of::<usize>()
            } else {
                0
            };
            words[slot + 1] = *return_address;
            words[slot + 2..slot + FRAME_WORDS].copy_from_slice(args);
        }

        Self { words }
    }

    /// `index` 番目のフレームのフレームポインタ
    pub(crate) fn frame_pointer(&self, index: usize) -> usize {
        self.words.as_ptr() as usize + index * FRAME_WORDS * size_of::<usize>()
    }

    /// 最内フレーム（フレームがなければ番兵）
    pub(crate) fn top(&self) -> usize {
        if self.words.is_empty() {
            0
        } else {
            self.frame_pointer(0)
        }
    }

    /// `from` の保存フレームポインタを `to` に向け直す
    pub(crate) fn link(&mut self, from: usize, to: usize) {
        let target = self.frame_pointer(to);
        self.words[from * FRAME_WORDS] = target;
    }
}
