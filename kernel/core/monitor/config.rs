// モニタ設定

use crate::arch;
use crate::core::kernel::KernelLayout;

/// 既定のプロンプト
pub const DEFAULT_PROMPT: &str = "K> ";

/// バックトレースで辿る既定の最大フレーム数
pub const DEFAULT_MAX_FRAMES: usize = 64;

/// バックトレースの開始フレーム
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    /// コマンド実行中のフレームポインタレジスタ
    ///
    /// フレームポインタ付きでビルドされていること（`force-frame-pointers=yes`）が前提。
    Live,
    /// 呼び出し側が渡したフレームポインタ（トラップフレームに保存された値など）
    Fixed(usize),
}

impl FrameOrigin {
    /// 開始フレームポインタを取得
    #[inline(always)]
    pub fn frame_pointer(&self) -> usize {
        match *self {
            FrameOrigin::Live => arch::read_frame_pointer(),
            FrameOrigin::Fixed(frame_pointer) => frame_pointer,
        }
    }
}

/// モニタの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// 入力プロンプト
    pub prompt: &'static str,
    /// バックトレースの最大フレーム数（`None` で番兵まで無制限）
    pub max_frames: Option<usize>,
    /// `kerninfo` で表示するカーネル配置
    pub layout: KernelLayout,
    frame_origin: FrameOrigin,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT,
            max_frames: Some(DEFAULT_MAX_FRAMES),
            layout: KernelLayout::default(),
            frame_origin: FrameOrigin::Live,
        }
    }
}

impl MonitorConfig {
    /// バックトレースを固定のフレームポインタから開始する
    ///
    /// # Safety
    /// `frame_pointer` から辿れるフレームチェーンが、モニタが使われる間
    /// 読み出し可能であること（`FrameWalker::new` と同じ契約）。
    pub unsafe fn with_fixed_frame(mut self, frame_pointer: usize) -> Self {
        self.frame_origin = FrameOrigin::Fixed(frame_pointer);
        self
    }

    /// 実行中のフレームポインタから開始する（既定）
    pub fn with_live_frame(mut self) -> Self {
        self.frame_origin = FrameOrigin::Live;
        self
    }

    pub fn frame_origin(&self) -> FrameOrigin {
        self.frame_origin
    }
}
