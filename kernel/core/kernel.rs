// AetherOS カーネルイメージ配置情報
//
// `kerninfo` コマンドが表示する特殊シンボル（リンカが定義する境界アドレス）を保持します。

/// カーネルイメージの配置
///
/// すべて仮想アドレス。`start` だけはブートローダがジャンプする物理アドレスで、
/// 表示時も変換しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelLayout {
    /// `_start`（物理アドレス）
    pub start: usize,
    /// カーネルエントリポイント
    pub entry: usize,
    /// テキストセクション終端
    pub etext: usize,
    /// 初期化済みデータ終端
    pub edata: usize,
    /// カーネルイメージ終端（BSS含む）
    pub end: usize,
    /// 仮想アドレス = 物理アドレス + `kernel_base`
    pub kernel_base: usize,
}

impl KernelLayout {
    /// リンカスクリプトが定義するシンボルから配置を取得
    #[cfg(target_os = "none")]
    pub fn linked(kernel_base: usize) -> Self {
        extern "C" {
            static _start: u8;
            static entry: u8;
            static etext: u8;
            static edata: u8;
            static end: u8;
        }

        // シンボルのアドレスだけを使い、中身は読まない
        unsafe {
            Self {
                start: core::ptr::addr_of!(_start) as usize,
                entry: core::ptr::addr_of!(entry) as usize,
                etext: core::ptr::addr_of!(etext) as usize,
                edata: core::ptr::addr_of!(edata) as usize,
                end: core::ptr::addr_of!(end) as usize,
                kernel_base,
            }
        }
    }

    /// 仮想アドレスを物理アドレスに変換
    pub fn phys(&self, virt: usize) -> usize {
        virt.wrapping_sub(self.kernel_base)
    }

    /// 実行イメージのメモリ使用量（KB、切り上げ）
    pub fn footprint_kib(&self) -> usize {
        let size = self.end.saturating_sub(self.entry);
        size / 1024 + usize::from(size % 1024 != 0)
    }
}
