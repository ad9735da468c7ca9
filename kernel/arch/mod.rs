// AetherOS アーキテクチャ抽象化レイヤー
//
// モニタが必要とするアーキテクチャ依存処理を提供します。
// フレームポインタの取得と、バックトレース表示で使うレジスタ名を扱います。

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

/// フレームポインタレジスタの表示名
#[cfg(target_arch = "x86_64")]
pub const FRAME_POINTER_LABEL: &str = "rbp";
#[cfg(target_arch = "x86")]
pub const FRAME_POINTER_LABEL: &str = "ebp";
#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
pub const FRAME_POINTER_LABEL: &str = "fp";

/// リターンアドレスの表示名
#[cfg(target_arch = "x86_64")]
pub const RETURN_ADDRESS_LABEL: &str = "rip";
#[cfg(target_arch = "x86")]
pub const RETURN_ADDRESS_LABEL: &str = "eip";
#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
pub const RETURN_ADDRESS_LABEL: &str = "ra";

/// 現在のフレームポインタを取得
///
/// `[fp]` に呼び出し元のフレームポインタ、`[fp + 1ワード]` にリターンアドレスが
/// 置かれるフレーム規約（x86、x86_64、AArch64）でのみ実際の値を返します。
/// それ以外のアーキテクチャでは番兵値 0 を返すため、バックトレースは空になります。
///
/// 値が意味を持つのは `-C force-frame-pointers=yes` でビルドした場合のみです
/// （`.cargo/config.toml` で指定）。指定がないと最適化ビルドでは rbp が
/// 汎用レジスタとして使われ、チェーンの先頭になりません。
#[inline(always)]
pub fn read_frame_pointer() -> usize {
    let frame_pointer: usize;

    #[cfg(target_arch = "x86_64")]
    unsafe {
        core::arch::asm!("mov {}, rbp", out(reg) frame_pointer, options(nomem, nostack, preserves_flags));
    }

    #[cfg(target_arch = "x86")]
    unsafe {
        core::arch::asm!("mov {}, ebp", out(reg) frame_pointer, options(nomem, nostack, preserves_flags));
    }

    #[cfg(target_arch = "aarch64")]
    unsafe {
        core::arch::asm!("mov {}, x29", out(reg) frame_pointer, options(nomem, nostack, preserves_flags));
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
    {
        frame_pointer = 0;
    }

    frame_pointer
}
