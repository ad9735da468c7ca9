// ドライバーサブシステムモジュール
// AetherOS カーネルモニタ用デバイスドライバー
// 作成者: AetherOSチーム

//! # デバイスドライバー
//!
//! モニタのコンソール入出力に使うドライバーを提供します。
//! 現在は16550A UARTシリアルポートのみ（x86_64のポートI/Oが必要）。

#[cfg(target_arch = "x86_64")]
pub mod serial;
