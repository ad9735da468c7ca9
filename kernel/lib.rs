// AetherOS カーネルモニタ
//
// トラップや割り込みでカーネルを停止させたまま、オペレータが内部状態を
// 調査するための対話型診断シェル。中核はフレームポインタチェーンを辿って
// 呼び出し履歴を復元するスタックバックトレースエンジン。

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod core;
pub mod drivers;


pub use crate::core::debug::backtrace::{print_backtrace, CallFrame, FrameWalker};
pub use crate::core::debug::symbols::{DebugInfoResolver, NoDebugInfo, SymbolInfo, SymbolTable};
pub use crate::core::kernel::KernelLayout;
pub use crate::core::monitor::{Monitor, MonitorConfig, MonitorContext, Signal};
