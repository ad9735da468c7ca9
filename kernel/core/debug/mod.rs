//! カーネルデバッグ支援
//!
//! フレームポインタチェーンを辿るスタック巻き戻し、アドレスからのシンボル解決、
//! `log` クレート向けのコンソールロガーを提供します。

pub mod backtrace;
pub mod logger;
pub mod symbols;
