// AetherOS カーネルコアモジュール
//
// モニタの中核機能を提供するサブシステム

pub mod debug;
pub mod kernel;
pub mod monitor;
