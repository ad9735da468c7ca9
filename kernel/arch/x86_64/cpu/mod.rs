// AetherOS x86_64 CPUサポート
//
// I/Oポート命令など、ドライバから直接使うCPU命令のラッパーを提供します。

pub mod io;
