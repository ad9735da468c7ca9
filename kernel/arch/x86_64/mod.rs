// AetherOS x86_64アーキテクチャサポート
//
// モニタのシリアルコンソールが使うx86_64固有の機能を実装します。

pub mod cpu;        // CPU固有コード
