// AetherOS コンソールロガー
//
// `log` ファサードの出力先をシリアルコンソールにするバックエンド。
// シリアルへの出力は `debug-serial` 機能で有効になる。

use core::fmt;

/// ログレコードを1行に整形して出力
pub fn write_record(out: &mut dyn fmt::Write, record: &log::Record) -> fmt::Result {
    write!(out, "[{:>5}] {}\r\n", record.level(), record.args())
}

#[cfg(all(target_arch = "x86_64", feature = "debug-serial"))]
pub use self::serial_logger::init_logger;

#[cfg(all(target_arch = "x86_64", feature = "debug-serial"))]
mod serial_logger {
    use super::write_record;
    use crate::drivers::serial::SerialConsole;

    /// シリアルコンソールロガー
    static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

    struct ConsoleLogger;

    impl log::Log for ConsoleLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                let _ = write_record(&mut SerialConsole, record);
            }
        }

        fn flush(&self) {}
    }

    /// ロガーを登録し、出力レベルを設定
    pub fn init_logger(level: log::LevelFilter) -> Result<(), &'static str> {
        log::set_logger(&CONSOLE_LOGGER).map_err(|_| "ロガーは既に設定されています")?;
        log::set_max_level(level);
        Ok(())
    }
}
