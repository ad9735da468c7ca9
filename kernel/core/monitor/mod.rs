//! # カーネルモニタ
//!
//! カーネルを停止させたまま状態を調べるための対話型シェル。
//! 入力行を単語に分解し、コマンドテーブルから処理関数を引いて実行する。
//!
//! ```text
//! シェルループ -> ディスパッチャ -> help / kerninfo / backtrace
//!                                                 └ FrameWalker + DebugInfoResolver
//! ```
//!
//! すべて単一スレッドで動き、ブロックするのは行入力の待ち合わせだけ。

pub mod command;
pub mod config;
pub mod error;
pub mod parser;
pub mod readline;

use core::fmt;

use crate::core::debug::symbols::DebugInfoResolver;

pub use self::config::{FrameOrigin, MonitorConfig};
pub use self::error::MonitorError;
pub use self::readline::{LineReader, ReadLine};

/// コマンド処理後にシェルループへ返す指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// 次の入力を待つ
    Continue,
    /// モニタを終了する
    Exit,
}

impl Signal {
    /// 整数の戻り値から変換（負の値は終了）
    pub fn from_code(code: i32) -> Self {
        if code < 0 {
            Signal::Exit
        } else {
            Signal::Continue
        }
    }

    /// 整数の戻り値に変換
    pub fn code(self) -> i32 {
        match self {
            Signal::Continue => 0,
            Signal::Exit => -1,
        }
    }

    pub fn is_exit(self) -> bool {
        self == Signal::Exit
    }
}

/// コマンド処理関数に渡す実行コンテキスト
pub struct MonitorContext<'a> {
    /// 出力先
    pub console: &'a mut dyn fmt::Write,
    /// シンボル解決
    pub resolver: &'a dyn DebugInfoResolver,
    /// モニタ設定
    pub config: &'a MonitorConfig,
}

/// カーネルモニタ
pub struct Monitor<'a> {
    console: &'a mut dyn fmt::Write,
    resolver: &'a dyn DebugInfoResolver,
    config: MonitorConfig,
}

impl<'a> Monitor<'a> {
    /// 新しいモニタを作成
    pub fn new(
        console: &'a mut dyn fmt::Write,
        resolver: &'a dyn DebugInfoResolver,
        config: MonitorConfig,
    ) -> Self {
        Self {
            console,
            resolver,
            config,
        }
    }

    /// 1行を解釈して実行する
    ///
    /// 引数過多や未知のコマンドはコンソールに報告して `Continue` を返す。
    pub fn run_command(&mut self, line: &str) -> Signal {
        match self.dispatch(line) {
            Ok(signal) => signal,
            Err(err) => {
                log::debug!("モニタコマンドを実行できません: {}", err);
                if writeln!(self.console, "{}", err).is_err() {
                    log::warn!("{}", MonitorError::Console);
                }
                Signal::Continue
            }
        }
    }

    fn dispatch<'l>(&mut self, line: &'l str) -> Result<Signal, MonitorError<'l>> {
        let argv = parser::tokenize(line)?;
        let Some(&name) = argv.first() else {
            return Ok(Signal::Continue);
        };
        let command = command::find(name).ok_or(MonitorError::UnknownCommand(name))?;

        log::debug!("モニタコマンド実行: {} ({} 引数)", command.name, argv.len() - 1);
        let mut ctx = MonitorContext {
            console: &mut *self.console,
            resolver: self.resolver,
            config: &self.config,
        };
        Ok((command.handler)(&argv, &mut ctx))
    }

    fn write_banner(&mut self) -> fmt::Result {
        writeln!(self.console, "Welcome to the AetherOS kernel monitor!")?;
        writeln!(self.console, "Type 'help' for a list of commands.")
    }

    /// 入力が閉じるか、コマンドが終了を指示するまで実行を続ける
    ///
    /// 戻り値は停止理由。入力終了なら `Continue`、終了指示なら `Exit`。
    pub fn run(&mut self, reader: &mut dyn LineReader) -> Signal {
        if self.write_banner().is_err() {
            log::warn!("{}", MonitorError::Console);
        }

        loop {
            match reader.read_line(self.config.prompt, &mut *self.console) {
                ReadLine::Line(line) => {
                    if self.run_command(&line).is_exit() {
                        log::debug!("モニタを終了します");
                        return Signal::Exit;
                    }
                }
                ReadLine::Empty => continue,
                ReadLine::Closed => {
                    log::debug!("モニタの入力が閉じました");
                    return Signal::Continue;
                }
            }
        }
    }
}

/// シリアルコンソール上でモニタを起動する
///
/// トラップハンドラやパニック処理から呼び出す。入力が閉じるか、
/// コマンドが終了を指示するまで戻らない。
#[cfg(target_arch = "x86_64")]
pub fn enter(resolver: &dyn DebugInfoResolver, config: MonitorConfig) -> Signal {
    use crate::drivers::serial::SerialConsole;
    use self::readline::SerialLineReader;

    let mut console = SerialConsole;
    let mut reader = SerialLineReader::new(SerialConsole);
    Monitor::new(&mut console, resolver, config).run(&mut reader)
}
