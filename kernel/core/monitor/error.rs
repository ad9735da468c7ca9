// モニタのエラー

use core::fmt;

/// コマンド実行前に検出されるエラー
///
/// どれもモニタを止める原因にはならず、報告したあと次の入力を待つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError<'a> {
    /// 引数が多すぎる（コマンド名を含めて `max` 個まで）
    TooManyArguments { max: usize },
    /// 該当するコマンドがない
    UnknownCommand(&'a str),
    /// コンソールへの書き込み失敗
    Console,
}

impl fmt::Display for MonitorError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::TooManyArguments { max } => write!(f, "Too many arguments (max {})", max),
            MonitorError::UnknownCommand(name) => write!(f, "Unknown command '{}'", name),
            MonitorError::Console => write!(f, "console write failed"),
        }
    }
}

impl From<fmt::Error> for MonitorError<'_> {
    fn from(_: fmt::Error) -> Self {
        MonitorError::Console
    }
}
