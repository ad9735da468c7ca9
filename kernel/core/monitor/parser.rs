// コマンド行の字句解析

use heapless::Vec;

use super::error::MonitorError;

/// 1行の最大引数数（コマンド名を含む）
pub const MAX_ARGS: usize = 16;

/// 区切り文字
pub const WHITESPACE: &[char] = &['\t', '\r', '\n', ' '];

/// 入力行の単語列（入力行への参照）
pub type Argv<'a> = Vec<&'a str, MAX_ARGS>;

/// 入力行を空白で区切って単語に分解する
///
/// 連続する空白は1つの区切りとして扱い、空の単語は作らない。
/// 単語が `MAX_ARGS` を超えたら `TooManyArguments` を返す。
pub fn tokenize(line: &str) -> Result<Argv<'_>, MonitorError<'_>> {
    let mut argv = Argv::new();
    for word in line.split(WHITESPACE).filter(|word| !word.is_empty()) {
        argv.push(word)
            .map_err(|_| MonitorError::TooManyArguments { max: MAX_ARGS })?;
    }
    Ok(argv)
}
