// モニタの行入力
//
// シェルループが1行ずつ入力を受け取るためのインターフェースと、
// 1文字単位のデバイス（シリアルポートなど）上の簡易行編集。

use core::fmt;

use heapless::String;

/// 入力行バッファのサイズ（VGAテキスト1行分）
pub const CMDBUF_SIZE: usize = 80;

/// 入力行
pub type LineBuffer = String<CMDBUF_SIZE>;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;

/// 1回の行読み取りの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    /// 1行入力された
    Line(LineBuffer),
    /// 今回は入力がない（行の取り消しなど）
    Empty,
    /// 入力元が閉じた
    Closed,
}

/// 行入力元
pub trait LineReader {
    /// プロンプトを表示して1行読む（入力があるまでブロックする）
    ///
    /// `echo` はプロンプトとエコーバックの出力先。
    fn read_line(&mut self, prompt: &str, echo: &mut dyn fmt::Write) -> ReadLine;
}

/// 1バイトずつ受信するデバイス
pub trait CharDevice {
    /// 1バイト受信（ブロッキング）
    fn receive(&mut self) -> u8;
}

/// `CharDevice` 上の簡易行編集
///
/// - 表示可能なASCII文字をエコーしてバッファに追加（あふれた分は捨てる）
/// - BS / DEL で1文字削除
/// - CR / LF で行を確定
/// - 空行での Ctrl-D は入力終了、Ctrl-C は行の取り消し
pub struct SerialLineReader<D: CharDevice> {
    device: D,
}

impl<D: CharDevice> SerialLineReader<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }
}

impl<D: CharDevice> LineReader for SerialLineReader<D> {
    fn read_line(&mut self, prompt: &str, echo: &mut dyn fmt::Write) -> ReadLine {
        // エコーはベストエフォート
        let _ = echo.write_str(prompt);
        let mut line = LineBuffer::new();

        loop {
            match self.device.receive() {
                b'\r' | b'\n' => {
                    let _ = echo.write_char('\n');
                    return ReadLine::Line(line);
                }
                BACKSPACE | DELETE => {
                    if line.pop().is_some() {
                        let _ = echo.write_str("\x08 \x08");
                    }
                }
                CTRL_D if line.is_empty() => return ReadLine::Closed,
                CTRL_C => {
                    let _ = echo.write_str("^C\n");
                    return ReadLine::Empty;
                }
                byte @ 0x20..=0x7e => {
                    if line.push(char::from(byte)).is_ok() {
                        let _ = echo.write_char(char::from(byte));
                    }
                }
                _ => {}
            }
        }
    }
}
