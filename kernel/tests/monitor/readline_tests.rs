// 行入力テスト

use std::collections::VecDeque;

use pretty_assertions::assert_eq;

use crate::core::monitor::readline::{
    CharDevice, LineBuffer, LineReader, ReadLine, SerialLineReader, CMDBUF_SIZE,
};

/// 用意したバイト列を順に返すデバイス（使い切ったら Ctrl-D）
struct ScriptedDevice {
    bytes: VecDeque<u8>,
}

impl CharDevice for ScriptedDevice {
    fn receive(&mut self) -> u8 {
        self.bytes.pop_front().unwrap_or(0x04)
    }
}

fn reader(input: &[u8]) -> SerialLineReader<ScriptedDevice> {
    SerialLineReader::new(ScriptedDevice { bytes: input.iter().copied().collect() })
}

fn line(text: &str) -> ReadLine {
    let mut buffer = LineBuffer::new();
    buffer.push_str(text).unwrap();
    ReadLine::Line(buffer)
}

#[test]
fn test_carriage_return_ends_line_and_echoes() {
    let mut echo = String::new();
    let result = reader(b"help\r").read_line("K> ", &mut echo);

    assert_eq!(result, line("help"));
    assert_eq!(echo, "K> help\n");
}

#[test]
fn test_backspace_and_delete_erase() {
    let mut echo = String::new();
    let result = reader(b"hx\x08elpp\x7f\n").read_line("", &mut echo);

    assert_eq!(result, line("help"));
    assert_eq!(echo, "hx\x08 \x08elpp\x08 \x08\n");
}

#[test]
fn test_backspace_on_empty_line_is_ignored() {
    let mut echo = String::new();
    let result = reader(b"\x08\x08ok\n").read_line("", &mut echo);

    assert_eq!(result, line("ok"));
    assert_eq!(echo, "ok\n");
}

#[test]
fn test_ctrl_d_on_empty_line_closes_input() {
    let mut echo = String::new();
    assert_eq!(reader(b"\x04").read_line("K> ", &mut echo), ReadLine::Closed);
}

#[test]
fn test_ctrl_d_inside_line_is_ignored() {
    let mut echo = String::new();
    assert_eq!(reader(b"ab\x04\n").read_line("", &mut echo), line("ab"));
}

#[test]
fn test_ctrl_c_discards_line() {
    let mut echo = String::new();
    let mut reader = reader(b"backt\x03kerninfo\n");

    assert_eq!(reader.read_line("K> ", &mut echo), ReadLine::Empty);
    assert_eq!(reader.read_line("K> ", &mut echo), line("kerninfo"));
    assert_eq!(echo, "K> backt^C\nK> kerninfo\n");
}

#[test]
fn test_bare_newline_is_empty_line() {
    let mut echo = String::new();
    assert_eq!(reader(b"\r").read_line("", &mut echo), line(""));
}

#[test]
fn test_overlong_input_is_truncated_to_buffer() {
    let mut input = vec![b'a'; CMDBUF_SIZE + 20];
    input.push(b'\n');
    let mut echo = String::new();

    match reader(&input).read_line("", &mut echo) {
        ReadLine::Line(text) => assert_eq!(text.len(), CMDBUF_SIZE),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(echo.len(), CMDBUF_SIZE + 1);
}

#[test]
fn test_control_and_non_ascii_bytes_are_dropped() {
    let mut echo = String::new();
    assert_eq!(reader(b"\x1bh\xc3\xa9i\x07\n").read_line("", &mut echo), line("hi"));
}
