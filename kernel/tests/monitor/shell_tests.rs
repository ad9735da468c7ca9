// シェルループテスト

use std::collections::VecDeque;
use core::fmt;

use pretty_assertions::assert_eq;

use crate::core::debug::symbols::NoDebugInfo;
use crate::core::monitor::readline::LineBuffer;
use crate::core::monitor::{LineReader, Monitor, MonitorConfig, ReadLine, Signal};

const BANNER: &str = "Welcome to the AetherOS kernel monitor!\nType 'help' for a list of commands.\n";

/// 用意した読み取り結果を順に返す入力元（使い切ったら Closed）
struct ScriptedReader {
    results: VecDeque<ReadLine>,
    reads: usize,
}

impl ScriptedReader {
    fn new(results: impl IntoIterator<Item = ReadLine>) -> Self {
        Self { results: results.into_iter().collect(), reads: 0 }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str, echo: &mut dyn fmt::Write) -> ReadLine {
        self.reads += 1;
        echo.write_str(prompt).unwrap();
        self.results.pop_front().unwrap_or(ReadLine::Closed)
    }
}

fn line(text: &str) -> ReadLine {
    let mut buffer = LineBuffer::new();
    buffer.push_str(text).unwrap();
    ReadLine::Line(buffer)
}

#[test]
fn test_help_session_lists_commands_in_order() {
    let mut out = String::new();
    let mut reader = ScriptedReader::new([line("help\n")]);

    let signal = Monitor::new(&mut out, &NoDebugInfo, MonitorConfig::default()).run(&mut reader);

    assert_eq!(signal, Signal::Continue);
    let listing = out
        .strip_prefix(BANNER)
        .and_then(|rest| rest.strip_prefix("K> "))
        .and_then(|rest| rest.strip_suffix("K> "))
        .unwrap();

    let names: Vec<&str> = listing
        .lines()
        .filter_map(|l| l.split_once(" - ").map(|(name, _)| name))
        .collect();
    assert_eq!(names, ["help", "kerninfo", "backtrace"]);
    assert!(listing.contains("kerninfo - Display information about the kernel - usage:\nkerninfo\n"));
}

#[test]
fn test_empty_reads_keep_the_loop_running() {
    let mut out = String::new();
    let mut reader = ScriptedReader::new([ReadLine::Empty, ReadLine::Empty, line("bogus")]);

    let signal = Monitor::new(&mut out, &NoDebugInfo, MonitorConfig::default()).run(&mut reader);

    assert_eq!(signal, Signal::Continue);
    assert_eq!(reader.reads, 4);
    assert_eq!(out, format!("{}K> K> K> Unknown command 'bogus'\nK> ", BANNER));
}

#[test]
fn test_errors_do_not_stop_the_loop() {
    let mut out = String::new();
    let too_many = vec!["x"; 17].join(" ");
    let mut reader = ScriptedReader::new([line(&too_many), line("nosuchcmd"), line("help help")]);

    Monitor::new(&mut out, &NoDebugInfo, MonitorConfig::default()).run(&mut reader);

    assert!(out.contains("Too many arguments (max 16)\n"));
    assert!(out.contains("Unknown command 'nosuchcmd'\n"));
    assert!(out.contains("help - Display this list of commands or one of the command - help\nhelp <command>\n"));
    assert_eq!(reader.reads, 4);
}

#[test]
fn test_custom_prompt_is_used() {
    let mut out = String::new();
    let mut reader = ScriptedReader::new([]);
    let mut config = MonitorConfig::default();
    config.prompt = "aether> ";

    Monitor::new(&mut out, &NoDebugInfo, config).run(&mut reader);

    assert_eq!(out, format!("{}aether> ", BANNER));
}

/// 最初の何回かの書き込みに失敗するコンソール
struct FlakyConsole {
    failures_left: usize,
    out: String,
}

impl fmt::Write for FlakyConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(fmt::Error);
        }
        self.out.push_str(s);
        Ok(())
    }
}

#[test]
fn test_banner_write_failure_does_not_stop_the_loop() {
    let mut console = FlakyConsole { failures_left: 1, out: String::new() };
    let mut reader = ScriptedReader::new([line("kerninfo")]);

    let signal = Monitor::new(&mut console, &NoDebugInfo, MonitorConfig::default()).run(&mut reader);

    assert_eq!(signal, Signal::Continue);
    assert_eq!(reader.reads, 2);
    // バナーは出せなくてもコマンドは実行される
    assert!(console.out.starts_with("K> Special kernel symbols:\n"));
    assert!(console.out.ends_with("KB\nK> "));
}
