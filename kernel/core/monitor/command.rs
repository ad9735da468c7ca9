// モニタコマンド
//
// コマンド名から処理関数を引く静的テーブルと、組み込みコマンドの実装。

use core::fmt;

use super::error::MonitorError;
use super::{MonitorContext, Signal};
use crate::core::debug::backtrace::{print_backtrace, FrameWalker, WORD_HEX_WIDTH};

/// コマンド処理関数
///
/// `argv[0]` はコマンド名。`Signal::Exit` を返すとモニタを終了する。
pub type Handler = fn(&[&str], &mut MonitorContext<'_>) -> Signal;

/// モニタコマンド
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: Handler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// コマンドテーブル（名前は一意）
pub static COMMANDS: [Command; 3] = [
    Command {
        name: "help",
        description: "Display this list of commands or one of the command",
        usage: "help\nhelp <command>",
        handler: help,
    },
    Command {
        name: "kerninfo",
        description: "Display information about the kernel",
        usage: "kerninfo",
        handler: kerninfo,
    },
    Command {
        name: "backtrace",
        description: "Display backtrace info",
        usage: "backtrace",
        handler: backtrace,
    },
];

/// 名前でコマンドを探す（大文字小文字を区別する完全一致）
pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.name == name)
}

/// 出力に失敗しても次の入力は受け付ける
fn finish(result: fmt::Result) -> Signal {
    if result.is_err() {
        log::warn!("{}", MonitorError::Console);
    }
    Signal::Continue
}

/// `help` / `help <command>`
fn help(argv: &[&str], ctx: &mut MonitorContext<'_>) -> Signal {
    let out = &mut *ctx.console;
    let result = match argv {
        [_] => COMMANDS.iter().try_for_each(|command| {
            writeln!(out, "{} - {} - usage:\n{}", command.name, command.description, command.usage)
        }),
        [_, name] => match find(name) {
            Some(command) => {
                writeln!(out, "{} - {} - {}", command.name, command.description, command.usage)
            }
            None => writeln!(out, "{}", MonitorError::UnknownCommand(*name)),
        },
        _ => writeln!(out, "help usage:\n{}", COMMANDS[0].usage),
    };
    finish(result)
}

/// `kerninfo`
fn kerninfo(_argv: &[&str], ctx: &mut MonitorContext<'_>) -> Signal {
    let layout = ctx.config.layout;
    let out = &mut *ctx.console;
    let w = WORD_HEX_WIDTH;

    let result = (|| -> fmt::Result {
        writeln!(out, "Special kernel symbols:")?;
        writeln!(out, "  _start                  {:0w$x} (phys)", layout.start)?;
        for (name, virt) in [
            ("entry", layout.entry),
            ("etext", layout.etext),
            ("edata", layout.edata),
            ("end", layout.end),
        ] {
            writeln!(out, "  {:<6} {:0w$x} (virt)  {:0w$x} (phys)", name, virt, layout.phys(virt))?;
        }
        writeln!(out, "Kernel executable memory footprint: {}KB", layout.footprint_kib())
    })();
    finish(result)
}

/// `backtrace`
fn backtrace(_argv: &[&str], ctx: &mut MonitorContext<'_>) -> Signal {
    let frame_pointer = ctx.config.frame_origin().frame_pointer();
    // SAFETY: 実行中のフレームポインタはコンパイラが組んだチェーンの先頭。
    // 固定値は `MonitorConfig::with_fixed_frame` の契約で読み出し可能が保証される。
    let walker = unsafe { FrameWalker::new(frame_pointer) }.with_limit(ctx.config.max_frames);
    finish(print_backtrace(&mut *ctx.console, walker, ctx.resolver))
}
