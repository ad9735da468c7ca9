// シリアルポートドライバ
//
// 16550A UARTシリアルポートデバイスドライバ実装
// モニタのコンソール（入力・出力）とログ出力先を兼ねる。

use core::fmt;
use bitflags::bitflags;
use lazy_static::lazy_static;
use spin::Mutex;

use crate::arch::x86_64::cpu::io::{inb, outb};
use crate::core::monitor::readline::CharDevice;

/// COM1のベースアドレス (I/Oポート)
pub const COM1_PORT: u16 = 0x3F8;

/// UARTの基準クロック（除数1のときのボーレート）
const UART_BASE_BAUD: u32 = 115200;

/// UARTレジスタオフセット
const REG_DATA: u16 = 0;        // データレジスタ (RW)
const REG_INT_ENABLE: u16 = 1;  // 割り込み有効レジスタ (RW)
const REG_FIFO_CTRL: u16 = 2;   // FIFOコントロールレジスタ (W)
const REG_LINE_CTRL: u16 = 3;   // ライン制御レジスタ (RW)
const REG_MODEM_CTRL: u16 = 4;  // モデム制御レジスタ (RW)
const REG_LINE_STATUS: u16 = 5; // ラインステータスレジスタ (R)

bitflags! {
    /// ラインステータスレジスタビット
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u8 {
        /// データ受信準備完了
        const DATA_READY = 0x01;
        /// オーバーランエラー
        const OVERRUN_ERROR = 0x02;
        /// パリティエラー
        const PARITY_ERROR = 0x04;
        /// フレーミングエラー
        const FRAMING_ERROR = 0x08;
        /// 中断インジケータ
        const BREAK_INDICATOR = 0x10;
        /// 送信ホールディングレジスタ空
        const THR_EMPTY = 0x20;
        /// 送信シフトレジスタとTHR両方空
        const TRANSMITTER_EMPTY = 0x40;
        /// FIFOエラー
        const FIFO_ERROR = 0x80;
    }
}

impl LineStatus {
    /// 受信エラーがあればその説明を返す
    pub fn error_message(self) -> Option<&'static str> {
        if self.contains(LineStatus::OVERRUN_ERROR) {
            Some("オーバーランエラー")
        } else if self.contains(LineStatus::PARITY_ERROR) {
            Some("パリティエラー")
        } else if self.contains(LineStatus::FRAMING_ERROR) {
            Some("フレーミングエラー")
        } else if self.contains(LineStatus::BREAK_INDICATOR) {
            Some("中断インジケータ")
        } else if self.contains(LineStatus::FIFO_ERROR) {
            Some("FIFOエラー")
        } else {
            None
        }
    }

    /// 受信したバイトを検査する
    ///
    /// 受信エラーを伴うバイトは使わず、エラーの説明を返す。
    pub fn check_received(self, byte: u8) -> Result<u8, &'static str> {
        match self.error_message() {
            Some(reason) => Err(reason),
            None => Ok(byte),
        }
    }
}

/// パリティ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// パリティなし
    None,
    /// 奇数パリティ
    Odd,
    /// 偶数パリティ
    Even,
}

/// ストップビット設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// シリアルデバイスの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// ボーレート
    pub baud_rate: u32,
    /// データビット (5-8)
    pub data_bits: u8,
    /// パリティビット
    pub parity: Parity,
    /// ストップビット
    pub stop_bits: StopBits,
    /// FIFO有効化
    pub enable_fifo: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
            enable_fifo: true,
        }
    }
}

impl SerialConfig {
    /// ボーレート除数を計算
    pub fn divisor(&self) -> Result<u16, &'static str> {
        if self.baud_rate == 0 || self.baud_rate > UART_BASE_BAUD {
            return Err("サポートされていないボーレートです");
        }
        let divisor = UART_BASE_BAUD / self.baud_rate;
        u16::try_from(divisor).map_err(|_| "サポートされていないボーレートです")
    }

    /// ライン制御レジスタ (LCR) の値を計算
    pub fn line_control(&self) -> Result<u8, &'static str> {
        let mut line_config: u8 = match self.data_bits {
            5 => 0x00,
            6 => 0x01,
            7 => 0x02,
            8 => 0x03,
            _ => return Err("無効なデータビット数です"),
        };

        line_config |= match self.parity {
            Parity::None => 0x00,
            Parity::Odd => 0x08,
            Parity::Even => 0x18,
        };

        if self.stop_bits == StopBits::Two {
            line_config |= 0x04;
        }

        Ok(line_config)
    }
}

/// シリアルポートドライバ
pub struct SerialDriver {
    /// ベースポートアドレス
    base_address: u16,
    /// 初期化済みフラグ
    initialized: bool,
    /// 現在の設定
    config: SerialConfig,
}

impl SerialDriver {
    /// 新しいシリアルドライバを作成
    pub fn new(base_address: u16) -> Self {
        Self {
            base_address,
            initialized: false,
            config: SerialConfig::default(),
        }
    }

    /// シリアルポートを初期化
    pub fn initialize(&mut self, config: SerialConfig) -> Result<(), &'static str> {
        if self.initialized && self.config == config {
            return Ok(());
        }

        // レジスタに触れる前に設定を検証
        let divisor = config.divisor()?;
        let line_config = config.line_control()?;

        unsafe {
            // 割り込みを無効化
            self.write_register(REG_INT_ENABLE, 0x00);

            // DLAB（除数ラッチアクセスビット）を設定し、除数を書き込む
            self.write_register(REG_LINE_CTRL, 0x80);
            self.write_register(REG_DATA, (divisor & 0xFF) as u8);
            self.write_register(REG_INT_ENABLE, (divisor >> 8) as u8);

            // DLABを解除し、ラインコントロールを設定
            self.write_register(REG_LINE_CTRL, line_config);

            // FIFOを有効化（14バイト閾値）
            let fifo = if config.enable_fifo { 0xC7 } else { 0x00 };
            self.write_register(REG_FIFO_CTRL, fifo);

            // RTS/DTR有効化
            self.write_register(REG_MODEM_CTRL, 0x03);
        }

        self.config = config;
        self.initialized = true;
        Ok(())
    }

    /// レジスタから読み取り
    unsafe fn read_register(&self, reg: u16) -> u8 {
        inb(self.base_address + reg)
    }

    /// レジスタに書き込み
    unsafe fn write_register(&self, reg: u16, value: u8) {
        outb(self.base_address + reg, value);
    }

    /// ラインステータスを取得
    pub fn line_status(&self) -> LineStatus {
        LineStatus::from_bits_retain(unsafe { self.read_register(REG_LINE_STATUS) })
    }

    /// 1文字受信（ノンブロッキング）
    ///
    /// 受信エラーがあったバイトもデータレジスタから読み出して捨て、`Err` で返す。
    pub fn try_read_byte(&self) -> Option<Result<u8, &'static str>> {
        // ロック保持中に呼ばれるため、ここからログは出さない
        let status = self.line_status();
        if status.contains(LineStatus::DATA_READY) {
            let byte = unsafe { self.read_register(REG_DATA) };
            Some(status.check_received(byte))
        } else {
            None
        }
    }

    /// 1文字送信
    pub fn write_byte(&self, byte: u8) {
        // 送信バッファが空くまで待機
        while !self.line_status().contains(LineStatus::THR_EMPTY) {
            core::hint::spin_loop();
        }
        unsafe { self.write_register(REG_DATA, byte) }
    }

    /// 文字列送信
    /// 改行文字 `\n` は `\r\n` に変換して出力します。
    pub fn write_string(&self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
    }
}

lazy_static! {
    /// COM1シリアルポート（モニタのコンソール）
    pub static ref COM1: Mutex<SerialDriver> = {
        let mut driver = SerialDriver::new(COM1_PORT);
        // 既定設定は検証を必ず通る
        let _ = driver.initialize(SerialConfig::default());
        Mutex::new(driver)
    };
}

/// COM1を指すコンソールハンドル
///
/// 書き込みと読み取りのたびにCOM1のロックを取り直すため、
/// ログ出力とモニタ出力が同じポートを共有できる。
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConsole;

impl fmt::Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        COM1.lock().write_string(s);
        Ok(())
    }
}

impl CharDevice for SerialConsole {
    fn receive(&mut self) -> u8 {
        loop {
            // ログ出力もCOM1を使うため、ロックは文の終わりで解放する
            let received = COM1.lock().try_read_byte();
            match received {
                Some(Ok(byte)) => return byte,
                Some(Err(reason)) => log::warn!("受信データを破棄しました: {}", reason),
                None => core::hint::spin_loop(),
            }
        }
    }
}
