// AetherOS シンボル解決
//
// 命令アドレスから関数名・ソースファイル・行番号を引くためのインターフェースと、
// ビルド時に生成される静的シンボルテーブルによる実装。

/// アドレスに対応するデバッグ情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo<'a> {
    /// 定義元ソースファイル
    pub file: &'a str,
    /// 行番号
    pub line: u32,
    /// 関数名を先頭に含むバッファ（`"foo:F(0,1)"` のように後ろに余分な文字が続くことがある）
    pub function_name: &'a str,
    /// 関数名として有効なバイト数
    pub function_name_len: usize,
    /// 関数の先頭アドレス
    pub function_start: usize,
}

impl<'a> SymbolInfo<'a> {
    /// 関数名（`function_name_len` バイトちょうど、バッファ長で打ち切り）
    pub fn name(&self) -> &'a str {
        let mut len = self.function_name_len.min(self.function_name.len());
        while !self.function_name.is_char_boundary(len) {
            len -= 1;
        }
        &self.function_name[..len]
    }

    /// 関数先頭からのバイトオフセット
    pub fn offset_of(&self, address: usize) -> usize {
        address.wrapping_sub(self.function_start)
    }
}

/// アドレスからデバッグ情報を解決するリゾルバ
///
/// 見つからない場合は `None` を返す。デバッグ情報を持たないコードのフレームでは
/// 普通に起こることで、エラーではない。
pub trait DebugInfoResolver {
    fn resolve(&self, address: usize) -> Option<SymbolInfo<'_>>;
}

impl<R: DebugInfoResolver + ?Sized> DebugInfoResolver for &R {
    fn resolve(&self, address: usize) -> Option<SymbolInfo<'_>> {
        (**self).resolve(address)
    }
}

/// デバッグ情報なし（常に未解決）
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDebugInfo;

impl DebugInfoResolver for NoDebugInfo {
    fn resolve(&self, _address: usize) -> Option<SymbolInfo<'_>> {
        None
    }
}

/// 行番号テーブルの1エントリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    /// この行の先頭命令アドレス
    pub address: usize,
    pub line: u32,
}

/// 関数1つ分のシンボル情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionRecord<'a> {
    /// 関数の先頭アドレス
    pub start: usize,
    /// 関数の終端アドレス（この値は含まない）
    pub end: usize,
    pub name: &'a str,
    pub name_len: usize,
    pub file: &'a str,
    /// 関数宣言の行
    pub line: u32,
    /// アドレス昇順の行番号テーブル
    pub lines: &'a [LineRecord],
}

/// 静的シンボルテーブル
///
/// 関数は先頭アドレス昇順に並び、範囲が重ならないこと。
#[derive(Debug, Clone, Copy)]
pub struct SymbolTable<'a> {
    functions: &'a [FunctionRecord<'a>],
}

impl<'a> SymbolTable<'a> {
    /// 並び順を検証してテーブルを作成
    pub fn new(functions: &'a [FunctionRecord<'a>]) -> Result<Self, &'static str> {
        if functions.iter().any(|f| f.start >= f.end) {
            return Err("関数の範囲が空です");
        }
        if functions.windows(2).any(|pair| pair[0].end > pair[1].start) {
            return Err("関数が先頭アドレス順に並んでいないか、範囲が重なっています");
        }
        if functions
            .iter()
            .any(|f| f.lines.windows(2).any(|pair| pair[0].address > pair[1].address))
        {
            return Err("行番号テーブルがアドレス順に並んでいません");
        }
        Ok(Self { functions })
    }

    /// 登録されている関数の数
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// アドレスを含む関数を探す
    fn function_at(&self, address: usize) -> Option<&'a FunctionRecord<'a>> {
        let index = self.functions.partition_point(|f| f.start <= address);
        let function = self.functions.get(index.checked_sub(1)?)?;
        (address < function.end).then_some(function)
    }
}

impl DebugInfoResolver for SymbolTable<'_> {
    fn resolve(&self, address: usize) -> Option<SymbolInfo<'_>> {
        let function = self.function_at(address)?;

        let line = match function.lines.partition_point(|l| l.address <= address) {
            0 => function.line,
            n => function.lines[n - 1].line,
        };

        Some(SymbolInfo {
            file: function.file,
            line,
            function_name: function.name,
            function_name_len: function.name_len,
            function_start: function.start,
        })
    }
}
