// コマンドハンドラーモジュール

pub mod check;
pub mod drop_statement_formatter;
pub mod generate;

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;

/// コマンド出力の共通インターフェース
///
/// テキスト出力は `to_text`、JSON出力は `Serialize` の実装で表現します。
pub trait CommandOutput: Serialize {
    /// テキスト形式の出力を生成
    fn to_text(&self) -> String;
}

/// 出力フォーマットに応じて出力を文字列化
pub fn render_output<T: CommandOutput>(output: &T, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(output.to_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(output).with_context(|| "Failed to serialize output as JSON")
        }
    }
}
