// checkコマンドハンドラー
//
// スキーマ差分を生成せずに検査し、レベルごとに有効なDROP文の有無と一覧を報告します。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::drop_statement_formatter::DropStatementFormatter;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::config::ScriptLevel;
use crate::services::alter_script_generator::{AlterScriptGenerator, GenerationOptions};
use crate::services::script_assembler::drop_statements;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// レベルごとの検査結果
#[derive(Debug, Clone, Serialize)]
pub struct LevelDropReport {
    pub level: ScriptLevel,
    pub contains_drop_statements: bool,
    pub drop_statements: Vec<String>,
}

/// checkコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    /// 差分に含まれる項目数
    pub change_count: usize,
    pub levels: Vec<LevelDropReport>,
    /// テキスト出力メッセージ
    #[serde(skip)]
    pub text_message: String,
}

impl CommandOutput for CheckOutput {
    fn to_text(&self) -> String {
        self.text_message.clone()
    }
}

/// checkコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct CheckCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 差分ファイルのパス
    pub delta_path: PathBuf,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// checkコマンドハンドラー
#[derive(Debug, Default)]
pub struct CheckCommandHandler {}

impl CheckCommandHandler {
    /// 新しいCheckCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// checkコマンドを実行
    pub fn execute(&self, command: &CheckCommand) -> Result<String> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let delta = context.read_delta(&command.delta_path)?;
        let generator = AlterScriptGenerator::new(GenerationOptions::from(&context.config));

        let levels: Vec<LevelDropReport> = [ScriptLevel::Entity, ScriptLevel::Container]
            .into_iter()
            .map(|level| {
                let drops = drop_statements(&generator.statements_for_level(&delta, level));
                debug!(level = %level, count = drops.len(), "Checked drop statements");
                LevelDropReport {
                    level,
                    contains_drop_statements: !drops.is_empty(),
                    drop_statements: drops,
                }
            })
            .collect();

        let change_count = delta.count();
        let text_message = self.format_text(change_count, &levels);

        let output = CheckOutput {
            change_count,
            levels,
            text_message,
        };

        render_output(&output, &command.format)
    }

    fn format_text(&self, change_count: usize, levels: &[LevelDropReport]) -> String {
        let formatter = DropStatementFormatter::new();
        let mut output = format!("Changes in delta: {}\n\n", change_count);

        for report in levels {
            output.push_str(&formatter.format_level(report.level, &report.drop_statements));
        }

        output.trim_end().to_string()
    }
}
