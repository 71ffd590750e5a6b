// generateコマンドハンドラー
//
// スキーマ差分からALTERスクリプトを生成します。
// - 設定ファイルとコマンドライン引数からの生成オプション解決
// - 差分ファイルの読み込みとスクリプト生成
// - 標準出力またはファイルへの書き出し
// - 有効なDROP文を含む場合の警告表示

use crate::cli::command_context::CommandContext;
use crate::cli::commands::drop_statement_formatter::DropStatementFormatter;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::config::ScriptLevel;
use crate::core::naming::APP_NAME;
use crate::services::alter_script_generator::{AlterScriptGenerator, GenerationOptions};
use crate::services::script_assembler::drop_statements;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// generateコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// 出力したスクリプトのレベル
    pub level: ScriptLevel,
    /// 生成されたスクリプト
    pub script: String,
    /// 有効なDROP文を含むかどうか
    pub contains_drop_statements: bool,
    /// 有効なDROP文の一覧
    pub drop_statements: Vec<String>,
    /// 書き出し先ファイル（標準出力の場合はNone）
    pub output_path: Option<String>,
    /// テキスト出力メッセージ
    #[serde(skip)]
    pub text_message: String,
}

impl CommandOutput for GenerateOutput {
    fn to_text(&self) -> String {
        self.text_message.clone()
    }
}

/// generateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 差分ファイルのパス
    pub delta_path: PathBuf,
    /// スクリプトレベル（未指定なら設定ファイルの値）
    pub level: Option<ScriptLevel>,
    /// DROP文をコメントアウトするか
    pub skip_drop_statements: bool,
    /// 書き出し先ファイル
    pub output_path: Option<PathBuf>,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// generateコマンドハンドラー
#[derive(Debug, Default)]
pub struct GenerateCommandHandler {}

impl GenerateCommandHandler {
    /// 新しいGenerateCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// generateコマンドを実行
    ///
    /// # Arguments
    ///
    /// * `command` - generateコマンドのパラメータ
    ///
    /// # Returns
    ///
    /// 成功時は生成されたスクリプト（またはファイル出力の結果）、失敗時はエラーメッセージ
    pub fn execute(&self, command: &GenerateCommand) -> Result<String> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;

        let mut options = GenerationOptions::from(&context.config);
        if command.skip_drop_statements {
            options.apply_drop_statements = false;
        }
        let level = command.level.unwrap_or(context.config.level);
        debug!(level = %level, db_version = %options.db_version, "Resolved generation options");

        let delta = context.read_delta(&command.delta_path)?;
        let generator = AlterScriptGenerator::new(options.clone());
        let result = generator.generate(&delta);

        let (script, contains_drop_statements) = match level {
            ScriptLevel::Container => (
                result.container_level_script,
                result.does_container_level_alter_script_contain_drop_statements,
            ),
            ScriptLevel::Entity => (
                result.entity_level_script,
                result.does_entity_level_alter_script_contain_drop_statements,
            ),
        };
        let drops = drop_statements(&generator.statements_for_level(&delta, level));

        let output_path = match &command.output_path {
            Some(path) => {
                let path = context.resolve_path(path);
                self.write_script(&path, &script)?;
                info!(path = ?path, "Wrote ALTER script");
                Some(path)
            }
            None => None,
        };

        let warning = contains_drop_statements.then(|| {
            DropStatementFormatter::new().format_warning(&drops, options.apply_drop_statements)
        });

        let text_message = match (&output_path, &warning) {
            (Some(path), Some(warning)) => {
                format!("Script written to {}\n\n{}", path.display(), warning.trim_end())
            }
            (Some(path), None) => format!("Script written to {}", path.display()),
            (None, warning) => {
                // 標準出力はスクリプトのみにするため、警告は標準エラーへ
                if let (Some(warning), OutputFormat::Text) = (warning, &command.format) {
                    eprintln!("{}", warning.trim_end());
                }
                script.clone()
            }
        };

        let output = GenerateOutput {
            level,
            script,
            contains_drop_statements,
            drop_statements: drops,
            output_path: output_path.map(|p| p.display().to_string()),
            text_message,
        };

        render_output(&output, &command.format)
    }

    /// ヘッダー付きでスクリプトをファイルに書き出す
    fn write_script(&self, path: &Path, script: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
            }
        }

        let content = format!("{}\n\n{}\n", self.header(), script);
        fs::write(path, content).with_context(|| format!("Failed to write script file: {:?}", path))
    }

    fn header(&self) -> String {
        format!(
            "-- Generated by {} at {}",
            APP_NAME,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
