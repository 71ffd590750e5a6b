// DROP文の警告とレポートの整形

use crate::core::config::ScriptLevel;
use colored::Colorize;

pub struct DropStatementFormatter;

impl Default for DropStatementFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DropStatementFormatter {
    pub fn new() -> Self {
        Self
    }

    /// generateコマンド用の警告
    ///
    /// DROP文を適用しない設定では、コメントアウト済みである旨を表示します。
    pub fn format_warning(&self, statements: &[String], applied: bool) -> String {
        let mut output = String::new();

        if applied {
            output.push_str(
                format!(
                    "{}\n",
                    "Warning: The script contains drop statements".yellow().bold()
                )
                .as_str(),
            );
        } else {
            output.push_str(
                format!(
                    "{}\n",
                    "Note: Drop statements are commented out in the script".cyan().bold()
                )
                .as_str(),
            );
        }

        for statement in statements {
            output.push_str(&format!("  {}\n", statement.yellow()));
        }

        output
    }

    /// checkコマンド用の、レベルごとのレポート
    pub fn format_level(&self, level: ScriptLevel, statements: &[String]) -> String {
        let mut output = String::new();

        if statements.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "✓".green(),
                format!("{} level: no drop statements", level).green()
            ));
            return output;
        }

        output.push_str(&format!(
            "{} {}\n",
            "!".red().bold(),
            format!("{} level: {} drop statement(s)", level, statements.len())
                .red()
                .bold()
        ));
        for statement in statements {
            output.push_str(&format!("  {}\n", statement.red()));
        }

        output
    }
}
