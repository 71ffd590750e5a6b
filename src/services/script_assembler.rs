// スクリプトの組み立て
//
// DDL文記述子のリストを1つのスクリプト文字列にまとめます。
// - 無効化された記述子の文はコメントアウトする
// - DROP文を適用しない設定では、DROP系の文をコメントアウトする
// - 記述子内の文は改行で、記述子同士は空行で区切る

use crate::core::statement::{DdlStatement, ScriptLine};

/// コメントアウトの接頭辞
const COMMENT_PREFIX: &str = "-- ";

/// スクリプト組み立てサービス
#[derive(Debug, Clone, Copy)]
pub struct ScriptAssembler {
    apply_drop_statements: bool,
}

impl ScriptAssembler {
    pub fn new(apply_drop_statements: bool) -> Self {
        Self {
            apply_drop_statements,
        }
    }

    fn should_comment_out(&self, statement: &DdlStatement, line: &ScriptLine) -> bool {
        !statement.is_activated || (line.is_drop_script && !self.apply_drop_statements)
    }

    fn render_line(&self, statement: &DdlStatement, line: &ScriptLine) -> String {
        let script = line.script.trim();
        if !self.should_comment_out(statement, line) {
            return script.to_string();
        }

        // 複数行の文（CREATE TABLE等）は各行をコメントアウトする
        script
            .lines()
            .map(|l| format!("{}{}", COMMENT_PREFIX, l))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 記述子のリストをスクリプトにまとめる
    pub fn assemble(&self, statements: &[DdlStatement]) -> String {
        statements
            .iter()
            .map(|statement| {
                statement
                    .scripts
                    .iter()
                    .filter(|line| !line.script.trim().is_empty())
                    .map(|line| self.render_line(statement, line))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// 有効な記述子にDROP系の文が含まれるか
pub fn contains_drop_statements(statements: &[DdlStatement]) -> bool {
    statements
        .iter()
        .any(|s| s.is_activated && s.contains_drop_script())
}

/// 有効な記述子に含まれるDROP系の文
pub fn drop_statements(statements: &[DdlStatement]) -> Vec<String> {
    statements
        .iter()
        .filter(|s| s.is_activated)
        .flat_map(|s| s.scripts.iter())
        .filter(|line| line.is_drop_script)
        .map(|line| line.script.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(script: &str, is_activated: bool) -> DdlStatement {
        DdlStatement::create(script, is_activated).unwrap()
    }

    fn destructive(script: &str, is_activated: bool) -> DdlStatement {
        DdlStatement::drop(script, is_activated).unwrap()
    }

    #[test]
    fn test_assemble_joins_descriptors_with_blank_line() {
        let statements = vec![
            DdlStatement::drop_and_recreate("DROP a;", "ADD a;", true).unwrap(),
            create("ADD b;", true),
        ];

        let script = ScriptAssembler::new(true).assemble(&statements);

        assert_eq!(script, "DROP a;\nADD a;\n\nADD b;");
    }

    #[test]
    fn test_inactive_statements_are_commented_out() {
        let statements = vec![
            create("CREATE TABLE t (\n\tid integer\n);", false),
            destructive("DROP TABLE u;", false),
        ];

        for apply_drop in [true, false] {
            let script = ScriptAssembler::new(apply_drop).assemble(&statements);
            assert_eq!(
                script,
                "-- CREATE TABLE t (\n-- \tid integer\n-- );\n\n-- DROP TABLE u;"
            );
        }
    }

    #[test]
    fn test_drop_lines_are_commented_when_drops_are_not_applied() {
        let statements = vec![
            DdlStatement::drop_and_recreate("DROP c;", "ADD c;", true).unwrap(),
            create("ADD d;", true),
        ];

        let script = ScriptAssembler::new(false).assemble(&statements);

        assert_eq!(script, "-- DROP c;\nADD c;\n\nADD d;");
    }

    #[test]
    fn test_contains_drop_statements_ignores_inactive() {
        assert!(!contains_drop_statements(&[destructive("DROP a;", false), create("ADD b;", true)]));
        assert!(contains_drop_statements(&[destructive("DROP a;", true)]));
        assert!(!contains_drop_statements(&[]));
    }

    #[test]
    fn test_drop_statements_lists_activated_drops() {
        let statements = vec![
            destructive("DROP a;", true),
            destructive("DROP b;", false),
            DdlStatement::drop_and_recreate("DROP c;", "ADD c;", true).unwrap(),
        ];

        assert_eq!(drop_statements(&statements), vec!["DROP a;", "DROP c;"]);
    }

    #[test]
    fn test_empty_list_is_empty_script() {
        assert_eq!(ScriptAssembler::new(true).assemble(&[]), "");
    }
}
