// 制約・カラム差分エミッター
//
// 制約の種類ごとにテーブル差分を受け取り、DDL文記述子のリストを返します。

pub mod check_constraints;
pub mod columns;
pub mod comments;
pub mod default_values;
pub mod foreign_keys;
pub mod key_constraints;
pub mod not_null;

use crate::core::schema::non_empty;
use crate::core::statement::DdlStatement;

/// 値（コメント・デフォルト値）の変化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueChange<'a> {
    Unchanged,
    /// 新しい値を設定する
    Set(&'a str),
    /// 以前の値を取り除く
    Cleared,
}

/// 前後の値を比較する（空文字列は値なしとして扱う）
pub fn value_change<'a>(old: &Option<String>, new: &'a Option<String>) -> ValueChange<'a> {
    match (non_empty(old), non_empty(new)) {
        (old, Some(new)) if old != Some(new) => ValueChange::Set(new),
        (Some(_), None) => ValueChange::Cleared,
        _ => ValueChange::Unchanged,
    }
}

/// テーブル名付きの記述子（DROP→ADD順の並び替え用）
#[derive(Debug, Clone)]
pub struct TableStatement {
    pub table_name: String,
    pub statement: DdlStatement,
}

impl TableStatement {
    pub fn new(table_name: impl Into<String>, statement: DdlStatement) -> Self {
        Self {
            table_name: table_name.into(),
            statement,
        }
    }
}

/// テーブル名の昇順、同じテーブル内ではDROPを先に並べる（安定ソート）
pub fn sort_drops_before_adds(mut statements: Vec<TableStatement>) -> Vec<DdlStatement> {
    statements.sort_by(|a, b| {
        a.table_name
            .cmp(&b.table_name)
            .then_with(|| b.statement.is_drop().cmp(&a.statement.is_drop()))
    });

    statements.into_iter().map(|s| s.statement).collect()
}
