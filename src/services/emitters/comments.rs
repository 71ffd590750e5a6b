// コメントの差分エミッター
//
// テーブル・カラムだけでなく、スキーマ・ビュー・ユーザー定義型のコメントも
// 同じ規則で扱います。
// - 新しい値が設定された → COMMENT ON ... IS '...'
// - 値が取り除かれた → COMMENT ON ... IS NULL（削除扱い）

use crate::adapters::ddl_provider::CommentTarget;
use crate::core::schema::non_empty;
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::{value_change, ValueChange};
use crate::services::table_delta::TableDelta;

pub struct CommentEmitter<'a> {
    services: Services<'a>,
}

impl<'a> CommentEmitter<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    /// 前後のコメントを比較してCOMMENT文を生成
    pub fn comment_change(
        &self,
        target: &CommentTarget,
        old: &Option<String>,
        new: &Option<String>,
        is_activated: bool,
    ) -> Option<DdlStatement> {
        match value_change(old, new) {
            ValueChange::Set(comment) => DdlStatement::create(
                self.services.provider.comment_on(target, Some(comment)),
                is_activated,
            ),
            ValueChange::Cleared => {
                DdlStatement::drop(self.services.provider.comment_on(target, None), is_activated)
            }
            ValueChange::Unchanged => None,
        }
    }

    /// 新規作成したオブジェクトのコメント
    pub fn creation_comment(
        &self,
        target: &CommentTarget,
        description: &Option<String>,
        is_activated: bool,
    ) -> Option<DdlStatement> {
        let comment = non_empty(description)?;
        DdlStatement::create(
            self.services.provider.comment_on(target, Some(comment)),
            is_activated,
        )
    }

    /// テーブルコメントの変更
    pub fn table_comment(&self, delta: &TableDelta<'_>) -> Option<DdlStatement> {
        self.comment_change(
            &CommentTarget::Table(delta.new_table()),
            &delta.old.description,
            &delta.new.description,
            delta.new.is_activated,
        )
    }

    /// 前後両方に存在するカラムのコメント変更
    pub fn column_comments(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let table = delta.new_table();

        delta
            .persisted_columns()
            .into_iter()
            .filter_map(|pair| {
                let target = CommentTarget::Column {
                    table: table.clone(),
                    column: pair.new.name.clone(),
                };
                self.comment_change(
                    &target,
                    &pair.old.description,
                    &pair.new.description,
                    delta.new.is_activated && pair.new.is_activated,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ddl_provider::postgres::PostgresDdlProvider;
    use crate::adapters::ddl_provider::ObjectName;
    use crate::core::delta::SchemaDelta;
    use crate::core::schema::{Column, Entity};
    use crate::services::reference_resolver::ReferenceResolver;

    fn with_emitter<T>(f: impl FnOnce(&CommentEmitter<'_>) -> T) -> T {
        let delta_root = SchemaDelta::new();
        let provider = PostgresDdlProvider::default();
        let services = Services::new(&provider, ReferenceResolver::new(&delta_root));
        f(&CommentEmitter::new(services))
    }

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_cleared_comment_sets_null_as_drop() {
        let statement = with_emitter(|emitter| {
            emitter.comment_change(
                &CommentTarget::Table(ObjectName::new("t")),
                &some("legacy"),
                &some(""),
                true,
            )
        })
        .unwrap();

        assert_eq!(statement.scripts[0].script, "COMMENT ON TABLE t IS NULL;");
        assert!(statement.contains_drop_script());
    }

    #[test]
    fn test_changed_comment_is_escaped() {
        let statement = with_emitter(|emitter| {
            emitter.comment_change(
                &CommentTarget::Schema("sales".to_string()),
                &None,
                &some("Sales' data"),
                true,
            )
        })
        .unwrap();

        assert_eq!(
            statement.scripts[0].script,
            "COMMENT ON SCHEMA sales IS 'Sales'' data';"
        );
        assert!(!statement.contains_drop_script());
    }

    #[test]
    fn test_creation_comment_skips_blank() {
        let target = CommentTarget::View(ObjectName::new("v"));
        assert!(with_emitter(|e| e.creation_comment(&target, &some(" "), true)).is_none());
        assert!(with_emitter(|e| e.creation_comment(&target, &some("report"), true)).is_some());
    }

    #[test]
    fn test_column_comments_follow_renames() {
        let mut old = Entity::new("t");
        let mut column = Column::new("g1", "a", "text");
        column.description = Some("old".to_string());
        old.add_column(column);

        let mut new = Entity::new("t");
        let mut column = Column::new("g1", "b", "text");
        column.description = Some("new".to_string());
        column.is_activated = false;
        new.add_column(column);

        let result = with_emitter(|e| e.column_comments(&TableDelta::new(&old, &new)));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].scripts[0].script, "COMMENT ON COLUMN t.b IS 'new';");
        assert!(!result[0].is_activated);
    }
}
