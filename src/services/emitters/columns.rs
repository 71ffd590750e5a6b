// カラムの差分エミッター
//
// カラムの追加・削除・リネーム・型変更を扱います。
// 前後のカラムはGUIDで対応付けるため、リネームと型変更が同時に起きても
// DROP＋ADDにはなりません。

use tracing::{debug, warn};

use crate::adapters::ddl_provider::CommentTarget;
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::comments::CommentEmitter;
use crate::services::table_delta::TableDelta;

pub struct ColumnEmitter<'a> {
    services: Services<'a>,
}

impl<'a> ColumnEmitter<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    /// 追加されたカラム（コメント付き）
    pub fn added_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let table = delta.new_table();
        let comments = CommentEmitter::new(self.services);
        let mut statements = Vec::new();

        for column in delta.added_columns() {
            let Some(definition) = self.services.column_definition(delta.new, column) else {
                warn!(
                    table = %delta.table_name(),
                    column = %column.name,
                    "Skipped column without resolvable type"
                );
                continue;
            };

            let is_activated = delta.new.is_activated && column.is_activated;
            statements.extend(DdlStatement::create(
                self.services.provider.add_column(&table, &definition),
                is_activated,
            ));
            statements.extend(comments.creation_comment(
                &CommentTarget::Column {
                    table: table.clone(),
                    column: column.name.clone(),
                },
                &column.description,
                is_activated,
            ));
        }

        statements
    }

    /// 前後両方に存在するカラムのリネーム
    pub fn rename_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let table = delta.new_table();

        delta
            .persisted_columns()
            .into_iter()
            .filter(|pair| pair.is_renamed())
            .filter_map(|pair| {
                DdlStatement::create(
                    self.services
                        .provider
                        .rename_column(&table, &pair.old.name, &pair.new.name),
                    delta.new.is_activated && pair.new.is_activated,
                )
            })
            .collect()
    }

    /// 前後両方に存在するカラムの型変更
    pub fn type_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let table = delta.new_table();
        let references = self.services.references;

        delta
            .persisted_columns()
            .into_iter()
            .filter_map(|pair| {
                let new_type = references.render_type(pair.new)?;
                if references.render_type(pair.old).as_deref() == Some(new_type.as_str()) {
                    return None;
                }

                debug!(
                    table = %delta.table_name(),
                    column = %pair.new.name,
                    data_type = %new_type,
                    "Column type changed"
                );
                DdlStatement::create(
                    self.services
                        .provider
                        .alter_column_type(&table, &pair.new.name, &new_type),
                    delta.new.is_activated && pair.new.is_activated,
                )
            })
            .collect()
    }

    /// 削除されたカラム
    pub fn deleted_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let table = delta.new_table();

        delta
            .deleted_columns()
            .into_iter()
            .filter_map(|column| {
                DdlStatement::drop(
                    self.services.provider.drop_column(&table, &column.name),
                    delta.new.is_activated && column.is_activated,
                )
            })
            .collect()
    }
}
