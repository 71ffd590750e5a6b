// テーブル（エンティティ）のオーケストレーター
//
// 追加・削除・変更されたテーブルごとに、各エミッターを決まった順序で呼び出します。
// 変更されたテーブルの順序:
// 1. テーブルのリネーム
// 2. 主キー・ユニークキーのDROP
// 3. カラムの追加
// 4. カラムの変更（リネーム、型、NOT NULL、デフォルト値、コメント）
// 5. CHECK制約
// 6. テーブルコメント
// 7. 主キー・ユニークキーのADD
// 8. カラムの削除
//
// キー制約のDROPは、同じ主キーを持つカラムの追加や、主キーカラムの
// NOT NULL解除より前に実行される必要があります。

use tracing::{debug, warn};

use crate::adapters::ddl_provider::{CommentTarget, ObjectName, TableDefinition};
use crate::core::schema::{Entity, KeyKind};
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::check_constraints::CheckConstraintEmitter;
use crate::services::emitters::columns::ColumnEmitter;
use crate::services::emitters::comments::CommentEmitter;
use crate::services::emitters::default_values::DefaultValueEmitter;
use crate::services::emitters::key_constraints::KeyConstraintEmitter;
use crate::services::emitters::not_null::NotNullEmitter;
use crate::services::table_delta::TableDelta;

/// テーブルのオーケストレーター
pub struct EntityOrchestrator<'a> {
    services: Services<'a>,
}

impl<'a> EntityOrchestrator<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    /// 追加されたテーブル（CREATE TABLE とコメント）
    pub fn added(&self, entity: &Entity) -> Vec<DdlStatement> {
        let table = ObjectName::of_entity(entity);

        let columns = entity
            .columns
            .iter()
            .filter_map(|column| {
                let definition = self.services.column_definition(entity, column);
                if definition.is_none() {
                    warn!(
                        table = %entity.name,
                        column = %column.name,
                        "Skipped column without resolvable type"
                    );
                }
                definition
            })
            .collect();

        let keys = [KeyKind::Primary, KeyKind::Unique]
            .into_iter()
            .flat_map(|kind| {
                let emitter = KeyConstraintEmitter::new(self.services, kind);
                kind.composite_keys(entity)
                    .iter()
                    .filter_map(|key| emitter.composite_key_params(entity, key))
                    .collect::<Vec<_>>()
            })
            .collect();

        let definition = TableDefinition {
            name: table.clone(),
            columns,
            keys,
            checks: entity.check_constraints.clone(),
        };

        let mut statements = Vec::new();
        statements.extend(DdlStatement::create(
            self.services.provider.create_table(&definition),
            entity.is_activated,
        ));

        let comments = CommentEmitter::new(self.services);
        statements.extend(comments.creation_comment(
            &CommentTarget::Table(table.clone()),
            &entity.description,
            entity.is_activated,
        ));
        for column in &entity.columns {
            statements.extend(comments.creation_comment(
                &CommentTarget::Column {
                    table: table.clone(),
                    column: column.name.clone(),
                },
                &column.description,
                entity.is_activated && column.is_activated,
            ));
        }

        debug!(table = %entity.name, count = statements.len(), "Created table");
        statements
    }

    /// 削除されたテーブル
    pub fn deleted(&self, entity: &Entity) -> Vec<DdlStatement> {
        DdlStatement::drop(
            self.services
                .provider
                .drop_table(&ObjectName::of_entity(entity)),
            entity.is_activated,
        )
        .into_iter()
        .collect()
    }

    /// 変更されたテーブル
    pub fn modified(&self, old: &Entity, new: &Entity) -> Vec<DdlStatement> {
        let delta = TableDelta::new(old, new);
        let columns = ColumnEmitter::new(self.services);
        let comments = CommentEmitter::new(self.services);
        let mut statements = Vec::new();

        if old.name != new.name {
            statements.extend(DdlStatement::create(
                self.services.provider.rename_table(&delta.old_table(), &new.name),
                new.is_activated,
            ));
        }

        let (primary_drops, primary_adds) =
            KeyConstraintEmitter::new(self.services, KeyKind::Primary).compute_drops_and_adds(&delta);
        let (unique_drops, unique_adds) =
            KeyConstraintEmitter::new(self.services, KeyKind::Unique).compute_drops_and_adds(&delta);
        statements.extend(primary_drops);
        statements.extend(unique_drops);

        statements.extend(columns.added_scripts(&delta));

        statements.extend(columns.rename_scripts(&delta));
        statements.extend(columns.type_scripts(&delta));
        statements.extend(NotNullEmitter::new(self.services).compute_scripts(&delta));
        statements.extend(DefaultValueEmitter::new(self.services).compute_scripts(&delta));
        statements.extend(comments.column_comments(&delta));

        statements.extend(CheckConstraintEmitter::new(self.services).compute_scripts(&delta));
        statements.extend(comments.table_comment(&delta));

        statements.extend(primary_adds);
        statements.extend(unique_adds);

        statements.extend(columns.deleted_scripts(&delta));

        debug!(table = %new.name, count = statements.len(), "Modified table");
        statements
    }
}
