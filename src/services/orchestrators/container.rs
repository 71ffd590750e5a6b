// スキーマ（コンテナ）のオーケストレーター
//
// スキーマ本体とコメント、スキーマに属するシーケンスを扱います。
// シーケンスは `id` で前後を対応付けます。

use tracing::debug;

use crate::adapters::ddl_provider::{CommentTarget, ObjectName, SequenceOptions, SequenceOwner};
use crate::core::schema::{non_empty, Container, Sequence};
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::comments::CommentEmitter;

/// シーケンスの所有カラム（テーブル・カラムの両方が指定されている場合のみ）
fn sequence_owner(schema_name: &str, sequence: &Sequence) -> Option<SequenceOwner> {
    let table = non_empty(&sequence.owned_by_table)?;
    let column = non_empty(&sequence.owned_by_column)?;
    Some(SequenceOwner::Column {
        table: ObjectName::qualified(Some(schema_name), table),
        column: column.to_string(),
    })
}

/// 新規作成時のオプション
fn creation_options(schema_name: &str, sequence: &Sequence) -> SequenceOptions {
    SequenceOptions {
        data_type: non_empty(&sequence.data_type).map(str::to_string),
        increment: sequence.increment,
        min_value: sequence.min_value,
        max_value: sequence.max_value,
        start: sequence.start,
        cache: sequence.cache,
        cycle: sequence.cycle.then_some(true),
        owned_by: sequence_owner(schema_name, sequence),
    }
}

/// 変更された項目だけを含むオプション
fn changed_options(schema_name: &str, old: &Sequence, new: &Sequence) -> SequenceOptions {
    let changed = |old: Option<i64>, new: Option<i64>| if old != new { new } else { None };
    let old_data_type = non_empty(&old.data_type);
    let new_data_type = non_empty(&new.data_type);
    let old_owner = sequence_owner(schema_name, old);
    let new_owner = sequence_owner(schema_name, new);

    SequenceOptions {
        data_type: if old_data_type != new_data_type {
            new_data_type.map(str::to_string)
        } else {
            None
        },
        increment: changed(old.increment, new.increment),
        min_value: changed(old.min_value, new.min_value),
        max_value: changed(old.max_value, new.max_value),
        start: changed(old.start, new.start),
        cache: changed(old.cache, new.cache),
        cycle: (old.cycle != new.cycle).then_some(new.cycle),
        owned_by: if old_owner != new_owner {
            Some(new_owner.unwrap_or(SequenceOwner::Detached))
        } else {
            None
        },
    }
}

/// スキーマのオーケストレーター
pub struct ContainerOrchestrator<'a> {
    services: Services<'a>,
}

impl<'a> ContainerOrchestrator<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    fn sequence_name(schema_name: &str, sequence_name: &str) -> ObjectName {
        ObjectName::qualified(Some(schema_name), sequence_name)
    }

    /// 追加されたスキーマ（CREATE SCHEMA、コメント、シーケンス）
    pub fn added(&self, container: &Container) -> Vec<DdlStatement> {
        let provider = self.services.provider;
        let mut statements = Vec::new();

        statements.extend(DdlStatement::create(
            provider.create_schema(&container.name),
            container.is_activated,
        ));
        statements.extend(CommentEmitter::new(self.services).creation_comment(
            &CommentTarget::Schema(container.name.clone()),
            &container.description,
            container.is_activated,
        ));

        for sequence in &container.sequences {
            statements.extend(DdlStatement::create(
                provider.create_sequence(
                    &Self::sequence_name(&container.name, &sequence.sequence_name),
                    &creation_options(&container.name, sequence),
                ),
                container.is_activated && sequence.is_activated,
            ));
        }

        statements
    }

    /// 削除されたスキーマ
    pub fn deleted(&self, container: &Container) -> Vec<DdlStatement> {
        DdlStatement::drop(
            self.services.provider.drop_schema(&container.name),
            container.is_activated,
        )
        .into_iter()
        .collect()
    }

    /// 変更されたスキーマ（リネーム、コメント、シーケンス）
    pub fn modified(&self, old: &Container, new: &Container) -> Vec<DdlStatement> {
        let provider = self.services.provider;
        let mut statements = Vec::new();

        if old.name != new.name {
            statements.extend(DdlStatement::create(
                provider.rename_schema(&old.name, &new.name),
                new.is_activated,
            ));
        }

        statements.extend(CommentEmitter::new(self.services).comment_change(
            &CommentTarget::Schema(new.name.clone()),
            &old.description,
            &new.description,
            new.is_activated,
        ));

        statements.extend(self.sequence_scripts(old, new));

        debug!(schema = %new.name, count = statements.len(), "Modified schema");
        statements
    }

    fn sequence_scripts(&self, old: &Container, new: &Container) -> Vec<DdlStatement> {
        let provider = self.services.provider;
        let schema_name = new.name.as_str();
        let mut statements = Vec::new();

        for sequence in &new.sequences {
            let is_activated = new.is_activated && sequence.is_activated;
            let name = Self::sequence_name(schema_name, &sequence.sequence_name);

            let Some(previous) = old.sequences.iter().find(|s| s.id == sequence.id) else {
                statements.extend(DdlStatement::create(
                    provider.create_sequence(&name, &creation_options(schema_name, sequence)),
                    is_activated,
                ));
                continue;
            };

            if previous.sequence_name != sequence.sequence_name {
                statements.extend(DdlStatement::create(
                    provider.rename_sequence(
                        &Self::sequence_name(schema_name, &previous.sequence_name),
                        &sequence.sequence_name,
                    ),
                    is_activated,
                ));
            }

            // 変更がなければプロバイダーは空文字列を返す
            statements.extend(DdlStatement::create(
                provider.alter_sequence(&name, &changed_options(schema_name, previous, sequence)),
                is_activated,
            ));
        }

        for sequence in &old.sequences {
            if new.sequences.iter().any(|s| s.id == sequence.id) {
                continue;
            }
            statements.extend(DdlStatement::drop(
                provider.drop_sequence(&Self::sequence_name(schema_name, &sequence.sequence_name)),
                new.is_activated && sequence.is_activated,
            ));
        }

        statements
    }
}
