// 主キー・ユニークキー制約の差分エミッター
//
// 主キーとユニークキーは同じ構造を持つため、キー種別をパラメータにした
// 1つのエミッターで扱います。
// 1. 複合キー（制約定義）の差分
// 2. レギュラーキー（カラム単体）の差分
// 3. テーブルごとに DROP → ADD の順に並べ替え

use tracing::debug;

use crate::adapters::ddl_provider::{KeyColumn, KeyConstraintParams, ObjectName};
use crate::core::naming::{default_primary_key_name, default_unique_key_name};
use crate::core::schema::{non_empty, Column, Entity, KeyConstraint, KeyKind, KeyOptions};
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::{sort_drops_before_adds, TableStatement};
use crate::services::key_options::regular_options_changed;
use crate::services::key_transition::{KeyTransitionResolver, TransitionVerdict};
use crate::services::table_delta::TableDelta;

/// キー制約エミッター
pub struct KeyConstraintEmitter<'a> {
    services: Services<'a>,
    kind: KeyKind,
}

impl<'a> KeyConstraintEmitter<'a> {
    pub fn new(services: Services<'a>, kind: KeyKind) -> Self {
        Self { services, kind }
    }

    /// テーブル差分からキー制約のDDLを生成
    pub fn compute_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let resolver = KeyTransitionResolver::new(self.kind);
        let composite_to_regular = resolver.detect_composite_to_regular(delta);
        let regular_to_composite = resolver.detect_regular_to_composite(delta);

        let mut statements =
            self.composite_scripts(delta, &composite_to_regular, &regular_to_composite);
        statements.extend(self.regular_scripts(delta, &composite_to_regular, &regular_to_composite));

        debug!(
            kind = %self.kind,
            table = %delta.table_name(),
            count = statements.len(),
            "Computed key constraint scripts"
        );

        sort_drops_before_adds(statements)
    }

    /// DROP文とADD文を分けて返す
    ///
    /// 呼び出し側は、カラムの追加やNOT NULLの解除より前にDROP文を置けます。
    pub fn compute_drops_and_adds(
        &self,
        delta: &TableDelta<'_>,
    ) -> (Vec<DdlStatement>, Vec<DdlStatement>) {
        self.compute_scripts(delta)
            .into_iter()
            .partition(DdlStatement::is_drop)
    }

    fn default_name(&self, entity_name: &str) -> String {
        match self.kind {
            KeyKind::Primary => default_primary_key_name(entity_name),
            KeyKind::Unique => default_unique_key_name(entity_name),
        }
    }

    fn constraint_name(&self, options: &KeyOptions, entity_name: &str) -> String {
        non_empty(&options.constraint_name)
            .map(str::to_string)
            .unwrap_or_else(|| self.default_name(entity_name))
    }

    /// 複合キーの制約パラメータ
    ///
    /// 構成カラムはGUIDから現在の名前に解決し、1つも解決できなければNoneを返します。
    pub fn composite_key_params(
        &self,
        entity: &Entity,
        key: &KeyConstraint,
    ) -> Option<KeyConstraintParams> {
        let columns: Vec<KeyColumn> = key
            .columns
            .iter()
            .filter_map(|r| entity.columns.iter().find(|c| c.guid == r.key_id))
            .map(|c| KeyColumn::new(c.name.clone(), c.is_activated))
            .collect();
        if columns.is_empty() {
            debug!(
                kind = %self.kind,
                table = %entity.name,
                key_id = %key.id,
                "Skipped key without resolvable columns"
            );
            return None;
        }

        Some(KeyConstraintParams {
            table: ObjectName::of_entity(entity),
            constraint_name: self.constraint_name(&key.options, &entity.name),
            kind: self.kind,
            columns,
            options: self.services.key_clause_options(&key.options, entity),
            is_entity_activated: entity.is_activated,
        })
    }

    /// 複合キーの差分
    fn composite_scripts(
        &self,
        delta: &TableDelta<'_>,
        composite_to_regular: &TransitionVerdict,
        regular_to_composite: &TransitionVerdict,
    ) -> Vec<TableStatement> {
        let old_keys = self.kind.composite_keys(delta.old);
        let new_keys = self.kind.composite_keys(delta.new);
        if old_keys.is_empty() && new_keys.is_empty() {
            return Vec::new();
        }

        // 表現だけが変わった遷移の対象は比較から外す
        let old_keys = without_transitioned(old_keys, composite_to_regular);
        let new_keys = without_transitioned(new_keys, regular_to_composite);

        let is_unchanged = old_keys.len() == new_keys.len()
            && old_keys
                .iter()
                .all(|old| new_keys.iter().any(|new| old.is_equivalent(new)));
        if is_unchanged {
            return Vec::new();
        }

        let mut statements = Vec::new();
        let table_name = delta.table_name();

        for key in old_keys {
            let name = self.constraint_name(&key.options, &delta.old.name);
            // 削除されたカラムは変更前の有効化状態で判定する
            let is_activated = delta.new.is_activated
                && key
                    .columns
                    .iter()
                    .filter_map(|c| {
                        delta
                            .columns
                            .new_by_guid(&c.key_id)
                            .or_else(|| delta.columns.old_by_guid(&c.key_id))
                    })
                    .all(|c| c.is_activated);
            let script = self.services.provider.drop_constraint(&delta.new_table(), &name);
            if let Some(statement) = DdlStatement::drop(script, is_activated) {
                statements.push(TableStatement::new(table_name, statement));
            }
        }

        for key in new_keys {
            let Some(params) = self.composite_key_params(delta.new, key) else {
                continue;
            };
            let result = self.services.provider.add_key_constraint(&params);
            if let Some(statement) = DdlStatement::create(result.statement, result.is_activated) {
                statements.push(TableStatement::new(table_name, statement));
            }
        }

        statements
    }

    /// レギュラーキーの差分（前後両方に存在するカラムのみ）
    fn regular_scripts(
        &self,
        delta: &TableDelta<'_>,
        composite_to_regular: &TransitionVerdict,
        regular_to_composite: &TransitionVerdict,
    ) -> Vec<TableStatement> {
        let mut statements = Vec::new();
        let table_name = delta.table_name();

        for pair in delta.persisted_columns() {
            let was_regular = self.kind.is_regular(pair.old);
            let is_regular = self.kind.is_regular(pair.new);
            let options_changed =
                was_regular && is_regular && regular_options_changed(self.kind, pair.old, pair.new);

            let needs_drop = was_regular
                && (options_changed
                    || (!is_regular
                        && !regular_to_composite.is_representation_only_for(&pair.old.guid)));
            let needs_add = is_regular
                && (options_changed
                    || (!was_regular
                        && !composite_to_regular.is_representation_only_for(&pair.new.guid)));

            let is_activated = delta.new.is_activated && pair.new.is_activated;

            if needs_drop {
                let options = first_options(self.kind, pair.old);
                let name = self.constraint_name(&options, &delta.old.name);
                let script = self.services.provider.drop_constraint(&delta.new_table(), &name);
                if let Some(statement) = DdlStatement::drop(script, is_activated) {
                    statements.push(TableStatement::new(table_name, statement));
                }
            }

            if needs_add {
                let options = first_options(self.kind, pair.new);
                let params = KeyConstraintParams {
                    table: delta.new_table(),
                    constraint_name: self.constraint_name(&options, &delta.new.name),
                    kind: self.kind,
                    columns: vec![KeyColumn::new(pair.new.name.clone(), pair.new.is_activated)],
                    options: self.services.key_clause_options(&options, delta.new),
                    is_entity_activated: delta.new.is_activated,
                };
                let result = self.services.provider.add_key_constraint(&params);
                if let Some(statement) = DdlStatement::create(result.statement, result.is_activated)
                {
                    statements.push(TableStatement::new(table_name, statement));
                }
            }
        }

        statements
    }
}

fn first_options(kind: KeyKind, column: &Column) -> KeyOptions {
    kind.regular_options(column)
        .first()
        .cloned()
        .unwrap_or_default()
}

/// 表現だけの遷移で対象となった単一カラムのキーを除外する
fn without_transitioned<'k>(
    keys: &'k [KeyConstraint],
    verdict: &TransitionVerdict,
) -> Vec<&'k KeyConstraint> {
    keys.iter()
        .filter(|key| {
            !(verdict.is_representation_only()
                && key.columns.len() == 1
                && verdict.column_guid.as_deref() == Some(key.columns[0].key_id.as_str()))
        })
        .collect()
}
