// NOT NULL制約の差分エミッター
//
// テーブルの `required` リスト（カラム名）の前後を比較します。
// カラム名はリネームされている可能性があるため、GUIDを介して前後を対応付けます。

use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::table_delta::TableDelta;

pub struct NotNullEmitter<'a> {
    services: Services<'a>,
}

impl<'a> NotNullEmitter<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    pub fn compute_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let provider = self.services.provider;
        let table = delta.new_table();
        let mut statements = Vec::new();

        // 新たに必須になったカラム（追加カラムはADD COLUMNで指定済み）
        for name in &delta.new.required {
            let Some(previous) = delta.previous_of_new_name(name) else {
                continue;
            };
            if delta.old.is_required(&previous.name) {
                continue;
            }
            let is_activated = delta.new.is_activated
                && delta
                    .columns
                    .new_by_name(name)
                    .is_some_and(|c| c.is_activated);
            statements.extend(DdlStatement::create(
                provider.set_not_null(&table, name),
                is_activated,
            ));
        }

        // 必須でなくなったカラム
        for name in &delta.old.required {
            let Some(current) = delta.current_of_old_name(name) else {
                continue;
            };
            if delta.new.is_required(&current.name) {
                continue;
            }
            statements.extend(DdlStatement::drop(
                provider.drop_not_null(&table, &current.name),
                delta.new.is_activated && current.is_activated,
            ));
        }

        statements
    }
}
