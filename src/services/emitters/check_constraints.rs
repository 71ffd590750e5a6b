// CHECK制約の差分エミッター
//
// CHECK制約は名前で同一性を判定します。

use crate::core::schema::CheckConstraint;
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::table_delta::TableDelta;

/// 名前ごとの制約の履歴
#[derive(Debug)]
struct CheckHistory<'a> {
    name: &'a str,
    old: Option<&'a CheckConstraint>,
    new: Option<&'a CheckConstraint>,
}

/// 変更後の定義順、続いて削除された制約の順に履歴を並べる
fn check_histories<'a>(old: &'a [CheckConstraint], new: &'a [CheckConstraint]) -> Vec<CheckHistory<'a>> {
    let mut histories: Vec<CheckHistory<'a>> = Vec::new();

    for check in new.iter().chain(old.iter()) {
        if histories.iter().any(|h| h.name == check.name) {
            continue;
        }
        histories.push(CheckHistory {
            name: &check.name,
            old: old.iter().find(|c| c.name == check.name),
            new: new.iter().find(|c| c.name == check.name),
        });
    }

    histories
}

/// CHECK制約エミッター
pub struct CheckConstraintEmitter<'a> {
    services: Services<'a>,
}

impl<'a> CheckConstraintEmitter<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    pub fn compute_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let provider = self.services.provider;
        let table = delta.new_table();
        let is_activated = delta.new.is_activated;

        check_histories(&delta.old.check_constraints, &delta.new.check_constraints)
            .into_iter()
            .filter_map(|history| match (history.old, history.new) {
                (Some(_), None) => DdlStatement::drop(
                    provider.drop_constraint(&table, history.name),
                    is_activated,
                ),
                (None, Some(new)) => {
                    DdlStatement::create(provider.add_check_constraint(&table, new), is_activated)
                }
                (Some(old), Some(new))
                    if old.expression.trim() != new.expression.trim()
                        || old.no_inherit != new.no_inherit =>
                {
                    DdlStatement::drop_and_recreate(
                        provider.drop_constraint(&table, history.name),
                        provider.add_check_constraint(&table, new),
                        is_activated,
                    )
                }
                _ => None,
            })
            .collect()
    }
}
