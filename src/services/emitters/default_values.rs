// デフォルト値の差分エミッター

use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::{value_change, ValueChange};
use crate::services::table_delta::TableDelta;

pub struct DefaultValueEmitter<'a> {
    services: Services<'a>,
}

impl<'a> DefaultValueEmitter<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    pub fn compute_scripts(&self, delta: &TableDelta<'_>) -> Vec<DdlStatement> {
        let provider = self.services.provider;
        let table = delta.new_table();

        delta
            .persisted_columns()
            .into_iter()
            .filter_map(|pair| {
                let is_activated = delta.new.is_activated && pair.new.is_activated;
                match value_change(&pair.old.default, &pair.new.default) {
                    ValueChange::Set(value) => DdlStatement::create(
                        provider.set_default(&table, &pair.new.name, value),
                        is_activated,
                    ),
                    ValueChange::Cleared => DdlStatement::drop(
                        provider.drop_default(&table, &pair.new.name),
                        is_activated,
                    ),
                    ValueChange::Unchanged => None,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ddl_provider::postgres::PostgresDdlProvider;
    use crate::core::delta::SchemaDelta;
    use crate::core::schema::{Column, Entity};
    use crate::services::reference_resolver::ReferenceResolver;

    fn entity(default: Option<&str>) -> Entity {
        let mut entity = Entity::new("t");
        let mut column = Column::new("g1", "status", "text");
        column.default = default.map(str::to_string);
        entity.add_column(column);
        entity
    }

    fn scripts(old: &Entity, new: &Entity) -> Vec<DdlStatement> {
        let delta_root = SchemaDelta::new();
        let provider = PostgresDdlProvider::default();
        let services = Services::new(&provider, ReferenceResolver::new(&delta_root));
        DefaultValueEmitter::new(services).compute_scripts(&TableDelta::new(old, new))
    }

    #[test]
    fn test_set_default() {
        let result = scripts(&entity(None), &entity(Some("'active'")));

        assert_eq!(
            result[0].scripts[0].script,
            "ALTER TABLE IF EXISTS t ALTER COLUMN status SET DEFAULT 'active';"
        );
        assert!(!result[0].contains_drop_script());
    }

    #[test]
    fn test_cleared_default_is_dropped() {
        let result = scripts(&entity(Some("'active'")), &entity(Some("")));

        assert_eq!(
            result[0].scripts[0].script,
            "ALTER TABLE IF EXISTS t ALTER COLUMN status DROP DEFAULT;"
        );
        assert!(result[0].contains_drop_script());
    }

    #[test]
    fn test_unchanged_default_produces_nothing() {
        assert!(scripts(&entity(Some("0")), &entity(Some("0"))).is_empty());
        assert!(scripts(&entity(None), &entity(None)).is_empty());
    }
}
