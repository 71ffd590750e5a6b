// 定義参照（`$ref`）解決サービス
//
// カラムが `$ref` で定義を参照している場合に、参照先の型情報で
// カラム側の未指定項目を補完します。参照先が見つからなければ補完しません。

use std::collections::BTreeMap;
use tracing::debug;

use crate::core::delta::{DefinitionSchema, SchemaDelta};
use crate::core::schema::{non_empty, Column, TypeSpec};

const MODEL_PREFIX: &str = "#model/definitions/";
const INTERNAL_PREFIX: &str = "#/definitions/";
const EXTERNAL_PREFIX: &str = "#external/definitions/";

/// 定義参照の解決
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    model_definitions: &'a BTreeMap<String, DefinitionSchema>,
    internal_definitions: &'a BTreeMap<String, DefinitionSchema>,
    external_definitions: &'a BTreeMap<String, DefinitionSchema>,
}

impl<'a> ReferenceResolver<'a> {
    /// 差分に同梱された定義マップから作成
    pub fn new(delta: &'a SchemaDelta) -> Self {
        Self {
            model_definitions: &delta.model_definitions,
            internal_definitions: &delta.internal_definitions,
            external_definitions: &delta.external_definitions,
        }
    }

    /// `$ref` の参照先を取得
    pub fn resolve_reference(&self, column: &Column) -> Option<&'a DefinitionSchema> {
        let reference = non_empty(&column.reference)?;

        let resolved = if let Some(name) = reference.strip_prefix(MODEL_PREFIX) {
            self.model_definitions.get(name)
        } else if let Some(name) = reference.strip_prefix(INTERNAL_PREFIX) {
            self.internal_definitions.get(name)
        } else if let Some(name) = reference.strip_prefix(EXTERNAL_PREFIX) {
            self.external_definitions.get(name)
        } else {
            None
        };

        if resolved.is_none() {
            debug!(column = %column.name, reference = %reference, "Unresolved definition reference");
        }

        resolved
    }

    /// 参照先で補完した型情報
    pub fn resolved_type(&self, column: &Column) -> TypeSpec {
        match self.resolve_reference(column) {
            Some(definition) => column.type_spec.merged_with(&definition.type_spec),
            None => column.type_spec.clone(),
        }
    }

    /// SQL上の型表記（型が決まらなければNone）
    pub fn render_type(&self, column: &Column) -> Option<String> {
        self.resolved_type(column).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_with_definitions() -> SchemaDelta {
        let mut delta = SchemaDelta::new();
        delta.model_definitions.insert(
            "money".to_string(),
            DefinitionSchema {
                type_spec: TypeSpec {
                    mode: Some("numeric".to_string()),
                    precision: Some(12),
                    scale: Some(2),
                    ..TypeSpec::default()
                },
                ..DefinitionSchema::default()
            },
        );
        delta.internal_definitions.insert(
            "code".to_string(),
            DefinitionSchema {
                type_spec: TypeSpec {
                    mode: Some("varchar".to_string()),
                    length: Some(10),
                    ..TypeSpec::default()
                },
                ..DefinitionSchema::default()
            },
        );
        delta.external_definitions.insert(
            "uuid".to_string(),
            DefinitionSchema {
                type_spec: TypeSpec::named("uuid"),
                ..DefinitionSchema::default()
            },
        );
        delta
    }

    fn referencing(reference: &str) -> Column {
        let mut column = Column::new("g1", "c", "");
        column.type_spec = TypeSpec::default();
        column.reference = Some(reference.to_string());
        column
    }

    #[test]
    fn test_resolve_each_definition_kind() {
        let delta = delta_with_definitions();
        let resolver = ReferenceResolver::new(&delta);

        assert_eq!(
            resolver.render_type(&referencing("#model/definitions/money")),
            Some("numeric(12,2)".to_string())
        );
        assert_eq!(
            resolver.render_type(&referencing("#/definitions/code")),
            Some("varchar(10)".to_string())
        );
        assert_eq!(
            resolver.render_type(&referencing("#external/definitions/uuid")),
            Some("uuid".to_string())
        );
    }

    #[test]
    fn test_unknown_reference_is_none() {
        let delta = delta_with_definitions();
        let resolver = ReferenceResolver::new(&delta);

        assert!(resolver
            .resolve_reference(&referencing("#model/definitions/missing"))
            .is_none());
        assert!(resolver.resolve_reference(&referencing("other")).is_none());
        assert_eq!(resolver.render_type(&referencing("other")), None);
    }

    #[test]
    fn test_column_fields_take_precedence() {
        let delta = delta_with_definitions();
        let resolver = ReferenceResolver::new(&delta);
        let mut column = referencing("#/definitions/code");
        column.type_spec.length = Some(3);

        assert_eq!(resolver.render_type(&column), Some("varchar(3)".to_string()));
    }
}
