// ユーザー定義型のオーケストレーター
//
// ENUM型・複合型・ドメインの作成、削除、変更を扱います。
// 種別が変わった型は削除してから作り直します。

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::adapters::ddl_provider::{CommentTarget, DomainDefinition, ObjectName};
use crate::core::schema::{non_empty, Column, Udt, UdtKind};
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::comments::CommentEmitter;

/// 属性の同一性を判定するキー（GUID、なければ名前）
fn attribute_key(attribute: &Column) -> &str {
    if attribute.guid.trim().is_empty() {
        &attribute.name
    } else {
        &attribute.guid
    }
}

fn comment_target(udt: &Udt) -> CommentTarget {
    let name = ObjectName::of_udt(udt);
    match udt.kind {
        UdtKind::Domain => CommentTarget::Domain(name),
        UdtKind::Enum | UdtKind::Composite => CommentTarget::Type(name),
    }
}

pub struct UdtOrchestrator<'a> {
    services: Services<'a>,
}

impl<'a> UdtOrchestrator<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    fn create_script(&self, udt: &Udt) -> Option<String> {
        let provider = self.services.provider;
        let name = ObjectName::of_udt(udt);

        match udt.kind {
            UdtKind::Enum => Some(provider.create_enum_type(&name, &udt.enum_values)),
            UdtKind::Composite => {
                let attributes: Vec<_> = udt
                    .attributes
                    .iter()
                    .filter_map(|attribute| {
                        let definition = self.services.attribute_definition(attribute);
                        if definition.is_none() {
                            warn!(
                                udt = %udt.name,
                                attribute = %attribute.name,
                                "Skipped attribute without resolvable type"
                            );
                        }
                        definition
                    })
                    .collect();
                Some(provider.create_composite_type(&name, &attributes))
            }
            UdtKind::Domain => {
                let Some(underlying_type) = non_empty(&udt.underlying_type) else {
                    warn!(udt = %udt.name, "Skipped domain without underlying type");
                    return None;
                };
                Some(provider.create_domain(&DomainDefinition {
                    name,
                    underlying_type: underlying_type.to_string(),
                    not_null: udt.not_null,
                    default: non_empty(&udt.default).map(str::to_string),
                    check_expression: non_empty(&udt.check_expression).map(str::to_string),
                }))
            }
        }
    }

    /// 追加された型（CREATE TYPE / CREATE DOMAIN とコメント）
    pub fn added(&self, udt: &Udt) -> Vec<DdlStatement> {
        let mut statements = Vec::new();

        let Some(create) = self
            .create_script(udt)
            .and_then(|script| DdlStatement::create(script, udt.is_activated))
        else {
            return statements;
        };
        statements.push(create);
        statements.extend(CommentEmitter::new(self.services).creation_comment(
            &comment_target(udt),
            &udt.description,
            udt.is_activated,
        ));

        statements
    }

    /// 削除された型
    pub fn deleted(&self, udt: &Udt) -> Vec<DdlStatement> {
        let name = ObjectName::of_udt(udt);
        let script = match udt.kind {
            UdtKind::Domain => self.services.provider.drop_domain(&name),
            UdtKind::Enum | UdtKind::Composite => self.services.provider.drop_type(&name),
        };

        DdlStatement::drop(script, udt.is_activated).into_iter().collect()
    }

    /// 変更された型
    pub fn modified(&self, old: &Udt, new: &Udt) -> Vec<DdlStatement> {
        if old.kind != new.kind {
            debug!(udt = %new.name, "Type kind changed, recreating");
            let mut statements = self.deleted(old);
            statements.extend(self.added(new));
            return statements;
        }

        let mut statements = match new.kind {
            UdtKind::Enum => self.enum_value_scripts(old, new),
            UdtKind::Composite => self.attribute_scripts(old, new),
            UdtKind::Domain => Vec::new(),
        };

        statements.extend(CommentEmitter::new(self.services).comment_change(
            &comment_target(new),
            &old.description,
            &new.description,
            new.is_activated,
        ));

        statements
    }

    /// ENUM値の追加（値の削除はPostgreSQLで表現できないため警告のみ）
    fn enum_value_scripts(&self, old: &Udt, new: &Udt) -> Vec<DdlStatement> {
        let name = ObjectName::of_udt(new);
        let old_values: HashSet<&str> = old.enum_values.iter().map(String::as_str).collect();
        let new_values: HashSet<&str> = new.enum_values.iter().map(String::as_str).collect();

        for removed in old.enum_values.iter().filter(|v| !new_values.contains(v.as_str())) {
            warn!(udt = %new.name, value = %removed, "Removing an enum value is not supported");
        }

        new.enum_values
            .iter()
            .filter(|value| !old_values.contains(value.as_str()))
            .filter_map(|value| {
                DdlStatement::create(
                    self.services.provider.add_enum_value(&name, value),
                    new.is_activated,
                )
            })
            .collect()
    }

    /// 複合型の属性（GUIDで対応付け）
    fn attribute_scripts(&self, old: &Udt, new: &Udt) -> Vec<DdlStatement> {
        let provider = self.services.provider;
        let references = self.services.references;
        let name = ObjectName::of_udt(new);
        let mut statements = Vec::new();

        for attribute in &new.attributes {
            let is_activated = new.is_activated && attribute.is_activated;
            let previous = old
                .attributes
                .iter()
                .find(|a| attribute_key(a) == attribute_key(attribute));

            let Some(previous) = previous else {
                if let Some(definition) = self.services.attribute_definition(attribute) {
                    statements.extend(DdlStatement::create(
                        provider.add_type_attribute(&name, &definition),
                        is_activated,
                    ));
                }
                continue;
            };

            if previous.name != attribute.name {
                statements.extend(DdlStatement::create(
                    provider.rename_type_attribute(&name, &previous.name, &attribute.name),
                    is_activated,
                ));
            }

            if let Some(data_type) = references.render_type(attribute) {
                if references.render_type(previous).as_deref() != Some(data_type.as_str()) {
                    statements.extend(DdlStatement::create(
                        provider.alter_type_attribute(&name, &attribute.name, &data_type),
                        is_activated,
                    ));
                }
            }
        }

        for attribute in &old.attributes {
            if new
                .attributes
                .iter()
                .any(|a| attribute_key(a) == attribute_key(attribute))
            {
                continue;
            }
            statements.extend(DdlStatement::drop(
                provider.drop_type_attribute(&name, &attribute.name),
                new.is_activated && attribute.is_activated,
            ));
        }

        statements
    }
}
