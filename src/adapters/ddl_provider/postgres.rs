// PostgreSQL用DDLプロバイダー
//
// 名前付きテンプレートを展開してPostgreSQL用のDDL文を生成します。

use crate::adapters::ddl_provider::{
    ActivatedStatement, ColumnDefinition, CommentTarget, DdlProvider, DomainDefinition,
    ForeignKeyParams, InlineKey, KeyClauseOptions, KeyColumn, KeyConstraintParams, ObjectName,
    SequenceOptions, SequenceOwner, TableDefinition,
};
use crate::adapters::sql_quote::{qualified_name, quote_columns, quote_literal, wrap_in_quotes};
use crate::adapters::templates::{self, render_template};
use crate::core::config::DbVersion;
use crate::core::schema::{CheckConstraint, KeyKind, View};

/// PostgreSQL用DDLプロバイダー
#[derive(Debug, Clone)]
pub struct PostgresDdlProvider {
    db_version: DbVersion,
}

impl Default for PostgresDdlProvider {
    fn default() -> Self {
        Self::new(DbVersion::default())
    }
}

impl PostgresDdlProvider {
    /// 対象バージョンを指定して作成
    pub fn new(db_version: DbVersion) -> Self {
        Self { db_version }
    }

    fn name(&self, object: &ObjectName) -> String {
        qualified_name(object.schema_name.as_deref(), &object.name)
    }

    fn column_names(columns: &[KeyColumn]) -> Vec<&str> {
        columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// キー制約句のうちカラムリストより後ろの部分
    fn key_clause_suffix(&self, options: &KeyClauseOptions) -> KeyClauseParts {
        let include = if options.include.is_empty() {
            String::new()
        } else {
            format!(" INCLUDE ({})", quote_columns(&options.include))
        };
        let storage_parameters = options
            .storage_parameters
            .as_deref()
            .map(|p| format!(" WITH ({})", p.trim()))
            .unwrap_or_default();
        let tablespace = options
            .tablespace
            .as_deref()
            .map(|t| format!(" USING INDEX TABLESPACE {}", wrap_in_quotes(t.trim())))
            .unwrap_or_default();
        let deferrable = options
            .deferrable
            .as_deref()
            .map(|d| format!(" {}", d.trim()))
            .unwrap_or_default();
        // INITIALLY 句は DEFERRABLE の場合のみ有効
        let check_time = match (options.deferrable.as_deref(), options.deferrable_check_time.as_deref())
        {
            (Some(d), Some(t)) if d.trim().eq_ignore_ascii_case("DEFERRABLE") => {
                format!(" {}", t.trim())
            }
            _ => String::new(),
        };

        KeyClauseParts {
            include,
            storage_parameters,
            tablespace,
            deferrable,
            check_time,
        }
    }

    /// `NULLS [NOT] DISTINCT` 句（v15以降のユニークキーのみ）
    fn nulls_distinct_clause(&self, kind: KeyKind, options: &KeyClauseOptions) -> String {
        match (kind, options.nulls_distinct.as_deref()) {
            (KeyKind::Unique, Some(value)) if self.db_version.supports_nulls_distinct() => {
                format!(" {}", value.trim())
            }
            _ => String::new(),
        }
    }

    fn inline_key(&self, key: &InlineKey) -> String {
        let parts = self.key_clause_suffix(&key.options);
        let constraint = key
            .constraint_name
            .as_deref()
            .map(|n| format!("CONSTRAINT {} ", wrap_in_quotes(n)))
            .unwrap_or_default();

        format!(
            "{}{}{}{}",
            constraint,
            key.kind.keyword(),
            self.nulls_distinct_clause(key.kind, &key.options),
            parts.joined()
        )
    }

    /// カラム定義（`name type [NOT NULL] [DEFAULT x] [keys]`）
    fn column_definition(&self, column: &ColumnDefinition) -> String {
        let mut parts = vec![wrap_in_quotes(&column.name), column.data_type.clone()];

        if column.not_null {
            parts.push("NOT NULL".to_string());
        }

        if let Some(default_value) = &column.default {
            parts.push(format!("DEFAULT {}", default_value));
        }

        for key in &column.inline_keys {
            parts.push(self.inline_key(key));
        }

        parts.join(" ")
    }

    fn table_key_clause(&self, key: &KeyConstraintParams) -> String {
        let parts = self.key_clause_suffix(&key.options);
        format!(
            "CONSTRAINT {} {}{} ({}){}",
            wrap_in_quotes(&key.constraint_name),
            key.kind.keyword(),
            self.nulls_distinct_clause(key.kind, &key.options),
            quote_columns(&Self::column_names(&key.columns)),
            parts.joined()
        )
    }

    fn check_clause(check: &CheckConstraint) -> String {
        format!(
            "CONSTRAINT {} CHECK ({}){}",
            wrap_in_quotes(&check.name),
            check.expression.trim(),
            if check.no_inherit { " NO INHERIT" } else { "" }
        )
    }

    /// CREATE文内の定義一覧を組み立てる
    ///
    /// 無効化された定義は末尾にコメントとして並べます。
    fn definition_block(active: Vec<String>, inactive: Vec<String>) -> String {
        let mut lines: Vec<String> = Vec::new();
        let count = active.len();
        for (index, definition) in active.into_iter().enumerate() {
            if index + 1 < count {
                lines.push(format!("\t{},", definition));
            } else {
                lines.push(format!("\t{}", definition));
            }
        }
        for definition in inactive {
            lines.push(format!("\t-- {}", definition));
        }
        lines.join("\n")
    }

    fn sequence_options(&self, options: &SequenceOptions) -> String {
        let mut clause = String::new();

        if let Some(data_type) = &options.data_type {
            clause.push_str(&format!(" AS {}", data_type));
        }
        if let Some(increment) = options.increment {
            clause.push_str(&format!(" INCREMENT BY {}", increment));
        }
        if let Some(min_value) = options.min_value {
            clause.push_str(&format!(" MINVALUE {}", min_value));
        }
        if let Some(max_value) = options.max_value {
            clause.push_str(&format!(" MAXVALUE {}", max_value));
        }
        if let Some(start) = options.start {
            clause.push_str(&format!(" START WITH {}", start));
        }
        if let Some(cache) = options.cache {
            clause.push_str(&format!(" CACHE {}", cache));
        }
        match options.cycle {
            Some(true) => clause.push_str(" CYCLE"),
            Some(false) => clause.push_str(" NO CYCLE"),
            None => {}
        }
        match &options.owned_by {
            Some(SequenceOwner::Column { table, column }) => clause.push_str(&format!(
                " OWNED BY {}.{}",
                self.name(table),
                wrap_in_quotes(column)
            )),
            Some(SequenceOwner::Detached) => clause.push_str(" OWNED BY NONE"),
            None => {}
        }

        clause
    }

    fn foreign_key_activation(params: &ForeignKeyParams) -> bool {
        params.is_relationship_activated
            && params.is_child_activated
            && params.is_parent_activated
            && params.child_columns.iter().all(|c| c.is_activated)
            && params.parent_columns.iter().all(|c| c.is_activated)
    }
}

/// キー制約句の後半部分
struct KeyClauseParts {
    include: String,
    storage_parameters: String,
    tablespace: String,
    deferrable: String,
    check_time: String,
}

impl KeyClauseParts {
    fn joined(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.include, self.storage_parameters, self.tablespace, self.deferrable, self.check_time
        )
    }
}

impl DdlProvider for PostgresDdlProvider {
    fn create_schema(&self, name: &str) -> String {
        render_template(templates::CREATE_SCHEMA, &[("name", &wrap_in_quotes(name))])
    }

    fn rename_schema(&self, old_name: &str, new_name: &str) -> String {
        render_template(
            templates::RENAME_SCHEMA,
            &[
                ("oldName", &wrap_in_quotes(old_name)),
                ("newName", &wrap_in_quotes(new_name)),
            ],
        )
    }

    fn drop_schema(&self, name: &str) -> String {
        render_template(templates::DROP_SCHEMA, &[("name", &wrap_in_quotes(name))])
    }

    fn comment_on(&self, target: &CommentTarget, comment: Option<&str>) -> String {
        let (object_type, object_name) = match target {
            CommentTarget::Schema(name) => ("SCHEMA", wrap_in_quotes(name)),
            CommentTarget::Table(table) => ("TABLE", self.name(table)),
            CommentTarget::Column { table, column } => (
                "COLUMN",
                format!("{}.{}", self.name(table), wrap_in_quotes(column)),
            ),
            CommentTarget::View(view) => ("VIEW", self.name(view)),
            CommentTarget::Type(udt) => ("TYPE", self.name(udt)),
            CommentTarget::Domain(domain) => ("DOMAIN", self.name(domain)),
        };
        let comment = comment
            .map(quote_literal)
            .unwrap_or_else(|| "NULL".to_string());

        render_template(
            templates::COMMENT,
            &[
                ("objectType", object_type),
                ("objectName", &object_name),
                ("comment", &comment),
            ],
        )
    }

    fn create_table(&self, table: &TableDefinition) -> String {
        let mut active = Vec::new();
        let mut inactive = Vec::new();

        for column in &table.columns {
            let definition = self.column_definition(column);
            if column.is_activated {
                active.push(definition);
            } else {
                inactive.push(definition);
            }
        }

        for key in &table.keys {
            let clause = self.table_key_clause(key);
            if key.columns.iter().all(|c| c.is_activated) {
                active.push(clause);
            } else {
                inactive.push(clause);
            }
        }

        active.extend(table.checks.iter().map(Self::check_clause));

        render_template(
            templates::CREATE_TABLE,
            &[
                ("name", &self.name(&table.name)),
                ("definitions", &Self::definition_block(active, inactive)),
            ],
        )
    }

    fn rename_table(&self, table: &ObjectName, new_name: &str) -> String {
        render_template(
            templates::RENAME_TABLE,
            &[
                ("oldName", &self.name(table)),
                ("newName", &wrap_in_quotes(new_name)),
            ],
        )
    }

    fn drop_table(&self, table: &ObjectName) -> String {
        render_template(templates::DROP_TABLE, &[("name", &self.name(table))])
    }

    fn add_column(&self, table: &ObjectName, column: &ColumnDefinition) -> String {
        render_template(
            templates::ADD_COLUMN,
            &[
                ("tableName", &self.name(table)),
                ("columnDefinition", &self.column_definition(column)),
            ],
        )
    }

    fn drop_column(&self, table: &ObjectName, column_name: &str) -> String {
        render_template(
            templates::DROP_COLUMN,
            &[
                ("tableName", &self.name(table)),
                ("columnName", &wrap_in_quotes(column_name)),
            ],
        )
    }

    fn rename_column(&self, table: &ObjectName, old_name: &str, new_name: &str) -> String {
        render_template(
            templates::RENAME_COLUMN,
            &[
                ("tableName", &self.name(table)),
                ("oldName", &wrap_in_quotes(old_name)),
                ("newName", &wrap_in_quotes(new_name)),
            ],
        )
    }

    fn alter_column_type(&self, table: &ObjectName, column_name: &str, data_type: &str) -> String {
        render_template(
            templates::ALTER_COLUMN_TYPE,
            &[
                ("tableName", &self.name(table)),
                ("columnName", &wrap_in_quotes(column_name)),
                ("dataType", data_type),
            ],
        )
    }

    fn set_not_null(&self, table: &ObjectName, column_name: &str) -> String {
        render_template(
            templates::SET_NOT_NULL,
            &[
                ("tableName", &self.name(table)),
                ("columnName", &wrap_in_quotes(column_name)),
            ],
        )
    }

    fn drop_not_null(&self, table: &ObjectName, column_name: &str) -> String {
        render_template(
            templates::DROP_NOT_NULL,
            &[
                ("tableName", &self.name(table)),
                ("columnName", &wrap_in_quotes(column_name)),
            ],
        )
    }

    fn set_default(&self, table: &ObjectName, column_name: &str, default_value: &str) -> String {
        render_template(
            templates::SET_DEFAULT,
            &[
                ("tableName", &self.name(table)),
                ("columnName", &wrap_in_quotes(column_name)),
                ("defaultValue", default_value),
            ],
        )
    }

    fn drop_default(&self, table: &ObjectName, column_name: &str) -> String {
        render_template(
            templates::DROP_DEFAULT,
            &[
                ("tableName", &self.name(table)),
                ("columnName", &wrap_in_quotes(column_name)),
            ],
        )
    }

    fn add_check_constraint(&self, table: &ObjectName, check: &CheckConstraint) -> String {
        render_template(
            templates::ADD_CHECK_CONSTRAINT,
            &[
                ("tableName", &self.name(table)),
                ("constraintName", &wrap_in_quotes(&check.name)),
                ("expression", check.expression.trim()),
                ("noInherit", if check.no_inherit { " NO INHERIT" } else { "" }),
            ],
        )
    }

    fn drop_constraint(&self, table: &ObjectName, constraint_name: &str) -> String {
        render_template(
            templates::DROP_CONSTRAINT,
            &[
                ("tableName", &self.name(table)),
                ("constraintName", &wrap_in_quotes(constraint_name)),
            ],
        )
    }

    fn add_key_constraint(&self, params: &KeyConstraintParams) -> ActivatedStatement {
        let parts = self.key_clause_suffix(&params.options);
        let statement = render_template(
            templates::ADD_KEY_CONSTRAINT,
            &[
                ("tableName", &self.name(&params.table)),
                ("constraintName", &wrap_in_quotes(&params.constraint_name)),
                ("keyType", params.kind.keyword()),
                (
                    "nullsDistinct",
                    &self.nulls_distinct_clause(params.kind, &params.options),
                ),
                ("columns", &quote_columns(&Self::column_names(&params.columns))),
                ("include", &parts.include),
                ("storageParameters", &parts.storage_parameters),
                ("tablespace", &parts.tablespace),
                ("deferrable", &parts.deferrable),
                ("checkTime", &parts.check_time),
            ],
        );

        ActivatedStatement {
            statement,
            is_activated: params.is_entity_activated
                && params.columns.iter().all(|c| c.is_activated),
        }
    }

    fn add_foreign_key(&self, params: &ForeignKeyParams) -> ActivatedStatement {
        let match_clause = params
            .match_type
            .as_deref()
            .map(|m| format!(" MATCH {}", m))
            .unwrap_or_default();
        let on_delete = params
            .on_delete
            .as_deref()
            .map(|a| format!(" ON DELETE {}", a))
            .unwrap_or_default();
        let on_update = params
            .on_update
            .as_deref()
            .map(|a| format!(" ON UPDATE {}", a))
            .unwrap_or_default();

        let statement = render_template(
            templates::ADD_FOREIGN_KEY,
            &[
                ("childTable", &self.name(&params.child_table)),
                ("name", &wrap_in_quotes(&params.name)),
                (
                    "childColumns",
                    &quote_columns(&Self::column_names(&params.child_columns)),
                ),
                ("parentTable", &self.name(&params.parent_table)),
                (
                    "parentColumns",
                    &quote_columns(&Self::column_names(&params.parent_columns)),
                ),
                ("match", &match_clause),
                ("onDelete", &on_delete),
                ("onUpdate", &on_update),
            ],
        );

        ActivatedStatement {
            statement,
            is_activated: Self::foreign_key_activation(params),
        }
    }

    fn drop_foreign_key(&self, params: &ForeignKeyParams) -> ActivatedStatement {
        ActivatedStatement {
            statement: self.drop_constraint(&params.child_table, &params.name),
            is_activated: Self::foreign_key_activation(params),
        }
    }

    fn create_view(&self, view: &View) -> String {
        let select_statement = view.select_statement.trim().trim_end_matches(';').trim_end();
        if select_statement.is_empty() {
            return String::new();
        }

        render_template(
            templates::CREATE_VIEW,
            &[
                ("orReplace", if view.or_replace { " OR REPLACE" } else { "" }),
                ("name", &self.name(&ObjectName::of_view(view))),
                ("selectStatement", select_statement),
            ],
        )
    }

    fn drop_view(&self, view: &ObjectName) -> String {
        render_template(templates::DROP_VIEW, &[("name", &self.name(view))])
    }

    fn create_enum_type(&self, name: &ObjectName, values: &[String]) -> String {
        let values = values
            .iter()
            .map(|v| quote_literal(v))
            .collect::<Vec<_>>()
            .join(", ");

        render_template(
            templates::CREATE_ENUM_TYPE,
            &[("name", &self.name(name)), ("values", &values)],
        )
    }

    fn create_composite_type(&self, name: &ObjectName, attributes: &[ColumnDefinition]) -> String {
        let (active, inactive): (Vec<_>, Vec<_>) =
            attributes.iter().partition(|attribute| attribute.is_activated);
        let definition = |attribute: &ColumnDefinition| {
            format!("{} {}", wrap_in_quotes(&attribute.name), attribute.data_type)
        };

        render_template(
            templates::CREATE_COMPOSITE_TYPE,
            &[
                ("name", &self.name(name)),
                (
                    "attributes",
                    &Self::definition_block(
                        active.into_iter().map(definition).collect(),
                        inactive.into_iter().map(definition).collect(),
                    ),
                ),
            ],
        )
    }

    fn create_domain(&self, domain: &DomainDefinition) -> String {
        let default = domain
            .default
            .as_deref()
            .map(|d| format!(" DEFAULT {}", d))
            .unwrap_or_default();
        let check = domain
            .check_expression
            .as_deref()
            .map(|c| format!(" CHECK ({})", c))
            .unwrap_or_default();

        render_template(
            templates::CREATE_DOMAIN,
            &[
                ("name", &self.name(&domain.name)),
                ("underlyingType", &domain.underlying_type),
                ("notNull", if domain.not_null { " NOT NULL" } else { "" }),
                ("default", &default),
                ("check", &check),
            ],
        )
    }

    fn drop_type(&self, name: &ObjectName) -> String {
        render_template(templates::DROP_TYPE, &[("name", &self.name(name))])
    }

    fn drop_domain(&self, name: &ObjectName) -> String {
        render_template(templates::DROP_DOMAIN, &[("name", &self.name(name))])
    }

    fn add_enum_value(&self, name: &ObjectName, value: &str) -> String {
        render_template(
            templates::ADD_ENUM_VALUE,
            &[("name", &self.name(name)), ("value", &quote_literal(value))],
        )
    }

    fn add_type_attribute(&self, name: &ObjectName, attribute: &ColumnDefinition) -> String {
        render_template(
            templates::ADD_TYPE_ATTRIBUTE,
            &[
                ("name", &self.name(name)),
                (
                    "definition",
                    &format!("{} {}", wrap_in_quotes(&attribute.name), attribute.data_type),
                ),
            ],
        )
    }

    fn drop_type_attribute(&self, name: &ObjectName, attribute_name: &str) -> String {
        render_template(
            templates::DROP_TYPE_ATTRIBUTE,
            &[
                ("name", &self.name(name)),
                ("attributeName", &wrap_in_quotes(attribute_name)),
            ],
        )
    }

    fn rename_type_attribute(&self, name: &ObjectName, old_name: &str, new_name: &str) -> String {
        render_template(
            templates::RENAME_TYPE_ATTRIBUTE,
            &[
                ("name", &self.name(name)),
                ("oldName", &wrap_in_quotes(old_name)),
                ("newName", &wrap_in_quotes(new_name)),
            ],
        )
    }

    fn alter_type_attribute(
        &self,
        name: &ObjectName,
        attribute_name: &str,
        data_type: &str,
    ) -> String {
        render_template(
            templates::ALTER_TYPE_ATTRIBUTE,
            &[
                ("name", &self.name(name)),
                ("attributeName", &wrap_in_quotes(attribute_name)),
                ("dataType", data_type),
            ],
        )
    }

    fn create_sequence(&self, name: &ObjectName, options: &SequenceOptions) -> String {
        render_template(
            templates::CREATE_SEQUENCE,
            &[
                ("name", &self.name(name)),
                ("options", &self.sequence_options(options)),
            ],
        )
    }

    fn alter_sequence(&self, name: &ObjectName, options: &SequenceOptions) -> String {
        if options.is_empty() {
            return String::new();
        }

        render_template(
            templates::ALTER_SEQUENCE,
            &[
                ("name", &self.name(name)),
                ("options", &self.sequence_options(options)),
            ],
        )
    }

    fn rename_sequence(&self, name: &ObjectName, new_name: &str) -> String {
        render_template(
            templates::RENAME_SEQUENCE,
            &[
                ("oldName", &self.name(name)),
                ("newName", &wrap_in_quotes(new_name)),
            ],
        )
    }

    fn drop_sequence(&self, name: &ObjectName) -> String {
        render_template(templates::DROP_SEQUENCE, &[("name", &self.name(name))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> PostgresDdlProvider {
        PostgresDdlProvider::default()
    }

    fn key_params(kind: KeyKind, name: &str, columns: &[&str]) -> KeyConstraintParams {
        KeyConstraintParams {
            table: ObjectName::new("T"),
            constraint_name: name.to_string(),
            kind,
            columns: columns.iter().map(|c| KeyColumn::new(*c, true)).collect(),
            options: KeyClauseOptions::default(),
            is_entity_activated: true,
        }
    }

    // =========================================================================
    // スキーマ・テーブル
    // =========================================================================

    #[test]
    fn test_create_and_drop_schema() {
        assert_eq!(provider().create_schema("sales"), "CREATE SCHEMA IF NOT EXISTS sales;");
        assert_eq!(provider().drop_schema("Sales"), r#"DROP SCHEMA IF EXISTS "Sales";"#);
        assert_eq!(
            provider().rename_schema("a", "b"),
            "ALTER SCHEMA a RENAME TO b;"
        );
    }

    #[test]
    fn test_create_table_with_keys_checks_and_inactive_column() {
        let mut id = ColumnDefinition::new("id", "integer");
        id.not_null = true;
        id.inline_keys.push(InlineKey {
            kind: KeyKind::Primary,
            constraint_name: None,
            options: KeyClauseOptions::default(),
        });
        let mut legacy = ColumnDefinition::new("legacy", "text");
        legacy.is_activated = false;

        let table = TableDefinition {
            name: ObjectName::qualified(Some("sales"), "orders"),
            columns: vec![id, ColumnDefinition::new("amount", "numeric(10,2)"), legacy],
            keys: vec![],
            checks: vec![CheckConstraint::new("chk_amount", "amount > 0")],
        };

        assert_eq!(
            provider().create_table(&table),
            "CREATE TABLE IF NOT EXISTS sales.orders (\n\
             \tid integer NOT NULL PRIMARY KEY,\n\
             \tamount numeric(10,2),\n\
             \tCONSTRAINT chk_amount CHECK (amount > 0)\n\
             \t-- legacy text\n\
             );"
        );
    }

    #[test]
    fn test_rename_and_drop_table() {
        let table = ObjectName::qualified(Some("sales"), "orders");
        assert_eq!(
            provider().rename_table(&table, "purchases"),
            "ALTER TABLE IF EXISTS sales.orders RENAME TO purchases;"
        );
        assert_eq!(provider().drop_table(&table), "DROP TABLE IF EXISTS sales.orders;");
    }

    // =========================================================================
    // カラム
    // =========================================================================

    #[test]
    fn test_add_column_with_default_and_unique() {
        let mut column = ColumnDefinition::new("email", "varchar(255)");
        column.default = Some("''".to_string());
        column.inline_keys.push(InlineKey {
            kind: KeyKind::Unique,
            constraint_name: Some("users_email_key".to_string()),
            options: KeyClauseOptions::default(),
        });

        assert_eq!(
            provider().add_column(&ObjectName::new("users"), &column),
            "ALTER TABLE IF EXISTS users ADD COLUMN IF NOT EXISTS email varchar(255) DEFAULT '' CONSTRAINT users_email_key UNIQUE;"
        );
    }

    #[test]
    fn test_column_alterations() {
        let table = ObjectName::new("users");
        assert_eq!(
            provider().alter_column_type(&table, "age", "bigint"),
            "ALTER TABLE IF EXISTS users ALTER COLUMN age SET DATA TYPE bigint;"
        );
        assert_eq!(
            provider().drop_not_null(&table, "age"),
            "ALTER TABLE IF EXISTS users ALTER COLUMN age DROP NOT NULL;"
        );
        assert_eq!(
            provider().set_default(&table, "age", "0"),
            "ALTER TABLE IF EXISTS users ALTER COLUMN age SET DEFAULT 0;"
        );
        assert_eq!(
            provider().drop_column(&table, "Age"),
            r#"ALTER TABLE IF EXISTS users DROP COLUMN IF EXISTS "Age";"#
        );
    }

    // =========================================================================
    // コメント
    // =========================================================================

    #[test]
    fn test_comment_on_column_and_clear() {
        let target = CommentTarget::Column {
            table: ObjectName::new("t"),
            column: "c".to_string(),
        };

        assert_eq!(
            provider().comment_on(&target, Some("it's")),
            "COMMENT ON COLUMN t.c IS 'it''s';"
        );
        assert_eq!(
            provider().comment_on(&target, None),
            "COMMENT ON COLUMN t.c IS NULL;"
        );
    }

    // =========================================================================
    // 制約
    // =========================================================================

    #[test]
    fn test_add_key_constraint_with_options() {
        let mut params = key_params(KeyKind::Unique, "t_uk", &["a", "b"]);
        params.options = KeyClauseOptions {
            nulls_distinct: Some("NULLS NOT DISTINCT".to_string()),
            include: vec!["c".to_string()],
            storage_parameters: Some("fillfactor=70".to_string()),
            tablespace: Some("fast".to_string()),
            deferrable: Some("DEFERRABLE".to_string()),
            deferrable_check_time: Some("INITIALLY DEFERRED".to_string()),
        };

        let result = provider().add_key_constraint(&params);

        assert_eq!(
            result.statement,
            r#"ALTER TABLE IF EXISTS "T" ADD CONSTRAINT t_uk UNIQUE NULLS NOT DISTINCT (a, b) INCLUDE (c) WITH (fillfactor=70) USING INDEX TABLESPACE fast DEFERRABLE INITIALLY DEFERRED;"#
        );
        assert!(result.is_activated);
    }

    #[test]
    fn test_nulls_distinct_requires_v15() {
        let mut params = key_params(KeyKind::Unique, "t_uk", &["a"]);
        params.options.nulls_distinct = Some("NULLS NOT DISTINCT".to_string());

        let statement = PostgresDdlProvider::new(DbVersion::new(14))
            .add_key_constraint(&params)
            .statement;

        assert!(!statement.contains("NULLS"));
    }

    #[test]
    fn test_key_constraint_activation_depends_on_columns() {
        let mut params = key_params(KeyKind::Primary, "T_pk", &["a", "b"]);
        params.columns[1].is_activated = false;
        assert!(!provider().add_key_constraint(&params).is_activated);

        let mut params = key_params(KeyKind::Primary, "T_pk", &["a"]);
        params.is_entity_activated = false;
        assert!(!provider().add_key_constraint(&params).is_activated);
    }

    #[test]
    fn test_check_constraint_statements() {
        let mut check = CheckConstraint::new("chk1", "x>=0");
        check.no_inherit = true;
        let table = ObjectName::new("t");

        assert_eq!(
            provider().add_check_constraint(&table, &check),
            "ALTER TABLE IF EXISTS t ADD CONSTRAINT chk1 CHECK (x>=0) NO INHERIT;"
        );
        assert_eq!(
            provider().drop_constraint(&table, "chk1"),
            "ALTER TABLE IF EXISTS t DROP CONSTRAINT IF EXISTS chk1;"
        );
    }

    #[test]
    fn test_foreign_key_statements() {
        let params = ForeignKeyParams {
            name: "fk_orders_users".to_string(),
            child_table: ObjectName::new("orders"),
            child_columns: vec![KeyColumn::new("user_id", true)],
            parent_table: ObjectName::new("users"),
            parent_columns: vec![KeyColumn::new("id", true)],
            match_type: Some("FULL".to_string()),
            on_delete: Some("CASCADE".to_string()),
            on_update: None,
            is_relationship_activated: true,
            is_child_activated: true,
            is_parent_activated: false,
        };

        let add = provider().add_foreign_key(&params);
        assert_eq!(
            add.statement,
            "ALTER TABLE IF EXISTS orders ADD CONSTRAINT fk_orders_users FOREIGN KEY (user_id) REFERENCES users(id) MATCH FULL ON DELETE CASCADE;"
        );
        assert!(!add.is_activated);

        let drop = provider().drop_foreign_key(&params);
        assert_eq!(
            drop.statement,
            "ALTER TABLE IF EXISTS orders DROP CONSTRAINT IF EXISTS fk_orders_users;"
        );
    }

    // =========================================================================
    // ビュー・型・シーケンス
    // =========================================================================

    #[test]
    fn test_create_view_strips_trailing_semicolon() {
        let mut view = View::new("active_users", "SELECT * FROM users WHERE active;\n");
        view.or_replace = true;

        assert_eq!(
            provider().create_view(&view),
            "CREATE OR REPLACE VIEW active_users AS SELECT * FROM users WHERE active;"
        );
        assert_eq!(provider().create_view(&View::new("v", "  ")), "");
    }

    #[test]
    fn test_user_defined_types() {
        let name = ObjectName::new("mood");
        assert_eq!(
            provider().create_enum_type(&name, &["sad".to_string(), "ok".to_string()]),
            "CREATE TYPE mood AS ENUM ('sad', 'ok');"
        );
        assert_eq!(
            provider().add_enum_value(&name, "happy"),
            "ALTER TYPE mood ADD VALUE IF NOT EXISTS 'happy';"
        );

        let domain = DomainDefinition {
            name: ObjectName::new("positive_int"),
            underlying_type: "integer".to_string(),
            not_null: true,
            default: Some("1".to_string()),
            check_expression: Some("VALUE > 0".to_string()),
        };
        assert_eq!(
            provider().create_domain(&domain),
            "CREATE DOMAIN positive_int AS integer NOT NULL DEFAULT 1 CHECK (VALUE > 0);"
        );

        let composite = provider().create_composite_type(
            &ObjectName::new("address"),
            &[
                ColumnDefinition::new("street", "text"),
                ColumnDefinition::new("zip", "varchar(10)"),
            ],
        );
        assert_eq!(
            composite,
            "CREATE TYPE address AS (\n\tstreet text,\n\tzip varchar(10)\n);"
        );
    }

    #[test]
    fn test_sequence_statements() {
        let name = ObjectName::qualified(Some("sales"), "order_seq");
        let options = SequenceOptions {
            data_type: Some("bigint".to_string()),
            increment: Some(1),
            start: Some(100),
            cycle: Some(true),
            owned_by: Some(SequenceOwner::Column {
                table: ObjectName::qualified(Some("sales"), "orders"),
                column: "id".to_string(),
            }),
            ..SequenceOptions::default()
        };

        assert_eq!(
            provider().create_sequence(&name, &options),
            "CREATE SEQUENCE IF NOT EXISTS sales.order_seq AS bigint INCREMENT BY 1 START WITH 100 CYCLE OWNED BY sales.orders.id;"
        );
        assert_eq!(provider().alter_sequence(&name, &SequenceOptions::default()), "");
        assert_eq!(
            provider().rename_sequence(&name, "orders_seq"),
            "ALTER SEQUENCE IF EXISTS sales.order_seq RENAME TO orders_seq;"
        );
    }
}
