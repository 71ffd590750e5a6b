// DDLテンプレートとテンプレート展開
//
// `${name}` 形式のプレースホルダーを値で置き換えます。
// 値が渡されなかったプレースホルダーは空文字列になります。

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z][A-Za-z0-9_]*)\}").ok());

/// テンプレートを展開する
///
/// # Examples
/// ```
/// use altergen::adapters::templates::render_template;
/// let sql = render_template("DROP TABLE IF EXISTS ${name};", &[("name", "users")]);
/// assert_eq!(sql, "DROP TABLE IF EXISTS users;");
/// ```
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        return template.to_string();
    };

    placeholder
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

// スキーマ
pub const CREATE_SCHEMA: &str = "CREATE SCHEMA IF NOT EXISTS ${name};";
pub const RENAME_SCHEMA: &str = "ALTER SCHEMA ${oldName} RENAME TO ${newName};";
pub const DROP_SCHEMA: &str = "DROP SCHEMA IF EXISTS ${name};";

// コメント
pub const COMMENT: &str = "COMMENT ON ${objectType} ${objectName} IS ${comment};";

// テーブル
pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS ${name} (\n${definitions}\n);";
pub const RENAME_TABLE: &str = "ALTER TABLE IF EXISTS ${oldName} RENAME TO ${newName};";
pub const DROP_TABLE: &str = "DROP TABLE IF EXISTS ${name};";

// カラム
pub const ADD_COLUMN: &str =
    "ALTER TABLE IF EXISTS ${tableName} ADD COLUMN IF NOT EXISTS ${columnDefinition};";
pub const DROP_COLUMN: &str = "ALTER TABLE IF EXISTS ${tableName} DROP COLUMN IF EXISTS ${columnName};";
pub const RENAME_COLUMN: &str =
    "ALTER TABLE IF EXISTS ${tableName} RENAME COLUMN ${oldName} TO ${newName};";
pub const ALTER_COLUMN_TYPE: &str =
    "ALTER TABLE IF EXISTS ${tableName} ALTER COLUMN ${columnName} SET DATA TYPE ${dataType};";
pub const SET_NOT_NULL: &str =
    "ALTER TABLE IF EXISTS ${tableName} ALTER COLUMN ${columnName} SET NOT NULL;";
pub const DROP_NOT_NULL: &str =
    "ALTER TABLE IF EXISTS ${tableName} ALTER COLUMN ${columnName} DROP NOT NULL;";
pub const SET_DEFAULT: &str =
    "ALTER TABLE IF EXISTS ${tableName} ALTER COLUMN ${columnName} SET DEFAULT ${defaultValue};";
pub const DROP_DEFAULT: &str =
    "ALTER TABLE IF EXISTS ${tableName} ALTER COLUMN ${columnName} DROP DEFAULT;";

// 制約
pub const ADD_CHECK_CONSTRAINT: &str = "ALTER TABLE IF EXISTS ${tableName} ADD CONSTRAINT ${constraintName} CHECK (${expression})${noInherit};";
pub const DROP_CONSTRAINT: &str =
    "ALTER TABLE IF EXISTS ${tableName} DROP CONSTRAINT IF EXISTS ${constraintName};";
pub const ADD_KEY_CONSTRAINT: &str = "ALTER TABLE IF EXISTS ${tableName} ADD CONSTRAINT ${constraintName} ${keyType}${nullsDistinct} (${columns})${include}${storageParameters}${tablespace}${deferrable}${checkTime};";
pub const ADD_FOREIGN_KEY: &str = "ALTER TABLE IF EXISTS ${childTable} ADD CONSTRAINT ${name} FOREIGN KEY (${childColumns}) REFERENCES ${parentTable}(${parentColumns})${match}${onDelete}${onUpdate};";

// ビュー
pub const CREATE_VIEW: &str = "CREATE${orReplace} VIEW ${name} AS ${selectStatement};";
pub const DROP_VIEW: &str = "DROP VIEW IF EXISTS ${name};";

// ユーザー定義型
pub const CREATE_ENUM_TYPE: &str = "CREATE TYPE ${name} AS ENUM (${values});";
pub const CREATE_COMPOSITE_TYPE: &str = "CREATE TYPE ${name} AS (\n${attributes}\n);";
pub const CREATE_DOMAIN: &str =
    "CREATE DOMAIN ${name} AS ${underlyingType}${notNull}${default}${check};";
pub const DROP_TYPE: &str = "DROP TYPE IF EXISTS ${name};";
pub const DROP_DOMAIN: &str = "DROP DOMAIN IF EXISTS ${name};";
pub const ADD_ENUM_VALUE: &str = "ALTER TYPE ${name} ADD VALUE IF NOT EXISTS ${value};";
pub const ADD_TYPE_ATTRIBUTE: &str = "ALTER TYPE ${name} ADD ATTRIBUTE ${definition};";
pub const DROP_TYPE_ATTRIBUTE: &str = "ALTER TYPE ${name} DROP ATTRIBUTE IF EXISTS ${attributeName};";
pub const RENAME_TYPE_ATTRIBUTE: &str =
    "ALTER TYPE ${name} RENAME ATTRIBUTE ${oldName} TO ${newName};";
pub const ALTER_TYPE_ATTRIBUTE: &str =
    "ALTER TYPE ${name} ALTER ATTRIBUTE ${attributeName} SET DATA TYPE ${dataType};";

// シーケンス
pub const CREATE_SEQUENCE: &str = "CREATE SEQUENCE IF NOT EXISTS ${name}${options};";
pub const ALTER_SEQUENCE: &str = "ALTER SEQUENCE IF EXISTS ${name}${options};";
pub const RENAME_SEQUENCE: &str = "ALTER SEQUENCE IF EXISTS ${oldName} RENAME TO ${newName};";
pub const DROP_SEQUENCE: &str = "DROP SEQUENCE IF EXISTS ${name};";
