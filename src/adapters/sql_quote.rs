// SQL識別子・リテラルのクォートユーティリティ
//
// PostgreSQL向けに、必要な場合のみ識別子をダブルクォートで囲み、
// 文字列リテラルをシングルクォートでエスケープします。

use regex::Regex;
use std::sync::LazyLock;

/// クォート不要な識別子（小文字・数字・アンダースコア）
static PLAIN_IDENTIFIER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_$]*$").ok());

/// クォートが必要なPostgreSQLの予約語
const RESERVED_WORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant",
    "group", "having", "ilike", "in", "initially", "inner", "intersect", "into", "is",
    "isnull", "join", "lateral", "leading", "left", "like", "limit", "localtime",
    "localtimestamp", "natural", "not", "notnull", "null", "offset", "on", "only", "or",
    "order", "outer", "overlaps", "placing", "primary", "references", "returning", "right",
    "select", "session_user", "similar", "some", "symmetric", "system_user", "table",
    "tablesample", "then", "to", "trailing", "true", "union", "unique", "user", "using",
    "variadic", "verbose", "when", "where", "window", "with",
];

/// PostgreSQL用識別子クォート（常にダブルクォート）
///
/// 識別子内のダブルクォートは二重にエスケープします。
///
/// # Examples
/// ```
/// use altergen::adapters::sql_quote::quote_identifier_postgres;
/// assert_eq!(quote_identifier_postgres("users"), r#""users""#);
/// assert_eq!(quote_identifier_postgres(r#"table"name"#), r#""table""name""#);
/// ```
pub fn quote_identifier_postgres(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 必要な場合のみ識別子をクォートする
///
/// 小文字の単純な識別子で予約語でなければそのまま返します。
///
/// # Examples
/// ```
/// use altergen::adapters::sql_quote::wrap_in_quotes;
/// assert_eq!(wrap_in_quotes("users"), "users");
/// assert_eq!(wrap_in_quotes("Users"), r#""Users""#);
/// assert_eq!(wrap_in_quotes("order"), r#""order""#);
/// ```
pub fn wrap_in_quotes(name: &str) -> String {
    let is_plain = PLAIN_IDENTIFIER
        .as_ref()
        .map(|re| re.is_match(name))
        .unwrap_or(false);

    if is_plain && !RESERVED_WORDS.contains(&name) {
        name.to_string()
    } else {
        quote_identifier_postgres(name)
    }
}

/// スキーマ修飾した名前を組み立てる
pub fn qualified_name(schema_name: Option<&str>, name: &str) -> String {
    match schema_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(schema) => format!("{}.{}", wrap_in_quotes(schema), wrap_in_quotes(name)),
        None => wrap_in_quotes(name),
    }
}

/// カラム名リストをクォートしてカンマ区切りで結合
pub fn quote_columns<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| wrap_in_quotes(c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 文字列リテラルとしてクォート
///
/// # Examples
/// ```
/// use altergen::adapters::sql_quote::quote_literal;
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_in_quotes_plain_identifier() {
        assert_eq!(wrap_in_quotes("users"), "users");
        assert_eq!(wrap_in_quotes("user_id2"), "user_id2");
        assert_eq!(wrap_in_quotes("_tmp"), "_tmp");
    }

    #[test]
    fn test_wrap_in_quotes_mixed_case_and_special_chars() {
        assert_eq!(wrap_in_quotes("CamelCase"), r#""CamelCase""#);
        assert_eq!(wrap_in_quotes("T_pk"), r#""T_pk""#);
        assert_eq!(wrap_in_quotes("table name"), r#""table name""#);
        assert_eq!(wrap_in_quotes("1st"), r#""1st""#);
        assert_eq!(wrap_in_quotes(r#"a"b"#), r#""a""b""#);
    }

    #[test]
    fn test_wrap_in_quotes_reserved_word() {
        assert_eq!(wrap_in_quotes("select"), r#""select""#);
        assert_eq!(wrap_in_quotes("user"), r#""user""#);
        assert_eq!(wrap_in_quotes("group"), r#""group""#);
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name(Some("sales"), "orders"), "sales.orders");
        assert_eq!(qualified_name(Some(""), "orders"), "orders");
        assert_eq!(qualified_name(None, "Orders"), r#""Orders""#);
    }

    #[test]
    fn test_quote_columns() {
        assert_eq!(quote_columns(&["id", "Name"]), r#"id, "Name""#);
        assert_eq!(quote_columns::<String>(&[]), "");
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("legacy"), "'legacy'");
        assert_eq!(quote_literal(""), "''");
        assert_eq!(quote_literal("a'b'c"), "'a''b''c'");
    }
}
