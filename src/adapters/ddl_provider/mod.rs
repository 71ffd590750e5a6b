// DDLプロバイダーアダプター
//
// DDL操作の種類ごとに1メソッドを持つ純粋なレンダラー。
// サービス層は「どの操作を、どの引数で、どの順に」呼ぶかだけを決め、
// SQL構文の組み立てはすべてこの層が担当します。

pub mod postgres;

use crate::core::schema::{
    non_empty, CheckConstraint, Entity, KeyKind, Relationship, RelationshipEnd, Udt, View,
};

/// スキーマ修飾可能なオブジェクト名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    pub schema_name: Option<String>,
    pub name: String,
}

impl ObjectName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            name: name.into(),
        }
    }

    pub fn qualified(schema_name: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            name: name.into(),
        }
    }

    pub fn of_entity(entity: &Entity) -> Self {
        Self::qualified(entity.schema_name.as_deref(), entity.name.clone())
    }

    pub fn of_view(view: &View) -> Self {
        Self::qualified(view.schema_name.as_deref(), view.name.clone())
    }

    pub fn of_udt(udt: &Udt) -> Self {
        Self::qualified(udt.schema_name.as_deref(), udt.name.clone())
    }

    pub fn of_relationship_end(end: &RelationshipEnd) -> Self {
        Self::qualified(end.schema_name.as_deref(), end.table.clone())
    }
}

/// 有効化状態付きのDDL文
///
/// キー制約や外部キーのように、関与する全オブジェクトから有効化状態を
/// 算出する必要がある文で使います。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedStatement {
    pub statement: String,
    pub is_activated: bool,
}

/// キー制約句のオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyClauseOptions {
    pub nulls_distinct: Option<String>,
    /// INCLUDE句のカラム名（解決済み）
    pub include: Vec<String>,
    pub storage_parameters: Option<String>,
    pub tablespace: Option<String>,
    pub deferrable: Option<String>,
    pub deferrable_check_time: Option<String>,
}

/// キー制約に含まれるカラム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumn {
    pub name: String,
    pub is_activated: bool,
}

impl KeyColumn {
    pub fn new(name: impl Into<String>, is_activated: bool) -> Self {
        Self {
            name: name.into(),
            is_activated,
        }
    }
}

/// 名前付きキー制約（ALTER TABLE ADD CONSTRAINT / CREATE TABLE内の制約句）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConstraintParams {
    pub table: ObjectName,
    pub constraint_name: String,
    pub kind: KeyKind,
    pub columns: Vec<KeyColumn>,
    pub options: KeyClauseOptions,
    /// 所属テーブルの有効化状態
    pub is_entity_activated: bool,
}

/// カラム定義にインラインで付くキー制約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineKey {
    pub kind: KeyKind,
    pub constraint_name: Option<String>,
    pub options: KeyClauseOptions,
}

/// 解決済みのカラム定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default: Option<String>,
    pub inline_keys: Vec<InlineKey>,
    pub is_activated: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            not_null: false,
            default: None,
            inline_keys: Vec::new(),
            is_activated: true,
        }
    }
}

/// CREATE TABLE の定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: ObjectName,
    pub columns: Vec<ColumnDefinition>,
    pub keys: Vec<KeyConstraintParams>,
    pub checks: Vec<CheckConstraint>,
}

/// CREATE DOMAIN の定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDefinition {
    pub name: ObjectName,
    pub underlying_type: String,
    pub not_null: bool,
    pub default: Option<String>,
    pub check_expression: Option<String>,
}

/// 外部キー制約のパラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyParams {
    pub name: String,
    pub child_table: ObjectName,
    pub child_columns: Vec<KeyColumn>,
    pub parent_table: ObjectName,
    pub parent_columns: Vec<KeyColumn>,
    pub match_type: Option<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    pub is_relationship_activated: bool,
    pub is_child_activated: bool,
    pub is_parent_activated: bool,
}

impl ForeignKeyParams {
    pub fn from_relationship(relationship: &Relationship) -> Self {
        let key_columns = |end: &RelationshipEnd| {
            end.columns
                .iter()
                .map(|c| KeyColumn::new(c.name.clone(), c.is_activated))
                .collect::<Vec<_>>()
        };

        Self {
            name: relationship.name.clone(),
            child_table: ObjectName::of_relationship_end(&relationship.child),
            child_columns: key_columns(&relationship.child),
            parent_table: ObjectName::of_relationship_end(&relationship.parent),
            parent_columns: key_columns(&relationship.parent),
            match_type: non_empty(&relationship.match_type).map(str::to_string),
            on_delete: non_empty(&relationship.on_delete).map(str::to_string),
            on_update: non_empty(&relationship.on_update).map(str::to_string),
            is_relationship_activated: relationship.is_activated,
            is_child_activated: relationship.child.is_activated,
            is_parent_activated: relationship.parent.is_activated,
        }
    }
}

/// シーケンスの所有カラム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOwner {
    Column { table: ObjectName, column: String },
    /// 所有関係の解除（`OWNED BY NONE`）
    Detached,
}

/// シーケンスのオプション句
///
/// 値が入っている項目だけを出力します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceOptions {
    pub data_type: Option<String>,
    pub increment: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub start: Option<i64>,
    pub cache: Option<i64>,
    pub cycle: Option<bool>,
    pub owned_by: Option<SequenceOwner>,
}

impl SequenceOptions {
    pub fn is_empty(&self) -> bool {
        *self == SequenceOptions::default()
    }
}

/// COMMENT ON の対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    Schema(String),
    Table(ObjectName),
    Column { table: ObjectName, column: String },
    View(ObjectName),
    Type(ObjectName),
    Domain(ObjectName),
}

/// DDLプロバイダートレイト
///
/// 各操作は純粋関数で、文字列（または有効化状態付きの文）を返します。
pub trait DdlProvider {
    // スキーマ
    fn create_schema(&self, name: &str) -> String;
    fn rename_schema(&self, old_name: &str, new_name: &str) -> String;
    fn drop_schema(&self, name: &str) -> String;

    /// COMMENT ON 文（`comment` がNoneならNULLを設定する）
    fn comment_on(&self, target: &CommentTarget, comment: Option<&str>) -> String;

    // テーブル
    fn create_table(&self, table: &TableDefinition) -> String;
    fn rename_table(&self, table: &ObjectName, new_name: &str) -> String;
    fn drop_table(&self, table: &ObjectName) -> String;

    // カラム
    fn add_column(&self, table: &ObjectName, column: &ColumnDefinition) -> String;
    fn drop_column(&self, table: &ObjectName, column_name: &str) -> String;
    fn rename_column(&self, table: &ObjectName, old_name: &str, new_name: &str) -> String;
    fn alter_column_type(&self, table: &ObjectName, column_name: &str, data_type: &str) -> String;
    fn set_not_null(&self, table: &ObjectName, column_name: &str) -> String;
    fn drop_not_null(&self, table: &ObjectName, column_name: &str) -> String;
    fn set_default(&self, table: &ObjectName, column_name: &str, default_value: &str) -> String;
    fn drop_default(&self, table: &ObjectName, column_name: &str) -> String;

    // 制約
    fn add_check_constraint(&self, table: &ObjectName, check: &CheckConstraint) -> String;
    fn drop_constraint(&self, table: &ObjectName, constraint_name: &str) -> String;
    fn add_key_constraint(&self, params: &KeyConstraintParams) -> ActivatedStatement;
    fn add_foreign_key(&self, params: &ForeignKeyParams) -> ActivatedStatement;
    fn drop_foreign_key(&self, params: &ForeignKeyParams) -> ActivatedStatement;

    // ビュー
    fn create_view(&self, view: &View) -> String;
    fn drop_view(&self, view: &ObjectName) -> String;

    // ユーザー定義型
    fn create_enum_type(&self, name: &ObjectName, values: &[String]) -> String;
    fn create_composite_type(&self, name: &ObjectName, attributes: &[ColumnDefinition]) -> String;
    fn create_domain(&self, domain: &DomainDefinition) -> String;
    fn drop_type(&self, name: &ObjectName) -> String;
    fn drop_domain(&self, name: &ObjectName) -> String;
    fn add_enum_value(&self, name: &ObjectName, value: &str) -> String;
    fn add_type_attribute(&self, name: &ObjectName, attribute: &ColumnDefinition) -> String;
    fn drop_type_attribute(&self, name: &ObjectName, attribute_name: &str) -> String;
    fn rename_type_attribute(&self, name: &ObjectName, old_name: &str, new_name: &str) -> String;
    fn alter_type_attribute(&self, name: &ObjectName, attribute_name: &str, data_type: &str)
        -> String;

    // シーケンス
    fn create_sequence(&self, name: &ObjectName, options: &SequenceOptions) -> String;
    fn alter_sequence(&self, name: &ObjectName, options: &SequenceOptions) -> String;
    fn rename_sequence(&self, name: &ObjectName, new_name: &str) -> String;
    fn drop_sequence(&self, name: &ObjectName) -> String;
}
