// スキーマモデル
//
// モデリングツールが出力するスキーマスナップショットの各オブジェクト
// （スキーマ、テーブル、カラム、キー制約、ビュー、ユーザー定義型、リレーションシップ）を表現します。
// フィールド名はホストのJSON形式（camelCase）に合わせています。

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// 空文字列をNoneとして扱う
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// スキーマ（コンテナ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// スキーマ名
    pub name: String,

    /// コメント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 有効化フラグ
    #[serde(default = "default_true")]
    pub is_activated: bool,

    /// スキーマに属するシーケンス
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sequences: Vec<Sequence>,
}

impl Container {
    /// 新しいスキーマを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_activated: true,
            sequences: Vec::new(),
        }
    }
}

/// シーケンス定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    /// 安定ID（リネームをまたいで同一性を判定する）
    pub id: String,
    pub sequence_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<i64>,
    #[serde(default)]
    pub cycle: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by_column: Option<String>,
    #[serde(default = "default_true")]
    pub is_activated: bool,
}

impl Sequence {
    /// 新しいシーケンスを作成
    pub fn new(id: impl Into<String>, sequence_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence_name: sequence_name.into(),
            data_type: None,
            increment: None,
            start: None,
            min_value: None,
            max_value: None,
            cache: None,
            cycle: false,
            owned_by_table: None,
            owned_by_column: None,
            is_activated: true,
        }
    }
}

/// テーブル（エンティティ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// テーブル名
    pub name: String,

    /// 所属スキーマ名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,

    /// 有効化フラグ
    #[serde(default = "default_true")]
    pub is_activated: bool,

    /// カラム（定義順）
    #[serde(default)]
    pub columns: Vec<Column>,

    /// NOT NULLカラム名のリスト
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// 複合主キー
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<KeyConstraint>,

    /// 複合ユニークキー
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_key: Vec<KeyConstraint>,

    /// CHECK制約
    #[serde(default, rename = "chkConstr", skip_serializing_if = "Vec::is_empty")]
    pub check_constraints: Vec<CheckConstraint>,

    /// コメント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity {
    /// 新しいテーブルを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: None,
            is_activated: true,
            columns: Vec::new(),
            required: Vec::new(),
            primary_key: Vec::new(),
            unique_key: Vec::new(),
            check_constraints: Vec::new(),
            description: None,
        }
    }

    /// カラムを追加
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// カラムがNOT NULL指定されているか
    pub fn is_required(&self, column_name: &str) -> bool {
        self.required.iter().any(|name| name == column_name)
    }
}

/// カラムの型情報
///
/// `type` はモデル上の論理型、`mode` はSQL上の具体型を表します。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeSpec {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl TypeSpec {
    /// SQL型名を指定して型情報を作成
    pub fn named(mode: impl Into<String>) -> Self {
        Self {
            mode: Some(mode.into()),
            ..Self::default()
        }
    }

    /// 未指定の項目をfallbackで補完した型情報を返す
    pub fn merged_with(&self, fallback: &TypeSpec) -> TypeSpec {
        TypeSpec {
            data_type: self.data_type.clone().or_else(|| fallback.data_type.clone()),
            mode: self.mode.clone().or_else(|| fallback.mode.clone()),
            length: self.length.or(fallback.length),
            precision: self.precision.or(fallback.precision),
            scale: self.scale.or(fallback.scale),
        }
    }

    /// SQL上の型表記を組み立てる
    ///
    /// `mode` を優先し、なければ `type` を使います。どちらもなければNoneを返します。
    pub fn render(&self) -> Option<String> {
        let base = non_empty(&self.mode).or_else(|| non_empty(&self.data_type))?;

        if base.contains('(') {
            return Some(base.to_string());
        }

        let rendered = match (self.length, self.precision, self.scale) {
            (Some(length), _, _) => format!("{}({})", base, length),
            (None, Some(precision), Some(scale)) => format!("{}({},{})", base, precision, scale),
            (None, Some(precision), None) => format!("{}({})", base, precision),
            _ => base.to_string(),
        };

        Some(rendered)
    }
}

/// カラム定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// 安定ID（リネームをまたいで同一性を判定する）
    #[serde(rename = "GUID")]
    pub guid: String,

    /// カラム名
    pub name: String,

    /// 型情報
    #[serde(flatten)]
    pub type_spec: TypeSpec,

    /// 定義参照（`$ref`）
    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// 有効化フラグ
    #[serde(default = "default_true")]
    pub is_activated: bool,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key_options: Vec<KeyOptions>,

    #[serde(default)]
    pub unique: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_key_options: Vec<KeyOptions>,

    /// 複合主キーの構成カラムかどうか
    #[serde(default)]
    pub composite_primary_key: bool,

    /// 複合ユニークキーの構成カラムかどうか
    #[serde(default)]
    pub composite_unique_key: bool,

    /// デフォルト値（SQL式）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// コメント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Column {
    /// 新しいカラムを作成
    pub fn new(guid: impl Into<String>, name: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            type_spec: TypeSpec::named(mode),
            reference: None,
            is_activated: true,
            primary_key: false,
            primary_key_options: Vec::new(),
            unique: false,
            unique_key_options: Vec::new(),
            composite_primary_key: false,
            composite_unique_key: false,
            default: None,
            description: None,
        }
    }
}

/// キー制約の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Primary,
    Unique,
}

impl KeyKind {
    /// テーブル上の複合キー定義
    pub fn composite_keys(self, entity: &Entity) -> &[KeyConstraint] {
        match self {
            KeyKind::Primary => &entity.primary_key,
            KeyKind::Unique => &entity.unique_key,
        }
    }

    /// カラムにキーフラグが立っているか
    pub fn is_key(self, column: &Column) -> bool {
        match self {
            KeyKind::Primary => column.primary_key,
            KeyKind::Unique => column.unique,
        }
    }

    /// カラムが複合キーの構成カラムか
    pub fn is_composite_member(self, column: &Column) -> bool {
        match self {
            KeyKind::Primary => column.composite_primary_key,
            KeyKind::Unique => column.composite_unique_key,
        }
    }

    /// カラム単体で表現される（レギュラー）キーか
    pub fn is_regular(self, column: &Column) -> bool {
        self.is_key(column) && !self.is_composite_member(column)
    }

    /// レギュラーキーのオプション
    pub fn regular_options(self, column: &Column) -> &[KeyOptions] {
        match self {
            KeyKind::Primary => &column.primary_key_options,
            KeyKind::Unique => &column.unique_key_options,
        }
    }

    /// SQLキーワード
    pub fn keyword(self) -> &'static str {
        match self {
            KeyKind::Primary => "PRIMARY KEY",
            KeyKind::Unique => "UNIQUE",
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::Primary => write!(f, "primary key"),
            KeyKind::Unique => write!(f, "unique key"),
        }
    }
}

/// キー制約が参照するカラム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyColumnRef {
    /// 参照先カラムのGUID
    pub key_id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
}

impl KeyColumnRef {
    /// GUIDを指定して参照を作成
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_type: None,
        }
    }
}

/// キー制約のオプション
///
/// レギュラーキーではカラムの `primaryKeyOptions[0]` / `uniqueKeyOptions[0]` に、
/// 複合キーでは制約定義そのものに同じ項目が並びます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_storage_parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_tablespace: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub index_include: Vec<KeyColumnRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferrable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferrable_constraint_check_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nulls_distinct: Option<String>,
}

impl KeyOptions {
    /// 制約名を指定してオプションを作成
    pub fn named(constraint_name: impl Into<String>) -> Self {
        Self {
            constraint_name: Some(constraint_name.into()),
            ..Self::default()
        }
    }

    /// 空文字列の項目をNoneにしたオプション
    pub fn normalized(&self) -> KeyOptions {
        let blank_to_none = |value: &Option<String>| non_empty(value).map(str::to_string);

        KeyOptions {
            constraint_name: blank_to_none(&self.constraint_name),
            index_storage_parameters: blank_to_none(&self.index_storage_parameters),
            index_tablespace: blank_to_none(&self.index_tablespace),
            index_include: self.index_include.clone(),
            deferrable: blank_to_none(&self.deferrable),
            deferrable_constraint_check_time: blank_to_none(&self.deferrable_constraint_check_time),
            nulls_distinct: blank_to_none(&self.nulls_distinct),
        }
    }
}

/// 複合キー制約
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyConstraint {
    #[serde(default)]
    pub id: String,

    /// 構成カラム（GUID参照）
    #[serde(default, alias = "compositePrimaryKey", alias = "compositeUniqueKey")]
    pub columns: Vec<KeyColumnRef>,

    #[serde(flatten)]
    pub options: KeyOptions,
}

impl KeyConstraint {
    /// 構成カラムのGUIDを指定して制約を作成
    pub fn new(id: impl Into<String>, key_ids: &[&str]) -> Self {
        Self {
            id: id.into(),
            columns: key_ids.iter().map(|key_id| KeyColumnRef::new(*key_id)).collect(),
            options: KeyOptions::default(),
        }
    }

    /// `id` を除いて同一の定義か
    ///
    /// カラムはGUIDだけで比較し、空文字列のオプションは未指定として扱います。
    pub fn is_equivalent(&self, other: &KeyConstraint) -> bool {
        self.columns
            .iter()
            .map(|c| &c.key_id)
            .eq(other.columns.iter().map(|c| &c.key_id))
            && self.options.normalized() == other.options.normalized()
    }
}

/// CHECK制約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConstraint {
    #[serde(rename = "chkConstrName")]
    pub name: String,
    #[serde(rename = "constrExpression", default)]
    pub expression: String,
    #[serde(default)]
    pub no_inherit: bool,
}

impl CheckConstraint {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            no_inherit: false,
        }
    }
}

/// ビュー定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default)]
    pub select_statement: String,
    #[serde(default)]
    pub or_replace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_activated: bool,
}

impl View {
    pub fn new(name: impl Into<String>, select_statement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: None,
            select_statement: select_statement.into(),
            or_replace: false,
            description: None,
            is_activated: true,
        }
    }
}

/// ユーザー定義型の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UdtKind {
    Enum,
    Composite,
    Domain,
}

/// ユーザー定義型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Udt {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    pub kind: UdtKind,
    /// ENUMの値
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// 複合型の属性
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Column>,
    /// ドメインの基底型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<String>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_activated: bool,
}

impl Udt {
    pub fn new(name: impl Into<String>, kind: UdtKind) -> Self {
        Self {
            name: name.into(),
            schema_name: None,
            kind,
            enum_values: Vec::new(),
            attributes: Vec::new(),
            underlying_type: None,
            not_null: false,
            default: None,
            check_expression: None,
            description: None,
            is_activated: true,
        }
    }
}

/// 外部キーの片側（参照元または参照先）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEnd {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_activated: bool,
    #[serde(default)]
    pub columns: Vec<RelationshipColumn>,
}

impl RelationshipEnd {
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: table.into(),
            schema_name: None,
            is_activated: true,
            columns: columns.iter().map(|name| RelationshipColumn::new(*name)).collect(),
        }
    }

    /// 有効化フラグを除いた定義が同じか
    fn has_same_definition(&self, other: &RelationshipEnd) -> bool {
        self.table == other.table
            && self.schema_name == other.schema_name
            && self
                .columns
                .iter()
                .map(|c| &c.name)
                .eq(other.columns.iter().map(|c| &c.name))
    }
}

/// 外部キーに含まれるカラム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipColumn {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_activated: bool,
}

impl RelationshipColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_activated: true,
        }
    }
}

/// リレーションシップ（外部キー制約）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub parent: RelationshipEnd,
    pub child: RelationshipEnd,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    #[serde(default = "default_true")]
    pub is_activated: bool,
}

impl Relationship {
    /// `id` と有効化フラグを除いた定義が同じか
    pub fn has_same_definition(&self, other: &Relationship) -> bool {
        self.name == other.name
            && self.parent.has_same_definition(&other.parent)
            && self.child.has_same_definition(&other.child)
            && self.on_delete == other.on_delete
            && self.on_update == other.on_update
            && self.match_type == other.match_type
    }
}
