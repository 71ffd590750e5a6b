// スキーマ差分（デルタ）ドメインモデル
//
// 変更前後のスキーマスナップショット間の差分を表現する型。
// 変更されうる各ノードは added / deleted / modified の3つのバケットを持ち、
// modified は変更前（old）と変更後（new）の両方の状態を保持します。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::DeltaError;
use crate::core::schema::{Container, Entity, Relationship, TypeSpec, Udt, View};

/// 変更前後の状態の組
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modified<T> {
    /// 変更前の状態
    pub old: T,
    /// 変更後の状態
    pub new: T,
}

impl<T> Modified<T> {
    pub fn new(old: T, new: T) -> Self {
        Self { old, new }
    }
}

/// 追加・削除・変更のバケット
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buckets<T> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<T>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<T>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<Modified<T>>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            deleted: Vec::new(),
            modified: Vec::new(),
        }
    }
}

impl<T> Buckets<T> {
    /// 差分が空かどうか
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    /// 差分の項目数を取得
    pub fn count(&self) -> usize {
        self.added.len() + self.deleted.len() + self.modified.len()
    }

    /// 全バケットをタグ付きノードとして列挙する（added → deleted → modified の順）
    pub fn nodes(&self) -> impl Iterator<Item = DeltaNode<'_, T>> {
        self.added
            .iter()
            .map(DeltaNode::Added)
            .chain(self.deleted.iter().map(DeltaNode::Deleted))
            .chain(
                self.modified
                    .iter()
                    .map(|m| DeltaNode::Modified { old: &m.old, new: &m.new }),
            )
    }
}

/// 差分ノード
///
/// バケットの所属を網羅的にマッチできる形に変換したもの。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaNode<'a, T> {
    /// 新規作成（変更前の状態なし）
    Added(&'a T),
    /// 削除（変更後の状態なし）
    Deleted(&'a T),
    /// 変更（前後の状態あり）
    Modified { old: &'a T, new: &'a T },
}

impl<'a, T> DeltaNode<'a, T> {
    /// 変更前の状態
    pub fn previous(&self) -> Option<&'a T> {
        match *self {
            DeltaNode::Added(_) => None,
            DeltaNode::Deleted(item) => Some(item),
            DeltaNode::Modified { old, .. } => Some(old),
        }
    }

    /// 変更後の状態
    pub fn current(&self) -> Option<&'a T> {
        match *self {
            DeltaNode::Added(item) => Some(item),
            DeltaNode::Deleted(_) => None,
            DeltaNode::Modified { new, .. } => Some(new),
        }
    }
}

/// 定義参照先のスキーマ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSchema {
    #[serde(flatten)]
    pub type_spec: TypeSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// スキーマ差分のルート
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDelta {
    #[serde(default)]
    pub containers: Buckets<Container>,
    #[serde(default)]
    pub entities: Buckets<Entity>,
    #[serde(default)]
    pub views: Buckets<View>,
    #[serde(default)]
    pub udts: Buckets<Udt>,
    #[serde(default)]
    pub relationships: Buckets<Relationship>,

    /// モデル定義（`#model/definitions/...`）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub model_definitions: BTreeMap<String, DefinitionSchema>,
    /// 内部定義（`#/definitions/...`）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub internal_definitions: BTreeMap<String, DefinitionSchema>,
    /// 外部定義（`#external/definitions/...`）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub external_definitions: BTreeMap<String, DefinitionSchema>,
}

impl SchemaDelta {
    /// 空の差分を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON文字列から差分を読み込む
    ///
    /// 形式が不正な場合は位置情報付きの `DeltaError::MalformedInput` を返します。
    pub fn from_json(json: &str) -> Result<Self, DeltaError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(DeltaError::UnexpectedRoot {
                found: json_kind(&value).to_string(),
            });
        }

        // 型の不一致も行・列付きで報告するため、Valueからではなく文字列から再度読み込む
        Ok(serde_json::from_str(json)?)
    }

    /// 差分が空かどうか
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
            && self.entities.is_empty()
            && self.views.is_empty()
            && self.udts.is_empty()
            && self.relationships.is_empty()
    }

    /// 差分の項目数を取得
    pub fn count(&self) -> usize {
        self.containers.count()
            + self.entities.count()
            + self.views.count()
            + self.udts.count()
            + self.relationships.count()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
