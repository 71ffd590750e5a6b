// キー表現の遷移判定
//
// 1テーブル・1キー種別について、レギュラーキー（カラム単体）と複合キー（制約定義）の
// 間で表現が変わったかを判定し、変わった場合に実質的な定義変更かどうかを判定します。
// 参照先のカラムが見つからない場合は「遷移なし」として扱い、エラーにはしません。

use tracing::debug;

use crate::core::schema::{KeyConstraint, KeyKind};
use crate::services::key_options::{composite_comparable_options, regular_comparable_options};
use crate::services::table_delta::TableDelta;

/// 遷移の判定結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionVerdict {
    /// 表現の遷移が起きたか
    pub did_transition_happen: bool,
    /// 遷移が実質的な定義変更を伴うか（DROP＋ADDが必要か）
    pub was_changed: bool,
    /// 遷移したカラムのGUID
    pub column_guid: Option<String>,
}

impl TransitionVerdict {
    fn none() -> Self {
        Self::default()
    }

    fn happened(column_guid: &str, was_changed: bool) -> Self {
        Self {
            did_transition_happen: true,
            was_changed,
            column_guid: Some(column_guid.to_string()),
        }
    }

    /// 表現だけが変わった（DDL不要な）遷移か
    pub fn is_representation_only(&self) -> bool {
        self.did_transition_happen && !self.was_changed
    }

    /// 指定カラムについての表現だけの遷移か
    pub fn is_representation_only_for(&self, column_guid: &str) -> bool {
        self.is_representation_only() && self.column_guid.as_deref() == Some(column_guid)
    }
}

/// 複合キー群が制約するカラムIDが、全体でちょうど1つならそれを返す
fn single_column_id(keys: &[KeyConstraint]) -> Option<&str> {
    let mut ids = keys
        .iter()
        .flat_map(|key| key.columns.iter().map(|column| column.key_id.as_str()));
    let first = ids.next()?;
    match ids.next() {
        None => Some(first),
        Some(_) => None,
    }
}

/// キー表現の遷移判定
#[derive(Debug, Clone, Copy)]
pub struct KeyTransitionResolver {
    kind: KeyKind,
}

impl KeyTransitionResolver {
    pub fn new(kind: KeyKind) -> Self {
        Self { kind }
    }

    /// 複合キー → レギュラーキー の遷移を判定
    pub fn detect_composite_to_regular(&self, delta: &TableDelta<'_>) -> TransitionVerdict {
        let old_keys = self.kind.composite_keys(delta.old);
        let Some(column_id) = single_column_id(old_keys) else {
            return TransitionVerdict::none();
        };

        let Some(new_column) = delta.columns.new_by_guid(column_id) else {
            return TransitionVerdict::none();
        };

        if !self.kind.is_regular(new_column) {
            return TransitionVerdict::none();
        }

        let regular_options = regular_comparable_options(self.kind, new_column);
        let are_options_equal = old_keys.iter().any(|key| {
            key.columns.len() == 1 && composite_comparable_options(key) == regular_options
        });

        debug!(
            kind = %self.kind,
            table = %delta.table_name(),
            column_id = %column_id,
            was_changed = !are_options_equal,
            "Detected composite to regular key transition"
        );

        TransitionVerdict::happened(column_id, !are_options_equal)
    }

    /// レギュラーキー → 複合キー の遷移を判定
    pub fn detect_regular_to_composite(&self, delta: &TableDelta<'_>) -> TransitionVerdict {
        let new_keys = self.kind.composite_keys(delta.new);
        let Some(column_id) = single_column_id(new_keys) else {
            return TransitionVerdict::none();
        };

        let Some(old_column) = delta.columns.old_by_guid(column_id) else {
            return TransitionVerdict::none();
        };

        if !self.kind.is_regular(old_column) {
            return TransitionVerdict::none();
        }

        let regular_options = regular_comparable_options(self.kind, old_column);
        let are_options_equal = new_keys.iter().any(|key| {
            key.columns.len() == 1 && composite_comparable_options(key) == regular_options
        });

        debug!(
            kind = %self.kind,
            table = %delta.table_name(),
            column_id = %column_id,
            was_changed = !are_options_equal,
            "Detected regular to composite key transition"
        );

        TransitionVerdict::happened(column_id, !are_options_equal)
    }
}
