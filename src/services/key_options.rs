// キーオプションの正規化
//
// 「論理的に同じ制約か」の判定に必要な項目（制約名、ストレージパラメータ、
// テーブルスペース、INCLUDEカラム）だけを取り出し、レギュラーキーと複合キーを
// 同じ形で比較できるようにします。遅延評価とNULLS DISTINCTはここでは比較しません。

use crate::core::schema::{non_empty, Column, KeyConstraint, KeyKind, KeyOptions};

/// 比較用のキーオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparableKeyOptions {
    pub constraint_name: Option<String>,
    pub index_storage_parameters: Option<String>,
    pub index_tablespace: Option<String>,
    /// INCLUDEカラムのGUID
    pub index_include: Vec<String>,
}

impl ComparableKeyOptions {
    /// オプション保持者から比較項目を取り出す（空文字列はNone扱い）
    pub fn extract(options: &KeyOptions) -> Self {
        Self {
            constraint_name: non_empty(&options.constraint_name).map(str::to_string),
            index_storage_parameters: non_empty(&options.index_storage_parameters)
                .map(str::to_string),
            index_tablespace: non_empty(&options.index_tablespace).map(str::to_string),
            index_include: options
                .index_include
                .iter()
                .map(|include| include.key_id.clone())
                .collect(),
        }
    }

    /// どの項目も指定されていないか
    pub fn is_empty(&self) -> bool {
        self.constraint_name.is_none()
            && self.index_storage_parameters.is_none()
            && self.index_tablespace.is_none()
            && self.index_include.is_empty()
    }
}

/// 複合キーの比較用オプション
///
/// 何も指定されていなければ空リストを返します。カスタムオプションを持たない
/// 複合キーが、オプションを持たないレギュラーキーと等しく比較されるためです。
pub fn composite_comparable_options(key: &KeyConstraint) -> Vec<ComparableKeyOptions> {
    let options = ComparableKeyOptions::extract(&key.options);
    if options.is_empty() {
        Vec::new()
    } else {
        vec![options]
    }
}

/// レギュラーキーの比較用オプション
///
/// カラムのオプション配列をそのまま変換します（空の要素も残ります）。
pub fn regular_comparable_options(kind: KeyKind, column: &Column) -> Vec<ComparableKeyOptions> {
    kind.regular_options(column)
        .iter()
        .map(ComparableKeyOptions::extract)
        .collect()
}

/// レギュラーキーのオプション全体（遅延評価等を含む）が変わったか
///
/// 何も指定されていない要素は比較から除外します。
pub fn regular_options_changed(kind: KeyKind, old: &Column, new: &Column) -> bool {
    let normalize = |column: &Column| {
        kind.regular_options(column)
            .iter()
            .map(NormalizedKeyOptions::from)
            .filter(|options| !options.is_empty())
            .collect::<Vec<_>>()
    };

    normalize(old) != normalize(new)
}

/// 空文字列を取り除いたキーオプション全体
#[derive(Debug, PartialEq, Eq)]
struct NormalizedKeyOptions {
    comparable: ComparableKeyOptions,
    deferrable: Option<String>,
    deferrable_constraint_check_time: Option<String>,
    nulls_distinct: Option<String>,
}

impl NormalizedKeyOptions {
    fn is_empty(&self) -> bool {
        self.comparable.is_empty()
            && self.deferrable.is_none()
            && self.deferrable_constraint_check_time.is_none()
            && self.nulls_distinct.is_none()
    }
}

impl From<&KeyOptions> for NormalizedKeyOptions {
    fn from(options: &KeyOptions) -> Self {
        Self {
            comparable: ComparableKeyOptions::extract(options),
            deferrable: non_empty(&options.deferrable).map(str::to_string),
            deferrable_constraint_check_time: non_empty(&options.deferrable_constraint_check_time)
                .map(str::to_string),
            nulls_distinct: non_empty(&options.nulls_distinct).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::KeyColumnRef;

    #[test]
    fn test_extract_treats_blank_as_absent() {
        let options = KeyOptions {
            constraint_name: Some("".to_string()),
            index_tablespace: Some("  ".to_string()),
            deferrable: Some("DEFERRABLE".to_string()),
            ..KeyOptions::default()
        };

        assert!(ComparableKeyOptions::extract(&options).is_empty());
    }

    #[test]
    fn test_composite_without_options_is_empty_list() {
        let key = KeyConstraint::new("k1", &["g1"]);
        assert!(composite_comparable_options(&key).is_empty());

        let mut key = KeyConstraint::new("k1", &["g1"]);
        key.options.index_include = vec![KeyColumnRef::new("g2")];
        assert_eq!(
            composite_comparable_options(&key),
            vec![ComparableKeyOptions {
                index_include: vec!["g2".to_string()],
                ..ComparableKeyOptions::default()
            }]
        );
    }

    #[test]
    fn test_regular_keeps_every_entry() {
        let mut column = Column::new("g1", "id", "integer");
        column.primary_key = true;
        assert!(regular_comparable_options(KeyKind::Primary, &column).is_empty());

        // 空の要素も1件として残る
        column.primary_key_options = vec![KeyOptions::default()];
        assert_eq!(regular_comparable_options(KeyKind::Primary, &column).len(), 1);
    }

    #[test]
    fn test_composite_and_regular_with_same_name_compare_equal() {
        let mut key = KeyConstraint::new("k1", &["g1"]);
        key.options.constraint_name = Some("t_pk".to_string());
        let mut column = Column::new("g1", "a", "integer");
        column.primary_key_options = vec![KeyOptions::named("t_pk")];

        assert_eq!(
            composite_comparable_options(&key),
            regular_comparable_options(KeyKind::Primary, &column)
        );
    }

    #[test]
    fn test_regular_options_changed_includes_deferrable() {
        let mut old = Column::new("g1", "a", "integer");
        old.unique_key_options = vec![KeyOptions::named("a_key")];
        let mut new = old.clone();
        assert!(!regular_options_changed(KeyKind::Unique, &old, &new));

        new.unique_key_options[0].deferrable = Some("DEFERRABLE".to_string());
        assert!(regular_options_changed(KeyKind::Unique, &old, &new));
        assert!(!regular_options_changed(KeyKind::Primary, &old, &new));
    }

    #[test]
    fn test_regular_options_changed_ignores_empty_entries() {
        let old = Column::new("g1", "a", "integer");
        let mut new = old.clone();
        new.primary_key_options = vec![KeyOptions {
            constraint_name: Some("".to_string()),
            ..KeyOptions::default()
        }];

        assert!(!regular_options_changed(KeyKind::Primary, &old, &new));
    }
}
