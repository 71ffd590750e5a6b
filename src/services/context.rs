// 生成サービスの共有コンテキスト
//
// DDLプロバイダーと定義参照の解決を1つの不変な値にまとめ、
// 各エミッター・オーケストレーターに明示的に渡します。

use crate::adapters::ddl_provider::{ColumnDefinition, DdlProvider, InlineKey, KeyClauseOptions};
use crate::core::schema::{non_empty, Column, Entity, KeyKind, KeyOptions};
use crate::services::reference_resolver::ReferenceResolver;

/// 生成サービス
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub provider: &'a dyn DdlProvider,
    pub references: ReferenceResolver<'a>,
}

impl<'a> Services<'a> {
    pub fn new(provider: &'a dyn DdlProvider, references: ReferenceResolver<'a>) -> Self {
        Self {
            provider,
            references,
        }
    }

    /// キーオプションをDDLの句に変換する
    ///
    /// INCLUDE句のカラムはGUIDから現在の名前に解決し、解決できないものは除外します。
    pub fn key_clause_options(&self, options: &KeyOptions, entity: &Entity) -> KeyClauseOptions {
        KeyClauseOptions {
            nulls_distinct: non_empty(&options.nulls_distinct).map(str::to_string),
            include: options
                .index_include
                .iter()
                .filter_map(|include| {
                    entity
                        .columns
                        .iter()
                        .find(|c| c.guid == include.key_id)
                        .map(|c| c.name.clone())
                })
                .collect(),
            storage_parameters: non_empty(&options.index_storage_parameters).map(str::to_string),
            tablespace: non_empty(&options.index_tablespace).map(str::to_string),
            deferrable: non_empty(&options.deferrable).map(str::to_string),
            deferrable_check_time: non_empty(&options.deferrable_constraint_check_time)
                .map(str::to_string),
        }
    }

    /// レギュラーキーのインライン句
    fn inline_key(&self, kind: KeyKind, column: &Column, entity: &Entity) -> InlineKey {
        let options = kind
            .regular_options(column)
            .first()
            .cloned()
            .unwrap_or_default();

        InlineKey {
            kind,
            constraint_name: non_empty(&options.constraint_name).map(str::to_string),
            options: self.key_clause_options(&options, entity),
        }
    }

    /// テーブルのカラム定義を組み立てる
    ///
    /// 型が決まらないカラムはNoneを返します。
    pub fn column_definition(&self, entity: &Entity, column: &Column) -> Option<ColumnDefinition> {
        let data_type = self.references.render_type(column)?;

        let inline_keys = [KeyKind::Primary, KeyKind::Unique]
            .into_iter()
            .filter(|kind| kind.is_regular(column))
            .map(|kind| self.inline_key(kind, column, entity))
            .collect();

        Some(ColumnDefinition {
            name: column.name.clone(),
            data_type,
            // 主キーは暗黙的にNOT NULLなので明示しない
            not_null: entity.is_required(&column.name) && !KeyKind::Primary.is_regular(column),
            default: non_empty(&column.default).map(str::to_string),
            inline_keys,
            is_activated: column.is_activated,
        })
    }

    /// 複合型の属性定義を組み立てる
    pub fn attribute_definition(&self, attribute: &Column) -> Option<ColumnDefinition> {
        let data_type = self.references.render_type(attribute)?;
        let mut definition = ColumnDefinition::new(attribute.name.clone(), data_type);
        definition.is_activated = attribute.is_activated;
        Some(definition)
    }
}
