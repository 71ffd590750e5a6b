// テーブル差分
//
// 変更されたテーブルの前後スナップショットと、カラムの索引（GUID・名前）を
// 1度だけ組み立てて各エミッターに渡します。

use std::collections::HashMap;

use crate::adapters::ddl_provider::ObjectName;
use crate::core::schema::{Column, Entity};

/// カラムの同一性を判定するキー（GUID、なければ名前）
fn column_key(column: &Column) -> &str {
    if column.guid.trim().is_empty() {
        &column.name
    } else {
        &column.guid
    }
}

/// 前後スナップショットのカラム索引
#[derive(Debug, Clone)]
pub struct ColumnIndex<'a> {
    old_by_guid: HashMap<&'a str, &'a Column>,
    new_by_guid: HashMap<&'a str, &'a Column>,
    old_by_name: HashMap<&'a str, &'a Column>,
    new_by_name: HashMap<&'a str, &'a Column>,
}

impl<'a> ColumnIndex<'a> {
    pub fn new(old: &'a Entity, new: &'a Entity) -> Self {
        Self {
            old_by_guid: old.columns.iter().map(|c| (column_key(c), c)).collect(),
            new_by_guid: new.columns.iter().map(|c| (column_key(c), c)).collect(),
            old_by_name: old.columns.iter().map(|c| (c.name.as_str(), c)).collect(),
            new_by_name: new.columns.iter().map(|c| (c.name.as_str(), c)).collect(),
        }
    }

    pub fn old_by_guid(&self, guid: &str) -> Option<&'a Column> {
        self.old_by_guid.get(guid).copied()
    }

    pub fn new_by_guid(&self, guid: &str) -> Option<&'a Column> {
        self.new_by_guid.get(guid).copied()
    }

    pub fn old_by_name(&self, name: &str) -> Option<&'a Column> {
        self.old_by_name.get(name).copied()
    }

    pub fn new_by_name(&self, name: &str) -> Option<&'a Column> {
        self.new_by_name.get(name).copied()
    }
}

/// 前後両方に存在するカラムの組
#[derive(Debug, Clone, Copy)]
pub struct ColumnPair<'a> {
    pub old: &'a Column,
    pub new: &'a Column,
}

impl ColumnPair<'_> {
    pub fn is_renamed(&self) -> bool {
        self.old.name != self.new.name
    }
}

/// 変更されたテーブルの差分
#[derive(Debug, Clone)]
pub struct TableDelta<'a> {
    pub old: &'a Entity,
    pub new: &'a Entity,
    pub columns: ColumnIndex<'a>,
}

impl<'a> TableDelta<'a> {
    pub fn new(old: &'a Entity, new: &'a Entity) -> Self {
        Self {
            old,
            new,
            columns: ColumnIndex::new(old, new),
        }
    }

    /// 現在のテーブル名
    pub fn table_name(&self) -> &'a str {
        &self.new.name
    }

    /// 変更前のテーブル（スキーマ修飾名）
    pub fn old_table(&self) -> ObjectName {
        ObjectName::of_entity(self.old)
    }

    /// 変更後のテーブル（スキーマ修飾名）
    pub fn new_table(&self) -> ObjectName {
        ObjectName::of_entity(self.new)
    }

    /// 新規追加されたカラム（変更後の定義順）
    pub fn added_columns(&self) -> Vec<&'a Column> {
        self.new
            .columns
            .iter()
            .filter(|c| self.columns.old_by_guid(column_key(c)).is_none())
            .collect()
    }

    /// 削除されたカラム（変更前の定義順）
    pub fn deleted_columns(&self) -> Vec<&'a Column> {
        self.old
            .columns
            .iter()
            .filter(|c| self.columns.new_by_guid(column_key(c)).is_none())
            .collect()
    }

    /// 前後両方に存在するカラム（変更後の定義順）
    pub fn persisted_columns(&self) -> Vec<ColumnPair<'a>> {
        self.new
            .columns
            .iter()
            .filter_map(|new| {
                self.columns
                    .old_by_guid(column_key(new))
                    .map(|old| ColumnPair { old, new })
            })
            .collect()
    }

    /// 変更前の名前から変更後のカラムを引く（リネームを追跡する）
    pub fn current_of_old_name(&self, old_name: &str) -> Option<&'a Column> {
        let old = self.columns.old_by_name(old_name)?;
        self.columns.new_by_guid(column_key(old))
    }

    /// 変更後の名前から変更前のカラムを引く
    pub fn previous_of_new_name(&self, new_name: &str) -> Option<&'a Column> {
        let new = self.columns.new_by_name(new_name)?;
        self.columns.old_by_guid(column_key(new))
    }
}
