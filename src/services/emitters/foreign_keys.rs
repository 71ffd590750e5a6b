// 外部キーの差分エミッター
//
// 外部キーの削除はテーブル変更より前に、追加はすべてのテーブルの作成・変更が
// 終わった後に出力するため、削除と追加を別々に生成します。

use crate::adapters::ddl_provider::ForeignKeyParams;
use crate::core::delta::Buckets;
use crate::core::schema::Relationship;
use crate::core::statement::DdlStatement;
use crate::services::context::Services;

pub struct ForeignKeyEmitter<'a> {
    services: Services<'a>,
}

impl<'a> ForeignKeyEmitter<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    /// 削除されたリレーションシップと、定義が変わったリレーションシップの旧定義
    pub fn drop_scripts(&self, relationships: &Buckets<Relationship>) -> Vec<DdlStatement> {
        let changed_old = relationships
            .modified
            .iter()
            .filter(|m| !m.old.has_same_definition(&m.new))
            .map(|m| &m.old);

        relationships
            .deleted
            .iter()
            .chain(changed_old)
            .filter_map(|relationship| {
                let result = self
                    .services
                    .provider
                    .drop_foreign_key(&ForeignKeyParams::from_relationship(relationship));
                DdlStatement::drop(result.statement, result.is_activated)
            })
            .collect()
    }

    /// 追加されたリレーションシップと、定義が変わったリレーションシップの新定義
    pub fn add_scripts(&self, relationships: &Buckets<Relationship>) -> Vec<DdlStatement> {
        let changed_new = relationships
            .modified
            .iter()
            .filter(|m| !m.old.has_same_definition(&m.new))
            .map(|m| &m.new);

        relationships
            .added
            .iter()
            .chain(changed_new)
            .filter_map(|relationship| {
                let result = self
                    .services
                    .provider
                    .add_foreign_key(&ForeignKeyParams::from_relationship(relationship));
                DdlStatement::create(result.statement, result.is_activated)
            })
            .collect()
    }
}
