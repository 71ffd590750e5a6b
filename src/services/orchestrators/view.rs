// ビューのオーケストレーター

use crate::adapters::ddl_provider::{CommentTarget, ObjectName};
use crate::core::schema::View;
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::comments::CommentEmitter;

pub struct ViewOrchestrator<'a> {
    services: Services<'a>,
}

impl<'a> ViewOrchestrator<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self { services }
    }

    /// 追加されたビュー（CREATE VIEW とコメント）
    pub fn added(&self, view: &View) -> Vec<DdlStatement> {
        let mut statements = Vec::new();

        // SELECT文がないビューは作成もコメントもしない
        let Some(create) =
            DdlStatement::create(self.services.provider.create_view(view), view.is_activated)
        else {
            return statements;
        };
        statements.push(create);
        statements.extend(CommentEmitter::new(self.services).creation_comment(
            &CommentTarget::View(ObjectName::of_view(view)),
            &view.description,
            view.is_activated,
        ));

        statements
    }

    /// 削除されたビュー
    pub fn deleted(&self, view: &View) -> Vec<DdlStatement> {
        DdlStatement::drop(
            self.services.provider.drop_view(&ObjectName::of_view(view)),
            view.is_activated,
        )
        .into_iter()
        .collect()
    }

    /// 変更されたビュー（コメントのみ）
    pub fn modified(&self, old: &View, new: &View) -> Vec<DdlStatement> {
        CommentEmitter::new(self.services)
            .comment_change(
                &CommentTarget::View(ObjectName::of_view(new)),
                &old.description,
                &new.description,
                new.is_activated,
            )
            .into_iter()
            .collect()
    }
}
