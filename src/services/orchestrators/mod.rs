// オブジェクト種別ごとのオーケストレーター
//
// 追加・削除・変更のそれぞれについて、エミッターを呼ぶ順序を決めます。

pub mod container;
pub mod entity;
pub mod udt;
pub mod view;

pub use container::ContainerOrchestrator;
pub use entity::EntityOrchestrator;
pub use udt::UdtOrchestrator;
pub use view::ViewOrchestrator;
