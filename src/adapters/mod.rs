// Adapters
// 方言固有のDDLテンプレートと識別子の引用処理

pub mod ddl_provider;
pub mod sql_quote;
pub mod templates;
