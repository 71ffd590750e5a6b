// Altergenライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメイン（差分モデル、DDL文記述子、設定、エラー）
// - adapters: PostgreSQL方言のDDLテンプレートと識別子の引用
// - services: 参照解決、エミッター、オーケストレーター、スクリプト組み立て

pub mod adapters;
pub mod cli;
pub mod core;
pub mod services;
