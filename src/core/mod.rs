// Core Domain
// スキーマ差分モデル、DDL文記述子、設定、エラー、命名規則の純粋なドメイン定義

pub mod config;
pub mod delta;
pub mod error;
pub mod naming;
pub mod schema;
pub mod statement;
