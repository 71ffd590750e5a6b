// 命名ポリシー
//
// アプリケーション名と関連パス、既定の制約名の単一ソースを提供します。

/// 現行アプリケーション名
pub const APP_NAME: &str = "altergen";

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".altergen.yaml";

/// 主キー制約の既定名（`${entityName}_pk`）
///
/// 名前のない主キーとユニークキーの既定名は衝突しうるが、検出は行わない。
pub fn default_primary_key_name(entity_name: &str) -> String {
    format!("{}_pk", entity_name)
}

/// ユニークキー制約の既定名（`${entityName}_ukey`）
pub fn default_unique_key_name(entity_name: &str) -> String {
    format!("{}_ukey", entity_name)
}
