// エラー型定義
//
// ライブラリ全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、DeltaError と ConfigError を定義します。
// 参照先の欠落やオプション未指定はエラーではなく「変更なし」として扱うため、ここには現れません。

use std::path::PathBuf;
use thiserror::Error;

/// 差分入力エラー
///
/// 入力されたスキーマ差分が期待する形式でない場合に発生します。
/// このエラーが発生した場合、スクリプトは一切生成されません。
#[derive(Debug, Clone, Error)]
pub enum DeltaError {
    /// JSONとして解釈できない、または必須項目が欠けている
    #[error("Malformed schema delta: {message} (line: {line}, column: {column})")]
    MalformedInput {
        /// エラーメッセージ
        message: String,
        /// エラー発生行
        line: usize,
        /// エラー発生列
        column: usize,
    },

    /// ルートがJSONオブジェクトではない
    #[error("Malformed schema delta: expected a JSON object at the root, found {found}")]
    UnexpectedRoot {
        /// 実際に見つかった値の種類
        found: String,
    },
}

impl DeltaError {
    /// 入力形式エラーかどうか
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            DeltaError::MalformedInput { .. } | DeltaError::UnexpectedRoot { .. }
        )
    }

    /// エラー発生位置（行, 列）を取得
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            DeltaError::MalformedInput { line, column, .. } => Some((*line, *column)),
            DeltaError::UnexpectedRoot { .. } => None,
        }
    }
}

impl From<serde_json::Error> for DeltaError {
    fn from(error: serde_json::Error) -> Self {
        DeltaError::MalformedInput {
            message: error.to_string(),
            line: error.line(),
            column: error.column(),
        }
    }
}

/// 設定エラー
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// 設定ファイルが見つからない
    #[error("Config file not found: {path:?}")]
    NotFound {
        /// 指定されたパス
        path: PathBuf,
    },

    /// 不正なDBバージョン表記
    #[error("Invalid db_version '{value}': expected a PostgreSQL major version such as 'v15'")]
    InvalidDbVersion {
        /// 指定された値
        value: String,
    },

    /// 不正なスクリプトレベル
    #[error("Invalid script level '{value}': expected 'container' or 'entity'")]
    InvalidLevel {
        /// 指定された値
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_error_from_serde_json_keeps_position() {
        let json_error = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }").unwrap_err();
        let error = DeltaError::from(json_error);

        assert!(error.is_malformed_input());
        let (line, column) = error.location().unwrap();
        assert_eq!(line, 2);
        assert!(column > 0);
        assert!(error.to_string().starts_with("Malformed schema delta:"));
    }

    #[test]
    fn test_unexpected_root_has_no_location() {
        let error = DeltaError::UnexpectedRoot {
            found: "array".to_string(),
        };

        assert!(error.is_malformed_input());
        assert_eq!(error.location(), None);
        assert_eq!(
            error.to_string(),
            "Malformed schema delta: expected a JSON object at the root, found array"
        );
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::InvalidDbVersion {
            value: "latest".to_string(),
        };
        assert!(error.to_string().contains("'latest'"));

        let error = ConfigError::InvalidLevel {
            value: "table".to_string(),
        };
        assert!(error.to_string().contains("'container' or 'entity'"));
    }
}
