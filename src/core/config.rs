// 設定ファイル管理
//
// プロジェクトの設定ファイル（YAML形式）の型定義と検証を行います。
// ファイルI/Oは services::config_loader に集約しています。

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::ConfigError;

/// 対象とするPostgreSQLのメジャーバージョン
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DbVersion(u32);

impl DbVersion {
    /// 既定のバージョン（v15）
    pub const DEFAULT: DbVersion = DbVersion(15);

    pub fn new(major: u32) -> Self {
        Self(major)
    }

    pub fn major(self) -> u32 {
        self.0
    }

    /// `NULLS [NOT] DISTINCT` 句が使えるか（v15以降）
    pub fn supports_nulls_distinct(self) -> bool {
        self.0 >= 15
    }
}

impl Default for DbVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for DbVersion {
    type Err = ConfigError;

    /// `v15` / `15` / `v15.2` 形式を受け付ける
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidDbVersion {
            value: value.to_string(),
        };

        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let major = digits.split('.').next().unwrap_or_default();

        major.parse::<u32>().map(DbVersion).map_err(|_| invalid())
    }
}

impl TryFrom<String> for DbVersion {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DbVersion> for String {
    fn from(version: DbVersion) -> Self {
        version.to_string()
    }
}

impl std::fmt::Display for DbVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// 出力するスクリプトのレベル
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLevel {
    /// スキーマ全体（コンテナレベル）
    #[default]
    Container,
    /// テーブルと外部キーのみ（エンティティレベル）
    Entity,
}

impl FromStr for ScriptLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "container" => Ok(ScriptLevel::Container),
            "entity" => Ok(ScriptLevel::Entity),
            _ => Err(ConfigError::InvalidLevel {
                value: value.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ScriptLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptLevel::Container => write!(f, "container"),
            ScriptLevel::Entity => write!(f, "entity"),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_apply_drop_statements() -> bool {
    true
}

/// プロジェクト設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    #[serde(default = "default_version")]
    pub version: String,

    /// 対象PostgreSQLバージョン
    #[serde(default)]
    pub db_version: DbVersion,

    /// DROP系の文を実行可能な形で出力するか
    #[serde(default = "default_apply_drop_statements")]
    pub apply_drop_statements: bool,

    /// generateコマンドが出力するスクリプトのレベル
    #[serde(default)]
    pub level: ScriptLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            db_version: DbVersion::default(),
            apply_drop_statements: default_apply_drop_statements(),
            level: ScriptLevel::default(),
        }
    }
}

impl Config {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = crate::core::naming::CONFIG_FILE;

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(anyhow!("Config file version is not specified"));
        }

        Ok(())
    }
}

/// std::str::FromStrトレイトの実装
impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        serde_saphyr::from_str(yaml).with_context(|| "Failed to parse config file")
    }
}
