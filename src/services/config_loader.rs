// 設定ファイル読み込みサービス
//
// core::config の純粋性を保つため、ファイルI/Oはこのサービスに集約する。

use crate::core::config::Config;
use crate::core::error::ConfigError;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// 設定ファイル読み込みサービス
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// YAMLファイルから設定を読み込む
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = content
            .parse()
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        config.validate()?;

        debug!(path = ?path, db_version = %config.db_version, "Loaded config file");
        Ok(config)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// ファイルがなければデフォルト設定を返します。
    pub fn load_default() -> Result<Config> {
        let path = Path::new(Config::DEFAULT_CONFIG_PATH);
        if !path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Config::default());
        }
        Self::from_file(path)
    }

    /// 明示されたパス、なければデフォルトパスから設定を読み込む
    ///
    /// 明示されたファイルが存在しない場合はエラーです。
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }
            .into()),
            Some(path) => Self::from_file(path),
            None => Self::load_default(),
        }
    }
}
