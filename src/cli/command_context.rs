// コマンド共通コンテキスト
//
// 設定ファイル読み込みやパス解決の重複をCLI層で集約する。

use crate::core::config::Config;
use crate::core::delta::SchemaDelta;
use crate::services::alter_script_generator::parse_delta;
use crate::services::config_loader::ConfigLoader;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// プロジェクトルートから設定を読み込んでコンテキストを作成
    pub fn load(project_path: PathBuf) -> Result<Self> {
        Self::load_with_config(project_path, None)
    }

    /// カスタム設定ファイルパスを指定してコンテキストを作成
    ///
    /// 設定ファイルが明示されていなければ、プロジェクトルートの
    /// `.altergen.yaml` を読み込み、なければデフォルト設定を使います。
    pub fn load_with_config(
        project_path: PathBuf,
        custom_config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config = match custom_config_path {
            Some(path) => ConfigLoader::load(Some(&path)),
            None => {
                let default_path = project_path.join(Config::DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    ConfigLoader::from_file(&default_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
        .with_context(|| "Failed to read config file")?;

        Ok(Self {
            project_path,
            config,
        })
    }

    /// プロジェクトルート基準でパスを解決
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_path.join(path)
        }
    }

    /// 差分ファイルを読み込んでパース
    pub fn read_delta(&self, path: &Path) -> Result<SchemaDelta> {
        let path = self.resolve_path(path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read delta file: {:?}", path))?;

        parse_delta(&content).with_context(|| format!("Failed to parse delta file: {:?}", path))
    }
}
