// ALTERスクリプト生成サービス
//
// スキーマ差分を受け取り、コンテナレベル（全オブジェクト）と
// エンティティレベル（テーブルと外部キーのみ）の2つのスクリプトを生成します。
//
// 出力順序はステージの並びで明示的に決めます:
// 1. スキーマの追加・変更
// 2. ビューの削除、外部キーの削除
// 3. 型の追加、テーブルの追加・変更・削除
// 4. 型の変更・削除
// 5. ビューの追加・変更、外部キーの追加
// 6. スキーマの削除

use serde::Serialize;
use tracing::debug;

use crate::adapters::ddl_provider::postgres::PostgresDdlProvider;
use crate::core::config::{Config, DbVersion, ScriptLevel};
use crate::core::delta::SchemaDelta;
use crate::core::error::DeltaError;
use crate::core::statement::DdlStatement;
use crate::services::context::Services;
use crate::services::emitters::foreign_keys::ForeignKeyEmitter;
use crate::services::orchestrators::{
    ContainerOrchestrator, EntityOrchestrator, UdtOrchestrator, ViewOrchestrator,
};
use crate::services::reference_resolver::ReferenceResolver;
use crate::services::script_assembler::{contains_drop_statements, ScriptAssembler};

/// 生成オプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// 対象のPostgreSQLバージョン
    pub db_version: DbVersion,
    /// falseの場合、DROP系の文をコメントアウトする
    pub apply_drop_statements: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            db_version: DbVersion::default(),
            apply_drop_statements: true,
        }
    }
}

impl From<&Config> for GenerationOptions {
    fn from(config: &Config) -> Self {
        Self {
            db_version: config.db_version,
            apply_drop_statements: config.apply_drop_statements,
        }
    }
}

/// 生成結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlterScriptResult {
    pub entity_level_script: String,
    pub container_level_script: String,
    pub does_entity_level_alter_script_contain_drop_statements: bool,
    pub does_container_level_alter_script_contain_drop_statements: bool,
}

/// 生成ステージ（この並びがスクリプトの出力順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ContainersAdded,
    ContainersModified,
    ViewsDeleted,
    ForeignKeysDropped,
    UdtsAdded,
    EntitiesAdded,
    EntitiesModified,
    EntitiesDeleted,
    UdtsModified,
    UdtsDeleted,
    ViewsAdded,
    ViewsModified,
    ForeignKeysAdded,
    ContainersDeleted,
}

impl Stage {
    pub const ALL: [Stage; 14] = [
        Stage::ContainersAdded,
        Stage::ContainersModified,
        Stage::ViewsDeleted,
        Stage::ForeignKeysDropped,
        Stage::UdtsAdded,
        Stage::EntitiesAdded,
        Stage::EntitiesModified,
        Stage::EntitiesDeleted,
        Stage::UdtsModified,
        Stage::UdtsDeleted,
        Stage::ViewsAdded,
        Stage::ViewsModified,
        Stage::ForeignKeysAdded,
        Stage::ContainersDeleted,
    ];

    /// 表示用のステージ名
    pub fn label(self) -> &'static str {
        match self {
            Stage::ContainersAdded => "containers added",
            Stage::ContainersModified => "containers modified",
            Stage::ViewsDeleted => "views deleted",
            Stage::ForeignKeysDropped => "foreign keys dropped",
            Stage::UdtsAdded => "types added",
            Stage::EntitiesAdded => "tables added",
            Stage::EntitiesModified => "tables modified",
            Stage::EntitiesDeleted => "tables deleted",
            Stage::UdtsModified => "types modified",
            Stage::UdtsDeleted => "types deleted",
            Stage::ViewsAdded => "views added",
            Stage::ViewsModified => "views modified",
            Stage::ForeignKeysAdded => "foreign keys added",
            Stage::ContainersDeleted => "containers deleted",
        }
    }

    /// エンティティレベルのスクリプトにも含めるステージか
    pub fn is_entity_level(self) -> bool {
        matches!(
            self,
            Stage::ForeignKeysDropped
                | Stage::EntitiesAdded
                | Stage::EntitiesModified
                | Stage::EntitiesDeleted
                | Stage::ForeignKeysAdded
        )
    }
}

/// スキーマ差分文字列をパース
pub fn parse_delta(json: &str) -> Result<SchemaDelta, DeltaError> {
    SchemaDelta::from_json(json)
}

/// ALTERスクリプト生成サービス
#[derive(Debug, Clone, Default)]
pub struct AlterScriptGenerator {
    options: GenerationOptions,
}

impl AlterScriptGenerator {
    /// 新しい生成サービスを作成
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    /// JSON文字列から直接スクリプトを生成
    ///
    /// パースに失敗した場合は部分的なスクリプトを返さずにエラーを返します。
    pub fn generate_from_json(&self, json: &str) -> Result<AlterScriptResult, DeltaError> {
        let delta = parse_delta(json)?;
        Ok(self.generate(&delta))
    }

    /// スキーマ差分からスクリプトを生成
    pub fn generate(&self, delta: &SchemaDelta) -> AlterScriptResult {
        let provider = PostgresDdlProvider::new(self.options.db_version);
        let services = Services::new(&provider, ReferenceResolver::new(delta));

        let mut container_level = Vec::new();
        let mut entity_level = Vec::new();

        for stage in Stage::ALL {
            let statements = Self::run_stage(stage, services, delta);
            debug!(stage = stage.label(), count = statements.len(), "Stage completed");

            if stage.is_entity_level() {
                entity_level.extend(statements.iter().cloned());
            }
            container_level.extend(statements);
        }

        let assembler = ScriptAssembler::new(self.options.apply_drop_statements);

        AlterScriptResult {
            entity_level_script: assembler.assemble(&entity_level),
            container_level_script: assembler.assemble(&container_level),
            does_entity_level_alter_script_contain_drop_statements: contains_drop_statements(
                &entity_level,
            ),
            does_container_level_alter_script_contain_drop_statements: contains_drop_statements(
                &container_level,
            ),
        }
    }

    /// ステージごとの記述子を、そのままの順序で返す
    pub fn statements_by_stage(&self, delta: &SchemaDelta) -> Vec<(Stage, Vec<DdlStatement>)> {
        let provider = PostgresDdlProvider::new(self.options.db_version);
        let services = Services::new(&provider, ReferenceResolver::new(delta));

        Stage::ALL
            .into_iter()
            .map(|stage| (stage, Self::run_stage(stage, services, delta)))
            .collect()
    }

    /// 指定レベルのスクリプトに含まれる記述子を出力順で返す
    pub fn statements_for_level(&self, delta: &SchemaDelta, level: ScriptLevel) -> Vec<DdlStatement> {
        self.statements_by_stage(delta)
            .into_iter()
            .filter(|(stage, _)| level == ScriptLevel::Container || stage.is_entity_level())
            .flat_map(|(_, statements)| statements)
            .collect()
    }

    fn run_stage(stage: Stage, services: Services<'_>, delta: &SchemaDelta) -> Vec<DdlStatement> {
        let containers = ContainerOrchestrator::new(services);
        let entities = EntityOrchestrator::new(services);
        let views = ViewOrchestrator::new(services);
        let udts = UdtOrchestrator::new(services);
        let foreign_keys = ForeignKeyEmitter::new(services);

        match stage {
            Stage::ContainersAdded => delta
                .containers
                .added
                .iter()
                .flat_map(|c| containers.added(c))
                .collect(),
            Stage::ContainersModified => delta
                .containers
                .modified
                .iter()
                .flat_map(|m| containers.modified(&m.old, &m.new))
                .collect(),
            Stage::ViewsDeleted => delta
                .views
                .deleted
                .iter()
                .flat_map(|v| views.deleted(v))
                .collect(),
            Stage::ForeignKeysDropped => foreign_keys.drop_scripts(&delta.relationships),
            Stage::UdtsAdded => delta.udts.added.iter().flat_map(|u| udts.added(u)).collect(),
            Stage::EntitiesAdded => delta
                .entities
                .added
                .iter()
                .flat_map(|e| entities.added(e))
                .collect(),
            Stage::EntitiesModified => delta
                .entities
                .modified
                .iter()
                .flat_map(|m| entities.modified(&m.old, &m.new))
                .collect(),
            Stage::EntitiesDeleted => delta
                .entities
                .deleted
                .iter()
                .flat_map(|e| entities.deleted(e))
                .collect(),
            Stage::UdtsModified => delta
                .udts
                .modified
                .iter()
                .flat_map(|m| udts.modified(&m.old, &m.new))
                .collect(),
            Stage::UdtsDeleted => delta
                .udts
                .deleted
                .iter()
                .flat_map(|u| udts.deleted(u))
                .collect(),
            Stage::ViewsAdded => delta.views.added.iter().flat_map(|v| views.added(v)).collect(),
            Stage::ViewsModified => delta
                .views
                .modified
                .iter()
                .flat_map(|m| views.modified(&m.old, &m.new))
                .collect(),
            Stage::ForeignKeysAdded => foreign_keys.add_scripts(&delta.relationships),
            Stage::ContainersDeleted => delta
                .containers
                .deleted
                .iter()
                .flat_map(|c| containers.deleted(c))
                .collect(),
        }
    }
}
