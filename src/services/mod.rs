// Services Layer
// ドメインロジックを実行するサービス層

pub mod alter_script_generator;
pub mod config_loader;
pub mod context;
pub mod emitters;
pub mod key_options;
pub mod key_transition;
pub mod orchestrators;
pub mod reference_resolver;
pub mod script_assembler;
pub mod table_delta;
