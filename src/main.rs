use altergen::cli::commands::check::{CheckCommand, CheckCommandHandler};
use altergen::cli::commands::generate::{GenerateCommand, GenerateCommandHandler};
use altergen::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use colored::control as color_control;
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run_command(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// トレーシングを初期化する
///
/// RUST_LOG が設定されていればそれに従い、なければ --verbose で debug、通常は warn。
/// ログは標準出力のスクリプトと混ざらないよう標準エラーへ出力する。
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "altergen=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// コマンドを実行する
fn run_command(cli: Cli) -> Result<String> {
    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;

    // --config フラグの処理（絶対パスに変換）
    let config_path: Option<PathBuf> = cli.config.map(|p| {
        if p.is_absolute() {
            p
        } else {
            project_path.join(p)
        }
    });

    match cli.command {
        Commands::Generate {
            delta,
            level,
            skip_drop_statements,
            output,
        } => {
            let handler = GenerateCommandHandler::new();
            let command = GenerateCommand {
                project_path,
                config_path,
                delta_path: delta,
                level,
                skip_drop_statements,
                output_path: output,
                format: cli.format,
            };
            handler.execute(&command)
        }

        Commands::Check { delta } => {
            let handler = CheckCommandHandler::new();
            let command = CheckCommand {
                project_path,
                config_path,
                delta_path: delta,
                format: cli.format,
            };
            handler.execute(&command)
        }
    }
}
