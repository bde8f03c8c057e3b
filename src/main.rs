//! Voice Transfer CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_transfer::cli::{
    config_cmd::handle_config_command, init_logging, load_merged_config, run_accounts, run_parse,
    run_register_voice, run_transfer, Cli, Commands, Presenter, TransferOptions, EXIT_ERROR,
};
use voice_transfer::domain::config::AppConfig;
use voice_transfer::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let store = XdgConfigStore::new();

    // Password comes from env/file/prompt only
    let cli_config = AppConfig {
        base_url: cli.base_url.clone(),
        username: cli.username.clone(),
        log_level: cli.log_level.clone(),
        ..AppConfig::empty()
    };
    let config = load_merged_config(&store, &Presenter::new(), cli_config).await;
    init_logging(config.log_level_or_default());

    match cli.command {
        Commands::Parse { text } => run_parse(&text),
        Commands::Accounts { refresh } => run_accounts(&config, refresh).await,
        Commands::Transfer {
            text,
            audio,
            from,
            memo,
            yes,
        } => {
            let options = TransferOptions {
                text,
                audio,
                from_account: from,
                memo,
                assume_yes: yes,
            };
            run_transfer(&config, options).await
        }
        Commands::RegisterVoice { audio } => run_register_voice(&config, &audio).await,
        Commands::Config { action } => {
            let presenter = Presenter::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
