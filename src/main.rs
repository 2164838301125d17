use anyhow::Context;
use clap::Parser;
use restaurant_reservation::adapters::password::hash_password;
use restaurant_reservation::config::Command;
use restaurant_reservation::utils::{logger, validation::Validate};
use restaurant_reservation::{app, AppConfig, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // works before any config file exists
    if let Command::HashPassword { password } = &cli.command {
        logger::init_cli_logger(cli.verbose, false);
        let outcome = hash_password(password).map(|hash| serde_json::json!({ "password_hash": hash }));
        return print_outcome(outcome);
    }

    let config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load config file '{}'", cli.config))?;

    logger::init_cli_logger(cli.verbose, config.logging.json);
    tracing::debug!("Loaded configuration from {}", cli.config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    print_outcome(app::run(&config, cli.token.as_deref(), cli.command))
}

fn print_outcome(outcome: restaurant_reservation::Result<serde_json::Value>) -> anyhow::Result<()> {
    match outcome {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(e) => {
            let status = e.status_code();
            tracing::error!(status, category = ?e.category(), "Command failed: {}", e);
            eprintln!(
                "{}",
                serde_json::json!({ "status": status, "detail": e.user_friendly_message() })
            );

            let exit_code = match status {
                400 => 2,
                401 => 3,
                404 => 4,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
