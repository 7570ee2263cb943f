//! slackrpc binary entry point.
//!
//! Usage: slackrpc [--auth-key <token>] [--reauthenticate]
//!
//! Without a token, slackrpc runs the link handshake first: it prints a URL,
//! waits for the user to approve it, then relays activity from stdin.

mod cli;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::Args;
use slackrpc_auth::{Credentials, LinkClient, Orchestrator, PollConfig};
use slackrpc_config::{Config, Paths};
use slackrpc_relay::{EventRelay, JsonLinesBridge, JsonLinesSource};
use std::io::IsTerminal;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Defaults, then the config file, then `env`, then command-line flags.
fn load_config<F>(args: &Args, paths: &Paths, env: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::load_with(paths, env)
        .with_context(|| format!("Failed to load {}", paths.config_file().display()))?;
    args.apply(&mut config).context("Invalid command-line value")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// `--help` and `--version` exit cleanly; usage errors exit with failure.
fn parse_failure_status(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    info!(
        version = VERSION,
        api_url = %config.api_url,
        poll_interval_ms = config.poll_interval_ms,
        max_attempts = config.poll_max_attempts,
        "slackrpc starting"
    );

    let credentials = Credentials::from_configured(args.configured_token(&config));
    if args.reauthenticate {
        info!("Ignoring configured token, linking again");
    }

    let client = LinkClient::from_config(&config)?;
    let mut orchestrator = Orchestrator::new(client, PollConfig::from_config(&config))
        .with_link_callback(output::print_link);

    orchestrator
        .authenticate(&credentials)
        .await
        .context("Link handshake failed")?;
    output::print_success("Linked. Relaying activity from stdin.");

    let relay = EventRelay::new(&credentials, JsonLinesBridge::new(tokio::io::stdout()))?;
    let handle = relay.start(JsonLinesSource::new(BufReader::new(tokio::io::stdin())));
    let cancel = handle.cancel_handle();

    tokio::select! {
        result = handle.join() => {
            let stats = result?;
            info!(forwarded = stats.forwarded, failed = stats.failed, "Activity input closed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, exiting...");
            cancel.cancel();
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_failure_status(&e));
        }
    };

    let paths = match Paths::new() {
        Ok(paths) => paths,
        Err(e) => {
            output::print_error(&format!("Failed to resolve slackrpc home directory: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&args, &paths, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = observability::init_with_config(observability::LogConfig {
        service_name: "slackrpc".into(),
        default_level: config.log_level.clone(),
        log_path: args.log_path(&paths),
        ansi: std::io::stderr().is_terminal(),
    }) {
        output::print_error(&format!("Failed to initialize logging: {}", e));
        return ExitCode::FAILURE;
    }

    let config_file = paths.config_file();
    info!(
        config_file = %config_file.display(),
        from_file = config_file.exists(),
        "Configuration loaded"
    );

    output::print_banner(VERSION, &config.api_url);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(args, config));
    // A pending stdin read holds a blocking thread that never returns.
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{:#}", e);
            error!(error = %message, "slackrpc stopped");
            ExitCode::FAILURE
        }
    }
}
