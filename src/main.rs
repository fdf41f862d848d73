use anyhow::{Context, Result};
use callfire_rest::api::{Method, ParamPair};
use callfire_rest::{CliArgs, Config, Invocation};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "callfire-rest")]
#[command(about = "Send an authenticated request to the CallFire REST API")]
struct Cli {
    #[arg(short, long, help = "Path to a TOML or JSON config file")]
    config: Option<PathBuf>,

    #[arg(long, help = "API host, optionally with :port")]
    host: Option<String>,

    #[arg(long, help = "URL scheme (http or https)")]
    scheme: Option<String>,

    #[arg(long, help = "Base REST path")]
    path: Option<String>,

    #[arg(short, long, help = "API login")]
    login: Option<String>,

    #[arg(short, long, help = "API secret")]
    secret: Option<String>,

    #[arg(short = 'X', long, default_value = "GET", help = "HTTP method")]
    method: Method,

    #[arg(short = 'a', long = "append-path", help = "Suffix appended to the base path (repeatable)")]
    append_path: Vec<String>,

    #[arg(short, long, help = "Log request and response details")]
    debug: bool,

    #[arg(short, long, help = "Increase verbosity")]
    verbose: bool,

    #[arg(value_name = "KEY=VALUE", help = "Request parameters")]
    params: Vec<ParamPair>,
}

impl Cli {
    fn config_args(&self) -> CliArgs {
        CliArgs {
            config_file: self.config.clone(),
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            path: self.path.clone(),
            login: self.login.clone(),
            secret: self.secret.clone(),
            debug: self.debug,
            verbose: self.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_cli(&cli.config_args()).context("Failed to load configuration")?;

    let level = config
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let invocation = Invocation {
        method: cli.method,
        path_suffixes: cli.append_path,
        params: cli.params.into_iter().collect(),
    };

    callfire_rest::run(config, invocation).await?;
    Ok(())
}
