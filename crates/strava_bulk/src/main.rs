use clap::{CommandFactory, Parser};
use secrecy::SecretString;
use std::path::PathBuf;
use strava_bulk::cli::{Args, RunOptions};
use strava_bulk::config::{self, Configuration};
use strava_bulk::error::CliError;
use strava_bulk::{auth, export, generate};
use strava_client::config::Credentials;
use strava_client::http_client::ReqwestStravaClient;

const DEFAULT_BASE_URL: &str = "https://www.strava.com";
const DEFAULT_CREDENTIALS_PATH: &str = "data/strava_config";

fn base_url() -> String {
    std::env::var("STRAVA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

fn credentials_path() -> PathBuf {
    std::env::var("STRAVA_BULK_CREDENTIALS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_PATH))
}

/// Build the API client from the stored credentials. In simulate mode a
/// missing credential file is tolerated since no call will be made.
fn build_client(base: &str, simulate: bool) -> Result<ReqwestStravaClient, CliError> {
    match Credentials::load(&credentials_path()) {
        Ok(creds) => Ok(ReqwestStravaClient::new(base, creds.access_token)),
        Err(e) if simulate => {
            tracing::warn!("no usable credentials ({e}); continuing in simulate mode");
            Ok(ReqwestStravaClient::new(base, SecretString::new("".into())))
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from env var `STRAVA_BULK_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("STRAVA_BULK_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();

    if args.wants_help() {
        Args::command().print_help()?;
        println!();
        return Ok(());
    }

    let base = base_url();

    if args.generate {
        // The exchange endpoint needs no stored token.
        let client = ReqwestStravaClient::new(&base, SecretString::new("".into()));
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        auth::run(&client, &base, &credentials_path(), &mut input, &mut output).await?;
        return Ok(());
    }

    let configuration = Configuration::load(&config::config_path())?;

    if args.list_templates {
        println!("Displaying available activity templates");
        for name in configuration.template_names() {
            println!("- {name}");
        }
        return Ok(());
    }

    let opts = RunOptions::from_args(&args)?;

    if args.list_activities {
        let client = build_client(&base, false)?;
        let content = export::run(&client, &configuration, &opts, args.file.as_deref()).await?;
        match &args.file {
            Some(path) => println!("File {} has been written", path.display()),
            None => print!("{content}"),
        }
        return Ok(());
    }

    let template_name = args
        .activity
        .as_deref()
        .ok_or_else(|| CliError::Validation("the activity name is mandatory".into()))?;
    let client = build_client(&base, opts.simulate)?;
    generate::run(&client, &configuration, &opts, template_name).await?;
    Ok(())
}
