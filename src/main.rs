use std::ffi::OsString;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gemini_models::prelude::*;
use tracing_subscriber::EnvFilter;

/// Print the generative-language models whose name contains a filter.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// substring the model name must contain, case-sensitive
    #[arg(short, long, env = "MODEL_FILTER", default_value = DEFAULT_FILTER)]
    filter: String,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "GEMINI_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "GEMINI_API_VERSION", default_value = DEFAULT_VERSION)]
    api_version: String,

    /// request timeout in seconds, 0 waits forever
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// dotenv file to load before reading the environment
    #[arg(long)]
    env_file: Option<String>,
}

// clap reads `env = ...` fallbacks at parse time, so the env file has to be
// known from a first pass before the real one
fn env_file_from<I, T>(args: I) -> Option<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(args).ok().and_then(|a| a.env_file)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match env_file_from(std::env::args_os()) {
        Some(env_file) => {
            dotenv::from_filename(&env_file)
                .with_context(|| format!("failed to load env file {}", env_file))?;
        }
        None => {
            let _ = dotenv::dotenv();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(env_file) = &args.env_file {
        tracing::debug!(%env_file, "loaded env file");
    }

    let api_key = args
        .api_key
        .filter(|k| !k.is_empty())
        .context("api key missing, set GEMINI_API_KEY or pass --api-key")?;

    let timeout = match args.timeout {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let client = Client::builder()
        .with_base_url(&args.base_url)?
        .with_version(&args.api_version)?
        .with_authenticator(ApiKey::new(api_key))?
        .with_timeout(timeout)
        .build()?;

    let matches = list_matching_models(&client, &args.filter, None)
        .await
        .context("failed to list models")?;

    print_matches(&mut std::io::stdout().lock(), &matches)?;

    Ok(())
}

#[cfg(test)]
#[test]
fn test_env_file_from_ok() {
    assert_eq!(
        env_file_from(["gemini-models", "--env-file", ".env.test", "-f", "flash"]),
        Some(".env.test".to_string())
    );
    assert_eq!(
        env_file_from(["gemini-models", "--env-file=.env.prod"]),
        Some(".env.prod".to_string())
    );
    assert_eq!(env_file_from(["gemini-models", "-f", "flash"]), None);

    // a filter value that looks like the flag is still the filter
    assert_eq!(env_file_from(["gemini-models", "--filter=--env-file"]), None);
    assert_eq!(env_file_from(["gemini-models", "-f", "--env-file"]), None);

    // nothing after `--` is a flag
    assert_eq!(env_file_from(["gemini-models", "--", "--env-file", ".env"]), None);
}
