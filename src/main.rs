//! Locale asset inspection binary.
//!
//! Usage:
//!   locale-assets codes                      # Installed locale codes
//!   locale-assets list                       # Valid language records
//!   locale-assets get <language> <namespace> # One translation bundle
//!   locale-assets timeago <userLang>         # Timeago code for a user language
//!   locale-assets timeago-codes              # Available timeago codes
//!
//! Optional environment variables:
//! - LANGUAGE_ASSETS_DIR (defaults to build/public/language)
//! - TIMEAGO_LOCALES_DIR (defaults to node_modules/timeago/locales)

use anyhow::{Context, Result};
use locale_assets::config::Config;
use locale_assets::i18n::LocaleResolver;
use serde::Serialize;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_assets=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("list");

    let config = Config::from_env()?;
    let resolver = LocaleResolver::from_config(&config)?;

    match command {
        "codes" => print_json(&resolver.list_codes().await?)?,
        "list" => print_json(&resolver.list().await?)?,
        "get" => {
            let language = args.get(1).context("Usage: locale-assets get <language> <namespace>")?;
            let namespace = args.get(2).context("Usage: locale-assets get <language> <namespace>")?;
            let data = resolver
                .get(language, namespace)
                .await
                .with_context(|| format!("Failed to load {}/{}", language, namespace))?;
            print_json(&data)?;
        }
        "timeago" => {
            let user_lang = args.get(1).context("Usage: locale-assets timeago <userLang>")?;
            print_json(&resolver.user_timeago_code(user_lang).await?)?;
        }
        "timeago-codes" => {
            let codes: Vec<&str> = resolver.timeago_codes().iter().collect();
            print_json(&codes)?;
        }
        other => anyhow::bail!(
            "Unknown command '{}'. Expected one of: codes, list, get, timeago, timeago-codes",
            other
        ),
    }

    let report = serde_json::to_string(&resolver.metrics().report())
        .context("Failed to serialize metrics")?;
    info!("Resolver metrics: {}", report);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
