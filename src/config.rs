use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Built language asset tree (metadata.json, <code>/language.json, <code>/<ns>.json)
    pub language_assets_dir: PathBuf,

    // Directory holding jquery.timeago.<code>.js files
    pub timeago_locales_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            language_assets_dir: path_var("LANGUAGE_ASSETS_DIR", "build/public/language")?,
            timeago_locales_dir: path_var("TIMEAGO_LOCALES_DIR", "node_modules/timeago/locales")?,
        })
    }
}

fn path_var(name: &str, default: &str) -> Result<PathBuf> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => anyhow::bail!("{} is set but empty", name),
        Ok(value) => Ok(PathBuf::from(value)),
        Err(std::env::VarError::NotPresent) => Ok(PathBuf::from(default)),
        Err(e) => Err(e).context(format!("{} is not valid unicode", name)),
    }
}
