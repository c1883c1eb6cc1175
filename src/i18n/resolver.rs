//! Locale asset resolver.
//!
//! Reads the built language tree:
//!
//! ```text
//! <root>/metadata.json            {"languages": ["en-US", "fr", ...]}
//! <root>/<code>/language.json     {"name": ..., "code": ..., "dir": ...}
//! <root>/<language>/<ns>.json     translation bundle
//! ```
//!
//! The code list and the language list are cached for the lifetime of the
//! resolver once they load non-empty. Namespace bundles are never cached.

use crate::config::Config;
use crate::i18n::cache::CacheSlot;
use crate::i18n::error::{LocaleError, Result};
use crate::i18n::filter::{IdentityFilter, NamespaceContext, NamespaceFilter};
use crate::i18n::language::Language;
use crate::i18n::metrics::ResolverMetrics;
use crate::i18n::timeago::{user_lang_to_timeago_code, TimeagoCodes};
use anyhow::Context;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const METADATA_FILE: &str = "metadata.json";
const LANGUAGE_FILE: &str = "language.json";

#[derive(Debug, Deserialize)]
struct LanguageMetadata {
    languages: Vec<String>,
}

/// Read-through resolver over a language asset tree.
pub struct LocaleResolver {
    root: PathBuf,
    filter: Arc<dyn NamespaceFilter>,
    timeago_codes: TimeagoCodes,
    codes: CacheSlot<Vec<String>>,
    languages: CacheSlot<Vec<Language>>,
    metrics: ResolverMetrics,
}

impl LocaleResolver {
    /// Create a resolver rooted at `root` with a pass-through filter.
    pub fn new(root: impl Into<PathBuf>, timeago_codes: TimeagoCodes) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);

        Self {
            root: normalize(&root),
            filter: Arc::new(IdentityFilter),
            timeago_codes,
            codes: CacheSlot::new(),
            languages: CacheSlot::new(),
            metrics: ResolverMetrics::new(),
        }
    }

    /// Build a resolver from configuration, listing timeago locales once.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeago_codes = TimeagoCodes::from_dir(&config.timeago_locales_dir).with_context(|| {
            format!(
                "Failed to list timeago locales in {}",
                config.timeago_locales_dir.display()
            )
        })?;

        if timeago_codes.is_empty() {
            warn!("No timeago locales found; user timeago codes will be empty");
        }

        let resolver = Self::new(config.language_assets_dir.clone(), timeago_codes);
        info!(
            "Language root {} ({} timeago codes)",
            resolver.root().display(),
            resolver.timeago_codes().len()
        );
        Ok(resolver)
    }

    /// Install the filter hook applied to namespace bundles.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: NamespaceFilter + 'static,
    {
        self.filter = Arc::new(filter);
        self
    }

    /// Normalized absolute language root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn timeago_codes(&self) -> &TimeagoCodes {
        &self.timeago_codes
    }

    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    /// Load a namespace bundle for a language and run it through the filter.
    ///
    /// # Arguments
    /// * `language` - Language folder name (e.g., "en-GB")
    /// * `namespace` - Bundle base name without extension (e.g., "global")
    ///
    /// # Returns
    /// * `Ok(Value)` with whatever data the filter hook returned
    /// * `Err(LocaleError::InvalidPath)` if the path escapes the root; no file is read
    /// * `Err(LocaleError::NotFound | Parse | Io)` for read failures
    pub async fn get(&self, language: &str, namespace: &str) -> Result<Value> {
        let file_name = format!("{}.json", namespace);
        let path = self.contained_path(&[language, file_name.as_str()])?;

        let data: Value = self.read_json(&path).await?;
        let data = if data.is_null() {
            Value::Object(Map::new())
        } else {
            data
        };

        self.metrics.record_filter_call();
        let ctx = self
            .filter
            .filter(NamespaceContext {
                language: language.to_string(),
                namespace: namespace.to_string(),
                data,
            })
            .map_err(|source| LocaleError::Filter {
                language: language.to_string(),
                namespace: namespace.to_string(),
                source,
            })?;

        Ok(ctx.data)
    }

    /// List installed locale codes from `metadata.json`.
    ///
    /// A missing metadata file yields an empty list and leaves the cache
    /// empty, so the next call reads again.
    pub async fn list_codes(&self) -> Result<Vec<String>> {
        if let Some(codes) = self.codes.get() {
            self.metrics.record_code_cache_hit();
            debug!("Code list cache hit ({} codes)", codes.len());
            return Ok(codes);
        }
        self.metrics.record_code_cache_miss();

        let path = self.root.join(METADATA_FILE);
        let metadata: LanguageMetadata = match self.read_json(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.is_not_found() => {
                warn!("Language metadata missing at {}", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        if self.codes.fill(metadata.languages.clone()) {
            info!("Cached {} language codes", metadata.languages.len());
        }
        Ok(metadata.languages)
    }

    /// List valid language records, in code-list order.
    ///
    /// Reads every `language.json` concurrently. Missing files and records
    /// lacking `code`, `name` or `dir` are skipped; any other failure aborts
    /// the call without touching the cache.
    pub async fn list(&self) -> Result<Vec<Language>> {
        if let Some(languages) = self.languages.get() {
            self.metrics.record_list_cache_hit();
            debug!("Language list cache hit ({} languages)", languages.len());
            return Ok(languages);
        }
        self.metrics.record_list_cache_miss();

        let codes = self.list_codes().await?;
        let loaded = try_join_all(codes.iter().map(|code| self.read_language(code))).await?;

        let languages: Vec<Language> = loaded
            .into_iter()
            .flatten()
            .filter(Language::is_valid)
            .collect();

        if languages.len() < codes.len() {
            debug!(
                "Skipped {} of {} languages (missing or invalid language.json)",
                codes.len() - languages.len(),
                codes.len()
            );
        }

        if self.languages.fill(languages.clone()) {
            info!("Cached {} languages", languages.len());
        }
        Ok(languages)
    }

    /// Resolve the timeago code for a user's language.
    ///
    /// # Returns
    /// The mapped timeago code when `user_lang` is an installed code and the
    /// mapped code exists in the timeago dataset; an empty string otherwise.
    pub async fn user_timeago_code(&self, user_lang: &str) -> Result<String> {
        let codes = self.list_codes().await?;
        let candidate = user_lang_to_timeago_code(user_lang);

        if codes.iter().any(|code| code == user_lang) && self.timeago_codes.contains(candidate) {
            Ok(candidate.to_string())
        } else {
            Ok(String::new())
        }
    }

    /// Drop both cached lists. Intended for tests.
    pub fn reset_caches(&self) {
        self.codes.reset();
        self.languages.reset();
    }

    async fn read_language(&self, code: &str) -> Result<Option<Language>> {
        let path = match self.contained_path(&[code, LANGUAGE_FILE]) {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping language code {:?}: {}", code, e);
                return Ok(None);
            }
        };

        // A `null` document counts as an absent record
        match self.read_json::<Option<Language>>(&path).await {
            Ok(language) => Ok(language),
            Err(e) if e.is_not_found() => {
                debug!("No language.json for {}", code);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        self.metrics.record_file_read();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LocaleError::from_io(path.to_path_buf(), e))?;

        serde_json::from_str(&content).map_err(|source| LocaleError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Join `parts` onto the root and reject results outside it.
    fn contained_path(&self, parts: &[&str]) -> Result<PathBuf> {
        let joined = parts
            .iter()
            .fold(self.root.clone(), |path, part| path.join(part));
        let resolved = normalize(&joined);

        if resolved.starts_with(&self.root) && resolved != self.root {
            Ok(resolved)
        } else {
            Err(LocaleError::InvalidPath { path: resolved })
        }
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::error::BoxError;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
        std::fs::write(path, content).expect("write");
    }

    fn resolver(temp_dir: &TempDir) -> LocaleResolver {
        LocaleResolver::new(
            temp_dir.path(),
            TimeagoCodes::from_filenames(["jquery.timeago.en.js", "jquery.timeago.fr.js"]),
        )
    }

    // ==================== normalize Tests ====================

    #[test]
    fn test_normalize_resolves_parent_dirs() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/a/../../etc")), PathBuf::from("/etc"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_contained_path_rejects_traversal() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let resolver = resolver(&temp_dir);

        assert!(resolver.contained_path(&["en-US", "global.json"]).is_ok());
        assert!(resolver.contained_path(&["fr/../en-US", "global.json"]).is_ok());
        assert!(resolver.contained_path(&["../../etc", "passwd.json"]).is_err());
        assert!(resolver.contained_path(&["/etc", "passwd.json"]).is_err());
        assert!(resolver.contained_path(&["en-US", "../../x.json"]).is_err());
    }

    // ==================== get Tests ====================

    #[tokio::test]
    async fn test_get_returns_parsed_bundle() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "en-GB/global.json", r#"{"home": "Home"}"#);

        let data = resolver(&temp_dir).get("en-GB", "global").await.expect("Should load");
        assert_eq!(data, json!({"home": "Home"}));
    }

    #[tokio::test]
    async fn test_get_null_bundle_becomes_empty_object() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "en-GB/empty.json", "null");

        let data = resolver(&temp_dir).get("en-GB", "empty").await.expect("Should load");
        assert_eq!(data, json!({}));
    }

    #[tokio::test]
    async fn test_get_traversal_reads_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let resolver = resolver(&temp_dir);

        let err = resolver.get("../../etc", "passwd").await.unwrap_err();
        assert!(matches!(err, LocaleError::InvalidPath { .. }));
        assert_eq!(resolver.metrics().file_reads(), 0);
        assert_eq!(resolver.metrics().filter_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_file_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = resolver(&temp_dir).get("fr", "global").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "fr/global.json", "{not json");

        let err = resolver(&temp_dir).get("fr", "global").await.unwrap_err();
        assert!(matches!(err, LocaleError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_get_applies_filter_every_call() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "fr/global.json", r#"{"home": "Accueil"}"#);

        let resolver = resolver(&temp_dir).with_filter(
            |mut ctx: NamespaceContext| -> std::result::Result<NamespaceContext, BoxError> {
                ctx.data["origin"] = json!(format!("{}/{}", ctx.language, ctx.namespace));
                Ok(ctx)
            },
        );

        let first = resolver.get("fr", "global").await.expect("Should load");
        let second = resolver.get("fr", "global").await.expect("Should load");

        assert_eq!(first["origin"], "fr/global");
        assert_eq!(first, second);
        assert_eq!(resolver.metrics().file_reads(), 2);
        assert_eq!(resolver.metrics().filter_calls(), 2);
    }

    #[tokio::test]
    async fn test_get_filter_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "fr/global.json", "{}");

        let resolver = resolver(&temp_dir).with_filter(
            |_ctx: NamespaceContext| -> std::result::Result<NamespaceContext, BoxError> {
                Err("rejected".into())
            },
        );

        let err = resolver.get("fr", "global").await.unwrap_err();
        assert!(matches!(err, LocaleError::Filter { .. }));
        assert!(err.to_string().contains("fr/global"));
    }

    // ==================== list_codes Tests ====================

    #[tokio::test]
    async fn test_list_codes_missing_metadata_retries() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let resolver = resolver(&temp_dir);

        assert!(resolver.list_codes().await.expect("Should not fail").is_empty());

        write(temp_dir.path(), "metadata.json", r#"{"languages": ["en-US"]}"#);
        assert_eq!(resolver.list_codes().await.expect("Should load"), vec!["en-US"]);
        assert_eq!(resolver.metrics().file_reads(), 2);
    }

    #[tokio::test]
    async fn test_list_codes_empty_list_not_cached() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "metadata.json", r#"{"languages": []}"#);
        let resolver = resolver(&temp_dir);

        resolver.list_codes().await.expect("Should load");
        resolver.list_codes().await.expect("Should load");
        assert_eq!(resolver.metrics().code_cache_hits(), 0);
        assert_eq!(resolver.metrics().file_reads(), 2);
    }

    #[tokio::test]
    async fn test_list_codes_missing_field_is_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "metadata.json", r#"{"langs": ["en-US"]}"#);

        let err = resolver(&temp_dir).list_codes().await.unwrap_err();
        assert!(matches!(err, LocaleError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_list_codes_unreadable_metadata_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(temp_dir.path().join("metadata.json")).expect("mkdir");
        let resolver = resolver(&temp_dir);

        let err = resolver.list_codes().await.unwrap_err();
        assert!(matches!(err, LocaleError::Io { .. }));

        // Not cached: a repaired file is picked up on the next call
        std::fs::remove_dir(temp_dir.path().join("metadata.json")).expect("rmdir");
        write(temp_dir.path(), "metadata.json", r#"{"languages": ["fr"]}"#);
        assert_eq!(resolver.list_codes().await.expect("Should load"), vec!["fr"]);
    }

    // ==================== list Tests ====================

    #[tokio::test]
    async fn test_list_skips_null_records_and_null_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "metadata.json", r#"{"languages": ["en-US", "de", "nl"]}"#);
        write(
            temp_dir.path(),
            "en-US/language.json",
            r#"{"name": "English (US)", "code": "en-US", "dir": "en-US"}"#,
        );
        write(
            temp_dir.path(),
            "de/language.json",
            r#"{"name": null, "code": "de", "dir": "de"}"#,
        );
        write(temp_dir.path(), "nl/language.json", "null");

        let languages = resolver(&temp_dir).list().await.expect("Should not fail");
        assert_eq!(languages, vec![Language::new("English (US)", "en-US", "en-US")]);
    }

    #[tokio::test]
    async fn test_list_parse_error_aborts_and_skips_cache() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "metadata.json", r#"{"languages": ["en-US", "fr"]}"#);
        write(
            temp_dir.path(),
            "en-US/language.json",
            r#"{"name": "English (US)", "code": "en-US", "dir": "en-US"}"#,
        );
        write(temp_dir.path(), "fr/language.json", "{broken");
        let resolver = resolver(&temp_dir);

        let err = resolver.list().await.unwrap_err();
        assert!(matches!(err, LocaleError::Parse { .. }));

        write(
            temp_dir.path(),
            "fr/language.json",
            r#"{"name": "Français", "code": "fr", "dir": "fr"}"#,
        );
        let languages = resolver.list().await.expect("Should load after fix");
        assert_eq!(languages.len(), 2);
    }

    #[tokio::test]
    async fn test_list_skips_codes_escaping_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "metadata.json", r#"{"languages": ["../outside", "fr"]}"#);
        write(
            temp_dir.path(),
            "fr/language.json",
            r#"{"name": "Français", "code": "fr", "dir": "fr"}"#,
        );

        let languages = resolver(&temp_dir).list().await.expect("Should load");
        assert_eq!(languages, vec![Language::new("Français", "fr", "fr")]);
    }

    // ==================== user_timeago_code Tests ====================

    #[tokio::test]
    async fn test_user_timeago_code_requires_installed_code() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write(temp_dir.path(), "metadata.json", r#"{"languages": ["en-US", "de"]}"#);
        let resolver = resolver(&temp_dir);

        assert_eq!(resolver.user_timeago_code("en-US").await.unwrap(), "en");
        // installed, but no timeago file for "de"
        assert_eq!(resolver.user_timeago_code("de").await.unwrap(), "");
        // timeago file exists, but "fr" is not installed
        assert_eq!(resolver.user_timeago_code("fr").await.unwrap(), "");
        assert_eq!(resolver.user_timeago_code("xx-YY").await.unwrap(), "");
    }
}
