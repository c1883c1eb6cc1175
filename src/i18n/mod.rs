//! Internationalization (i18n) asset resolution.
//!
//! This module reads the language tree produced by the asset build: the list
//! of installed locale codes, per-language metadata, and namespaced
//! translation bundles.
//!
//! # Architecture
//!
//! - `resolver`: `LocaleResolver`, the read-through cache over the asset tree
//! - `language`: `Language` record loaded from `language.json`
//! - `filter`: hook capability applied to namespace bundles
//! - `timeago`: timeago locale set and user-language mapping
//! - `cache`: memoize-forever slot backing the cached lists
//! - `metrics`: per-resolver read and cache counters
//! - `error`: `LocaleError` taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_assets::i18n::{LocaleResolver, TimeagoCodes};
//!
//! let resolver = LocaleResolver::new("build/public/language", TimeagoCodes::default());
//! let languages = resolver.list().await?;
//! let global = resolver.get("en-GB", "global").await?;
//! ```

mod cache;
mod error;
mod filter;
mod language;
mod metrics;
mod resolver;
mod timeago;

pub use cache::{CacheSlot, CacheValue};
pub use error::{BoxError, LocaleError, Result};
pub use filter::{IdentityFilter, NamespaceContext, NamespaceFilter};
pub use language::Language;
pub use metrics::{MetricsReport, ResolverMetrics};
pub use resolver::LocaleResolver;
pub use timeago::{user_lang_to_timeago_code, TimeagoCodes};
