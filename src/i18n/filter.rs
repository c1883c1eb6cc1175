//! Filter hook applied to namespace bundles after they are loaded.
//!
//! Host applications inject a [`NamespaceFilter`] to observe or rewrite
//! translation data before it reaches the caller. Whatever the filter
//! returns is forwarded unchanged.

use crate::i18n::error::BoxError;
use serde_json::Value;

/// Data passed through the filter hook.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceContext {
    /// Language folder that was read
    pub language: String,

    /// Namespace file base name
    pub namespace: String,

    /// Parsed bundle; the filter may replace it
    pub data: Value,
}

/// Capability that transforms a loaded namespace bundle.
pub trait NamespaceFilter: Send + Sync {
    fn filter(&self, ctx: NamespaceContext) -> Result<NamespaceContext, BoxError>;
}

impl<F> NamespaceFilter for F
where
    F: Fn(NamespaceContext) -> Result<NamespaceContext, BoxError> + Send + Sync,
{
    fn filter(&self, ctx: NamespaceContext) -> Result<NamespaceContext, BoxError> {
        self(ctx)
    }
}

/// Filter that returns its input untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFilter;

impl NamespaceFilter for IdentityFilter {
    fn filter(&self, ctx: NamespaceContext) -> Result<NamespaceContext, BoxError> {
        Ok(ctx)
    }
}
