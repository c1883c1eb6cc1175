//! Locale asset resolution over a built language tree.

pub mod config;
pub mod i18n;
