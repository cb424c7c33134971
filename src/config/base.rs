//! `[base]` section configuration.
//!
//! Basic site metadata, injected into every page context as `site`.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in tansu.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "My Projects"
/// description = "Things I have built"
/// author = "Alice"
/// url = "https://alice.dev"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title displayed in browser tab and headers.
    pub title: String,

    /// Site description for SEO meta tags.
    #[serde(default)]
    pub description: String,

    /// Author name for meta tags and footers.
    #[serde(default)]
    pub author: String,

    /// Base URL for absolute links.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code (e.g., "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,
}
