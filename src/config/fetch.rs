//! `[fetch]` section configuration.
//!
//! Where project READMEs come from. Each source is either a project
//! directory (its `README.md` is read) or a direct path to a readme file.

use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[fetch]` section in tansu.toml.
///
/// # Example
/// ```toml
/// [fetch]
/// sources = ["~/src/tansu", "~/src/notes/README.md"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Project directories or readme files to fetch.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
}
