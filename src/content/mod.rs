//! Content collection steps feeding the build pipelines.
//!
//! - **frontmatter**: split a raw page into metadata and body
//! - **readmes**: fetch, parse, filter and serialize project READMEs
//! - **data**: load partials, global data files and cross-page front matter
//! - **nav**: page URLs, current-page marking and navigation construction

pub mod data;
pub mod frontmatter;
pub mod nav;
pub mod readmes;
