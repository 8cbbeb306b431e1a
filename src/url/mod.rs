//! URL handling module for Sitegrep
//!
//! This module provides URL normalization, link resolution and the
//! same-host check used to keep a crawl on its originating site.

mod domain;
mod normalize;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use normalize::normalize_url;
pub use resolve::resolve_link;
