//! Vigil Scanner
//!
//! Layered vulnerability analysis of one web or hidden-service target:
//! - Mandatory passes over a single fetched page (headers, TLS certificate,
//!   cookies, meta tags, forms, inline scripts)
//! - Optional deep probes (redirect behavior, hidden paths, honeypot
//!   heuristics)
//! - Risk aggregation into a bounded score and threat tier

pub mod content;
pub mod cookies;
pub mod deep;
pub mod headers;
pub mod scan;
pub mod tls;

pub use scan::*;
