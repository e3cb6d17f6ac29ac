//! Vigil Tor Layer
//!
//! Tor-based networking for hidden-service reconnaissance:
//! - SOCKS5h proxy client construction (DNS resolution via Tor)
//! - The HTTP client port shared by crawler and scanner
//! - Per-engine search result extraction
//! - The multi-engine crawl orchestrator
//! - Bounded-concurrency liveness probing

pub mod client;
pub mod crawler;
pub mod extract;
pub mod liveness;
pub mod proxy;

pub use client::*;
pub use crawler::*;
pub use extract::*;
pub use liveness::*;
pub use proxy::*;
