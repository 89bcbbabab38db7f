//! Platform Crate - Technical Infrastructure
//!
//! Technical helpers shared by the bounded contexts, free of domain rules:
//! - credential extraction from requests (bearer header, cookie fallback)
//! - client address resolution behind reverse proxies
//! - JWKS retrieval and caching for identity-provider tokens

pub mod client;
pub mod cookie;
pub mod jwks;
pub mod token;
