//! HTTP adapters for the core transport ports

pub mod client;
pub mod oauth2;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use oauth2::{AccessTokenProvider, OAuth2Transport, StaticTokenProvider};
pub use transport::ReqwestTransport;
