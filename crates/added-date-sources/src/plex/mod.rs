pub mod api;
pub mod auth;
pub mod client;

pub use api::PlexHttpClient;
pub use client::PlexClient;
