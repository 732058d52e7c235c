use crate::error::SourceError;
use added_date_models::{DateSpec, Item};
use async_trait::async_trait;

/// What the server reports about itself during the handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub friendly_name: String,
    pub machine_identifier: String,
    pub version: String,
}

/// A library section (`Movies`, `TV Shows`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    pub type_: String,
}

/// The capabilities this tool needs from a Plex server.
///
/// Calls are issued one at a time; implementations never retry on their own.
#[async_trait]
pub trait PlexLibrary: Send + Sync {
    /// Handshake; every other call fails with `NotAuthenticated` until it succeeds
    async fn authenticate(&mut self) -> Result<ServerIdentity, SourceError>;

    /// Look up a section by its display name (case-insensitive)
    async fn library_section(&self, library: &str) -> Result<LibrarySection, SourceError>;

    /// Items of `library` whose title contains `title`, case-insensitive
    async fn search(&self, library: &str, title: &str) -> Result<Vec<Item>, SourceError>;

    /// Fetch one item by rating key, `None` if the server does not know it
    async fn fetch_item(&self, id: &str) -> Result<Option<Item>, SourceError>;

    // Data modification
    async fn set_added_date(&self, item: &Item, date: DateSpec) -> Result<(), SourceError>;
}
