use crate::error::SourceError;
use crate::plex::api::PlexHttpClient;
use crate::traits::{LibrarySection, PlexLibrary, ServerIdentity};
use added_date_config::ConnectionSettings;
use added_date_models::{DateSpec, Item};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// `PlexLibrary` backed by a live Plex Media Server
pub struct PlexClient {
    api: PlexHttpClient,
    authenticated: bool,
    // Lowercased section title -> section, filled on first lookup
    sections_cache: RwLock<Option<HashMap<String, LibrarySection>>>,
}

impl PlexClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self, SourceError> {
        Ok(Self {
            api: PlexHttpClient::new(settings)?,
            authenticated: false,
            sections_cache: RwLock::new(None),
        })
    }

    fn ensure_authenticated(&self) -> Result<(), SourceError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(SourceError::NotAuthenticated)
        }
    }

    async fn sections(&self) -> Result<HashMap<String, LibrarySection>, SourceError> {
        {
            let cached = self.sections_cache.read().await;
            if let Some(ref sections) = *cached {
                return Ok(sections.clone());
            }
        }

        let sections: HashMap<String, LibrarySection> = self
            .api
            .get_libraries()
            .await?
            .into_iter()
            .map(|section| (section.title.to_lowercase(), section))
            .collect();
        debug!("Plex: Found {} library sections", sections.len());

        *self.sections_cache.write().await = Some(sections.clone());
        Ok(sections)
    }
}

#[async_trait]
impl PlexLibrary for PlexClient {
    async fn authenticate(&mut self) -> Result<ServerIdentity, SourceError> {
        let identity = self.api.server_identity().await?;
        self.authenticated = true;

        info!("Connected to Plex Server: {}", identity.friendly_name);
        debug!(
            machine_identifier = %identity.machine_identifier,
            version = %identity.version,
            url = %self.api.server_url(),
            "Plex handshake complete"
        );
        Ok(identity)
    }

    async fn library_section(&self, library: &str) -> Result<LibrarySection, SourceError> {
        self.ensure_authenticated()?;
        self.sections()
            .await?
            .remove(&library.trim().to_lowercase())
            .ok_or_else(|| SourceError::LibraryNotFound(library.to_string()))
    }

    async fn search(&self, library: &str, title: &str) -> Result<Vec<Item>, SourceError> {
        let section = self.library_section(library).await?;
        self.api.search_section(&section.key, title).await
    }

    async fn fetch_item(&self, id: &str) -> Result<Option<Item>, SourceError> {
        self.ensure_authenticated()?;
        self.api.get_metadata_item(id).await
    }

    async fn set_added_date(&self, item: &Item, date: DateSpec) -> Result<(), SourceError> {
        self.ensure_authenticated()?;
        self.api.set_added_at(item, date).await
    }
}
