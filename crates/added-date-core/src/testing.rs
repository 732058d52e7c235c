//! In-memory `PlexLibrary` for exercising resolution and batch logic without a server.

use added_date_models::{DateSpec, Item, ItemKind};
use added_date_sources::{LibrarySection, PlexLibrary, ServerIdentity, SourceError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub(crate) const LIBRARY: &str = "Movies";

pub(crate) fn item(id: &str, title: &str, year: Option<u32>, added_at: &str) -> Item {
    Item {
        id: id.to_string(),
        title: title.to_string(),
        year,
        added_at: DateSpec::parse_canonical(added_at).unwrap(),
        section_key: "1".to_string(),
        kind: ItemKind::Movie,
    }
}

pub(crate) struct FakeLibrary {
    items: Vec<Item>,
    current: Mutex<HashMap<String, DateSpec>>,
    writes: Mutex<Vec<(String, DateSpec)>>,
    failing_ids: HashSet<String>,
}

impl FakeLibrary {
    pub(crate) fn new(items: Vec<Item>) -> Self {
        let current = items
            .iter()
            .map(|item| (item.id.clone(), item.added_at))
            .collect();
        Self {
            items,
            current: Mutex::new(current),
            writes: Mutex::new(Vec::new()),
            failing_ids: HashSet::new(),
        }
    }

    /// Writes to this item answer HTTP 500
    pub(crate) fn failing_writes_for(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub(crate) fn writes(&self) -> Vec<(String, DateSpec)> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn current_date(&self, id: &str) -> Option<DateSpec> {
        self.current.lock().unwrap().get(id).copied()
    }

    fn snapshot(&self, item: &Item) -> Item {
        let mut copy = item.clone();
        if let Some(date) = self.current_date(&item.id) {
            copy.added_at = date;
        }
        copy
    }
}

#[async_trait]
impl PlexLibrary for FakeLibrary {
    async fn authenticate(&mut self) -> Result<ServerIdentity, SourceError> {
        Ok(ServerIdentity {
            friendly_name: "fake".to_string(),
            machine_identifier: "fake-0".to_string(),
            version: "0".to_string(),
        })
    }

    async fn library_section(&self, library: &str) -> Result<LibrarySection, SourceError> {
        if library.eq_ignore_ascii_case(LIBRARY) {
            Ok(LibrarySection {
                key: "1".to_string(),
                title: LIBRARY.to_string(),
                type_: "movie".to_string(),
            })
        } else {
            Err(SourceError::LibraryNotFound(library.to_string()))
        }
    }

    async fn search(&self, library: &str, title: &str) -> Result<Vec<Item>, SourceError> {
        self.library_section(library).await?;
        let needle = title.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .map(|item| self.snapshot(item))
            .collect())
    }

    async fn fetch_item(&self, id: &str) -> Result<Option<Item>, SourceError> {
        Ok(self
            .items
            .iter()
            .find(|item| item.id == id)
            .map(|item| self.snapshot(item)))
    }

    async fn set_added_date(&self, item: &Item, date: DateSpec) -> Result<(), SourceError> {
        if self.failing_ids.contains(&item.id) {
            return Err(SourceError::Status {
                context: "Failed to update metadata".to_string(),
                status: 500,
            });
        }
        self.writes.lock().unwrap().push((item.id.clone(), date));
        self.current.lock().unwrap().insert(item.id.clone(), date);
        Ok(())
    }
}
