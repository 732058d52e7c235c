use crate::DateSpec;
use serde::{Deserialize, Serialize};

/// A library item as returned by the Plex server.
///
/// Read-only snapshot: the server owns the real item, this copy lives for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Plex rating key, stable across renames
    pub id: String,
    pub title: String,
    pub year: Option<u32>,
    pub added_at: DateSpec,
    /// Key of the library section the item lives in
    pub section_key: String,
    pub kind: ItemKind,
}

impl Item {
    /// `Title (Year)` for log and prompt lines
    pub fn display_name(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Movie,
    Show,
    Season,
    Episode,
    Artist,
    Album,
    Track,
}

impl ItemKind {
    /// Parse the `type` attribute of a Plex metadata element
    pub fn from_plex_type(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(ItemKind::Movie),
            "show" => Some(ItemKind::Show),
            "season" => Some(ItemKind::Season),
            "episode" => Some(ItemKind::Episode),
            "artist" => Some(ItemKind::Artist),
            "album" => Some(ItemKind::Album),
            "track" => Some(ItemKind::Track),
            _ => None,
        }
    }

    /// Numeric search type used by the section edit endpoint
    pub fn plex_type_number(&self) -> u8 {
        match self {
            ItemKind::Movie => 1,
            ItemKind::Show => 2,
            ItemKind::Season => 3,
            ItemKind::Episode => 4,
            ItemKind::Artist => 8,
            ItemKind::Album => 9,
            ItemKind::Track => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_plex_type() {
        assert_eq!(ItemKind::from_plex_type("movie"), Some(ItemKind::Movie));
        assert_eq!(ItemKind::from_plex_type("episode"), Some(ItemKind::Episode));
        assert_eq!(ItemKind::from_plex_type("clip"), None);
        assert_eq!(ItemKind::Movie.plex_type_number(), 1);
        assert_eq!(ItemKind::Track.plex_type_number(), 10);
    }

    #[test]
    fn test_display_name_without_year() {
        let item = Item {
            id: "1".to_string(),
            title: "Untitled".to_string(),
            year: None,
            added_at: DateSpec::parse_canonical("2020-01-01 00:00:00").unwrap(),
            section_key: "1".to_string(),
            kind: ItemKind::Movie,
        };
        assert_eq!(item.display_name(), "Untitled");
    }
}
