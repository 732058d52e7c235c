use crate::error::SourceError;
use crate::plex::auth::{check_status, classify_transport_error};
use crate::traits::{LibrarySection, ServerIdentity};
use added_date_config::ConnectionSettings;
use added_date_models::{DateSpec, Item, ItemKind};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const CLIENT_IDENTIFIER: &str = "plexdate-cli";

/// Thin HTTP layer over the Plex Media Server API
pub struct PlexHttpClient {
    client: Client,
    server_url: String,
}

impl PlexHttpClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-token"),
                    reqwest::header::HeaderValue::from_str(&settings.token)
                        .map_err(|_| SourceError::InvalidToken)?,
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-client-identifier"),
                    reqwest::header::HeaderValue::from_static(CLIENT_IDENTIFIER),
                );
                headers
            })
            .timeout(settings.timeout)
            .build()
            .map_err(|e| SourceError::Request {
                context: "Failed to create HTTP client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            server_url: settings.server_url.clone(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn get_json(&self, path: &str, context: &str) -> Result<Value, SourceError> {
        let url = format!("{}{}", self.server_url, path);
        debug!("Plex GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &self.server_url, context))?;
        let response = check_status(response, context)?;

        response.json().await.map_err(|e| SourceError::Request {
            context: context.to_string(),
            reason: format!("invalid JSON body: {}", e),
        })
    }

    /// Root endpoint; doubles as the token check
    pub async fn server_identity(&self) -> Result<ServerIdentity, SourceError> {
        let json = self.get_json("/", "Failed to connect to Plex server").await?;
        parse_server_identity(&json)
    }

    pub async fn get_libraries(&self) -> Result<Vec<LibrarySection>, SourceError> {
        let json = self
            .get_json("/library/sections", "Failed to get libraries")
            .await?;
        Ok(parse_libraries(&json))
    }

    /// Title filter on a section; the server matches substrings case-insensitively
    pub async fn search_section(&self, section_key: &str, title: &str) -> Result<Vec<Item>, SourceError> {
        let path = format!(
            "/library/sections/{}/all?title={}",
            section_key,
            urlencoding::encode(title)
        );
        debug!("Plex search: Searching section {} for '{}'", section_key, title);

        let json = self.get_json(&path, "Failed to search Plex library").await?;
        let items = parse_metadata_list(&json, section_key);
        debug!("Plex search: Found {} results for '{}'", items.len(), title);
        Ok(items)
    }

    pub async fn get_metadata_item(&self, rating_key: &str) -> Result<Option<Item>, SourceError> {
        // Accept both "123" and "/library/metadata/123"
        let id = rating_key.trim_start_matches("/library/metadata/").trim();
        let url = format!("{}/library/metadata/{}", self.server_url, urlencoding::encode(id));
        let context = "Failed to get metadata item";
        debug!("Plex GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &self.server_url, context))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response, context)?;
        let json: Value = response.json().await.map_err(|e| SourceError::Request {
            context: context.to_string(),
            reason: format!("invalid JSON body: {}", e),
        })?;

        Ok(parse_metadata_list(&json, "").into_iter().next())
    }

    /// Write `addedAt` and lock the field so a metadata refresh keeps it
    pub async fn set_added_at(&self, item: &Item, date: DateSpec) -> Result<(), SourceError> {
        let epoch = date
            .to_epoch()
            .ok_or_else(|| SourceError::InvalidTimestamp(date.to_string()))?;
        let url = format!(
            "{}/library/sections/{}/all?type={}&id={}&addedAt.value={}&addedAt.locked=1",
            self.server_url,
            item.section_key,
            item.kind.plex_type_number(),
            urlencoding::encode(&item.id),
            epoch
        );
        let context = "Failed to update metadata";
        debug!("Plex PUT {}", url);

        let response = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &self.server_url, context))?;
        check_status(response, context)?;
        Ok(())
    }
}

fn media_container(json: &Value) -> Result<&Value, SourceError> {
    json.get("MediaContainer")
        .ok_or_else(|| SourceError::UnexpectedResponse("no MediaContainer in response".to_string()))
}

pub(crate) fn parse_server_identity(json: &Value) -> Result<ServerIdentity, SourceError> {
    let container = media_container(json)?;
    let field = |name: &str| {
        container
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    Ok(ServerIdentity {
        friendly_name: field("friendlyName"),
        machine_identifier: field("machineIdentifier"),
        version: field("version"),
    })
}

pub(crate) fn parse_libraries(json: &Value) -> Vec<LibrarySection> {
    let mut libraries = Vec::new();
    if let Some(dir_array) = json
        .get("MediaContainer")
        .and_then(|mc| mc.get("Directory"))
        .and_then(|d| d.as_array())
    {
        for dir in dir_array {
            let key = value_as_string(dir.get("key")).unwrap_or_default();
            let type_ = dir
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("")
                .to_string();
            let title = dir
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or("")
                .to_string();

            if !key.is_empty() {
                libraries.push(LibrarySection { key, title, type_ });
            }
        }
    }
    libraries
}

/// Parse every item under `MediaContainer.Metadata` (or the older `Video`/`Directory` lists)
pub(crate) fn parse_metadata_list(json: &Value, section_key: &str) -> Vec<Item> {
    let container = match json.get("MediaContainer") {
        Some(container) => container,
        None => {
            debug!("Plex: No MediaContainer in response");
            return Vec::new();
        }
    };

    let items_array = container
        .get("Metadata")
        .or_else(|| container.get("Video"))
        .or_else(|| container.get("Directory"))
        .and_then(|v| v.as_array());

    let mut items = Vec::new();
    if let Some(items_array) = items_array {
        let mut skipped = 0;
        for (idx, value) in items_array.iter().enumerate() {
            match parse_metadata_item(value, section_key) {
                Some(item) => items.push(item),
                None => {
                    skipped += 1;
                    let title = value.get("title").and_then(|t| t.as_str()).unwrap_or("unknown");
                    debug!("Plex: Skipped item[{}] '{}' - missing key, title, type or addedAt", idx, title);
                }
            }
        }
        if skipped > 0 {
            debug!("Plex: Skipped {} items that couldn't be parsed", skipped);
        }
    }
    items
}

pub(crate) fn parse_metadata_item(item: &Value, section_key: &str) -> Option<Item> {
    let id = value_as_string(item.get("ratingKey"))?;
    let title = item.get("title")?.as_str()?.to_string();
    let year = item.get("year").and_then(|y| y.as_u64()).and_then(|y| u32::try_from(y).ok());
    let added_at = item
        .get("addedAt")
        .and_then(|t| t.as_i64())
        .and_then(DateSpec::from_epoch)?;
    let kind = item
        .get("type")
        .and_then(|t| t.as_str())
        .and_then(ItemKind::from_plex_type)?;
    let section_key = value_as_string(item.get("librarySectionID"))
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| section_key.to_string());

    Some(Item {
        id,
        title,
        year,
        added_at,
        section_key,
        kind,
    })
}

/// Plex sends some ids as strings and some as numbers depending on the endpoint
fn value_as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_metadata_item_reads_added_at() {
        let epoch = DateSpec::parse_canonical("2010-08-20 14:03:11")
            .unwrap()
            .to_epoch()
            .unwrap();
        let value = json!({
            "ratingKey": "4242",
            "title": "Piranha 3D",
            "year": 2010,
            "type": "movie",
            "addedAt": epoch,
            "librarySectionID": 1
        });

        let item = parse_metadata_item(&value, "9").unwrap();
        assert_eq!(item.id, "4242");
        assert_eq!(item.title, "Piranha 3D");
        assert_eq!(item.year, Some(2010));
        assert_eq!(item.kind, ItemKind::Movie);
        assert_eq!(item.section_key, "1");
        assert_eq!(item.added_at.to_string(), "2010-08-20 14:03:11");
    }

    #[test]
    fn test_parse_metadata_item_falls_back_to_queried_section() {
        let value = json!({
            "ratingKey": 7,
            "title": "Halloween",
            "type": "movie",
            "addedAt": 1_300_000_000
        });

        let item = parse_metadata_item(&value, "3").unwrap();
        assert_eq!(item.id, "7");
        assert_eq!(item.year, None);
        assert_eq!(item.section_key, "3");
    }

    #[test]
    fn test_out_of_range_year_is_dropped() {
        let value = json!({
            "ratingKey": "8",
            "title": "Far Future",
            "type": "movie",
            "year": 4_294_967_296_u64,
            "addedAt": 1_300_000_000
        });

        let item = parse_metadata_item(&value, "1").unwrap();
        assert_eq!(item.year, None);
    }

    #[test]
    fn test_items_without_added_at_are_skipped() {
        let value = json!({
            "MediaContainer": {
                "Metadata": [
                    { "ratingKey": "1", "title": "Kept", "type": "movie", "addedAt": 1_300_000_000 },
                    { "ratingKey": "2", "title": "Dropped", "type": "movie" },
                    { "ratingKey": "3", "title": "Unknown type", "type": "photo", "addedAt": 1_300_000_000 }
                ]
            }
        });

        let items = parse_metadata_list(&value, "1");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Kept");
    }

    #[test]
    fn test_parse_libraries() {
        let value = json!({
            "MediaContainer": {
                "Directory": [
                    { "key": "1", "type": "movie", "title": "Movies" },
                    { "key": "2", "type": "show", "title": "TV Shows" }
                ]
            }
        });

        let libraries = parse_libraries(&value);
        assert_eq!(libraries.len(), 2);
        assert_eq!(libraries[1].title, "TV Shows");
        assert_eq!(libraries[1].key, "2");
    }

    #[test]
    fn test_parse_server_identity() {
        let value = json!({
            "MediaContainer": {
                "friendlyName": "living-room",
                "machineIdentifier": "abc123",
                "version": "1.40.0"
            }
        });

        let identity = parse_server_identity(&value).unwrap();
        assert_eq!(identity.friendly_name, "living-room");
        assert_eq!(identity.machine_identifier, "abc123");
    }

    #[test]
    fn test_server_identity_requires_container() {
        assert!(matches!(
            parse_server_identity(&json!({})),
            Err(SourceError::UnexpectedResponse(_))
        ));
    }
}
