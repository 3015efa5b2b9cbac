//! Types for catalog and video API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tunedeck_core::Track;

/// Configuration for the audio catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the API (e.g., "https://api.jamendo.com/v3.0")
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Application client id
    #[serde(default)]
    pub client_id: String,
    /// Results per search or genre page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Results in the featured list
    #[serde(default = "default_featured_size")]
    pub featured_size: u32,
}

impl CatalogConfig {
    /// Create a config for the public API with the given client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Self::default()
        }
    }

    /// Point the client at a different base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            client_id: String::new(),
            page_size: default_page_size(),
            featured_size: default_featured_size(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://api.jamendo.com/v3.0".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_featured_size() -> u32 {
    10
}

/// Configuration for the video platform API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Base URL of the API (e.g., "https://www.googleapis.com/youtube/v3")
    #[serde(default = "default_video_url")]
    pub base_url: String,
    /// API key
    #[serde(default)]
    pub api_key: String,
    /// Results per search
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Category filter for searches ("10" is Music)
    #[serde(default = "default_category")]
    pub category_id: String,
}

impl VideoConfig {
    /// Create a config for the public API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Point the client at a different base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            base_url: default_video_url(),
            api_key: String::new(),
            max_results: default_max_results(),
            category_id: default_category(),
        }
    }
}

fn default_video_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_category() -> String {
    "10".to_string()
}

/// Full details of one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoDetails {
    /// Playable track with its duration filled in
    pub track: Track,
    /// View count, if public
    pub views: Option<u64>,
    /// Like count, if public
    pub likes: Option<u64>,
    /// Upload time
    pub published_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Catalog wire types
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    pub headers: Option<CatalogHeaders>,
    #[serde(default)]
    pub results: Vec<CatalogTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogHeaders {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error_message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogTrack {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub audio: String,
    #[serde(default)]
    pub duration: f64,
}

fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

// =============================================================================
// Video wire types
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideosResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoItem {
    pub id: String,
    pub snippet: Snippet,
    pub content_details: ContentDetails,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnails {
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Best available thumbnail URL, high first
    pub fn best(&self) -> String {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentDetails {
    pub duration: String,
}

/// Counts arrive as decimal strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Statistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs() {
        let catalog = CatalogConfig::new("abc123");
        assert_eq!(catalog.client_id, "abc123");
        assert_eq!(catalog.page_size, 20);
        assert_eq!(catalog.featured_size, 10);
        assert_eq!(catalog.base_url, "https://api.jamendo.com/v3.0");

        let video = VideoConfig::new("key");
        assert_eq!(video.max_results, 10);
        assert_eq!(video.category_id, "10");
    }

    #[test]
    fn catalog_track_accepts_numeric_id() {
        let track: CatalogTrack = serde_json::from_str(
            r#"{"id": 1204669, "name": "Nightfall", "artist_name": "Lumen", "audio": "x", "duration": 201}"#,
        )
        .unwrap();
        assert_eq!(track.id, "1204669");
        assert!(track.image.is_empty());
    }

    #[test]
    fn thumbnails_fall_back() {
        let thumbs: Thumbnails =
            serde_json::from_str(r#"{"default": {"url": "https://i.test/d.jpg"}}"#).unwrap();
        assert_eq!(thumbs.best(), "https://i.test/d.jpg");

        assert_eq!(Thumbnails::default().best(), "");
    }
}
