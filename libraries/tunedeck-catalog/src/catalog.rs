//! Audio catalog client.

use crate::error::{CatalogError, Result};
use crate::http::{build_client, normalize_base_url, read_json};
use crate::types::{CatalogConfig, CatalogResponse, CatalogTrack};
use reqwest::Client;
use tracing::{debug, info, warn};
use tunedeck_core::Track;

/// Client for the audio catalog (Jamendo-compatible `/tracks/` endpoint).
///
/// Every result is a direct-audio [`Track`]; records that cannot be played
/// (no stream url, negative duration) are skipped.
///
/// # Example
///
/// ```ignore
/// use tunedeck_catalog::{CatalogClient, CatalogConfig};
///
/// let client = CatalogClient::new(CatalogConfig::new("client-id"))?;
/// let tracks = client.search("ambient piano").await?;
/// println!("Found {} tracks", tracks.len());
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        Ok(Self {
            http: build_client()?,
            config: CatalogConfig { base_url, ..config },
        })
    }

    /// The configuration in use (with a normalized base URL).
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Full-text search. An empty query returns no results without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<Track>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_tracks(self.config.page_size, &[("search", query)])
            .await
    }

    /// Featured tracks for the home page.
    pub async fn featured(&self) -> Result<Vec<Track>> {
        self.fetch_tracks(self.config.featured_size, &[("featured", "true")])
            .await
    }

    /// Popular tracks carrying a genre tag (see [`tunedeck_core::GENRES`]).
    pub async fn by_genre(&self, tag: &str) -> Result<Vec<Track>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_tracks(
            self.config.page_size,
            &[("tags", tag), ("boost", "popularity")],
        )
        .await
    }

    async fn fetch_tracks(&self, limit: u32, extra: &[(&str, &str)]) -> Result<Vec<Track>> {
        let url = format!("{}/tracks/", self.config.base_url);
        let limit = limit.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.config.client_id.as_str()),
            ("format", "json"),
            ("limit", limit.as_str()),
            ("include", "musicinfo"),
        ];
        params.extend_from_slice(extra);

        debug!(url = %url, params = ?extra, "Fetching catalog tracks");

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status().as_u16();
        let body: CatalogResponse = read_json(response).await?;

        if let Some(headers) = body.headers.as_ref() {
            if headers.status.eq_ignore_ascii_case("failed") {
                warn!(code = headers.code, message = %headers.error_message, "Catalog request failed");
                return Err(CatalogError::Api {
                    status,
                    message: headers.error_message.clone(),
                });
            }
        }

        let total = body.results.len();
        let tracks: Vec<Track> = body.results.into_iter().filter_map(to_track).collect();

        info!(
            received = total,
            playable = tracks.len(),
            "Catalog tracks fetched"
        );

        Ok(tracks)
    }
}

fn to_track(record: CatalogTrack) -> Option<Track> {
    let track = Track::direct_audio(record.id, record.name, record.artist_name, record.audio)
        .with_cover(record.image)
        .with_duration(record.duration);

    match track.validate() {
        Ok(()) => Some(track),
        Err(e) => {
            debug!(error = %e, "Skipping unplayable catalog record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, audio: &str, duration: f64) -> CatalogTrack {
        CatalogTrack {
            id: id.to_string(),
            name: "Nightfall".to_string(),
            artist_name: "Lumen".to_string(),
            image: "https://img.test/1.jpg".to_string(),
            audio: audio.to_string(),
            duration,
        }
    }

    #[test]
    fn record_maps_to_direct_audio_track() {
        let track = to_track(record("1204669", "https://cdn.test/1.mp3", 201.0)).unwrap();

        assert_eq!(track.id.as_str(), "1204669");
        assert_eq!(track.title, "Nightfall");
        assert_eq!(track.artist, "Lumen");
        assert_eq!(track.cover, "https://img.test/1.jpg");
        assert_eq!(track.audio_url(), Some("https://cdn.test/1.mp3"));
        assert!((track.duration - 201.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unplayable_records_are_skipped() {
        assert!(to_track(record("1", "", 10.0)).is_none());
        assert!(to_track(record("2", "https://cdn.test/2.mp3", -1.0)).is_none());
        assert!(to_track(record("", "https://cdn.test/3.mp3", 10.0)).is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = CatalogConfig::new("id").with_base_url("localhost:8080");
        assert!(matches!(
            CatalogClient::new(config),
            Err(CatalogError::InvalidUrl(_))
        ));
    }
}
