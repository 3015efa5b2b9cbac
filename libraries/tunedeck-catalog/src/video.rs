//! Video platform client.

use crate::error::Result;
use crate::http::{build_client, normalize_base_url, read_json};
use crate::types::{SearchItem, SearchResponse, VideoConfig, VideoDetails, VideoItem, VideosResponse};
use reqwest::Client;
use tracing::{debug, info, warn};
use tunedeck_core::{parse_iso8601_duration, Track, VideoId};

/// Client for the video platform Data API (`/search` and `/videos`).
///
/// Search results are embedded-video [`Track`]s with an unknown (zero)
/// duration; [`VideoClient::details`] fills in the length and statistics.
#[derive(Debug, Clone)]
pub struct VideoClient {
    http: Client,
    config: VideoConfig,
}

impl VideoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: VideoConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        Ok(Self {
            http: build_client()?,
            config: VideoConfig { base_url, ..config },
        })
    }

    /// The configuration in use (with a normalized base URL).
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Search embeddable music videos.
    pub async fn search(&self, query: &str) -> Result<Vec<Track>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.config.base_url);
        let max_results = self.config.max_results.to_string();

        debug!(url = %url, query = %query, "Searching videos");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("type", "video"),
                ("key", self.config.api_key.as_str()),
                ("videoEmbeddable", "true"),
                ("videoCategoryId", self.config.category_id.as_str()),
            ])
            .send()
            .await?;

        let body: SearchResponse = read_json(response).await?;
        let total = body.items.len();
        let tracks: Vec<Track> = body.items.into_iter().filter_map(search_track).collect();

        info!(received = total, playable = tracks.len(), "Video search finished");

        Ok(tracks)
    }

    /// Fetch length, statistics and publish time for one video.
    ///
    /// Returns `Ok(None)` when the platform does not know the id.
    pub async fn details(&self, video_id: &VideoId) -> Result<Option<VideoDetails>> {
        let url = format!("{}/videos", self.config.base_url);

        debug!(url = %url, video_id = %video_id, "Fetching video details");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "contentDetails,snippet,statistics"),
                ("id", video_id.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: VideosResponse = read_json(response).await?;

        match body.items.into_iter().next() {
            Some(item) => Ok(Some(into_details(item)?)),
            None => {
                debug!(video_id = %video_id, "Video not found");
                Ok(None)
            }
        }
    }
}

fn search_track(item: SearchItem) -> Option<Track> {
    let raw_id = item.id.video_id?;
    let video_id = match VideoId::parse(raw_id) {
        Ok(id) => id,
        Err(e) => {
            debug!(error = %e, "Skipping search result");
            return None;
        }
    };

    Some(
        Track::embedded_video(video_id, item.snippet.title, item.snippet.channel_title)
            .with_cover(item.snippet.thumbnails.best()),
    )
}

fn into_details(item: VideoItem) -> Result<VideoDetails> {
    let video_id = VideoId::parse(item.id)?;

    let seconds = parse_iso8601_duration(&item.content_details.duration).unwrap_or_else(|| {
        warn!(
            video_id = %video_id,
            duration = %item.content_details.duration,
            "Unparseable video duration"
        );
        0
    });

    let cover = item.snippet.thumbnails.best();
    let published_at = item.snippet.published_at;
    let (views, likes) = item.statistics.map_or((None, None), |stats| {
        (
            stats.view_count.and_then(|v| v.parse().ok()),
            stats.like_count.and_then(|v| v.parse().ok()),
        )
    });

    let track = Track::embedded_video(video_id, item.snippet.title, item.snippet.channel_title)
        .with_cover(cover)
        .with_duration(seconds as f64);

    Ok(VideoDetails {
        track,
        views,
        likes,
        published_at,
    })
}
