use super::error::DownloadError;
use super::types::{DownloadOutcome, MediaMetadata, PlaylistInfo};
use async_trait::async_trait;
use std::path::PathBuf;

/// Everything the extractor needs for one fetch attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchJob {
    pub url: String,
    pub format: String,
    pub output_template: PathBuf,
    /// Treat the URL as a playlist instead of a single video
    pub playlist: bool,
    /// `--playlist-items` expression, e.g. `5:10`
    pub playlist_items: Option<String>,
    pub write_info_json: bool,
    pub merge_output_format: String,
    pub postprocessor_args: Option<String>,
}

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable name of the extractor
    fn name(&self) -> &'static str;

    /// Metadata and available formats for a single video, without downloading
    async fn describe(&self, url: &str) -> Result<MediaMetadata, DownloadError>;

    /// Title and item count of a playlist, without downloading
    async fn describe_playlist(&self, url: &str) -> Result<PlaylistInfo, DownloadError>;

    /// Download (and merge, if needed) according to the job
    async fn fetch(&self, job: &FetchJob) -> Result<DownloadOutcome, DownloadError>;

    /// Test if this extractor (and its merge tooling) is available
    async fn test_availability(&self) -> bool;
}
