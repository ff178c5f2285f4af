use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use super::playlist::PlaylistRange;

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output_directory: PathBuf,
    pub playlist_range: Option<PlaylistRange>,
}

impl DownloadRequest {
    pub fn new(url: &str, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            url: url.to_string(),
            output_directory: output_directory.into(),
            playlist_range: None,
        }
    }

    pub fn with_range(mut self, range: PlaylistRange) -> Self {
        self.playlist_range = Some(range);
        self
    }
}

/// One format as reported by `yt-dlp --dump-json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
pub struct StreamDescriptor {
    pub format_id: String,
    pub ext: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    /// Audio bitrate in kbps
    pub abr: Option<f64>,
    /// Total bitrate in kbps
    pub tbr: Option<f64>,
    pub filesize: Option<u64>,
    pub filesize_approx: Option<u64>,
}

impl StreamDescriptor {
    /// Video-capable: a video codec other than `none` and a known height.
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none") && self.height.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some("none")
    }

    pub fn effective_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    pub fn resolution(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            (None, Some(h)) => h.to_string(),
            _ => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct MediaMetadata {
    pub title: String,
    pub id: String,
    /// Extractor key, e.g. `Youtube` or `Vimeo`
    pub platform: Option<String>,
    /// Extractor name as used in output templates, e.g. `youtube`
    pub extractor: Option<String>,
    pub duration: Option<u64>,
    pub uploader: Option<String>,
    pub upload_date: Option<String>,
    pub formats: Vec<StreamDescriptor>,
}

impl fmt::Display for MediaMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unknown = "Unknown".to_string();
        writeln!(f, "📹 Title: {}", self.title)?;
        if let Some(platform) = &self.platform {
            writeln!(f, "🌐 Platform: {platform}")?;
        }
        match self.duration {
            Some(secs) => writeln!(f, "⏱️  Duration: {secs} seconds")?,
            None => writeln!(f, "⏱️  Duration: Unknown")?,
        }
        writeln!(
            f,
            "👤 Uploader: {}",
            self.uploader.as_ref().unwrap_or(&unknown)
        )?;
        write!(
            f,
            "📅 Upload Date: {}",
            self.upload_date.as_ref().unwrap_or(&unknown)
        )
    }
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct PlaylistInfo {
    pub id: String,
    pub title: String,
    /// `None` when the extractor reports neither a count nor entries
    pub item_count: Option<usize>,
}

/// What a successful fetch reports back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadOutcome {
    pub title: Option<String>,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub url: String,
    pub succeeded: bool,
    pub title: Option<String>,
    pub error_message: Option<String>,
    /// Number of format strategies tried, including the successful one
    pub attempts: usize,
    pub path: Option<PathBuf>,
}

impl DownloadResult {
    pub fn success(url: &str, attempts: usize, outcome: DownloadOutcome) -> Self {
        Self {
            url: url.to_string(),
            succeeded: true,
            title: outcome.title,
            error_message: None,
            attempts,
            path: outcome.path,
        }
    }

    pub fn failure(url: &str, attempts: usize, error: impl fmt::Display) -> Self {
        Self {
            url: url.to_string(),
            succeeded: false,
            title: None,
            error_message: Some(error.to_string()),
            attempts,
            path: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<DownloadResult>,
}

impl RunSummary {
    pub fn push(&mut self, result: DownloadResult) {
        self.results.push(result);
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.total()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Downloaded {}/{} videos successfully",
            self.succeeded(),
            self.total()
        )
    }
}
