use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::downloader::{Extractor, FetchJob};
use super::error::DownloadError;
use super::formats::FormatReport;
use super::platform::detect_platform;
use super::profile::{FallbackMode, StrategyProfile, MERGE_FORMAT};
use super::template::{NameFields, OutputLayout};
use super::types::{DownloadRequest, DownloadResult, RunSummary};
use crate::prompt::{ask, Confirm};

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub output_dir: PathBuf,
    pub profile: StrategyProfile,
    pub fallback: FallbackMode,
    pub write_info_json: bool,
}

impl DownloadSettings {
    /// Profile defaults for everything but the output directory.
    pub fn for_profile(output_dir: impl Into<PathBuf>, profile: StrategyProfile) -> Self {
        Self {
            output_dir: output_dir.into(),
            profile,
            fallback: profile.default_fallback(),
            write_info_json: profile.writes_info_json(),
        }
    }
}

pub struct Orchestrator {
    extractor: Box<dyn Extractor>,
    confirm: Arc<dyn Confirm>,
    settings: DownloadSettings,
}

impl Orchestrator {
    pub fn new(
        extractor: Box<dyn Extractor>,
        confirm: Arc<dyn Confirm>,
        settings: DownloadSettings,
    ) -> Self {
        info!(
            "Orchestrator initialized with {} ({:?}, {:?})",
            extractor.name(),
            settings.profile,
            settings.fallback
        );
        Self {
            extractor,
            confirm,
            settings,
        }
    }

    pub async fn test_setup(&self) -> bool {
        self.extractor.test_availability().await
    }

    fn base_job(&self, url: &str, output_template: PathBuf) -> FetchJob {
        FetchJob {
            url: url.to_string(),
            format: String::new(),
            output_template,
            playlist: false,
            playlist_items: None,
            write_info_json: self.settings.write_info_json,
            merge_output_format: MERGE_FORMAT.to_string(),
            postprocessor_args: self
                .settings
                .profile
                .postprocessor_args()
                .map(str::to_string),
        }
    }

    /// Tries each format strategy in order and stops at the first success.
    async fn run_strategies(&self, base: &FetchJob) -> DownloadResult {
        let strategies = self
            .settings
            .profile
            .preferences()
            .strategies(self.settings.fallback);
        let mut last_error: Option<DownloadError> = None;

        for (i, format) in strategies.iter().enumerate() {
            let attempt = i + 1;
            println!("\n🎯 Trying format strategy {attempt}: {format}");
            println!("⬇️  Downloading...");

            let job = FetchJob {
                format: format.to_string(),
                ..base.clone()
            };

            match self.extractor.fetch(&job).await {
                Ok(outcome) => {
                    info!("Downloaded {} with strategy {}", base.url, attempt);
                    println!("✅ Download completed successfully!");
                    if let Some(path) = &outcome.path {
                        println!("📁 Saved to: {}", path.display());
                    }
                    return DownloadResult::success(&base.url, attempt, outcome);
                }
                Err(e) => {
                    warn!("Strategy {} failed for {}: {}", attempt, base.url, e);
                    println!("❌ Strategy {attempt} failed: {e}");
                    if attempt < strategies.len() {
                        println!("🔄 Trying next strategy...");
                    }
                    last_error = Some(e);
                }
            }
        }

        if strategies.len() > 1 {
            println!("❌ All download strategies failed!");
        }

        match last_error {
            Some(e) => DownloadResult::failure(&base.url, strategies.len(), e),
            None => DownloadResult::failure(&base.url, 0, "no format strategies configured"),
        }
    }

    /// Downloads a single video into the request's output directory.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadResult {
        let url = &request.url;

        if let Err(e) = tokio::fs::create_dir_all(&request.output_directory).await {
            println!("❌ Could not create {}: {e}", request.output_directory.display());
            return DownloadResult::failure(url, 0, DownloadError::Io(e));
        }

        let layout = OutputLayout::new(
            &request.output_directory,
            self.settings.profile.name_scheme(),
        );

        if self.settings.profile.previews_metadata() {
            match self.extractor.describe(url).await {
                Ok(metadata) => {
                    println!("{metadata}");
                    let fields = NameFields {
                        title: metadata.title.clone(),
                        platform: metadata.extractor.clone().unwrap_or_default(),
                        format_id: String::new(),
                        ext: MERGE_FORMAT.to_string(),
                    };
                    println!("📁 Saving as: {}", layout.single_path(&fields).display());
                }
                Err(e) => warn!("Could not preview metadata for {}: {}", url, e),
            }
        }

        let base = self.base_job(url, layout.single_template());

        println!("Downloading in best quality available...");
        self.run_strategies(&base).await
    }

    pub async fn download_one(&self, url: &str) -> DownloadResult {
        println!("🎯 Detected platform: {}", detect_platform(url));
        self.download(&DownloadRequest::new(url, &self.settings.output_dir))
            .await
    }

    /// Downloads each URL in turn and prints the succeeded/total summary.
    pub async fn download_all(&self, urls: &[String]) -> RunSummary {
        let total = urls.len();
        let mut summary = RunSummary::default();

        println!("📦 Downloading {total} videos...");
        for (i, url) in urls.iter().enumerate() {
            println!("\n📹 Downloading video {}/{}", i + 1, total);
            println!("URL: {url}");
            summary.push(self.download_one(url).await);
        }

        for result in &summary.results {
            if result.succeeded {
                let name = result.title.as_deref().unwrap_or(&result.url);
                match &result.path {
                    Some(path) => println!("  ✅ {name} -> {}", path.display()),
                    None => println!("  ✅ {name}"),
                }
            } else {
                let reason = result.error_message.as_deref().unwrap_or("unknown error");
                println!("  ❌ {}: {reason}", result.url);
            }
        }
        println!("\n🎉 {summary}!");
        summary
    }

    /// Downloads a playlist, or the window of it named by the request's
    /// range. Returns `None` when the user declines the whole-playlist prompt.
    pub async fn download_playlist(&self, request: &DownloadRequest) -> Option<DownloadResult> {
        let url = &request.url;

        let playlist = match self.extractor.describe_playlist(url).await {
            Ok(playlist) => playlist,
            Err(e) => {
                println!("❌ Could not read playlist: {e}");
                return Some(DownloadResult::failure(url, 0, e));
            }
        };
        match playlist.item_count {
            Some(count) => println!("📃 Playlist: {} ({count} videos)", playlist.title),
            None => println!("📃 Playlist: {}", playlist.title),
        }

        let items = match request.playlist_range {
            Some(range) => {
                if let Some(count) = playlist.item_count.filter(|&n| range.start() > n) {
                    let message =
                        format!("playlist has {count} videos, range starts at {}", range.start());
                    println!("❌ {message}");
                    return Some(DownloadResult::failure(url, 0, message));
                }
                match range.item_count() {
                    Some(n) => println!("🎯 Downloading {range} ({n} videos)"),
                    None => println!("🎯 Downloading {range}"),
                }
                Some(range.item_selector())
            }
            None => {
                let question = match playlist.item_count {
                    Some(count) => format!(
                        "Download all {count} videos from playlist \"{}\"?",
                        playlist.title
                    ),
                    None => format!("Download every video from playlist \"{}\"?", playlist.title),
                };
                if !ask(&self.confirm, question).await {
                    println!("Cancelled.");
                    return None;
                }
                None
            }
        };

        let layout = OutputLayout::new(
            &request.output_directory,
            self.settings.profile.name_scheme(),
        );
        let dir = layout.playlist_dir(&playlist.title);
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            println!("❌ Could not create {}: {e}", dir.display());
            return Some(DownloadResult::failure(url, 0, DownloadError::Io(e)));
        }

        let base = FetchJob {
            playlist: true,
            playlist_items: items,
            ..self.base_job(url, layout.playlist_template(&playlist.title))
        };

        let mut result = self.run_strategies(&base).await;
        result.title = Some(playlist.title);
        Some(result)
    }

    /// Prints metadata and the sorted format table without downloading.
    pub async fn check_formats(&self, url: &str) -> Result<FormatReport, DownloadError> {
        println!("🔍 Checking available formats...\n");

        let metadata = match self.extractor.describe(url).await {
            Ok(metadata) => metadata,
            Err(e) => {
                println!("❌ Error checking formats: {e}");
                return Err(e);
            }
        };
        println!("{metadata}\n");

        let report = FormatReport::build(metadata.formats);
        println!("{report}");
        Ok(report)
    }

    /// Shows formats, then downloads only if the user agrees.
    pub async fn check_then_download(&self, url: &str) -> Option<DownloadResult> {
        if let Err(e) = self.check_formats(url).await {
            warn!("Format check failed for {}: {}", url, e);
        }

        if !ask(&self.confirm, "\nDo you want to continue with download?").await {
            return None;
        }

        Some(self.download_one(url).await)
    }
}
