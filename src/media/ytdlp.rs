use super::{
    downloader::{Extractor, FetchJob},
    error::DownloadError,
    types::{DownloadOutcome, MediaMetadata, PlaylistInfo, StreamDescriptor},
};
use async_trait::async_trait;
use serde_json::Value;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Prefix of the line yt-dlp prints once a file has reached its final path.
const OUTCOME_MARKER: &str = "vidfetch-done";

pub struct YtDlpExtractor {
    binary: String,
    describe_timeout: Duration,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<String>, describe_timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            describe_timeout,
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> DownloadError {
        if e.kind() == std::io::ErrorKind::NotFound {
            DownloadError::ToolNotFound {
                tool: self.binary.clone(),
                reason: e.to_string(),
            }
        } else {
            DownloadError::Io(e)
        }
    }

    /// Runs yt-dlp with the given arguments and parses stdout as one JSON
    /// document.
    async fn dump_json(&self, args: &[&str], url: &str) -> Result<Value, DownloadError> {
        debug!("Describing with {}: {} {:?}", self.binary, url, args);

        let output = tokio::time::timeout(
            self.describe_timeout,
            Command::new(&self.binary)
                .args(args)
                .arg("--no-warnings")
                .arg("--")
                .arg(url)
                .output(),
        )
        .await
        .map_err(|_| {
            DownloadError::Network(format!(
                "metadata extraction timed out after {}s",
                self.describe_timeout.as_secs()
            ))
        })?
        .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(DownloadError::from_stderr(&String::from_utf8_lossy(
                &output.stderr,
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&json_str).map_err(|e| DownloadError::Parse(e.to_string()))
    }
}

pub fn parse_metadata(json: &Value) -> MediaMetadata {
    let formats = json["formats"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|f| match serde_json::from_value::<StreamDescriptor>(f.clone()) {
                    Ok(d) => Some(d),
                    Err(e) => {
                        debug!("Skipping unreadable format entry: {}", e);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    MediaMetadata {
        title: json["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string(),
        id: json["id"].as_str().unwrap_or("video").to_string(),
        platform: json["extractor_key"]
            .as_str()
            .or(json["extractor"].as_str())
            .map(|s| s.to_string()),
        extractor: json["extractor"].as_str().map(|s| s.to_string()),
        duration: json["duration"].as_f64().map(|d| d as u64),
        uploader: json["uploader"].as_str().map(|s| s.to_string()),
        upload_date: json["upload_date"].as_str().map(|s| s.to_string()),
        formats,
    }
}

pub fn parse_playlist(json: &Value) -> PlaylistInfo {
    let item_count = json["playlist_count"]
        .as_u64()
        .map(|n| n as usize)
        .or_else(|| json["entries"].as_array().map(Vec::len));

    PlaylistInfo {
        id: json["id"].as_str().unwrap_or("playlist").to_string(),
        title: json["title"]
            .as_str()
            .unwrap_or("Unknown Playlist")
            .to_string(),
        item_count,
    }
}

pub fn fetch_args(job: &FetchJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--format".into(),
        job.format.clone().into(),
        "--output".into(),
        job.output_template.clone().into(),
        "--merge-output-format".into(),
        job.merge_output_format.clone().into(),
    ];

    if job.playlist {
        args.push("--yes-playlist".into());
        if let Some(items) = &job.playlist_items {
            args.push("--playlist-items".into());
            args.push(items.into());
        }
    } else {
        args.push("--no-playlist".into());
    }

    if job.write_info_json {
        args.push("--write-info-json".into());
    }

    if let Some(pp) = &job.postprocessor_args {
        args.push("--postprocessor-args".into());
        args.push(pp.into());
    }

    // --print implies --quiet; keep progress on and the download real
    args.extend(["--newline", "--progress", "--no-simulate", "--print"].map(OsString::from));
    args.push(format!("after_move:{OUTCOME_MARKER}\t%(title)s\t%(filepath)s").into());
    args.push("--".into());
    args.push(job.url.clone().into());
    args
}

/// Picks the last outcome line; playlists print one per item.
pub fn parse_outcome<'a>(lines: impl IntoIterator<Item = &'a str>) -> DownloadOutcome {
    lines
        .into_iter()
        .filter_map(|line| line.strip_prefix(OUTCOME_MARKER)?.strip_prefix('\t'))
        .last()
        .map(|rest| {
            let mut parts = rest.splitn(2, '\t');
            let title = parts.next().filter(|t| !t.is_empty() && *t != "NA");
            let path = parts.next().filter(|p| !p.is_empty() && *p != "NA");
            DownloadOutcome {
                title: title.map(|t| t.to_string()),
                path: path.map(PathBuf::from),
            }
        })
        .unwrap_or_default()
}

async fn probe_version(binary: &str, flag: &str) -> Option<String> {
    match Command::new(binary).arg(flag).output().await {
        Ok(output) if output.status.success() => Some(
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string(),
        ),
        Ok(_) => {
            warn!("❌ {} command failed", binary);
            None
        }
        Err(e) => {
            warn!("❌ {} not found: {}", binary, e);
            None
        }
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn describe(&self, url: &str) -> Result<MediaMetadata, DownloadError> {
        let json = self
            .dump_json(&["--dump-json", "--no-download", "--no-playlist"], url)
            .await?;
        Ok(parse_metadata(&json))
    }

    async fn describe_playlist(&self, url: &str) -> Result<PlaylistInfo, DownloadError> {
        let json = self
            .dump_json(&["--flat-playlist", "--dump-single-json"], url)
            .await?;
        Ok(parse_playlist(&json))
    }

    async fn fetch(&self, job: &FetchJob) -> Result<DownloadOutcome, DownloadError> {
        info!("Fetching {} with format {}", job.url, job.format);

        let mut child = Command::new(&self.binary)
            .args(fetch_args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            DownloadError::Io(std::io::Error::other("failed to capture yt-dlp stdout"))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            DownloadError::Io(std::io::Error::other("failed to capture yt-dlp stderr"))
        })?;

        // Titles and locales can produce non-UTF-8 bytes; decode lossily
        let read_stdout = async {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            let mut kept = Vec::new();
            let mut showed_progress = false;
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf).await? == 0 {
                    break;
                }
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end();
                if line.starts_with("[download]") {
                    print!("\r{line}");
                    let _ = std::io::stdout().flush();
                    showed_progress = true;
                } else if line.starts_with(OUTCOME_MARKER) {
                    kept.push(line.to_string());
                } else {
                    debug!("yt-dlp: {}", line);
                }
            }
            if showed_progress {
                println!();
            }
            Ok::<_, std::io::Error>(kept)
        };

        let read_stderr = async {
            let mut buffer = Vec::new();
            BufReader::new(stderr).read_to_end(&mut buffer).await?;
            Ok::<_, std::io::Error>(String::from_utf8_lossy(&buffer).into_owned())
        };

        let (kept, error_text) = tokio::join!(read_stdout, read_stderr);
        let status = child.wait().await?;
        let kept = kept?;
        let error_text = error_text?;

        if !status.success() {
            debug!("yt-dlp exited with {}: {}", status, error_text);
            return Err(DownloadError::from_stderr(&error_text));
        }

        Ok(parse_outcome(kept.iter().map(String::as_str)))
    }

    async fn test_availability(&self) -> bool {
        let ytdlp = probe_version(&self.binary, "--version").await;
        if let Some(version) = &ytdlp {
            info!("✅ {} is available, version: {}", self.binary, version);
        }

        // ffmpeg is required for merging separate video/audio streams
        match probe_version("ffmpeg", "-version").await {
            Some(version_line) => info!("✅ ffmpeg is available: {}", version_line),
            None if ytdlp.is_some() => {
                warn!("⚠️  yt-dlp will work but merging video and audio streams will fail")
            }
            None => {}
        }

        ytdlp.is_some()
    }
}
