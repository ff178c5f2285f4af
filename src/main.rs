use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod media;
mod prompt;
mod utils;

use config::{Config, Overrides};
use media::{
    print_supported_platforms, DownloadRequest, FallbackMode, Orchestrator, PlaylistRange,
    StrategyProfile, YtDlpExtractor,
};
use prompt::{AssumeYes, Confirm, StdinConfirm};

/// Download videos from YouTube and 1000+ other platforms in the best quality available.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video URLs to download
    urls: Vec<String>,

    /// List well-known supported platforms and exit
    #[arg(long)]
    platforms: bool,

    /// Download an entire playlist (asks before starting)
    #[arg(long, value_name = "URL", conflicts_with_all = ["urls", "range"])]
    playlist: Option<String>,

    /// Download playlist items START through END ("end" for the last item)
    #[arg(
        long,
        num_args = 3,
        value_names = ["URL", "START", "END"],
        conflicts_with = "urls"
    )]
    range: Option<Vec<String>>,

    /// Show available formats for a URL, then offer to download
    #[arg(long)]
    check_formats: bool,

    /// With --check-formats, only show formats
    #[arg(long, requires = "check_formats")]
    formats_only: bool,

    /// Output directory [default: ./downloads]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Format preference profile [default: max-quality]
    #[arg(short, long, value_enum)]
    profile: Option<StrategyProfile>,

    /// Walk every strategy of the profile, or only try the first
    #[arg(long, value_enum)]
    fallback: Option<FallbackMode>,

    /// Save a .info.json metadata sidecar next to each download
    #[arg(long)]
    write_info_json: bool,

    /// Answer yes to every prompt
    #[arg(short, long)]
    yes: bool,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output.clone(),
            profile: self.profile,
            fallback: self.fallback,
            write_info_json: self.write_info_json,
        }
    }
}

fn init_logging(verbose: u8, format: &str) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn usage_error(message: impl std::fmt::Display) -> ! {
    Args::command().error(ErrorKind::InvalidValue, message).exit()
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config_path = config::find_config_path(args.config.as_deref());
    let config = match &config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    init_logging(args.verbose, config.get_logging_format());
    match &config_path {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    if args.platforms {
        print_supported_platforms();
        return Ok(ExitCode::SUCCESS);
    }

    let range = match &args.range {
        Some(values) => match values.as_slice() {
            [url, start, end] => match PlaylistRange::parse(start, end) {
                Ok(range) => Some((url.clone(), range)),
                Err(e) => usage_error(e),
            },
            _ => usage_error("--range takes <URL> <START> <END>"),
        },
        None => None,
    };

    if args.urls.is_empty() && args.playlist.is_none() && range.is_none() {
        Args::command().print_help()?;
        return Ok(ExitCode::from(2));
    }

    if args.check_formats && args.urls.len() != 1 {
        usage_error("--check-formats works on exactly one URL");
    }

    let settings = config.download_settings(&args.overrides());
    let extractor = YtDlpExtractor::new(config.ytdlp_path(), config.describe_timeout());
    let confirm: Arc<dyn Confirm> = if args.yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinConfirm)
    };
    let output_dir = settings.output_dir.clone();
    let orchestrator = Orchestrator::new(Box::new(extractor), confirm, settings);

    if !orchestrator.test_setup().await {
        warn!("yt-dlp does not appear to be installed; downloads will fail");
    }

    if let Some((url, range)) = range {
        let request = DownloadRequest::new(&url, output_dir).with_range(range);
        let result = orchestrator.download_playlist(&request).await;
        return Ok(exit_code(result.is_some_and(|r| r.succeeded)));
    }

    if let Some(url) = &args.playlist {
        let request = DownloadRequest::new(url, output_dir);
        return Ok(match orchestrator.download_playlist(&request).await {
            Some(result) => exit_code(result.succeeded),
            None => ExitCode::SUCCESS,
        });
    }

    if args.check_formats {
        let url = &args.urls[0];
        if args.formats_only {
            return Ok(exit_code(orchestrator.check_formats(url).await.is_ok()));
        }
        return Ok(match orchestrator.check_then_download(url).await {
            Some(result) => exit_code(result.succeeded),
            None => ExitCode::SUCCESS,
        });
    }

    if let [url] = args.urls.as_slice() {
        let result = orchestrator.download_one(url).await;
        return Ok(exit_code(result.succeeded));
    }

    let summary = orchestrator.download_all(&args.urls).await;
    Ok(exit_code(summary.all_succeeded()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_range() {
        let args = Args::try_parse_from([
            "vidfetch",
            "--range",
            "https://www.youtube.com/playlist?list=PL1",
            "5",
            "end",
        ])
        .unwrap();
        assert_eq!(
            args.range.unwrap(),
            ["https://www.youtube.com/playlist?list=PL1", "5", "end"]
        );
        assert!(args.urls.is_empty());
    }

    #[test]
    fn test_parse_urls_and_profile() {
        let args = Args::try_parse_from([
            "vidfetch",
            "-p",
            "debug-probe",
            "--fallback",
            "first-only",
            "-o",
            "videos",
            "https://youtu.be/a",
            "https://vimeo.com/1",
        ])
        .unwrap();
        assert_eq!(args.urls.len(), 2);
        assert_eq!(args.profile, Some(StrategyProfile::DebugProbe));

        let overrides = args.overrides();
        assert_eq!(overrides.fallback, Some(FallbackMode::FirstOnly));
        assert_eq!(overrides.output_dir, Some(PathBuf::from("videos")));
    }

    #[test]
    fn test_rejects_conflicting_modes() {
        assert!(Args::try_parse_from([
            "vidfetch",
            "--playlist",
            "https://www.youtube.com/playlist?list=PL1",
            "https://youtu.be/a",
        ])
        .is_err());
        assert!(Args::try_parse_from(["vidfetch", "--formats-only", "https://youtu.be/a"]).is_err());
        assert!(Args::try_parse_from(["vidfetch", "--range", "https://x.com/p", "1"]).is_err());
    }
}
