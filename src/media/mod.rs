mod downloader;
mod error;
mod formats;
mod orchestrator;
mod platform;
mod playlist;
mod profile;
mod template;
mod types;
mod ytdlp;

pub use orchestrator::{DownloadSettings, Orchestrator};
pub use platform::print_supported_platforms;
pub use playlist::PlaylistRange;
pub use profile::{FallbackMode, StrategyProfile};
pub use types::DownloadRequest;
pub use ytdlp::YtDlpExtractor;
