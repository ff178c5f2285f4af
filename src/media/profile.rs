use clap::ValueEnum;
use serde::Deserialize;

use super::template::NameScheme;

/// Container every profile merges separate video/audio streams into.
pub const MERGE_FORMAT: &str = "mp4";

/// Ordered format selectors, most preferred first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPreferenceList(&'static [&'static str]);

impl FormatPreferenceList {
    pub const fn new(selectors: &'static [&'static str]) -> Self {
        Self(selectors)
    }

    pub fn selectors(&self) -> &'static [&'static str] {
        self.0
    }

    /// Selectors a run will actually try under the given mode.
    pub fn strategies(&self, mode: FallbackMode) -> &'static [&'static str] {
        let all = self.selectors();
        match mode {
            FallbackMode::Cascade => all,
            FallbackMode::FirstOnly => &all[..all.len().min(1)],
        }
    }
}

const FAST: FormatPreferenceList = FormatPreferenceList::new(&["bestvideo+bestaudio/best"]);

const MAX_QUALITY: FormatPreferenceList = FormatPreferenceList::new(&[concat!(
    "bestvideo[height>=1080]+bestaudio/",
    "bestvideo[height>=720]+bestaudio/",
    "bestvideo+bestaudio/",
    "best[height>=1080]/",
    "best[height>=720]/",
    "best"
)]);

const DEBUG_PROBE: FormatPreferenceList = FormatPreferenceList::new(&[
    "bestvideo[height>=1080]+bestaudio/bestvideo[height>=720]+bestaudio/best",
    "bestvideo+bestaudio/best",
    "best",
    "worst",
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyProfile {
    /// One merged best video+audio selector, plain title filenames
    Fast,
    /// Resolution-tiered selector chain, platform in filenames
    #[default]
    MaxQuality,
    /// Separate strategies tried one by one, format id in filenames
    DebugProbe,
}

/// Whether a download walks the whole preference list or stops after the
/// first selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    Cascade,
    FirstOnly,
}

impl StrategyProfile {
    pub fn preferences(&self) -> FormatPreferenceList {
        match self {
            Self::Fast => FAST,
            Self::MaxQuality => MAX_QUALITY,
            Self::DebugProbe => DEBUG_PROBE,
        }
    }

    pub fn name_scheme(&self) -> NameScheme {
        match self {
            Self::Fast => NameScheme::Title,
            Self::MaxQuality => NameScheme::TitleWithPlatform,
            Self::DebugProbe => NameScheme::TitleWithFormat,
        }
    }

    pub fn default_fallback(&self) -> FallbackMode {
        match self {
            Self::DebugProbe => FallbackMode::Cascade,
            Self::Fast | Self::MaxQuality => FallbackMode::FirstOnly,
        }
    }

    /// Print title/platform/duration/uploader before downloading.
    pub fn previews_metadata(&self) -> bool {
        matches!(self, Self::MaxQuality)
    }

    pub fn writes_info_json(&self) -> bool {
        matches!(self, Self::DebugProbe)
    }

    /// Extra `--postprocessor-args` values; streams are copied, not re-encoded.
    pub fn postprocessor_args(&self) -> Option<&'static str> {
        match self {
            Self::MaxQuality => Some("ffmpeg:-c:v copy -c:a copy"),
            Self::Fast | Self::DebugProbe => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_probe_order() {
        let selectors = StrategyProfile::DebugProbe.preferences().selectors();
        assert_eq!(selectors.len(), 4);
        assert!(selectors[0].starts_with("bestvideo[height>=1080]"));
        assert_eq!(selectors[3], "worst");
    }

    #[test]
    fn test_max_quality_chain() {
        let selectors = StrategyProfile::MaxQuality.preferences().selectors();
        assert_eq!(
            selectors,
            &["bestvideo[height>=1080]+bestaudio/bestvideo[height>=720]+bestaudio/bestvideo+bestaudio/best[height>=1080]/best[height>=720]/best"]
        );
    }

    #[test]
    fn test_first_only_truncates() {
        let prefs = StrategyProfile::DebugProbe.preferences();
        assert_eq!(prefs.strategies(FallbackMode::Cascade).len(), 4);
        assert_eq!(
            prefs.strategies(FallbackMode::FirstOnly),
            &[prefs.selectors()[0]]
        );

        let empty = FormatPreferenceList::new(&[]);
        assert!(empty.strategies(FallbackMode::FirstOnly).is_empty());
    }

    #[test]
    fn test_profile_defaults() {
        assert_eq!(StrategyProfile::default(), StrategyProfile::MaxQuality);
        assert_eq!(
            StrategyProfile::DebugProbe.default_fallback(),
            FallbackMode::Cascade
        );
        assert_eq!(StrategyProfile::Fast.default_fallback(), FallbackMode::FirstOnly);
        assert!(StrategyProfile::DebugProbe.writes_info_json());
        assert!(!StrategyProfile::Fast.writes_info_json());
        assert!(StrategyProfile::MaxQuality.previews_metadata());
        assert_eq!(StrategyProfile::Fast.name_scheme(), NameScheme::Title);
    }

    #[test]
    fn test_profile_from_config_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            profile: StrategyProfile,
            fallback: FallbackMode,
        }
        let w: Wrapper = toml::from_str("profile = \"debug-probe\"\nfallback = \"first-only\"").unwrap();
        assert_eq!(w.profile, StrategyProfile::DebugProbe);
        assert_eq!(w.fallback, FallbackMode::FirstOnly);
    }
}
