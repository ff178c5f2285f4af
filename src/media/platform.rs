use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Vimeo,
    Dailymotion,
    Twitch,
    TikTok,
    Instagram,
    Facebook,
    Twitter,
    Reddit,
    Unknown,
}

/// Platforms advertised by `--platforms`, in display order.
pub const WELL_KNOWN: [Platform; 9] = [
    Platform::YouTube,
    Platform::Vimeo,
    Platform::Dailymotion,
    Platform::Twitch,
    Platform::TikTok,
    Platform::Instagram,
    Platform::Facebook,
    Platform::Twitter,
    Platform::Reddit,
];

impl Platform {
    fn domains(&self) -> &'static [&'static str] {
        match self {
            Self::YouTube => &["youtube.com", "youtu.be"],
            Self::Vimeo => &["vimeo.com"],
            Self::Dailymotion => &["dailymotion.com"],
            Self::Twitch => &["twitch.tv"],
            Self::TikTok => &["tiktok.com"],
            Self::Instagram => &["instagram.com"],
            Self::Facebook => &["facebook.com", "fb.com", "fb.watch"],
            Self::Twitter => &["twitter.com", "x.com"],
            Self::Reddit => &["reddit.com", "redd.it"],
            Self::Unknown => &[],
        }
    }

    fn matches_host(&self, host: &str) -> bool {
        self.domains()
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::YouTube => "YouTube",
            Self::Vimeo => "Vimeo",
            Self::Dailymotion => "Dailymotion",
            Self::Twitch => "Twitch",
            Self::TikTok => "TikTok",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
            Self::Twitter => "Twitter",
            Self::Reddit => "Reddit",
            Self::Unknown => "Unknown (but likely supported)",
        };
        f.write_str(name)
    }
}

pub fn detect_platform(url: &str) -> Platform {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return Platform::Unknown;
    };
    let Some(host) = parsed.host_str() else {
        return Platform::Unknown;
    };
    let host = host.to_ascii_lowercase();

    WELL_KNOWN
        .into_iter()
        .find(|p| p.matches_host(&host))
        .unwrap_or(Platform::Unknown)
}

pub fn print_supported_platforms() {
    println!("🌐 Supported platforms include:");
    for (i, platform) in WELL_KNOWN.iter().enumerate() {
        println!("   {:2}. {}", i + 1, platform);
    }
    println!("   ... and 1000+ more!");
    println!("\nJust paste any video URL and it will work!");
}
