use std::path::{Path, PathBuf};

use crate::utils::sanitize_component;

/// Which metadata fields end up in the output filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameScheme {
    /// `Foo.mp4`
    Title,
    /// `Foo [YouTube].mp4`
    TitleWithPlatform,
    /// `Foo [137+140].mp4`
    TitleWithFormat,
}

/// Fields substituted into a name when rendering it locally.
#[derive(Debug, Clone, Default)]
pub struct NameFields {
    pub title: String,
    pub platform: String,
    pub format_id: String,
    pub ext: String,
}

impl NameScheme {
    /// Output template in the extractor's own `%(field)s` syntax.
    pub fn extractor_pattern(&self) -> &'static str {
        match self {
            Self::Title => "%(title)s.%(ext)s",
            Self::TitleWithPlatform => "%(title)s [%(extractor)s].%(ext)s",
            Self::TitleWithFormat => "%(title)s [%(format_id)s].%(ext)s",
        }
    }

    pub fn render(&self, fields: &NameFields) -> String {
        let title = sanitize_component(&fields.title);
        match self {
            Self::Title => format!("{}.{}", title, fields.ext),
            Self::TitleWithPlatform => format!(
                "{} [{}].{}",
                title,
                sanitize_component(&fields.platform),
                fields.ext
            ),
            Self::TitleWithFormat => format!(
                "{} [{}].{}",
                title,
                sanitize_component(&fields.format_id),
                fields.ext
            ),
        }
    }
}

const PLAYLIST_POSITION: &str = "%(playlist_index)d - ";

/// Where downloads land under the output directory.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    scheme: NameScheme,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, scheme: NameScheme) -> Self {
        Self {
            root: root.into(),
            scheme,
        }
    }

    pub fn single_template(&self) -> PathBuf {
        escape_literal(&self.root).join(self.scheme.extractor_pattern())
    }

    pub fn playlist_dir(&self, playlist_title: &str) -> PathBuf {
        self.root.join(sanitize_component(playlist_title))
    }

    /// Each item is prefixed with its 1-based position in the playlist.
    pub fn playlist_template(&self, playlist_title: &str) -> PathBuf {
        escape_literal(&self.playlist_dir(playlist_title)).join(format!(
            "{}{}",
            PLAYLIST_POSITION,
            self.scheme.extractor_pattern()
        ))
    }

    pub fn single_path(&self, fields: &NameFields) -> PathBuf {
        self.root.join(self.scheme.render(fields))
    }
}

/// Literal path parts must not be read as `%(field)s` placeholders.
fn escape_literal(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('%', "%%"))
}
