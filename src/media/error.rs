use thiserror::Error;

/// Failures reported by an extractor for a single describe or fetch call.
///
/// Every variant is recoverable at the strategy or URL boundary; the
/// orchestrator moves on to the next format strategy or the next URL.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// URL unsupported, or the site changed under the extractor
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The requested quality is not offered for this video
    #[error("requested format is not available: {0}")]
    NoMatchingFormat(String),

    /// Connection, HTTP or transfer failure
    #[error("network error: {0}")]
    Network(String),

    /// Merging or another post-processing step failed
    #[error("post-processing failed: {0}")]
    PostProcess(String),

    /// The extractor binary could not be started
    #[error("{tool} could not be started: {reason}")]
    ToolNotFound { tool: String, reason: String },

    /// The extractor ran but its output could not be understood
    #[error("failed to parse extractor output: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Classifies a failed yt-dlp run from its stderr text.
    ///
    /// Only the `ERROR:` line decides the kind when there is one, since
    /// warnings printed earlier mention ffmpeg, merging or retries on runs
    /// that fail for unrelated reasons.
    pub fn from_stderr(stderr: &str) -> Self {
        let message = last_error_line(stderr);
        let scope = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| l.starts_with("ERROR:"))
            .unwrap_or(stderr);
        Self::classify(&scope.to_lowercase(), message)
    }

    fn classify(lower: &str, message: String) -> Self {
        if lower.contains("requested format is not available")
            || lower.contains("no video formats found")
        {
            return Self::NoMatchingFormat(message);
        }

        if lower.contains("postprocessing")
            || lower.contains("ffmpeg")
            || lower.contains("merging")
            || lower.contains("conversion failed")
        {
            return Self::PostProcess(message);
        }

        if lower.contains("http error")
            || lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("urlopen error")
            || lower.contains("connection")
            || lower.contains("unable to download video data")
        {
            return Self::Network(message);
        }

        Self::Extraction(message)
    }
}

/// yt-dlp prefixes the interesting line with `ERROR:`; fall back to the last
/// non-empty line, then to a generic message.
fn last_error_line(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| "extractor exited without an error message".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_missing_format() {
        let err = DownloadError::from_stderr(
            "ERROR: [youtube] abc: Requested format is not available. Use --list-formats",
        );
        assert!(matches!(err, DownloadError::NoMatchingFormat(_)));
    }

    #[test]
    fn test_classifies_network_failure() {
        let err = DownloadError::from_stderr(
            "WARNING: retrying\nERROR: Unable to download webpage: HTTP Error 503: Service Unavailable",
        );
        assert!(matches!(err, DownloadError::Network(_)));
    }

    #[test]
    fn test_warning_does_not_decide_the_kind() {
        let err = DownloadError::from_stderr(
            "WARNING: You have requested merging of multiple formats but ffmpeg is not installed\n\
             ERROR: Unable to download webpage: HTTP Error 503: Service Unavailable",
        );
        match err {
            DownloadError::Network(msg) => assert_eq!(
                msg,
                "Unable to download webpage: HTTP Error 503: Service Unavailable"
            ),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_classifies_without_error_line() {
        let err = DownloadError::from_stderr("Connection reset by peer");
        assert!(matches!(err, DownloadError::Network(_)));
    }

    #[test]
    fn test_classifies_merge_failure() {
        let err = DownloadError::from_stderr("ERROR: Postprocessing: Conversion failed!");
        assert!(matches!(err, DownloadError::PostProcess(_)));
    }

    #[test]
    fn test_unknown_failure_is_extraction() {
        let err = DownloadError::from_stderr("ERROR: Unsupported URL: https://example.com/");
        match err {
            DownloadError::Extraction(msg) => {
                assert_eq!(msg, "Unsupported URL: https://example.com/")
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_empty_stderr_has_message() {
        let err = DownloadError::from_stderr("");
        assert_eq!(
            err.to_string(),
            "extraction failed: extractor exited without an error message"
        );
    }

    #[test]
    fn test_message_prefers_error_line() {
        let err = DownloadError::from_stderr("ERROR: something broke\nsome trailing noise");
        assert_eq!(err.to_string(), "extraction failed: something broke");
    }
}
