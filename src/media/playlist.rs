use std::fmt;
use thiserror::Error;

/// A contiguous, 1-based window of playlist items. `end == None` runs to the
/// last item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistRange {
    start: usize,
    end: Option<usize>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("playlist positions start at 1, got {0}")]
    ZeroStart(usize),

    #[error("range end {end} is before start {start}")]
    EndBeforeStart { start: usize, end: usize },

    #[error("invalid playlist position {0:?}, expected a number or \"end\"")]
    NotANumber(String),
}

impl PlaylistRange {
    pub fn new(start: usize, end: Option<usize>) -> Result<Self, RangeError> {
        if start == 0 {
            return Err(RangeError::ZeroStart(start));
        }
        if let Some(end) = end {
            if end < start {
                return Err(RangeError::EndBeforeStart { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Parses the CLI pair `<start> <end|"end">`.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let start = parse_position(start)?;
        let end = if end.trim().eq_ignore_ascii_case("end") {
            None
        } else {
            Some(parse_position(end)?)
        };
        Self::new(start, end)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Item-selection expression understood by `--playlist-items`.
    pub fn item_selector(&self) -> String {
        match self.end {
            Some(end) => format!("{}:{}", self.start, end),
            None => format!("{}:", self.start),
        }
    }

    /// Number of items covered, if the range is closed.
    pub fn item_count(&self) -> Option<usize> {
        self.end.map(|end| end - self.start + 1)
    }
}

impl fmt::Display for PlaylistRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "items {} to {}", self.start, end),
            None => write!(f, "items {} to end", self.start),
        }
    }
}

fn parse_position(raw: &str) -> Result<usize, RangeError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| RangeError::NotANumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_range_selector() {
        let range = PlaylistRange::new(5, Some(10)).unwrap();
        assert_eq!(range.item_selector(), "5:10");
        assert_eq!(range.item_count(), Some(6));
    }

    #[test]
    fn test_open_range_selector() {
        let range = PlaylistRange::new(5, None).unwrap();
        assert_eq!(range.item_selector(), "5:");
        assert_eq!(range.item_count(), None);
    }

    #[test]
    fn test_parse_cli_pair() {
        assert_eq!(
            PlaylistRange::parse("3", "end").unwrap(),
            PlaylistRange::new(3, None).unwrap()
        );
        assert_eq!(
            PlaylistRange::parse("3", "END").unwrap().item_selector(),
            "3:"
        );
        assert_eq!(PlaylistRange::parse(" 2", "4 ").unwrap().item_selector(), "2:4");
    }

    #[test]
    fn test_single_item_range() {
        let range = PlaylistRange::new(7, Some(7)).unwrap();
        assert_eq!(range.item_selector(), "7:7");
        assert_eq!(range.item_count(), Some(1));
    }

    #[test]
    fn test_rejects_invalid_ranges() {
        assert_eq!(PlaylistRange::new(0, None), Err(RangeError::ZeroStart(0)));
        assert_eq!(
            PlaylistRange::new(10, Some(5)),
            Err(RangeError::EndBeforeStart { start: 10, end: 5 })
        );
        assert_eq!(
            PlaylistRange::parse("first", "end"),
            Err(RangeError::NotANumber("first".to_string()))
        );
        assert!(PlaylistRange::parse("1", "-3").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PlaylistRange::new(1, Some(3)).unwrap().to_string(),
            "items 1 to 3"
        );
        assert_eq!(PlaylistRange::new(4, None).unwrap().to_string(), "items 4 to end");
    }
}
