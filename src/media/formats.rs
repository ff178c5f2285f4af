use std::cmp::Ordering;
use std::fmt;

use super::types::StreamDescriptor;
use crate::utils::format_filesize;

pub const TOP_VIDEO: usize = 10;
pub const TOP_AUDIO: usize = 5;

/// Formats split into video and audio, best first.
#[derive(Debug, Clone)]
pub struct FormatReport {
    pub total: usize,
    pub video: Vec<StreamDescriptor>,
    pub audio: Vec<StreamDescriptor>,
}

/// Orders by (height, fps); missing values count as 0.
pub fn video_quality_cmp(a: &StreamDescriptor, b: &StreamDescriptor) -> Ordering {
    a.height
        .unwrap_or(0)
        .cmp(&b.height.unwrap_or(0))
        .then_with(|| a.fps.unwrap_or(0.0).total_cmp(&b.fps.unwrap_or(0.0)))
}

fn audio_quality_cmp(a: &StreamDescriptor, b: &StreamDescriptor) -> Ordering {
    a.abr.unwrap_or(0.0).total_cmp(&b.abr.unwrap_or(0.0))
}

impl FormatReport {
    pub fn build(formats: Vec<StreamDescriptor>) -> Self {
        let total = formats.len();
        let (mut video, rest): (Vec<_>, Vec<_>) =
            formats.into_iter().partition(StreamDescriptor::has_video);
        let mut audio: Vec<_> = rest.into_iter().filter(StreamDescriptor::has_audio).collect();

        video.sort_by(|a, b| video_quality_cmp(b, a));
        audio.sort_by(|a, b| audio_quality_cmp(b, a));

        Self { total, video, audio }
    }

    /// The single highest (height, fps) video format.
    pub fn best(&self) -> Option<&StreamDescriptor> {
        self.video.first()
    }

    pub fn top_video(&self) -> &[StreamDescriptor] {
        &self.video[..self.video.len().min(TOP_VIDEO)]
    }

    pub fn top_audio(&self) -> &[StreamDescriptor] {
        &self.audio[..self.audio.len().min(TOP_AUDIO)]
    }
}

fn opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn truncated(value: Option<&str>) -> String {
    value.unwrap_or("N/A").chars().take(10).collect()
}

impl fmt::Display for FormatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "❌ No formats available");
        }

        let rule = "-".repeat(80);
        writeln!(f, "📊 Available Formats ({} total):", self.total)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<10} {:<10} {:<12} {:<5} {:<10} {:<12}",
            "ID", "Extension", "Resolution", "FPS", "Codec", "Filesize"
        )?;
        writeln!(f, "{rule}")?;

        writeln!(f, "🎥 VIDEO FORMATS:")?;
        for d in self.top_video() {
            writeln!(
                f,
                "{:<10} {:<10} {:<12} {:<5} {:<10} {:<12}",
                d.format_id,
                opt(d.ext.as_deref()),
                d.resolution(),
                opt(d.fps),
                truncated(d.vcodec.as_deref()),
                format_filesize(d.effective_size()),
            )?;
        }

        writeln!(f, "\n🔊 AUDIO FORMATS:")?;
        for d in self.top_audio() {
            writeln!(
                f,
                "{:<10} {:<10} {:<12} {:<5} {:<10}",
                d.format_id,
                opt(d.ext.as_deref()),
                "Audio",
                opt(d.abr),
                truncated(d.acodec.as_deref()),
            )?;
        }

        if let Some(best) = self.best() {
            write!(
                f,
                "\n⭐ Best video format: {} - {} @ {} fps",
                best.format_id,
                best.resolution(),
                opt(best.fps)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, height: u32, fps: Option<f64>) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.into(),
            ext: Some("mp4".into()),
            width: Some(height * 16 / 9),
            height: Some(height),
            fps,
            vcodec: Some("avc1.640028".into()),
            acodec: Some("none".into()),
            ..Default::default()
        }
    }

    fn audio(id: &str, abr: f64) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.into(),
            ext: Some("m4a".into()),
            vcodec: Some("none".into()),
            acodec: Some("mp4a.40.2".into()),
            abr: Some(abr),
            ..Default::default()
        }
    }

    fn sample() -> Vec<StreamDescriptor> {
        vec![
            video("18", 360, Some(30.0)),
            audio("139", 48.0),
            video("299", 1080, Some(60.0)),
            video("137", 1080, Some(30.0)),
            audio("140", 129.5),
            video("22", 720, None),
            StreamDescriptor {
                format_id: "sb0".into(),
                vcodec: Some("none".into()),
                acodec: Some("none".into()),
                ..Default::default()
            },
            audio("251", 160.0),
        ]
    }

    #[test]
    fn test_partition_and_sort() {
        let report = FormatReport::build(sample());

        assert_eq!(report.total, 8);
        let video_ids: Vec<_> = report.video.iter().map(|d| d.format_id.as_str()).collect();
        assert_eq!(video_ids, ["299", "137", "22", "18"]);
        let audio_ids: Vec<_> = report.audio.iter().map(|d| d.format_id.as_str()).collect();
        assert_eq!(audio_ids, ["251", "140", "139"]);
    }

    #[test]
    fn test_video_order_is_non_increasing() {
        let report = FormatReport::build(sample());
        for pair in report.video.windows(2) {
            assert_ne!(video_quality_cmp(&pair[0], &pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn test_best_is_the_maximum() {
        let formats = sample();
        let expected = formats
            .iter()
            .filter(|d| d.has_video())
            .max_by(|a, b| video_quality_cmp(a, b))
            .cloned()
            .unwrap();

        let report = FormatReport::build(formats);
        let best = report.best().unwrap();
        assert_eq!(video_quality_cmp(best, &expected), Ordering::Equal);
        assert_eq!(best.format_id, "299");
    }

    #[test]
    fn test_top_n_limits() {
        let mut formats: Vec<_> = (1..=14).map(|h| video(&h.to_string(), h * 100, None)).collect();
        formats.extend((1..=8).map(|i| audio(&format!("a{i}"), i as f64 * 10.0)));

        let report = FormatReport::build(formats);
        assert_eq!(report.top_video().len(), TOP_VIDEO);
        assert_eq!(report.top_audio().len(), TOP_AUDIO);
        assert_eq!(report.top_video()[0].format_id, "14");
        assert_eq!(report.top_audio()[0].format_id, "a8");
    }

    #[test]
    fn test_empty_report() {
        let report = FormatReport::build(Vec::new());
        assert!(report.best().is_none());
        assert_eq!(report.to_string(), "❌ No formats available");
    }

    #[test]
    fn test_rendered_table_mentions_best() {
        let rendered = FormatReport::build(sample()).to_string();
        assert!(rendered.contains("🎥 VIDEO FORMATS:"));
        assert!(rendered.contains("🔊 AUDIO FORMATS:"));
        assert!(rendered.contains("⭐ Best video format: 299 - 1920x1080 @ 60 fps"));
    }
}
