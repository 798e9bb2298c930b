//! Plain-text report generation.
//!
//! The report reproduces exactly what the timeline and the emotion tally
//! hold at call time: a fixed header, one line per stored segment in storage
//! order, then one line per tallied emotion in snapshot order. No
//! re-filtering, no re-sorting.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::CoreResult;
use crate::stats::EmotionTally;
use crate::timeline::SegmentTimeline;

const REPORT_TITLE: &str = "Detected Activities and Emotions Report";
const SEPARATOR_WIDTH: usize = 50;

/// Renders the report text from the finished timeline and tally.
pub fn format_report(timeline: &SegmentTimeline, tally: &EmotionTally) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{REPORT_TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH));
    let _ = writeln!(out);

    let _ = writeln!(out, "Detected activities:");
    for segment in timeline.segments() {
        let _ = writeln!(
            out,
            "- {} (start: {}s, end: {}s)",
            segment.description,
            format_seconds(segment.start_time),
            format_seconds(segment.end_time)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Detected emotions:");
    for (label, count) in tally.snapshot() {
        let _ = writeln!(out, "- {label}: {count}");
    }

    out
}

/// Renders a seconds value with at least one decimal place, so a segment
/// boundary at 2 seconds prints as "2.0s" rather than "2s".
fn format_seconds(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Formats the report and writes it to `path`.
pub fn write_report(
    path: &Path,
    timeline: &SegmentTimeline,
    tally: &EmotionTally,
) -> CoreResult<()> {
    let text = format_report(timeline, tally);
    fs::write(path, text)?;
    log::info!("Wrote report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Emotion;
    use crate::timeline::Segment;

    fn timeline() -> SegmentTimeline {
        SegmentTimeline::build(
            vec![
                Segment {
                    description: "running".to_string(),
                    start_time: 2.0,
                    end_time: 5.0,
                    confidence: 0.9,
                },
                Segment {
                    description: "waving".to_string(),
                    start_time: 1.5,
                    end_time: 2.5,
                    confidence: 0.8,
                },
            ],
            0.5,
        )
    }

    #[test]
    fn report_matches_fixed_template() {
        let mut tally = EmotionTally::new();
        for _ in 0..31 {
            tally.record(Emotion::Happy);
        }
        tally.record(Emotion::Sad);

        let text = format_report(&timeline(), &tally);
        let expected = "\
Detected Activities and Emotions Report
==================================================

Detected activities:
- running (start: 2.0s, end: 5.0s)
- waving (start: 1.5s, end: 2.5s)

Detected emotions:
- happy: 31
- sad: 1
";
        assert_eq!(text, expected);
    }

    #[test]
    fn report_preserves_timeline_storage_order() {
        let text = format_report(&timeline(), &EmotionTally::new());
        let running = text.find("- running").unwrap();
        let waving = text.find("- waving").unwrap();
        // "waving" starts earlier in time but was stored second; no
        // re-sorting happens.
        assert!(running < waving);
    }

    #[test]
    fn empty_inputs_render_bare_template() {
        let text = format_report(&SegmentTimeline::default(), &EmotionTally::new());
        let expected = "\
Detected Activities and Emotions Report
==================================================

Detected activities:

Detected emotions:
";
        assert_eq!(text, expected);
    }

    #[test]
    fn whole_second_boundaries_keep_one_decimal() {
        assert_eq!(format_seconds(2.0), "2.0");
        assert_eq!(format_seconds(0.0), "0.0");
        assert_eq!(format_seconds(1.5), "1.5");
        assert_eq!(format_seconds(12.25), "12.25");
    }

    #[test]
    fn write_report_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_report(&path, &timeline(), &EmotionTally::new()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(REPORT_TITLE));
    }
}
