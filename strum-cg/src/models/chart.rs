//! Chord chart document model
//!
//! The chart is the primary generated artifact: lyric lines with per-measure
//! chords and start-time offsets for playback synchronization, plus the list
//! of unique chords used for fretboard lookups and accompaniment advice.

use serde::{Deserialize, Serialize};

/// A complete chord chart for one song arrangement
///
/// Serialized with camelCase field names; the JSON form is the stored cache
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordChart {
    /// Lyric lines with chords and timing
    #[serde(default)]
    pub lines: Vec<ChartLine>,
    /// All unique chord names appearing in the song
    #[serde(default)]
    pub unique_chords: Vec<String>,
}

/// One lyric line of the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLine {
    /// Lyrics for this line
    pub lyrics: String,
    /// Start time of this line in seconds
    #[serde(default)]
    pub start_time: f64,
    /// Measures for this line
    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// One measure within a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    /// Chord names for this measure, space-separated (e.g. "C", "G Am")
    pub chords: String,
    /// Start time of this measure in seconds
    #[serde(default)]
    pub start_time: f64,
}

impl ChordChart {
    /// Rebuild `unique_chords` from the measure cells
    ///
    /// The generator's own unique-chord list is unreliable, so the
    /// authoritative list is recomputed by scanning every measure, splitting
    /// each cell on whitespace and collecting chords in order of first
    /// appearance. When the generator returned no lines at all, the raw list
    /// it supplied is trimmed and deduplicated instead.
    pub fn recompute_unique_chords(&mut self) {
        if self.lines.is_empty() {
            let mut cleaned: Vec<String> = Vec::new();
            for chord in &self.unique_chords {
                let chord = chord.trim();
                if !chord.is_empty() && !cleaned.iter().any(|c| c == chord) {
                    cleaned.push(chord.to_string());
                }
            }
            self.unique_chords = cleaned;
            return;
        }

        let mut chords: Vec<String> = Vec::new();
        for line in &self.lines {
            for measure in &line.measures {
                for chord in measure.chords.split_whitespace() {
                    if !chords.iter().any(|c| c == chord) {
                        chords.push(chord.to_string());
                    }
                }
            }
        }
        self.unique_chords = chords;
    }

    /// Render the progression as text, one line per chart line with measures
    /// separated by `|` (the form handed to the accompaniment generator)
    pub fn progression_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.measures
                    .iter()
                    .map(|m| m.chords.as_str())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(measures: &[&str]) -> ChartLine {
        ChartLine {
            lyrics: "la la la".to_string(),
            start_time: 0.0,
            measures: measures
                .iter()
                .map(|chords| Measure {
                    chords: chords.to_string(),
                    start_time: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_recompute_replaces_untrusted_list() {
        let mut chart = ChordChart {
            lines: vec![line(&["C"]), line(&["G7 Am"]), line(&["C"])],
            unique_chords: vec!["X".to_string()],
        };

        chart.recompute_unique_chords();

        assert_eq!(chart.unique_chords, vec!["C", "G7", "Am"]);
    }

    #[test]
    fn test_recompute_splits_compound_measure_cells() {
        let mut chart = ChordChart {
            lines: vec![line(&["C  G", "Am F"])],
            unique_chords: vec![],
        };

        chart.recompute_unique_chords();

        assert_eq!(chart.unique_chords, vec!["C", "G", "Am", "F"]);
    }

    #[test]
    fn test_recompute_falls_back_to_raw_list_without_lines() {
        let mut chart = ChordChart {
            lines: vec![],
            unique_chords: vec![
                " C ".to_string(),
                "G".to_string(),
                "C".to_string(),
                "".to_string(),
            ],
        };

        chart.recompute_unique_chords();

        assert_eq!(chart.unique_chords, vec!["C", "G"]);
    }

    #[test]
    fn test_progression_text_joins_measures_and_lines() {
        let chart = ChordChart {
            lines: vec![line(&["C", "G"]), line(&["Am"])],
            unique_chords: vec![],
        };

        assert_eq!(chart.progression_text(), "C | G\nAm");
    }

    #[test]
    fn test_chart_json_uses_camel_case() {
        let chart = ChordChart {
            lines: vec![line(&["C"])],
            unique_chords: vec!["C".to_string()],
        };

        let json = serde_json::to_value(&chart).unwrap();
        assert!(json.get("uniqueChords").is_some());
        assert!(json["lines"][0].get("startTime").is_some());
    }
}
