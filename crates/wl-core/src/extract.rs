//! Tagged sub-entry extraction from free-text day notes.
//!
//! # Grammar
//!
//! Each line of a day's notes is searched (case-insensitively, unanchored) for
//!
//! ```text
//! <tag>:<description>(<hours>).      brackets may be (), [] or {}
//! ```
//!
//! The description capture is greedy, so it extends to the last bracketed
//! token that is directly followed by a period. A match only qualifies when the
//! marker keyword also appears as a word inside the matched span, so
//! `Research: paper review [2].` does not count against an `IRAP` marker while
//! `Research: paper review (IRAP) [2].` does.
//!
//! When several lines qualify the last one wins.

use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::record::{Hours, TaggedEntry};

/// Errors building a matcher from configured keywords.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("{field} cannot be empty")]
    EmptyKeyword { field: &'static str },

    #[error("failed to compile entry pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Why a sub-entry that looked tagged did not produce (or fully produce) an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// The tag prefix is present but the bracketed hours and period are not.
    MalformedEntry,
    /// The grammar matched but the marker keyword is absent.
    MissingMarker,
    /// The entry qualified but its hours token is not a number.
    NonNumericHours,
    /// More than one log row exists for the same date.
    DuplicateDate,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MalformedEntry => "malformed entry",
            Self::MissingMarker => "missing marker",
            Self::NonNumericHours => "non-numeric hours",
            Self::DuplicateDate => "duplicate date",
        };
        f.write_str(s)
    }
}

/// A diagnostic about one day's input. Never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseAnomaly {
    pub date: NaiveDate,
    pub line: String,
    pub kind: AnomalyKind,
}

impl ParseAnomaly {
    pub fn new(date: NaiveDate, line: impl Into<String>, kind: AnomalyKind) -> Self {
        let anomaly = Self {
            date,
            line: line.into(),
            kind,
        };
        tracing::debug!(
            date = %anomaly.date,
            line = %anomaly.line,
            kind = %anomaly.kind,
            "parse anomaly"
        );
        anomaly
    }
}

/// Outcome of scanning one day's notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub entry: Option<TaggedEntry>,
    pub anomalies: Vec<ParseAnomaly>,
}

/// Compiled matcher for one (tag, marker) configuration.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    entry: Regex,
    prefix: Regex,
    marker: Regex,
    restatement: Regex,
}

impl TagMatcher {
    /// Builds a matcher for `<tag>:` entries that must mention `marker`.
    pub fn new(tag: &str, marker: &str) -> Result<Self, MatcherError> {
        let tag = tag.trim();
        let marker = marker.trim();
        if tag.is_empty() {
            return Err(MatcherError::EmptyKeyword {
                field: "tag keyword",
            });
        }
        if marker.is_empty() {
            return Err(MatcherError::EmptyKeyword {
                field: "marker keyword",
            });
        }

        let tag_pattern = regex::escape(tag);
        let marker_pattern = regex::escape(marker);

        Ok(Self {
            entry: Regex::new(&format!(r"(?i){tag_pattern}:(.*)[(\[{{](.*)[)\]}}]\."))?,
            prefix: Regex::new(&format!(r"(?i){tag_pattern}:"))?,
            marker: Regex::new(&format!(
                r"(?i){}{marker_pattern}{}",
                word_edge(marker.chars().next()),
                word_edge(marker.chars().last()),
            ))?,
            restatement: Regex::new(&format!(r"(?i)\s*\({marker_pattern}\)"))?,
        })
    }

    /// Extracts the winning tagged entry, if any line qualifies.
    pub fn extract(&self, date: NaiveDate, notes: &str) -> Option<TaggedEntry> {
        self.scan(date, notes).entry
    }

    /// Extracts the winning entry and reports every skipped tagged-looking line.
    pub fn scan(&self, date: NaiveDate, notes: &str) -> Extraction {
        let mut extraction = Extraction::default();

        for line in notes.lines() {
            let Some(caps) = self.entry.captures(line) else {
                if self.prefix.is_match(line) {
                    extraction.anomalies.push(ParseAnomaly::new(
                        date,
                        line,
                        AnomalyKind::MalformedEntry,
                    ));
                }
                continue;
            };

            let span = caps.get(0).map_or("", |m| m.as_str());
            if !self.marker.is_match(span) {
                extraction
                    .anomalies
                    .push(ParseAnomaly::new(date, line, AnomalyKind::MissingMarker));
                continue;
            }

            let description = caps.get(1).map_or("", |m| m.as_str()).trim();
            let description = self.restatement.replace_all(description, "");
            let hours = caps.get(2).map_or("", |m| m.as_str()).trim();

            // Later qualifying lines overwrite earlier ones.
            extraction.entry = Some(TaggedEntry {
                date,
                description: format!("{}.", description.trim()),
                hours: Hours::new(hours),
            });
        }

        if let Some(entry) = &extraction.entry {
            if entry.hours.as_decimal().is_none() {
                extraction.anomalies.push(ParseAnomaly::new(
                    date,
                    entry.hours.as_str(),
                    AnomalyKind::NonNumericHours,
                ));
            }
        }

        extraction
    }
}

/// `\b` when the keyword edge is a word character; otherwise no boundary applies.
fn word_edge(edge: Option<char>) -> &'static str {
    match edge {
        Some(c) if c.is_alphanumeric() || c == '_' => r"\b",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> TagMatcher {
        TagMatcher::new("research", "IRAP").unwrap()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn extracts_reference_example() {
        let entry = matcher()
            .extract(tuesday(), "Research: Fixed build pipeline (IRAP) [3.5].")
            .unwrap();
        assert_eq!(entry.description, "Fixed build pipeline.");
        assert_eq!(entry.hours.as_str(), "3.5");
        assert_eq!(entry.date, tuesday());
    }

    #[test]
    fn accepts_all_bracket_styles() {
        for notes in [
            "research: a (IRAP) (1).",
            "research: a (IRAP) [1].",
            "research: a (IRAP) {1}.",
        ] {
            let entry = matcher().extract(tuesday(), notes).unwrap();
            assert_eq!(entry.hours.as_str(), "1", "{notes}");
            assert_eq!(entry.description, "a.", "{notes}");
        }
    }

    #[test]
    fn tag_and_marker_are_case_insensitive() {
        let entry = matcher()
            .extract(tuesday(), "RESEARCH: Tuned model (irap) [2].")
            .unwrap();
        assert_eq!(entry.description, "Tuned model.");
    }

    #[test]
    fn last_qualifying_line_wins() {
        let notes = "Research: first task IRAP [1].\nMeeting with team\nResearch: second task IRAP [2.5].";
        let entry = matcher().extract(tuesday(), notes).unwrap();
        assert_eq!(entry.description, "second task IRAP.");
        assert_eq!(entry.hours.as_str(), "2.5");
    }

    #[test]
    fn later_non_qualifying_line_does_not_clear_earlier_entry() {
        let notes = "Research: kept (IRAP) [4].\nResearch: no marker here [1].";
        let extraction = matcher().scan(tuesday(), notes);
        assert_eq!(extraction.entry.unwrap().hours.as_str(), "4");
        assert_eq!(extraction.anomalies.len(), 1);
        assert_eq!(extraction.anomalies[0].kind, AnomalyKind::MissingMarker);
    }

    #[test]
    fn marker_must_be_a_distinct_word() {
        let extraction = matcher().scan(tuesday(), "Research: irapid prototyping [2].");
        assert!(extraction.entry.is_none());
        assert_eq!(extraction.anomalies[0].kind, AnomalyKind::MissingMarker);
    }

    #[test]
    fn malformed_syntax_is_skipped_and_reported() {
        let notes = "Research: forgot the period (IRAP) [2]\nResearch: no hours IRAP.";
        let extraction = matcher().scan(tuesday(), notes);
        assert!(extraction.entry.is_none());
        assert_eq!(extraction.anomalies.len(), 2);
        assert!(
            extraction
                .anomalies
                .iter()
                .all(|a| a.kind == AnomalyKind::MalformedEntry)
        );
    }

    #[test]
    fn untagged_notes_produce_nothing() {
        let extraction = matcher().scan(tuesday(), "Lunch\nEmails (1).");
        assert_eq!(extraction, Extraction::default());
        assert!(matcher().extract(tuesday(), "").is_none());
    }

    #[test]
    fn non_numeric_hours_kept_verbatim_and_reported() {
        let extraction = matcher().scan(tuesday(), "Research: survey (IRAP) [half day].");
        let entry = extraction.entry.unwrap();
        assert_eq!(entry.hours.as_str(), "half day");
        assert_eq!(extraction.anomalies[0].kind, AnomalyKind::NonNumericHours);
    }

    #[test]
    fn restatement_removed_anywhere_in_description() {
        let entry = matcher()
            .extract(tuesday(), "research: (IRAP) Wrote tests (irap) [1].")
            .unwrap();
        assert_eq!(entry.description, "Wrote tests.");

        let entry = matcher()
            .extract(tuesday(), "Research: Fixed (IRAP) build [1].")
            .unwrap();
        assert_eq!(entry.description, "Fixed build.");

        let entry = matcher()
            .extract(tuesday(), "Research: Ported  (irap)(IRAP) the  cache [1].")
            .unwrap();
        assert_eq!(entry.description, "Ported the  cache.");
    }

    #[test]
    fn crlf_lines_are_split() {
        let notes = "Research: a (IRAP) [1].\r\nResearch: b (IRAP) [2].\r\n";
        let entry = matcher().extract(tuesday(), notes).unwrap();
        assert_eq!(entry.hours.as_str(), "2");
    }

    #[test]
    fn single_keyword_form() {
        let matcher = TagMatcher::new("IRAP", "IRAP").unwrap();
        let entry = matcher.extract(tuesday(), "IRAP: Refactored parser (3).").unwrap();
        assert_eq!(entry.description, "Refactored parser.");
        assert_eq!(entry.hours.as_str(), "3");
    }

    #[test]
    fn keywords_are_escaped() {
        let matcher = TagMatcher::new("r&d", "c++").unwrap();
        let entry = matcher.extract(tuesday(), "R&D: port to c++ [1].").unwrap();
        assert_eq!(entry.description, "port to c++.");
        assert!(matcher.extract(tuesday(), "R&D: port to c [1].").is_none());
    }

    #[test]
    fn empty_keywords_rejected() {
        assert!(matches!(
            TagMatcher::new("  ", "IRAP"),
            Err(MatcherError::EmptyKeyword {
                field: "tag keyword"
            })
        ));
        assert!(matches!(
            TagMatcher::new("research", ""),
            Err(MatcherError::EmptyKeyword {
                field: "marker keyword"
            })
        ));
    }
}
