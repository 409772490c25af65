use std::collections::{BTreeMap, HashMap};

use time::PrimitiveDateTime;

use crate::db::models::TrackRecord;

pub(crate) const STATUS_NOT_ATTEMPTED: &str = "notattempted";

/// Folded view of every track element one object recorded in an attempt.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectTrack {
    /// Completion/lesson status; `notattempted` when the package never set one.
    pub(crate) status: String,
    /// Raw score rounded to two decimals.
    pub(crate) score_raw: Option<f64>,
    pub(crate) elements: HashMap<String, String>,
}

impl ObjectTrack {
    pub(crate) fn element(&self, name: &str) -> Option<&str> {
        self.elements.get(name).map(String::as_str)
    }

    pub(crate) fn is_complete(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "passed")
    }
}

/// First and last moment anything was recorded in an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttemptRuntime {
    pub(crate) start: PrimitiveDateTime,
    pub(crate) finish: PrimitiveDateTime,
}

pub(crate) fn attempt_runtime(tracks: &[TrackRecord]) -> Option<AttemptRuntime> {
    let start = tracks.iter().map(|track| track.time_modified).min()?;
    let finish = tracks.iter().map(|track| track.time_modified).max()?;
    Some(AttemptRuntime { start, finish })
}

/// Groups an attempt's tracks per object. Later records win on duplicates.
pub(crate) fn aggregate_by_object(tracks: &[TrackRecord]) -> BTreeMap<String, ObjectTrack> {
    let mut grouped: BTreeMap<String, Vec<&TrackRecord>> = BTreeMap::new();
    for track in tracks {
        grouped.entry(track.object_id.clone()).or_default().push(track);
    }

    grouped
        .into_iter()
        .map(|(object_id, mut records)| {
            records.sort_by_key(|record| record.time_modified);
            (object_id, fold_object(&records))
        })
        .collect()
}

fn fold_object(records: &[&TrackRecord]) -> ObjectTrack {
    let mut status = String::new();
    let mut score_raw = None;
    let mut elements = HashMap::with_capacity(records.len());

    for record in records {
        match record.element.as_str() {
            "cmi.core.lesson_status" | "cmi.completion_status" => {
                status = normalize_status(&record.value);
            }
            "cmi.core.score.raw" | "cmi.score.raw" => {
                score_raw = parse_score(&record.value);
            }
            _ => {}
        }
        elements.insert(record.element.clone(), record.value.clone());
    }

    if status.is_empty() {
        status = STATUS_NOT_ATTEMPTED.to_string();
    }

    ObjectTrack { status, score_raw, elements }
}

fn normalize_status(value: &str) -> String {
    let value = value.trim();
    if value == "not attempted" {
        STATUS_NOT_ATTEMPTED.to_string()
    } else {
        value.to_string()
    }
}

fn parse_score(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok().filter(|score| score.is_finite())?;
    Some((parsed * 100.0).round() / 100.0)
}

/// Renders a score without float noise: `80`, `72.5`, `33.33`.
pub(crate) fn format_score(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
