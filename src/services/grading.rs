use std::collections::BTreeMap;

use crate::db::types::GradeMethod;
use crate::services::tracks::ObjectTrack;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AttemptTotals {
    completed: u32,
    values: u32,
    sum: f64,
    max: f64,
}

fn totals(objects: &BTreeMap<String, ObjectTrack>) -> AttemptTotals {
    objects.values().fold(AttemptTotals::default(), |mut totals, object| {
        if object.is_complete() {
            totals.completed += 1;
        }
        if let Some(raw) = object.score_raw {
            totals.values += 1;
            totals.sum += raw;
            totals.max = if totals.values == 1 { raw } else { totals.max.max(raw) };
        }
        totals
    })
}

/// Grade of one attempt under the activity's grading method.
pub(crate) fn grade_attempt(method: GradeMethod, objects: &BTreeMap<String, ObjectTrack>) -> f64 {
    let totals = totals(objects);
    match method {
        GradeMethod::Objects => f64::from(totals.completed),
        GradeMethod::Highest => totals.max,
        GradeMethod::Average if totals.values == 0 => 0.0,
        GradeMethod::Average => totals.sum / f64::from(totals.values),
        GradeMethod::Sum => totals.sum,
    }
}
