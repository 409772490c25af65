use serde::Deserialize;
use validator::Validate;

use crate::repositories::AttemptRef;

/// Query string accepted by the report endpoints.
#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    #[validate(range(min = 0, max = 2))]
    pub(crate) attemptsmode: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, max = 1))]
    pub(crate) detailed: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5000))]
    pub(crate) pagesize: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub(crate) page: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) dir: Option<String>,
    #[serde(default)]
    pub(crate) tifirst: Option<String>,
    #[serde(default)]
    pub(crate) tilast: Option<String>,
    #[serde(default)]
    pub(crate) group: Option<String>,
    #[serde(default)]
    pub(crate) download: Option<String>,
}

/// Fields of the delete form, read from repeated `attemptid[]` pairs.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DeleteForm {
    pub(crate) action: Option<String>,
    pub(crate) sesskey: String,
    pub(crate) attempt_ids: Vec<String>,
}

impl DeleteForm {
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (name, value) in pairs {
            match name.as_str() {
                "action" => form.action = Some(value),
                "sesskey" => form.sesskey = value,
                "attemptid[]" | "attemptid" => form.attempt_ids.push(value),
                _ => {}
            }
        }
        form
    }

    pub(crate) fn is_delete(&self) -> bool {
        self.action.as_deref() == Some("delete")
    }

    /// Parsed attempt references; malformed ids are dropped.
    pub(crate) fn attempts(&self) -> Vec<AttemptRef> {
        let mut attempts: Vec<AttemptRef> =
            self.attempt_ids.iter().filter_map(|raw| raw.parse().ok()).collect();
        attempts.dedup();
        attempts
    }
}
