use rust_i18n::t;
use time::UtcOffset;

use crate::core::time::{format_user_date, DateStyle};
use crate::db::models::{Activity, StudentAttemptRow};
use crate::repositories::ReportStore;
use crate::services::grading;
use crate::services::report::columns::{Column, ColumnKind};
use crate::services::report::links::ReportLinks;
use crate::services::report::OutputMode;
use crate::services::tracks::{self, format_score, ObjectTrack, STATUS_NOT_ATTEMPTED};

/// Placeholder shown where a student has no attempt data.
pub(crate) const NO_VALUE: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Link {
        text: String,
        href: String,
        title: Option<String>,
    },
    Checkbox {
        value: String,
        label: String,
    },
    Picture {
        src: Option<String>,
        alt: String,
        initials: String,
        href: String,
    },
    Status {
        status: String,
        label: String,
        /// Score text linked to the track details, when tracks exist.
        detail: Option<(String, String)>,
    },
}

impl Cell {
    /// Text used by downloads and by duplicate suppression.
    pub(crate) fn plain_text(&self) -> String {
        match self {
            Cell::Empty | Cell::Checkbox { .. } => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => format_score(*value),
            Cell::Link { text, .. } => text.clone(),
            Cell::Picture { alt, .. } => alt.clone(),
            Cell::Status { label, detail, .. } => match detail {
                Some((text, _)) => text.clone(),
                None => label.clone(),
            },
        }
    }
}

pub(crate) fn status_label(status: &str) -> String {
    match status {
        "passed" => t!("status.passed").to_string(),
        "completed" => t!("status.completed").to_string(),
        "failed" => t!("status.failed").to_string(),
        "incomplete" => t!("status.incomplete").to_string(),
        "browsed" => t!("status.browsed").to_string(),
        STATUS_NOT_ATTEMPTED => t!("status.notattempted").to_string(),
        other => other.to_string(),
    }
}

/// Turns fetched student rows into cells for one output.
pub(crate) struct RowBuilder<'a> {
    pub(crate) activity: &'a Activity,
    pub(crate) course_id: &'a str,
    pub(crate) columns: &'a [Column],
    pub(crate) output: OutputMode,
    pub(crate) offset: UtcOffset,
    pub(crate) links: &'a ReportLinks,
}

impl RowBuilder<'_> {
    pub(crate) async fn build(
        &self,
        store: &dyn ReportStore,
        row: &StudentAttemptRow,
    ) -> Result<Vec<Cell>, sqlx::Error> {
        let tracks = match row.attempt {
            Some(attempt) => {
                store.list_attempt_tracks(&self.activity.id, &row.user_id, attempt).await?
            }
            None => Vec::new(),
        };
        let runtime = tracks::attempt_runtime(&tracks);
        let objects = tracks::aggregate_by_object(&tracks);
        let attempt = row.attempt.filter(|_| runtime.is_some());

        let html = self.output == OutputMode::Html;
        let date_style = match self.output {
            OutputMode::Ods | OutputMode::Xls => DateStyle::DateTime,
            OutputMode::Html | OutputMode::Csv => DateStyle::DayDateTime,
        };

        let cells = self
            .columns
            .iter()
            .map(|column| match &column.kind {
                ColumnKind::Checkbox => match attempt {
                    Some(attempt) => Cell::Checkbox {
                        value: format!("{}:{attempt}", row.user_id),
                        label: t!(
                            "report.select_attempt",
                            attempt = attempt,
                            name = row.fullname()
                        )
                        .to_string(),
                    },
                    None => Cell::Empty,
                },
                ColumnKind::Picture => Cell::Picture {
                    src: row.picture_url.clone(),
                    alt: t!("report.picture_of", name = row.fullname()).to_string(),
                    initials: initials(row),
                    href: self.links.profile(&row.user_id, self.course_id),
                },
                ColumnKind::Fullname if html => Cell::Link {
                    text: row.fullname(),
                    href: self.links.profile(&row.user_id, self.course_id),
                    title: None,
                },
                ColumnKind::Fullname => Cell::Text(row.fullname()),
                ColumnKind::Identity(field) => Cell::Text(row.identity_value(*field).to_string()),
                ColumnKind::Attempt => match attempt {
                    Some(attempt) if html => Cell::Link {
                        text: attempt.to_string(),
                        href: self.links.attempt(&self.activity.id, &row.user_id, attempt),
                        title: None,
                    },
                    Some(attempt) => Cell::Number(f64::from(attempt)),
                    None => Cell::Text(NO_VALUE.to_string()),
                },
                ColumnKind::Start => match runtime {
                    Some(runtime) => {
                        Cell::Text(format_user_date(runtime.start, self.offset, date_style))
                    }
                    None => Cell::Text(NO_VALUE.to_string()),
                },
                ColumnKind::Finish => match runtime {
                    Some(runtime) => {
                        Cell::Text(format_user_date(runtime.finish, self.offset, date_style))
                    }
                    None => Cell::Text(NO_VALUE.to_string()),
                },
                ColumnKind::Score => match runtime {
                    Some(_) => {
                        Cell::Number(grading::grade_attempt(self.activity.grade_method, &objects))
                    }
                    None => Cell::Text(NO_VALUE.to_string()),
                },
                ColumnKind::Object(object_id) => {
                    self.object_cell(row, attempt, object_id, objects.get(object_id), html)
                }
            })
            .collect();

        Ok(cells)
    }

    fn object_cell(
        &self,
        row: &StudentAttemptRow,
        attempt: Option<i32>,
        object_id: &str,
        track: Option<&ObjectTrack>,
        html: bool,
    ) -> Cell {
        let (Some(track), Some(attempt)) = (track, attempt) else {
            let label = status_label(STATUS_NOT_ATTEMPTED);
            return if html {
                Cell::Status { status: STATUS_NOT_ATTEMPTED.to_string(), label, detail: None }
            } else {
                Cell::Text(label)
            };
        };

        let label = status_label(&track.status);
        let text = match track.score_raw {
            Some(raw) => {
                let max_key = self.activity.version.max_score_element();
                match track.element(max_key) {
                    Some(max) => format!("{}/{}", format_score(raw), max.trim()),
                    None => format_score(raw),
                }
            }
            None => label.clone(),
        };

        if html {
            let href = self.links.object(&self.activity.id, &row.user_id, attempt, object_id);
            Cell::Status { status: track.status.clone(), label, detail: Some((text, href)) }
        } else {
            Cell::Text(text)
        }
    }
}

fn initials(row: &StudentAttemptRow) -> String {
    row.firstname
        .chars()
        .next()
        .into_iter()
        .chain(row.lastname.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
