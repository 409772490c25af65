//! Attempt report: resolves filters, builds columns and rows, and hands them
//! to the on-screen table or a download sink.

pub(crate) mod columns;
mod html;
pub(crate) mod links;
pub(crate) mod rows;
pub(crate) mod sink;
pub(crate) mod table;

use rust_i18n::t;
use thiserror::Error;

use crate::core::config::Settings;
use crate::core::{metrics, security, time::user_offset};
use crate::db::models::{Activity, Course, CourseGroup, ReportPreferences, StudentAttemptRow, User};
use crate::db::types::{DisplayMode, GroupMode};
use crate::repositories::{AttemptRef, ReportStore, RowQuery};

use self::columns::{build_columns, Column, ColumnOptions};
use self::html::{PageView, TableView};
use self::links::ReportLinks;
use self::rows::{Cell, RowBuilder};
use self::sink::{download_filename, DownloadSink, ExportError, HtmlTableSink, TabularSink};
use self::table::{effective_page_size, Pagination, SortSpec, TableState, INITIALS_BAR_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    Html,
    Csv,
    Ods,
    Xls,
}

impl OutputMode {
    /// Reads the `download` parameter; `None` for unknown formats.
    pub(crate) fn parse(value: Option<&str>) -> Option<Self> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            Some(Self::Html)
        } else if value.eq_ignore_ascii_case("csv") {
            Some(Self::Csv)
        } else if value.eq_ignore_ascii_case("ods") {
            Some(Self::Ods)
        } else if value.eq_ignore_ascii_case("excel") {
            Some(Self::Xls)
        } else {
            None
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Ods => "ods",
            Self::Xls => "xlsx",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "txt",
            Self::Ods => "ods",
            Self::Xls => "xlsx",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Csv => "text/tab-separated-values; charset=utf-8",
            Self::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            Self::Xls => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeleteRequest {
    pub(crate) sesskey: String,
    pub(crate) attempts: Vec<AttemptRef>,
}

/// Filters and widget state for one report request.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReportRequest {
    pub(crate) mode: DisplayMode,
    pub(crate) output: Option<OutputMode>,
    pub(crate) detailed: Option<bool>,
    pub(crate) page_size: Option<i32>,
    pub(crate) page: i64,
    pub(crate) sort_key: Option<String>,
    pub(crate) sort_dir: Option<String>,
    pub(crate) first_initial: Option<char>,
    pub(crate) last_initial: Option<char>,
    pub(crate) group_id: Option<String>,
    pub(crate) delete: Option<DeleteRequest>,
}

impl ReportRequest {
    fn output(&self) -> OutputMode {
        self.output.unwrap_or(OutputMode::Html)
    }
}

/// Who is looking at which activity, with what rights.
pub(crate) struct ReportContext<'a> {
    pub(crate) viewer: &'a User,
    pub(crate) course: &'a Course,
    pub(crate) activity: &'a Activity,
    pub(crate) can_delete: bool,
    pub(crate) settings: &'a Settings,
}

#[derive(Debug)]
pub(crate) enum RenderedReport {
    Page(String),
    File { filename: String, content_type: &'static str, bytes: Vec<u8> },
}

#[derive(Debug, Error)]
pub(crate) enum ReportError {
    #[error("report storage failure: {0}")]
    Store(#[from] sqlx::Error),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("{0} not found")]
    NotFound(&'static str),
}

pub(crate) struct ReportRenderer<'a> {
    store: &'a dyn ReportStore,
    context: ReportContext<'a>,
}

impl<'a> ReportRenderer<'a> {
    pub(crate) fn new(store: &'a dyn ReportStore, context: ReportContext<'a>) -> Self {
        Self { store, context }
    }

    pub(crate) fn report_url(&self) -> String {
        format!(
            "{}/activities/{}/report",
            self.context.settings.api().api_v1_str,
            self.context.activity.id
        )
    }

    pub(crate) async fn render(&self, request: ReportRequest) -> Result<RenderedReport, ReportError> {
        let output = request.output();
        let mut notices = Vec::new();

        if let Some(delete) = &request.delete {
            if self.delete_attempts(delete).await? {
                notices.push(t!("report.responses_deleted").to_string());
            }
        }

        let preferences = self.resolve_preferences(&request).await?;
        let groups = self.resolve_groups(request.group_id.as_deref()).await?;
        let group_id = groups.as_ref().and_then(|(_, selected)| selected.clone());

        // Rows without attempts have nothing to delete.
        let can_delete =
            self.context.can_delete && request.mode != DisplayMode::StudentsWithoutAttempts;

        let report_settings = self.context.settings.report();
        let objects = if preferences.detailed {
            self.store.list_objects(&self.context.activity.id).await?
        } else {
            Vec::new()
        };
        let columns = build_columns(
            ColumnOptions {
                html: output == OutputMode::Html,
                can_delete,
                show_user_image: report_settings.show_user_image,
                identity_fields: &report_settings.identity_fields,
                detailed: preferences.detailed,
            },
            &objects,
        );

        let sort = SortSpec::parse(
            request.sort_key.as_deref(),
            request.sort_dir.as_deref(),
            &report_settings.identity_fields,
        );
        let state = TableState {
            mode: request.mode,
            group_id: group_id.clone(),
            sort,
            first_initial: request.first_initial,
            last_initial: request.last_initial,
            page: request.page.max(0),
        };

        let has_students =
            self.store.has_eligible_students(&self.context.course.id, group_id.as_deref()).await?;
        if !has_students {
            notices.push(if group_id.is_some() {
                t!("report.no_students_in_group").to_string()
            } else {
                t!("report.no_students_yet").to_string()
            });
        }

        let mut query =
            RowQuery::new(&self.context.activity.id, &self.context.course.id, request.mode);
        query.group_id = group_id;

        let links = ReportLinks::new(&report_settings.link_base_url);
        let builder = RowBuilder {
            activity: self.context.activity,
            course_id: &self.context.course.id,
            columns: &columns,
            output,
            offset: user_offset(self.context.viewer.timezone_offset_minutes),
            links: &links,
        };

        let Some(download) = DownloadSink::for_output(output, &t!("report.sheet_title")) else {
            query.first_initial = state.first_initial;
            query.last_initial = state.last_initial;
            query.sort = state.sort.as_ref().map(SortSpec::fields).unwrap_or_default();

            let table = if has_students {
                Some(
                    self.render_table(&query, &state, &columns, &builder, &preferences, can_delete)
                        .await?,
                )
            } else {
                None
            };
            let rendered_rows = table.as_ref().map_or(0, |table| table.rows);

            let page = PageView {
                title: &self.context.activity.name,
                notices: &notices,
                state: &state,
                base_url: &self.report_url(),
                groups: groups.as_ref().map(|(groups, _)| groups.as_slice()),
                table,
                detailed: preferences.detailed,
                page_size: effective_page_size(
                    preferences.page_size,
                    report_settings.default_page_size,
                ),
            }
            .render();

            metrics::record_report_render(output.label(), rendered_rows);
            return Ok(RenderedReport::Page(page));
        };

        let rows = if has_students {
            self.store.fetch_rows(&query, None).await?
        } else {
            tracing::info!(
                activity_id = %self.context.activity.id,
                group_id = query.group_id.as_deref().unwrap_or("-"),
                output = output.label(),
                "No eligible students; download carries headers only"
            );
            Vec::new()
        };
        let bytes = self.write_download(download, &columns, &builder, &rows).await?;

        metrics::record_report_render(output.label(), rows.len());
        tracing::info!(
            activity_id = %self.context.activity.id,
            output = output.label(),
            rows = rows.len(),
            "Report downloaded"
        );

        Ok(RenderedReport::File {
            filename: download_filename(
                &self.context.course.shortname,
                &self.context.activity.name,
                output.extension(),
            ),
            content_type: output.content_type(),
            bytes,
        })
    }

    /// Deletes when the viewer may and the session key matches; otherwise skips quietly.
    async fn delete_attempts(&self, delete: &DeleteRequest) -> Result<bool, ReportError> {
        let viewer = self.context.viewer;
        if !self.context.can_delete
            || !security::confirm_session_key(&delete.sesskey, &viewer.id, self.context.settings)
        {
            tracing::debug!(user_id = %viewer.id, "Skipping attempt deletion without permission");
            return Ok(false);
        }

        let deleted =
            self.store.delete_attempts(&self.context.activity.id, &delete.attempts).await?;
        metrics::record_attempts_deleted(deleted);
        tracing::info!(
            user_id = %viewer.id,
            activity_id = %self.context.activity.id,
            requested = delete.attempts.len(),
            deleted,
            "Attempts deleted from report"
        );
        Ok(true)
    }

    /// Stored preferences, overridden and saved when the request carries new values.
    async fn resolve_preferences(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportPreferences, ReportError> {
        let viewer_id = &self.context.viewer.id;
        let mut preferences = self.store.load_preferences(viewer_id).await?.unwrap_or_default();

        if request.detailed.is_some() || request.page_size.is_some() {
            if let Some(detailed) = request.detailed {
                preferences.detailed = detailed;
            }
            if let Some(page_size) = request.page_size {
                preferences.page_size = page_size;
            }
            self.store.save_preferences(viewer_id, preferences).await?;
        }

        Ok(preferences)
    }

    /// Groups shown in the selector plus the validated selection, or `None`
    /// when the activity does not use groups.
    async fn resolve_groups(
        &self,
        requested: Option<&str>,
    ) -> Result<Option<(Vec<CourseGroup>, Option<String>)>, ReportError> {
        if self.context.activity.group_mode == GroupMode::NoGroups {
            return Ok(None);
        }

        let groups = self.store.list_groups(&self.context.course.id).await?;
        let selected = match requested.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if groups.iter().any(|group| group.id == id) => Some(id.to_string()),
            Some(_) => return Err(ReportError::NotFound("Group")),
            None => None,
        };
        Ok(Some((groups, selected)))
    }

    async fn render_table(
        &self,
        query: &RowQuery,
        state: &TableState,
        columns: &[Column],
        builder: &RowBuilder<'_>,
        preferences: &ReportPreferences,
        can_delete: bool,
    ) -> Result<TableView, ReportError> {
        let counts = self.store.count_rows(query).await?;
        let unfiltered_total = if query.has_initials() {
            self.store.count_rows(&query.without_initials()).await?.nbresults
        } else {
            counts.nbresults
        };

        let page_size = effective_page_size(
            preferences.page_size,
            self.context.settings.report().default_page_size,
        );
        let pagination = Pagination::new(state.page, page_size, counts.nbresults);
        let rows = self.store.fetch_rows(query, Some(pagination.window())).await?;

        let base_url = self.report_url();
        let state = state.with_page(pagination.page);
        let mut sink =
            HtmlTableSink::new(&state, &base_url, &self.context.settings.report().pix_url);
        sink.write_header(columns)?;
        for row in &rows {
            let cells = builder.build(self.store, row).await?;
            sink.write_row(&cells)?;
        }

        Ok(TableView {
            counts,
            pagination,
            initials_bar: unfiltered_total > INITIALS_BAR_THRESHOLD,
            can_delete,
            sesskey: security::session_key(&self.context.viewer.id, self.context.settings),
            rows: rows.len(),
            markup: sink.finish()?,
        })
    }

    async fn write_download(
        &self,
        mut sink: DownloadSink,
        columns: &[Column],
        builder: &RowBuilder<'_>,
        rows: &[StudentAttemptRow],
    ) -> Result<Vec<u8>, ReportError> {
        sink.write_header(columns)?;
        for row in rows {
            let cells: Vec<Cell> = builder.build(self.store, row).await?;
            sink.write_row(&cells)?;
        }
        Ok(sink.finish()?)
    }
}
