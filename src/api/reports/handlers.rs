use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_capability, Capability, CurrentUser};
use crate::core::state::AppState;
use crate::db::models::User;
use crate::db::types::DisplayMode;
use crate::schemas::report::{DeleteForm, ReportQuery};
use crate::services::report::table::parse_initial;
use crate::services::report::{
    DeleteRequest, OutputMode, RenderedReport, ReportContext, ReportRenderer, ReportRequest,
};

pub(super) async fn view_report(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let request = report_request(query)?;
    render(&state, &user, &activity_id, request).await
}

pub(super) async fn submit_report(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    Query(query): Query<ReportQuery>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let mut request = report_request(query)?;

    let form = DeleteForm::from_pairs(pairs);
    if form.is_delete() {
        request.delete =
            Some(DeleteRequest { attempts: form.attempts(), sesskey: form.sesskey });
    }

    render(&state, &user, &activity_id, request).await
}

fn report_request(query: ReportQuery) -> Result<ReportRequest, ApiError> {
    query.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let output = OutputMode::parse(query.download.as_deref()).ok_or_else(|| {
        ApiError::BadRequest("download must be one of csv, ods or excel".to_string())
    })?;
    let mode = query
        .attemptsmode
        .and_then(DisplayMode::from_code)
        .unwrap_or_default();

    Ok(ReportRequest {
        mode,
        output: Some(output),
        detailed: query.detailed.map(|value| value == 1),
        page_size: query.pagesize,
        page: query.page.unwrap_or(0),
        sort_key: query.sort,
        sort_dir: query.dir,
        first_initial: parse_initial(query.tifirst.as_deref()),
        last_initial: parse_initial(query.tilast.as_deref()),
        group_id: query.group,
        delete: None,
    })
}

async fn render(
    state: &AppState,
    user: &User,
    activity_id: &str,
    request: ReportRequest,
) -> Result<Response, ApiError> {
    let activity = state
        .store()
        .find_activity(activity_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch activity"))?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;
    let course = state
        .store()
        .find_course(&activity.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let access = require_capability(state, user, &course.id, Capability::ViewReports).await?;

    let renderer = ReportRenderer::new(
        state.store(),
        ReportContext {
            viewer: user,
            course: &course,
            activity: &activity,
            can_delete: access.has(Capability::DeleteResponses),
            settings: state.settings(),
        },
    );

    match renderer.render(request).await? {
        RenderedReport::Page(page) => Ok(Html(page).into_response()),
        RenderedReport::File { filename, content_type, bytes } => Ok((
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
            ],
            bytes,
        )
            .into_response()),
    }
}
