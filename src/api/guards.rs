use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::User;
use crate::db::types::CourseRole;

pub(crate) struct CurrentUser(pub(crate) User);

/// Course-level permissions the report checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capability {
    ViewReports,
    DeleteResponses,
}

impl Capability {
    fn granted_to(self, role: CourseRole) -> bool {
        match self {
            Capability::ViewReports => matches!(role, CourseRole::Teacher | CourseRole::Assistant),
            Capability::DeleteResponses => role == CourseRole::Teacher,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CourseAccess {
    pub(crate) roles: Vec<CourseRole>,
    pub(crate) platform_admin: bool,
}

impl CourseAccess {
    pub(crate) fn has(&self, capability: Capability) -> bool {
        self.platform_admin || self.roles.iter().any(|role| capability.granted_to(*role))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let user = app_state
            .store()
            .find_user(&claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        if !user.is_active {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        Ok(CurrentUser(user))
    }
}

pub(crate) async fn course_access(
    state: &AppState,
    user: &User,
    course_id: &str,
) -> Result<CourseAccess, ApiError> {
    let roles = state
        .store()
        .list_course_roles(course_id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course roles"))?;

    Ok(CourseAccess { roles, platform_admin: user.is_platform_admin })
}

pub(crate) async fn require_capability(
    state: &AppState,
    user: &User,
    course_id: &str,
    capability: Capability,
) -> Result<CourseAccess, ApiError> {
    let access = course_access(state, user, course_id).await?;

    if access.has(capability) {
        Ok(access)
    } else {
        Err(ApiError::Forbidden("Not enough permissions for this course"))
    }
}
