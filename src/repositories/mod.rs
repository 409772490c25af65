pub(crate) mod activities;
pub(crate) mod attempts;
pub(crate) mod courses;
pub(crate) mod preferences;
pub(crate) mod report_rows;
pub(crate) mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::{
    Activity, ActivityObject, Course, CourseGroup, ReportPreferences, RowCounts,
    StudentAttemptRow, TrackRecord, User,
};
use crate::db::types::CourseRole;

pub(crate) use attempts::AttemptRef;
pub(crate) use report_rows::{PageWindow, RowQuery, SortDirection, SortField};

/// Everything the report reads from or writes to persistent storage.
///
/// Postgres backs it in production; tests swap in an in-memory store.
#[async_trait]
pub(crate) trait ReportStore: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, sqlx::Error>;

    /// Roles of an active enrolment; empty when not enrolled.
    async fn list_course_roles(
        &self,
        course_id: &str,
        user_id: &str,
    ) -> Result<Vec<CourseRole>, sqlx::Error>;

    async fn find_course(&self, course_id: &str) -> Result<Option<Course>, sqlx::Error>;

    async fn list_groups(&self, course_id: &str) -> Result<Vec<CourseGroup>, sqlx::Error>;

    /// Whether any active student (optionally within a group) may record attempts.
    async fn has_eligible_students(
        &self,
        course_id: &str,
        group_id: Option<&str>,
    ) -> Result<bool, sqlx::Error>;

    async fn find_activity(&self, activity_id: &str) -> Result<Option<Activity>, sqlx::Error>;

    /// Objects ordered by sort order, then id.
    async fn list_objects(&self, activity_id: &str) -> Result<Vec<ActivityObject>, sqlx::Error>;

    async fn count_rows(&self, query: &RowQuery) -> Result<RowCounts, sqlx::Error>;

    /// Report rows; `None` fetches every match.
    async fn fetch_rows(
        &self,
        query: &RowQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<StudentAttemptRow>, sqlx::Error>;

    /// Track records of one attempt, oldest first.
    async fn list_attempt_tracks(
        &self,
        activity_id: &str,
        user_id: &str,
        attempt: i32,
    ) -> Result<Vec<TrackRecord>, sqlx::Error>;

    /// Removes the addressed attempts with their tracks; returns how many went.
    async fn delete_attempts(
        &self,
        activity_id: &str,
        attempts: &[AttemptRef],
    ) -> Result<u64, sqlx::Error>;

    async fn load_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<ReportPreferences>, sqlx::Error>;

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: ReportPreferences,
    ) -> Result<(), sqlx::Error>;
}

pub(crate) struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>, sqlx::Error> {
        users::find_by_id(&self.pool, user_id).await
    }

    async fn list_course_roles(
        &self,
        course_id: &str,
        user_id: &str,
    ) -> Result<Vec<CourseRole>, sqlx::Error> {
        courses::list_active_roles(&self.pool, course_id, user_id).await
    }

    async fn find_course(&self, course_id: &str) -> Result<Option<Course>, sqlx::Error> {
        courses::find_by_id(&self.pool, course_id).await
    }

    async fn list_groups(&self, course_id: &str) -> Result<Vec<CourseGroup>, sqlx::Error> {
        courses::list_groups(&self.pool, course_id).await
    }

    async fn has_eligible_students(
        &self,
        course_id: &str,
        group_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        courses::has_active_students(&self.pool, course_id, group_id).await
    }

    async fn find_activity(&self, activity_id: &str) -> Result<Option<Activity>, sqlx::Error> {
        activities::find_by_id(&self.pool, activity_id).await
    }

    async fn list_objects(&self, activity_id: &str) -> Result<Vec<ActivityObject>, sqlx::Error> {
        activities::list_objects(&self.pool, activity_id).await
    }

    async fn count_rows(&self, query: &RowQuery) -> Result<RowCounts, sqlx::Error> {
        report_rows::count(&self.pool, query).await
    }

    async fn fetch_rows(
        &self,
        query: &RowQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<StudentAttemptRow>, sqlx::Error> {
        report_rows::fetch(&self.pool, query, window).await
    }

    async fn list_attempt_tracks(
        &self,
        activity_id: &str,
        user_id: &str,
        attempt: i32,
    ) -> Result<Vec<TrackRecord>, sqlx::Error> {
        attempts::list_tracks(&self.pool, activity_id, user_id, attempt).await
    }

    async fn delete_attempts(
        &self,
        activity_id: &str,
        attempts: &[AttemptRef],
    ) -> Result<u64, sqlx::Error> {
        attempts::delete_many(&self.pool, activity_id, attempts).await
    }

    async fn load_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<ReportPreferences>, sqlx::Error> {
        preferences::find_for_user(&self.pool, user_id).await
    }

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: ReportPreferences,
    ) -> Result<(), sqlx::Error> {
        preferences::upsert(&self.pool, user_id, preferences).await
    }
}
