use sqlx::PgPool;

use crate::db::models::{Course, CourseGroup};
use crate::db::types::{CourseRole, EnrolmentStatus};

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, shortname, fullname, created_at FROM courses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_active_roles(
    pool: &PgPool,
    course_id: &str,
    user_id: &str,
) -> Result<Vec<CourseRole>, sqlx::Error> {
    sqlx::query_scalar::<_, CourseRole>(
        "SELECT role
         FROM course_enrolments
         WHERE course_id = $1 AND user_id = $2 AND status = $3
         ORDER BY role",
    )
    .bind(course_id)
    .bind(user_id)
    .bind(EnrolmentStatus::Active)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_groups(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<CourseGroup>, sqlx::Error> {
    sqlx::query_as::<_, CourseGroup>(
        "SELECT id, course_id, name
         FROM course_groups
         WHERE course_id = $1
         ORDER BY name, id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn has_active_students(
    pool: &PgPool,
    course_id: &str,
    group_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1
             FROM course_enrolments e
             WHERE e.course_id = $1
               AND e.role = $2
               AND e.status = $3
               AND ($4::text IS NULL OR e.user_id IN (
                   SELECT gm.user_id FROM course_group_members gm WHERE gm.group_id = $4
               ))
         )",
    )
    .bind(course_id)
    .bind(CourseRole::Student)
    .bind(EnrolmentStatus::Active)
    .bind(group_id)
    .fetch_one(pool)
    .await
}
