use sqlx::PgPool;

use crate::db::models::{Activity, ActivityObject};

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Activity>, sqlx::Error> {
    sqlx::query_as::<_, Activity>(
        "SELECT id, course_id, name, version, grade_method, group_mode, created_at
         FROM activities
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_objects(
    pool: &PgPool,
    activity_id: &str,
) -> Result<Vec<ActivityObject>, sqlx::Error> {
    sqlx::query_as::<_, ActivityObject>(
        "SELECT id, activity_id, title, launch, sort_order
         FROM activity_objects
         WHERE activity_id = $1
         ORDER BY sort_order, id",
    )
    .bind(activity_id)
    .fetch_all(pool)
    .await
}
