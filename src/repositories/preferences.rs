use sqlx::PgPool;

use crate::core::time::primitive_now_utc;
use crate::db::models::ReportPreferences;

pub(crate) async fn find_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<ReportPreferences>, sqlx::Error> {
    sqlx::query_as::<_, ReportPreferences>(
        "SELECT detailed, page_size FROM report_preferences WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn upsert(
    pool: &PgPool,
    user_id: &str,
    preferences: ReportPreferences,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO report_preferences (user_id, detailed, page_size, updated_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id) DO UPDATE
         SET detailed = EXCLUDED.detailed,
             page_size = EXCLUDED.page_size,
             updated_at = EXCLUDED.updated_at",
    )
    .bind(user_id)
    .bind(preferences.detailed)
    .bind(preferences.page_size)
    .bind(primitive_now_utc())
    .execute(pool)
    .await?;
    Ok(())
}
