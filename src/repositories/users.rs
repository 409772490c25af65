use sqlx::PgPool;

use crate::db::models::User;

const COLUMNS: &str = "\
    id, username, firstname, lastname, email, idnumber, institution, department, \
    picture_url, timezone_offset_minutes, is_active, is_platform_admin, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
