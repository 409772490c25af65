use std::fmt;
use std::str::FromStr;

use sqlx::PgPool;

use crate::db::models::TrackRecord;

/// Addresses one attempt of one student, written `user_id:attempt` in forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct AttemptRef {
    pub(crate) user_id: String,
    pub(crate) attempt: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvalidAttemptRef(pub(crate) String);

impl FromStr for AttemptRef {
    type Err = InvalidAttemptRef;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidAttemptRef(value.to_string());
        let (user_id, attempt) = value.trim().rsplit_once(':').ok_or_else(invalid)?;
        let attempt = attempt.parse::<i32>().map_err(|_| invalid())?;

        if user_id.is_empty() || attempt < 1 {
            return Err(invalid());
        }

        Ok(Self { user_id: user_id.to_string(), attempt })
    }
}

impl fmt::Display for AttemptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.attempt)
    }
}

pub(crate) async fn list_tracks(
    pool: &PgPool,
    activity_id: &str,
    user_id: &str,
    attempt: i32,
) -> Result<Vec<TrackRecord>, sqlx::Error> {
    sqlx::query_as::<_, TrackRecord>(
        "SELECT t.object_id, t.element, t.value, t.time_modified
         FROM tracks t
         JOIN attempts a ON a.id = t.attempt_id
         WHERE a.activity_id = $1 AND a.user_id = $2 AND a.attempt = $3
         ORDER BY t.time_modified ASC, t.id ASC",
    )
    .bind(activity_id)
    .bind(user_id)
    .bind(attempt)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_many(
    pool: &PgPool,
    activity_id: &str,
    attempts: &[AttemptRef],
) -> Result<u64, sqlx::Error> {
    if attempts.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut deleted = 0;

    for attempt in attempts {
        let result = sqlx::query(
            "DELETE FROM attempts
             WHERE activity_id = $1 AND user_id = $2 AND attempt = $3",
        )
        .bind(activity_id)
        .bind(&attempt.user_id)
        .bind(attempt.attempt)
        .execute(&mut *tx)
        .await?;
        deleted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(deleted)
}
