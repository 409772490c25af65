use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{RowCounts, StudentAttemptRow};
use crate::db::types::{DisplayMode, IdentityField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortField {
    Firstname,
    Lastname,
    Identity(IdentityField),
    Attempt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filter and ordering shared by the count and the row fetch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowQuery {
    pub(crate) activity_id: String,
    pub(crate) course_id: String,
    pub(crate) group_id: Option<String>,
    pub(crate) mode: DisplayMode,
    pub(crate) first_initial: Option<char>,
    pub(crate) last_initial: Option<char>,
    pub(crate) sort: Vec<(SortField, SortDirection)>,
}

impl RowQuery {
    pub(crate) fn new(activity_id: &str, course_id: &str, mode: DisplayMode) -> Self {
        Self {
            activity_id: activity_id.to_string(),
            course_id: course_id.to_string(),
            group_id: None,
            mode,
            first_initial: None,
            last_initial: None,
            sort: Vec::new(),
        }
    }

    /// Same filter without the initials bar restriction.
    pub(crate) fn without_initials(&self) -> Self {
        Self { first_initial: None, last_initial: None, ..self.clone() }
    }

    pub(crate) fn has_initials(&self) -> bool {
        self.first_initial.is_some() || self.last_initial.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) offset: i64,
    pub(crate) limit: i64,
}

pub(crate) async fn count(pool: &PgPool, query: &RowQuery) -> Result<RowCounts, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(DISTINCT u.id || '#' || COALESCE(sa.attempt, 0)::text) AS nbresults,
                COUNT(DISTINCT u.id || '#' || sa.attempt::text) AS nbattempts,
                COUNT(DISTINCT u.id) AS nbusers",
    );
    push_from_where(&mut builder, query);

    builder.build_query_as::<RowCounts>().fetch_one(pool).await
}

pub(crate) async fn fetch(
    pool: &PgPool,
    query: &RowQuery,
    window: Option<PageWindow>,
) -> Result<Vec<StudentAttemptRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT DISTINCT u.id AS user_id,
                u.firstname,
                u.lastname,
                u.email,
                u.idnumber,
                u.username,
                u.institution,
                u.department,
                u.picture_url,
                sa.attempt",
    );
    push_from_where(&mut builder, query);

    builder.push(" ORDER BY ");
    for (field, direction) in &query.sort {
        builder.push(sort_expression(*field));
        builder.push(" ");
        builder.push(direction.sql());
        builder.push(", ");
    }
    builder.push("u.id ASC, sa.attempt ASC NULLS FIRST");

    if let Some(window) = window {
        builder.push(" OFFSET ");
        builder.push_bind(window.offset.max(0));
        builder.push(" LIMIT ");
        builder.push_bind(window.limit.max(1));
    }

    builder.build_query_as::<StudentAttemptRow>().fetch_all(pool).await
}

fn push_from_where(builder: &mut QueryBuilder<'_, Postgres>, query: &RowQuery) {
    builder.push(
        " FROM users u
         LEFT JOIN attempts sa ON sa.user_id = u.id AND sa.activity_id = ",
    );
    builder.push_bind(query.activity_id.clone());

    builder.push(
        " WHERE u.id IN (
             SELECT e.user_id
             FROM course_enrolments e
             WHERE e.role = 'student' AND e.status = 'active' AND e.course_id = ",
    );
    builder.push_bind(query.course_id.clone());
    if let Some(group_id) = &query.group_id {
        builder.push(
            " AND e.user_id IN (
                 SELECT gm.user_id FROM course_group_members gm WHERE gm.group_id = ",
        );
        builder.push_bind(group_id.clone());
        builder.push(")");
    }
    builder.push(")");

    match query.mode {
        DisplayMode::AllStudents => {}
        DisplayMode::StudentsWithAttempts => {
            builder.push(" AND sa.user_id IS NOT NULL");
        }
        DisplayMode::StudentsWithoutAttempts => {
            builder.push(" AND sa.user_id IS NULL");
        }
    }

    if let Some(initial) = query.first_initial {
        builder.push(" AND u.firstname ILIKE ");
        builder.push_bind(format!("{initial}%"));
    }
    if let Some(initial) = query.last_initial {
        builder.push(" AND u.lastname ILIKE ");
        builder.push_bind(format!("{initial}%"));
    }
}

fn sort_expression(field: SortField) -> &'static str {
    match field {
        SortField::Firstname => "u.firstname",
        SortField::Lastname => "u.lastname",
        SortField::Identity(field) => field.sql_column(),
        SortField::Attempt => "sa.attempt",
    }
}
