use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{GradeMethod, GroupMode, IdentityField, PackageVersion};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) firstname: String,
    pub(crate) lastname: String,
    pub(crate) email: String,
    pub(crate) idnumber: String,
    pub(crate) institution: String,
    pub(crate) department: String,
    pub(crate) picture_url: Option<String>,
    pub(crate) timezone_offset_minutes: i32,
    pub(crate) is_active: bool,
    pub(crate) is_platform_admin: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) shortname: String,
    pub(crate) fullname: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseGroup {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) name: String,
}

/// A tracked learning package placed in a course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Activity {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) name: String,
    pub(crate) version: PackageVersion,
    pub(crate) grade_method: GradeMethod,
    pub(crate) group_mode: GroupMode,
    pub(crate) created_at: PrimitiveDateTime,
}

/// One learning object inside a package.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ActivityObject {
    pub(crate) id: String,
    pub(crate) activity_id: String,
    pub(crate) title: String,
    pub(crate) launch: String,
    pub(crate) sort_order: i32,
}

impl ActivityObject {
    pub(crate) fn is_launchable(&self) -> bool {
        !self.launch.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct TrackRecord {
    pub(crate) object_id: String,
    pub(crate) element: String,
    pub(crate) value: String,
    pub(crate) time_modified: PrimitiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub(crate) struct ReportPreferences {
    pub(crate) detailed: bool,
    pub(crate) page_size: i32,
}

impl Default for ReportPreferences {
    fn default() -> Self {
        Self { detailed: false, page_size: 0 }
    }
}

/// An eligible student left-joined to at most one of their attempts.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub(crate) struct StudentAttemptRow {
    pub(crate) user_id: String,
    pub(crate) firstname: String,
    pub(crate) lastname: String,
    pub(crate) email: String,
    pub(crate) idnumber: String,
    pub(crate) username: String,
    pub(crate) institution: String,
    pub(crate) department: String,
    pub(crate) picture_url: Option<String>,
    pub(crate) attempt: Option<i32>,
}

impl StudentAttemptRow {
    pub(crate) fn fullname(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }

    pub(crate) fn identity_value(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::Email => &self.email,
            IdentityField::IdNumber => &self.idnumber,
            IdentityField::Username => &self.username,
            IdentityField::Institution => &self.institution,
            IdentityField::Department => &self.department,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub(crate) struct RowCounts {
    /// Distinct (student, attempt-or-0) rows.
    pub(crate) nbresults: i64,
    /// Rows that carry an attempt.
    pub(crate) nbattempts: i64,
    pub(crate) nbusers: i64,
}
