use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "courserole", rename_all = "lowercase")]
pub(crate) enum CourseRole {
    Teacher,
    Assistant,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "enrolmentstatus", rename_all = "lowercase")]
pub(crate) enum EnrolmentStatus {
    Active,
    Suspended,
}

/// Runtime standard the package was authored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "packageversion")]
pub(crate) enum PackageVersion {
    #[serde(rename = "scorm_12")]
    #[sqlx(rename = "scorm_12")]
    Scorm12,
    #[serde(rename = "scorm_13")]
    #[sqlx(rename = "scorm_13")]
    Scorm13,
    #[serde(rename = "aicc")]
    #[sqlx(rename = "aicc")]
    Aicc,
}

impl PackageVersion {
    /// Track element that carries an object's maximum score.
    pub(crate) fn max_score_element(self) -> &'static str {
        match self {
            Self::Scorm13 => "cmi.score.max",
            Self::Scorm12 | Self::Aicc => "cmi.core.score.max",
        }
    }
}

/// How an attempt's grade is folded from its objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "grademethod", rename_all = "lowercase")]
pub(crate) enum GradeMethod {
    Objects,
    Highest,
    Average,
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "groupmode", rename_all = "lowercase")]
pub(crate) enum GroupMode {
    #[serde(rename = "none")]
    #[sqlx(rename = "none")]
    NoGroups,
    Separate,
    Visible,
}

/// User columns that may be shown next to the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum IdentityField {
    Email,
    IdNumber,
    Username,
    Institution,
    Department,
}

impl IdentityField {
    pub(crate) fn from_key(key: &str) -> Option<Self> {
        match key {
            "email" => Some(Self::Email),
            "idnumber" => Some(Self::IdNumber),
            "username" => Some(Self::Username),
            "institution" => Some(Self::Institution),
            "department" => Some(Self::Department),
            _ => None,
        }
    }

    pub(crate) fn key(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::IdNumber => "idnumber",
            Self::Username => "username",
            Self::Institution => "institution",
            Self::Department => "department",
        }
    }

    /// Qualified column on the `users u` alias.
    pub(crate) fn sql_column(self) -> &'static str {
        match self {
            Self::Email => "u.email",
            Self::IdNumber => "u.idnumber",
            Self::Username => "u.username",
            Self::Institution => "u.institution",
            Self::Department => "u.department",
        }
    }
}

/// Which enrolled students appear in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum DisplayMode {
    #[default]
    AllStudents,
    StudentsWithAttempts,
    StudentsWithoutAttempts,
}

impl DisplayMode {
    pub(crate) fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::AllStudents),
            1 => Some(Self::StudentsWithAttempts),
            2 => Some(Self::StudentsWithoutAttempts),
            _ => None,
        }
    }

    pub(crate) fn code(self) -> i32 {
        match self {
            Self::AllStudents => 0,
            Self::StudentsWithAttempts => 1,
            Self::StudentsWithoutAttempts => 2,
        }
    }

    /// Whether a row with (or without) an attempt passes the filter.
    pub(crate) fn admits(self, has_attempt: bool) -> bool {
        match self {
            Self::AllStudents => true,
            Self::StudentsWithAttempts => has_attempt,
            Self::StudentsWithoutAttempts => !has_attempt,
        }
    }
}
