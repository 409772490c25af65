use rust_i18n::t;

use crate::db::models::ActivityObject;
use crate::db::types::IdentityField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Checkbox,
    Picture,
    Fullname,
    Identity(IdentityField),
    Attempt,
    Start,
    Finish,
    Score,
    /// Per-object result, keyed by the object id.
    Object(String),
}

/// One report column: what it shows and how the table treats it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Column {
    pub(crate) key: String,
    pub(crate) header: String,
    pub(crate) kind: ColumnKind,
    pub(crate) sortable: bool,
    /// Blank out a value repeated from the row above.
    pub(crate) suppress: bool,
    pub(crate) class: &'static str,
}

impl Column {
    fn new(key: impl Into<String>, header: impl Into<String>, kind: ColumnKind) -> Self {
        let sortable = matches!(
            kind,
            ColumnKind::Fullname | ColumnKind::Identity(_) | ColumnKind::Attempt
        );
        let suppress =
            matches!(kind, ColumnKind::Picture | ColumnKind::Fullname | ColumnKind::Identity(_));
        let class = match kind {
            ColumnKind::Checkbox => "c-select",
            ColumnKind::Picture => "c-picture",
            ColumnKind::Fullname | ColumnKind::Identity(_) => "c-user",
            ColumnKind::Attempt => "c-attempt",
            ColumnKind::Start | ColumnKind::Finish => "c-time",
            ColumnKind::Score => "c-score",
            ColumnKind::Object(_) => "c-object",
        };
        Self { key: key.into(), header: header.into(), kind, sortable, suppress, class }
    }

    pub(crate) fn html_only(&self) -> bool {
        matches!(self.kind, ColumnKind::Checkbox | ColumnKind::Picture)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnOptions<'a> {
    pub(crate) html: bool,
    pub(crate) can_delete: bool,
    pub(crate) show_user_image: bool,
    pub(crate) identity_fields: &'a [IdentityField],
    pub(crate) detailed: bool,
}

pub(crate) fn identity_header(field: IdentityField) -> String {
    match field {
        IdentityField::Email => t!("identity.email"),
        IdentityField::IdNumber => t!("identity.idnumber"),
        IdentityField::Username => t!("identity.username"),
        IdentityField::Institution => t!("identity.institution"),
        IdentityField::Department => t!("identity.department"),
    }
    .to_string()
}

/// Builds the ordered column list. Object columns follow the given object
/// order and skip objects that cannot be launched.
pub(crate) fn build_columns(options: ColumnOptions<'_>, objects: &[ActivityObject]) -> Vec<Column> {
    let mut columns = Vec::new();

    if options.html && options.can_delete {
        columns.push(Column::new("checkbox", "", ColumnKind::Checkbox));
    }
    if options.html && options.show_user_image {
        columns.push(Column::new("picture", "", ColumnKind::Picture));
    }
    columns.push(Column::new("fullname", t!("report.name"), ColumnKind::Fullname));
    for field in options.identity_fields {
        columns.push(Column::new(field.key(), identity_header(*field), ColumnKind::Identity(*field)));
    }
    columns.push(Column::new("attempt", t!("report.attempt"), ColumnKind::Attempt));
    columns.push(Column::new("start", t!("report.started"), ColumnKind::Start));
    columns.push(Column::new("finish", t!("report.last"), ColumnKind::Finish));
    columns.push(Column::new("score", t!("report.score"), ColumnKind::Score));

    if options.detailed {
        for object in objects.iter().filter(|object| object.is_launchable()) {
            columns.push(Column::new(
                format!("object-{}", object.id),
                object.title.clone(),
                ColumnKind::Object(object.id.clone()),
            ));
        }
    }

    columns
}
