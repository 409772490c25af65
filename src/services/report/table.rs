use crate::db::types::{DisplayMode, IdentityField};
use crate::repositories::{PageWindow, SortDirection, SortField};
use crate::services::report::columns::Column;
use crate::services::report::rows::Cell;

/// The initials bar appears once the unfiltered report outgrows this.
pub(crate) const INITIALS_BAR_THRESHOLD: i64 = 20;

pub(crate) const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SortSpec {
    pub(crate) key: String,
    pub(crate) direction: SortDirection,
}

impl SortSpec {
    /// Accepts only keys the table can order by; anything else means no sort.
    pub(crate) fn parse(
        key: Option<&str>,
        dir: Option<&str>,
        identity_fields: &[IdentityField],
    ) -> Option<Self> {
        let key = key?.trim();
        let known = matches!(key, "fullname" | "firstname" | "lastname" | "attempt")
            || IdentityField::from_key(key).is_some_and(|field| identity_fields.contains(&field));
        if !known {
            return None;
        }

        let direction = match dir.map(str::trim) {
            Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Some(Self { key: key.to_string(), direction })
    }

    pub(crate) fn fields(&self) -> Vec<(SortField, SortDirection)> {
        let fields = match self.key.as_str() {
            "fullname" => vec![SortField::Firstname, SortField::Lastname],
            "firstname" => vec![SortField::Firstname],
            "lastname" => vec![SortField::Lastname],
            "attempt" => vec![SortField::Attempt],
            other => IdentityField::from_key(other).map(SortField::Identity).into_iter().collect(),
        };
        fields.into_iter().map(|field| (field, self.direction)).collect()
    }
}

/// First letter of an initials filter, upper-cased; `None` clears it.
pub(crate) fn parse_initial(value: Option<&str>) -> Option<char> {
    let first = value?.trim().chars().next()?;
    if first.is_alphabetic() {
        first.to_uppercase().next()
    } else {
        None
    }
}

pub(crate) fn effective_page_size(preference: i32, fallback: i64) -> i64 {
    if preference >= 1 {
        i64::from(preference)
    } else if fallback >= 1 {
        fallback
    } else {
        DEFAULT_PAGE_SIZE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub(crate) page: i64,
    pub(crate) page_size: i64,
    pub(crate) total: i64,
}

impl Pagination {
    /// Clamps the requested page into the available range.
    pub(crate) fn new(requested_page: i64, page_size: i64, total: i64) -> Self {
        let page_size = page_size.max(1);
        let last = ((total.max(0) + page_size - 1) / page_size - 1).max(0);
        Self { page: requested_page.clamp(0, last), page_size, total: total.max(0) }
    }

    pub(crate) fn page_count(&self) -> i64 {
        (self.total + self.page_size - 1) / self.page_size
    }

    pub(crate) fn window(&self) -> PageWindow {
        PageWindow { offset: self.page * self.page_size, limit: self.page_size }
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub(crate) fn has_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }
}

/// Widget state carried between report links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TableState {
    pub(crate) mode: DisplayMode,
    pub(crate) group_id: Option<String>,
    pub(crate) sort: Option<SortSpec>,
    pub(crate) first_initial: Option<char>,
    pub(crate) last_initial: Option<char>,
    pub(crate) page: i64,
}

impl TableState {
    pub(crate) fn href(&self, base: &str) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if self.mode != DisplayMode::AllStudents {
            params.push(("attemptsmode", self.mode.code().to_string()));
        }
        if let Some(group_id) = &self.group_id {
            params.push(("group", group_id.clone()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.key.clone()));
            if sort.direction == SortDirection::Desc {
                params.push(("dir", "desc".to_string()));
            }
        }
        if let Some(initial) = self.first_initial {
            params.push(("tifirst", initial.to_string()));
        }
        if let Some(initial) = self.last_initial {
            params.push(("tilast", initial.to_string()));
        }
        if self.page > 0 {
            params.push(("page", self.page.to_string()));
        }

        match serde_urlencoded::to_string(&params) {
            Ok(query) if !query.is_empty() => format!("{base}?{query}"),
            _ => base.to_string(),
        }
    }

    pub(crate) fn with_page(&self, page: i64) -> Self {
        Self { page, ..self.clone() }
    }

    /// Sorting by the current key flips its direction; a new key starts ascending.
    pub(crate) fn with_sort(&self, key: &str) -> Self {
        let direction = match &self.sort {
            Some(current) if current.key == key && current.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        Self { sort: Some(SortSpec { key: key.to_string(), direction }), page: 0, ..self.clone() }
    }

    pub(crate) fn with_first_initial(&self, initial: Option<char>) -> Self {
        Self { first_initial: initial, page: 0, ..self.clone() }
    }

    pub(crate) fn with_last_initial(&self, initial: Option<char>) -> Self {
        Self { last_initial: initial, page: 0, ..self.clone() }
    }
}

/// Tracks the previous row so repeated values in suppressing columns blank out.
///
/// Whole cells are compared, so two students who share a name still differ
/// through their profile links.
#[derive(Debug, Default)]
pub(crate) struct RepeatSuppressor {
    previous: Option<Vec<Cell>>,
}

impl RepeatSuppressor {
    /// Returns, per cell, whether it repeats the row above.
    pub(crate) fn apply(&mut self, columns: &[Column], cells: &[Cell]) -> Vec<bool> {
        let repeated = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                column.suppress
                    && cells.get(index).is_some_and(|cell| !cell.plain_text().is_empty())
                    && self
                        .previous
                        .as_ref()
                        .is_some_and(|previous| previous.get(index) == cells.get(index))
            })
            .collect();
        self.previous = Some(cells.to_vec());
        repeated
    }
}
