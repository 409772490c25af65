use maud::{html, Markup};
use rust_i18n::t;

use super::{ExportError, TabularSink};
use crate::repositories::SortDirection;
use crate::services::report::columns::{Column, ColumnKind};
use crate::services::report::rows::Cell;
use crate::services::report::table::{RepeatSuppressor, TableState};
use crate::services::tracks::format_score;

/// Renders the report rows as an HTML table.
pub(crate) struct HtmlTableSink<'a> {
    state: &'a TableState,
    base_url: &'a str,
    pix_url: &'a str,
    columns: Vec<Column>,
    head: Option<Markup>,
    body: Vec<Markup>,
    suppressor: RepeatSuppressor,
}

impl<'a> HtmlTableSink<'a> {
    pub(crate) fn new(state: &'a TableState, base_url: &'a str, pix_url: &'a str) -> Self {
        Self {
            state,
            base_url,
            pix_url: pix_url.trim_end_matches('/'),
            columns: Vec::new(),
            head: None,
            body: Vec::new(),
            suppressor: RepeatSuppressor::default(),
        }
    }

    fn sort_link(&self, key: &str, label: &str) -> Markup {
        let arrow = match &self.state.sort {
            Some(sort) if sort.key == key => match sort.direction {
                SortDirection::Asc => " \u{25B2}",
                SortDirection::Desc => " \u{25BC}",
            },
            _ => "",
        };
        html! {
            a href=(self.state.with_sort(key).href(self.base_url)) { (label) (arrow) }
        }
    }

    fn header_cell(&self, column: &Column) -> Markup {
        match &column.kind {
            ColumnKind::Checkbox => html! {
                input type="checkbox" id="select-all" title=(t!("report.select_all"));
            },
            ColumnKind::Fullname => html! {
                (self.sort_link("firstname", &t!("report.first_name")))
                " / "
                (self.sort_link("lastname", &t!("report.last_name")))
            },
            _ if column.sortable => self.sort_link(&column.key, &column.header),
            _ => html! { (column.header) },
        }
    }

    fn body_cell(&self, cell: &Cell) -> Markup {
        match cell {
            Cell::Empty => html! {},
            Cell::Text(text) => html! { (text) },
            Cell::Number(value) => html! { (format_score(*value)) },
            Cell::Link { text, href, title } => html! {
                a href=(href) title=[title.as_deref()] { (text) }
            },
            Cell::Checkbox { value, label } => html! {
                input type="checkbox" name="attemptid[]" value=(value) aria-label=(label);
            },
            Cell::Picture { src, alt, initials, href } => html! {
                a href=(href) {
                    @if let Some(src) = src {
                        img.userpicture src=(src) alt=(alt) width="35" height="35";
                    } @else {
                        span.userinitials title=(alt) { (initials) }
                    }
                }
            },
            Cell::Status { status, label, detail } => html! {
                img.icon src=(format!("{}/{status}.svg", self.pix_url)) alt=(label) title=(label);
                br;
                @match detail {
                    Some((text, href)) => {
                        a href=(href) title=(t!("report.details")) { (text) }
                    }
                    None => { (label) }
                }
            },
        }
    }
}

impl TabularSink for HtmlTableSink<'_> {
    type Output = Markup;

    fn write_header(&mut self, columns: &[Column]) -> Result<(), ExportError> {
        self.columns = columns.to_vec();
        let head = html! {
            tr {
                @for column in columns {
                    th class=(column.class) scope="col" { (self.header_cell(column)) }
                }
            }
        };
        self.head = Some(head);
        Ok(())
    }

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), ExportError> {
        let repeated = self.suppressor.apply(&self.columns, cells);
        let row = html! {
            tr {
                @for (index, cell) in cells.iter().enumerate() {
                    td class=(self.columns.get(index).map_or("", |column| column.class)) {
                        @if !repeated.get(index).copied().unwrap_or(false) {
                            (self.body_cell(cell))
                        }
                    }
                }
            }
        };
        self.body.push(row);
        Ok(())
    }

    fn finish(self) -> Result<Markup, ExportError> {
        Ok(html! {
            table #attempts.generaltable {
                thead { @if let Some(head) = &self.head { (head) } }
                tbody {
                    @for row in &self.body { (row) }
                }
            }
        })
    }
}
