use maud::{html, Markup, PreEscaped, DOCTYPE};
use rust_i18n::t;

use crate::db::models::{CourseGroup, RowCounts};
use crate::db::types::DisplayMode;
use crate::services::report::table::{Pagination, TableState};

const SELECT_ALL_SCRIPT: &str = r#"document.getElementById('select-all')?.addEventListener('change', function (event) {
  document.querySelectorAll('#attemptsform input[name="attemptid[]"]').forEach(function (box) {
    box.checked = event.target.checked;
  });
});"#;

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub(super) struct TableView {
    pub(super) counts: RowCounts,
    pub(super) pagination: Pagination,
    pub(super) initials_bar: bool,
    pub(super) can_delete: bool,
    pub(super) sesskey: String,
    pub(super) rows: usize,
    pub(super) markup: Markup,
}

pub(super) struct PageView<'a> {
    pub(super) title: &'a str,
    pub(super) notices: &'a [String],
    pub(super) state: &'a TableState,
    pub(super) base_url: &'a str,
    pub(super) groups: Option<&'a [CourseGroup]>,
    pub(super) table: Option<TableView>,
    pub(super) detailed: bool,
    pub(super) page_size: i64,
}

impl PageView<'_> {
    pub(super) fn render(&self) -> String {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) " - " (t!("report.title")) }
                }
                body {
                    main #attempt-report {
                        h2 { (self.title) }
                        @for notice in self.notices {
                            div.notice role="status" { (notice) }
                        }
                        (self.mode_selector())
                        @if let Some(groups) = self.groups {
                            (self.group_selector(groups))
                        }
                        @if let Some(table) = &self.table {
                            (self.table_section(table))
                        }
                        (self.preferences_form())
                    }
                }
            }
        }
        .into_string()
    }

    /// Hidden inputs that carry the current filters through GET forms.
    fn filter_inputs(&self, include_mode: bool) -> Markup {
        html! {
            @if include_mode {
                input type="hidden" name="attemptsmode" value=(self.state.mode.code());
            }
            @if let Some(group_id) = &self.state.group_id {
                input type="hidden" name="group" value=(group_id);
            }
        }
    }

    fn mode_selector(&self) -> Markup {
        let modes = [
            (DisplayMode::AllStudents, t!("report.mode_all")),
            (DisplayMode::StudentsWithAttempts, t!("report.mode_with")),
            (DisplayMode::StudentsWithoutAttempts, t!("report.mode_without")),
        ];
        html! {
            form.attemptsmode method="get" action=(self.base_url) {
                (self.filter_inputs(false))
                label for="attemptsmode" { (t!("report.attempts_mode")) }
                select #attemptsmode name="attemptsmode" {
                    @for (mode, label) in &modes {
                        option value=(mode.code()) selected[*mode == self.state.mode] { (label) }
                    }
                }
                button type="submit" { (t!("report.apply")) }
            }
        }
    }

    fn group_selector(&self, groups: &[CourseGroup]) -> Markup {
        let selected = self.state.group_id.as_deref();
        html! {
            form.groupselector method="get" action=(self.base_url) {
                input type="hidden" name="attemptsmode" value=(self.state.mode.code());
                label for="group" { (t!("report.group")) }
                select #group name="group" {
                    option value="" selected[selected.is_none()] { (t!("report.all_participants")) }
                    @for group in groups {
                        option value=(group.id) selected[selected == Some(group.id.as_str())] {
                            (group.name)
                        }
                    }
                }
                button type="submit" { (t!("report.apply")) }
            }
        }
    }

    fn count_summary(counts: &RowCounts) -> String {
        if counts.nbresults == counts.nbattempts {
            t!(
                "report.count_attempts",
                nbresults = counts.nbresults,
                nbusers = counts.nbusers
            )
            .to_string()
        } else if counts.nbattempts > 0 {
            t!(
                "report.count_all_attempts",
                nbattempts = counts.nbattempts,
                nbusers = counts.nbusers,
                nbresults = counts.nbresults
            )
            .to_string()
        } else {
            t!("report.count_users", nbusers = counts.nbusers).to_string()
        }
    }

    fn table_section(&self, table: &TableView) -> Markup {
        let action = self.state.with_page(table.pagination.page).href(self.base_url);
        html! {
            div.attemptcounts { (Self::count_summary(&table.counts)) }
            (self.download_form())
            @if table.initials_bar {
                (self.initials_bar())
            }
            (self.paging_bar(&table.pagination))
            div #tablecontainer {
                @if table.can_delete {
                    form #attemptsform method="post" action=(action)
                        onsubmit=(format!("return confirm({:?});", t!("report.delete_confirm").as_ref())) {
                        input type="hidden" name="action" value="delete";
                        input type="hidden" name="sesskey" value=(table.sesskey);
                        (table.markup)
                        @if table.rows > 0 {
                            div #commands {
                                button type="submit" { (t!("report.delete_selected")) }
                            }
                        }
                    }
                    script { (PreEscaped(SELECT_ALL_SCRIPT)) }
                } @else {
                    (table.markup)
                }
            }
            (self.paging_bar(&table.pagination))
        }
    }

    fn download_form(&self) -> Markup {
        html! {
            form.download method="get" action=(self.base_url) {
                (self.filter_inputs(true))
                label for="download" { (t!("report.download")) }
                select #download name="download" {
                    option value="CSV" { (t!("report.download_csv")) }
                    option value="ODS" { (t!("report.download_ods")) }
                    option value="Excel" { (t!("report.download_excel")) }
                }
                button type="submit" { (t!("report.download")) }
            }
        }
    }

    fn initials_bar(&self) -> Markup {
        html! {
            div.initialbar.firstinitial {
                span { (t!("report.first_name")) ": " }
                (self.initial_links(self.state.first_initial, |initial| {
                    self.state.with_first_initial(initial)
                }))
            }
            div.initialbar.lastinitial {
                span { (t!("report.last_name")) ": " }
                (self.initial_links(self.state.last_initial, |initial| {
                    self.state.with_last_initial(initial)
                }))
            }
        }
    }

    fn initial_links(
        &self,
        current: Option<char>,
        target: impl Fn(Option<char>) -> TableState,
    ) -> Markup {
        html! {
            @if current.is_none() {
                strong { (t!("report.initials_all")) }
            } @else {
                a href=(target(None).href(self.base_url)) { (t!("report.initials_all")) }
            }
            @for letter in LETTERS.chars() {
                " "
                @if current == Some(letter) {
                    strong { (letter) }
                } @else {
                    a href=(target(Some(letter)).href(self.base_url)) { (letter) }
                }
            }
        }
    }

    fn paging_bar(&self, pagination: &Pagination) -> Markup {
        html! {
            @if pagination.page_count() > 1 {
                nav.paging {
                    @if pagination.has_previous() {
                        a.previous href=(self.state.with_page(pagination.page - 1).href(self.base_url)) {
                            (t!("report.previous"))
                        }
                        " "
                    }
                    @for page in 0..pagination.page_count() {
                        @if page == pagination.page {
                            strong { (page + 1) }
                        } @else {
                            a href=(self.state.with_page(page).href(self.base_url)) { (page + 1) }
                        }
                        " "
                    }
                    @if pagination.has_next() {
                        a.next href=(self.state.with_page(pagination.page + 1).href(self.base_url)) {
                            (t!("report.next"))
                        }
                    }
                }
            }
        }
    }

    fn preferences_form(&self) -> Markup {
        html! {
            form.preferences method="get" action=(self.base_url) {
                (self.filter_inputs(true))
                fieldset {
                    legend { (t!("report.preferences")) }
                    label for="pagesize" { (t!("report.page_size")) }
                    input #pagesize type="number" min="1" name="pagesize"
                        value=(self.page_size);
                    label for="detailed" { (t!("report.detailed")) }
                    select #detailed name="detailed" {
                        option value="0" selected[!self.detailed] { (t!("report.no")) }
                        option value="1" selected[self.detailed] { (t!("report.yes")) }
                    }
                    button type="submit" { (t!("report.apply")) }
                }
            }
        }
    }
}
