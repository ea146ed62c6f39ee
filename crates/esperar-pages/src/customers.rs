//! The Customers screen: filterable seven-column table with row selection
//! and pagination.

use async_trait::async_trait;
use esperar::{
    count_of, expect, resolve, text_of, Driver, EsperarResult, InputAction, Locator, TextPattern,
};
use regex::Regex;

use crate::shell::Shell;
use crate::Screen;

/// Columns of the customers table, in declared order.
///
/// The leading select column and the trailing actions column render without
/// header text; the five in between carry labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerColumn {
    /// Row-selection checkbox
    Select,
    /// Customer identifier
    Id,
    /// Display name
    Name,
    /// Email address
    Email,
    /// Location
    Location,
    /// Subscription status
    Status,
    /// Row actions menu
    Actions,
}

impl CustomerColumn {
    /// Zero-based cell position within a row.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Select => 0,
            Self::Id => 1,
            Self::Name => 2,
            Self::Email => 3,
            Self::Location => 4,
            Self::Status => 5,
            Self::Actions => 6,
        }
    }

    /// The column's header text, when it has one.
    #[must_use]
    pub fn header(self) -> Option<&'static str> {
        match self {
            Self::Select | Self::Actions => None,
            Self::Id => Some("ID"),
            Self::Name => Some("Name"),
            Self::Email => Some("Email"),
            Self::Location => Some("Location"),
            Self::Status => Some("Status"),
        }
    }

    /// All columns in declared order.
    #[must_use]
    pub fn all() -> [Self; 7] {
        [
            Self::Select,
            Self::Id,
            Self::Name,
            Self::Email,
            Self::Location,
            Self::Status,
            Self::Actions,
        ]
    }
}

/// Pagination controls under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    /// Jump to the first page
    First,
    /// One page back
    Previous,
    /// One page forward
    Next,
    /// Jump to the last page
    Last,
}

impl PageControl {
    fn label(self) -> &'static str {
        match self {
            Self::First => "First",
            Self::Previous => "Previous",
            Self::Next => "Next",
            Self::Last => "Last",
        }
    }
}

/// Page object for the Customers screen.
pub struct CustomersScreen<'d, D: Driver + ?Sized> {
    driver: &'d D,
    base_url: String,
    /// Shared app chrome, delegated to rather than inherited from.
    pub shell: Shell<'d, D>,
    heading: Locator,
    new_customer_button: Locator,
    filter_input: Locator,
    status_filter: Locator,
    display_button: Locator,
    table: Locator,
    headers: Locator,
    rows: Locator,
    select_all: Locator,
    selection_summary: Locator,
}

impl<'d, D: Driver + ?Sized> CustomersScreen<'d, D> {
    /// Build the screen's locator inventory against one driver session.
    #[must_use]
    pub fn new(driver: &'d D, base_url: impl Into<String>) -> Self {
        let table = Locator::by_role("table");
        Self {
            driver,
            base_url: base_url.into(),
            shell: Shell::new(driver),
            heading: Locator::by_role_named("heading", TextPattern::exact("Customers")),
            new_customer_button: Locator::by_role_named(
                "button",
                TextPattern::exact("New customer"),
            ),
            filter_input: Locator::by_placeholder("Filter emails..."),
            status_filter: Locator::by_role_named("button", TextPattern::exact("Status")),
            display_button: Locator::by_role_named("button", TextPattern::exact("Display")),
            headers: table.tag("th"),
            rows: table.tag("tbody").tag("tr"),
            select_all: table.tag("thead").role("checkbox"),
            selection_summary: Locator::by_text(
                Regex::new(r"\d+ of \d+ row\(s\) selected").unwrap(),
            ),
            table,
        }
    }

    /// The row at a zero-based table position.
    #[must_use]
    pub fn row_by_index(&self, index: usize) -> Locator {
        self.rows.nth(index)
    }

    /// Rows whose text mentions the given fragment.
    #[must_use]
    pub fn rows_matching(&self, fragment: &str) -> Locator {
        self.rows.filter(fragment)
    }

    /// How many rows the table currently shows.
    pub async fn row_count(&self) -> EsperarResult<usize> {
        count_of(self.driver, &self.rows).await
    }

    /// Read one cell by row index and named column.
    pub async fn customer_field(
        &self,
        row: usize,
        column: CustomerColumn,
    ) -> EsperarResult<String> {
        let cell = self.row_by_index(row).tag("td").nth(column.index());
        text_of(self.driver, &cell).await
    }

    /// Type into the email filter input.
    pub async fn filter_by_email(&self, fragment: &str) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.filter_input, InputAction::Fill(fragment.to_string()))
            .await
    }

    /// Press Enter in the filter input to apply the typed filter.
    pub async fn submit_filter(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.filter_input, InputAction::Press("Enter".to_string()))
            .await
    }

    /// Clear the email filter input.
    pub async fn clear_filter(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.filter_input, InputAction::Clear)
            .await
    }

    /// Open the status filter dropdown.
    pub async fn open_status_filter(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.status_filter, InputAction::Click)
            .await
    }

    /// Open the column display dropdown.
    pub async fn open_display_menu(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.display_button, InputAction::Click)
            .await
    }

    /// Click the New-customer button.
    pub async fn start_new_customer(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.new_customer_button, InputAction::Click)
            .await
    }

    /// Tick the select-all checkbox in the header row.
    pub async fn select_all_rows(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.select_all, InputAction::Check)
            .await
    }

    /// Untick the select-all checkbox.
    pub async fn deselect_all_rows(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.select_all, InputAction::Uncheck)
            .await
    }

    fn row_checkbox(&self, row: usize) -> Locator {
        self.row_by_index(row).role("checkbox")
    }

    /// Tick one row's selection checkbox.
    pub async fn select_row(&self, row: usize) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.row_checkbox(row), InputAction::Check)
            .await
    }

    /// Untick one row's selection checkbox.
    pub async fn deselect_row(&self, row: usize) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.row_checkbox(row), InputAction::Uncheck)
            .await
    }

    /// Assert one row's checkbox state.
    pub async fn verify_row_selected(&self, row: usize, selected: bool) -> EsperarResult<()> {
        let checkbox = self.row_checkbox(row);
        if selected {
            expect(self.driver, &checkbox).to_be_checked().await
        } else {
            expect(self.driver, &checkbox).not().to_be_checked().await
        }
    }

    /// The "N of M row(s) selected" summary under the table.
    pub async fn selection_summary(&self) -> EsperarResult<String> {
        text_of(self.driver, &self.selection_summary).await
    }

    fn page_button(control: PageControl) -> Locator {
        Locator::by_role_named("button", TextPattern::exact(control.label()))
    }

    /// The numbered page button for a one-based page.
    #[must_use]
    pub fn numbered_page(&self, page: usize) -> Locator {
        Locator::by_role_named("button", TextPattern::exact(page.to_string()))
    }

    /// Click a pagination control if it is currently usable.
    ///
    /// Returns whether a click was dispatched: at either end of the page
    /// range the boundary controls render disabled, and pressing them would
    /// be an `InputError` rather than a no-op.
    pub async fn page(&self, control: PageControl) -> EsperarResult<bool> {
        let button = Self::page_button(control);
        let tree = self.driver.snapshot().await?;
        let set = resolve(&tree, &button);
        let usable = set
            .first()
            .map(|id| tree.is_visible(id) && tree.get(id).enabled)
            .unwrap_or(false);
        if !usable {
            tracing::debug!(
                target: "esperar_pages::customers",
                control = control.label(),
                "pagination control not usable, skipping"
            );
            return Ok(false);
        }
        self.driver.dispatch(&button, InputAction::Click).await?;
        Ok(true)
    }

    /// Assert the table carries the declared seven-column layout.
    pub async fn verify_table_structure(&self) -> EsperarResult<()> {
        expect(self.driver, &self.table).to_be_visible().await?;
        expect(self.driver, &self.headers).to_have_count(7).await?;
        for column in CustomerColumn::all() {
            if let Some(header) = column.header() {
                expect(self.driver, &self.headers.nth(column.index()))
                    .to_contain_text(TextPattern::exact(header))
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<'d, D: Driver + ?Sized> Screen for CustomersScreen<'d, D> {
    fn path(&self) -> &'static str {
        "/customers"
    }

    fn url(&self) -> String {
        crate::join_url(&self.base_url, self.path())
    }

    async fn goto(&self) -> EsperarResult<()> {
        self.driver.navigate(&self.url()).await
    }

    async fn verify_loaded(&self) -> EsperarResult<()> {
        expect(self.driver, &self.heading).to_be_visible().await?;
        expect(self.driver, &self.new_customer_button).to_be_visible().await
    }
}
