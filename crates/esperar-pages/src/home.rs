//! The dashboard Home screen: stat cards, period controls, and the recent
//! orders table.

use async_trait::async_trait;
use esperar::{count_of, expect, text_of, Driver, EsperarResult, InputAction, Locator, TextPattern};
use regex::Regex;

use crate::shell::Shell;
use crate::Screen;

/// The four headline stat cards, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCard {
    /// Total customers
    Customers,
    /// Conversion count
    Conversions,
    /// Revenue total
    Revenue,
    /// Order count
    Orders,
}

impl StatCard {
    /// The card's on-screen label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::Conversions => "Conversions",
            Self::Revenue => "Revenue",
            Self::Orders => "Orders",
        }
    }

    /// All cards in display order.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [Self::Customers, Self::Conversions, Self::Revenue, Self::Orders]
    }
}

/// Columns of the recent orders table, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    /// Order identifier
    Id,
    /// Order date
    Date,
    /// Fulfilment status
    Status,
    /// Customer email
    Email,
    /// Order amount
    Amount,
}

impl OrderColumn {
    /// Zero-based cell position within a row.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Id => 0,
            Self::Date => 1,
            Self::Status => 2,
            Self::Email => 3,
            Self::Amount => 4,
        }
    }

    /// The column's header text.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Date => "Date",
            Self::Status => "Status",
            Self::Email => "Email",
            Self::Amount => "Amount",
        }
    }

    /// All columns in declared order.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [Self::Id, Self::Date, Self::Status, Self::Email, Self::Amount]
    }
}

/// Page object for the Home screen.
pub struct HomeScreen<'d, D: Driver + ?Sized> {
    driver: &'d D,
    base_url: String,
    /// Shared app chrome, delegated to rather than inherited from.
    pub shell: Shell<'d, D>,
    heading: Locator,
    date_range_button: Locator,
    period_select: Locator,
    stats_section: Locator,
    orders_table: Locator,
    order_headers: Locator,
    order_rows: Locator,
}

impl<'d, D: Driver + ?Sized> HomeScreen<'d, D> {
    /// Build the screen's locator inventory against one driver session.
    #[must_use]
    pub fn new(driver: &'d D, base_url: impl Into<String>) -> Self {
        let orders_table = Locator::by_role("table");
        Self {
            driver,
            base_url: base_url.into(),
            shell: Shell::new(driver),
            heading: Locator::by_role_named("heading", TextPattern::exact("Home")),
            // Something like "Jul 2 - Aug 1"; the concrete dates move daily.
            date_range_button: Locator::by_role_named(
                "button",
                Regex::new(r"\w{3} \d{1,2}.+\w{3} \d{1,2}").unwrap(),
            ),
            period_select: Locator::by_role("combobox"),
            stats_section: Locator::by_test_id("home-stats"),
            order_headers: orders_table.tag("th"),
            order_rows: orders_table.tag("tbody").tag("tr"),
            orders_table,
        }
    }

    /// One stat card, matched by its label inside the stats section.
    #[must_use]
    pub fn stat_card(&self, card: StatCard) -> Locator {
        self.stats_section
            .role("link")
            .filter(TextPattern::contains(card.label()))
    }

    /// A card's headline value.
    pub async fn stat_value(&self, card: StatCard) -> EsperarResult<String> {
        text_of(self.driver, &self.stat_card(card).tag("p").first()).await
    }

    /// A card's period-over-period delta.
    pub async fn stat_delta(&self, card: StatCard) -> EsperarResult<String> {
        text_of(self.driver, &self.stat_card(card).tag("span").last()).await
    }

    /// Open the period selector and pick an entry by its visible label.
    pub async fn select_period(&self, period: &str) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.period_select, InputAction::Click)
            .await?;
        let option = Locator::by_role_named("option", TextPattern::exact(period));
        self.driver.dispatch(&option, InputAction::Click).await
    }

    /// Open the date-range picker.
    pub async fn open_date_range(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.date_range_button, InputAction::Click)
            .await
    }

    /// Assert all four stat cards are on screen.
    pub async fn verify_stat_cards(&self) -> EsperarResult<()> {
        let cards = self.stats_section.role("link");
        expect(self.driver, &cards).to_have_count(4).await?;
        for card in StatCard::all() {
            expect(self.driver, &self.stat_card(card)).to_be_visible().await?;
        }
        Ok(())
    }

    /// Assert the orders table carries the declared five-column layout.
    pub async fn verify_orders_table(&self) -> EsperarResult<()> {
        expect(self.driver, &self.orders_table).to_be_visible().await?;
        expect(self.driver, &self.order_headers).to_have_count(5).await?;
        for column in OrderColumn::all() {
            expect(self.driver, &self.order_headers.nth(column.index()))
                .to_have_text(column.header())
                .await?;
        }
        Ok(())
    }

    /// Number of rows currently in the orders table.
    pub async fn order_count(&self) -> EsperarResult<usize> {
        count_of(self.driver, &self.order_rows).await
    }

    /// Read one cell of the orders table by row index and named column.
    pub async fn order_field(&self, row: usize, column: OrderColumn) -> EsperarResult<String> {
        let cell = self.order_rows.nth(row).tag("td").nth(column.index());
        text_of(self.driver, &cell).await
    }
}

#[async_trait]
impl<'d, D: Driver + ?Sized> Screen for HomeScreen<'d, D> {
    fn path(&self) -> &'static str {
        "/"
    }

    fn url(&self) -> String {
        crate::join_url(&self.base_url, self.path())
    }

    async fn goto(&self) -> EsperarResult<()> {
        self.driver.navigate(&self.url()).await
    }

    async fn verify_loaded(&self) -> EsperarResult<()> {
        expect(self.driver, &self.heading).to_be_visible().await?;
        expect(self.driver, &self.date_range_button).to_be_visible().await
    }
}
