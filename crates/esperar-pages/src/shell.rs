//! The dashboard's app chrome: sidebar navigation, settings submenu, and the
//! cookie-consent banner.
//!
//! Every screen composes a `Shell` by value and delegates navigation to it,
//! instead of inheriting from a shared base, so screens that diverge never
//! drag each other along.

use esperar::{expect, resolve, Driver, EsperarResult, InputAction, Locator, TextPattern};
use regex::Regex;

/// Navigation chrome shared by every dashboard screen.
pub struct Shell<'d, D: Driver + ?Sized> {
    driver: &'d D,
    sidebar_collapse: Locator,
    search_button: Locator,
    user_menu_button: Locator,
    home_link: Locator,
    inbox_link: Locator,
    customers_link: Locator,
    settings_general_link: Locator,
    settings_members_link: Locator,
    settings_notifications_link: Locator,
    settings_security_link: Locator,
    feedback_link: Locator,
    help_support_link: Locator,
    cookie_accept_button: Locator,
    cookie_opt_out_button: Locator,
}

impl<'d, D: Driver + ?Sized> Shell<'d, D> {
    /// Build the chrome locators for one driver session.
    #[must_use]
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            sidebar_collapse: Locator::by_role_named(
                "button",
                TextPattern::exact("Collapse sidebar"),
            ),
            search_button: Locator::by_role_named(
                "button",
                Regex::new(r"Search.*K").unwrap(),
            ),
            user_menu_button: Locator::by_role_named(
                "button",
                TextPattern::exact("Benjamin Canac Benjamin Canac"),
            ),
            home_link: Locator::by_role_named("link", TextPattern::exact("Home")),
            // The inbox link carries a live unread badge, so the name is a
            // pattern rather than a literal.
            inbox_link: Locator::by_role_named("link", Regex::new(r"Inbox.*\d+").unwrap()),
            customers_link: Locator::by_role_named("link", TextPattern::exact("Customers")),
            settings_general_link: Locator::by_role_named("link", TextPattern::exact("General")),
            settings_members_link: Locator::by_role_named("link", TextPattern::exact("Members")),
            settings_notifications_link: Locator::by_role_named(
                "link",
                TextPattern::exact("Notifications"),
            ),
            settings_security_link: Locator::by_role_named("link", TextPattern::exact("Security")),
            feedback_link: Locator::by_role_named("link", TextPattern::exact("Feedback")),
            help_support_link: Locator::by_role_named(
                "link",
                TextPattern::exact("Help & Support"),
            ),
            cookie_accept_button: Locator::by_role_named("button", TextPattern::exact("Accept")),
            cookie_opt_out_button: Locator::by_role_named("button", TextPattern::exact("Opt out")),
        }
    }

    /// Click the sidebar Home link.
    pub async fn go_home(&self) -> EsperarResult<()> {
        self.driver.dispatch(&self.home_link, InputAction::Click).await
    }

    /// Click the sidebar Inbox link.
    pub async fn go_inbox(&self) -> EsperarResult<()> {
        self.driver.dispatch(&self.inbox_link, InputAction::Click).await
    }

    /// Click the sidebar Customers link.
    pub async fn go_customers(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.customers_link, InputAction::Click)
            .await
    }

    /// Open Settings via its General entry.
    pub async fn go_settings(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.settings_general_link, InputAction::Click)
            .await
    }

    /// Open the Members settings section.
    pub async fn go_settings_members(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.settings_members_link, InputAction::Click)
            .await
    }

    /// Open the Notifications settings section.
    pub async fn go_settings_notifications(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.settings_notifications_link, InputAction::Click)
            .await
    }

    /// Open the Security settings section.
    pub async fn go_settings_security(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.settings_security_link, InputAction::Click)
            .await
    }

    /// Dismiss the cookie banner by accepting, when it is currently shown.
    ///
    /// A single non-retried probe: the banner either exists right now or it
    /// does not; there is nothing to wait for.
    pub async fn accept_cookies(&self) -> EsperarResult<()> {
        self.dismiss_banner(&self.cookie_accept_button).await
    }

    /// Dismiss the cookie banner by opting out, when it is currently shown.
    pub async fn opt_out_cookies(&self) -> EsperarResult<()> {
        self.dismiss_banner(&self.cookie_opt_out_button).await
    }

    async fn dismiss_banner(&self, button: &Locator) -> EsperarResult<()> {
        let tree = self.driver.snapshot().await?;
        let present = resolve(&tree, button)
            .first()
            .map(|id| tree.is_visible(id))
            .unwrap_or(false);
        if present {
            tracing::debug!(target: "esperar_pages::shell", "dismissing cookie banner");
            self.driver.dispatch(button, InputAction::Click).await?;
        }
        Ok(())
    }

    /// Collapse the sidebar.
    pub async fn collapse_sidebar(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.sidebar_collapse, InputAction::Click)
            .await
    }

    /// Open the global search.
    pub async fn open_search(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.search_button, InputAction::Click)
            .await
    }

    /// Open the user menu.
    pub async fn open_user_menu(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.user_menu_button, InputAction::Click)
            .await
    }

    /// Assert the sidebar chrome is present.
    pub async fn verify_chrome(&self) -> EsperarResult<()> {
        expect(self.driver, &self.home_link).to_be_visible().await?;
        expect(self.driver, &self.inbox_link).to_be_visible().await?;
        expect(self.driver, &self.customers_link).to_be_visible().await?;
        expect(self.driver, &self.feedback_link).to_be_visible().await?;
        expect(self.driver, &self.help_support_link).to_be_visible().await
    }
}
