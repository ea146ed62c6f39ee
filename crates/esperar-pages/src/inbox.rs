//! The Inbox screen: email list, All/Unread tabs, and per-email field
//! extraction.

use async_trait::async_trait;
use esperar::{
    count_of, expect, text_of, Driver, EsperarResult, InputAction, Locator, TextPattern,
};

use crate::shell::Shell;
use crate::Screen;

/// Named parts of one email list item.
///
/// Each email renders as a header row (sender on the left, timestamp on the
/// right) over a subject line and a one-line preview. The mapping from name
/// to position lives here, in one place, instead of being repeated as bare
/// `nth` calls at every extraction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailField {
    /// Sender display name
    Sender,
    /// Relative timestamp
    Time,
    /// Subject line
    Subject,
    /// Body preview
    Preview,
}

impl EmailField {
    /// The locator for this field within one email item.
    #[must_use]
    pub fn within(self, email: &Locator) -> Locator {
        let header = email.tag("div").first();
        match self {
            Self::Sender => header.tag("div").first(),
            Self::Time => header.tag("div").last(),
            Self::Subject => email.tag("p").first(),
            Self::Preview => email.tag("p").last(),
        }
    }
}

/// The inbox's mailbox tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxTab {
    /// Every email
    All,
    /// Unread only
    Unread,
}

impl InboxTab {
    /// The tab's on-screen label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Unread => "Unread",
        }
    }
}

/// Page object for the Inbox screen.
pub struct InboxScreen<'d, D: Driver + ?Sized> {
    driver: &'d D,
    base_url: String,
    /// Shared app chrome, delegated to rather than inherited from.
    pub shell: Shell<'d, D>,
    heading: Locator,
    emails: Locator,
}

impl<'d, D: Driver + ?Sized> InboxScreen<'d, D> {
    /// Build the screen's locator inventory against one driver session.
    #[must_use]
    pub fn new(driver: &'d D, base_url: impl Into<String>) -> Self {
        Self {
            driver,
            base_url: base_url.into(),
            shell: Shell::new(driver),
            heading: Locator::by_role_named("heading", TextPattern::exact("Inbox")),
            emails: Locator::by_test_id("email-list").role("listitem"),
        }
    }

    fn tab(tab: InboxTab) -> Locator {
        Locator::by_role_named("tab", TextPattern::exact(tab.label()))
    }

    /// Every email item, in list order.
    #[must_use]
    pub fn emails(&self) -> &Locator {
        &self.emails
    }

    /// The email at a zero-based list position.
    #[must_use]
    pub fn email_by_index(&self, index: usize) -> Locator {
        self.emails.nth(index)
    }

    /// The email whose text mentions the given sender.
    #[must_use]
    pub fn email_by_sender(&self, sender: &str) -> Locator {
        self.emails.filter(sender)
    }

    /// The email whose text mentions the given subject.
    #[must_use]
    pub fn email_by_subject(&self, subject: &str) -> Locator {
        self.emails.filter(subject)
    }

    /// How many emails the list currently shows.
    pub async fn email_count(&self) -> EsperarResult<usize> {
        count_of(self.driver, &self.emails).await
    }

    /// Read one named field of the email at the given position.
    pub async fn email_field(&self, index: usize, field: EmailField) -> EsperarResult<String> {
        let target = field.within(&self.email_by_index(index));
        text_of(self.driver, &target).await
    }

    /// Open an email by clicking its list item.
    pub async fn open_email(&self, email: &Locator) -> EsperarResult<()> {
        self.driver.dispatch(email, InputAction::Click).await
    }

    /// Switch to a mailbox tab.
    pub async fn select_tab(&self, tab: InboxTab) -> EsperarResult<()> {
        self.driver.dispatch(&Self::tab(tab), InputAction::Click).await
    }

    /// Assert which tab is currently selected, via `aria-selected`.
    pub async fn verify_tab_selected(&self, tab: InboxTab) -> EsperarResult<()> {
        expect(self.driver, &Self::tab(tab))
            .to_have_attribute("aria-selected", "true")
            .await
    }

    /// Assert a tab is present but not selected.
    pub async fn verify_tab_unselected(&self, tab: InboxTab) -> EsperarResult<()> {
        expect(self.driver, &Self::tab(tab))
            .to_have_attribute("aria-selected", "false")
            .await
    }
}

#[async_trait]
impl<'d, D: Driver + ?Sized> Screen for InboxScreen<'d, D> {
    fn path(&self) -> &'static str {
        "/inbox"
    }

    fn url(&self) -> String {
        crate::join_url(&self.base_url, self.path())
    }

    async fn goto(&self) -> EsperarResult<()> {
        self.driver.navigate(&self.url()).await
    }

    async fn verify_loaded(&self) -> EsperarResult<()> {
        expect(self.driver, &self.heading).to_be_visible().await?;
        expect(self.driver, &Self::tab(InboxTab::All)).to_be_visible().await?;
        expect(self.driver, &Self::tab(InboxTab::Unread)).to_be_visible().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_locators_stay_inside_the_email() {
        let email = Locator::by_test_id("email-list").role("listitem").nth(3);
        let sender = EmailField::Sender.within(&email);
        // The field chain extends the email chain; it never starts over from
        // the document root.
        assert!(sender.steps().len() > email.steps().len());
        assert_eq!(&sender.steps()[..email.steps().len()], email.steps());
    }

    #[test]
    fn test_subject_and_preview_differ_only_in_position() {
        let email = Locator::by_test_id("email-list").role("listitem").first();
        assert_ne!(
            EmailField::Subject.within(&email),
            EmailField::Preview.within(&email)
        );
    }
}
