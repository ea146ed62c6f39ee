//! The Settings screen: secondary settings navigation and the profile form.

use async_trait::async_trait;
use esperar::{
    expect, text_of, value_of, Driver, EsperarResult, InputAction, Locator, TextPattern,
};

use crate::shell::Shell;
use crate::Screen;

/// Sections of the secondary settings navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    /// Profile and account basics
    General,
    /// Team members
    Members,
    /// Notification preferences
    Notifications,
    /// Password and sessions
    Security,
    /// External docs link
    Documentation,
}

impl SettingsSection {
    /// The section link's on-screen label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Members => "Members",
            Self::Notifications => "Notifications",
            Self::Security => "Security",
            Self::Documentation => "Documentation",
        }
    }

    /// All sections in display order.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [
            Self::General,
            Self::Members,
            Self::Notifications,
            Self::Security,
            Self::Documentation,
        ]
    }
}

/// Fields of the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// Display name, required
    Name,
    /// Sign-in email, required
    Email,
    /// Unique username, required
    Username,
    /// Free-form bio
    Bio,
}

impl ProfileField {
    /// The field's label text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Username => "Username",
            Self::Bio => "Bio",
        }
    }

    /// Whether the form marks this field required.
    #[must_use]
    pub fn required(self) -> bool {
        !matches!(self, Self::Bio)
    }

    fn control_tag(self) -> &'static str {
        match self {
            Self::Bio => "textarea",
            _ => "input",
        }
    }

    /// All fields in form order.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [Self::Name, Self::Email, Self::Username, Self::Bio]
    }
}

/// Page object for the Settings screen.
pub struct SettingsScreen<'d, D: Driver + ?Sized> {
    driver: &'d D,
    base_url: String,
    /// Shared app chrome, delegated to rather than inherited from.
    pub shell: Shell<'d, D>,
    heading: Locator,
    settings_nav: Locator,
    profile_form: Locator,
    choose_avatar_button: Locator,
    save_button: Locator,
}

impl<'d, D: Driver + ?Sized> SettingsScreen<'d, D> {
    /// Build the screen's locator inventory against one driver session.
    #[must_use]
    pub fn new(driver: &'d D, base_url: impl Into<String>) -> Self {
        Self {
            driver,
            base_url: base_url.into(),
            shell: Shell::new(driver),
            heading: Locator::by_role_named("heading", TextPattern::exact("Settings")),
            // The sidebar nav comes first in document order; the settings
            // subnav is the second nav on the page. The positional coupling
            // lives only here.
            settings_nav: Locator::by_tag("nav").nth(1),
            profile_form: Locator::by_tag("form").first(),
            choose_avatar_button: Locator::by_role_named("button", TextPattern::exact("Choose")),
            save_button: Locator::by_role_named("button", TextPattern::exact("Save changes")),
        }
    }

    /// The settings-nav link for a section.
    #[must_use]
    pub fn section_link(&self, section: SettingsSection) -> Locator {
        self.settings_nav
            .role_named("link", TextPattern::exact(section.label()))
    }

    /// Open a settings section from the secondary navigation.
    pub async fn open_section(&self, section: SettingsSection) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.section_link(section), InputAction::Click)
            .await
    }

    /// Assert every expected section link is present.
    pub async fn verify_sections(&self) -> EsperarResult<()> {
        for section in SettingsSection::all() {
            expect(self.driver, &self.section_link(section)).to_be_visible().await?;
        }
        Ok(())
    }

    /// The labelled container row for one profile field.
    ///
    /// Anchored on the label text and walked up one level; the only place
    /// the form's wrapper depth is relied on.
    fn field_row(&self, field: ProfileField) -> Locator {
        self.profile_form
            .text(TextPattern::exact(field.label()))
            .first()
            .ascend(1)
    }

    /// The input (or textarea, for Bio) of one profile field.
    #[must_use]
    pub fn field_control(&self, field: ProfileField) -> Locator {
        self.field_row(field).tag(field.control_tag()).first()
    }

    /// Read a field's current value.
    pub async fn read_field(&self, field: ProfileField) -> EsperarResult<String> {
        value_of(self.driver, &self.field_control(field)).await
    }

    /// Replace a field's value.
    pub async fn fill_field(&self, field: ProfileField, value: &str) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.field_control(field), InputAction::Fill(value.to_string()))
            .await
    }

    /// Clear a field.
    pub async fn clear_field(&self, field: ProfileField) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.field_control(field), InputAction::Clear)
            .await
    }

    /// Read a field's helper description.
    pub async fn field_description(&self, field: ProfileField) -> EsperarResult<String> {
        text_of(self.driver, &self.field_row(field).tag("p").first()).await
    }

    /// Assert required fields carry the asterisk marker and Bio does not.
    pub async fn verify_required_markers(&self) -> EsperarResult<()> {
        for field in ProfileField::all() {
            let row = self.field_row(field);
            if field.required() {
                expect(self.driver, &row).to_contain_text("*").await?;
            } else {
                expect(self.driver, &row).not().to_contain_text("*").await?;
            }
        }
        Ok(())
    }

    /// Assert each field currently holds the given value, retrying until the
    /// form hydrates.
    pub async fn verify_field_values(
        &self,
        expected: &[(ProfileField, &str)],
    ) -> EsperarResult<()> {
        for (field, value) in expected {
            expect(self.driver, &self.field_control(*field))
                .to_have_value(*value)
                .await?;
        }
        Ok(())
    }

    /// Open the avatar file chooser.
    pub async fn choose_avatar(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.choose_avatar_button, InputAction::Click)
            .await
    }

    /// Submit the profile form.
    pub async fn save_changes(&self) -> EsperarResult<()> {
        self.driver
            .dispatch(&self.save_button, InputAction::Click)
            .await
    }
}

#[async_trait]
impl<'d, D: Driver + ?Sized> Screen for SettingsScreen<'d, D> {
    fn path(&self) -> &'static str {
        "/settings"
    }

    fn url(&self) -> String {
        crate::join_url(&self.base_url, self.path())
    }

    async fn goto(&self) -> EsperarResult<()> {
        self.driver.navigate(&self.url()).await
    }

    async fn verify_loaded(&self) -> EsperarResult<()> {
        expect(self.driver, &self.heading).to_be_visible().await?;
        expect(self.driver, &self.save_button).to_be_visible().await
    }
}
