//! Page objects for the reference dashboard, built on the `esperar`
//! query/assertion core.
//!
//! Each screen struct borrows one driver session and carries its own
//! locator inventory, built once in `new`. Shared chrome (sidebar, cookie
//! banner) lives in [`Shell`], which every screen composes by value and
//! delegates to. Field access on lists and tables goes through named enums
//! ([`EmailField`], [`CustomerColumn`], [`OrderColumn`], [`ProfileField`])
//! so positional knowledge is declared in one place per screen.

#![warn(missing_docs)]

mod customers;
mod home;
mod inbox;
mod settings;
mod shell;

use async_trait::async_trait;
use esperar::EsperarResult;

pub use customers::{CustomerColumn, CustomersScreen, PageControl};
pub use home::{HomeScreen, OrderColumn, StatCard};
pub use inbox::{EmailField, InboxScreen, InboxTab};
pub use settings::{ProfileField, SettingsScreen, SettingsSection};
pub use shell::Shell;

/// Common surface of every dashboard screen.
#[async_trait]
pub trait Screen {
    /// The screen's path below the base URL.
    fn path(&self) -> &'static str;

    /// The screen's absolute URL.
    fn url(&self) -> String;

    /// Navigate the session to this screen.
    async fn goto(&self) -> EsperarResult<()>;

    /// Assert the screen's landmark elements have rendered.
    async fn verify_loaded(&self) -> EsperarResult<()>;
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}
