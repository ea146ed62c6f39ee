//! Driver surface: the external browser session the core consumes.
//!
//! Write operations are fire-and-forget from the core's perspective: a
//! click or fill returns nothing useful, and its effect is observed only via
//! subsequent assertions. Read operations go through `SnapshotSource`.
//!
//! `MockDriver` is the scripted in-process implementation used by unit and
//! integration tests: per-URL trees, timed tree transitions for exercising
//! the retry engine, and a dispatch journal for verifying interactions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::locator::Locator;
use crate::result::{EsperarError, EsperarResult};
use crate::snapshot::{resolve, SnapshotSource};
use crate::tree::PageTree;

/// One input event dispatched at the single element a locator matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    /// Single click
    Click,
    /// Double click
    DoubleClick,
    /// Replace the control's value with the given text
    Fill(String),
    /// Clear the control's value
    Clear,
    /// Press a named key (e.g. "Enter")
    Press(String),
    /// Check a checkbox-like control
    Check,
    /// Uncheck a checkbox-like control
    Uncheck,
}

impl InputAction {
    fn describe(&self) -> String {
        match self {
            Self::Click => "click".to_string(),
            Self::DoubleClick => "dblclick".to_string(),
            Self::Fill(text) => format!("fill({text})"),
            Self::Clear => "clear".to_string(),
            Self::Press(key) => format!("press({key})"),
            Self::Check => "check".to_string(),
            Self::Uncheck => "uncheck".to_string(),
        }
    }
}

/// A live browser session: navigation, input dispatch, and snapshots.
///
/// One driver per test session; page objects borrow it and never own its
/// lifetime.
#[async_trait]
pub trait Driver: SnapshotSource {
    /// Navigate to a URL.
    async fn navigate(&self, url: &str) -> EsperarResult<()>;

    /// The session's current URL.
    async fn current_url(&self) -> EsperarResult<String>;

    /// Dispatch one input event at the element `target` matches.
    ///
    /// The target is resolved freshly and must match exactly one visible
    /// element; zero matches fail `ResolutionEmpty` and several fail
    /// `AmbiguousMatch`.
    async fn dispatch(&self, target: &Locator, action: InputAction) -> EsperarResult<()>;
}

struct MockState {
    url: String,
    tree: PageTree,
    routes: HashMap<String, PageTree>,
    pending: Vec<(tokio::time::Instant, PageTree)>,
    journal: Vec<String>,
    closed: bool,
}

/// Scripted driver for tests.
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Driver whose session currently shows `tree`.
    #[must_use]
    pub fn with_tree(tree: PageTree) -> Self {
        Self {
            state: Mutex::new(MockState {
                url: String::new(),
                tree,
                routes: HashMap::new(),
                pending: Vec::new(),
                journal: Vec::new(),
                closed: false,
            }),
        }
    }

    /// Register the tree that navigating to `url` renders. Navigating to a
    /// URL with no registered route fails `NavigationError`.
    pub fn route(&self, url: impl Into<String>, tree: PageTree) {
        let mut state = self.state.lock().unwrap();
        let _ = state.routes.insert(url.into(), tree);
    }

    /// Replace the current tree immediately (the scripted "app response").
    pub fn set_tree(&self, tree: PageTree) {
        self.state.lock().unwrap().tree = tree;
    }

    /// Swap in `tree` once `after` has elapsed on the tokio clock. Later
    /// snapshots observe the swap; earlier ones do not.
    pub fn schedule_tree(&self, after: Duration, tree: PageTree) {
        let deadline = tokio::time::Instant::now() + after;
        self.state.lock().unwrap().pending.push((deadline, tree));
    }

    /// Close the session; every later call fails `DriverUnavailable`.
    pub fn close(&self) {
        self.state.lock().unwrap().closed = true;
    }

    /// Everything dispatched so far, in order.
    #[must_use]
    pub fn journal(&self) -> Vec<String> {
        self.state.lock().unwrap().journal.clone()
    }

    /// Whether any journal entry starts with `prefix`.
    #[must_use]
    pub fn saw(&self, prefix: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .journal
            .iter()
            .any(|entry| entry.starts_with(prefix))
    }

    fn apply_pending(state: &mut MockState) {
        let now = tokio::time::Instant::now();
        // Apply in scheduling order so the latest due swap wins.
        let mut index = 0;
        while index < state.pending.len() {
            if state.pending[index].0 <= now {
                let (_, tree) = state.pending.remove(index);
                state.tree = tree;
            } else {
                index += 1;
            }
        }
    }

    fn checked_state<'s>(
        state: &'s mut std::sync::MutexGuard<'_, MockState>,
    ) -> EsperarResult<&'s mut MockState> {
        if state.closed {
            return Err(EsperarError::DriverUnavailable {
                message: "session closed".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl SnapshotSource for MockDriver {
    async fn snapshot(&self) -> EsperarResult<PageTree> {
        let mut guard = self.state.lock().unwrap();
        let state = Self::checked_state(&mut guard)?;
        Self::apply_pending(state);
        Ok(state.tree.clone())
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&self, url: &str) -> EsperarResult<()> {
        let mut guard = self.state.lock().unwrap();
        let state = Self::checked_state(&mut guard)?;
        let Some(tree) = state.routes.get(url).cloned() else {
            return Err(EsperarError::NavigationError {
                url: url.to_string(),
                message: "no route registered for this URL".to_string(),
            });
        };
        state.journal.push(format!("navigate:{url}"));
        state.url = url.to_string();
        state.tree = tree;
        tracing::debug!(target: "esperar::driver", url, "navigated");
        Ok(())
    }

    async fn current_url(&self) -> EsperarResult<String> {
        let mut guard = self.state.lock().unwrap();
        let state = Self::checked_state(&mut guard)?;
        Ok(state.url.clone())
    }

    async fn dispatch(&self, target: &Locator, action: InputAction) -> EsperarResult<()> {
        let mut guard = self.state.lock().unwrap();
        let state = Self::checked_state(&mut guard)?;
        Self::apply_pending(state);

        let id = {
            let set = resolve(&state.tree, target);
            let id = set.only(target)?;
            if !state.tree.is_visible(id) {
                return Err(EsperarError::InputError {
                    message: format!("target `{target}` is not visible"),
                });
            }
            if !state.tree.get(id).enabled {
                return Err(EsperarError::InputError {
                    message: format!("target `{target}` is disabled"),
                });
            }
            id
        };

        match &action {
            InputAction::Fill(text) => {
                state.tree.get_mut(id).value = Some(text.clone());
            }
            InputAction::Clear => {
                state.tree.get_mut(id).value = Some(String::new());
            }
            InputAction::Check => {
                state.tree.get_mut(id).checked = Some(true);
            }
            InputAction::Uncheck => {
                state.tree.get_mut(id).checked = Some(false);
            }
            InputAction::Click | InputAction::DoubleClick | InputAction::Press(_) => {
                // Effects of clicks and key presses are scripted by the test
                // via set_tree/route; the driver only journals them.
            }
        }
        let entry = format!("{}:{}", action.describe(), target.describe());
        tracing::debug!(target: "esperar::driver", action = %entry, "dispatched");
        state.journal.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::TextPattern;
    use crate::tree::node;

    fn form_tree() -> PageTree {
        PageTree::build(
            node("form")
                .child(node("input").attr("placeholder", "Filter emails..."))
                .child(node("input").role("checkbox").checked(false))
                .child(node("button").role("button").text("Save changes"))
                .child(node("button").role("button").text("Delete").disabled()),
        )
    }

    mod dispatch_tests {
        use super::*;

        #[tokio::test]
        async fn test_fill_updates_value() {
            let driver = MockDriver::with_tree(form_tree());
            let field = Locator::by_placeholder("Filter emails...");
            driver
                .dispatch(&field, InputAction::Fill("Alex".to_string()))
                .await
                .unwrap();

            let tree = driver.snapshot().await.unwrap();
            let id = resolve(&tree, &field).only(&field).unwrap();
            assert_eq!(tree.get(id).value.as_deref(), Some("Alex"));
        }

        #[tokio::test]
        async fn test_check_and_uncheck() {
            let driver = MockDriver::with_tree(form_tree());
            let checkbox = Locator::by_role("checkbox");
            driver.dispatch(&checkbox, InputAction::Check).await.unwrap();
            let tree = driver.snapshot().await.unwrap();
            let id = resolve(&tree, &checkbox).only(&checkbox).unwrap();
            assert_eq!(tree.get(id).checked, Some(true));

            driver
                .dispatch(&checkbox, InputAction::Uncheck)
                .await
                .unwrap();
            let tree = driver.snapshot().await.unwrap();
            let id = resolve(&tree, &checkbox).only(&checkbox).unwrap();
            assert_eq!(tree.get(id).checked, Some(false));
        }

        #[tokio::test]
        async fn test_click_is_journaled() {
            let driver = MockDriver::with_tree(form_tree());
            let button = Locator::by_role_named("button", TextPattern::exact("Save changes"));
            driver.dispatch(&button, InputAction::Click).await.unwrap();
            assert!(driver.saw("click:role=button"));
        }

        #[tokio::test]
        async fn test_double_click_and_press_are_journaled() {
            let driver = MockDriver::with_tree(form_tree());
            let field = Locator::by_placeholder("Filter emails...");
            driver
                .dispatch(&field, InputAction::DoubleClick)
                .await
                .unwrap();
            driver
                .dispatch(&field, InputAction::Press("Enter".to_string()))
                .await
                .unwrap();
            assert!(driver.saw("dblclick:placeholder=Filter emails..."));
            assert!(driver.saw("press(Enter):placeholder=Filter emails..."));
        }

        #[tokio::test]
        async fn test_disabled_target_rejects_input() {
            let driver = MockDriver::with_tree(form_tree());
            let button = Locator::by_role_named("button", TextPattern::exact("Delete"));
            let err = driver
                .dispatch(&button, InputAction::Click)
                .await
                .unwrap_err();
            assert!(matches!(err, EsperarError::InputError { .. }));
        }

        #[tokio::test]
        async fn test_ambiguous_target_is_loud() {
            let driver = MockDriver::with_tree(form_tree());
            let any_button = Locator::by_role("button");
            let err = driver
                .dispatch(&any_button, InputAction::Click)
                .await
                .unwrap_err();
            assert!(matches!(err, EsperarError::AmbiguousMatch { count: 2, .. }));
        }

        #[tokio::test]
        async fn test_missing_target_is_resolution_empty() {
            let driver = MockDriver::with_tree(form_tree());
            let missing = Locator::by_test_id("nope");
            let err = driver
                .dispatch(&missing, InputAction::Click)
                .await
                .unwrap_err();
            assert!(matches!(err, EsperarError::ResolutionEmpty { .. }));
        }
    }

    mod session_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigation_switches_routed_tree() {
            let driver = MockDriver::with_tree(form_tree());
            driver.route(
                "https://app.test/inbox",
                PageTree::build(node("h1").role("heading").text("Inbox")),
            );
            driver.navigate("https://app.test/inbox").await.unwrap();
            assert_eq!(
                driver.current_url().await.unwrap(),
                "https://app.test/inbox"
            );
            let tree = driver.snapshot().await.unwrap();
            assert_eq!(tree.inner_text(tree.root()), "Inbox");
        }

        #[tokio::test]
        async fn test_unrouted_navigation_fails() {
            let driver = MockDriver::with_tree(form_tree());
            let err = driver
                .navigate("https://app.test/missing")
                .await
                .unwrap_err();
            assert!(matches!(err, EsperarError::NavigationError { .. }));
            // The session keeps showing the previous tree.
            let tree = driver.snapshot().await.unwrap();
            assert_eq!(tree.get(tree.root()).tag, "form");
        }

        #[tokio::test]
        async fn test_closed_session_is_unavailable_everywhere() {
            let driver = MockDriver::with_tree(form_tree());
            driver.close();
            assert!(matches!(
                driver.snapshot().await.unwrap_err(),
                EsperarError::DriverUnavailable { .. }
            ));
            assert!(matches!(
                driver.navigate("https://app.test/").await.unwrap_err(),
                EsperarError::DriverUnavailable { .. }
            ));
            assert!(matches!(
                driver
                    .dispatch(&Locator::by_role("button"), InputAction::Click)
                    .await
                    .unwrap_err(),
                EsperarError::DriverUnavailable { .. }
            ));
        }

        #[tokio::test(start_paused = true)]
        async fn test_scheduled_tree_is_invisible_until_due() {
            let driver = MockDriver::with_tree(form_tree());
            driver.schedule_tree(
                Duration::from_millis(200),
                PageTree::build(node("h1").text("Later")),
            );
            let before = driver.snapshot().await.unwrap();
            assert_eq!(before.get(before.root()).tag, "form");

            tokio::time::sleep(Duration::from_millis(250)).await;
            let after = driver.snapshot().await.unwrap();
            assert_eq!(after.get(after.root()).tag, "h1");
        }
    }
}
