//! Esperar: resilient query-and-verification for acceptance-testing dynamic
//! web UIs.
//!
//! Esperar (Spanish: "to wait / to expect") lets a test author assert facts
//! about on-screen state ("this email is visible", "this table has 7
//! columns", "this tab is selected") without being defeated by rendering
//! races, transient DOM nodes, or structurally ambiguous markup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Page Object (consumer)                                       │
//! │    holds Locators, delegates navigation, extracts fields      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  expect() ── retry engine ── Predicate                        │
//! │      │  fresh resolve + evaluate every poll                   │
//! │  Locator ── resolve() ── ResolvedSet                          │
//! │      │  pure description, re-resolved on every use            │
//! │  SnapshotSource / Driver                                      │
//! │      current render state, no caching between calls           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use esperar::{expect, node, Locator, MockDriver, PageTree};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> esperar::EsperarResult<()> {
//! let driver = MockDriver::with_tree(PageTree::build(
//!     node("main").child(node("h1").role("heading").text("Inbox")),
//! ));
//!
//! let heading = Locator::by_role("heading");
//! expect(&driver, &heading).to_be_visible().await?;
//! expect(&driver, &heading).to_contain_text("Inbox").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod driver;
mod locator;
mod predicate;
mod result;
mod retry;
mod snapshot;
mod tree;

pub use driver::{Driver, InputAction, MockDriver};
pub use locator::{Locator, Step, TextPattern};
pub use predicate::{Predicate, Verdict};
pub use result::{EsperarError, EsperarResult};
pub use retry::{
    expect, wait_for, Expect, NegatedExpect, RetryPolicy, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS,
};
pub use snapshot::{attribute_of, count_of, resolve, text_of, value_of, ResolvedSet, SnapshotSource};
pub use tree::{node, NodeBuilder, NodeId, PageNode, PageTree};
