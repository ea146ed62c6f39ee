//! Auto-retrying assertion engine.
//!
//! The poll loop re-resolves the locator and re-evaluates the predicate from
//! a fresh snapshot on every iteration, never from a stale set, since the
//! DOM may have re-rendered between polls. Success returns immediately on the
//! first satisfied poll. On a miss the loop checks elapsed time after the
//! in-flight resolve completes (there is no mid-poll interruption), then
//! yields for one poll interval.
//!
//! Timing runs on the tokio clock, so tests can drive the engine under a
//! paused clock deterministically.

use std::time::Duration;

use crate::locator::{Locator, TextPattern};
use crate::predicate::Predicate;
use crate::result::{EsperarError, EsperarResult};
use crate::snapshot::{resolve, SnapshotSource};

/// Default assertion timeout (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Timeout + poll-interval pair governing one assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total window before the assertion fails
    pub timeout: Duration,
    /// Sleep between polls
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy with a custom timeout and the default poll interval. Callers
    /// need longer windows for operations with network-bound side effects.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Poll until `predicate` holds for `locator` or the window closes.
///
/// A `DriverUnavailable` from the snapshot source is fatal and propagates
/// without retrying.
pub async fn wait_for<S: SnapshotSource + ?Sized>(
    source: &S,
    locator: &Locator,
    predicate: &Predicate,
    policy: RetryPolicy,
) -> EsperarResult<()> {
    let start = tokio::time::Instant::now();
    loop {
        let tree = source.snapshot().await?;
        let set = resolve(&tree, locator);
        let verdict = predicate.evaluate(&set);
        if verdict.holds {
            tracing::debug!(
                target: "esperar::retry",
                locator = %locator,
                predicate = %predicate,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "assertion satisfied"
            );
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.timeout {
            return Err(EsperarError::AssertionTimeout {
                expected: predicate.to_string(),
                observed: verdict.observed,
                target: locator.describe(),
                elapsed_ms: elapsed.as_millis() as u64,
            });
        }

        tracing::trace!(
            target: "esperar::retry",
            locator = %locator,
            observed = %verdict.observed,
            "not yet satisfied, polling again"
        );
        tokio::time::sleep(policy.poll_interval).await;
    }
}

/// Start an auto-retrying expectation for a locator.
pub fn expect<'a, S: SnapshotSource + ?Sized>(source: &'a S, locator: &Locator) -> Expect<'a, S> {
    Expect {
        source,
        locator: locator.clone(),
        policy: RetryPolicy::default(),
    }
}

/// Fluent assertion builder; each terminal method runs the retry engine.
#[derive(Debug)]
pub struct Expect<'a, S: ?Sized> {
    source: &'a S,
    locator: Locator,
    policy: RetryPolicy,
}

impl<'a, S: SnapshotSource + ?Sized> Expect<'a, S> {
    /// Override the timeout for this assertion only.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.policy.timeout = timeout;
        self
    }

    /// Override the poll interval for this assertion only.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.policy.poll_interval = interval;
        self
    }

    /// Flip to the negated assertion set.
    ///
    /// Named `not` rather than `std::ops::Not` to read like the assertion
    /// APIs this mirrors.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> NegatedExpect<'a, S> {
        NegatedExpect(self)
    }

    async fn run(self, predicate: Predicate) -> EsperarResult<()> {
        wait_for(self.source, &self.locator, &predicate, self.policy).await
    }

    /// Assert at least one match is rendered.
    pub async fn to_be_visible(self) -> EsperarResult<()> {
        self.run(Predicate::IsVisible).await
    }

    /// Assert no match is rendered; absence satisfies this immediately.
    pub async fn to_be_hidden(self) -> EsperarResult<()> {
        self.run(Predicate::IsHidden).await
    }

    /// Assert some match's inner text matches ("contains" by default).
    pub async fn to_contain_text(self, pattern: impl Into<TextPattern>) -> EsperarResult<()> {
        self.run(Predicate::ContainsText(pattern.into())).await
    }

    /// Assert some match's inner text equals the string exactly.
    pub async fn to_have_text(self, text: impl Into<String>) -> EsperarResult<()> {
        self.run(Predicate::HasText(text.into())).await
    }

    /// Assert every match carries the attribute with the given value.
    pub async fn to_have_attribute(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> EsperarResult<()> {
        self.run(Predicate::HasAttribute {
            name: name.into(),
            value: value.into(),
        })
        .await
    }

    /// Assert every match is checked.
    pub async fn to_be_checked(self) -> EsperarResult<()> {
        self.run(Predicate::IsChecked).await
    }

    /// Assert every match accepts input.
    pub async fn to_be_enabled(self) -> EsperarResult<()> {
        self.run(Predicate::IsEnabled).await
    }

    /// Assert every match rejects input.
    pub async fn to_be_disabled(self) -> EsperarResult<()> {
        self.run(Predicate::IsDisabled).await
    }

    /// Assert the match count is exactly `count`.
    pub async fn to_have_count(self, count: usize) -> EsperarResult<()> {
        self.run(Predicate::CountEquals(count)).await
    }

    /// Assert every match's input value equals the string.
    pub async fn to_have_value(self, value: impl Into<String>) -> EsperarResult<()> {
        self.run(Predicate::HasValue(value.into())).await
    }
}

/// Negated expectations. Only conditions with a well-defined negative form
/// are offered; a missing element never silently satisfies "unchecked" or
/// "not containing".
#[derive(Debug)]
pub struct NegatedExpect<'a, S: ?Sized>(Expect<'a, S>);

impl<'a, S: SnapshotSource + ?Sized> NegatedExpect<'a, S> {
    /// Assert no match is rendered (same as `to_be_hidden`).
    pub async fn to_be_visible(self) -> EsperarResult<()> {
        self.0.run(Predicate::IsHidden).await
    }

    /// Assert at least one match exists and none is checked.
    pub async fn to_be_checked(self) -> EsperarResult<()> {
        self.0.run(Predicate::IsUnchecked).await
    }

    /// Assert at least one match exists and all reject input.
    pub async fn to_be_enabled(self) -> EsperarResult<()> {
        self.0.run(Predicate::IsDisabled).await
    }

    /// Assert at least one match exists and none's text matches.
    pub async fn to_contain_text(self, pattern: impl Into<TextPattern>) -> EsperarResult<()> {
        self.0.run(Predicate::LacksText(pattern.into())).await
    }

    /// Assert at least one match exists and none's text equals the string.
    pub async fn to_have_text(self, text: impl Into<String>) -> EsperarResult<()> {
        self.0
            .run(Predicate::LacksText(TextPattern::exact(text.into())))
            .await
    }
}
