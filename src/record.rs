//! The immutable error record and its builder.
//!
//! A [`Fault`] is a point-in-time description of a failure: identity
//! (`id`), creation instant (`timestamp`), a machine-readable `code`, a
//! human-readable `message`, optional key/value `context`, and an optional
//! underlying `cause`. Once built it never changes.
//!
//! # Identity and time
//!
//! Every `build()` stamps a fresh v4 UUID and a fresh UTC timestamp.
//! Timestamps come from a process-wide clock that clamps to the latest
//! instant it has handed out, so records constructed in causal order carry
//! non-decreasing timestamps even across a small wall-clock step.
//!
//! # Diagnostics stay inside
//!
//! `cause` exists for operators and logs. Neither [`Fault`] nor
//! [`HttpFault`] implements `Serialize`; the only sanctioned wire shape is
//! [`Projection`], which has no cause field at all.
//!
//! # Example
//!
//! ```rust
//! use faultkit::Fault;
//!
//! let fault = Fault::builder()
//!     .code("QUOTA_EXHAUSTED")
//!     .message("monthly quota exhausted")
//!     .context("limit", 10_000)
//!     .build();
//!
//! assert_eq!(fault.code(), "QUOTA_EXHAUSTED");
//! assert_eq!(fault.context().unwrap()["limit"], 10_000);
//! ```
//!
//! [`HttpFault`]: crate::HttpFault
//! [`Projection`]: crate::Projection

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::template::{self, TemplateError};

// ============================================================================
// Constants and Aliases
// ============================================================================

/// Code applied when a record is built without one.
pub const DEFAULT_CODE: &str = "ERROR";

/// Key/value context attached to a record.
///
/// Keys are plain strings, values arbitrary JSON. Ordered by key so that
/// two records with the same entries render identically.
pub type Context = BTreeMap<String, Value>;

/// Shared handle to an underlying error.
///
/// `Arc` rather than `Box` so a builder can be rebuilt without giving up
/// its cause and so clones of a record stay cheap.
pub(crate) type SharedCause = Arc<dyn Error + Send + Sync + 'static>;

// ============================================================================
// Monotonic Clock
// ============================================================================

pub(crate) mod clock {
    //! Process-wide record clock.
    //!
    //! Wall clock truncated to microseconds, clamped through an atomic max
    //! so two causally ordered reads never go backwards. Reads in the same
    //! microsecond, or reads during a wall-clock regression, may be equal.

    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{DateTime, Utc};

    static LAST_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

    /// Current instant, never earlier than any instant previously returned.
    pub(crate) fn now() -> DateTime<Utc> {
        let wall = Utc::now();
        let wall_micros = wall.timestamp_micros();
        let prev = LAST_MICROS.fetch_max(wall_micros, Ordering::AcqRel);
        let micros = wall_micros.max(prev);
        DateTime::from_timestamp_micros(micros).unwrap_or(wall)
    }

}

// ============================================================================
// Fault
// ============================================================================

/// Immutable record of a single failure occurrence.
///
/// Construct through [`Fault::builder`] or the one-shot [`Fault::new`] /
/// [`Fault::formatted`] factories. `id`, `timestamp`, `code`, and `message`
/// are always present; `context` and `cause` only when supplied.
///
/// `Fault` implements [`std::error::Error`], so it slots into ordinary
/// `Result` plumbing; the crate-level [`Result`](crate::Result) alias uses
/// it as the default error type. It carries no behavior beyond its data.
#[derive(Debug, Clone)]
#[must_use = "faults should be returned, logged, or projected"]
pub struct Fault {
    id: Uuid,
    timestamp: DateTime<Utc>,
    code: Cow<'static, str>,
    message: Cow<'static, str>,
    context: Option<Context>,
    cause: Option<SharedCause>,
}

impl Fault {
    /// Start configuring a record.
    #[inline]
    pub fn builder() -> FaultBuilder {
        FaultBuilder::default()
    }

    /// One-shot record with the default `ERROR` code.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use faultkit::Fault;
    /// let fault = Fault::new("disk scan failed");
    /// assert_eq!(fault.code(), "ERROR");
    /// assert_eq!(fault.message(), "disk scan failed");
    /// ```
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::builder().message(message).build()
    }

    /// One-shot record with a templated message.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the template and arguments disagree;
    /// see [`template::render`].
    ///
    /// # Example
    ///
    /// ```rust
    /// # use faultkit::{fmt_args, Fault};
    /// let fault = Fault::formatted("This is my %s.", fmt_args!["message"]).unwrap();
    /// assert_eq!(fault.message(), "This is my message.");
    /// ```
    pub fn formatted(template: &str, args: &[&dyn fmt::Display]) -> Result<Self, TemplateError> {
        Ok(Self::builder().message_fmt(template, args)?.build())
    }

    /// Unique identity of this occurrence.
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Creation instant, UTC, microsecond granularity.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Machine-readable code, `"ERROR"` unless overridden.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable message, empty when never supplied.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attached context, `None` when never set.
    ///
    /// Absent and empty are distinct states: a record built without any
    /// `context(..)` call reports `None`, not an empty map.
    #[inline]
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Underlying error, if one was attached.
    pub fn cause(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as _)
    }

    /// Walk the cause and its transitive sources, outermost first.
    ///
    /// Empty when no cause is attached. Diagnostic only; nothing from this
    /// chain ever reaches a [`Projection`](crate::Projection).
    pub fn cause_chain(&self) -> CauseChain<'_> {
        CauseChain { next: self.cause() }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause()
    }
}

// ============================================================================
// Cause Chain Iterator
// ============================================================================

/// Iterator over a record's cause and its transitive `source()` links.
///
/// Returned by [`Fault::cause_chain`].
#[derive(Debug, Clone)]
pub struct CauseChain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> CauseChain<'a> {
    /// Chain beginning at an arbitrary link. The reporting layer uses this
    /// to walk foreign errors with the same iterator records use.
    pub(crate) fn starting_at(first: Option<&'a (dyn Error + 'static)>) -> Self {
        Self { next: first }
    }
}

impl<'a> Iterator for CauseChain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.source();
        Some(current)
    }
}

// ============================================================================
// FaultBuilder
// ============================================================================

/// Chainable configuration for a [`Fault`].
///
/// Setters take and return the builder by value. [`build`](Self::build)
/// borrows, so a configured builder can stamp any number of records:
/// content is identical across rebuilds, while `id` and `timestamp` are
/// fresh every time.
///
/// ```rust
/// # use faultkit::Fault;
/// let template = Fault::builder().code("SYNC_FAILED").message("replica out of sync");
/// let first = template.build();
/// let second = template.build();
/// assert_eq!(first.code(), second.code());
/// assert_ne!(first.id(), second.id());
/// ```
#[derive(Debug, Clone, Default)]
#[must_use = "builders do nothing until build() is called"]
pub struct FaultBuilder {
    code: Option<Cow<'static, str>>,
    message: Option<Cow<'static, str>>,
    context: Option<Context>,
    cause: Option<SharedCause>,
}

impl FaultBuilder {
    /// Override the machine-readable code.
    pub fn code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the message verbatim.
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the message from a template; see [`template::render`].
    ///
    /// # Errors
    ///
    /// Fails right here, at the construction site, when the template and
    /// arguments disagree. A mismatch never produces a half-rendered
    /// record.
    pub fn message_fmt(
        self,
        template: &str,
        args: &[&dyn fmt::Display],
    ) -> Result<Self, TemplateError> {
        let rendered = template::render(template, args)?;
        Ok(self.message(rendered))
    }

    /// Attach one context entry; repeated keys overwrite.
    ///
    /// The context map is allocated on the first call, never before.
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context
            .get_or_insert_with(Context::new)
            .insert(key.into(), value.into());
        self
    }

    /// Merge a batch of context entries, entry by entry.
    ///
    /// Same overwrite rule as [`context`](Self::context): later entries win
    /// over earlier ones and over anything already present.
    pub fn context_map<K, V, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let target = self.context.get_or_insert_with(Context::new);
        for (key, value) in entries {
            target.insert(key.into(), value.into());
        }
        self
    }

    /// Attach the underlying error this record describes.
    pub fn cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Stamp a record from the current state.
    ///
    /// Applies the [`DEFAULT_CODE`] when no code was set, copies the
    /// context map (a built record is isolated from later builder
    /// mutation), and stamps fresh `id` and `timestamp` on every call.
    pub fn build(&self) -> Fault {
        self.build_with_default(DEFAULT_CODE)
    }

    /// Like [`build`](Self::build) with a caller-chosen fallback code.
    /// The HTTP layer routes class-derived defaults through here.
    pub(crate) fn build_with_default(&self, default_code: &'static str) -> Fault {
        Fault {
            id: Uuid::new_v4(),
            timestamp: clock::now(),
            code: self.code.clone().unwrap_or(Cow::Borrowed(default_code)),
            message: self.message.clone().unwrap_or(Cow::Borrowed("")),
            context: self.context.clone(),
            cause: self.cause.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt_args;
    use std::io;

    fn io_failure() -> io::Error {
        io::Error::new(io::ErrorKind::ConnectionReset, "peer went away")
    }

    // ------------------------------------------------------------------------
    // Defaults and overrides
    // ------------------------------------------------------------------------

    #[test]
    fn bare_build_applies_defaults() {
        let fault = Fault::builder().build();

        assert_eq!(fault.code(), DEFAULT_CODE);
        assert_eq!(fault.message(), "");
        assert!(fault.context().is_none());
        assert!(fault.cause().is_none());
    }

    #[test]
    fn explicit_code_overrides_default() {
        let fault = Fault::builder().code("QUOTA").build();
        assert_eq!(fault.code(), "QUOTA");
    }

    #[test]
    fn quick_factory_sets_message_and_default_code() {
        let fault = Fault::new("replica out of sync");
        assert_eq!(fault.code(), "ERROR");
        assert_eq!(fault.message(), "replica out of sync");
    }

    // ------------------------------------------------------------------------
    // Identity and time
    // ------------------------------------------------------------------------

    #[test]
    fn every_build_gets_a_unique_id() {
        let builder = Fault::builder().message("same content");
        let first = builder.build();
        let second = builder.build();

        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn rebuild_repeats_content_with_fresh_identity() {
        let builder = Fault::builder()
            .code("SYNC_FAILED")
            .message("replica out of sync")
            .context("replica", 3);

        let first = builder.build();
        let second = builder.build();

        assert_eq!(first.code(), second.code());
        assert_eq!(first.message(), second.message());
        assert_eq!(first.context(), second.context());
        assert_ne!(first.id(), second.id());
        assert!(second.timestamp() >= first.timestamp());
    }

    #[test]
    fn timestamps_do_not_precede_observation() {
        let fault = Fault::new("now-ish");
        assert!(fault.timestamp() <= Utc::now() + chrono::Duration::seconds(1));
    }

    #[test]
    fn timestamps_are_ordered_across_sequential_builds() {
        let mut last = Fault::new("t0").timestamp();
        for _ in 0..100 {
            let next = Fault::new("tn").timestamp();
            assert!(next >= last);
            last = next;
        }
    }

    // ------------------------------------------------------------------------
    // Context semantics
    // ------------------------------------------------------------------------

    #[test]
    fn context_is_absent_until_first_insert() {
        let fault = Fault::builder().message("no context here").build();
        assert!(fault.context().is_none());
    }

    #[test]
    fn single_insert_yields_single_entry() {
        let fault = Fault::builder().context("key", "value").build();

        let context = fault.context().unwrap();
        assert_eq!(context.len(), 1);
        assert_eq!(context["key"], "value");
    }

    #[test]
    fn repeated_key_overwrites() {
        let fault = Fault::builder()
            .context("key", "first")
            .context("key", "second")
            .build();

        let context = fault.context().unwrap();
        assert_eq!(context.len(), 1);
        assert_eq!(context["key"], "second");
    }

    #[test]
    fn bulk_merge_overwrites_entry_by_entry() {
        let fault = Fault::builder()
            .context("kept", 1)
            .context("clobbered", "old")
            .context_map([("clobbered", "new"), ("added", "yes")])
            .build();

        let context = fault.context().unwrap();
        assert_eq!(context.len(), 3);
        assert_eq!(context["kept"], 1);
        assert_eq!(context["clobbered"], "new");
        assert_eq!(context["added"], "yes");
    }

    #[test]
    fn context_accepts_heterogeneous_values() {
        let fault = Fault::builder()
            .context("text", "abc")
            .context("number", 42)
            .context("flag", true)
            .context("nested", serde_json::json!({"a": [1, 2]}))
            .build();

        let context = fault.context().unwrap();
        assert_eq!(context["number"], 42);
        assert_eq!(context["nested"]["a"][1], 2);
    }

    #[test]
    fn built_record_is_isolated_from_later_builder_mutation() {
        let builder = Fault::builder().context("shared", "before");
        let snapshot = builder.build();

        let mutated = builder.context("shared", "after").build();

        assert_eq!(snapshot.context().unwrap()["shared"], "before");
        assert_eq!(mutated.context().unwrap()["shared"], "after");
    }

    // ------------------------------------------------------------------------
    // Message templates
    // ------------------------------------------------------------------------

    #[test]
    fn message_fmt_substitutes_at_construction() {
        let fault = Fault::builder()
            .message_fmt("This is my %s.", fmt_args!["message"])
            .unwrap()
            .build();

        assert_eq!(fault.message(), "This is my message.");
    }

    #[test]
    fn message_fmt_mismatch_fails_before_build() {
        let result = Fault::builder().message_fmt("%s %s", fmt_args!["one"]);
        assert!(result.is_err());
    }

    #[test]
    fn formatted_factory_matches_builder_path() {
        let fault = Fault::formatted("user %s missing", fmt_args!["bob"]).unwrap();
        assert_eq!(fault.message(), "user bob missing");
        assert_eq!(fault.code(), DEFAULT_CODE);
    }

    // ------------------------------------------------------------------------
    // Cause and std::error::Error integration
    // ------------------------------------------------------------------------

    #[test]
    fn cause_is_reachable_through_source() {
        let fault = Fault::builder()
            .message("sync failed")
            .cause(io_failure())
            .build();

        let source = Error::source(&fault).expect("cause should surface as source");
        assert_eq!(source.to_string(), "peer went away");
    }

    #[test]
    fn cause_chain_walks_nested_records() {
        let inner = Fault::builder()
            .code("INNER")
            .message("disk gone")
            .cause(io_failure())
            .build();
        let outer = Fault::builder()
            .code("OUTER")
            .message("sync failed")
            .cause(inner)
            .build();

        let rendered: Vec<String> = outer.cause_chain().map(|e| e.to_string()).collect();
        assert_eq!(rendered, vec!["INNER: disk gone", "peer went away"]);
    }

    #[test]
    fn cause_chain_is_empty_without_cause() {
        assert_eq!(Fault::new("alone").cause_chain().count(), 0);
    }

    #[test]
    fn builder_with_cause_can_still_rebuild() {
        let builder = Fault::builder().cause(io_failure());
        let first = builder.build();
        let second = builder.build();

        assert!(first.cause().is_some());
        assert!(second.cause().is_some());
    }

    // ------------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------------

    #[test]
    fn display_pairs_code_and_message() {
        let fault = Fault::builder().code("QUOTA").message("limit hit").build();
        assert_eq!(fault.to_string(), "QUOTA: limit hit");
    }

    #[test]
    fn display_is_code_only_when_message_empty() {
        let fault = Fault::builder().code("QUOTA").build();
        assert_eq!(fault.to_string(), "QUOTA");
    }
}
