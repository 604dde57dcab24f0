//! Error records with HTTP semantics.
//!
//! An [`HttpFault`] is a [`Fault`] plus a required [`HttpStatus`]. It is
//! built through the catalog constructors (`HttpFault::bad_request()`,
//! `HttpFault::not_found()`, ..., generated by the status catalog) or
//! through [`HttpFault::with_status`]; there is no free-form numeric entry,
//! so every record holds a cataloged status.
//!
//! Composition, not inheritance: [`HttpFaultBuilder`] wraps a
//! [`FaultBuilder`] and forwards the shared configuration steps, then
//! stamps the status alongside the base record. When no code is supplied
//! the status class decides the default: `CLIENT_ERROR` for 4xx,
//! `SERVER_ERROR` for 5xx.
//!
//! ```rust
//! use faultkit::HttpFault;
//!
//! let fault = HttpFault::not_found()
//!     .message("no such user")
//!     .context("user_id", 814)
//!     .build();
//!
//! assert_eq!(fault.status().as_u16(), 404);
//! assert_eq!(fault.code(), "CLIENT_ERROR");
//! ```

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde_json::Value;

use crate::record::{CauseChain, Context, Fault, FaultBuilder};
use crate::status::HttpStatus;
use crate::template::TemplateError;

// ============================================================================
// HttpFault
// ============================================================================

/// Immutable record of a failure with an HTTP status attached.
///
/// Everything a [`Fault`] carries, plus a required [`HttpStatus`]. The
/// status participates in boundary resolution but never in the wire body;
/// [`Projection`](crate::Projection) has no status field.
#[derive(Debug, Clone)]
#[must_use = "faults should be returned, logged, or projected"]
pub struct HttpFault {
    record: Fault,
    status: HttpStatus,
}

impl HttpFault {
    /// Builder seeded with an explicit catalog status.
    ///
    /// The named catalog constructors are usually more direct; this is the
    /// entry point when the status arrives as data.
    #[inline]
    pub fn with_status(status: HttpStatus) -> HttpFaultBuilder {
        HttpFaultBuilder {
            inner: FaultBuilder::default(),
            status,
        }
    }

    /// The HTTP status attached at construction.
    #[inline]
    pub fn status(&self) -> HttpStatus {
        self.status
    }

    /// Unique identity of this occurrence.
    #[inline]
    pub fn id(&self) -> uuid::Uuid {
        self.record.id()
    }

    /// Creation instant, UTC.
    #[inline]
    pub fn timestamp(&self) -> chrono::DateTime<chrono::Utc> {
        self.record.timestamp()
    }

    /// Machine-readable code; class-derived unless overridden.
    #[inline]
    pub fn code(&self) -> &str {
        self.record.code()
    }

    /// Human-readable message, empty when never supplied.
    #[inline]
    pub fn message(&self) -> &str {
        self.record.message()
    }

    /// Attached context, `None` when never set.
    #[inline]
    pub fn context(&self) -> Option<&Context> {
        self.record.context()
    }

    /// Underlying error, if one was attached.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + 'static)> {
        self.record.cause()
    }

    /// Walk the cause and its transitive sources, outermost first.
    #[inline]
    pub fn cause_chain(&self) -> CauseChain<'_> {
        self.record.cause_chain()
    }

    /// The status-free view of this record.
    #[inline]
    pub fn as_fault(&self) -> &Fault {
        &self.record
    }

    /// Discard the status, keeping the base record.
    #[inline]
    pub fn into_fault(self) -> Fault {
        self.record
    }
}

impl fmt::Display for HttpFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.record)
    }
}

impl Error for HttpFault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.record.cause()
    }
}

// ============================================================================
// HttpFaultBuilder
// ============================================================================

/// Chainable configuration for an [`HttpFault`].
///
/// Same contract as [`FaultBuilder`]: setters move the builder,
/// [`build`](Self::build) borrows and can stamp any number of records with
/// identical content and fresh identity.
#[derive(Debug, Clone)]
#[must_use = "builders do nothing until build() is called"]
pub struct HttpFaultBuilder {
    inner: FaultBuilder,
    status: HttpStatus,
}

impl HttpFaultBuilder {
    /// Override the class-derived code.
    pub fn code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.inner = self.inner.code(code);
        self
    }

    /// Set the message verbatim.
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.inner = self.inner.message(message);
        self
    }

    /// Set the message from a template; see [`template::render`].
    ///
    /// # Errors
    ///
    /// Propagates [`TemplateError`] from the construction site.
    ///
    /// [`template::render`]: crate::template::render
    pub fn message_fmt(
        mut self,
        template: &str,
        args: &[&dyn fmt::Display],
    ) -> Result<Self, TemplateError> {
        self.inner = self.inner.message_fmt(template, args)?;
        Ok(self)
    }

    /// Attach one context entry; repeated keys overwrite.
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner = self.inner.context(key, value);
        self
    }

    /// Merge a batch of context entries, entry by entry.
    pub fn context_map<K, V, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.inner = self.inner.context_map(entries);
        self
    }

    /// Attach the underlying error this record describes.
    pub fn cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.inner = self.inner.cause(cause);
        self
    }

    /// Stamp a record, deriving the default code from the status class.
    pub fn build(&self) -> HttpFault {
        HttpFault {
            record: self
                .inner
                .build_with_default(self.status.class().default_code()),
            status: self.status,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
