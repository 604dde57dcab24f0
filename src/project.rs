//! The wire projection.
//!
//! [`Projection`] is the only sanctioned external shape for a failure:
//!
//! ```json
//! {
//!   "id": "3c6e0b8a-9c15-4a19-a3c6-0b8a9c154a19",
//!   "timestamp": "2025-11-04T17:23:05.114210Z",
//!   "code": "CLIENT_ERROR",
//!   "message": "bad input",
//!   "context": { "field": "cursor" }
//! }
//! ```
//!
//! `context` is omitted when the record never had one. There is no status
//! field (the status travels out-of-band, e.g. as the HTTP response code)
//! and no cause field at all; internal diagnostics end at this boundary.
//!
//! [`project`] is the one-call resolution a handling layer needs: verdict
//! from the [`Classifier`], body from the record (or synthesized for a
//! foreign failure), returned together as `(Projection, HttpStatus)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{Classifier, Failure};
use crate::http::HttpFault;
use crate::record::{Context, Fault, clock};
use crate::status::HttpStatus;

// ============================================================================
// Projection
// ============================================================================

/// JSON-ready view of a failure.
///
/// Plain owned data: serializable, deserializable (clients parse these
/// too), comparable. Field names and order are the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Identity of the failure occurrence.
    pub id: Uuid,
    /// Creation instant, RFC 3339 / ISO-8601 UTC on the wire.
    pub timestamp: DateTime<Utc>,
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Context entries; omitted from JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl Projection {
    /// Field-for-field copy of a record.
    ///
    /// `id`, `timestamp`, `code`, `message`, and `context` carry over
    /// unchanged; the record's cause does not exist in this shape.
    #[must_use]
    pub fn of(fault: &Fault) -> Self {
        Self {
            id: fault.id(),
            timestamp: fault.timestamp(),
            code: fault.code().to_owned(),
            message: fault.message().to_owned(),
            context: fault.context().cloned(),
        }
    }

    /// Fresh shape for a failure that never was a record.
    ///
    /// Stamps a new id and timestamp; context stays absent.
    pub(crate) fn synthesized(code: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: clock::now(),
            code,
            message,
            context: None,
        }
    }
}

impl From<&Fault> for Projection {
    #[inline]
    fn from(fault: &Fault) -> Self {
        Self::of(fault)
    }
}

impl From<&HttpFault> for Projection {
    #[inline]
    fn from(fault: &HttpFault) -> Self {
        Self::of(fault.as_fault())
    }
}

// ============================================================================
// Boundary Resolution
// ============================================================================

/// Resolve one failure into its wire body and transport status.
///
/// - A structured HTTP record projects its own fields and supplies its own
///   status.
/// - A plain structured record projects its own fields (including its own
///   code) and resolves to 500; no status semantics were ever attached.
/// - A foreign failure gets a synthesized body: fresh id and timestamp, the
///   failure's rendered message, no context, and the classifier's code.
///
/// Pure and synchronous; nothing is logged, stored, or retried here.
///
/// # Example
///
/// ```rust
/// use faultkit::{project, Classifier, Failure, HttpFault};
///
/// let fault = HttpFault::bad_request().message("bad input").build();
/// let (body, status) = project(&Classifier::new(), &Failure::from(&fault));
///
/// assert_eq!(status.as_u16(), 400);
/// assert_eq!(body.code, "CLIENT_ERROR");
/// assert_eq!(body.message, "bad input");
/// ```
#[must_use]
pub fn project(classifier: &Classifier, failure: &Failure<'_>) -> (Projection, HttpStatus) {
    let verdict = classifier.classify(failure);
    let body = match failure {
        Failure::Http(fault) => Projection::of(fault.as_fault()),
        Failure::Plain(fault) => Projection::of(fault),
        Failure::Foreign { error, .. } => {
            Projection::synthesized(verdict.code.clone().into_owned(), error.to_string())
        }
    };
    (body, verdict.status)
}

// ============================================================================
// Tests
// ============================================================================
