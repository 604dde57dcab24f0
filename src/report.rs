//! Boundary reporting.
//!
//! Projection strips everything diagnostic before a failure leaves the
//! process; this module is the other half of that bargain. [`log_failure`]
//! emits the operator-facing record of what was handled, including the
//! fields the wire shape deliberately omits.
//!
//! Emission is split in two so it stays testable without installing a
//! subscriber: [`FailureSummary::capture`] is a pure borrow-to-owned
//! snapshot of the loggable facts, and [`log_failure`] merely feeds that
//! snapshot to [`tracing`].

use tracing::Level;

use crate::classify::{Failure, FaultCategory};
use crate::record::CauseChain;

// ============================================================================
// Failure summary
// ============================================================================

/// Owned snapshot of the facts a handled failure contributes to the log.
///
/// Fields are `Option` because the three failure shapes carry different
/// amounts of information: foreign errors have no identity or code, and
/// only HTTP-aware records carry a status.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a captured summary should be logged or inspected"]
pub struct FailureSummary {
    /// Which failure shape was handled: `"http"`, `"plain"`, or `"foreign"`.
    pub kind: &'static str,
    /// Record identity, when the failure is a record.
    pub id: Option<uuid::Uuid>,
    /// Machine-facing code, when the failure is a record.
    pub code: Option<String>,
    /// Declared status, when the failure carries one.
    pub status: Option<u16>,
    /// Category tag, when the failure is a tagged foreign error.
    pub category: Option<&'static str>,
    /// Human-facing message.
    pub message: String,
}

impl FailureSummary {
    /// Captures the loggable facts of a failure without emitting anything.
    pub fn capture(failure: &Failure<'_>) -> Self {
        match failure {
            Failure::Http(fault) => Self {
                kind: "http",
                id: Some(fault.id()),
                code: Some(fault.code().to_owned()),
                status: Some(fault.status().as_u16()),
                category: None,
                message: fault.message().to_owned(),
            },
            Failure::Plain(fault) => Self {
                kind: "plain",
                id: Some(fault.id()),
                code: Some(fault.code().to_owned()),
                status: None,
                category: None,
                message: fault.message().to_owned(),
            },
            Failure::Foreign { category, error } => Self {
                kind: "foreign",
                id: None,
                code: None,
                status: None,
                category: category.map(FaultCategory::name),
                message: error.to_string(),
            },
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Logs a handled failure at `error` level with structured fields.
///
/// The event carries the summary fields; absent facts are recorded as
/// empty. When `trace` is enabled, each link of the source chain is
/// additionally emitted as its own `trace` event, deepest link last.
/// Context values are never logged wholesale.
pub fn log_failure(failure: &Failure<'_>) {
    let summary = FailureSummary::capture(failure);
    tracing::error!(
        kind = summary.kind,
        id = summary.id.map(|id| id.to_string()),
        code = summary.code.as_deref(),
        status = summary.status,
        category = summary.category,
        "handled failure: {}",
        summary.message,
    );

    if tracing::enabled!(Level::TRACE) {
        for (depth, link) in source_chain(failure).enumerate() {
            tracing::trace!(depth, "caused by: {link}");
        }
    }
}

/// Source chain of a failure, starting below the failure's own message.
fn source_chain<'a>(failure: &Failure<'a>) -> CauseChain<'a> {
    match failure {
        Failure::Http(fault) => fault.cause_chain(),
        Failure::Plain(fault) => fault.cause_chain(),
        Failure::Foreign { error, .. } => CauseChain::starting_at(error.source()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpFault;
    use crate::record::Fault;

    #[derive(Debug, thiserror::Error)]
    #[error("socket closed")]
    struct SocketClosed;

    #[derive(Debug, thiserror::Error)]
    #[error("fetch failed")]
    struct FetchFailed(#[source] SocketClosed);

    // ------------------------------------------------------------------------
    // Capture
    // ------------------------------------------------------------------------

    #[test]
    fn http_failures_capture_status_code_and_identity() {
        let fault = HttpFault::not_found().message("no such user").build();
        let summary = FailureSummary::capture(&Failure::from(&fault));

        assert_eq!(summary.kind, "http");
        assert_eq!(summary.id, Some(fault.id()));
        assert_eq!(summary.code.as_deref(), Some("CLIENT_ERROR"));
        assert_eq!(summary.status, Some(404));
        assert_eq!(summary.category, None);
        assert_eq!(summary.message, "no such user");
    }

    #[test]
    fn plain_failures_capture_no_status() {
        let fault = Fault::builder().code("LEDGER_STALE").build();
        let summary = FailureSummary::capture(&Failure::from(&fault));

        assert_eq!(summary.kind, "plain");
        assert_eq!(summary.id, Some(fault.id()));
        assert_eq!(summary.code.as_deref(), Some("LEDGER_STALE"));
        assert_eq!(summary.status, None);
        assert_eq!(summary.message, "");
    }

    #[test]
    fn tagged_foreign_failures_capture_the_category_name() {
        let error = SocketClosed;
        let failure = Failure::foreign_tagged(FaultCategory::Upstream, &error);
        let summary = FailureSummary::capture(&failure);

        assert_eq!(summary.kind, "foreign");
        assert_eq!(summary.id, None);
        assert_eq!(summary.code, None);
        assert_eq!(summary.status, None);
        assert_eq!(summary.category, Some("upstream"));
        assert_eq!(summary.message, "socket closed");
    }

    #[test]
    fn untagged_foreign_failures_capture_no_category() {
        let error = SocketClosed;
        let summary = FailureSummary::capture(&Failure::foreign(&error));

        assert_eq!(summary.category, None);
        assert_eq!(summary.message, "socket closed");
    }

    // ------------------------------------------------------------------------
    // Source chains
    // ------------------------------------------------------------------------

    #[test]
    fn record_chains_start_at_the_attached_cause() {
        let fault = Fault::builder()
            .message("sync aborted")
            .cause(FetchFailed(SocketClosed))
            .build();
        let chain: Vec<String> = source_chain(&Failure::from(&fault))
            .map(|link| link.to_string())
            .collect();

        assert_eq!(chain, ["fetch failed", "socket closed"]);
    }

    #[test]
    fn foreign_chains_start_below_the_error_itself() {
        let error = FetchFailed(SocketClosed);
        let chain: Vec<String> = source_chain(&Failure::foreign(&error))
            .map(|link| link.to_string())
            .collect();

        assert_eq!(chain, ["socket closed"]);
    }

    #[test]
    fn causeless_failures_have_empty_chains() {
        let fault = Fault::builder().message("flat").build();
        assert_eq!(source_chain(&Failure::from(&fault)).count(), 0);

        let error = SocketClosed;
        assert_eq!(source_chain(&Failure::foreign(&error)).count(), 0);
    }

    // ------------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------------

    #[test]
    fn logging_without_a_subscriber_is_a_no_op() {
        let fault = HttpFault::service_unavailable()
            .message("maintenance window")
            .cause(SocketClosed)
            .build();
        log_failure(&Failure::from(&fault));

        let plain = Fault::builder().message("quiet").build();
        log_failure(&Failure::from(&plain));

        let error = FetchFailed(SocketClosed);
        log_failure(&Failure::foreign_tagged(FaultCategory::Io, &error));
    }
}
