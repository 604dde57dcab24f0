//! # Faultkit
//!
//! Immutable error records with HTTP status classification and a stable
//! wire projection.
//!
//! ## Design Philosophy
//!
//! 1. **Records are immutable** once built. Identity, timestamp, code,
//!    message, and context are fixed at construction; there are no setters.
//! 2. **The wire shape is fixed.** Whatever a failure looks like inside the
//!    process, the outside world sees the same four-or-five field object.
//! 3. **Diagnostics stay inside.** Causes and status codes exist for
//!    operators and logs, never for response bodies. Records deliberately
//!    do not implement `Serialize`; only [`Projection`] does.
//! 4. **Classification is closed.** A failure resolves to a status through
//!    an ordered decision list, and arbitrary errors cannot opt into
//!    client-fault treatment without explicit registration.
//!
//! ## Quick Start
//!
//! ```rust
//! use faultkit::{fmt_args, project, Classifier, Failure, HttpFault};
//!
//! let fault = HttpFault::not_found()
//!     .message_fmt("no user named %s", fmt_args!["mallory"])
//!     .unwrap()
//!     .context("user", "mallory")
//!     .build();
//!
//! let classifier = Classifier::new();
//! let (projection, status) = project(&classifier, &Failure::from(&fault));
//!
//! assert_eq!(u16::from(status), 404);
//! assert_eq!(projection.code, "CLIENT_ERROR");
//! assert_eq!(projection.message, "no user named mallory");
//! ```
//!
//! ## Records Without a Status
//!
//! Plain [`Fault`]s carry no transport knowledge. The classifier resolves
//! them, and anything else it has never heard of, to `500`:
//!
//! ```rust
//! use faultkit::{project, Classifier, Failure, Fault};
//!
//! let fault = Fault::builder()
//!     .code("LEDGER_STALE")
//!     .message("ledger snapshot is behind the commit log")
//!     .build();
//!
//! let (projection, status) = project(&Classifier::new(), &Failure::from(&fault));
//!
//! assert_eq!(u16::from(status), 500);
//! // The record's own code survives into the body; only the status is resolved.
//! assert_eq!(projection.code, "LEDGER_STALE");
//! ```
//!
//! ## Foreign Errors
//!
//! Errors from other crates cross the boundary as [`Failure::Foreign`]. They
//! get a fresh identity, their own display message, and a code and status
//! from the classifier; tagging one with a registered [`FaultCategory`]
//! turns it into a `400`:
//!
//! ```rust
//! use faultkit::{project, Classifier, Failure, FaultCategory};
//!
//! let parse_error = "twelve".parse::<u64>().unwrap_err();
//! let failure = Failure::foreign_tagged(FaultCategory::MalformedInput, &parse_error);
//!
//! let (projection, status) = project(&Classifier::new(), &failure);
//!
//! assert_eq!(u16::from(status), 400);
//! assert_eq!(projection.code, "CLIENT_ERROR");
//! assert_eq!(projection.message, "invalid digit found in string");
//! ```
//!
//! ## Features
//!
//! - `http`: conversions between [`HttpStatus`] and `http::StatusCode` for
//!   crates that speak the `http` types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod http;
pub mod project;
pub mod record;
pub mod report;
pub mod status;
pub mod template;

pub use classify::*;
pub use http::*;
pub use project::*;
pub use record::*;
pub use report::*;
pub use status::*;
pub use template::*;

/// Type alias for Results whose error is a [`Fault`].
pub type Result<T> = std::result::Result<T, Fault>;
