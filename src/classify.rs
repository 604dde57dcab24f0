//! Failure classification.
//!
//! A boundary catches failures of every stripe: records this crate built,
//! and foreign errors from parsers, validators, or I/O. The [`Classifier`]
//! turns any of them into a `(code, status)` verdict through a closed,
//! ordered decision list; earlier rules win:
//!
//! 1. A structured HTTP record answers for itself: its own code and status,
//!    verbatim.
//! 2. A structured record without HTTP semantics never had a status
//!    attached, so it resolves to `SERVER_ERROR` / 500.
//! 3. A foreign failure tagged with a registered client-fault category
//!    resolves to `CLIENT_ERROR` / 400.
//! 4. Everything else resolves to `SERVER_ERROR` / 500.
//!
//! Rule 3 is tag equality against the registered set, nothing more. No
//! message sniffing, no type identity games: a foreign failure is a client
//! fault exactly when its [`FaultCategory`] is registered.
//!
//! # Example
//!
//! ```rust
//! use faultkit::{Classifier, Failure, FaultCategory};
//!
//! let classifier = Classifier::new();
//! let parse_err = "nope".parse::<u32>().unwrap_err();
//!
//! let verdict = classifier.classify(&Failure::foreign_tagged(
//!     FaultCategory::MalformedInput,
//!     &parse_err,
//! ));
//! assert_eq!(verdict.status.as_u16(), 400);
//! assert_eq!(verdict.code, "CLIENT_ERROR");
//! ```

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

use crate::http::HttpFault;
use crate::record::Fault;
use crate::status::{CLIENT_ERROR, HttpStatus, SERVER_ERROR};

// ============================================================================
// Fault Categories
// ============================================================================

/// Category tag carried by foreign failures entering classification.
///
/// Categories are a closed taxonomy; configuring the classifier means
/// choosing which of them count as client faults, not inventing new ones.
/// Comparison is plain equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FaultCategory {
    /// Input failed a business or schema validation rule.
    Validation,
    /// Input was syntactically unparseable.
    MalformedInput,
    /// A request payload could not be read or decoded.
    UnreadablePayload,
    /// An argument failed binding or conversion.
    InvalidArgument,
    /// Caller identity could not be established.
    Authentication,
    /// An operation ran out of time.
    Timeout,
    /// A dependency this service calls misbehaved.
    Upstream,
    /// Storage or network I/O failed.
    Io,
    /// A bug or broken invariant inside this service.
    Internal,
}

impl FaultCategory {
    /// Stable snake_case label, suitable for log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::MalformedInput => "malformed_input",
            Self::UnreadablePayload => "unreadable_payload",
            Self::InvalidArgument => "invalid_argument",
            Self::Authentication => "authentication",
            Self::Timeout => "timeout",
            Self::Upstream => "upstream",
            Self::Io => "io",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Failure View
// ============================================================================

/// Borrowed view of a failure observed at a boundary.
///
/// Mirrors the structured/unstructured split the classifier reasons about.
/// Build one with the `From` impls for the record types, with
/// [`Failure::foreign`] / [`Failure::foreign_tagged`] for anything else, or
/// with [`Failure::from_error`] when all you hold is a `dyn Error`.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// A structured record with HTTP semantics.
    Http(&'a HttpFault),
    /// A structured record without HTTP semantics.
    Plain(&'a Fault),
    /// Any other error value, optionally tagged with a category.
    Foreign {
        /// Category tag, when the catching code knows one.
        category: Option<FaultCategory>,
        /// The caught error itself.
        error: &'a (dyn Error + 'static),
    },
}

impl<'a> Failure<'a> {
    /// Wrap a foreign error without a category tag.
    ///
    /// Untagged failures always classify as server faults (rule 4).
    #[inline]
    pub fn foreign(error: &'a (dyn Error + 'static)) -> Self {
        Self::Foreign {
            category: None,
            error,
        }
    }

    /// Wrap a foreign error with its category tag.
    #[inline]
    pub fn foreign_tagged(category: FaultCategory, error: &'a (dyn Error + 'static)) -> Self {
        Self::Foreign {
            category: Some(category),
            error,
        }
    }

    /// Sort a `dyn Error` into the right variant.
    ///
    /// Recovers the structured view when the trait object is actually an
    /// [`HttpFault`] or [`Fault`]; anything else becomes an untagged
    /// foreign failure. Code that still holds the concrete record should
    /// prefer the `From` impls and skip the downcast.
    #[must_use]
    pub fn from_error(error: &'a (dyn Error + 'static)) -> Self {
        if let Some(http) = error.downcast_ref::<HttpFault>() {
            return Self::Http(http);
        }
        if let Some(plain) = error.downcast_ref::<Fault>() {
            return Self::Plain(plain);
        }
        Self::foreign(error)
    }

    /// The category tag, for foreign failures that carry one.
    #[must_use]
    pub fn category(&self) -> Option<FaultCategory> {
        match self {
            Self::Foreign { category, .. } => *category,
            _ => None,
        }
    }
}

impl<'a> From<&'a Fault> for Failure<'a> {
    #[inline]
    fn from(fault: &'a Fault) -> Self {
        Self::Plain(fault)
    }
}

impl<'a> From<&'a HttpFault> for Failure<'a> {
    #[inline]
    fn from(fault: &'a HttpFault) -> Self {
        Self::Http(fault)
    }
}

// ============================================================================
// Classification Verdict
// ============================================================================

/// The classifier's answer for one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Machine-readable code for the failure.
    pub code: Cow<'static, str>,
    /// Transport status the failure resolves to.
    pub status: HttpStatus,
}

// ============================================================================
// Classifier
// ============================================================================

/// Decides `(code, status)` for any failure.
///
/// Holds the registered client-fault category set consulted by rule 3.
/// [`Classifier::new`] seeds the standard registrations; [`Classifier::empty`]
/// starts bare. The set only grows through explicit registration.
#[derive(Debug, Clone)]
pub struct Classifier {
    client_faults: SmallVec<[FaultCategory; 8]>,
}

impl Classifier {
    /// Categories registered out of the box: the input-shaped failures a
    /// well-behaved client could have avoided.
    pub const STANDARD_CLIENT_FAULTS: &'static [FaultCategory] = &[
        FaultCategory::Validation,
        FaultCategory::MalformedInput,
        FaultCategory::UnreadablePayload,
        FaultCategory::InvalidArgument,
    ];

    /// Classifier with [`STANDARD_CLIENT_FAULTS`](Self::STANDARD_CLIENT_FAULTS)
    /// registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client_faults: SmallVec::from_slice(Self::STANDARD_CLIENT_FAULTS),
        }
    }

    /// Classifier with no client-fault categories registered.
    ///
    /// Every foreign failure then resolves to `SERVER_ERROR` / 500.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            client_faults: SmallVec::new(),
        }
    }

    /// Register a category as a client fault. Idempotent.
    pub fn register(&mut self, category: FaultCategory) {
        if !self.client_faults.contains(&category) {
            self.client_faults.push(category);
        }
    }

    /// Chainable [`register`](Self::register).
    #[must_use]
    pub fn with_category(mut self, category: FaultCategory) -> Self {
        self.register(category);
        self
    }

    /// Whether a category is currently registered as a client fault.
    #[must_use]
    pub fn is_client_fault(&self, category: FaultCategory) -> bool {
        self.client_faults.contains(&category)
    }

    /// The registered client-fault categories, in registration order.
    #[must_use]
    pub fn client_faults(&self) -> &[FaultCategory] {
        &self.client_faults
    }

    /// Run the decision list (see the module docs) over one failure.
    ///
    /// The match arms are the list; their order is the rule order.
    #[must_use]
    pub fn classify(&self, failure: &Failure<'_>) -> Classification {
        match failure {
            Failure::Http(fault) => Classification {
                code: Cow::Owned(fault.code().to_owned()),
                status: fault.status(),
            },
            Failure::Plain(_) => Classification {
                code: Cow::Borrowed(SERVER_ERROR),
                status: HttpStatus::InternalServerError,
            },
            Failure::Foreign {
                category: Some(category),
                ..
            } if self.is_client_fault(*category) => Classification {
                code: Cow::Borrowed(CLIENT_ERROR),
                status: HttpStatus::BadRequest,
            },
            Failure::Foreign { .. } => Classification {
                code: Cow::Borrowed(SERVER_ERROR),
                status: HttpStatus::InternalServerError,
            },
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
