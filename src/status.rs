//! The HTTP status catalog.
//!
//! One macro row per status is the single source of truth: the row
//! generates the [`HttpStatus`] variant, its numeric value and reason
//! phrase, the `u16` conversions, membership in [`HttpStatus::ALL`], and
//! the pre-seeded named constructor on [`HttpFault`]
//! (`HttpFault::not_found()` and friends). Supporting a new status means
//! adding one row, nothing else.
//!
//! The catalog carries the 40 standard error statuses: 29 in the 4xx class
//! and 11 in the 5xx class. Only these are representable; there is no
//! free-form numeric path into a record, so an [`HttpFault`] can never hold
//! a status the catalog does not know.
//!
//! # Classes and default codes
//!
//! Every status falls in exactly one [`ErrorClass`], derived from its
//! numeric range. The class decides the code a record gets when the caller
//! does not override it: [`CLIENT_ERROR`] for 4xx, [`SERVER_ERROR`] for
//! 5xx.
//!
//! The catalog is a `Copy` enum plus `const` tables; concurrent readers
//! need no synchronization.
//!
//! [`HttpFault`]: crate::HttpFault

use std::fmt;

use thiserror::Error;

// ============================================================================
// Default Code Constants
// ============================================================================

/// Default code for 4xx records built without an explicit code.
pub const CLIENT_ERROR: &str = "CLIENT_ERROR";

/// Default code for 5xx records built without an explicit code.
pub const SERVER_ERROR: &str = "SERVER_ERROR";

// ============================================================================
// Error Class
// ============================================================================

/// The two fault classes the catalog distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// 4xx: the request itself was at fault.
    Client,
    /// 5xx: the service failed to handle a well-formed request.
    Server,
}

impl ErrorClass {
    /// The code applied to records of this class when none is supplied.
    #[inline]
    pub const fn default_code(self) -> &'static str {
        match self {
            Self::Client => CLIENT_ERROR,
            Self::Server => SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Client => "client error",
            Self::Server => "server error",
        })
    }
}

// ============================================================================
// Conversion Error
// ============================================================================

/// A `u16` that does not name a cataloged 4xx/5xx status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is not a cataloged 4xx/5xx status code")]
pub struct UncatalogedStatus(
    /// The rejected numeric value.
    pub u16,
);

// ============================================================================
// Catalog Table
// ============================================================================

macro_rules! status_catalog {
    (
        $(
            ($value:literal, $variant:ident, $reason:literal, $ctor:ident);
        )+
    ) => {
        /// A standard 4xx/5xx HTTP status, as cataloged by this crate.
        ///
        /// Obtain one from a variant directly or via [`HttpStatus::from_u16`] /
        /// `TryFrom<u16>`. The numeric value, reason phrase, and class are
        /// fixed columns of the catalog row.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum HttpStatus {
            $(
                #[doc = concat!("`", stringify!($value), " ", $reason, "`.")]
                $variant,
            )+
        }

        impl HttpStatus {
            /// Every cataloged status, in catalog (numeric) order.
            pub const ALL: &'static [HttpStatus] = &[$(Self::$variant),+];

            /// Numeric status code.
            #[inline]
            #[must_use]
            pub const fn as_u16(self) -> u16 {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Canonical reason phrase.
            #[inline]
            #[must_use]
            pub const fn reason(self) -> &'static str {
                match self {
                    $(Self::$variant => $reason,)+
                }
            }

            /// Catalog lookup by numeric value.
            #[must_use]
            pub const fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl crate::http::HttpFault {
            $(
                #[doc = concat!(
                    "Builder pre-seeded with `",
                    stringify!($value),
                    " ",
                    $reason,
                    "`."
                )]
                #[inline]
                pub fn $ctor() -> crate::http::HttpFaultBuilder {
                    Self::with_status(HttpStatus::$variant)
                }
            )+
        }
    };
}

status_catalog! {
    (400, BadRequest, "Bad Request", bad_request);
    (401, Unauthorized, "Unauthorized", unauthorized);
    (402, PaymentRequired, "Payment Required", payment_required);
    (403, Forbidden, "Forbidden", forbidden);
    (404, NotFound, "Not Found", not_found);
    (405, MethodNotAllowed, "Method Not Allowed", method_not_allowed);
    (406, NotAcceptable, "Not Acceptable", not_acceptable);
    (407, ProxyAuthenticationRequired, "Proxy Authentication Required", proxy_authentication_required);
    (408, RequestTimeout, "Request Timeout", request_timeout);
    (409, Conflict, "Conflict", conflict);
    (410, Gone, "Gone", gone);
    (411, LengthRequired, "Length Required", length_required);
    (412, PreconditionFailed, "Precondition Failed", precondition_failed);
    (413, PayloadTooLarge, "Payload Too Large", payload_too_large);
    (414, UriTooLong, "URI Too Long", uri_too_long);
    (415, UnsupportedMediaType, "Unsupported Media Type", unsupported_media_type);
    (416, RangeNotSatisfiable, "Range Not Satisfiable", range_not_satisfiable);
    (417, ExpectationFailed, "Expectation Failed", expectation_failed);
    (418, ImATeapot, "I'm a teapot", im_a_teapot);
    (421, MisdirectedRequest, "Misdirected Request", misdirected_request);
    (422, UnprocessableEntity, "Unprocessable Entity", unprocessable_entity);
    (423, Locked, "Locked", locked);
    (424, FailedDependency, "Failed Dependency", failed_dependency);
    (425, TooEarly, "Too Early", too_early);
    (426, UpgradeRequired, "Upgrade Required", upgrade_required);
    (428, PreconditionRequired, "Precondition Required", precondition_required);
    (429, TooManyRequests, "Too Many Requests", too_many_requests);
    (431, RequestHeaderFieldsTooLarge, "Request Header Fields Too Large", request_header_fields_too_large);
    (451, UnavailableForLegalReasons, "Unavailable For Legal Reasons", unavailable_for_legal_reasons);
    (500, InternalServerError, "Internal Server Error", internal_server_error);
    (501, NotImplemented, "Not Implemented", not_implemented);
    (502, BadGateway, "Bad Gateway", bad_gateway);
    (503, ServiceUnavailable, "Service Unavailable", service_unavailable);
    (504, GatewayTimeout, "Gateway Timeout", gateway_timeout);
    (505, HttpVersionNotSupported, "HTTP Version Not Supported", http_version_not_supported);
    (506, VariantAlsoNegotiates, "Variant Also Negotiates", variant_also_negotiates);
    (507, InsufficientStorage, "Insufficient Storage", insufficient_storage);
    (508, LoopDetected, "Loop Detected", loop_detected);
    (510, NotExtended, "Not Extended", not_extended);
    (511, NetworkAuthenticationRequired, "Network Authentication Required", network_authentication_required);
}

// ============================================================================
// Derived Columns
// ============================================================================

impl HttpStatus {
    /// The class this status belongs to, by numeric range.
    #[inline]
    #[must_use]
    pub const fn class(self) -> ErrorClass {
        if self.as_u16() < 500 {
            ErrorClass::Client
        } else {
            ErrorClass::Server
        }
    }

    /// `true` for the 4xx range.
    #[inline]
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(self.as_u16(), 400..=499)
    }

    /// `true` for the 5xx range.
    #[inline]
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        matches!(self.as_u16(), 500..=599)
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

impl From<HttpStatus> for u16 {
    #[inline]
    fn from(status: HttpStatus) -> Self {
        status.as_u16()
    }
}

impl TryFrom<u16> for HttpStatus {
    type Error = UncatalogedStatus;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value).ok_or(UncatalogedStatus(value))
    }
}

// ============================================================================
// `http` Crate Interop (feature = "http")
// ============================================================================

#[cfg(feature = "http")]
impl From<HttpStatus> for http::StatusCode {
    fn from(status: HttpStatus) -> Self {
        // Catalog values are all within 400..=511.
        http::StatusCode::from_u16(status.as_u16())
            .expect("cataloged values are valid HTTP status codes")
    }
}

#[cfg(feature = "http")]
impl TryFrom<http::StatusCode> for HttpStatus {
    type Error = UncatalogedStatus;

    fn try_from(status: http::StatusCode) -> Result<Self, Self::Error> {
        Self::from_u16(status.as_u16()).ok_or(UncatalogedStatus(status.as_u16()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Table shape
    // ------------------------------------------------------------------------

    #[test]
    fn catalog_has_forty_rows() {
        assert_eq!(HttpStatus::ALL.len(), 40);
    }

    #[test]
    fn catalog_splits_29_client_11_server() {
        let client = HttpStatus::ALL.iter().filter(|s| s.is_client_error()).count();
        let server = HttpStatus::ALL.iter().filter(|s| s.is_server_error()).count();

        assert_eq!(client, 29);
        assert_eq!(server, 11);
    }

    #[test]
    fn catalog_is_in_ascending_numeric_order() {
        let values: Vec<u16> = HttpStatus::ALL.iter().map(|s| s.as_u16()).collect();
        let mut sorted = values.clone();
        sorted.sort_unstable();
        sorted.dedup();

        assert_eq!(values, sorted);
    }

    #[test]
    fn every_row_round_trips_through_u16() {
        for &status in HttpStatus::ALL {
            assert_eq!(HttpStatus::from_u16(status.as_u16()), Some(status));
            assert_eq!(HttpStatus::try_from(status.as_u16()), Ok(status));
            assert_eq!(u16::from(status), status.as_u16());
        }
    }

    // ------------------------------------------------------------------------
    // Classes and defaults
    // ------------------------------------------------------------------------

    #[test]
    fn range_edges_classify_correctly() {
        assert_eq!(HttpStatus::BadRequest.class(), ErrorClass::Client);
        assert_eq!(
            HttpStatus::UnavailableForLegalReasons.class(),
            ErrorClass::Client
        );
        assert_eq!(HttpStatus::InternalServerError.class(), ErrorClass::Server);
        assert_eq!(
            HttpStatus::NetworkAuthenticationRequired.class(),
            ErrorClass::Server
        );
    }

    #[test]
    fn class_default_codes() {
        assert_eq!(ErrorClass::Client.default_code(), CLIENT_ERROR);
        assert_eq!(ErrorClass::Server.default_code(), SERVER_ERROR);
        assert_eq!(HttpStatus::Conflict.class().default_code(), "CLIENT_ERROR");
        assert_eq!(HttpStatus::BadGateway.class().default_code(), "SERVER_ERROR");
    }

    #[test]
    fn client_and_server_predicates_are_exclusive() {
        for &status in HttpStatus::ALL {
            assert_ne!(status.is_client_error(), status.is_server_error());
        }
    }

    // ------------------------------------------------------------------------
    // Lookup misses
    // ------------------------------------------------------------------------

    #[test]
    fn non_error_and_gap_values_are_rejected() {
        for value in [0u16, 200, 301, 399, 419, 420, 427, 430, 450, 452, 509, 512, 600] {
            assert_eq!(HttpStatus::from_u16(value), None, "value {value}");
            assert_eq!(
                HttpStatus::try_from(value),
                Err(UncatalogedStatus(value)),
                "value {value}"
            );
        }
    }

    #[test]
    fn uncataloged_status_error_names_the_value() {
        let err = HttpStatus::try_from(209).unwrap_err();
        assert_eq!(err.to_string(), "209 is not a cataloged 4xx/5xx status code");
    }

    // ------------------------------------------------------------------------
    // Reasons and display
    // ------------------------------------------------------------------------

    #[test]
    fn reason_phrases_spot_checks() {
        assert_eq!(HttpStatus::NotFound.reason(), "Not Found");
        assert_eq!(HttpStatus::ImATeapot.reason(), "I'm a teapot");
        assert_eq!(HttpStatus::GatewayTimeout.as_u16(), 504);
        assert_eq!(
            HttpStatus::HttpVersionNotSupported.reason(),
            "HTTP Version Not Supported"
        );
    }

    #[test]
    fn display_pairs_value_and_reason() {
        assert_eq!(HttpStatus::NotFound.to_string(), "404 Not Found");
        assert_eq!(
            HttpStatus::ServiceUnavailable.to_string(),
            "503 Service Unavailable"
        );
    }

    // ------------------------------------------------------------------------
    // http crate interop
    // ------------------------------------------------------------------------

    #[cfg(feature = "http")]
    #[test]
    fn converts_to_and_from_http_status_code() {
        for &status in HttpStatus::ALL {
            let external: http::StatusCode = status.into();
            assert_eq!(external.as_u16(), status.as_u16());
            assert_eq!(HttpStatus::try_from(external), Ok(status));
        }

        assert!(HttpStatus::try_from(http::StatusCode::OK).is_err());
    }
}
