//! Printf-style message templates.
//!
//! Record messages can be supplied as a template plus positional arguments
//! (`"no such user %s"` + `["bob"]`). Substitution happens once, while the
//! record is being configured, so a malformed template is a hard error at
//! the construction site instead of a corrupted message discovered later in
//! a log or a response body.
//!
//! # Directives
//!
//! | Directive | Meaning |
//! |-----------|----------------------------------|
//! | `%s`      | next argument, via [`Display`]   |
//! | `%%`      | literal `%`                      |
//!
//! Anything else after a `%`, including a trailing lone `%`, is rejected.
//! Arity is strict in both directions: a template with more `%s` directives
//! than arguments fails, and so does a call that supplies arguments the
//! template never consumes.
//!
//! # Example
//!
//! ```rust
//! use faultkit::{fmt_args, template};
//!
//! let msg = template::render("This is my %s.", fmt_args!["message"]).unwrap();
//! assert_eq!(msg, "This is my message.");
//!
//! assert!(template::render("%s and %s", fmt_args!["only one"]).is_err());
//! ```
//!
//! [`Display`]: std::fmt::Display

use std::fmt;

use thiserror::Error;

// ============================================================================
// Error Type
// ============================================================================

/// Why a message template could not be rendered.
///
/// Returned by [`render`] and by every record constructor that accepts a
/// template ([`FaultBuilder::message_fmt`], [`Fault::formatted`], ...).
///
/// [`FaultBuilder::message_fmt`]: crate::FaultBuilder::message_fmt
/// [`Fault::formatted`]: crate::Fault::formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// A `%s` directive had no argument left to consume.
    ///
    /// `needed` counts the directives encountered up to the failure point,
    /// so the template needs at least that many arguments.
    #[error("template needs at least {needed} argument(s) but {supplied} were supplied")]
    MissingArgument {
        /// Directives seen up to and including the one that failed.
        needed: usize,
        /// Arguments the caller supplied.
        supplied: usize,
    },

    /// The caller supplied arguments the template never consumes.
    #[error("template consumed {consumed} argument(s) but {supplied} were supplied")]
    SurplusArguments {
        /// Arguments actually consumed by `%s` directives.
        consumed: usize,
        /// Arguments the caller supplied.
        supplied: usize,
    },

    /// A `%` was followed by something other than `s` or `%`.
    #[error("unsupported directive `%{directive}` at byte {at}")]
    UnsupportedDirective {
        /// Byte offset of the directive character.
        at: usize,
        /// The offending character.
        directive: char,
    },

    /// The template ended in the middle of a directive.
    #[error("dangling `%` at byte {at}")]
    DanglingPercent {
        /// Byte offset of the lone `%`.
        at: usize,
    },
}

// ============================================================================
// Rendering
// ============================================================================

/// Substitute `args` into `template`, left to right.
///
/// An empty `args` slice renders the template verbatim; directives are
/// still validated, so `render("50%% off", &[])` succeeds while
/// `render("%s", &[])` does not.
///
/// # Errors
///
/// Any placeholder/argument mismatch or unknown directive returns a
/// [`TemplateError`]; the partial output is discarded.
///
/// # Example
///
/// ```rust
/// use faultkit::{fmt_args, template};
///
/// let msg = template::render("user %s exceeded %s requests", fmt_args!["bob", 100]).unwrap();
/// assert_eq!(msg, "user bob exceeded 100 requests");
/// ```
pub fn render(template: &str, args: &[&dyn fmt::Display]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut consumed = 0usize;
    let mut chars = template.char_indices();

    while let Some((at, ch)) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, '%')) => out.push('%'),
            Some((_, 's')) => {
                let arg = args.get(consumed).ok_or(TemplateError::MissingArgument {
                    needed: consumed + 1,
                    supplied: args.len(),
                })?;
                out.push_str(&arg.to_string());
                consumed += 1;
            }
            Some((pos, other)) => {
                return Err(TemplateError::UnsupportedDirective {
                    at: pos,
                    directive: other,
                });
            }
            None => return Err(TemplateError::DanglingPercent { at }),
        }
    }

    if consumed < args.len() {
        return Err(TemplateError::SurplusArguments {
            consumed,
            supplied: args.len(),
        });
    }

    Ok(out)
}

// ============================================================================
// Argument Slice Macro
// ============================================================================

/// Build the `&[&dyn Display]` argument slice for a message template.
///
/// Accepts any mix of values with a [`Display`] impl and allows a trailing
/// comma. `fmt_args![]` produces the empty slice.
///
/// # Example
///
/// ```rust
/// use faultkit::{fmt_args, template};
///
/// let port = 8080;
/// let msg = template::render("bind to %s failed", fmt_args![port]).unwrap();
/// assert_eq!(msg, "bind to 8080 failed");
/// ```
///
/// [`Display`]: std::fmt::Display
#[macro_export]
macro_rules! fmt_args {
    () => {
        &[] as &[&dyn ::std::fmt::Display]
    };
    ($($arg:expr),+ $(,)?) => {
        &[$(&$arg as &dyn ::std::fmt::Display),+]
    };
}

// ============================================================================
// Tests
// ============================================================================
