//! Regex backend selection.
//!
//! The `regex` feature uses the full `regex` crate, `lite` switches to
//! `regex-lite` for smaller binaries. All patterns of this crate stay within
//! the common subset of both engines.

#[cfg(feature = "regex")]
pub(crate) use ::regex::Regex;

#[cfg(all(feature = "lite", not(feature = "regex")))]
pub(crate) use ::regex_lite::Regex;

#[cfg(not(any(feature = "regex", feature = "lite")))]
compile_error!("either the `regex` or the `lite` feature must be enabled");
