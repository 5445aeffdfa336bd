//! Macros for last-resort debugging.
//!
//! Since errors produced by the decoder and encoder only carry a position or
//! a field path, finding out which check actually fired can be tedious. The
//! `xerr!()` macro logs the source location at `trace` level through the
//! `log` facade before resolving into whatever the expression it encloses
//! resolves to. Use it whenever you initially produce an error, i.e.:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(return Err(src.content_err(ErrorKind::TruncatedInput)))
//! }
//! ```

macro_rules! xerr {
    ($test:expr) => {{
        log::trace!("error raised at {}:{}", file!(), line!());
        $test
    }}
}
