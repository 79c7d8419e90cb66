//! Knobs for the tree builder and the binder.
//!
//! Construct these with `Default` and struct update syntax, or with the
//! [`parse_options!`](crate::parse_options!), [`bind_options!`](crate::bind_options!)
//! and [`options!`](crate::options!) macros.
//!
//! ```rust
//! let options = gamble::options! {
//!     bind: gamble::bind_options! { strict: true },
//! };
//! assert!(options.bind.strict);
//! assert!(!options.parse.legacy_null_terminator);
//! ```

/// Default nesting limit of the tree builder.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Tree builder configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat a plain `null` as the end of the enclosing collection, the way early
    /// versions of this library did: in `[a, null, b]` only `a` survives, and a
    /// plain `null` (or empty) key ends its mapping. The rest of the collection
    /// is skipped. Off by default.
    pub legacy_null_terminator: bool,
    /// Fail with `ParseReason::TooDeep` once collections nest deeper than this.
    /// `None` removes the limit, leaving recursion bounded only by the stack.
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            legacy_null_terminator: false,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Binder configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Report shape and number mismatches as `BindError` instead of falling back
    /// to zero values. Off by default: `age: abc` binds to `0` into an integer.
    pub strict: bool,
}

/// Options for the composed helpers (`from_str_with_options`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub parse: ParseOptions,
    pub bind: BindOptions,
}
