//! Public macros for constructing option structs without relying on struct literal syntax.
//!
//! These macros keep call sites ergonomic while the option structs grow new fields.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// ```rust
/// let options = gamble::options! {
///     parse: gamble::parse_options! { legacy_null_terminator: true },
/// };
/// assert!(options.parse.legacy_null_terminator);
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::ParseOptions`] from `Default` and a list of field assignments.
///
/// ```rust
/// let opts = gamble::parse_options! {
///     max_depth: Some(16),
/// };
/// assert_eq!(opts.max_depth, Some(16));
/// ```
#[macro_export]
macro_rules! parse_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::ParseOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::BindOptions`] from `Default` and a list of field assignments.
#[macro_export]
macro_rules! bind_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::BindOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}
