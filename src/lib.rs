#![forbid(unsafe_code)]
//! YAML documents as generic value trees.
//!
//! A document is parsed into a [`Value`]: null, scalar text, an ordered
//! sequence or an insertion-ordered string-keyed mapping. Scalars keep their
//! text; there is no implicit typing beyond the null forms (`null`, `~` and the
//! empty scalar, when plain). Host values go the other way through
//! [`to_string`], and a tree can be bound into a typed destination with
//! [`from_value`], which matches struct fields to keys ignoring case.
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     #[serde(rename = "Host")]
//!     host: String,
//!     #[serde(rename = "Port")]
//!     port: u16,
//! }
//!
//! let server: Server = gamble::from_str("host: localhost\nport: 8080\n").unwrap();
//! assert_eq!(server.host, "localhost");
//! assert_eq!(server.port, 8080);
//!
//! let tree = gamble::parse("- a\n- null\n- b\n").unwrap();
//! assert_eq!(gamble::to_string(&tree).unwrap(), "---\n- a\n- null\n- b\n...\n");
//! ```

pub use error::{BindError, EmitError, Error, Location, MarshalError, ParseError, ParseReason};
pub use events::{Event, EventKind, EventSink, EventSource, ScalarStyle, VecEvents};
pub use options::{BindOptions, DEFAULT_MAX_DEPTH, Options, ParseOptions};
pub use parse::parse_events;
pub use value::{Mapping, Value};

#[cfg(feature = "deserialize")]
pub use bind::{ValueDeserializer, bind, from_value, from_value_with_options};
#[cfg(feature = "deserialize")]
pub use events::SaphyrEvents;
#[cfg(feature = "deserialize")]
pub use parse::{parse, parse_with_options};

#[cfg(feature = "serialize")]
pub use emitter::YamlEmitter;
#[cfg(feature = "serialize")]
pub use ser::{emit_value, to_fmt_writer, to_string, to_value};

pub mod error;
pub mod events;
mod macros;
pub mod options;
mod parse;
pub mod value;

#[cfg(feature = "deserialize")]
mod bind;

#[cfg(feature = "serialize")]
mod emitter;
#[cfg(feature = "serialize")]
mod ser;
#[cfg(feature = "serialize")]
mod ser_quoting;

/// Parse `input` and bind the document into `T` with default options.
///
/// Strings are borrowed from the intermediate tree, so `T` must own its data.
#[cfg(feature = "deserialize")]
pub fn from_str<T: serde::de::DeserializeOwned>(input: &str) -> Result<T, Error> {
    from_str_with_options(input, Options::default())
}

/// [`from_str`] with explicit parse and bind [`Options`].
#[cfg(feature = "deserialize")]
pub fn from_str_with_options<T: serde::de::DeserializeOwned>(
    input: &str,
    options: Options,
) -> Result<T, Error> {
    let tree = parse_with_options(input, options.parse)?;
    Ok(from_value_with_options(&tree, options.bind)?)
}

/// Parse `input` into an existing destination.
///
/// The destination is only replaced when both parsing and binding succeed.
///
/// ```rust
/// let mut names: Vec<String> = Vec::new();
/// gamble::unmarshal("- ada\n- grace\n", &mut names).unwrap();
/// assert_eq!(names, ["ada", "grace"]);
///
/// assert!(gamble::unmarshal("- [unclosed\n", &mut names).is_err());
/// assert_eq!(names.len(), 2);
/// ```
#[cfg(feature = "deserialize")]
pub fn unmarshal<T: serde::de::DeserializeOwned>(input: &str, destination: &mut T) -> Result<(), Error> {
    let tree = parse(input)?;
    bind(&tree, destination, BindOptions::default())?;
    Ok(())
}
