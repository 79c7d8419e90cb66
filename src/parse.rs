//! Tree builder: recursive descent over an [`EventSource`].
//!
//! Every frame is driven by a terminator event kind: the top level stops at
//! `DocumentEnd`, a sequence frame at `SequenceEnd`, a mapping frame at
//! `MappingEnd`. A frame answers its caller with [`Built::Item`] or
//! [`Built::End`], so a `null` element and the end of a collection never look
//! alike (unless `ParseOptions::legacy_null_terminator` asks for the old
//! collapsing behavior).

#[cfg(feature = "deserialize")]
use crate::events::SaphyrEvents;
use crate::error::{ParseError, ParseReason};
use crate::events::{Event, EventKind, EventSource, ScalarStyle};
use crate::options::ParseOptions;
use crate::value::{reads_as_null, Mapping, Value};

/// Parse a YAML document into a [`Value`].
///
/// An empty document parses to [`Value::Null`]. Only the first document of a
/// stream is read.
///
/// ```rust
/// use gamble::Value;
///
/// let tree = gamble::parse("- foo\n- bar\n").unwrap();
/// assert_eq!(tree, Value::Sequence(vec!["foo".into(), "bar".into()]));
/// ```
#[cfg(feature = "deserialize")]
pub fn parse(input: &str) -> Result<Value, ParseError> {
    parse_with_options(input, ParseOptions::default())
}

/// [`parse`] with explicit [`ParseOptions`].
#[cfg(feature = "deserialize")]
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Value, ParseError> {
    let mut events = SaphyrEvents::new(input);
    parse_events(&mut events, options)
}

/// Build a [`Value`] from any event source.
pub fn parse_events<S: EventSource + ?Sized>(
    source: &mut S,
    options: ParseOptions,
) -> Result<Value, ParseError> {
    let mut builder = TreeBuilder {
        source,
        options,
        depth: 0,
    };
    match builder.build(EventKind::DocumentEnd)? {
        Built::Item(value) => {
            builder.finish_document()?;
            Ok(value)
        }
        Built::End => Ok(Value::Null),
    }
}

/// Outcome of one recursive build frame.
#[derive(Debug, PartialEq)]
enum Built {
    /// A complete node.
    Item(Value),
    /// The frame's terminator was reached.
    End,
}

struct TreeBuilder<'s, S: EventSource + ?Sized> {
    source: &'s mut S,
    options: ParseOptions,
    /// Number of collections currently open.
    depth: usize,
}

impl<S: EventSource + ?Sized> TreeBuilder<'_, S> {
    fn error(&self, reason: ParseReason) -> ParseError {
        ParseError::new(reason, self.source.location())
    }

    /// Pull one event; an exhausted source reads as `StreamEnd`.
    fn pull(&mut self) -> Result<Event, ParseError> {
        Ok(self.source.next_event()?.unwrap_or(Event::StreamEnd))
    }

    fn build(&mut self, terminator: EventKind) -> Result<Built, ParseError> {
        loop {
            let event = self.pull()?;
            if event.kind() == terminator {
                return Ok(Built::End);
            }
            match event {
                Event::Scalar { text, style } => return Ok(Built::Item(scalar(text, style))),
                Event::SequenceStart => return self.sequence().map(Built::Item),
                Event::MappingStart => return self.mapping().map(Built::Item),
                Event::Alias => return Err(self.error(ParseReason::Unsupported("aliases"))),
                Event::StreamEnd if terminator == EventKind::DocumentEnd => return Ok(Built::End),
                Event::StreamEnd => return Err(self.error(ParseReason::UnexpectedEnd)),
                // Stream and document framing.
                _ => continue,
            }
        }
    }

    /// Pull the rest of the document after its root node, so that syntax
    /// errors in trailing content surface. Later documents stay unread.
    fn finish_document(&mut self) -> Result<(), ParseError> {
        loop {
            match self.pull()? {
                Event::DocumentEnd | Event::DocumentStart | Event::StreamEnd => return Ok(()),
                Event::StreamStart => continue,
                _ => return Err(self.error(ParseReason::TrailingContent)),
            }
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        match self.options.max_depth {
            Some(max) if self.depth > max => Err(self.error(ParseReason::TooDeep(max))),
            _ => Ok(()),
        }
    }

    fn sequence(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        let mut items = Vec::new();
        while let Built::Item(item) = self.build(EventKind::SequenceEnd)? {
            if item.is_null() && self.options.legacy_null_terminator {
                self.skip_rest(EventKind::SequenceEnd)?;
                break;
            }
            items.push(item);
        }
        self.depth -= 1;
        Ok(Value::Sequence(items))
    }

    fn mapping(&mut self) -> Result<Value, ParseError> {
        self.enter()?;
        let mut mapping = Mapping::new();
        while let Some(key) = self.key()? {
            let value = match self.build(EventKind::MappingEnd)? {
                Built::Item(value) => value,
                Built::End => return Err(self.error(ParseReason::UnexpectedEnd)),
            };
            mapping.insert(key, value);
        }
        self.depth -= 1;
        Ok(Value::Mapping(mapping))
    }

    /// Next mapping key, or `None` once the mapping is closed.
    ///
    /// Key text is taken verbatim: a plain `null` key is the string `"null"`.
    /// The engine reports an empty key (`? ` with nothing after it) as a plain
    /// `~`, so it reads as the key `"~"`, same as a literal `~:`.
    fn key(&mut self) -> Result<Option<String>, ParseError> {
        loop {
            match self.pull()? {
                Event::MappingEnd => return Ok(None),
                Event::Scalar { text, style } => {
                    if self.options.legacy_null_terminator && scalar_is_null(&text, style) {
                        self.skip_rest(EventKind::MappingEnd)?;
                        return Ok(None);
                    }
                    return Ok(Some(text));
                }
                Event::SequenceStart | Event::MappingStart => {
                    return Err(self.error(ParseReason::NonScalarKey));
                }
                Event::Alias => return Err(self.error(ParseReason::Unsupported("aliases"))),
                Event::StreamEnd => return Err(self.error(ParseReason::UnexpectedEnd)),
                _ => continue,
            }
        }
    }

    /// Consume events up to and including the `end` that closes the current collection.
    fn skip_rest(&mut self, end: EventKind) -> Result<(), ParseError> {
        let mut nested = 0usize;
        loop {
            match self.pull()? {
                Event::SequenceStart | Event::MappingStart => nested += 1,
                Event::SequenceEnd | Event::MappingEnd if nested > 0 => nested -= 1,
                event if event.kind() == end => return Ok(()),
                Event::StreamEnd => return Err(self.error(ParseReason::UnexpectedEnd)),
                _ => {}
            }
        }
    }
}

fn scalar_is_null(text: &str, style: ScalarStyle) -> bool {
    style == ScalarStyle::Plain && reads_as_null(text)
}

fn scalar(text: String, style: ScalarStyle) -> Value {
    if scalar_is_null(&text, style) {
        Value::Null
    } else {
        Value::Scalar(text)
    }
}
