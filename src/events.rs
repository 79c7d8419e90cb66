//!
//! Events: the boundary between the tree code and a YAML engine.
//!
//! Responsibilities
//! - Define the event vocabulary (`Event`) shared by sources and sinks.
//! - `EventSource`: pull one event at a time; may fail with a syntax error.
//! - `EventSink`: push one event at a time and flush; may fail.
//! - `SaphyrEvents`: the source used by `parse`, wrapping `saphyr_parser::Parser`.
//! - `VecEvents`: replays recorded events, for callers with their own tokenizer.
//!
//! Anchors and tags on nodes are dropped when translating saphyr events; an
//! alias becomes `Event::Alias`, which the tree builder rejects.

use std::vec;

#[cfg(feature = "deserialize")]
use saphyr_parser::{Event as RawEvent, Parser, ScalarStyle as RawStyle, StrInput};

use crate::error::{EmitError, Location, ParseError};
#[cfg(feature = "deserialize")]
use crate::error::location_from_span;

/// Lexical style a scalar was written in (or should be written in).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// One lexical YAML event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Scalar { text: String, style: ScalarStyle },
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
    /// Reference to an anchored node (`*name`).
    Alias,
}

/// Payload-free discriminant of [`Event`], used as a frame terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
    Alias,
}

impl Event {
    /// Plain-style scalar event.
    pub fn plain(text: impl Into<String>) -> Self {
        Event::Scalar {
            text: text.into(),
            style: ScalarStyle::Plain,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::StreamStart => EventKind::StreamStart,
            Event::StreamEnd => EventKind::StreamEnd,
            Event::DocumentStart => EventKind::DocumentStart,
            Event::DocumentEnd => EventKind::DocumentEnd,
            Event::Scalar { .. } => EventKind::Scalar,
            Event::SequenceStart => EventKind::SequenceStart,
            Event::SequenceEnd => EventKind::SequenceEnd,
            Event::MappingStart => EventKind::MappingStart,
            Event::MappingEnd => EventKind::MappingEnd,
            Event::Alias => EventKind::Alias,
        }
    }
}

/// Pull side of the event boundary.
pub trait EventSource {
    /// Pull the next event. `Ok(None)` means the source is exhausted.
    fn next_event(&mut self) -> Result<Option<Event>, ParseError>;

    /// Position of the last pulled event, if the source tracks one.
    fn location(&self) -> Option<Location> {
        None
    }
}

/// Push side of the event boundary.
pub trait EventSink {
    fn emit(&mut self, event: Event) -> Result<(), EmitError>;

    /// Make everything emitted so far visible in the output.
    fn flush(&mut self) -> Result<(), EmitError> {
        Ok(())
    }
}

/// Collecting sink: keeps events in emission order.
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) -> Result<(), EmitError> {
        self.push(event);
        Ok(())
    }
}

/// Event source that replays a pre-recorded list.
pub struct VecEvents {
    events: vec::IntoIter<Event>,
}

impl From<Vec<Event>> for VecEvents {
    fn from(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl EventSource for VecEvents {
    fn next_event(&mut self) -> Result<Option<Event>, ParseError> {
        Ok(self.events.next())
    }
}

/// Live event source over `saphyr_parser::Parser`.
#[cfg(feature = "deserialize")]
pub struct SaphyrEvents<'a> {
    /// Underlying streaming parser that produces raw events from the input.
    parser: Parser<'a, StrInput<'a>>,
    /// Location of the last yielded event (for error reporting).
    last_location: Option<Location>,
}

#[cfg(feature = "deserialize")]
impl<'a> SaphyrEvents<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            parser: Parser::new_from_str(input),
            last_location: None,
        }
    }
}

#[cfg(feature = "deserialize")]
impl From<RawStyle> for ScalarStyle {
    fn from(style: RawStyle) -> Self {
        match style {
            RawStyle::Plain => ScalarStyle::Plain,
            RawStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            RawStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            RawStyle::Literal => ScalarStyle::Literal,
            RawStyle::Folded => ScalarStyle::Folded,
        }
    }
}

#[cfg(feature = "deserialize")]
impl EventSource for SaphyrEvents<'_> {
    fn next_event(&mut self) -> Result<Option<Event>, ParseError> {
        while let Some(item) = self.parser.next() {
            let (raw, span) = item.map_err(ParseError::from_scan_error)?;
            self.last_location = Some(location_from_span(&span));

            let event = match raw {
                RawEvent::StreamStart => Event::StreamStart,
                RawEvent::StreamEnd => Event::StreamEnd,
                RawEvent::DocumentStart(_) => Event::DocumentStart,
                RawEvent::DocumentEnd => Event::DocumentEnd,
                RawEvent::Scalar(text, style, _anchor_id, _tag) => Event::Scalar {
                    text: text.into_owned(),
                    style: style.into(),
                },
                RawEvent::SequenceStart(_anchor_id, _tag) => Event::SequenceStart,
                RawEvent::SequenceEnd => Event::SequenceEnd,
                RawEvent::MappingStart(_anchor_id, _tag) => Event::MappingStart,
                RawEvent::MappingEnd => Event::MappingEnd,
                RawEvent::Alias(_anchor_id) => Event::Alias,
                RawEvent::Nothing => continue,
            };
            return Ok(Some(event));
        }
        Ok(None)
    }

    fn location(&self) -> Option<Location> {
        self.last_location
    }
}

#[cfg(all(test, feature = "deserialize"))]
mod tests {
    use super::*;

    fn drain(input: &str) -> Vec<Event> {
        let mut source = SaphyrEvents::new(input);
        let mut events = Vec::new();
        while let Some(event) = source.next_event().expect("valid YAML") {
            events.push(event);
        }
        events
    }

    #[test]
    fn saphyr_events_translate_block_mapping() {
        let events = drain("a: 'x'\n");
        let kinds: Vec<EventKind> = events.iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::StreamStart,
                EventKind::DocumentStart,
                EventKind::MappingStart,
                EventKind::Scalar,
                EventKind::Scalar,
                EventKind::MappingEnd,
                EventKind::DocumentEnd,
                EventKind::StreamEnd,
            ]
        );
        assert_eq!(events[3], Event::plain("a"));
        assert_eq!(
            events[4],
            Event::Scalar {
                text: "x".to_owned(),
                style: ScalarStyle::SingleQuoted,
            }
        );
    }

    #[test]
    fn saphyr_events_report_syntax_errors_with_location() {
        let mut source = SaphyrEvents::new("key: [unclosed\n");
        let err = loop {
            match source.next_event() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected a syntax error"),
                Err(err) => break err,
            }
        };
        assert!(err.location().is_some());
    }
}
