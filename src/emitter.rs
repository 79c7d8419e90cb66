//! Block-style YAML emitter: an [`EventSink`] writing to any `fmt::Write` target.
//!
//! Layout rules:
//! - Every document is framed by `---` and `...`; a scalar root shares the `---` line.
//! - Indentation is 2 spaces per level. A sequence under a mapping key is indented
//!   too (`key:\n  - item`).
//! - A collection that starts right after a dash opens on the dash line
//!   (`- a: 1\n  b: 2`).
//! - Empty collections are written in flow form, `[]` and `{}`.
//! - Keys too long for the implicit form are written as `? key` with `: value`
//!   on the next line.
//!
//! Nothing is written for a collection start until its first child (or its end)
//! arrives, since that is when block vs. flow layout is known.

use std::fmt::Write;

use smallvec::SmallVec;

use crate::error::EmitError;
use crate::events::{Event, EventSink, ScalarStyle};
use crate::ser_quoting::{is_plain_safe, is_single_quote_safe};

/// Spaces per nesting level.
const INDENT_STEP: usize = 2;

/// Implicit keys (`key: value`) are limited to 1024 characters; bytes are
/// counted so the limit holds for non-ASCII keys too.
const MAX_IMPLICIT_KEY: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Waiting for `StreamStart`.
    Idle,
    /// Between documents.
    Stream,
    /// Inside a document; `root_done` once its single root node is complete.
    Document { root_done: bool },
    /// After `StreamEnd`.
    Finished,
}

/// What the current output line ends with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tail {
    LineStart,
    /// `---`
    Marker,
    /// `key:`
    Key,
    /// `- `
    Dash,
}

#[derive(Clone, Copy, Debug)]
enum Collection {
    Sequence,
    /// `expect_key` is false between a key and its value.
    Mapping { expect_key: bool },
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    collection: Collection,
    /// Column of this collection's dashes or keys.
    indent: usize,
    /// Children started so far.
    items: usize,
}

/// Event sink producing block-style YAML text.
///
/// ```rust
/// use gamble::{emit_value, Value, YamlEmitter};
///
/// let mut out = String::new();
/// emit_value(&Value::from("some-string"), &mut YamlEmitter::new(&mut out)).unwrap();
/// assert_eq!(out, "--- some-string\n...\n");
/// ```
pub struct YamlEmitter<'a, W: Write> {
    /// Destination writer where YAML text is emitted.
    out: &'a mut W,
    phase: Phase,
    tail: Tail,
    /// Open collections, innermost last.
    stack: SmallVec<[Frame; 16]>,
}

impl<'a, W: Write> YamlEmitter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self {
            out,
            phase: Phase::Idle,
            tail: Tail::LineStart,
            stack: SmallVec::new(),
        }
    }

    fn newline(&mut self) -> Result<(), EmitError> {
        self.out.write_char('\n')?;
        self.tail = Tail::LineStart;
        Ok(())
    }

    fn write_indent(&mut self, indent: usize) -> Result<(), EmitError> {
        for _ in 0..indent {
            self.out.write_char(' ')?;
        }
        Ok(())
    }

    /// Fails unless a node may start here.
    fn check_node_allowed(&self) -> Result<(), EmitError> {
        match self.phase {
            Phase::Document { root_done: false } => Ok(()),
            Phase::Document { root_done: true } if !self.stack.is_empty() => Ok(()),
            Phase::Document { root_done: true } => {
                Err(EmitError::rejected("a document holds a single root node"))
            }
            _ => Err(EmitError::rejected("node event outside of a document")),
        }
    }

    fn expects_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame {
                collection: Collection::Mapping { expect_key: true },
                ..
            })
        )
    }

    /// Start the next child of the innermost collection: opens the block on the
    /// first child, then positions the cursor (and writes the dash for sequences).
    fn begin_child(&mut self) -> Result<(), EmitError> {
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        frame.items += 1;
        let Frame {
            collection, indent, ..
        } = *frame;

        if matches!(self.tail, Tail::Marker | Tail::Key) {
            self.newline()?;
        }
        if self.tail == Tail::LineStart {
            self.write_indent(indent)?;
        }
        if let Collection::Sequence = collection {
            self.out.write_str("- ")?;
            self.tail = Tail::Dash;
        }
        Ok(())
    }

    /// Separator between what the line holds and an inline value.
    fn write_value_separator(&mut self) -> Result<(), EmitError> {
        if matches!(self.tail, Tail::Marker | Tail::Key) {
            self.out.write_char(' ')?;
        }
        Ok(())
    }

    /// Bookkeeping once a node (scalar or collection) is complete.
    fn finish_node(&mut self) {
        match self.stack.last_mut() {
            Some(Frame {
                collection: Collection::Mapping { expect_key },
                ..
            }) => *expect_key = true,
            Some(_) => {}
            None => self.phase = Phase::Document { root_done: true },
        }
    }

    fn scalar(&mut self, text: &str, style: ScalarStyle) -> Result<(), EmitError> {
        self.check_node_allowed()?;
        if self.expects_key() {
            self.begin_child()?;
            self.write_key(text, style)?;
            self.tail = Tail::Key;
            if let Some(Frame {
                collection: Collection::Mapping { expect_key },
                ..
            }) = self.stack.last_mut()
            {
                *expect_key = false;
            }
            return Ok(());
        }
        if let Some(Frame {
            collection: Collection::Sequence,
            ..
        }) = self.stack.last()
        {
            self.begin_child()?;
        }
        self.write_value_separator()?;
        write_scalar(&mut *self.out, text, style)?;
        self.newline()?;
        self.finish_node();
        Ok(())
    }

    fn start_collection(&mut self, collection: Collection) -> Result<(), EmitError> {
        self.check_node_allowed()?;
        if self.expects_key() {
            return Err(EmitError::rejected("mapping keys must be scalars"));
        }
        let indent = match self.stack.last() {
            None => 0,
            Some(parent) => parent.indent + INDENT_STEP,
        };
        if let Some(Frame {
            collection: Collection::Sequence,
            ..
        }) = self.stack.last()
        {
            self.begin_child()?;
        }
        self.stack.push(Frame {
            collection,
            indent,
            items: 0,
        });
        Ok(())
    }

    fn end_collection(&mut self, sequence: bool) -> Result<(), EmitError> {
        let frame = match self.stack.last() {
            Some(frame) => *frame,
            None => return Err(EmitError::rejected("collection end with no start")),
        };
        let empty_flow = match frame.collection {
            Collection::Sequence if sequence => "[]",
            Collection::Mapping { expect_key: true } if !sequence => "{}",
            Collection::Mapping { expect_key: false } if !sequence => {
                return Err(EmitError::rejected("mapping ended after a key"));
            }
            _ => return Err(EmitError::rejected("collection end does not match its start")),
        };
        self.stack.pop();
        if frame.items == 0 {
            self.write_value_separator()?;
            self.out.write_str(empty_flow)?;
            self.newline()?;
        }
        self.finish_node();
        Ok(())
    }

    /// Write a mapping key and its `:`. Keys too long for the implicit form
    /// use the explicit one, `? key` with `:` on the next line.
    fn write_key(&mut self, text: &str, style: ScalarStyle) -> Result<(), EmitError> {
        let mut key = String::new();
        write_scalar(&mut key, text, style)?;
        if key.len() < MAX_IMPLICIT_KEY {
            self.out.write_str(&key)?;
        } else {
            let indent = self.stack.last().map_or(0, |frame| frame.indent);
            self.out.write_str("? ")?;
            self.out.write_str(&key)?;
            self.newline()?;
            self.write_indent(indent)?;
        }
        self.out.write_char(':')?;
        Ok(())
    }
}

/// Write scalar text in the requested style, falling back to a quoted style
/// when the text cannot be represented in it.
fn write_scalar<W: Write + ?Sized>(out: &mut W, text: &str, style: ScalarStyle) -> std::fmt::Result {
    match style {
        ScalarStyle::Plain if is_plain_safe(text) => out.write_str(text),
        ScalarStyle::Plain | ScalarStyle::SingleQuoted if is_single_quote_safe(text) => {
            write_single_quoted(out, text)
        }
        // Block scalar styles are not produced; double quotes carry any text.
        _ => write_double_quoted(out, text),
    }
}

/// Write a single-quoted string. Single quotes inside the string are escaped by doubling them.
fn write_single_quoted<W: Write + ?Sized>(out: &mut W, s: &str) -> std::fmt::Result {
    out.write_char('\'')?;
    for ch in s.chars() {
        if ch == '\'' {
            out.write_str("''")?;
        } else {
            out.write_char(ch)?;
        }
    }
    out.write_char('\'')?;
    Ok(())
}

/// Write a double-quoted string with necessary escapes.
fn write_double_quoted<W: Write + ?Sized>(out: &mut W, s: &str) -> std::fmt::Result {
    out.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '\\' => out.write_str("\\\\")?,
            '"' => out.write_str("\\\"")?,
            '\0' => out.write_str("\\0")?,
            '\u{7}' => out.write_str("\\a")?,
            '\u{8}' => out.write_str("\\b")?,
            '\t' => out.write_str("\\t")?,
            '\n' => out.write_str("\\n")?,
            '\u{b}' => out.write_str("\\v")?,
            '\u{c}' => out.write_str("\\f")?,
            '\r' => out.write_str("\\r")?,
            '\u{1b}' => out.write_str("\\e")?,
            '\u{FEFF}' => out.write_str("\\uFEFF")?,
            '\u{0085}' => out.write_str("\\N")?,
            '\u{2028}' => out.write_str("\\L")?,
            '\u{2029}' => out.write_str("\\P")?,
            c if c.is_control() && (c as u32) <= 0xFF => {
                write!(out, "\\x{:02X}", c as u32)?
            }
            c if c.is_control() => write!(out, "\\u{:04X}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')?;
    Ok(())
}

impl<W: Write> EventSink for YamlEmitter<'_, W> {
    fn emit(&mut self, event: Event) -> Result<(), EmitError> {
        match event {
            Event::StreamStart => match self.phase {
                Phase::Idle => {
                    self.phase = Phase::Stream;
                    Ok(())
                }
                _ => Err(EmitError::rejected("stream already started")),
            },
            Event::StreamEnd => match self.phase {
                Phase::Stream => {
                    self.phase = Phase::Finished;
                    Ok(())
                }
                _ => Err(EmitError::rejected("stream end outside of a stream")),
            },
            Event::DocumentStart => match self.phase {
                Phase::Stream => {
                    self.out.write_str("---")?;
                    self.tail = Tail::Marker;
                    self.phase = Phase::Document { root_done: false };
                    Ok(())
                }
                _ => Err(EmitError::rejected("document start outside of a stream")),
            },
            Event::DocumentEnd => match self.phase {
                Phase::Document { root_done: true } if self.stack.is_empty() => {
                    self.out.write_str("...")?;
                    self.newline()?;
                    self.phase = Phase::Stream;
                    Ok(())
                }
                Phase::Document { .. } => Err(EmitError::rejected("document has no complete root node")),
                _ => Err(EmitError::rejected("document end outside of a document")),
            },
            Event::Scalar { text, style } => self.scalar(&text, style),
            Event::SequenceStart => self.start_collection(Collection::Sequence),
            Event::MappingStart => self.start_collection(Collection::Mapping { expect_key: true }),
            Event::SequenceEnd => self.end_collection(true),
            Event::MappingEnd => self.end_collection(false),
            Event::Alias => Err(EmitError::rejected("aliases are not supported")),
        }
    }

    fn flush(&mut self) -> Result<(), EmitError> {
        match self.phase {
            Phase::Document { .. } => Err(EmitError::rejected("flush inside an open document")),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_all(events: Vec<Event>) -> Result<String, EmitError> {
        let mut out = String::new();
        let mut emitter = YamlEmitter::new(&mut out);
        emitter.emit(Event::StreamStart)?;
        emitter.emit(Event::DocumentStart)?;
        for event in events {
            emitter.emit(event)?;
        }
        emitter.emit(Event::DocumentEnd)?;
        emitter.emit(Event::StreamEnd)?;
        emitter.flush()?;
        Ok(out)
    }

    #[test]
    fn mapping_inside_sequence_opens_on_dash_line() {
        let out = emit_all(vec![
            Event::SequenceStart,
            Event::MappingStart,
            Event::plain("name"),
            Event::plain("oceans"),
            Event::plain("sequences"),
            Event::SequenceStart,
            Event::plain("one"),
            Event::SequenceEnd,
            Event::MappingEnd,
            Event::SequenceStart,
            Event::plain("x"),
            Event::plain("y"),
            Event::SequenceEnd,
            Event::SequenceEnd,
        ])
        .unwrap();
        assert_eq!(
            out,
            "---\n- name: oceans\n  sequences:\n    - one\n- - x\n  - y\n...\n"
        );
    }

    #[test]
    fn empty_collections_use_flow_form() {
        let out = emit_all(vec![
            Event::MappingStart,
            Event::plain("list"),
            Event::SequenceStart,
            Event::SequenceEnd,
            Event::plain("map"),
            Event::MappingStart,
            Event::MappingEnd,
            Event::MappingEnd,
        ])
        .unwrap();
        assert_eq!(out, "---\nlist: []\nmap: {}\n...\n");
        assert_eq!(
            emit_all(vec![Event::SequenceStart, Event::SequenceEnd]).unwrap(),
            "--- []\n...\n"
        );
    }

    #[test]
    fn unsafe_plain_text_falls_back_to_quotes() {
        let out = emit_all(vec![
            Event::MappingStart,
            Event::plain("a: b"),
            Event::plain("- x"),
            Event::plain("line"),
            Event::plain("two\nlines"),
            Event::MappingEnd,
        ])
        .unwrap();
        assert_eq!(out, "---\n'a: b': '- x'\nline: \"two\\nlines\"\n...\n");
    }

    #[test]
    fn long_keys_use_explicit_form() {
        let long = "k".repeat(MAX_IMPLICIT_KEY + 10);
        let out = emit_all(vec![
            Event::SequenceStart,
            Event::MappingStart,
            Event::plain(long.as_str()),
            Event::plain("v"),
            Event::plain("short"),
            Event::SequenceStart,
            Event::plain("x"),
            Event::SequenceEnd,
            Event::MappingEnd,
            Event::SequenceEnd,
        ])
        .unwrap();
        assert_eq!(out, format!("---\n- ? {long}\n  : v\n  short:\n    - x\n...\n"));
    }

    #[test]
    fn collection_key_is_rejected() {
        let err = emit_all(vec![Event::MappingStart, Event::SequenceStart]).unwrap_err();
        assert!(err.to_string().contains("mapping keys must be scalars"));
    }

    #[test]
    fn second_root_is_rejected() {
        assert!(emit_all(vec![Event::plain("a"), Event::plain("b")]).is_err());
    }

    #[test]
    fn flush_fails_inside_open_document() {
        let mut out = String::new();
        let mut emitter = YamlEmitter::new(&mut out);
        emitter.emit(Event::StreamStart).unwrap();
        emitter.emit(Event::DocumentStart).unwrap();
        assert!(emitter.flush().is_err());
    }
}
