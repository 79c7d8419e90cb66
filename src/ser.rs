//! Tree serializer.
//!
//! Two steps, both recursive:
//! - [`to_value`]: closed dispatch from a host value (`T: Serialize`) to a [`Value`].
//!   Strings, integers, floats, `None`/`()`, sequences and string-keyed maps are
//!   marshalable; everything else fails with [`MarshalError`] naming the type.
//! - [`emit_value`]: walks a [`Value`] and pushes the event sequence of a full
//!   document into an [`EventSink`].
//!
//! [`to_string`] composes them with the crate's [`YamlEmitter`].

use std::fmt::Write;

use serde::ser::{self, Impossible, Serialize};

use crate::emitter::YamlEmitter;
use crate::error::{EmitError, Error, MarshalError};
use crate::events::{Event, EventSink, ScalarStyle};
use crate::value::{reads_as_null, Mapping, Value};

/// Result alias.
pub type Result<T, E = MarshalError> = std::result::Result<T, E>;

/// Serialize `value` into a YAML document string.
///
/// ```rust
/// use std::collections::BTreeMap;
///
/// let mut doc = BTreeMap::new();
/// doc.insert("key1", Some(5.0));
/// doc.insert("key2", None);
/// assert_eq!(gamble::to_string(&doc).unwrap(), "---\nkey1: 5.00\nkey2: null\n...\n");
/// ```
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let mut out = String::new();
    to_fmt_writer(&mut out, value)?;
    Ok(out)
}

/// Serialize `value` as a YAML document into a `fmt::Write` target.
///
/// Nothing is written when `value` is not marshalable.
pub fn to_fmt_writer<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), Error> {
    let tree = to_value(value)?;
    emit_value(&tree, &mut YamlEmitter::new(out))?;
    Ok(())
}

/// Convert a host value into a [`Value`].
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

/// Push the events of a complete document holding `value`, then flush.
pub fn emit_value<S: EventSink + ?Sized>(value: &Value, sink: &mut S) -> Result<(), EmitError> {
    sink.emit(Event::StreamStart)?;
    sink.emit(Event::DocumentStart)?;
    emit_node(value, sink)?;
    sink.emit(Event::DocumentEnd)?;
    sink.emit(Event::StreamEnd)?;
    sink.flush()
}

fn emit_node<S: EventSink + ?Sized>(value: &Value, sink: &mut S) -> Result<(), EmitError> {
    match value {
        Value::Null => sink.emit(Event::plain("null")),
        Value::Scalar(text) => sink.emit(scalar_event(text)),
        Value::Sequence(items) => {
            sink.emit(Event::SequenceStart)?;
            for item in items {
                emit_node(item, sink)?;
            }
            sink.emit(Event::SequenceEnd)
        }
        Value::Mapping(mapping) => {
            sink.emit(Event::MappingStart)?;
            for (key, value) in mapping {
                sink.emit(Event::plain(key.as_str()))?;
                emit_node(value, sink)?;
            }
            sink.emit(Event::MappingEnd)
        }
    }
}

/// Plain scalar, unless plain text would read back as null.
fn scalar_event(text: &str) -> Event {
    let style = if reads_as_null(text) {
        ScalarStyle::SingleQuoted
    } else {
        ScalarStyle::Plain
    };
    Event::Scalar {
        text: text.to_owned(),
        style,
    }
}

/// Floats always carry exactly two decimals.
fn format_float(v: f64) -> String {
    format!("{v:.2}")
}

/// Serde serializer producing a [`Value`].
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = MarshalError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = Impossible<Value, MarshalError>;
    type SerializeTupleVariant = Impossible<Value, MarshalError>;
    type SerializeMap = SerializeMapping;
    type SerializeStruct = Impossible<Value, MarshalError>;
    type SerializeStructVariant = Impossible<Value, MarshalError>;

    fn serialize_bool(self, _v: bool) -> Result<Value> {
        Err(MarshalError::unsupported("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Scalar(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::Scalar(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Scalar(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::Scalar(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Scalar(format_float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Scalar(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Scalar(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value> {
        Err(MarshalError::unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Err(MarshalError::unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Value> {
        Err(MarshalError::unsupported(name))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value> {
        Err(MarshalError::unsupported(name))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(MarshalError::unsupported(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(MarshalError::unsupported(name))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMapping> {
        Ok(SerializeMapping {
            mapping: Mapping::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(MarshalError::unsupported(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(MarshalError::unsupported(name))
    }
}

#[doc(hidden)]
pub struct SerializeVec {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = MarshalError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = MarshalError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct SerializeMapping {
    mapping: Mapping,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMapping {
    type Ok = Value;
    type Error = MarshalError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| <MarshalError as ser::Error>::custom("value serialized before its key"))?;
        self.mapping.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.mapping))
    }
}

/// Accepts string-like map keys only.
struct KeySerializer;

fn non_string_key(type_name: &'static str) -> MarshalError {
    MarshalError::NonStringKey { type_name }
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = MarshalError;

    type SerializeSeq = Impossible<String, MarshalError>;
    type SerializeTuple = Impossible<String, MarshalError>;
    type SerializeTupleStruct = Impossible<String, MarshalError>;
    type SerializeTupleVariant = Impossible<String, MarshalError>;
    type SerializeMap = Impossible<String, MarshalError>;
    type SerializeStruct = Impossible<String, MarshalError>;
    type SerializeStructVariant = Impossible<String, MarshalError>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(non_string_key("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String> {
        Err(non_string_key("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String> {
        Err(non_string_key("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String> {
        Err(non_string_key("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String> {
        Err(non_string_key("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String> {
        Err(non_string_key("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String> {
        Err(non_string_key("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String> {
        Err(non_string_key("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String> {
        Err(non_string_key("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(non_string_key("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(non_string_key("f64"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(non_string_key("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(non_string_key("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String> {
        Err(non_string_key("option"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(non_string_key("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String> {
        Err(non_string_key(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<String> {
        Err(non_string_key(name))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(non_string_key(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(non_string_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(non_string_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(non_string_key(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(non_string_key(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(non_string_key("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(non_string_key(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(non_string_key(name))
    }
}
