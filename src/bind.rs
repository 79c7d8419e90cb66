//! Binder: a serde `Deserializer` that walks a [`Value`] in lock-step with the
//! destination type.
//!
//! Matching rules
//! - Struct fields match mapping keys ignoring case (`age` fills `Age`); the
//!   declared field list from the derive is the schema. When several keys fold
//!   to the same field, the last one in mapping order wins.
//! - Numbers (and booleans) are parsed from scalar text. In lenient mode (the
//!   default) unparsable text, or a non-scalar, binds as zero / `false`; in
//!   strict mode it is a [`BindError`].
//! - A non-mapping bound into a struct or map is an empty mapping in lenient
//!   mode.
//! - Strings need a scalar and sequences need a sequence in both modes.

use serde::de::value::{BorrowedStrDeserializer, StrDeserializer};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserialize, Deserializer, EnumAccess,
    IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use std::str::FromStr;

use indexmap::IndexMap;
use num_traits::Zero;

use crate::error::BindError;
use crate::options::BindOptions;
use crate::value::{Mapping, Value};

/// Bind `value` into `T` with default (lenient) options.
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Person {
///     #[serde(rename = "Age")]
///     age: i32,
///     #[serde(rename = "Name")]
///     name: String,
/// }
///
/// let tree = gamble::parse("age: 54\nname: john").unwrap();
/// let person: Person = gamble::from_value(&tree).unwrap();
/// assert_eq!((person.age, person.name.as_str()), (54, "john"));
/// ```
pub fn from_value<'de, T: Deserialize<'de>>(value: &'de Value) -> Result<T, BindError> {
    from_value_with_options(value, BindOptions::default())
}

/// [`from_value`] with explicit [`BindOptions`].
pub fn from_value_with_options<'de, T: Deserialize<'de>>(
    value: &'de Value,
    options: BindOptions,
) -> Result<T, BindError> {
    T::deserialize(ValueDeserializer::with_options(value, options))
}

/// Bind `value` into an existing destination, replacing its contents.
///
/// On error the destination is left untouched.
pub fn bind<T: DeserializeOwned>(
    value: &Value,
    destination: &mut T,
    options: BindOptions,
) -> Result<(), BindError> {
    *destination = from_value_with_options(value, options)?;
    Ok(())
}

/// Deserializer over a borrowed [`Value`].
#[derive(Clone, Copy)]
pub struct ValueDeserializer<'de> {
    value: &'de Value,
    options: BindOptions,
}

impl<'de> ValueDeserializer<'de> {
    pub fn new(value: &'de Value) -> Self {
        Self::with_options(value, BindOptions::default())
    }

    pub fn with_options(value: &'de Value, options: BindOptions) -> Self {
        Self { value, options }
    }

    fn child(&self, value: &'de Value) -> Self {
        Self::with_options(value, self.options)
    }

    fn scalar(&self, expected: &'static str) -> Result<&'de str, BindError> {
        match self.value {
            Value::Scalar(text) => Ok(text),
            other => Err(BindError::mismatch(expected, other)),
        }
    }

    /// Parse scalar text as a number, falling back to zero in lenient mode.
    fn number<T: FromStr + Zero>(&self, ty: &'static str) -> Result<T, BindError> {
        match self.value {
            Value::Scalar(text) => match text.parse::<T>() {
                Ok(n) => Ok(n),
                Err(_) if !self.options.strict => Ok(T::zero()),
                Err(_) => Err(BindError::InvalidNumber {
                    text: text.clone(),
                    ty,
                }),
            },
            _ if !self.options.strict => Ok(T::zero()),
            other => Err(BindError::mismatch(ty, other)),
        }
    }

    fn mapping_or_empty(&self, expected: &'static str) -> Result<Option<&'de Mapping>, BindError> {
        match self.value {
            Value::Mapping(mapping) => Ok(Some(mapping)),
            _ if !self.options.strict => Ok(None),
            other => Err(BindError::mismatch(expected, other)),
        }
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident($ty:ty),)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
                visitor.$visit(self.number::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = BindError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Scalar(text) => visitor.visit_borrowed_str(text),
            Value::Sequence(items) => visitor.visit_seq(SeqDeserializer::new(items, self.options)),
            Value::Mapping(mapping) => visitor.visit_map(MapDeserializer::new(
                mapping.iter().map(|(key, value)| (key.as_str(), value)).collect(),
                self.options,
            )),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let parsed = match self.value {
            Value::Scalar(text) if text.eq_ignore_ascii_case("true") => Some(true),
            Value::Scalar(text) if text.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        };
        match parsed {
            Some(v) => visitor.visit_bool(v),
            None if !self.options.strict => visitor.visit_bool(false),
            None => Err(BindError::mismatch("bool", self.value)),
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let text = self.scalar("char")?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(BindError::mismatch("char", self.value)),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        visitor.visit_borrowed_str(self.scalar("string")?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        visitor.visit_borrowed_bytes(self.scalar("bytes")?.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            _ if !self.options.strict => visitor.visit_unit(),
            other => Err(BindError::mismatch("unit", other)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            Value::Sequence(items) => visitor.visit_seq(SeqDeserializer::new(items, self.options)),
            other => Err(BindError::mismatch("sequence", other)),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        let entries = match self.mapping_or_empty("map")? {
            Some(mapping) => mapping.iter().map(|(key, value)| (key.as_str(), value)).collect(),
            None => Vec::new(),
        };
        visitor.visit_map(MapDeserializer::new(entries, self.options))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        let entries = match self.mapping_or_empty("struct")? {
            Some(mapping) => fold_field_names(mapping, fields),
            None => Vec::new(),
        };
        visitor.visit_map(MapDeserializer::new(entries, self.options))
    }

    /// Externally tagged enums: `Variant` or `{ Variant: payload }`.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        match self.value {
            Value::Scalar(text) => {
                let variant: StrDeserializer<'de, BindError> = text.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Mapping(mapping) if mapping.len() == 1 => {
                let (variant, payload) = mapping
                    .iter()
                    .next()
                    .ok_or_else(|| BindError::mismatch("enum", self.value))?;
                visitor.visit_enum(EnumDeserializer {
                    variant: variant.as_str(),
                    payload: self.child(payload),
                })
            }
            other => Err(BindError::mismatch("enum", other)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        visitor.visit_unit()
    }
}

/// Rename mapping keys to the declared field they match ignoring case.
///
/// An exact match is preferred over a case-insensitive one. Keys matching no
/// field keep their own name. Later keys overwrite earlier ones that fold to
/// the same field, keeping the first position.
fn fold_field_names<'de>(
    mapping: &'de Mapping,
    fields: &'static [&'static str],
) -> Vec<(&'de str, &'de Value)> {
    let mut entries: IndexMap<&'de str, &'de Value> = IndexMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = fields
            .iter()
            .find(|field| **field == key.as_str())
            .or_else(|| fields.iter().find(|field| same_ignoring_case(field, key)))
            .copied()
            .unwrap_or(key.as_str());
        entries.insert(name, value);
    }
    entries.into_iter().collect()
}

fn same_ignoring_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

struct SeqDeserializer<'de> {
    items: std::slice::Iter<'de, Value>,
    options: BindOptions,
}

impl<'de> SeqDeserializer<'de> {
    fn new(items: &'de [Value], options: BindOptions) -> Self {
        Self {
            items: items.iter(),
            options,
        }
    }
}

impl<'de> SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = BindError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, BindError> {
        match self.items.next() {
            Some(item) => seed
                .deserialize(ValueDeserializer::with_options(item, self.options))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct MapDeserializer<'de> {
    entries: std::vec::IntoIter<(&'de str, &'de Value)>,
    /// Value of the key most recently handed out.
    value: Option<&'de Value>,
    options: BindOptions,
}

impl<'de> MapDeserializer<'de> {
    fn new(entries: Vec<(&'de str, &'de Value)>, options: BindOptions) -> Self {
        Self {
            entries: entries.into_iter(),
            value: None,
            options,
        }
    }
}

impl<'de> MapAccess<'de> for MapDeserializer<'de> {
    type Error = BindError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, BindError> {
        match self.entries.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, BindError> {
        let value = self
            .value
            .take()
            .ok_or_else(|| <BindError as de::Error>::custom("value requested before key"))?;
        seed.deserialize(ValueDeserializer::with_options(value, self.options))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct EnumDeserializer<'de> {
    variant: &'de str,
    payload: ValueDeserializer<'de>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = BindError;
    type Variant = ValueDeserializer<'de>;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), BindError> {
        let variant = seed.deserialize(BorrowedStrDeserializer::new(self.variant))?;
        Ok((variant, self.payload))
    }
}

impl<'de> VariantAccess<'de> for ValueDeserializer<'de> {
    type Error = BindError;

    fn unit_variant(self) -> Result<(), BindError> {
        Deserialize::deserialize(self)
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, BindError> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        self.deserialize_struct("", fields, visitor)
    }
}
