use serde::ser::{
    self, Error as SerdeError, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
};

use crate::convert::format_timestamp;
use crate::error::{Error, Result};
use crate::value::{Properties, Value};

/// Encodes JSON-native values only.
///
/// A decimal, timestamp or set makes serialization fail: those have to be
/// normalized first, see [`crate::normalize`]. So does a NaN or infinite float.
impl Serialize for Value {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Float(v) if !v.is_finite() => {
                Err(S::Error::custom(format_args!("float {v} is not JSON serializable")))
            }
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for v in items {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    state.serialize_entry(k, v)?;
                }
                state.end()
            }
            Value::Timestamp(ts) if format_timestamp(ts).is_err() => Err(S::Error::custom(
                format_args!("timestamp {ts} has a year outside 0000-9999"),
            )),
            Value::Decimal(_) | Value::Timestamp(_) | Value::Set(_) => Err(S::Error::custom(
                format_args!("value of type {} is not JSON serializable", self.type_name()),
            )),
        }
    }
}

/// Converts any `T: Serialize` into a [`Value`] with default options.
pub fn to_value<T: ?Sized>(value: &T) -> Result<Value>
where
    T: Serialize,
{
    to_value_with_options(value, SerializerOptions::default())
}

pub fn to_value_with_options<T: ?Sized>(value: &T, options: SerializerOptions) -> Result<Value>
where
    T: Serialize,
{
    let ser = Serializer::new_with_options(options);
    value.serialize(ser)
}

/// Serde Serializer producing [`Value`] trees.
///
/// Structs and maps keep their field order. Enums are externally tagged, the
/// same way `serde_json` writes them.
#[non_exhaustive]
pub struct Serializer {
    options: SerializerOptions,
}

/// Options used to configure a [`Serializer`].
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct SerializerOptions {
    /// Whether the [`Serializer`] should present itself as human readable or not.
    /// The default value is true.
    pub human_readable: Option<bool>,
}

impl SerializerOptions {
    /// Create a builder used to construct a new [`SerializerOptions`].
    pub fn builder() -> SerializerOptionsBuilder {
        SerializerOptionsBuilder {
            options: Default::default(),
        }
    }
}

/// A builder used to construct new [`SerializerOptions`] structs.
pub struct SerializerOptionsBuilder {
    options: SerializerOptions,
}

impl SerializerOptionsBuilder {
    /// Set the value for [`SerializerOptions::human_readable`].
    pub fn human_readable(mut self, value: impl Into<Option<bool>>) -> Self {
        self.options.human_readable = value.into();
        self
    }

    /// Consume this builder and produce a [`SerializerOptions`].
    pub fn build(self) -> SerializerOptions {
        self.options
    }
}

impl Serializer {
    /// Construct a new `Serializer`.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Serializer {
        Serializer {
            options: Default::default(),
        }
    }

    /// Construct a new `Serializer` configured with the provided [`SerializerOptions`].
    pub fn new_with_options(options: SerializerOptions) -> Self {
        Serializer { options }
    }
}

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    #[inline]
    fn serialize_bool(self, value: bool) -> Result<Value> {
        Ok(Value::Bool(value))
    }

    #[inline]
    fn serialize_i8(self, value: i8) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_u8(self, value: u8) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_i16(self, value: i16) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_u16(self, value: u16) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_i32(self, value: i32) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_u32(self, value: u32) -> Result<Value> {
        self.serialize_i64(value as i64)
    }

    #[inline]
    fn serialize_i64(self, value: i64) -> Result<Value> {
        Ok(Value::Integer(value))
    }

    #[inline]
    fn serialize_u64(self, value: u64) -> Result<Value> {
        Ok(Value::from(value))
    }

    #[inline]
    fn serialize_f32(self, value: f32) -> Result<Value> {
        self.serialize_f64(value as f64)
    }

    #[inline]
    fn serialize_f64(self, value: f64) -> Result<Value> {
        Ok(Value::Float(value))
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<Value> {
        Ok(Value::String(value.to_string()))
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<Value> {
        Ok(Value::String(value.to_owned()))
    }

    #[inline]
    fn serialize_bytes(self, value: &[u8]) -> Result<Value> {
        Ok(Value::List(value.iter().map(|&b| Value::Integer(b as i64)).collect()))
    }

    #[inline]
    fn serialize_none(self) -> Result<Value> {
        self.serialize_unit()
    }

    #[inline]
    fn serialize_some<V: ?Sized>(self, value: &V) -> Result<Value>
    where
        V: Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        self.serialize_unit()
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_owned()))
    }

    #[inline]
    fn serialize_newtype_struct<T: ?Sized>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: Serialize,
    {
        let inner = to_value_with_options(value, self.options)?;
        Ok(tagged(variant, inner))
    }

    #[inline]
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            inner: Vec::with_capacity(len.unwrap_or(0)),
            options: self.options,
        })
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(TupleVariantSerializer {
            inner: Vec::with_capacity(len),
            name: variant,
            options: self.options,
        })
    }

    #[inline]
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            inner: Properties::with_capacity(len.unwrap_or(0)),
            next_key: None,
            options: self.options,
        })
    }

    #[inline]
    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    #[inline]
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(StructVariantSerializer {
            name: variant,
            inner: Properties::with_capacity(len),
            options: self.options,
        })
    }

    fn is_human_readable(&self) -> bool {
        self.options.human_readable.unwrap_or(true)
    }
}

fn tagged(variant: &str, value: Value) -> Value {
    let mut map = Properties::with_capacity(1);
    map.insert(variant.to_owned(), value);
    Value::Map(map)
}

#[doc(hidden)]
pub struct SeqSerializer {
    inner: Vec<Value>,
    options: SerializerOptions,
}

impl SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.inner
            .push(to_value_with_options(value, self.options.clone())?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.inner))
    }
}

impl SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        SerializeSeq::end(self)
    }
}

impl SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct TupleVariantSerializer {
    inner: Vec<Value>,
    name: &'static str,
    options: SerializerOptions,
}

impl SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.inner
            .push(to_value_with_options(value, self.options.clone())?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.name, Value::List(self.inner)))
    }
}

#[doc(hidden)]
pub struct MapSerializer {
    inner: Properties,
    next_key: Option<String>,
    options: SerializerOptions,
}

impl SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = Error;

    // Integer and boolean keys become strings, as serde_json writes them.
    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = match to_value_with_options(key, self.options.clone())? {
            Value::String(s) => Some(s),
            key @ (Value::Integer(_) | Value::UInt(_) | Value::Bool(_)) => Some(key.to_string()),
            other => {
                return Err(Error::SerializationInput(format!(
                    "map keys must be strings, got {}",
                    other.type_name()
                )))
            }
        };
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self.next_key.take().ok_or_else(|| {
            Error::SerializationInput("map value serialized before its key".to_owned())
        })?;
        self.inner
            .insert(key, to_value_with_options(value, self.options.clone())?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.inner))
    }
}

impl SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.inner.insert(
            key.to_owned(),
            to_value_with_options(value, self.options.clone())?,
        );
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.inner))
    }
}

#[doc(hidden)]
pub struct StructVariantSerializer {
    inner: Properties,
    name: &'static str,
    options: SerializerOptions,
}

impl SerializeStructVariant for StructVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.inner.insert(
            key.to_owned(),
            to_value_with_options(value, self.options.clone())?,
        );
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.name, Value::Map(self.inner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Book {
        title: String,
        pages: u32,
        subtitle: Option<String>,
        genre: Genre,
    }

    #[derive(Serialize)]
    enum Genre {
        SciFi,
        #[allow(dead_code)]
        Other(String),
    }

    #[test]
    fn struct_fields_keep_their_order() {
        let book = Book {
            title: "Dune".into(),
            pages: 412,
            subtitle: None,
            genre: Genre::SciFi,
        };
        let value = to_value(&book).unwrap();
        let map = value.as_map().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "pages", "subtitle", "genre"]);
        assert_eq!(map["pages"], Value::Integer(412));
        assert_eq!(map["subtitle"], Value::Null);
        assert_eq!(map["genre"], Value::from("SciFi"));
    }

    #[test]
    fn newtype_variants_are_externally_tagged() {
        let value = to_value(&Genre::Other("poetry".into())).unwrap();
        assert_eq!(value.as_map().unwrap()["Other"], Value::from("poetry"));
    }

    #[test]
    fn large_unsigned_integers_stay_exact() {
        assert_eq!(to_value(&7u64).unwrap(), Value::Integer(7));
        let value = to_value(&u64::MAX).unwrap();
        assert_eq!(value, Value::UInt(u64::MAX));
        assert_eq!(serde_json::to_string(&value).unwrap(), "18446744073709551615");
    }

    #[test]
    fn scalar_keys_become_strings() {
        let mut numbered = BTreeMap::new();
        numbered.insert(1u32, "one");
        numbered.insert(20u32, "twenty");
        let value = to_value(&numbered).unwrap();
        let keys: Vec<&str> = value.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["1", "20"]);

        let mut flags = BTreeMap::new();
        flags.insert(true, 1);
        assert_eq!(to_value(&flags).unwrap().as_map().unwrap()["true"], Value::Integer(1));
    }

    #[test]
    fn compound_keys_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        assert!(matches!(
            to_value(&map),
            Err(Error::SerializationInput(_))
        ));
    }

    #[test]
    fn non_finite_floats_refuse_to_encode() {
        for v in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert!(serde_json::to_string(&Value::Float(v)).is_err());
        }
    }

    #[test]
    fn native_values_encode_as_json() {
        let mut map = Properties::new();
        map.insert("n".into(), Value::Integer(1));
        map.insert("xs".into(), Value::List(vec![Value::Bool(true), Value::Null]));
        assert_eq!(
            serde_json::to_string(&Value::Map(map)).unwrap(),
            r#"{"n":1,"xs":[true,null]}"#
        );
    }

    #[test]
    fn unnormalized_values_refuse_to_encode() {
        let value = Value::List(vec![Value::Decimal(bigdecimal::BigDecimal::from(1i64))]);
        let err = serde_json::to_string(&value).unwrap_err();
        assert!(err.to_string().contains("decimal"));
    }
}
