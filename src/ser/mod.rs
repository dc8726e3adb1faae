mod serde;

pub use self::serde::{
    to_value, to_value_with_options, Serializer, SerializerOptions, SerializerOptionsBuilder,
};
