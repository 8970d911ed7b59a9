mod json_array;

pub use self::json_array::JsonArrayDecoder;
