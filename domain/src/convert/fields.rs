use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use url::Url;

use super::ConvertError;

type Result<T> = std::result::Result<T, ConvertError>;

/// Typed access to the keys of one JSON object.
///
/// Every accessor reports failures with the full path of the key. A JSON
/// `null` is treated like a missing key.
pub(super) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Fields<'a> {
    pub fn root(value: &'a Value) -> Result<Self> {
        Self::at(value, String::new())
    }

    fn at(value: &'a Value, path: String) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(ConvertError::TypeMismatch {
                path: if path.is_empty() { "$".to_owned() } else { path },
                expected: "object",
                found: kind(other).to_owned(),
            }),
        }
    }

    pub fn path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    pub fn missing(&self, key: &str) -> ConvertError {
        ConvertError::MissingField {
            path: self.path(key),
        }
    }

    pub fn mismatch(&self, key: &str, expected: &'static str, found: String) -> ConvertError {
        ConvertError::TypeMismatch {
            path: self.path(key),
            expected,
            found,
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn require(&self, key: &str) -> Result<&'a Value> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    fn expect<T>(
        &self,
        key: &str,
        expected: &'static str,
        f: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => f(v)
                .map(Some)
                .ok_or_else(|| self.mismatch(key, expected, kind(v).to_owned())),
        }
    }

    pub fn str(&self, key: &str) -> Result<String> {
        self.opt_str(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<String>> {
        self.expect(key, "string", |v| v.as_str().map(str::to_owned))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.expect(key, "boolean", Value::as_bool)?.unwrap_or(default))
    }

    pub fn f64(&self, key: &str) -> Result<f64> {
        self.opt_f64(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>> {
        self.expect(key, "number", Value::as_f64)
    }

    /// Non-negative integer narrowed to `T`.
    pub fn opt_unsigned<T: TryFrom<u64>>(&self, key: &str) -> Result<Option<T>> {
        let Some(v) = self.get(key) else {
            return Ok(None);
        };
        let found = || match v {
            Value::Number(n) => n.to_string(),
            other => kind(other).to_owned(),
        };
        v.as_u64()
            .and_then(|n| T::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| self.mismatch(key, "unsigned integer in range", found()))
    }

    pub fn opt_seconds(&self, key: &str) -> Result<Option<Duration>> {
        let Some(secs) = self.opt_f64(key)? else {
            return Ok(None);
        };
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|_| self.mismatch(key, "non-negative number of seconds", secs.to_string()))
    }

    /// Exact decimal from its string form, never through a binary float.
    pub fn opt_decimal(&self, key: &str) -> Result<Option<Decimal>> {
        self.parse_str(key, "decimal string", |s| Decimal::from_str_exact(s).ok())
    }

    /// ISO-8601 timestamp with an explicit offset.
    pub fn opt_datetime(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        self.parse_str(key, "ISO-8601 timestamp with offset", |s| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
    }

    pub fn datetime(&self, key: &str) -> Result<DateTime<Utc>> {
        self.opt_datetime(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn opt_uri(&self, key: &str) -> Result<Option<Url>> {
        self.parse_str(key, "absolute URI", |s| Url::parse(s).ok())
    }

    pub fn uri(&self, key: &str) -> Result<Url> {
        self.opt_uri(key)?.ok_or_else(|| self.missing(key))
    }

    /// Value of a closed enum, matched case-sensitively.
    pub fn opt_enumeration<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        let Some(s) = self.opt_str(key)? else {
            return Ok(None);
        };
        s.parse().map(Some).map_err(|_| ConvertError::UnknownEnumValue {
            path: self.path(key),
            value: s,
        })
    }

    pub fn enumeration<T: FromStr>(&self, key: &str) -> Result<T> {
        self.opt_enumeration(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn object(&self, key: &str) -> Result<Fields<'a>> {
        Self::at(self.require(key)?, self.path(key))
    }

    pub fn opt_object(&self, key: &str) -> Result<Option<Fields<'a>>> {
        self.get(key).map(|v| Self::at(v, self.path(key))).transpose()
    }

    /// Objects of an array in source order; a missing array is empty.
    pub fn items(&self, key: &str) -> Result<Vec<Fields<'a>>> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| Self::at(v, format!("{}[{i}]", self.path(key))))
            .collect()
    }

    pub fn strings(&self, key: &str) -> Result<Vec<String>> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str().map(str::to_owned).ok_or_else(|| ConvertError::TypeMismatch {
                    path: format!("{}[{i}]", self.path(key)),
                    expected: "string",
                    found: kind(v).to_owned(),
                })
            })
            .collect()
    }

    pub fn string_map(&self, key: &str) -> Result<HashMap<String, String>> {
        let Some(fields) = self.opt_object(key)? else {
            return Ok(HashMap::new());
        };
        fields
            .map
            .keys()
            .map(|name| -> Result<_> { Ok((name.clone(), fields.str(name)?)) })
            .collect()
    }

    pub fn uri_map(&self, key: &str) -> Result<HashMap<String, Url>> {
        let Some(fields) = self.opt_object(key)? else {
            return Ok(HashMap::new());
        };
        fields
            .map
            .keys()
            .map(|name| -> Result<_> { Ok((name.clone(), fields.uri(name)?)) })
            .collect()
    }

    fn array(&self, key: &str) -> Result<&'a [Value]> {
        Ok(self
            .expect(key, "array", |v| v.as_array().map(Vec::as_slice))?
            .unwrap_or_default())
    }

    fn parse_str<T>(
        &self,
        key: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        let Some(s) = self.expect(key, "string", Value::as_str)? else {
            return Ok(None);
        };
        parse(s)
            .map(Some)
            .ok_or_else(|| self.mismatch(key, expected, format!("{s:?}")))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
