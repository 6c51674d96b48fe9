//! core::metadata::codec
//!
//! Encoding of type-handler parameters into a type signature's parameter
//! slot, and decoding them back.
//!
//! # Format
//!
//! - Strings and numbers are written verbatim, `null` as `null`
//! - Lists and maps are written as JSON with `&`, `'`, `"`, `<`, `>`
//!   escaped to `\u00XX` inside string literals, so the result can be
//!   embedded in a quoted parameter list
//! - Several parameters are joined as `'p1','p2',...`
//!
//! # Decoding
//!
//! [`decode`] parses the text as JSON and falls back to the raw string
//! when parsing fails. This is not a strict inverse of [`encode`]: a
//! string parameter that happens to be valid JSON (`"true"`, `"42"`,
//! `"null"`, `"[1]"`) decodes to the JSON value, not to the string.
//! Consumers rely on this behaviour, so it is kept as is.
//!
//! # Example
//!
//! ```
//! use serialmeta::core::metadata::codec::{decode, encode, HandlerParam};
//!
//! let list = HandlerParam::List(vec![
//!     HandlerParam::from(1),
//!     HandlerParam::from("two"),
//!     HandlerParam::Null,
//! ]);
//! let encoded = encode(&list).unwrap();
//! assert_eq!(encoded, "[1,\"two\",null]");
//! assert_eq!(decode(&encoded), list);
//!
//! assert_eq!(decode("true"), HandlerParam::Bool(true));
//! assert_eq!(decode("hello"), HandlerParam::from("hello"));
//! ```

use std::io;

use serde::Deserialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter};
use thiserror::Error;

/// Errors from parameter encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The value is not a string, number, null, list or map.
    #[error("unsupported handler parameter type: {0}")]
    UnsupportedParameterType(String),

    /// A list or map could not be represented as JSON.
    #[error("could not encode array parameter to json: {0}")]
    EncodingFailure(String),
}

/// A type-handler parameter value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum HandlerParam {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<HandlerParam>),
    /// Associative array; key order is preserved.
    Map(Vec<(String, HandlerParam)>),
    /// A handle with no data representation (object, resource, ...).
    /// Carries a description of the value's kind.
    Opaque(String),
}

impl HandlerParam {
    /// Name of the value's kind, for error messages.
    pub fn kind(&self) -> &str {
        match self {
            HandlerParam::Null => "null",
            HandlerParam::Bool(_) => "bool",
            HandlerParam::Number(_) => "number",
            HandlerParam::String(_) => "string",
            HandlerParam::List(_) => "list",
            HandlerParam::Map(_) => "map",
            HandlerParam::Opaque(kind) => kind,
        }
    }

    /// The JSON form of the value. Opaque values have none.
    pub fn to_json(&self) -> Result<serde_json::Value, CodecError> {
        Ok(match self {
            HandlerParam::Null => serde_json::Value::Null,
            HandlerParam::Bool(b) => serde_json::Value::Bool(*b),
            HandlerParam::Number(n) => serde_json::Value::Number(n.clone()),
            HandlerParam::String(s) => serde_json::Value::String(s.clone()),
            HandlerParam::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(HandlerParam::to_json)
                    .collect::<Result<_, _>>()?,
            ),
            HandlerParam::Map(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                serde_json::Value::Object(map)
            }
            HandlerParam::Opaque(kind) => {
                return Err(CodecError::EncodingFailure(format!(
                    "{kind} value has no JSON representation"
                )))
            }
        })
    }
}

impl From<serde_json::Value> for HandlerParam {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => HandlerParam::Null,
            serde_json::Value::Bool(b) => HandlerParam::Bool(b),
            serde_json::Value::Number(n) => HandlerParam::Number(n),
            serde_json::Value::String(s) => HandlerParam::String(s),
            serde_json::Value::Array(items) => {
                HandlerParam::List(items.into_iter().map(HandlerParam::from).collect())
            }
            serde_json::Value::Object(map) => HandlerParam::Map(
                map.into_iter()
                    .map(|(k, v)| (k, HandlerParam::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for HandlerParam {
    fn from(s: &str) -> Self {
        HandlerParam::String(s.to_string())
    }
}

impl From<String> for HandlerParam {
    fn from(s: String) -> Self {
        HandlerParam::String(s)
    }
}

impl From<i32> for HandlerParam {
    fn from(n: i32) -> Self {
        HandlerParam::Number(n.into())
    }
}

impl From<i64> for HandlerParam {
    fn from(n: i64) -> Self {
        HandlerParam::Number(n.into())
    }
}

impl From<bool> for HandlerParam {
    fn from(b: bool) -> Self {
        HandlerParam::Bool(b)
    }
}

/// Encode a single parameter.
///
/// # Errors
///
/// - [`CodecError::UnsupportedParameterType`] for booleans and opaque
///   values at the top level
/// - [`CodecError::EncodingFailure`] if a list or map contains a value
///   with no JSON representation
pub fn encode(value: &HandlerParam) -> Result<String, CodecError> {
    match value {
        HandlerParam::String(s) => Ok(s.clone()),
        HandlerParam::Number(n) => Ok(n.to_string()),
        HandlerParam::Null => Ok("null".to_string()),
        HandlerParam::List(_) | HandlerParam::Map(_) => {
            let json = value.to_json()?;
            to_escaped_json(&json)
        }
        HandlerParam::Bool(_) | HandlerParam::Opaque(_) => Err(
            CodecError::UnsupportedParameterType(value.kind().to_string()),
        ),
    }
}

/// Decode a single parameter. Never fails; see the module docs.
pub fn decode(value: &str) -> HandlerParam {
    match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => HandlerParam::from(json),
        Err(_) => HandlerParam::String(value.to_string()),
    }
}

/// Encode parameters into the joined `'p1','p2'` form.
///
/// An empty parameter list yields an empty string.
pub fn encode_params(params: &[HandlerParam]) -> Result<String, CodecError> {
    if params.is_empty() {
        return Ok(String::new());
    }

    let encoded = params
        .iter()
        .map(encode)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!("'{}'", encoded.join("','")))
}

fn to_escaped_json(value: &serde_json::Value) -> Result<String, CodecError> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, HexEscapeFormatter);
    serde::Serialize::serialize(value, &mut serializer)
        .map_err(|e| CodecError::EncodingFailure(e.to_string()))?;
    String::from_utf8(out).map_err(|e| CodecError::EncodingFailure(e.to_string()))
}

/// Compact JSON formatter that hex-escapes HTML-unsafe characters in strings.
struct HexEscapeFormatter;

impl HexEscapeFormatter {
    fn hex_escape(c: char) -> Option<&'static str> {
        match c {
            '&' => Some("\\u0026"),
            '\'' => Some("\\u0027"),
            '<' => Some("\\u003C"),
            '>' => Some("\\u003E"),
            _ => None,
        }
    }
}

impl Formatter for HexEscapeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if let Some(escaped) = Self::hex_escape(c) {
                writer.write_all(fragment[start..i].as_bytes())?;
                writer.write_all(escaped.as_bytes())?;
                start = i + c.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<HandlerParam>) -> HandlerParam {
        HandlerParam::List(items)
    }

    #[test]
    fn scalars_encode_verbatim() {
        assert_eq!(encode(&HandlerParam::from("Y-m-d")).unwrap(), "Y-m-d");
        assert_eq!(encode(&HandlerParam::from(42)).unwrap(), "42");
        assert_eq!(encode(&HandlerParam::Null).unwrap(), "null");
    }

    #[test]
    fn null_roundtrips() {
        let encoded = encode(&HandlerParam::Null).unwrap();
        assert_eq!(decode(&encoded), HandlerParam::Null);
    }

    #[test]
    fn list_roundtrips() {
        let value = list(vec![
            HandlerParam::from(1),
            HandlerParam::from("two"),
            HandlerParam::Null,
        ]);
        let encoded = encode(&value).unwrap();
        assert_eq!(decode(&encoded), value);
    }

    #[test]
    fn map_preserves_key_order() {
        let value = HandlerParam::Map(vec![
            ("z".to_string(), HandlerParam::from(1)),
            ("a".to_string(), HandlerParam::from(2)),
        ]);
        let encoded = encode(&value).unwrap();
        assert_eq!(encoded, "{\"z\":1,\"a\":2}");
        assert_eq!(decode(&encoded), value);
    }

    #[test]
    fn unsafe_characters_are_hex_escaped() {
        let value = list(vec![HandlerParam::from("<a href=\"x\">Tom & Jerry's</a>")]);
        let encoded = encode(&value).unwrap();
        assert_eq!(
            encoded,
            "[\"\\u003Ca href=\\u0022x\\u0022\\u003ETom \\u0026 Jerry\\u0027s\\u003C/a\\u003E\"]"
        );
        for c in ['<', '>', '&', '\''] {
            assert!(!encoded.contains(c), "{c} leaked into {encoded}");
        }
        assert_eq!(decode(&encoded), value);
    }

    #[test]
    fn nested_booleans_are_allowed() {
        let value = list(vec![HandlerParam::Bool(true)]);
        assert_eq!(encode(&value).unwrap(), "[true]");
    }

    #[test]
    fn top_level_bool_is_unsupported() {
        let err = encode(&HandlerParam::Bool(true)).unwrap_err();
        assert_eq!(err, CodecError::UnsupportedParameterType("bool".to_string()));
    }

    #[test]
    fn opaque_is_unsupported() {
        let err = encode(&HandlerParam::Opaque("resource".to_string())).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedParameterType(kind) if kind == "resource"));
    }

    #[test]
    fn nested_opaque_is_encoding_failure() {
        let value = list(vec![HandlerParam::Opaque("object".to_string())]);
        assert!(matches!(
            encode(&value),
            Err(CodecError::EncodingFailure(_))
        ));
    }

    #[test]
    fn decode_falls_back_to_raw_string() {
        assert_eq!(decode("hello"), HandlerParam::from("hello"));
        assert_eq!(decode(""), HandlerParam::from(""));
        assert_eq!(decode("Y-m-d\\TH:i:s"), HandlerParam::from("Y-m-d\\TH:i:s"));
    }

    #[test]
    fn decode_is_not_inverse_for_json_looking_strings() {
        // Expected: JSON-looking strings decode to their JSON value.
        assert_eq!(decode("true"), HandlerParam::Bool(true));
        assert_eq!(decode("42"), HandlerParam::from(42));
        assert_eq!(decode("null"), HandlerParam::Null);
        assert_eq!(
            decode("[1,2]"),
            list(vec![HandlerParam::from(1), HandlerParam::from(2)])
        );
    }

    #[test]
    fn params_join() {
        let params = vec![
            HandlerParam::from("Y-m-d"),
            HandlerParam::from(3),
            list(vec![HandlerParam::from("a")]),
        ];
        assert_eq!(encode_params(&params).unwrap(), "'Y-m-d','3','[\"a\"]'");
    }

    #[test]
    fn empty_params_join_to_empty() {
        assert_eq!(encode_params(&[]).unwrap(), "");
    }

    #[test]
    fn params_join_propagates_errors() {
        let params = vec![HandlerParam::from("ok"), HandlerParam::Bool(false)];
        assert!(encode_params(&params).is_err());
    }

    #[test]
    fn deserializes_from_yaml() {
        let param: HandlerParam = serde_yaml::from_str("[1, two, ~]").unwrap();
        assert_eq!(
            param,
            list(vec![
                HandlerParam::from(1),
                HandlerParam::from("two"),
                HandlerParam::Null
            ])
        );
    }
}
