//! Minimal XML-RPC value codec.
//!
//! Covers the subset of XML-RPC that Odoo's `common` and `object`
//! endpoints use: scalars, arrays, structs, and fault responses. Requests
//! are rendered directly to a string; responses are parsed with quick-xml.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;
use thiserror::Error;

/// Codec errors.
#[derive(Debug, Error)]
pub enum XmlRpcError {
    /// Malformed XML.
    #[error("Malformed XML-RPC payload: {0}")]
    Xml(String),

    /// Structurally valid XML that is not a valid XML-RPC response.
    #[error("Unexpected XML-RPC structure: {0}")]
    Unexpected(String),

    /// A `<fault>` response from the server.
    #[error("XML-RPC fault {code}: {message}")]
    Fault {
        /// Fault code.
        code: i64,
        /// Fault description.
        message: String,
    },
}

impl From<quick_xml::Error> for XmlRpcError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer (`<int>`, `<i4>`, `<i8>`).
    Int(i64),
    /// Boolean (`<boolean>`).
    Bool(bool),
    /// String (`<string>` or bare text).
    Str(String),
    /// Double; carried as a decimal so hour sums never touch binary floats.
    Double(Decimal),
    /// Array of values.
    Array(Vec<Value>),
    /// Struct (member name to value).
    Struct(BTreeMap<String, Value>),
    /// Explicit nil.
    Nil,
}

impl Value {
    /// Builds a string value.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// The integer content, if this is an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The array content, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The struct content, if this is a struct.
    #[must_use]
    pub const fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Numeric content as a decimal (ints and doubles).
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(i) => Some(Decimal::from(*i)),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Renders a complete `<methodCall>` document.
#[must_use]
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("<?xml version=\"1.0\"?><methodCall><methodName>");
    push_escaped(&mut out, method);
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        encode_value(param, &mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn encode_value(value: &Value, out: &mut String) {
    out.push_str("<value>");
    match value {
        Value::Int(i) => {
            let _ = write!(out, "<int>{i}</int>");
        }
        Value::Bool(b) => {
            let _ = write!(out, "<boolean>{}</boolean>", i32::from(*b));
        }
        Value::Str(s) => {
            out.push_str("<string>");
            push_escaped(out, s);
            out.push_str("</string>");
        }
        Value::Double(d) => {
            let _ = write!(out, "<double>{d}</double>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(item, out);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                push_escaped(out, name);
                out.push_str("</name>");
                encode_value(member, out);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

fn push_escaped(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Parses a `<methodResponse>` document into its single value.
///
/// # Errors
///
/// Returns `XmlRpcError::Fault` for fault responses and
/// `XmlRpcError::Unexpected` for documents that are not a method response.
pub fn parse_response(xml: &str) -> Result<Value, XmlRpcError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"methodResponse" => {}
                b"params" | b"param" => {}
                b"value" => return parse_value(&mut reader),
                b"fault" => return Err(parse_fault(&mut reader)?),
                other => {
                    return Err(XmlRpcError::Unexpected(format!(
                        "unexpected element <{}>",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Eof => {
                return Err(XmlRpcError::Unexpected(
                    "document ended before a value".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Parses the value the reader is positioned inside (after `<value>`).
fn parse_value(reader: &mut Reader<&[u8]>) -> Result<Value, XmlRpcError> {
    let mut bare_text: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let value = parse_typed(reader, e.name().as_ref())?;
                consume_end(reader, b"value")?;
                return Ok(value);
            }
            Event::Empty(e) => {
                let value = match e.name().as_ref() {
                    b"nil" => Value::Nil,
                    b"string" => Value::Str(String::new()),
                    other => {
                        return Err(XmlRpcError::Unexpected(format!(
                            "unexpected empty element <{}>",
                            String::from_utf8_lossy(other)
                        )));
                    }
                };
                consume_end(reader, b"value")?;
                return Ok(value);
            }
            Event::Text(t) => {
                bare_text = Some(t.unescape()?.into_owned());
            }
            Event::End(e) if e.name().as_ref() == b"value" => {
                // A <value> with bare text (or nothing) is a string.
                return Ok(Value::Str(bare_text.unwrap_or_default()));
            }
            Event::Eof => {
                return Err(XmlRpcError::Unexpected(
                    "document ended inside a value".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Parses a typed value after its opening tag.
fn parse_typed(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<Value, XmlRpcError> {
    match tag {
        b"int" | b"i4" | b"i8" => {
            let text = read_text(reader, tag)?;
            text.trim()
                .parse()
                .map(Value::Int)
                .map_err(|_| XmlRpcError::Unexpected(format!("bad integer {text:?}")))
        }
        b"boolean" => {
            let text = read_text(reader, tag)?;
            match text.trim() {
                "1" => Ok(Value::Bool(true)),
                "0" => Ok(Value::Bool(false)),
                other => Err(XmlRpcError::Unexpected(format!("bad boolean {other:?}"))),
            }
        }
        b"double" => {
            let text = read_text(reader, tag)?;
            let trimmed = text.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Value::Double)
                .map_err(|_| XmlRpcError::Unexpected(format!("bad double {text:?}")))
        }
        b"string" => Ok(Value::Str(read_text(reader, tag)?)),
        b"nil" => {
            consume_end(reader, b"nil")?;
            Ok(Value::Nil)
        }
        b"array" => parse_array(reader),
        b"struct" => parse_struct(reader),
        other => Err(XmlRpcError::Unexpected(format!(
            "unexpected element <{}>",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn parse_array(reader: &mut Reader<&[u8]>) -> Result<Value, XmlRpcError> {
    let mut items = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"data" => {}
                b"value" => items.push(parse_value(reader)?),
                other => {
                    return Err(XmlRpcError::Unexpected(format!(
                        "unexpected element <{}> in array",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::End(e) if e.name().as_ref() == b"array" => return Ok(Value::Array(items)),
            Event::End(_) => {}
            Event::Eof => {
                return Err(XmlRpcError::Unexpected(
                    "document ended inside an array".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn parse_struct(reader: &mut Reader<&[u8]>) -> Result<Value, XmlRpcError> {
    let mut members = BTreeMap::new();
    let mut pending_name: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"member" => {}
                b"name" => pending_name = Some(read_text(reader, b"name")?),
                b"value" => {
                    let name = pending_name.take().ok_or_else(|| {
                        XmlRpcError::Unexpected("struct member value before name".to_string())
                    })?;
                    members.insert(name, parse_value(reader)?);
                }
                other => {
                    return Err(XmlRpcError::Unexpected(format!(
                        "unexpected element <{}> in struct",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::End(e) if e.name().as_ref() == b"struct" => return Ok(Value::Struct(members)),
            Event::End(_) => {}
            Event::Eof => {
                return Err(XmlRpcError::Unexpected(
                    "document ended inside a struct".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Parses a `<fault>` body into its error.
fn parse_fault(reader: &mut Reader<&[u8]>) -> Result<XmlRpcError, XmlRpcError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"value" => {
                let value = parse_value(reader)?;
                let members = value.as_struct().ok_or_else(|| {
                    XmlRpcError::Unexpected("fault body is not a struct".to_string())
                })?;
                let code = members
                    .get("faultCode")
                    .and_then(Value::as_int)
                    .unwrap_or(0);
                let message = members
                    .get("faultString")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown fault")
                    .to_string();
                return Ok(XmlRpcError::Fault { code, message });
            }
            Event::Eof => {
                return Err(XmlRpcError::Unexpected(
                    "document ended inside a fault".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// Accumulates text until the matching end tag.
fn read_text(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<String, XmlRpcError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::End(e) if e.name().as_ref() == tag => return Ok(text),
            Event::Eof => {
                return Err(XmlRpcError::Unexpected(format!(
                    "document ended inside <{}>",
                    String::from_utf8_lossy(tag)
                )));
            }
            _ => {}
        }
    }
}

/// Skips events until the given end tag.
fn consume_end(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<(), XmlRpcError> {
    loop {
        match reader.read_event()? {
            Event::End(e) if e.name().as_ref() == tag => return Ok(()),
            Event::Eof => {
                return Err(XmlRpcError::Unexpected(format!(
                    "document ended before </{}>",
                    String::from_utf8_lossy(tag)
                )));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_encode_authenticate_call() {
        let xml = encode_call(
            "authenticate",
            &[
                Value::string("agency"),
                Value::string("admin"),
                Value::string("p&ss<word>"),
                Value::Struct(BTreeMap::new()),
            ],
        );
        assert!(xml.starts_with("<?xml version=\"1.0\"?><methodCall>"));
        assert!(xml.contains("<methodName>authenticate</methodName>"));
        assert!(xml.contains("<string>p&amp;ss&lt;word&gt;</string>"));
        assert!(xml.contains("<struct></struct>"));
    }

    #[test]
    fn test_encode_nested_array() {
        let xml = encode_call(
            "execute_kw",
            &[Value::Array(vec![
                Value::Array(vec![
                    Value::string("date"),
                    Value::string(">="),
                    Value::string("2026-06-01"),
                ]),
                Value::Bool(true),
                Value::Int(7),
                Value::Double(dec!(1.5)),
            ])],
        );
        assert!(xml.contains("<array><data><array><data>"));
        assert!(xml.contains("<boolean>1</boolean>"));
        assert!(xml.contains("<int>7</int>"));
        assert!(xml.contains("<double>1.5</double>"));
    }

    #[test]
    fn test_parse_int_response() {
        let xml = "<?xml version=\"1.0\"?><methodResponse><params><param>\
                   <value><int>42</int></value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_parse_bool_false_uid() {
        // Odoo returns boolean false for bad credentials.
        let xml = "<methodResponse><params><param>\
                   <value><boolean>0</boolean></value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_parse_bare_text_is_string() {
        let xml = "<methodResponse><params><param>\
                   <value>plain</value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::Str("plain".into()));
    }

    #[test]
    fn test_parse_read_group_shape() {
        let xml = "<methodResponse><params><param><value><array><data>\
                   <value><struct>\
                   <member><name>department_id</name><value><array><data>\
                   <value><int>3</int></value><value><string>Design</string></value>\
                   </data></array></value></member>\
                   <member><name>unit_amount</name><value><double>120.5</double></value></member>\
                   </struct></value>\
                   <value><struct>\
                   <member><name>department_id</name><value><boolean>0</boolean></value></member>\
                   <member><name>unit_amount</name><value><double>8.0</double></value></member>\
                   </struct></value>\
                   </data></array></value></param></params></methodResponse>";

        let value = parse_response(xml).unwrap();
        let groups = value.as_array().unwrap();
        assert_eq!(groups.len(), 2);

        let first = groups[0].as_struct().unwrap();
        let dept = first.get("department_id").unwrap().as_array().unwrap();
        assert_eq!(dept[0], Value::Int(3));
        assert_eq!(dept[1], Value::Str("Design".into()));
        assert_eq!(
            first.get("unit_amount").unwrap().as_decimal(),
            Some(dec!(120.5))
        );

        let second = groups[1].as_struct().unwrap();
        assert_eq!(second.get("department_id"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_parse_fault() {
        let xml = "<methodResponse><fault><value><struct>\
                   <member><name>faultCode</name><value><int>1</int></value></member>\
                   <member><name>faultString</name><value><string>Access Denied</string></value></member>\
                   </struct></value></fault></methodResponse>";
        match parse_response(xml) {
            Err(XmlRpcError::Fault { code, message }) => {
                assert_eq!(code, 1);
                assert_eq!(message, "Access Denied");
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_html_is_an_error() {
        let html = "<!DOCTYPE html><html><body>login</body></html>";
        assert!(parse_response(html).is_err());
    }

    #[test]
    fn test_roundtrip_struct() {
        let mut members = BTreeMap::new();
        members.insert("limit".to_string(), Value::Int(10));
        members.insert("flag".to_string(), Value::Bool(true));
        let xml = encode_call("m", &[Value::Struct(members.clone())]);

        // Wrap the encoded params in a response envelope and re-parse.
        let body = xml
            .split_once("<param>")
            .unwrap()
            .1
            .split_once("</param>")
            .unwrap()
            .0;
        let response = format!(
            "<methodResponse><params><param>{body}</param></params></methodResponse>"
        );
        assert_eq!(parse_response(&response).unwrap(), Value::Struct(members));
    }

    #[test]
    fn test_nil_value() {
        let xml = "<methodResponse><params><param>\
                   <value><nil/></value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::Nil);
    }
}
