use http::{HeaderMap, HeaderName, HeaderValue, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cardapio::client::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const PARTNER_KEY_HEADER: &str = "x-partner-key";

/// Keys forwarded verbatim to the partner API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub api_key: String,
    pub partner_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, partner_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            partner_key: partner_key.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.partner_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentKind {
    Money,
    CreditCard,
    Online,
    Voucher,
    Other(String),
}

impl From<String> for PaymentKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Money" => PaymentKind::Money,
            "CreditCard" => PaymentKind::CreditCard,
            "Online" => PaymentKind::Online,
            "Voucher" => PaymentKind::Voucher,
            _ => PaymentKind::Other(tag),
        }
    }
}

impl From<PaymentKind> for String {
    fn from(kind: PaymentKind) -> Self {
        match kind {
            PaymentKind::Money => "Money".to_string(),
            PaymentKind::CreditCard => "CreditCard".to_string(),
            PaymentKind::Online => "Online".to_string(),
            PaymentKind::Voucher => "Voucher".to_string(),
            PaymentKind::Other(tag) => tag,
        }
    }
}

impl Serialize for PaymentKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from(self.clone()))
    }
}

impl<'de> Deserialize<'de> for PaymentKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(PaymentKind::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
    pub kind: PaymentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl PaymentMethod {
    pub fn new(id: i64, name: impl Into<String>, kind: PaymentKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            active: None,
        }
    }
}

/// Header mapping sent with a lookup, kept for display.
///
/// The outbound request is built from [`RequestTrace::header_map`], so the
/// trace always matches what went over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestTrace {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
    #[serde(rename = "X-API-KEY")]
    pub api_key: String,
    #[serde(rename = "X-PARTNER-KEY")]
    pub partner_key: String,
}

impl RequestTrace {
    pub fn header_map(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, header_value(&self.content_type)?);
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            header_value(&self.api_key)?,
        );
        headers.insert(
            HeaderName::from_static(PARTNER_KEY_HEADER),
            header_value(&self.partner_key)?,
        );
        Ok(headers)
    }
}

impl From<&Credentials> for RequestTrace {
    fn from(credentials: &Credentials) -> Self {
        Self {
            content_type: "application/json".to_string(),
            api_key: credentials.api_key.clone(),
            partner_key: credentials.partner_key.clone(),
        }
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(raw)
        .map_err(|e| ApiError::Transport(format!("Invalid header value: {}", e)))
}

/// Accepts both known upstream shapes: a bare array or `{ "data": [...] }`.
/// Anything else yields no methods.
pub(crate) fn extract_methods(body: Value) -> Result<Vec<PaymentMethod>, serde_json::Error> {
    let list = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Value::Array(items),
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };
    serde_json::from_value(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_bare_array() {
        let methods = extract_methods(json!([{ "id": 1, "name": "Dinheiro", "kind": "Money" }]))
            .unwrap();
        assert_eq!(methods, vec![PaymentMethod::new(1, "Dinheiro", PaymentKind::Money)]);
    }

    #[test]
    fn extracts_data_wrapper() {
        let methods = extract_methods(json!({
            "data": [{ "id": 7, "name": "PIX", "kind": "Online", "active": false }]
        }))
        .unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].kind, PaymentKind::Online);
        assert_eq!(methods[0].active, Some(false));
    }

    #[test]
    fn unknown_shapes_are_empty() {
        assert!(extract_methods(json!({ "items": [] })).unwrap().is_empty());
        assert!(extract_methods(json!({ "data": { "id": 1 } })).unwrap().is_empty());
        assert!(extract_methods(json!("nope")).unwrap().is_empty());
        assert!(extract_methods(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn malformed_entries_fail() {
        assert!(extract_methods(json!([{ "id": "x" }])).is_err());
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let methods =
            extract_methods(json!([{ "id": 3, "name": "Fiado", "kind": "Tab" }])).unwrap();
        assert_eq!(methods[0].kind, PaymentKind::Other("Tab".to_string()));
        assert_eq!(serde_json::to_value(&methods[0]).unwrap()["kind"], "Tab");
    }

    #[test]
    fn blank_keys_are_incomplete() {
        assert!(Credentials::new("k", "p").is_complete());
        assert!(!Credentials::new("", "p").is_complete());
        assert!(!Credentials::new("k", "   ").is_complete());
    }

    #[test]
    fn trace_serializes_with_header_names() {
        let trace = RequestTrace::from(&Credentials::new("K", "P"));
        assert_eq!(
            serde_json::to_value(&trace).unwrap(),
            json!({ "Content-Type": "application/json", "X-API-KEY": "K", "X-PARTNER-KEY": "P" })
        );
        let headers = trace.header_map().unwrap();
        assert_eq!(headers.get("X-API-KEY").unwrap(), "K");
        assert_eq!(headers.get("X-PARTNER-KEY").unwrap(), "P");
    }
}
