//! Request body binding
//!
//! [`Payload<T>`] accepts the body shapes clients send:
//!
//! - `application/x-www-form-urlencoded` with flat fields
//! - JSON wrapped in the entity key, e.g. `{"item": {...}}`
//! - bare JSON, e.g. `{"name": ...}`
//!
//! A body that cannot be parsed is a 400. Field-level problems are left to
//! the validators so they come back as 422 with a field map.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Form, FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Names a request type may be wrapped under in a JSON body
pub trait Envelope {
    const KEYS: &'static [&'static str];
}

/// A request body deserialized into `T`
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Envelope + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid form body: {}", e.body_text())))?;
            return Ok(Payload(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Unreadable body: {}", e.body_text())))?;

        from_json_bytes(&bytes).map(Payload)
    }
}

/// Parses a JSON body, unwrapping the entity envelope if present
pub fn from_json_bytes<T>(bytes: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Envelope,
{
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    serde_json::from_value(unwrap_envelope::<T>(value))
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

fn unwrap_envelope<T: Envelope>(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 => {
            let key = T::KEYS.iter().find(|key| map.contains_key(**key));
            match key.and_then(|key| map.remove(*key)) {
                Some(inner @ Value::Object(_)) => inner,
                Some(other) => {
                    // Not an envelope after all
                    if let Some(key) = key {
                        map.insert((*key).to_string(), other);
                    }
                    Value::Object(map)
                }
                None => Value::Object(map),
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        #[serde(default)]
        name: String,
        count: Option<i32>,
    }

    impl Envelope for Thing {
        const KEYS: &'static [&'static str] = &["thing", "Thing"];
    }

    #[test]
    fn test_enveloped_json() {
        let thing: Thing = from_json_bytes(br#"{"thing": {"name": "a", "count": 2}}"#).unwrap();
        assert_eq!(thing, Thing { name: "a".into(), count: Some(2) });

        let thing: Thing = from_json_bytes(br#"{"Thing": {"name": "b"}}"#).unwrap();
        assert_eq!(thing.name, "b");
    }

    #[test]
    fn test_bare_json() {
        let thing: Thing = from_json_bytes(br#"{"name": "a", "count": 2}"#).unwrap();
        assert_eq!(thing.count, Some(2));

        let thing: Thing = from_json_bytes(br#"{"name": "solo"}"#).unwrap();
        assert_eq!(thing.name, "solo");

        // The entity key holding a non-object is left alone
        let thing: Thing = from_json_bytes(br#"{"thing": "solo"}"#).unwrap();
        assert_eq!(thing.name, "");
    }

    #[test]
    fn test_missing_string_fields_default() {
        let thing: Thing = from_json_bytes(b"{}").unwrap();
        assert_eq!(thing, Thing { name: String::new(), count: None });
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let err = from_json_bytes::<Thing>(b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = from_json_bytes::<Thing>(br#"{"count": "many"}"#).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
