//! Request/response boundary of the like counter.
//!
//! Bodies are JSON. A request is `{"mediaId": 12, "delta": 1}`; success is
//! `200 {"id": 12, "likes": 7}`, a malformed request is `400` and an unknown
//! media id is `404`.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::CounterError;
use crate::models::MediaId;
use crate::storage::LikeCounterService;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub media_id: MediaId,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub id: MediaId,
    pub likes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, body: &T) -> Self {
        // Serializing these plain structs cannot fail
        let body = serde_json::to_string(body).unwrap_or_default();
        Self { status, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(
            status,
            &ErrorBody {
                error: message.to_string(),
            },
        )
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The counter-mutation endpoint.
///
/// Cloning shares the underlying counter. Handling is blocking; async callers
/// run it on the blocking pool.
#[derive(Clone)]
pub struct LikeEndpoint {
    counter: Arc<Mutex<LikeCounterService>>,
}

impl LikeEndpoint {
    pub fn new(counter: LikeCounterService) -> Self {
        Self {
            counter: Arc::new(Mutex::new(counter)),
        }
    }

    pub fn handle(&self, body: &str) -> ApiResponse {
        let (media_id, delta) = match parse_request(body) {
            Some(parsed) => parsed,
            None => {
                warn!(body, "Rejected malformed like request");
                return ApiResponse::error(STATUS_BAD_REQUEST, "Bad request");
            }
        };

        match self.counter.lock().apply_delta(media_id, delta) {
            Ok(likes) => ApiResponse::json(STATUS_OK, &LikeResponse { id: media_id, likes }),
            Err(CounterError::BadRequest(reason)) => {
                warn!(media_id, delta, %reason, "Rejected like request");
                ApiResponse::error(STATUS_BAD_REQUEST, "Bad request")
            }
            Err(CounterError::NotFound(_)) => {
                warn!(media_id, "Like request for unknown media");
                ApiResponse::error(STATUS_NOT_FOUND, "Media not found")
            }
            Err(e) => {
                error!(media_id, error = %e, "Like counter failed");
                ApiResponse::error(STATUS_INTERNAL_ERROR, "Internal error")
            }
        }
    }
}

/// Extract `(mediaId, delta)` from a request body.
///
/// Both fields go through number coercion: JSON numbers, numeric strings,
/// booleans and `null` are accepted as long as the result is integral
/// (`true` is 1, `false`, `null` and `""` are 0). A missing field is rejected.
/// The delta must be -1 or 1.
fn parse_request(body: &str) -> Option<(MediaId, i64)> {
    let value: Value = serde_json::from_str(body).ok()?;
    let media_id = coerce_integer(value.get("mediaId")?)?;
    let delta = coerce_integer(value.get("delta")?)?;
    if delta != 1 && delta != -1 {
        return None;
    }
    Some((media_id, delta))
}

fn coerce_integer(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => return Some(i64::from(*b)),
        Value::Null => return Some(0),
        Value::Array(_) | Value::Object(_) => return None,
    };

    if number.is_finite() && number.fract() == 0.0 && number.abs() <= i64::MAX as f64 {
        Some(number as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::storage::Catalog;
    use crate::test_utils::{test_media, test_photographer};

    fn endpoint(dir: &std::path::Path) -> LikeEndpoint {
        let db_path = dir.join("test.sqlite");
        Catalog::open(&db_path)
            .unwrap()
            .seed(&[test_photographer(1)], &[test_media(7, 1)])
            .unwrap();
        LikeEndpoint::new(LikeCounterService::open(&db_path).unwrap())
    }

    #[test]
    fn test_success_returns_new_count() {
        let dir = tempdir().unwrap();
        let endpoint = endpoint(dir.path());

        let response = endpoint.handle(r#"{"mediaId":7,"delta":1}"#);
        assert_eq!(response.status, STATUS_OK);
        let body: LikeResponse = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body, LikeResponse { id: 7, likes: 11 });
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let dir = tempdir().unwrap();
        let endpoint = endpoint(dir.path());

        let response = endpoint.handle(r#"{"mediaId":"7","delta":"-1"}"#);
        assert_eq!(response.status, STATUS_OK);
        assert_eq!(response.body, r#"{"id":7,"likes":9}"#);
    }

    #[test]
    fn test_bad_requests() {
        let dir = tempdir().unwrap();
        let endpoint = endpoint(dir.path());

        for body in [
            r#"{"mediaId":7,"delta":2}"#,
            r#"{"mediaId":7,"delta":0}"#,
            r#"{"mediaId":"abc","delta":1}"#,
            r#"{"mediaId":7.5,"delta":1}"#,
            r#"{"mediaId":7}"#,
            r#"{"delta":1}"#,
            r#"{"mediaId":7,"delta":null}"#,
            r#"{"mediaId":[7],"delta":1}"#,
            "not json",
        ] {
            let response = endpoint.handle(body);
            assert_eq!(response.status, STATUS_BAD_REQUEST, "body: {}", body);
            let error: ErrorBody = serde_json::from_str(&response.body).unwrap();
            assert_eq!(error.error, "Bad request");
        }

        // Nothing was written by the rejected requests
        let response = endpoint.handle(r#"{"mediaId":7,"delta":1}"#);
        assert_eq!(response.body, r#"{"id":7,"likes":11}"#);
    }

    #[test]
    fn test_unknown_media_is_not_found() {
        let dir = tempdir().unwrap();
        let endpoint = endpoint(dir.path());

        let response = endpoint.handle(r#"{"mediaId":404,"delta":1}"#);
        assert_eq!(response.status, STATUS_NOT_FOUND);
        assert!(!response.is_success());
        assert_eq!(response.body, r#"{"error":"Media not found"}"#);
    }

    #[test]
    fn test_boolean_and_null_fields_coerce() {
        let dir = tempdir().unwrap();
        let endpoint = endpoint(dir.path());

        // A true delta counts as +1
        let response = endpoint.handle(r#"{"mediaId":7,"delta":true}"#);
        assert_eq!(response.body, r#"{"id":7,"likes":11}"#);

        // A null id coerces to 0, which matches no media
        let response = endpoint.handle(r#"{"mediaId":null,"delta":1}"#);
        assert_eq!(response.status, STATUS_NOT_FOUND);
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(&Value::from(3)), Some(3));
        assert_eq!(coerce_integer(&Value::from(3.0)), Some(3));
        assert_eq!(coerce_integer(&Value::from(" 12 ")), Some(12));
        assert_eq!(coerce_integer(&Value::from("")), Some(0));
        assert_eq!(coerce_integer(&Value::from(0.5)), None);
        assert_eq!(coerce_integer(&Value::Bool(true)), Some(1));
        assert_eq!(coerce_integer(&Value::Bool(false)), Some(0));
        assert_eq!(coerce_integer(&Value::Null), Some(0));
        assert_eq!(coerce_integer(&serde_json::json!({"id": 1})), None);
    }
}
