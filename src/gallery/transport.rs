//! Client side of the like counter boundary.

use std::future::Future;

use tracing::trace;

use crate::api::{
    ErrorBody, LikeEndpoint, LikeRequest, LikeResponse, STATUS_BAD_REQUEST, STATUS_NOT_FOUND,
    STATUS_OK,
};
use crate::error::LikeError;
use crate::models::{clamp_count, LikeDelta, MediaId};

/// Something that can ask the server to move a like counter.
///
/// Implementations resolve to the server's new count for the item.
pub trait LikeTransport {
    fn apply_delta(
        &self,
        media_id: MediaId,
        delta: LikeDelta,
    ) -> impl Future<Output = Result<u32, LikeError>>;
}

/// Talks to a [`LikeEndpoint`] through its JSON codec, running the blocking
/// handler off the interaction thread.
#[derive(Clone)]
pub struct EndpointTransport {
    endpoint: LikeEndpoint,
}

impl EndpointTransport {
    pub fn new(endpoint: LikeEndpoint) -> Self {
        Self { endpoint }
    }
}

impl LikeTransport for EndpointTransport {
    async fn apply_delta(&self, media_id: MediaId, delta: LikeDelta) -> Result<u32, LikeError> {
        let body = serde_json::to_string(&LikeRequest {
            media_id,
            delta: delta.value(),
        })
        .map_err(|e| LikeError::Transient(e.to_string()))?;

        let endpoint = self.endpoint.clone();
        let response = tokio::task::spawn_blocking(move || endpoint.handle(&body))
            .await
            .map_err(|e| LikeError::Transient(format!("request task failed: {}", e)))?;

        trace!(media_id, status = response.status, body = %response.body, "Like response");
        decode_response(media_id, response.status, &response.body)
    }
}

/// Map a raw endpoint response onto the client's view of the outcome.
pub fn decode_response(media_id: MediaId, status: u16, body: &str) -> Result<u32, LikeError> {
    match status {
        STATUS_OK => {
            let response: LikeResponse = serde_json::from_str(body)
                .map_err(|e| LikeError::Transient(format!("undecodable response: {}", e)))?;
            if response.id != media_id {
                return Err(LikeError::Transient(format!(
                    "response for media {} while liking {}",
                    response.id, media_id
                )));
            }
            Ok(clamp_count(response.likes))
        }
        STATUS_BAD_REQUEST => {
            let reason = serde_json::from_str::<ErrorBody>(body)
                .map(|e| e.error)
                .unwrap_or_else(|_| body.to_string());
            Err(LikeError::Validation(reason))
        }
        STATUS_NOT_FOUND => Err(LikeError::NotFound(media_id)),
        other => Err(LikeError::Transient(format!("unexpected status {}", other))),
    }
}
