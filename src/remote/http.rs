use crate::{
    config::EndpointConfig,
    domain::{CardId, StatusId},
    remote::{Outcome, StatusUpdater},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct StatusUpdateRequest<'a> {
    status: &'a str,
}

#[derive(Debug, Deserialize)]
struct StatusUpdateResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Sends status changes to the board's HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpStatusUpdater {
    http: Client,
    endpoint: EndpointConfig,
}

impl HttpStatusUpdater {
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: EndpointConfig) -> Self {
        Self { http, endpoint }
    }

    async fn send_update(
        &self,
        card: &CardId,
        status: &StatusId,
    ) -> anyhow::Result<StatusUpdateResponse> {
        let url = self.endpoint.url_for(card);
        let response = self
            .http
            .post(&url)
            .json(&StatusUpdateRequest {
                status: status.as_str(),
            })
            .send()
            .await
            .with_context(|| format!("status update request to {url} failed"))?;

        // Rejections (403, 500) carry the same JSON shape, so the body
        // decides the outcome rather than the HTTP status
        let code = response.status();
        response
            .json::<StatusUpdateResponse>()
            .await
            .with_context(|| format!("unreadable status update response ({code})"))
    }
}

#[async_trait]
impl StatusUpdater for HttpStatusUpdater {
    async fn update_status(&self, card: &CardId, status: &StatusId) -> Outcome {
        match self.send_update(card, status).await {
            Ok(response) if response.success => {
                debug!(card = %card, status = %status, "status update accepted");
                Outcome::Success
            }
            Ok(response) => {
                warn!(
                    card = %card,
                    status = %status,
                    reason = response.message.as_deref().unwrap_or(""),
                    "status update rejected"
                );
                Outcome::Failure
            }
            Err(e) => {
                warn!(card = %card, status = %status, "status update failed: {e:#}");
                Outcome::Failure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::{net::TcpListener, sync::Mutex};

    #[derive(Clone)]
    struct ServerState {
        reply: Arc<dyn Fn() -> Response + Send + Sync>,
        received: Arc<Mutex<Vec<(String, Value)>>>,
    }

    async fn handle_update(
        State(state): State<ServerState>,
        Path(id): Path<String>,
        Json(payload): Json<Value>,
    ) -> Response {
        state.received.lock().await.push((id, payload));
        (state.reply)()
    }

    async fn spawn_status_server(
        reply: impl Fn() -> Response + Send + Sync + 'static,
    ) -> (String, Arc<Mutex<Vec<(String, Value)>>>) {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            reply: Arc::new(reply),
            received: Arc::clone(&received),
        };
        let app = Router::new()
            .route("/requests/api/update-status/:id", post(handle_update))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), received)
    }

    fn updater_for(base_url: String) -> HttpStatusUpdater {
        HttpStatusUpdater::new(EndpointConfig {
            base_url,
            ..EndpointConfig::default()
        })
    }

    #[tokio::test]
    async fn test_success_posts_status_payload() {
        let (base_url, received) = spawn_status_server(|| {
            Json(json!({ "success": true, "message": "Status updated" })).into_response()
        })
        .await;

        let outcome = updater_for(base_url)
            .update_status(&CardId::from(7), &StatusId::from("Repaired"))
            .await;

        assert_eq!(outcome, Outcome::Success);
        let received = received.lock().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, "7");
        assert_eq!(received[0].1, json!({ "status": "Repaired" }));
    }

    #[tokio::test]
    async fn test_server_rejection_is_failure() {
        let (base_url, received) = spawn_status_server(|| {
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "success": false, "message": "Access denied" })),
            )
                .into_response()
        })
        .await;

        let outcome = updater_for(base_url)
            .update_status(&CardId::from(7), &StatusId::from("Scrap"))
            .await;

        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(received.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_non_json_body_is_failure() {
        let (base_url, _) = spawn_status_server(|| {
            (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response()
        })
        .await;

        let outcome = updater_for(base_url)
            .update_status(&CardId::from(1), &StatusId::from("New"))
            .await;

        assert_eq!(outcome, Outcome::Failure);
    }

    #[tokio::test]
    async fn test_missing_success_field_is_failure() {
        let (base_url, _) =
            spawn_status_server(|| Json(json!({ "ok": true })).into_response()).await;

        let outcome = updater_for(base_url)
            .update_status(&CardId::from(1), &StatusId::from("New"))
            .await;

        assert_eq!(outcome, Outcome::Failure);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_failure() {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = updater_for(format!("http://{addr}"))
            .update_status(&CardId::from(1), &StatusId::from("New"))
            .await;

        assert_eq!(outcome, Outcome::Failure);
    }
}
