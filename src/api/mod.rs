//! REST client for the OrderDesk API
//!
//! Thin typed wrapper over the order and notification endpoints. The server
//! is the source of truth; everything here returns read-only snapshots or
//! issues idempotent mutations.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ErrorResponse};
use crate::notifications::model::NotificationPage;
use crate::orders::model::Order;

/// Per-request timeout for REST calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed client for the OrderDesk REST surface
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session_token: String,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: Vec<Order>,
}

impl ApiClient {
    /// Create a client bound to a session token
    pub fn new(config: &ClientConfig, session_token: String) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch a single order snapshot
    pub async fn get_order(&self, id: Uuid) -> ClientResult<Order> {
        let response = self
            .http
            .get(self.endpoint(&format!("/api/orders/{}", id)))
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        let order: Order = check(response).await?.json().await?;

        if let Err(reason) = order.validate_snapshot() {
            // Server owns the invariants; surface drift without failing the read
            tracing::warn!(order_id = %order.id, reason = %reason, "Order snapshot failed invariant check");
        }

        Ok(order)
    }

    /// Fetch orders belonging to the current session
    pub async fn list_my_orders(&self) -> ClientResult<Vec<Order>> {
        let response = self
            .http
            .get(self.endpoint("/api/orders"))
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        let page: OrdersResponse = check(response).await?.json().await?;
        Ok(page.orders)
    }

    /// Fetch the most recent notifications plus the authoritative unread count
    pub async fn list_notifications(&self, limit: u32) -> ClientResult<NotificationPage> {
        let response = self
            .http
            .get(self.endpoint("/api/notifications"))
            .query(&[("limit", limit)])
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        let page: NotificationPage = check(response).await?.json().await?;
        Ok(page)
    }

    /// Mark one notification read. Marking an already-read notification is a
    /// no-op success on the server.
    pub async fn mark_notification_read(&self, id: Uuid) -> ClientResult<()> {
        let response = self
            .http
            .patch(self.endpoint(&format!("/api/notifications/{}/read", id)))
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    /// Mark every notification for this session read
    pub async fn mark_all_notifications_read(&self) -> ClientResult<()> {
        let response = self
            .http
            .patch(self.endpoint("/api/notifications/read-all"))
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    /// Delete a notification. Deleting one that is already gone counts as
    /// success so retries and races stay harmless.
    pub async fn delete_notification(&self, id: Uuid) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/api/notifications/{}", id)))
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        check(response).await?;
        Ok(())
    }
}

/// Map a non-success response to a `ClientError::Api`, decoding the server's
/// error envelope when possible
async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    match response.json::<ErrorResponse>().await {
        Ok(envelope) => Err(ClientError::from_envelope(code, envelope)),
        Err(_) => Err(ClientError::from_status(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn client() -> ApiClient {
        let config = ClientConfig {
            api_base_url: "http://localhost:5000/".to_string(),
            ws_url: "ws://localhost:5000/ws".to_string(),
            session_token: None,
            backlog_limit: 20,
            reconnect_attempts: 5,
            reconnect_delay: StdDuration::from_millis(1000),
            reconnect_delay_max: StdDuration::from_millis(5000),
            connect_timeout: StdDuration::from_secs(20),
            log_level: "info".to_string(),
        };
        ApiClient::new(&config, "token".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = client();
        assert_eq!(
            client.endpoint("/api/notifications"),
            "http://localhost:5000/api/notifications"
        );
    }
}
