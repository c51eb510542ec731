use serde::de::DeserializeOwned;

use crate::common::{ChatMessage, OutgoingMessage, Profile, Role, Session};
use crate::error::{ClientError, Result};

/// Seam over the backend REST surface.
///
/// The chat layer is generic over this trait so the message channel and
/// session store can be exercised against a recording mock instead of a
/// live server.
pub trait ChatTransport {
    /// `GET /api/chat/sessions/{role}/{ownerId}`
    async fn fetch_sessions(&self, owner_id: &str, role: Role) -> Result<Vec<Session>>;
    /// `GET /api/chat/{driverId}/{passengerId}`, oldest first.
    async fn fetch_history(&self, driver_id: &str, passenger_id: &str)
    -> Result<Vec<ChatMessage>>;
    /// `POST /api/chat/send`
    async fn send_message(&self, outgoing: &OutgoingMessage) -> Result<()>;
    /// `GET /api/driver/{id}` or `GET /api/passenger/{id}`
    async fn fetch_profile(&self, id: &str, role: Role) -> Result<Profile>;
}

/// reqwest-backed transport against the configured backend base URL.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base: String,
}

impl HttpTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json::<T>().await?)
    }
}

impl ChatTransport for HttpTransport {
    async fn fetch_sessions(&self, owner_id: &str, role: Role) -> Result<Vec<Session>> {
        self.get_json(&format!("/api/chat/sessions/{}/{owner_id}", role.as_str()))
            .await
    }

    async fn fetch_history(
        &self,
        driver_id: &str,
        passenger_id: &str,
    ) -> Result<Vec<ChatMessage>> {
        self.get_json(&format!("/api/chat/{driver_id}/{passenger_id}"))
            .await
    }

    async fn send_message(&self, outgoing: &OutgoingMessage) -> Result<()> {
        let response = self
            .http
            .post(self.url("/api/chat/send"))
            .json(outgoing)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(())
    }

    async fn fetch_profile(&self, id: &str, role: Role) -> Result<Profile> {
        self.get_json(&format!("/api/{}/{id}", role.as_str())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let transport = HttpTransport::new("http://localhost:5000/");
        assert_eq!(
            transport.url("/api/chat/send"),
            "http://localhost:5000/api/chat/send"
        );
    }
}
