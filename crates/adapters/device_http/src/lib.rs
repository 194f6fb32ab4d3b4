//! # irispanel-adapter-device-http
//!
//! [`DeviceApi`] implementation that talks to the gate controller over its
//! plain HTTP GET API.
//!
//! Every request carries a 2-second client-side deadline. A request that
//! exceeds it settles with [`DeviceError::Timeout`]; nothing dangles. Command
//! endpoints treat any 2xx as success and ignore the body.
//!
//! ## Dependency rule
//!
//! Depends on `irispanel-app` (port traits) and `irispanel-domain` only.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use irispanel_app::ports::DeviceApi;
use irispanel_domain::error::DeviceError;
use irispanel_domain::gate::GateId;
use irispanel_domain::snapshot::InfoSnapshot;
use irispanel_domain::time::EpochSeconds;

/// Client-side deadline for every device request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP client for the gate controller device.
#[derive(Debug, Clone)]
pub struct HttpDeviceApi {
    client: Client,
    base_url: String,
}

impl HttpDeviceApi {
    /// Build a client for the device at `base_url` (e.g.
    /// `http://192.168.1.123`), with the default request deadline.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Network`] when the underlying client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DeviceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| DeviceError::Network(err.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Build from an existing client (the deadline is whatever the client
    /// was configured with).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn command(&self, path: &str, query: &[(&str, String)]) -> Result<(), DeviceError> {
        tracing::debug!(path, "device request");
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(map_transport)?;
        check_status(response.status())
    }
}

impl DeviceApi for HttpDeviceApi {
    async fn fetch_info(&self) -> Result<InfoSnapshot, DeviceError> {
        tracing::debug!("device request: /api/info");
        let response = self
            .client
            .get(format!("{}/api/info", self.base_url))
            .send()
            .await
            .map_err(map_transport)?;
        check_status(response.status())?;
        response
            .json::<InfoSnapshot>()
            .await
            .map_err(|err| DeviceError::Body(err.to_string()))
    }

    async fn open_gate(&self, gate: GateId) -> Result<(), DeviceError> {
        self.command("/api/open", &[("g", gate.to_string())]).await
    }

    async fn close_gate(&self, gate: GateId) -> Result<(), DeviceError> {
        self.command("/api/close", &[("g", gate.to_string())]).await
    }

    async fn set_schedule(&self, gate: GateId, at: EpochSeconds) -> Result<(), DeviceError> {
        self.command(
            "/api/setdate",
            &[("g", gate.to_string()), ("t", at.to_string())],
        )
        .await
    }

    async fn clear_schedule(&self, gate: GateId) -> Result<(), DeviceError> {
        self.command("/api/cleardate", &[("g", gate.to_string())])
            .await
    }
}

fn map_transport(err: reqwest::Error) -> DeviceError {
    if err.is_timeout() {
        DeviceError::Timeout
    } else {
        DeviceError::Network(err.to_string())
    }
}

fn check_status(status: StatusCode) -> Result<(), DeviceError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(DeviceError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}
