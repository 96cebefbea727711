//! Practicum homework-status client.
//!
//! A single `GET <endpoint>?from_date=<cursor>` authorized with the user's
//! static OAuth token. Anything but HTTP 200 is an error; retrying is left to
//! the poll loop.

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::time::Duration;

use super::HomeworkSource;
use crate::error::FetchError;

/// Client for the homework status endpoint.
pub struct PracticumClient {
    endpoint: String,
    token: String,
    /// Reused across polls for connection pooling.
    client: reqwest::Client,
}

impl PracticumClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client,
        })
    }

    /// Build the poll request for `from_date` without sending it.
    pub fn build_request(&self, from_date: i64) -> reqwest::Result<reqwest::Request> {
        self.client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
    }
}

fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(FetchError::Status {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        let request = self.build_request(from_date).map_err(FetchError::Transport)?;
        debug!("requesting homework statuses since {from_date}");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if let Err(e) = check_status(status) {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable>".to_string());
            debug!("homework API answered {status}: {body}");
            return Err(e);
        }

        response.json().await.map_err(FetchError::Decode)
    }
}
