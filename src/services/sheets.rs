use crate::config::SheetsConfig;
use crate::db::models::report_models::SystemType;
use crate::error::Error;
use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use std::time::Duration;

/// Best-effort forwarding of a submitted checklist to an external
/// collaborator. Failures are the caller's to log and swallow; they
/// must never roll back or delay the report write.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn forward(&self, system_type: SystemType, data: serde_json::Value) -> Result<()>;
}

/// Forwards checklists to a Google Apps Script spreadsheet endpoint
pub struct SheetsForwarder {
    client: reqwest::Client,
    script_url: Option<String>,
}

impl SheetsForwarder {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        if config.script_url.is_none() {
            warn!("Google Apps Script URL not configured, checklist forwarding disabled");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            script_url: config.script_url.clone(),
        })
    }
}

#[async_trait]
impl NotificationSink for SheetsForwarder {
    async fn forward(&self, system_type: SystemType, data: serde_json::Value) -> Result<()> {
        let url = match &self.script_url {
            Some(url) => url,
            None => return Ok(()),
        };

        let payload = serde_json::json!({
            "systemType": system_type,
            "data": data,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Google Sheets request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Google Sheets API error: {}",
                response.status()
            ))
            .into());
        }

        Ok(())
    }
}
