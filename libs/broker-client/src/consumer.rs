use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use topic_engine::RangeEnd;

use crate::{ClientError, broker_url, read_body};

#[derive(Deserialize)]
struct ConsumeResponse {
    data: Vec<Value>,
    offset: u64,
}

/// Reads topic ranges over `GET /consumer`.
///
/// The broker keeps no cursors; this consumer remembers the `offset` of the
/// last successful read per topic and starts from it when no explicit start
/// is given.
#[derive(Debug, Clone)]
pub struct Consumer {
    http: reqwest::Client,
    url: String,
    last_offsets: HashMap<String, u64>,
}

impl Consumer {
    pub fn new(addr: &str) -> Self {
        Self::with_client(reqwest::Client::new(), addr)
    }

    pub fn with_client(http: reqwest::Client, addr: &str) -> Self {
        Self {
            http,
            url: format!("{}/consumer", broker_url(addr)),
            last_offsets: HashMap::new(),
        }
    }

    /// Read `topic` from `start` (or the remembered offset, or 0) up to `end`.
    ///
    /// On success the returned range end becomes the topic's cursor. Errors
    /// leave the cursor untouched.
    pub async fn consume(
        &mut self,
        topic: &str,
        start: Option<u64>,
        end: RangeEnd,
    ) -> Result<Vec<Value>, ClientError> {
        let start = start.unwrap_or_else(|| self.offset(topic));

        let resp = self
            .http
            .get(&self.url)
            .query(&[
                ("topic", topic.to_string()),
                ("s_offset", start.to_string()),
                ("e_offset", end.to_wire().to_string()),
            ])
            .send()
            .await?;

        let body = read_body(resp).await?;
        let parsed: ConsumeResponse = serde_json::from_str(&body)?;

        tracing::debug!(topic, start, offset = parsed.offset, count = parsed.data.len(), "consumed");
        self.last_offsets.insert(topic.to_string(), parsed.offset);
        Ok(parsed.data)
    }

    /// Next start offset for `topic`; 0 if never consumed.
    pub fn offset(&self, topic: &str) -> u64 {
        self.last_offsets.get(topic).copied().unwrap_or(0)
    }

    /// Move the cursor for `topic`.
    pub fn seek(&mut self, topic: &str, offset: u64) {
        self.last_offsets.insert(topic.to_string(), offset);
    }
}
