use std::collections::BTreeSet;

use serde::Serialize;

use crate::{ClientError, broker_url, read_body};

#[derive(Serialize)]
struct ProduceBody<'a, T: Serialize + ?Sized> {
    topic: &'a str,
    data: &'a T,
}

/// Appends messages to broker topics over `POST /producer`.
#[derive(Debug, Clone)]
pub struct Producer {
    http: reqwest::Client,
    url: String,
    topics: BTreeSet<String>,
}

impl Producer {
    pub fn new(addr: &str) -> Self {
        Self::with_client(reqwest::Client::new(), addr)
    }

    pub fn with_client(http: reqwest::Client, addr: &str) -> Self {
        Self {
            http,
            url: format!("{}/producer", broker_url(addr)),
            topics: BTreeSet::new(),
        }
    }

    /// Send one message. Returns the topic length after the append.
    pub async fn produce<T: Serialize + ?Sized>(
        &mut self,
        topic: &str,
        data: &T,
    ) -> Result<u64, ClientError> {
        let payload = serde_json::to_vec(&ProduceBody { topic, data })?;
        let resp = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let body = read_body(resp).await?;
        let offset: u64 = serde_json::from_str(body.trim())?;

        self.topics.insert(topic.to_string());
        tracing::debug!(topic, offset, "produced");
        Ok(offset)
    }

    /// Topics this producer has successfully written to.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }
}
