//! HTTP client for the procon broker: a [`Producer`] and a [`Consumer`] that
//! remembers, per topic, where it stopped reading.

pub mod consumer;
pub mod error;
pub mod producer;

pub use consumer::Consumer;
pub use error::ClientError;
pub use producer::Producer;
pub use topic_engine::RangeEnd;

/// Turn a broker address into a base URL.
///
/// Accepts a full `http(s)://` URL, `host:port`, `:port` or a bare port; the
/// last two point at `127.0.0.1`.
pub fn broker_url(addr: &str) -> String {
    let addr = addr.trim().trim_end_matches('/');
    if addr.starts_with("http://") || addr.starts_with("https://") {
        return addr.to_string();
    }
    if let Some(port) = addr.strip_prefix(':') {
        return format!("http://127.0.0.1:{port}");
    }
    if !addr.is_empty() && addr.bytes().all(|b| b.is_ascii_digit()) {
        return format!("http://127.0.0.1:{addr}");
    }
    format!("http://{addr}")
}

/// Read the body, turning non-2xx responses into [`ClientError::Status`].
pub(crate) async fn read_body(resp: reqwest::Response) -> Result<String, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status { status, body });
    }
    Ok(body)
}
