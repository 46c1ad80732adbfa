#[derive(Debug, thiserror::Error)]
pub enum BrokerServerError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("{0}")]
    Serve(#[from] topic_api_server::ServeError),

    #[error("signal: {0}")]
    Signal(#[from] std::io::Error),

    #[error("api task: {0}")]
    Join(#[from] tokio::task::JoinError),
}
