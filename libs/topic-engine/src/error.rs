/// Errors returned by [`Broker::consume`](crate::Broker::consume) and
/// [`Topic::read_range`](crate::Topic::read_range).
///
/// All of them are caller-correctable: the request layer maps them to a
/// client error response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("the topic is not in broker: '{0}'")]
    UnknownTopic(String),

    #[error("start offset can't be larger than topic size (start {start}, size {len})")]
    StartBeyondEnd { start: u64, len: u64 },

    #[error("start offset should be less than end offset (start {start}, end {end})")]
    StartNotBeforeEnd { start: u64, end: u64 },

    #[error("end offset should be less than topic size (end {end}, size {len})")]
    EndBeyondLength { end: u64, len: u64 },
}

impl BrokerError {
    /// `true` for the three offset-range errors, `false` for `UnknownTopic`.
    pub fn is_range_error(&self) -> bool {
        !matches!(self, BrokerError::UnknownTopic(_))
    }
}
