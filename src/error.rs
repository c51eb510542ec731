use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure taxonomy for the client core.
///
/// Chat reads are expected to degrade (empty or stale data plus a log line)
/// rather than bubble these up to the screen; only the routing flow and the
/// send precondition surface errors to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("realtime channel error: {0}")]
    Websocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("backend returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Send attempted before both party ids were known. Rejected before any
    /// network call.
    #[error("both driver and passenger ids must be known before sending")]
    MissingIdentity,

    /// The routing service answered but had no candidate route.
    #[error("no route found between the selected points")]
    NoRoute,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_convert_via_from() {
        let err: ClientError = serde_json::from_str::<i64>("not json").unwrap_err().into();
        assert!(matches!(err, ClientError::Malformed(_)));

        let err: ClientError = std::io::Error::other("boom").into();
        assert!(matches!(err, ClientError::Io(_)));
    }

    #[test]
    fn user_facing_messages_name_the_condition() {
        assert_eq!(
            ClientError::NoRoute.to_string(),
            "no route found between the selected points"
        );
        assert!(ClientError::MissingIdentity.to_string().contains("driver"));
    }
}
