use devbills_core::PeriodError;

/// Failure of a Remote Data Gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No session token is available; the user must sign in first.
    #[error("not signed in; run: devbills auth login")]
    NotSignedIn,

    /// The API answered 401. The session has already been cleared.
    #[error("session expired; sign in again")]
    Unauthorized,

    #[error("{method} {path} failed: {status} {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid api url: {0}")]
    InvalidUrl(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Period(#[from] PeriodError),
}

/// Route-guard failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("not signed in; run: devbills auth login")]
    NotAuthenticated,
}
