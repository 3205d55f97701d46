use std::fmt;

/// Which stage of a request produced a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request could not be built (bad endpoint, unserializable body)
    InvalidRequest,
    /// No response was received
    Transport,
    /// A response arrived with a non-2xx status
    Status,
    /// A 2xx response whose body was not the expected JSON shape
    Decode,
}

/// Error half of a [`FetchResult`]
///
/// `status` is only populated for [`FetchErrorKind::Status`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

impl FetchError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::InvalidRequest,
            message: message.into(),
            status: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            message: message.into(),
            status: None,
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Status,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            message: message.into(),
            status: None,
        }
    }

    /// Returns true for 401 responses
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Returns true for 404 responses
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Outcome of one API call: either the decoded body or a [`FetchError`]
///
/// The client never panics or bubbles transport errors any other way; callers
/// branch on this value.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_when_present() {
        let err = FetchError::status(404, "Not found");
        assert_eq!(err.to_string(), "Not found (status 404)");
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn transport_errors_have_no_status() {
        let err = FetchError::transport("connection refused");
        assert_eq!(err.status, None);
        assert_eq!(err.kind, FetchErrorKind::Transport);
        assert_eq!(err.to_string(), "connection refused");
    }
}
