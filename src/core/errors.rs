/// All errors a key lookup can end in.
///
/// Every variant is terminal for the lookup that produced it. Nothing
/// is retried, and a failed lookup never hands back a partial key.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Key lookup request has failed: {reason}")]
    Transport { reason: String },

    #[error("Key lookup request has failed: keyserver returned status {status}")]
    HttpStatus { status: u16 },

    #[error("Key lookup was cancelled")]
    Cancelled,

    #[error("Key lookup deadline exceeded")]
    DeadlineExceeded,

    #[error("No key was found")]
    NotFound,

    #[error("Received bad key: {reason}")]
    BadKey { reason: String },

    #[error(
        "Received key had email mismatch\n\n  \
         None of the identities on the returned key use '{email}'.\n  \
         The keyserver may have answered with an unrelated key."
    )]
    EmailMismatch { email: String },

    #[error(
        "Invalid lookup configuration: {detail}\n\n  \
         Check keyserver_url and max_response_bytes."
    )]
    InvalidConfig { detail: String },
}

/// Coarse classification of a [`LookupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Cancellation,
    NotFound,
    MalformedKey,
    IdentityMismatch,
    Config,
}

impl LookupError {
    /// Which family of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::HttpStatus { .. } => ErrorKind::Transport,
            Self::Cancelled | Self::DeadlineExceeded => ErrorKind::Cancellation,
            Self::NotFound => ErrorKind::NotFound,
            Self::BadKey { .. } => ErrorKind::MalformedKey,
            Self::EmailMismatch { .. } => ErrorKind::IdentityMismatch,
            Self::InvalidConfig { .. } => ErrorKind::Config,
        }
    }

    /// True when the caller's context stopped the lookup.
    pub fn is_cancellation(&self) -> bool {
        self.kind() == ErrorKind::Cancellation
    }

    /// True when the keyserver had nothing usable for the email.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LookupError>;
