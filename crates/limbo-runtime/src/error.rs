#![forbid(unsafe_code)]

//! Runtime error model.
//!
//! Every variant is fatal: the game is a short linear session, so any host
//! failure ends the process instead of degrading. A wrong click is not an
//! error; it is [`crate::Outcome::Lose`].

use std::fmt::Display;

/// Fatal runtime failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Screen size query or surface creation failed.
    #[error("initialization failed: {0}")]
    Init(String),
    /// Painting, moving, destroying, or polling a surface failed.
    #[error("surface host failed: {0}")]
    Host(String),
    /// The win dialog could not be shown.
    #[error("win notification failed: {0}")]
    Notify(String),
    /// The punitive action could not be carried out.
    #[error("punitive action failed: {0}")]
    Punish(String),
}

impl Error {
    pub(crate) fn init(err: impl Display) -> Self {
        Self::Init(err.to_string())
    }

    pub(crate) fn host(err: impl Display) -> Self {
        Self::Host(err.to_string())
    }

    pub(crate) fn notify(err: impl Display) -> Self {
        Self::Notify(err.to_string())
    }

    pub(crate) fn punish(err: impl Display) -> Self {
        Self::Punish(err.to_string())
    }
}

/// Standard result type for runtime APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_stage() {
        assert_eq!(
            Error::init("no display").to_string(),
            "initialization failed: no display"
        );
        assert_eq!(
            Error::punish("permission denied").to_string(),
            "punitive action failed: permission denied"
        );
    }
}
