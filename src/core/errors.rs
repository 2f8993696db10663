use std::path::PathBuf;
use thiserror::Error;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Errors that can occur while locating, loading, and matching the Azure Service Tags.
#[derive(Debug, Error)]
pub enum Error {
    /// The download landing page did not contain a link to the Service Tags JSON file.
    #[error("Can't find service tag file to download")]
    LocatorNotFound,

    /// An HTTP request failed (connection, timeout, or non-success status).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A local Service Tags file could not be read.
    #[error("Unable to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Service Tags document does not have the expected shape.
    #[error("Malformed service tags: {0}")]
    MalformedInput(String),
}

impl Error {
    /// Process exit code for the error; locator failures are reported distinctly from all other
    /// failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::LocatorNotFound => 2,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::MalformedInput(error.to_string())
    }
}

impl From<ipnetwork::IpNetworkError> for Error {
    fn from(error: ipnetwork::IpNetworkError) -> Self {
        Error::MalformedInput(error.to_string())
    }
}

// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) fn log_error(error: &Error) {
    log::error!("{}", error);
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
