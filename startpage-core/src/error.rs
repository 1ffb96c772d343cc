use std::fmt;

#[derive(Debug)]
pub enum StartPageError {
    Network(reqwest::Error),
    Json(serde_json::Error),
    /// Non-success response from the backend, with its `detail` message.
    Api { status: u16, detail: String },
    Url(url::ParseError),
    Io(std::io::Error),
    Config(String),
    Validation(String),
}

impl fmt::Display for StartPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartPageError::Network(e) => write!(f, "Network error: {}", e),
            StartPageError::Json(e) => write!(f, "JSON parsing error: {}", e),
            StartPageError::Api { status, detail } => {
                write!(f, "API error (HTTP {}): {}", status, detail)
            }
            StartPageError::Url(e) => write!(f, "Invalid URL: {}", e),
            StartPageError::Io(e) => write!(f, "IO error: {}", e),
            StartPageError::Config(e) => write!(f, "Configuration error: {}", e),
            StartPageError::Validation(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for StartPageError {}

impl From<reqwest::Error> for StartPageError {
    fn from(err: reqwest::Error) -> Self {
        StartPageError::Network(err)
    }
}

impl From<serde_json::Error> for StartPageError {
    fn from(err: serde_json::Error) -> Self {
        StartPageError::Json(err)
    }
}

impl From<url::ParseError> for StartPageError {
    fn from(err: url::ParseError) -> Self {
        StartPageError::Url(err)
    }
}

impl From<std::io::Error> for StartPageError {
    fn from(err: std::io::Error) -> Self {
        StartPageError::Io(err)
    }
}
