#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    EnvVar(#[from] EnvVarError),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] JsonError),
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({var})")]
pub struct EnvVarError {
    var: String,
    #[source]
    source: std::env::VarError,
}

impl EnvVarError {
    pub fn new(var: &str, source: std::env::VarError) -> Self {
        Self {
            var: var.into(),
            source,
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{source} ({url})")]
pub struct JsonError {
    url: String,
    #[source]
    source: serde_json::Error,
}

impl JsonError {
    pub fn new(url: &str, source: serde_json::Error) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }
}

impl Error {
    /// True when the failure was a body that did not parse as the expected
    /// JSON shape, as opposed to the request itself failing.
    #[cfg(test)]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Json(_))
    }
}
