use hyper::StatusCode;
use thiserror::Error;

/// Failure reported by the external analysis capability.
///
/// Only the message survives: the handler forwards it verbatim and does not
/// distinguish causes.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AnalysisError {
    message: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        AnalysisError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::new(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::new(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed client input
    Validation,
    /// The analyzer itself failed
    Analysis,
    /// The analyzer's output broke the result contract
    Server,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServeError {
    #[error("No image uploaded")]
    NoImage,
    #[error("Uploaded file is not an image")]
    NotAnImage,
    #[error("Malformed multipart body: {0}")]
    MalformedUpload(String),
    #[error("{0}")]
    Analysis(#[from] AnalysisError),
    #[error("Skin metrics missing in analysis result")]
    MetricsMissing,
    #[error("Missing key in skin metrics: {0}")]
    MissingKey(&'static str),
    #[error("Malformed skin metrics: {0}")]
    MalformedMetrics(String),
}

impl ServeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServeError::NoImage | ServeError::NotAnImage | ServeError::MalformedUpload(_) => {
                ErrorKind::Validation
            }
            ServeError::Analysis(_) => ErrorKind::Analysis,
            ServeError::MetricsMissing
            | ServeError::MissingKey(_)
            | ServeError::MalformedMetrics(_) => ErrorKind::Server,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Analysis | ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        for err in [
            ServeError::NoImage,
            ServeError::NotAnImage,
            ServeError::MalformedUpload("incomplete stream".into()),
        ]
        .iter()
        {
            assert_eq!(err.kind(), ErrorKind::Validation);
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn analysis_message_is_forwarded_verbatim() {
        let err = ServeError::from(AnalysisError::new("model unavailable"));
        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(err.kind(), ErrorKind::Analysis);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn contract_errors_name_the_missing_piece() {
        assert_eq!(
            ServeError::MetricsMissing.to_string(),
            "Skin metrics missing in analysis result"
        );
        let err = ServeError::MissingKey("hydration_level");
        assert_eq!(err.to_string(), "Missing key in skin metrics: hydration_level");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ServeError::MalformedMetrics("tone: invalid type".into());
        assert_eq!(err.to_string(), "Malformed skin metrics: tone: invalid type");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
