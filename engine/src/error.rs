use strum::Display;
use thiserror::Error;

use crate::{input_image::ImageError, llm::ServiceError};

/// The single terminal failure of a pipeline run.
#[derive(Debug, Error)]
pub enum ClassifiedError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("The generation service returned an empty response{}", reason_suffix(.finish_reason))]
    EmptyResponse { finish_reason: Option<String> },

    #[error("The generation service failed: {0}")]
    Service(#[from] ServiceError),

    #[error("An unexpected error occurred: {message}")]
    Unexpected { message: String },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" (finish reason: {r})"))
        .unwrap_or_default()
}

impl From<color_eyre::Report> for ClassifiedError {
    fn from(report: color_eyre::Report) -> Self {
        Self::Unexpected {
            message: format!("{report:#}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotFound,
    UnsupportedFormat,
    UnreadableFile,
    EmptyResponse,
    ServiceError,
    Unexpected,
}

impl ErrorKind {
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Unexpected => 1,
            ErrorKind::FileNotFound => 2,
            ErrorKind::UnsupportedFormat => 3,
            ErrorKind::UnreadableFile => 4,
            ErrorKind::EmptyResponse => 5,
            ErrorKind::ServiceError => 6,
        }
    }
}

impl ClassifiedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifiedError::Image(ImageError::NotFound { .. }) => ErrorKind::FileNotFound,
            ClassifiedError::Image(ImageError::Unsupported { .. }) => ErrorKind::UnsupportedFormat,
            ClassifiedError::Image(ImageError::Unreadable { .. }) => ErrorKind::UnreadableFile,
            ClassifiedError::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            ClassifiedError::Service(_) => ErrorKind::ServiceError,
            ClassifiedError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use color_eyre::eyre::eyre;

    use crate::llm::ServiceErrorKind;

    use super::*;

    #[test]
    fn kinds_and_exit_codes() {
        let cases = [
            (
                ClassifiedError::from(ImageError::NotFound {
                    path: PathBuf::from("missing.jpg"),
                }),
                ErrorKind::FileNotFound,
            ),
            (
                ClassifiedError::from(ImageError::Unsupported {
                    path: PathBuf::from("anim.gif"),
                    format: "GIF".into(),
                }),
                ErrorKind::UnsupportedFormat,
            ),
            (
                ClassifiedError::from(ImageError::Unreadable {
                    path: PathBuf::from("doc.pdf"),
                    reason: "not an image".into(),
                }),
                ErrorKind::UnreadableFile,
            ),
            (
                ClassifiedError::EmptyResponse {
                    finish_reason: None,
                },
                ErrorKind::EmptyResponse,
            ),
            (
                ClassifiedError::from(ServiceError::new(ServiceErrorKind::Quota, "slow down")),
                ErrorKind::ServiceError,
            ),
            (
                ClassifiedError::from(eyre!("boom")),
                ErrorKind::Unexpected,
            ),
        ];

        let mut codes = vec![];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
            assert_ne!(err.kind().exit_code(), 0);
            codes.push(err.kind().exit_code());
        }
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 6);
    }

    #[test]
    fn unexpected_keeps_the_whole_chain() {
        let err = ClassifiedError::from(eyre!("stdin closed").wrap_err("reading genre"));
        assert_eq!(
            err.to_string(),
            "An unexpected error occurred: reading genre: stdin closed"
        );
    }

    #[test]
    fn empty_response_mentions_reason() {
        let err = ClassifiedError::EmptyResponse {
            finish_reason: Some("SAFETY".into()),
        };
        assert_eq!(
            err.to_string(),
            "The generation service returned an empty response (finish reason: SAFETY)"
        );
    }
}
