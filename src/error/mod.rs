use crate::config::ConfigError;
use thiserror::Error;

pub type BubbleResult<T> = std::result::Result<T, BubbleError>;

#[derive(Debug, Error)]
pub enum BubbleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no expandable view is configured")]
    UnsupportedNavigation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_convert_transparently() {
        let err: BubbleError = ConfigError::MissingBubbleImage.into();
        assert!(matches!(err, BubbleError::Config(_)));
        assert_eq!(
            err.to_string(),
            "bubble image is required but was not configured"
        );
    }
}
