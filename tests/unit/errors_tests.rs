/*!
 * Tests for error types and categorization
 */

use cve_translator::errors::{AppError, DocumentError, ErrorCategory, ProviderError, TranslationError};

#[test]
fn test_providerError_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "internal".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 500 - internal");
}

#[test]
fn test_providerError_category_shouldCoverEveryVariant() {
    let cases = [
        (ProviderError::RequestFailed("x".into()), ErrorCategory::Service),
        (ProviderError::ParseError("x".into()), ErrorCategory::Service),
        (ProviderError::ConnectionError("x".into()), ErrorCategory::Service),
        (ProviderError::EmbeddingFailed("x".into()), ErrorCategory::Service),
        (ProviderError::RateLimitExceeded("x".into()), ErrorCategory::RateLimit),
        (ProviderError::AuthenticationError("x".into()), ErrorCategory::Authentication),
    ];
    for (error, expected) in cases {
        assert_eq!(error.category(), expected, "{error}");
    }
}

#[test]
fn test_errorCategory_serialize_shouldUseSnakeCase() {
    assert_eq!(serde_json::to_string(&ErrorCategory::RateLimit).unwrap(), "\"rate_limit\"");
    assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
}

#[test]
fn test_appError_fromConversions_shouldWrapSources() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(AppError::from(io), AppError::File(_)));

    let translation = TranslationError::from(DocumentError::Extraction("bad bytes".into()));
    assert!(matches!(AppError::from(translation), AppError::Translation(_)));

    let provider = AppError::from(ProviderError::RateLimitExceeded("wait".into()));
    assert!(provider.to_string().contains("Rate limit exceeded"));
}

#[test]
fn test_fromStatus_shouldMapHttpCodes() {
    assert!(matches!(ProviderError::from_status(401, "no"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "no"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));

    let server = ProviderError::from_status(503, "unavailable");
    assert!(matches!(server, ProviderError::ApiError { status_code: 503, .. }));
    assert_eq!(server.category(), ErrorCategory::Service);
}
