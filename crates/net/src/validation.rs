//! URL and HTTP response validation for downloads

use keg_errors::{Error, NetworkError};
use url::Url;

/// Validate a source archive URL and check for supported protocols
///
/// # Errors
///
/// Returns an error if the URL is malformed or uses a scheme other than
/// http or https.
pub fn validate_url(url: &str) -> Result<String, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(NetworkError::UnsupportedProtocol {
            protocol: scheme.to_string(),
        }
        .into()),
    }
}

/// Validate an HTTP response for download
pub(crate) fn validate_response(response: &reqwest::Response) -> Result<(), Error> {
    let status = response.status();

    if !status.is_success() {
        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message: status.to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("https://example.com/a.tar.gz").is_ok());
        assert!(validate_url("http://example.com/a.tar.gz").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(validate_url("ftp://example.com/a.tar.gz").is_err());
        assert!(validate_url("file:///tmp/a.tar.gz").is_err());
        assert!(validate_url("not a url").is_err());
    }
}
