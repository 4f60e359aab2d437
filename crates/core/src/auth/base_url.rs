//! Base URL resolution per authentication mode

use budgetlink_domain::{ClassifiedError, Credentials};
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static ORIGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://[^/]+)").expect("ORIGIN should compile - this is a bug"));

/// Work out where the API lives for the given credential bundle.
///
/// JWT bundles must carry a base URL. OAuth2 bundles fall back to the
/// scheme and host of `authUrl`, then `accessTokenUrl`.
///
/// # Errors
///
/// Configuration error when no usable base URL can be found.
pub fn resolve_base_url(credentials: &Credentials) -> Result<String, ClassifiedError> {
    let resolved = match credentials {
        Credentials::Jwt(jwt) => non_empty(Some(jwt.base_url.as_str())).ok_or_else(|| {
            ClassifiedError::configuration(
                "Base URL is not configured. Please check your credentials.",
            )
        })?,
        Credentials::OAuth2(oauth) => match non_empty(oauth.base_url.as_deref()) {
            Some(base_url) => base_url,
            None => {
                let candidate = non_empty(oauth.auth_url.as_deref())
                    .or_else(|| non_empty(oauth.access_token_url.as_deref()))
                    .ok_or_else(|| {
                        ClassifiedError::configuration(
                            "Base URL is required. Please set it in the OAuth2 credentials.",
                        )
                    })?;
                origin(candidate).ok_or_else(|| {
                    ClassifiedError::configuration(
                        "Base URL is required. Please set it in the OAuth2 credentials or \
                         ensure authUrl/accessTokenUrl are valid URLs.",
                    )
                })?
            }
        },
    };

    Ok(resolved.trim_end_matches('/').to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn origin(url: &str) -> Option<&str> {
    ORIGIN.captures(url).and_then(|captures| captures.get(1)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use budgetlink_domain::{ErrorKind, JwtCredentials, OAuth2Credentials};

    use super::*;

    fn oauth(base: Option<&str>, auth: Option<&str>, token: Option<&str>) -> Credentials {
        Credentials::OAuth2(OAuth2Credentials {
            base_url: base.map(str::to_string),
            auth_url: auth.map(str::to_string),
            access_token_url: token.map(str::to_string),
            scope: None,
        })
    }

    #[test]
    fn jwt_uses_base_url_without_trailing_slash() {
        let creds = Credentials::Jwt(JwtCredentials::new("https://budget.example.com/", "u", "p"));
        assert_eq!(resolve_base_url(&creds).unwrap(), "https://budget.example.com");
    }

    #[test]
    fn jwt_without_base_url_is_configuration_error() {
        let creds = Credentials::Jwt(JwtCredentials::new("  ", "u", "p"));
        assert_eq!(resolve_base_url(&creds).unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn oauth_prefers_explicit_base_url() {
        let creds = oauth(Some("https://api.example.com"), Some("https://auth.example.com/authorize"), None);
        assert_eq!(resolve_base_url(&creds).unwrap(), "https://api.example.com");
    }

    #[test]
    fn oauth_derives_origin_from_auth_then_token_url() {
        let creds = oauth(None, Some("https://auth.example.com:8443/oauth/authorize"), None);
        assert_eq!(resolve_base_url(&creds).unwrap(), "https://auth.example.com:8443");

        let creds = oauth(Some(""), None, Some("http://tokens.local/oauth/token"));
        assert_eq!(resolve_base_url(&creds).unwrap(), "http://tokens.local");
    }

    #[test]
    fn oauth_without_any_url_is_configuration_error() {
        let err = resolve_base_url(&oauth(None, None, None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.message(), "Base URL is required. Please set it in the OAuth2 credentials.");
    }

    #[test]
    fn oauth_with_unparseable_url_is_configuration_error() {
        let err = resolve_base_url(&oauth(None, Some("ftp://files.example.com"), None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.message().contains("valid URLs"));
    }
}
