use http::{HeaderValue, Request, header};
use secrecy::{ExposeSecret, SecretString};

use super::RelayError;

/// Rebuild the request with the relay header overrides applied.
///
/// The original header set is preserved except that `authorization` carries
/// the bearer token and `content-type` is forced to JSON. Both are inserted
/// with overwrite semantics, applying the overrides twice yields the same
/// header set as applying them once. Method, URI and body are untouched.
pub(super) fn with_relay_headers<B>(request: Request<B>, token: &SecretString) -> Result<Request<B>, RelayError> {
    let (mut parts, body) = request.into_parts();

    let mut bearer = HeaderValue::try_from(format!("Bearer {}", token.expose_secret()))
        .map_err(|_| RelayError::MalformedCredential)?;
    bearer.set_sensitive(true);

    parts.headers.insert(header::AUTHORIZATION, bearer);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str) -> SecretString {
        SecretString::from(value.to_owned())
    }

    #[test]
    fn adds_authorization_and_content_type() {
        let request = Request::builder().uri("/invoices").body(()).unwrap();
        let request = with_relay_headers(request, &token("abc")).unwrap();

        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer abc");
        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn preserves_unrelated_headers() {
        let request = Request::builder()
            .uri("/invoices")
            .header("x-trace-id", "abc")
            .header(header::ACCEPT, "text/plain")
            .body(())
            .unwrap();

        let request = with_relay_headers(request, &token("abc")).unwrap();

        assert_eq!(request.headers()["x-trace-id"], "abc");
        assert_eq!(request.headers()[header::ACCEPT], "text/plain");
    }

    #[test]
    fn overwrites_instead_of_appending() {
        let request = Request::builder()
            .uri("/invoices")
            .header(header::AUTHORIZATION, "Bearer old")
            .header(header::CONTENT_TYPE, "text/xml")
            .body(())
            .unwrap();

        let request = with_relay_headers(request, &token("new")).unwrap();

        let authorization: Vec<_> = request.headers().get_all(header::AUTHORIZATION).iter().collect();
        assert_eq!(authorization, ["Bearer new"]);

        let content_type: Vec<_> = request.headers().get_all(header::CONTENT_TYPE).iter().collect();
        assert_eq!(content_type, ["application/json"]);
    }

    #[test]
    fn rejects_tokens_that_cannot_be_a_header_value() {
        let request = Request::builder().uri("/invoices").body(()).unwrap();
        let result = with_relay_headers(request, &token("line\nbreak"));

        assert!(matches!(result, Err(RelayError::MalformedCredential)));
    }

    #[test]
    fn authorization_is_marked_sensitive() {
        let request = Request::builder().uri("/invoices").body(()).unwrap();
        let request = with_relay_headers(request, &token("abc")).unwrap();

        assert!(request.headers()[header::AUTHORIZATION].is_sensitive());
    }
}
