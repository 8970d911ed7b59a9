use reqwest::header::{HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

use crate::infrastructure::http::authorization::Bearer;

/// Puts the bearer credential on every outgoing request.
pub struct AuthMiddleware {
    credential: HeaderValue,
}

#[async_trait::async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        req.headers_mut().insert(AUTHORIZATION, self.credential.clone());
        next.run(req, extensions).await
    }
}

impl AuthMiddleware {
    /// Fails when the token holds characters a header value cannot carry.
    pub fn new(bearer: &Bearer) -> Result<Self, InvalidHeaderValue> {
        let mut credential = HeaderValue::from_str(bearer.as_str())?;
        credential.set_sensitive(true);
        Ok(Self { credential })
    }
}

#[cfg(test)]
mod tests {
    use super::AuthMiddleware;
    use crate::infrastructure::http::authorization::Bearer;

    #[test]
    fn test_rejects_control_characters() {
        assert!(AuthMiddleware::new(&Bearer::new("test-api-token")).is_ok());
        assert!(AuthMiddleware::new(&Bearer::new("line\nbreak")).is_err());
    }
}
