use std::fmt;

/// `Bearer <token>` credential of the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Bearer(String);

impl Bearer {
    pub fn new(token: &str) -> Self {
        Self(format!("Bearer {token}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Bearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Bearer(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::Bearer;

    #[test]
    fn test_bearer() {
        let bearer = Bearer::new("test-api-token");
        assert_eq!(bearer.as_str(), "Bearer test-api-token");
        assert_eq!(format!("{bearer:?}"), "Bearer(***)");
    }
}
