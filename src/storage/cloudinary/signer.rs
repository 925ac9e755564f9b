//! Cloudinary signature module
//! Reference: https://cloudinary.com/documentation/signatures

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

/// Fields never included in an API signature
const UNSIGNED_FIELDS: [&str; 4] = ["file", "api_key", "resource_type", "signature"];

/// Cloudinary signer
pub struct Signer<'a> {
    api_secret: &'a str,
}

impl<'a> Signer<'a> {
    pub fn new(api_secret: &'a str) -> Self {
        Self { api_secret }
    }

    /// Canonical string to sign for API requests: parameters sorted by
    /// key and joined as `k=v&...`, excluding unsigned and empty fields
    fn string_to_sign(params: &BTreeMap<String, String>) -> String {
        params
            .iter()
            .filter(|(k, v)| !v.is_empty() && !UNSIGNED_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<String>>()
            .join("&")
    }

    /// Generate an API request signature
    ///
    /// Lowercase hex SHA-1 over the canonical parameter string with the
    /// API secret appended.
    pub fn api_signature(&self, params: &BTreeMap<String, String>) -> String {
        let mut hasher = Sha1::new();
        hasher.update(Self::string_to_sign(params));
        hasher.update(self.api_secret);
        let digest = hasher.finalize();

        digest
            .iter()
            .map(|x| format!("{:02x}", x))
            .collect::<Vec<String>>()
            .join("")
    }

    /// Generate a delivery URL signature token
    ///
    /// URL-safe base64 of the SHA-1 over the signed path with the API
    /// secret appended, truncated to 8 characters and wrapped as
    /// `s--XXXXXXXX--`.
    pub fn url_token(&self, path: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(path);
        hasher.update(self.api_secret);
        let digest = hasher.finalize();

        let encoded = URL_SAFE_NO_PAD.encode(digest);
        format!("s--{}--", &encoded[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_string_to_sign_sorts_and_joins() {
        let p = params(&[
            ("timestamp", "1315060510"),
            ("folder", "course-documents"),
            ("use_filename", "true"),
        ]);
        assert_eq!(
            Signer::string_to_sign(&p),
            "folder=course-documents&timestamp=1315060510&use_filename=true"
        );
    }

    #[test]
    fn test_string_to_sign_excludes_unsigned_fields() {
        let p = params(&[
            ("api_key", "123456"),
            ("file", "ignored"),
            ("resource_type", "raw"),
            ("signature", "deadbeef"),
            ("timestamp", "1"),
            ("empty", ""),
        ]);
        assert_eq!(Signer::string_to_sign(&p), "timestamp=1");
    }

    #[test]
    fn test_url_token_shape() {
        let signer = Signer::new("secret");
        let token = signer.url_token("v1234/course-documents/workbook.pdf");
        assert!(token.starts_with("s--"));
        assert!(token.ends_with("--"));
        assert_eq!(token.len(), 13);
    }

    #[test]
    fn test_url_token_depends_on_path() {
        let signer = Signer::new("secret");
        assert_ne!(signer.url_token("v1/a.pdf"), signer.url_token("v1/b.pdf"));
        assert_eq!(signer.url_token("v1/a.pdf"), signer.url_token("v1/a.pdf"));
    }
}
