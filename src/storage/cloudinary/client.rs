//! Cloudinary client
//! Account credentials and URL construction for API and delivery requests

use super::request::Response;
use super::signer::Signer;

/// Shared delivery hostname for all clouds
pub const DELIVERY_HOST: &str = "res.cloudinary.com";

/// Cloudinary client
#[derive(Debug, Clone)]
pub struct Client {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl Client {
    /// Create a new client
    ///
    /// # Arguments
    /// - cloud_name: account cloud name
    /// - api_key: account API key
    /// - api_secret: account API secret
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn signer(&self) -> Signer<'_> {
        Signer::new(&self.api_secret)
    }

    /// Build an API endpoint URL
    pub fn api_url(&self, resource_type: &str, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/{}/{}",
            self.cloud_name, resource_type, action
        )
    }

    /// Build a signed delivery URL for an asset
    ///
    /// The signature token covers the version segment (when known) and the
    /// public id, and sits between the delivery type and the version.
    pub fn signed_delivery_url(
        &self,
        resource_type: &str,
        delivery_type: &str,
        version: Option<u64>,
        public_id: &str,
    ) -> String {
        let signed_part = match version {
            Some(v) => format!("v{}/{}", v, public_id),
            None => public_id.to_string(),
        };
        let token = self.signer().url_token(&signed_part);

        format!(
            "https://{}/{}/{}/{}/{}/{}",
            DELIVERY_HOST, self.cloud_name, resource_type, delivery_type, token, signed_part
        )
    }

    /// Collapse a request outcome into a single Response
    pub fn make_response(&self, resp: Result<Response, Response>) -> Response {
        resp.unwrap_or_else(|x| x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let client = Client::new("demo", "key", "secret");
        assert_eq!(
            client.api_url("raw", "upload"),
            "https://api.cloudinary.com/v1_1/demo/raw/upload"
        );
        assert_eq!(
            client.api_url("image", "explicit"),
            "https://api.cloudinary.com/v1_1/demo/image/explicit"
        );
    }

    #[test]
    fn test_signed_delivery_url_layout() {
        let client = Client::new("demo", "key", "secret");
        let url =
            client.signed_delivery_url("raw", "upload", Some(1234), "course-documents/workbook.pdf");

        let prefix = "https://res.cloudinary.com/demo/raw/upload/s--";
        assert!(url.starts_with(prefix), "unexpected url: {}", url);
        assert!(url.ends_with("/v1234/course-documents/workbook.pdf"));

        // Signature token precedes the version segment
        let token_at = url.find("/s--").unwrap();
        let version_at = url.find("/v1234/").unwrap();
        assert!(token_at < version_at);
    }

    #[test]
    fn test_signed_delivery_url_without_version() {
        let client = Client::new("demo", "key", "secret");
        let url = client.signed_delivery_url("image", "upload", None, "course-images/cover");
        assert!(url.contains("/image/upload/s--"));
        assert!(url.ends_with("/course-images/cover"));
    }
}
