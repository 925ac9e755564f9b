use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::storage::{classify, AssetClass, Client, DeliveryUrl, ErrNo};

/// Retrieval strategy for a stored asset URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Unsigned fetch of the stored URL
    Direct,
    /// Signed delivery URL with resource type raw
    SignedRaw,
    /// Signed delivery URL with resource type image
    SignedImage,
    /// Hand the signed URL to the browser instead of proxying bytes
    DirectUrl,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::SignedRaw => "signed-raw",
            Strategy::SignedImage => "signed-image",
            Strategy::DirectUrl => "direct-url",
        }
    }
}

/// Resolved download
#[derive(Debug)]
pub enum Delivery {
    /// Proxy the bytes to the browser
    Stream { data: Bytes, content_type: String },
    /// Instruct the browser to fetch the signed URL itself
    Redirect { direct_url: String },
}

/// Asset delivery service
///
/// Resolves a stored asset URL to file bytes through an ordered,
/// short-circuiting chain of retrieval strategies. Strategies run
/// sequentially and each is attempted at most once.
pub struct DeliveryService;

impl DeliveryService {
    /// Ordered strategies for an asset class
    pub fn plan(class: &AssetClass) -> Vec<Strategy> {
        match class {
            // One fetch, no provider fallback
            AssetClass::Foreign | AssetClass::Media(_) => vec![Strategy::Direct],
            AssetClass::Raw(_) => vec![
                Strategy::Direct,
                Strategy::SignedRaw,
                Strategy::DirectUrl,
            ],
            AssetClass::AmbiguousImage(_) => vec![
                Strategy::SignedRaw,
                Strategy::SignedImage,
                Strategy::DirectUrl,
            ],
        }
    }

    /// Resolve an asset URL to a download
    pub async fn fetch_asset(media: &Client, url: &str, filename: &str) -> Result<Delivery> {
        let class = classify(url, media.cloud_name());
        let content_type = content_type_for(filename);
        let strategies = Self::plan(&class);

        tracing::info!(
            "Resolving download for {} (class: {}, {} strategies)",
            url,
            class.label(),
            strategies.len()
        );

        for strategy in strategies {
            tracing::debug!("Trying strategy {} for {}", strategy.label(), url);
            if let Some(delivery) = Self::attempt(media, &class, url, strategy, &content_type).await
            {
                tracing::info!("Strategy {} succeeded for {}", strategy.label(), url);
                return Ok(delivery);
            }
        }

        Err(AppError::Storage(
            "All download strategies failed".to_string(),
        ))
    }

    /// Run a single strategy, None means fall through to the next one
    async fn attempt(
        media: &Client,
        class: &AssetClass,
        url: &str,
        strategy: Strategy,
        content_type: &str,
    ) -> Option<Delivery> {
        match strategy {
            Strategy::Direct => Self::fetch_bytes(media, url, strategy, content_type).await,
            Strategy::SignedRaw | Strategy::SignedImage => {
                let delivery_url = class.delivery_url()?;
                let resource_type = if strategy == Strategy::SignedRaw {
                    "raw"
                } else {
                    "image"
                };
                let signed = Self::sign(media, delivery_url, resource_type);
                Self::fetch_bytes(media, &signed, strategy, content_type).await
            }
            Strategy::DirectUrl => {
                let delivery_url = class.delivery_url()?;
                let signed = Self::sign(media, delivery_url, &delivery_url.resource_type);
                Some(Delivery::Redirect { direct_url: signed })
            }
        }
    }

    fn sign(media: &Client, delivery_url: &DeliveryUrl, resource_type: &str) -> String {
        media.signed_delivery_url(
            resource_type,
            &delivery_url.delivery_type,
            delivery_url.version,
            &delivery_url.public_id,
        )
    }

    async fn fetch_bytes(
        media: &Client,
        url: &str,
        strategy: Strategy,
        content_type: &str,
    ) -> Option<Delivery> {
        let res = media.fetch(url).await;
        if res.error_no != ErrNo::SUCCESS {
            tracing::warn!(
                "Strategy {} failed for {}: [{}] {}",
                strategy.label(),
                url,
                res.error_no,
                res.error_message
            );
            return None;
        }

        Some(Delivery::Stream {
            data: Bytes::from(res.result),
            content_type: content_type.to_string(),
        })
    }
}

/// Content type from the requested filename's extension
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::classify;

    #[test]
    fn test_plan_foreign_is_single_direct_fetch() {
        let class = classify("https://files.example.com/a.pdf", "demo");
        assert_eq!(DeliveryService::plan(&class), vec![Strategy::Direct]);
    }

    #[test]
    fn test_plan_raw_tries_unsigned_then_signed_raw() {
        let class = classify(
            "https://res.cloudinary.com/demo/raw/upload/v1/course-documents/workbook.pdf",
            "demo",
        );
        assert_eq!(
            DeliveryService::plan(&class),
            vec![Strategy::Direct, Strategy::SignedRaw, Strategy::DirectUrl]
        );
    }

    #[test]
    fn test_plan_ambiguous_signs_raw_before_image() {
        let class = classify(
            "https://res.cloudinary.com/demo/image/upload/v1/course-documents/workbook.pdf",
            "demo",
        );
        let plan = DeliveryService::plan(&class);
        assert_eq!(
            plan,
            vec![
                Strategy::SignedRaw,
                Strategy::SignedImage,
                Strategy::DirectUrl
            ]
        );

        let raw_at = plan.iter().position(|s| *s == Strategy::SignedRaw).unwrap();
        let image_at = plan
            .iter()
            .position(|s| *s == Strategy::SignedImage)
            .unwrap();
        assert!(raw_at < image_at);
    }

    #[test]
    fn test_plan_media_has_no_signed_fallback() {
        let class = classify(
            "https://res.cloudinary.com/demo/image/upload/v1/course-images/cover.png",
            "demo",
        );
        assert_eq!(DeliveryService::plan(&class), vec![Strategy::Direct]);
    }

    #[test]
    fn test_no_strategy_repeats_within_a_plan() {
        for url in [
            "https://files.example.com/a.pdf",
            "https://res.cloudinary.com/demo/raw/upload/v1/a.pdf",
            "https://res.cloudinary.com/demo/image/upload/v1/a.pdf",
            "https://res.cloudinary.com/demo/video/upload/v1/a.mp4",
        ] {
            let plan = DeliveryService::plan(&classify(url, "demo"));
            let mut seen = plan.clone();
            seen.dedup();
            assert_eq!(seen.len(), plan.len(), "repeated strategy for {}", url);
        }
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("workbook.pdf"), "application/pdf");
        assert_eq!(content_type_for("cover.png"), "image/png");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_exhaustion_is_storage_error_without_credentials() {
        let client = Client::new("demo", "key", "super-secret-value");

        // Foreign URL, single direct fetch against a refused port
        let err = DeliveryService::fetch_asset(&client, "https://127.0.0.1:1/files/a.pdf", "a.pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        let message = err.to_string();
        assert!(message.contains("All download strategies failed"), "{}", message);
        assert!(!message.contains("super-secret-value"));
    }
}
