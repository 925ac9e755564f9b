//! Delivery URL parsing and asset classification

use url::Url;

use super::client::DELIVERY_HOST;

/// Components of a provider delivery URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryUrl {
    pub resource_type: String,
    pub delivery_type: String,
    pub version: Option<u64>,
    pub public_id: String,
}

impl DeliveryUrl {
    /// Parse a delivery URL belonging to the given cloud
    ///
    /// Returns None for URLs hosted elsewhere or under another cloud name.
    pub fn parse(raw: &str, cloud_name: &str) -> Option<Self> {
        let parsed = Url::parse(raw).ok()?;
        if parsed.host_str() != Some(DELIVERY_HOST) {
            return None;
        }

        let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
        if segments.next()? != cloud_name {
            return None;
        }
        let resource_type = segments.next()?.to_string();
        let delivery_type = segments.next()?.to_string();

        let mut rest: Vec<&str> = segments.collect();

        // Skip an embedded signature token, the URL may already be signed
        if rest.first().is_some_and(|s| is_signature_segment(s)) {
            rest.remove(0);
        }

        let version = rest.first().and_then(|s| parse_version(s));
        if version.is_some() {
            rest.remove(0);
        }

        if rest.is_empty() {
            return None;
        }
        let public_id = urlencoding::decode(&rest.join("/")).ok()?.into_owned();

        Some(Self {
            resource_type,
            delivery_type,
            version,
            public_id,
        })
    }

    /// Trailing file name component of the public id
    pub fn file_name(&self) -> &str {
        self.public_id.rsplit('/').next().unwrap_or(&self.public_id)
    }

    /// Whether the public id carries an image file extension
    pub fn has_image_extension(&self) -> bool {
        mime_guess::from_path(self.file_name())
            .first()
            .map(|mime| mime.type_() == mime::IMAGE)
            .unwrap_or(false)
    }
}

fn is_signature_segment(s: &str) -> bool {
    s.starts_with("s--") && s.ends_with("--") && s.len() > 5
}

fn parse_version(s: &str) -> Option<u64> {
    let digits = s.strip_prefix('v')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// How a stored asset URL is retrieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetClass {
    /// Not hosted by the provider
    Foreign,
    /// Provider URL with resource type raw
    Raw(DeliveryUrl),
    /// Stored under the image path but without an image extension,
    /// usually a document uploaded as an image resource
    AmbiguousImage(DeliveryUrl),
    /// Plain image or video
    Media(DeliveryUrl),
}

impl AssetClass {
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Foreign => "foreign",
            AssetClass::Raw(_) => "raw",
            AssetClass::AmbiguousImage(_) => "ambiguous-image",
            AssetClass::Media(_) => "media",
        }
    }

    /// Parsed delivery URL for provider-hosted assets
    pub fn delivery_url(&self) -> Option<&DeliveryUrl> {
        match self {
            AssetClass::Foreign => None,
            AssetClass::Raw(d) | AssetClass::AmbiguousImage(d) | AssetClass::Media(d) => Some(d),
        }
    }
}

/// Classify a stored asset URL for the download chain
pub fn classify(raw: &str, cloud_name: &str) -> AssetClass {
    match DeliveryUrl::parse(raw, cloud_name) {
        None => AssetClass::Foreign,
        Some(d) if d.resource_type == "raw" => AssetClass::Raw(d),
        Some(d) if d.resource_type == "image" && !d.has_image_extension() => {
            AssetClass::AmbiguousImage(d)
        }
        Some(d) => AssetClass::Media(d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_url() {
        let d = DeliveryUrl::parse(
            "https://res.cloudinary.com/demo/raw/upload/v1718000000/course-documents/workbook.pdf",
            "demo",
        )
        .unwrap();
        assert_eq!(d.resource_type, "raw");
        assert_eq!(d.delivery_type, "upload");
        assert_eq!(d.version, Some(1718000000));
        assert_eq!(d.public_id, "course-documents/workbook.pdf");
        assert_eq!(d.file_name(), "workbook.pdf");
    }

    #[test]
    fn test_parse_unversioned_url() {
        let d = DeliveryUrl::parse(
            "https://res.cloudinary.com/demo/image/upload/course-images/cover.png",
            "demo",
        )
        .unwrap();
        assert_eq!(d.version, None);
        assert_eq!(d.public_id, "course-images/cover.png");
    }

    #[test]
    fn test_parse_skips_signature_segment() {
        let d = DeliveryUrl::parse(
            "https://res.cloudinary.com/demo/raw/upload/s--AbCdEfGh--/v99/notes.txt",
            "demo",
        )
        .unwrap();
        assert_eq!(d.version, Some(99));
        assert_eq!(d.public_id, "notes.txt");
    }

    #[test]
    fn test_parse_rejects_foreign_urls() {
        assert!(DeliveryUrl::parse("https://example.com/files/a.pdf", "demo").is_none());
        assert!(DeliveryUrl::parse("not a url", "demo").is_none());
        // Another cloud on the same host
        assert!(DeliveryUrl::parse(
            "https://res.cloudinary.com/other/raw/upload/v1/a.pdf",
            "demo"
        )
        .is_none());
    }

    #[test]
    fn test_parse_decodes_public_id() {
        let d = DeliveryUrl::parse(
            "https://res.cloudinary.com/demo/raw/upload/v1/course-documents/unit%201.pdf",
            "demo",
        )
        .unwrap();
        assert_eq!(d.public_id, "course-documents/unit 1.pdf");
    }

    #[test]
    fn test_classify_raw() {
        let class = classify(
            "https://res.cloudinary.com/demo/raw/upload/v1/course-documents/workbook.pdf",
            "demo",
        );
        assert_eq!(class.label(), "raw");
    }

    #[test]
    fn test_classify_document_stored_as_image() {
        let class = classify(
            "https://res.cloudinary.com/demo/image/upload/v1/course-documents/workbook.pdf",
            "demo",
        );
        assert_eq!(class.label(), "ambiguous-image");
    }

    #[test]
    fn test_classify_media() {
        let image = classify(
            "https://res.cloudinary.com/demo/image/upload/v1/course-images/cover.png",
            "demo",
        );
        assert_eq!(image.label(), "media");

        let video = classify(
            "https://res.cloudinary.com/demo/video/upload/v1/course-videos/lesson.mp4",
            "demo",
        );
        assert_eq!(video.label(), "media");
    }

    #[test]
    fn test_classify_foreign() {
        let class = classify("https://files.example.com/a.pdf", "demo");
        assert_eq!(class, AssetClass::Foreign);
    }
}
