use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Asset classification, decides the provider storage options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Document,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Document => "document",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "image" => Some(AssetKind::Image),
            "video" => Some(AssetKind::Video),
            "document" => Some(AssetKind::Document),
            _ => None,
        }
    }

    /// Provider resource type for this kind
    pub fn resource_type(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Document => "raw",
        }
    }

    /// Destination folder for this kind
    pub fn default_folder(&self) -> &'static str {
        match self {
            AssetKind::Image => "course-images",
            AssetKind::Video => "course-videos",
            AssetKind::Document => "course-documents",
        }
    }

    /// Infer a kind from a stored URL's file extension
    pub fn infer_from_url(url: &str) -> Self {
        let name = url.rsplit('/').next().unwrap_or(url);
        match mime_guess::from_path(name).first() {
            Some(mime) if mime.type_() == mime::IMAGE => AssetKind::Image,
            Some(mime) if mime.type_() == mime::VIDEO => AssetKind::Video,
            _ => AssetKind::Document,
        }
    }
}

/// Chapter asset reference
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetRecord {
    pub id: String,
    pub chapter_id: String,
    pub url: String,
    pub name: String,
    pub kind: String,
    pub size: i64,
    pub created_at: String,
}

/// Attach asset request
#[derive(Debug, Deserialize)]
pub struct AttachAssetRequest {
    pub url: String,
    pub name: String,
    pub kind: Option<String>,
    pub size: Option<i64>,
}

/// Chapter asset list response
#[derive(Debug, Serialize)]
pub struct AssetListResponse {
    pub assets: Vec<AssetRecord>,
}

/// Upload response payload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub public_id: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// Download query parameters
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub filename: Option<String>,
}

/// Browser-side download instruction, returned when the server
/// hands the signed URL to the client instead of proxying bytes
#[derive(Debug, Serialize)]
pub struct DirectDownload {
    #[serde(rename = "directUrl")]
    pub direct_url: String,
    pub filename: String,
    #[serde(rename = "useDirect")]
    pub use_direct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(AssetKind::from_str("document"), Some(AssetKind::Document));
        assert_eq!(AssetKind::from_str("IMAGE"), Some(AssetKind::Image));
        assert_eq!(AssetKind::from_str("pdf"), None);
        assert_eq!(AssetKind::Document.as_str(), "document");
    }

    #[test]
    fn test_kind_storage_options() {
        assert_eq!(AssetKind::Document.resource_type(), "raw");
        assert_eq!(AssetKind::Document.default_folder(), "course-documents");
        assert_eq!(AssetKind::Video.resource_type(), "video");
    }

    #[test]
    fn test_infer_from_url() {
        assert_eq!(
            AssetKind::infer_from_url("https://example.com/files/photo.png"),
            AssetKind::Image
        );
        assert_eq!(
            AssetKind::infer_from_url("https://example.com/files/lesson.mp4"),
            AssetKind::Video
        );
        assert_eq!(
            AssetKind::infer_from_url("https://example.com/files/workbook.pdf"),
            AssetKind::Document
        );
        assert_eq!(
            AssetKind::infer_from_url("https://example.com/files/no-extension"),
            AssetKind::Document
        );
    }
}
