//! Upload and access-control operations
//! Reference: https://cloudinary.com/documentation/image_upload_api_reference

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use std::collections::{BTreeMap, HashMap};

use super::client::Client;
use super::request::{Request, Response};

/// Per-upload storage options
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Destination folder
    pub folder: String,
    /// Provider resource type (image/video/raw)
    pub resource_type: String,
    /// Derive the public id from the uploaded file name
    pub use_filename: bool,
    /// Append a random suffix to the derived name
    pub unique_filename: bool,
    /// Requested access mode, omitted when None
    pub access_mode: Option<String>,
    /// Original file name sent with the multipart part
    pub file_name: String,
}

/// Parsed upload response
#[derive(Debug, serde::Deserialize)]
pub struct UploadResult {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub bytes: i64,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub version: Option<u64>,
}

impl UploadResult {
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}

impl Client {
    /// Upload file data
    ///
    /// # Arguments
    /// - data: file bytes
    /// - options: per-type storage options
    pub async fn upload(&self, data: Vec<u8>, options: &UploadOptions) -> Response {
        let mut params = BTreeMap::new();
        params.insert("timestamp".to_string(), Utc::now().timestamp().to_string());
        params.insert("folder".to_string(), options.folder.clone());
        if options.use_filename {
            params.insert("use_filename".to_string(), "true".to_string());
            params.insert(
                "unique_filename".to_string(),
                options.unique_filename.to_string(),
            );
        }
        if let Some(mode) = &options.access_mode {
            params.insert("access_mode".to_string(), mode.clone());
        }
        let signature = self.signer().api_signature(&params);

        let mut form = Form::new();
        for (k, v) in &params {
            form = form.text(k.clone(), v.clone());
        }
        form = form
            .text("api_key", self.api_key().to_string())
            .text("signature", signature)
            .part("file", Part::bytes(data).file_name(options.file_name.clone()));

        let resp =
            Request::post_multipart(&self.api_url(&options.resource_type, "upload"), form).await;
        self.make_response(resp)
    }

    /// Force an access mode on an existing asset
    ///
    /// # Arguments
    /// - public_id: asset public id
    /// - resource_type: provider resource type the asset is stored under
    /// - access_mode: requested mode, e.g. "public"
    pub async fn explicit(
        &self,
        public_id: &str,
        resource_type: &str,
        access_mode: &str,
    ) -> Response {
        let mut params = BTreeMap::new();
        params.insert("access_mode".to_string(), access_mode.to_string());
        params.insert("public_id".to_string(), public_id.to_string());
        params.insert("timestamp".to_string(), Utc::now().timestamp().to_string());
        params.insert("type".to_string(), "upload".to_string());
        let signature = self.signer().api_signature(&params);

        let mut form: HashMap<String, String> = params.into_iter().collect();
        form.insert("api_key".to_string(), self.api_key().to_string());
        form.insert("signature".to_string(), signature);

        let resp = Request::post_form(&self.api_url(resource_type, "explicit"), &form).await;
        self.make_response(resp)
    }

    /// Plain GET, used by the download strategies
    pub async fn fetch(&self, url: &str) -> Response {
        let resp = Request::get(url, None).await;
        self.make_response(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_result_parse() {
        let body = br#"{
            "public_id": "course-documents/workbook.pdf",
            "secure_url": "https://res.cloudinary.com/demo/raw/upload/v1718000000/course-documents/workbook.pdf",
            "original_filename": "workbook",
            "bytes": 51234,
            "resource_type": "raw",
            "version": 1718000000
        }"#;
        let parsed = UploadResult::parse(body).unwrap();
        assert_eq!(parsed.public_id, "course-documents/workbook.pdf");
        assert_eq!(parsed.bytes, 51234);
        assert_eq!(parsed.resource_type, "raw");
        assert_eq!(parsed.version, Some(1718000000));
    }

    #[test]
    fn test_upload_result_parse_rejects_error_body() {
        let body = br#"{"error": {"message": "Invalid signature"}}"#;
        assert!(UploadResult::parse(body).is_err());
    }
}
