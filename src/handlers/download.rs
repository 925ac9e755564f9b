use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{DirectDownload, DownloadQuery};
use crate::services::delivery::Delivery;
use crate::services::DeliveryService;
use crate::AppState;

/// Download a stored asset, proxying through the retrieval chain
/// GET /api/v1/assets/download?url=...&filename=...
pub async fn download_asset(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("No url provided".to_string()))?;
    let filename = query
        .filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;

    match DeliveryService::fetch_asset(&state.media, &url, &filename).await? {
        Delivery::Stream { data, content_type } => {
            let response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, data.len())
                .header(header::CONTENT_DISPOSITION, content_disposition(&filename))
                .body(Body::from(data))
                .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

            Ok(response)
        }
        Delivery::Redirect { direct_url } => Ok(Json(DirectDownload {
            direct_url,
            filename,
            use_direct: true,
        })
        .into_response()),
    }
}

/// Attachment header value for the caller-supplied filename
fn content_disposition(filename: &str) -> String {
    let fallback_name = filename.replace(['"', '\\'], "_");
    let encoded_name = urlencoding::encode(filename);
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback_name, encoded_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_plain_name() {
        assert_eq!(
            content_disposition("workbook.pdf"),
            "attachment; filename=\"workbook.pdf\"; filename*=UTF-8''workbook.pdf"
        );
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii() {
        let header = content_disposition("práctica 1.pdf");
        assert!(header.contains("filename*=UTF-8''pr%C3%A1ctica%201.pdf"));
    }

    #[test]
    fn test_content_disposition_sanitizes_quotes() {
        let header = content_disposition("a\"b.pdf");
        assert!(header.contains("filename=\"a_b.pdf\""));
    }
}
