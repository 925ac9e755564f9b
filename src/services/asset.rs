use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{AssetKind, AssetRecord, UploadResponse};
use crate::storage::{Client, ErrNo, UploadOptions, UploadResult};

/// Asset service
pub struct AssetService;

impl AssetService {
    /// Storage options for an upload of the given kind
    fn upload_options(kind: AssetKind, folder: Option<String>, file_name: String) -> UploadOptions {
        UploadOptions {
            folder: folder.unwrap_or_else(|| kind.default_folder().to_string()),
            resource_type: kind.resource_type().to_string(),
            // Documents keep their original filename and are stored
            // publicly readable
            use_filename: kind == AssetKind::Document,
            unique_filename: false,
            access_mode: (kind == AssetKind::Document).then(|| "public".to_string()),
            file_name,
        }
    }

    /// Upload a file to the provider and record it in the chapter ledger
    /// when a chapter is named
    pub async fn upload(
        db: &Database,
        media: &Client,
        kind: AssetKind,
        folder: Option<String>,
        chapter_id: Option<String>,
        file_name: String,
        data: Bytes,
    ) -> Result<UploadResponse> {
        let options = Self::upload_options(kind, folder, file_name.clone());

        let res = media.upload(data.to_vec(), &options).await;
        if res.error_no != ErrNo::SUCCESS {
            return Err(AppError::Storage(format!(
                "Upload failed: [{}] {}",
                res.error_no, res.error_message
            )));
        }

        let uploaded = UploadResult::parse(&res.result)
            .map_err(|e| AppError::Storage(format!("Invalid upload response: {}", e)))?;
        tracing::info!(
            "Uploaded {} as {}/{} v{} ({} bytes)",
            file_name,
            uploaded.resource_type,
            uploaded.public_id,
            uploaded.version.unwrap_or(0),
            uploaded.bytes
        );

        if kind == AssetKind::Document {
            // Best effort: force public read access on the new asset.
            // A failure here is logged and tolerated, the upload stands.
            let res = media
                .explicit(&uploaded.public_id, kind.resource_type(), "public")
                .await;
            if res.error_no != ErrNo::SUCCESS {
                tracing::warn!(
                    "Failed to force public access on {}: [{}] {}",
                    uploaded.public_id,
                    res.error_no,
                    res.error_message
                );
            }
        }

        if let Some(chapter_id) = chapter_id {
            Self::attach(
                db,
                &chapter_id,
                &uploaded.secure_url,
                &file_name,
                kind,
                uploaded.bytes,
            )
            .await?;
        }

        Ok(UploadResponse {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
            size: uploaded.bytes,
            kind: kind.as_str().to_string(),
            name: file_name,
        })
    }

    /// Attach an asset to a chapter
    ///
    /// Deduplicates on insert: the same stored URL is attached at most
    /// once per chapter, and re-attaching returns the existing record.
    pub async fn attach(
        db: &Database,
        chapter_id: &str,
        url: &str,
        name: &str,
        kind: AssetKind,
        size: i64,
    ) -> Result<AssetRecord> {
        let existing: Option<AssetRecord> =
            sqlx::query_as("SELECT * FROM chapter_assets WHERE chapter_id = ? AND url = ?")
                .bind(chapter_id)
                .bind(url)
                .fetch_optional(db.pool())
                .await?;

        if let Some(record) = existing {
            tracing::debug!("Asset already attached to chapter {}: {}", chapter_id, url);
            return Ok(record);
        }

        let record = AssetRecord {
            id: Uuid::new_v4().to_string(),
            chapter_id: chapter_id.to_string(),
            url: url.to_string(),
            name: name.to_string(),
            kind: kind.as_str().to_string(),
            size,
            created_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        sqlx::query(
            "INSERT INTO chapter_assets (id, chapter_id, url, name, kind, size, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.chapter_id)
        .bind(&record.url)
        .bind(&record.name)
        .bind(&record.kind)
        .bind(record.size)
        .bind(&record.created_at)
        .execute(db.pool())
        .await?;

        Ok(record)
    }

    /// List a chapter's assets
    pub async fn list(db: &Database, chapter_id: &str) -> Result<Vec<AssetRecord>> {
        let assets = sqlx::query_as(
            "SELECT * FROM chapter_assets WHERE chapter_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(chapter_id)
        .fetch_all(db.pool())
        .await?;

        Ok(assets)
    }

    /// Remove an asset from a chapter
    pub async fn remove(db: &Database, chapter_id: &str, asset_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM chapter_assets WHERE chapter_id = ? AND id = ?")
            .bind(chapter_id)
            .bind(asset_id)
            .execute(db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Asset not found: {}", asset_id)));
        }

        tracing::debug!("Removed asset {} from chapter {}", asset_id, chapter_id);
        Ok(())
    }
}
