//! Encodes item images as `data:` URIs for the `imagePath` field.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use market_core::config::{UploadLimits, UploadPurpose};
use market_core::{MarketError, Result};
use std::path::Path;
use tokio::fs;

/// Infers the MIME type from a filename extension using the `mime_guess` library.
fn infer_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

fn describe_limit(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Reads the image at `path` and returns it as a base64 `data:` URI.
///
/// The size is checked against the ceiling for `purpose` before the file is
/// read; an oversized image fails with `MarketError::Validation`.
pub async fn encode_image(path: &Path, limits: &UploadLimits, purpose: UploadPurpose) -> Result<String> {
    let metadata = fs::metadata(path).await?;
    let max_bytes = limits.max_bytes(purpose);

    if metadata.len() > max_bytes {
        tracing::debug!(
            "[ImageUpload] Rejected {} ({} bytes > {} bytes)",
            path.display(),
            metadata.len(),
            max_bytes
        );
        return Err(MarketError::validation(format!(
            "Image file is too large, please choose an image smaller than {}",
            describe_limit(max_bytes)
        )));
    }

    let bytes = fs::read(path).await?;
    let mime_type = infer_mime_type(path);
    tracing::debug!(
        "[ImageUpload] Encoding {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime_type
    );

    Ok(format!("data:{};base64,{}", mime_type, BASE64_STANDARD.encode(bytes)))
}
