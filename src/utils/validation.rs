use crate::error::TransferError;
use std::path::Path;

/// Validates payload size against the ceiling. Runs before any side effect.
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), TransferError> {
    if size > max_size {
        tracing::warn!(
            "Rejected upload: {} bytes exceeds the {} bytes ceiling",
            size,
            max_size
        );
        return Err(TransferError::Oversize {
            size,
            limit: max_size,
        });
    }
    Ok(())
}

/// Destination bucket must be present for a real transfer
pub fn validate_destination(destination: &str) -> Result<(), TransferError> {
    if destination.trim().is_empty() {
        return Err(TransferError::InvalidRequest(
            "Bucket name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Only `.csv` files are accepted by the upload form
pub fn validate_csv_file(filename: &str) -> Result<(), TransferError> {
    let is_csv = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if !is_csv {
        return Err(TransferError::InvalidRequest(format!(
            "File '{}' is not a CSV file",
            filename
        )));
    }
    Ok(())
}

/// Reduces a client-supplied filename to its final component and strips
/// characters that are unsafe in object keys and local paths.
pub fn sanitize_filename(filename: &str) -> Result<String, TransferError> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path components stripped from filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return Err(TransferError::InvalidRequest(
            "Filename cannot be empty".to_string(),
        ));
    }

    Ok(sanitized)
}
