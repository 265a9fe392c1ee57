//! CSV ingestion upload and local file reading.

use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData};

use fundref::{ApiError, ApiResult, Dataset, Endpoint, IngestReceipt};

use super::api::{read_json, ApiClient};

/// Post one CSV file to `/ingest/upload` tagged with its target dataset.
pub async fn upload_dataset(
    client: &ApiClient,
    file: File,
    dataset: Dataset,
) -> ApiResult<IngestReceipt> {
    let form_data =
        FormData::new().map_err(|e| ApiError::Request(format!("FormData: {:?}", e)))?;
    form_data
        .append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|e| ApiError::Request(format!("append file: {:?}", e)))?;
    form_data
        .append_with_str("target", dataset.key())
        .map_err(|e| ApiError::Request(format!("append target: {:?}", e)))?;

    let endpoint = Endpoint::IngestUpload;
    log::info!(
        "Uploading {} to {} as {}",
        file.name(),
        client.url(&endpoint),
        dataset
    );

    let request = client
        .request(&endpoint)
        .body(form_data)
        .map_err(|e| ApiError::Request(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let body = read_json(response).await?;
    // The acknowledgement body is informational only.
    Ok(serde_json::from_value(body).unwrap_or_else(|e| {
        log::warn!("Unrecognized ingest acknowledgement: {}", e);
        IngestReceipt::default()
    }))
}

/// Read the whole content of a selected file.
pub async fn read_file_bytes(file: &File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_deserialization() {
        let json = r#"{"detail": "Ingested 42 rows", "target": "share_classes"}"#;
        let receipt: IngestReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.detail.as_deref(), Some("Ingested 42 rows"));
        assert_eq!(
            receipt.target.as_deref().and_then(Dataset::from_key),
            Some(Dataset::ShareClasses)
        );
    }

    #[test]
    fn test_receipt_tolerates_extra_fields() {
        let json = r#"{"status": "ok", "rows": 3}"#;
        let receipt: IngestReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt, IngestReceipt::default());
    }
}
