//! Configuration export: JSON -> zlib -> base64 binary artifacts.
//!
//! A configuration object is split into an on-device model blob and the
//! remaining settings, each deflate-compressed and base64-encoded the way the
//! SDK's loader expects, then packed into one zip archive for download.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::info;
use serde_json::Value;
use std::io::Write;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::{Result, ScoutError};

/// Config key holding the on-device model definitions, exported separately
const ON_DEVICE_MODELS_KEY: &str = "OnDeviceModels";
/// Config key no longer exported
const LSH_MODELS_KEY: &str = "AppsLshModels";

/// File name for the exported on-device model blob
pub const JS_MODEL_FILE: &str = "anagog_js_model.bin";
/// File name for the exported remaining configuration
pub const CONFIG_FILE: &str = "anagog_config.bin";

/// One exported binary artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name inside the archive
    pub name: String,
    /// Encoded payload (base64 text as bytes)
    pub contents: Vec<u8>,
}

/// Deflate-compresses `data` and base64-encodes the result
pub fn compress_encode(data: &[u8]) -> Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    Ok(BASE64.encode(compressed))
}

/// Splits and encodes a configuration object into its binary artifacts.
///
/// `AppsLshModels` is dropped if present. `OnDeviceModels`, when present, is
/// removed from the object and exported as its own file; everything that
/// remains becomes the main config file.
pub fn export_config(mut config: Value) -> Result<Vec<ExportArtifact>> {
    let obj = config
        .as_object_mut()
        .ok_or_else(|| ScoutError::Validation("configuration must be a JSON object".into()))?;

    obj.remove(LSH_MODELS_KEY);

    let mut artifacts = Vec::new();

    if let Some(on_device_models) = obj.remove(ON_DEVICE_MODELS_KEY) {
        let encoded = compress_encode(serde_json::to_string(&on_device_models)?.as_bytes())?;
        artifacts.push(ExportArtifact {
            name: JS_MODEL_FILE.to_string(),
            contents: encoded.into_bytes(),
        });
    }

    let encoded = compress_encode(serde_json::to_string(&config)?.as_bytes())?;
    artifacts.push(ExportArtifact {
        name: CONFIG_FILE.to_string(),
        contents: encoded.into_bytes(),
    });

    Ok(artifacts)
}

/// Encodes a configuration object and packs the resulting `.bin` files into
/// an in-memory zip archive, returned as raw bytes for the HTTP layer.
pub fn export_archive(config: Value) -> Result<Vec<u8>> {
    let artifacts = export_config(config)?;

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for artifact in &artifacts {
        zip.start_file(artifact.name.as_str(), options)?;
        zip.write_all(&artifact.contents)?;
    }
    let cursor = zip.finish()?;

    info!("Exported {} binary config artifacts", artifacts.len());
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Read;
    use zip::ZipArchive;

    fn decode(encoded: &[u8]) -> Value {
        let compressed = BASE64
            .decode(std::str::from_utf8(encoded).unwrap())
            .unwrap();
        let mut decoder = ZlibDecoder::new(compressed.as_slice());
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_export_splits_on_device_models() {
        let config = json!({
            "OnDeviceModels": {"model": [1, 2, 3]},
            "AppsLshModels": {"dropped": true},
            "PollInterval": 300
        });

        let artifacts = export_config(config).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].name, JS_MODEL_FILE);
        assert_eq!(artifacts[1].name, CONFIG_FILE);

        assert_eq!(decode(&artifacts[0].contents), json!({"model": [1, 2, 3]}));
        // Main config keeps the rest; the LSH models are gone entirely.
        assert_eq!(decode(&artifacts[1].contents), json!({"PollInterval": 300}));
    }

    #[test]
    fn test_export_without_on_device_models() {
        let artifacts = export_config(json!({"PollInterval": 300})).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, CONFIG_FILE);
    }

    #[test]
    fn test_export_rejects_non_object() {
        assert!(export_config(json!([1, 2, 3])).is_err());
        assert!(export_config(json!("config")).is_err());
    }

    #[test]
    fn test_archive_contains_artifacts() {
        let bytes = export_archive(json!({
            "OnDeviceModels": {"m": 1},
            "Setting": "value"
        }))
        .unwrap();

        let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec![CONFIG_FILE.to_string(), JS_MODEL_FILE.to_string()]);

        let mut entry = archive.by_name(CONFIG_FILE).unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(decode(&contents), json!({"Setting": "value"}));
    }
}
