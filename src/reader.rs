//! Reads file contents for the snapshot, falling back through a fixed list of encodings.

use std::fs;
use std::path::Path;
#[cfg(feature = "logging")]
use tracing;

/// Returned when no encoding in [`Encoding::ALL`] accepts the bytes.
pub const UNDECODABLE_MARKER: &str = "[Unable to decode file with common encodings]";

/// Text encodings tried, in order, when reading a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// UTF-8 with the byte order mark stripped.
    Utf8Sig,
    Latin1,
    Cp1252,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [
        Encoding::Utf8,
        Encoding::Utf8Sig,
        Encoding::Latin1,
        Encoding::Cp1252,
    ];
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes `bytes` with a single encoding, or `None` if they are not valid in it.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Option<String> {
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
        Encoding::Utf8Sig => {
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            std::str::from_utf8(body).ok().map(str::to_owned)
        }
        Encoding::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        Encoding::Cp1252 => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned()),
    }
}

/// Returns the file's text with line endings translated to `\n`.
///
/// Never fails: an I/O error becomes an inline `[Error reading file: ...]` marker and bytes
/// that no encoding accepts become [`UNDECODABLE_MARKER`].
pub fn read_file_content(path: &Path) -> String {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            #[cfg(feature = "logging")]
            tracing::debug!("Failed to read {}: {}", path.display(), e);
            return format!("[Error reading file: {}]", e);
        }
    };
    for encoding in Encoding::ALL {
        if let Some(text) = decode(&bytes, encoding) {
            #[cfg(feature = "logging")]
            if encoding != Encoding::Utf8 {
                tracing::debug!("Decoded {} as {:?}", path.display(), encoding);
            }
            return normalize_newlines(text);
        }
    }
    UNDECODABLE_MARKER.to_string()
}

fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
