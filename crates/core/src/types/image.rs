//! Binary image payloads carried through the capture pipeline.
//!
//! Images are persisted as data URIs (`data:<mime>;base64,<payload>`) and sent
//! to the remote service as bare base64, so [`ImageData`] converts between the
//! two and owns the decoded bytes in between.

use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type assumed for a bare base64 payload with no data-URI header.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Errors that can occur when reading or decoding an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Reading the image source failed.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The image has no content.
    #[error("image is empty")]
    Empty,

    /// The base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The bytes are not a recognized image format.
    #[error("unsupported image format")]
    UnsupportedFormat,
}

/// A decoded image with its MIME type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageData {
    mime_type: String,
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap raw bytes, detecting the format from magic numbers.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Empty`] for no bytes and
    /// [`ImageError::UnsupportedFormat`] when the format is not PNG, JPEG,
    /// GIF, or WebP.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let mime_type = sniff_mime_type(&bytes).ok_or(ImageError::UnsupportedFormat)?;
        Ok(Self {
            mime_type: mime_type.to_owned(),
            bytes,
        })
    }

    /// Wrap raw bytes with an explicit MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Empty`] for no bytes.
    pub fn with_mime_type(mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        Ok(Self {
            mime_type: mime_type.into(),
            bytes,
        })
    }

    /// Decode a bare base64 payload with a known MIME type.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is empty or not valid base64.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> Result<Self, ImageError> {
        let bytes = STANDARD.decode(payload.trim())?;
        Self::with_mime_type(mime_type, bytes)
    }

    /// Decode a data URI, or a bare base64 payload.
    ///
    /// Everything up to the first comma is treated as the header and stripped.
    /// Without a header the MIME type defaults to [`DEFAULT_MIME_TYPE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is empty or not valid base64.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        match uri.split_once(',') {
            Some((header, payload)) => {
                let mime_type = header
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or(DEFAULT_MIME_TYPE);
                Self::from_base64(mime_type, payload)
            }
            None => Self::from_base64(DEFAULT_MIME_TYPE, uri),
        }
    }

    /// The MIME type, e.g. `image/png`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of decoded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty images cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The bare base64 payload, without any data-URI header.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// The full `data:<mime>;base64,<payload>` form.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Conventional file extension for the MIME type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

// Images can be megabytes; never dump the payload into logs.
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl TryFrom<String> for ImageData {
    type Error = ImageError;

    fn try_from(uri: String) -> Result<Self, Self::Error> {
        Self::from_data_uri(&uri)
    }
}

impl From<ImageData> for String {
    fn from(image: ImageData) -> Self {
        image.to_data_uri()
    }
}

fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
    const JPEG: &[u8] = b"\xff\xd8\xff";

    if bytes.starts_with(PNG) {
        Some("image/png")
    } else if bytes.starts_with(JPEG) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        Some("image/webp")
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
    const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF";

    #[test]
    fn test_from_bytes_sniffs_formats() {
        assert_eq!(
            ImageData::from_bytes(PNG_BYTES.to_vec()).unwrap().mime_type(),
            "image/png"
        );
        assert_eq!(
            ImageData::from_bytes(JPEG_BYTES.to_vec()).unwrap().mime_type(),
            "image/jpeg"
        );
        assert_eq!(
            ImageData::from_bytes(b"GIF89a\x01\x00".to_vec())
                .unwrap()
                .mime_type(),
            "image/gif"
        );
        assert_eq!(
            ImageData::from_bytes(b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec())
                .unwrap()
                .mime_type(),
            "image/webp"
        );
    }

    #[test]
    fn test_from_bytes_rejects_empty_and_unknown() {
        assert!(matches!(
            ImageData::from_bytes(Vec::new()),
            Err(ImageError::Empty)
        ));
        assert!(matches!(
            ImageData::from_bytes(b"%PDF-1.7".to_vec()),
            Err(ImageError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_from_data_uri_strips_header() {
        let original = ImageData::from_bytes(PNG_BYTES.to_vec()).unwrap();
        let uri = original.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let parsed = ImageData::from_data_uri(&uri).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.to_base64(), uri.split_once(',').unwrap().1);
    }

    #[test]
    fn test_from_data_uri_accepts_bare_payload() {
        let payload = STANDARD.encode(JPEG_BYTES);
        let parsed = ImageData::from_data_uri(&payload).unwrap();
        assert_eq!(parsed.mime_type(), DEFAULT_MIME_TYPE);
        assert_eq!(parsed.as_bytes(), JPEG_BYTES);
    }

    #[test]
    fn test_from_data_uri_rejects_garbage() {
        assert!(matches!(
            ImageData::from_data_uri("data:image/png;base64,@@not-base64@@"),
            Err(ImageError::InvalidBase64(_))
        ));
        assert!(matches!(
            ImageData::from_data_uri("data:image/png;base64,"),
            Err(ImageError::Empty)
        ));
    }

    #[test]
    fn test_serde_as_data_uri() {
        let image = ImageData::from_bytes(PNG_BYTES.to_vec()).unwrap();
        let json = serde_json::to_string(&image).unwrap();
        assert!(json.starts_with("\"data:image/png;base64,"));

        let parsed: ImageData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, image);
    }

    #[test]
    fn test_debug_omits_payload() {
        let image = ImageData::from_bytes(PNG_BYTES.to_vec()).unwrap();
        let debug = format!("{image:?}");
        assert!(debug.contains("image/png"));
        assert!(!debug.contains(&image.to_base64()));
    }
}
