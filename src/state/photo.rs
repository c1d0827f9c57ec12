/// Displayable photos
///
/// A record's `photo` is a string that can be an embedded `data:` URI,
/// a `file://` URI, a bare filesystem path, or a remote URL. Decoding
/// happens once, when the record enters the list, so `view` never touches
/// base64 or the disk.

use base64::prelude::*;
use iced::widget::image::Handle;
use reqwest::Url;
use std::path::PathBuf;

/// Something the card can render for a photo
#[derive(Debug, Clone)]
pub enum Photo {
    /// Image data ready for the image widget
    Image(Handle),
    /// A URI the card shows as text (remote or undecodable)
    Link(String),
}

impl Photo {
    /// Resolve a photo URI into something renderable
    pub fn from_uri(uri: &str) -> Photo {
        if let Some(bytes) = decode_data_uri(uri) {
            return Photo::Image(Handle::from_bytes(bytes));
        }

        match local_path(uri) {
            Some(path) => Photo::Image(Handle::from_path(path)),
            None => Photo::Link(uri.to_string()),
        }
    }
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URI
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    BASE64_STANDARD.decode(payload.trim()).ok()
}

/// Build a `data:` URI for JPEG bytes already encoded as base64
pub fn jpeg_data_uri(base64_payload: &str) -> String {
    format!("data:image/jpeg;base64,{}", base64_payload)
}

/// Map `file://` URIs and bare absolute paths to a filesystem path
fn local_path(uri: &str) -> Option<PathBuf> {
    if uri.starts_with("file:") {
        return Url::parse(uri).ok()?.to_file_path().ok();
    }

    let path = PathBuf::from(uri);
    if path.is_absolute() {
        Some(path)
    } else {
        None
    }
}
