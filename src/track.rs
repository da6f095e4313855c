use anyhow::{Context, Result};
use base64::Engine as _;
use serde::Deserialize;

/// Where a recording is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A file path on disk.
    Path(String),
    /// An in-memory buffer carrying an opaque payload.
    Buffer(Vec<u8>),
}

/// Immutable description of a recording destination plus display metadata.
///
/// Constructed once from caller input or hydrated from an external JSON-like
/// structure, then owned by the session it was built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub destination: Destination,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_art_url: Option<String>,
    pub album_art_asset: Option<String>,
    pub album_art_file: Option<String>,
}

/// External wire shape: camelCase keys, `dataBuffer` is base64 text,
/// absence of `path` selects the buffer destination.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    path: Option<String>,
    title: Option<String>,
    artist: Option<String>,
    album_art_url: Option<String>,
    album_art_asset: Option<String>,
    album_art_file: Option<String>,
    data_buffer: Option<String>,
}

impl TrackDescriptor {
    /// Create a path-backed track with no display metadata.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            destination: Destination::Path(path.into()),
            title: None,
            artist: None,
            album_art_url: None,
            album_art_asset: None,
            album_art_file: None,
        }
    }

    /// Create a buffer-backed track with no display metadata.
    pub fn from_buffer(data: Vec<u8>) -> Self {
        Self {
            destination: Destination::Buffer(data),
            title: None,
            artist: None,
            album_art_url: None,
            album_art_asset: None,
            album_art_file: None,
        }
    }

    /// Hydrate from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTrack =
            serde_json::from_str(json).context("Failed to parse track descriptor JSON")?;
        Self::from_raw(raw)
    }

    /// Hydrate from an already-parsed key/value structure.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawTrack =
            serde_json::from_value(value).context("Failed to parse track descriptor map")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTrack) -> Result<Self> {
        let destination = match raw.path {
            Some(path) => Destination::Path(path),
            None => {
                let encoded = raw.data_buffer.as_deref().unwrap_or("");
                let data = base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .context("Failed to decode track data buffer")?;
                Destination::Buffer(data)
            }
        };

        Ok(Self {
            destination,
            title: raw.title,
            artist: raw.artist,
            album_art_url: raw.album_art_url,
            album_art_asset: raw.album_art_asset,
            album_art_file: raw.album_art_file,
        })
    }

    /// Whether this track records to a file path (as opposed to a buffer).
    pub fn is_using_path(&self) -> bool {
        matches!(self.destination, Destination::Path(_))
    }

    /// Short destination description for logs and permission prompts.
    pub fn destination_summary(&self) -> String {
        match &self.destination {
            Destination::Path(path) => format!("path:{}", path),
            Destination::Buffer(data) => format!("buffer:{} bytes", data.len()),
        }
    }
}
