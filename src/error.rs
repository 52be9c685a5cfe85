use thiserror::Error;

/// Error type for the TMX/TSX loader
#[derive(Debug, Error)]
pub enum MapError {
    /// The XML document could not be decoded into a map or tileset
    #[error("failed to decode document: {0}")]
    Decode(#[from] DecodeError),
    /// A layer's CSV data could not be tokenized
    #[error(transparent)]
    RowParse(#[from] RowParseError),
    /// A layer uses an encoding other than CSV
    #[error("layer '{layer}' uses unsupported encoding '{encoding}' (only csv is supported)")]
    UnsupportedEncoding {
        /// Layer name
        layer: String,
        /// Value of the `encoding` attribute
        encoding: String,
    },
    /// JSON serialization failed
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed or unparseable XML input. Always fatal: no partial map is produced.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not UTF-8
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// XML syntax error (unclosed tag, bad entity, ...)
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    /// A numeric attribute holds something that is not an unsigned integer
    #[error("invalid value {value:?} for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        /// Tag name of the element
        element: String,
        /// Attribute name
        attribute: String,
        /// Attribute value as written
        value: String,
        /// Why the value did not parse
        #[source]
        source: std::num::ParseIntError,
    },
    /// [`crate::decode_document`] found a root that is neither `<map>` nor `<tileset>`
    #[error("unexpected root element <{found}>, expected <map> or <tileset>")]
    UnexpectedRoot {
        /// Tag name of the root element
        found: String,
    },
}

/// A CSV row inside a layer's data block could not be read.
#[derive(Debug, Error)]
#[error("failed to read CSV row {row} of layer '{layer}': {reason}")]
pub struct RowParseError {
    /// Layer name
    pub layer: String,
    /// Index of the failing row, counting only rows with tiles
    pub row: usize,
    /// What went wrong
    #[source]
    pub reason: RowFault,
}

/// Cause of a [`RowParseError`].
#[derive(Debug, Error)]
pub enum RowFault {
    /// The CSV reader failed
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A field is not an unsigned tile ID, e.g. a stray quote or letter
    #[error("{0:?} is not a tile id")]
    InvalidTile(String),
}

impl From<std::str::Utf8Error> for MapError {
    fn from(err: std::str::Utf8Error) -> Self {
        MapError::Decode(DecodeError::Utf8(err))
    }
}

impl From<roxmltree::Error> for MapError {
    fn from(err: roxmltree::Error) -> Self {
        MapError::Decode(DecodeError::Xml(err))
    }
}
