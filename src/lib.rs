#![warn(missing_docs)]

//! Tiled TMX/TSX decoder that materializes CSV tile layers and re-encodes
//! maps and tilesets as JSON.

mod error;
mod loader {
    pub mod csv_layer;
    pub mod tmx_loader;
}
mod map;
mod spatial;

use serde::Serialize;

pub use error::{DecodeError, MapError, RowFault, RowParseError};
pub use loader::csv_layer::{flatten, materialize_layer, materialize_layers, parse_rows, ContentShape};
pub use loader::tmx_loader::{decode_document, decode_map, decode_tileset};
pub use map::{
    Data, DataTile, Document, Image, Layer, LayerContent, Map, Property, Tile, Tileset,
    TilesetReference,
};
pub use spatial::tile_position;

/// Settings for [`load_map`] and [`load_document`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Shape written into each layer's content
    pub shape: ContentShape,
}

/// Decode a `.tmx` document and materialize all of its layers.
pub fn load_map(bytes: &[u8], options: &LoadOptions) -> Result<Map, MapError> {
    let mut map = decode_map(bytes)?;
    materialize_layers(&mut map, options.shape)?;
    Ok(map)
}

/// Decode a `.tsx` document.
pub fn load_tileset(bytes: &[u8]) -> Result<Tileset, MapError> {
    decode_tileset(bytes)
}

/// Decode a map or tileset; maps get their layers materialized.
pub fn load_document(bytes: &[u8], options: &LoadOptions) -> Result<Document, MapError> {
    match decode_document(bytes)? {
        Document::Map(mut map) => {
            materialize_layers(&mut map, options.shape)?;
            Ok(Document::Map(map))
        }
        tileset @ Document::Tileset(_) => Ok(tileset),
    }
}

/// Two-space indented JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, MapError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Single-line JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, MapError> {
    Ok(serde_json::to_string(value)?)
}
