use serde::{Deserialize, Serialize};

/// Root of a `.tmx` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    /// TMX format version
    pub version: String,
    /// Version of the editor that saved the map
    pub tiled_version: String,
    /// Stored verbatim ("orthogonal", "isometric", ...)
    pub orientation: String,
    /// Stored verbatim ("right-down", ...)
    pub render_order: String,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// 0 or 1
    pub infinite: u32,
    /// Id the editor hands to the next new layer
    #[serde(rename = "nextLayerID")]
    pub next_layer_id: u32,
    /// Id the editor hands to the next new object
    #[serde(rename = "nextObjectID")]
    pub next_object_id: u32,
    /// External tilesets, in GID order as written
    pub tilesets: Vec<TilesetReference>,
    /// Tile layers, in draw order as written
    pub layers: Vec<Layer>,
}

/// `<tileset firstgid=".." source=".."/>` inside a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilesetReference {
    /// GID of the tileset's first tile
    #[serde(rename = "firstGID")]
    pub first_gid: u32,
    /// Path of the `.tsx` file, relative to the map
    pub source: String,
}

/// A `<layer>` of tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layer {
    /// Unique within a map, not checked
    pub id: u32,
    /// Name shown in the editor
    pub name: String,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// The layer's cells
    pub data: Data,
}

/// A layer's `<data>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    /// Only `csv` is decoded
    pub encoding: String,
    /// Filled in by [`crate::materialize_layers`].
    pub content: LayerContent,
    /// Character data exactly as it appeared between `<data>` and `</data>`.
    #[serde(skip)]
    pub raw: String,
}

/// One cell of a materialized layer. `tile` is kept as written, `"0"` included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTile {
    /// Tile ID as written
    pub tile: String,
    /// Column, 0-based
    pub x: u32,
    /// Row, 0-based
    pub y: u32,
}

/// Materialized layer cells, in one of the two supported shapes.
///
/// `Matrix` is tried first when reading JSON: an array of records can never
/// read as rows, but a `DataTile` would accept a one-element row as a
/// sequence. An empty array reads back as an empty `Matrix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerContent {
    /// Rows of tile IDs, top to bottom.
    Matrix(Vec<Vec<String>>),
    /// Flattened `{x, y, tile}` records, row-major.
    Tiles(Vec<DataTile>),
}

impl Default for LayerContent {
    fn default() -> Self {
        LayerContent::Tiles(Vec::new())
    }
}

impl LayerContent {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            LayerContent::Tiles(tiles) => tiles.len(),
            LayerContent::Matrix(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    /// True when there are no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row view of the content. Positional tiles are grouped by `y`; rows that
    /// have no records are left empty.
    pub fn to_matrix(&self) -> Vec<Vec<String>> {
        match self {
            LayerContent::Matrix(rows) => rows.clone(),
            LayerContent::Tiles(tiles) => {
                let height = tiles.iter().map(|t| t.y as usize + 1).max().unwrap_or(0);
                let mut rows = vec![Vec::new(); height];
                for t in tiles {
                    rows[t.y as usize].push(t.tile.clone());
                }
                rows
            }
        }
    }
}

/// Root of a `.tsx` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct Tileset {
    /// TSX format version
    pub version: String,
    /// Version of the editor that saved the tileset
    pub tiled_version: String,
    /// Tileset name
    pub name: String,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Number of tiles in the atlas
    pub tile_count: u32,
    /// Tiles per atlas row
    pub columns: u32,
    /// Atlas image
    pub image: Image,
    /// Tiles that carry extra data, in document order
    pub tiles: Vec<Tile>,
}

/// A tileset's `<image>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    /// Path of the image file, relative to the tileset
    pub source: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A `<tile>` entry in a tileset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tile {
    /// Local id inside the tileset, 0-based
    pub id: u32,
    /// Custom properties, in document order
    pub properties: Vec<Property>,
}

/// Custom property. `value` is never coerced, whatever `type` says.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Declared type tag ("bool", "int", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Literal value
    pub value: String,
}

/// Either kind of Tiled document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Document {
    /// A `.tmx` map
    Map(Map),
    /// A `.tsx` tileset
    Tileset(Tileset),
}
