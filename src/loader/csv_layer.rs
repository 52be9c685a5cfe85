// src/loader/csv_layer.rs
use crate::error::{MapError, RowFault, RowParseError};
use crate::map::{DataTile, Layer, LayerContent, Map};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Shape written into `Data::content`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentShape {
    /// `{x, y, tile}` records
    #[default]
    Positional,
    /// Rows of tile IDs
    Matrix,
}

/// Split a layer's CSV text into rows of tile IDs.
///
/// Tiled ends every row but the last with a comma, so most rows carry one
/// empty trailing field. Empty fields are dropped per row; real values,
/// including `"0"`, are never dropped. Rows left without fields (the blank
/// line after `<data>`, indentation before `</data>`) are skipped and do not
/// count towards the row index.
///
/// Tiled never quotes layer data, so quoting is off and every line is one
/// row. Any field that is not a run of ASCII digits fails the whole call.
pub fn parse_rows(layer: &str, raw: &str) -> Result<Vec<Vec<String>>, RowParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let fail = |reason: RowFault| RowParseError {
            layer: layer.to_owned(),
            row: rows.len(),
            reason,
        };
        let record = record.map_err(|err| fail(err.into()))?;

        let mut row = Vec::with_capacity(record.len());
        for field in record.iter().filter(|field| !field.is_empty()) {
            if !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(fail(RowFault::InvalidTile(field.to_owned())));
            }
            row.push(field.to_owned());
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Row-major concatenation of a matrix.
pub fn flatten(rows: &[Vec<String>]) -> Vec<String> {
    rows.concat()
}

fn positional(rows: Vec<Vec<String>>) -> Vec<DataTile> {
    rows.into_iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.into_iter().enumerate().map(move |(x, tile)| DataTile {
                tile,
                x: x as u32,
                y: y as u32,
            })
        })
        .collect()
}

/// Fill `layer.data.content` from `layer.data.raw`.
pub fn materialize_layer(layer: &mut Layer, shape: ContentShape) -> Result<(), MapError> {
    if layer.data.raw.trim().is_empty() {
        layer.data.content = match shape {
            ContentShape::Positional => LayerContent::Tiles(Vec::new()),
            ContentShape::Matrix => LayerContent::Matrix(Vec::new()),
        };
        return Ok(());
    }

    if layer.data.encoding != "csv" {
        return Err(MapError::UnsupportedEncoding {
            layer: layer.name.clone(),
            encoding: layer.data.encoding.clone(),
        });
    }

    let rows = parse_rows(&layer.name, &layer.data.raw)?;

    if layer.height != 0 && rows.len() != layer.height as usize {
        warn!(
            "layer '{}': {} row(s) in data, height is {}",
            layer.name,
            rows.len(),
            layer.height
        );
    }
    if layer.width != 0 {
        for (y, row) in rows.iter().enumerate() {
            if row.len() != layer.width as usize {
                warn!(
                    "layer '{}': row {} has {} tile(s), width is {}",
                    layer.name,
                    y,
                    row.len(),
                    layer.width
                );
            }
        }
    }

    layer.data.content = match shape {
        ContentShape::Positional => LayerContent::Tiles(positional(rows)),
        ContentShape::Matrix => LayerContent::Matrix(rows),
    };
    debug!(
        "materialized layer '{}' ({} cell(s))",
        layer.name,
        layer.data.content.len()
    );
    Ok(())
}

/// Materialize every layer of `map` in place. The first failing layer aborts the whole map.
pub fn materialize_layers(map: &mut Map, shape: ContentShape) -> Result<(), MapError> {
    for layer in &mut map.layers {
        materialize_layer(layer, shape)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Data;

    const RAW: &str =
        "\n0,0,0,0,0,\n62,0,0,0,0,\n0,0,62,0,0,\n0,62,0,62,0,\n0,0,0,0,0,\n0,3,0,0,54\n";

    fn layer(raw: &str) -> Layer {
        Layer {
            id: 1,
            name: "Ground".into(),
            width: 5,
            height: 6,
            data: Data {
                encoding: "csv".into(),
                raw: raw.into(),
                ..Data::default()
            },
        }
    }

    fn strings(row: &[&str]) -> Vec<String> {
        row.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matrix_keeps_last_row_at_full_width() {
        let mut l = layer(RAW);
        materialize_layer(&mut l, ContentShape::Matrix).expect("materialize");

        let LayerContent::Matrix(rows) = &l.data.content else {
            panic!("expected matrix content");
        };
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.len() == 5));
        assert_eq!(rows[1], strings(&["62", "0", "0", "0", "0"]));
        assert_eq!(rows[5], strings(&["0", "3", "0", "0", "54"]));
    }

    #[test]
    fn positional_keeps_zero_tiles() {
        let mut l = layer(RAW);
        materialize_layer(&mut l, ContentShape::Positional).expect("materialize");

        let LayerContent::Tiles(tiles) = &l.data.content else {
            panic!("expected positional content");
        };
        assert_eq!(tiles.len(), 30);
        assert_eq!(
            tiles[0],
            DataTile {
                tile: "0".into(),
                x: 0,
                y: 0
            }
        );
        assert_eq!(tiles.iter().filter(|t| t.tile == "0").count(), 24);

        let last = tiles.last().expect("tiles");
        assert_eq!((last.tile.as_str(), last.x, last.y), ("54", 4, 5));
        let gid_62: Vec<_> = tiles
            .iter()
            .filter(|t| t.tile == "62")
            .map(|t| (t.x, t.y))
            .collect();
        assert_eq!(gid_62, [(0, 1), (2, 2), (1, 3), (3, 3)]);
    }

    #[test]
    fn ignores_indentation_before_closing_tag() {
        let mut l = layer("\n1,2,\n3,4\n  ");
        l.width = 2;
        l.height = 2;
        materialize_layer(&mut l, ContentShape::Matrix).expect("materialize");
        assert_eq!(
            l.data.content,
            LayerContent::Matrix(vec![strings(&["1", "2"]), strings(&["3", "4"])])
        );
    }

    #[test]
    fn tolerates_ragged_rows() {
        let rows = parse_rows("ragged", "\n1,2,3,\n4,\n5,6\n").expect("parse");
        assert_eq!(
            rows,
            vec![strings(&["1", "2", "3"]), strings(&["4"]), strings(&["5", "6"])]
        );
    }

    #[test]
    fn empty_data_materializes_to_empty_content() {
        let mut l = layer("\n   \n");
        l.data.encoding = String::new();
        materialize_layer(&mut l, ContentShape::Positional).expect("materialize");
        assert!(l.data.content.is_empty());
    }

    #[test]
    fn rejects_non_csv_encoding() {
        let mut l = layer("\n   H4sIAAAAAAAAA2NgYGBgBGIQAAAAAP//\n");
        l.data.encoding = "base64".into();
        let err = materialize_layer(&mut l, ContentShape::Positional)
            .err()
            .expect("expected encoding error");
        assert!(matches!(
            err,
            MapError::UnsupportedEncoding { ref layer, ref encoding }
                if layer == "Ground" && encoding == "base64"
        ));
    }

    #[test]
    fn materialize_layers_fills_every_layer() {
        let mut map = Map {
            layers: vec![layer(RAW), layer("\n7,8\n")],
            ..Map::default()
        };
        materialize_layers(&mut map, ContentShape::Positional).expect("materialize");
        assert_eq!(map.layers[0].data.content.len(), 30);
        assert_eq!(map.layers[1].data.content.len(), 2);
    }

    #[test]
    fn flatten_then_chunk_reproduces_matrix() {
        let rows = parse_rows("Ground", RAW).expect("parse");
        let flat = flatten(&rows);
        assert_eq!(flat.len(), 30);
        assert_eq!(flat[5], "62");
        assert_eq!(flat[29], "54");

        let rechunked: Vec<Vec<String>> = flat.chunks(5).map(<[String]>::to_vec).collect();
        assert_eq!(rechunked, rows);
    }

    #[test]
    fn positional_to_matrix_matches_matrix_shape() {
        let mut a = layer(RAW);
        let mut b = layer(RAW);
        materialize_layer(&mut a, ContentShape::Positional).expect("materialize");
        materialize_layer(&mut b, ContentShape::Matrix).expect("materialize");
        assert_eq!(a.data.content.to_matrix(), b.data.content.to_matrix());
    }

    #[test]
    fn stray_quote_fails_instead_of_merging_rows() {
        let err = parse_rows("Ground", "\n1,\"2,\n3,4\n")
            .err()
            .expect("expected row error");
        assert_eq!(err.layer, "Ground");
        assert_eq!(err.row, 0);
        assert!(matches!(err.reason, RowFault::InvalidTile(ref field) if field == "\"2"));
    }

    #[test]
    fn non_numeric_tile_aborts_whole_map() {
        let mut map = Map {
            layers: vec![layer(RAW), layer("\n1,2,\n3,x\n")],
            ..Map::default()
        };
        let err = materialize_layers(&mut map, ContentShape::Matrix)
            .err()
            .expect("expected row error");
        match err {
            MapError::RowParse(e) => {
                assert_eq!(e.row, 1);
                assert!(matches!(e.reason, RowFault::InvalidTile(ref field) if field == "x"));
            }
            other => panic!("expected RowParse, got {:?}", other),
        }
    }

    #[test]
    fn size_mismatch_is_tolerated() {
        let mut l = layer("\n1,2,3,\n4,5\n");
        materialize_layer(&mut l, ContentShape::Matrix).expect("materialize");
        assert_eq!(
            l.data.content,
            LayerContent::Matrix(vec![strings(&["1", "2", "3"]), strings(&["4", "5"])])
        );
    }
}
