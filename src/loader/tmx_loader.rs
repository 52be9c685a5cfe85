// src/loader/tmx_loader.rs
use crate::error::{DecodeError, MapError};
use crate::map::*;
use log::{debug, warn};
use roxmltree::Node;

fn parse_xml(bytes: &[u8]) -> Result<roxmltree::Document<'_>, MapError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(roxmltree::Document::parse(text)?)
}

fn attr_string(node: &Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_owned()
}

/// Missing or empty attributes read as 0.
fn attr_u32(node: &Node, name: &str) -> Result<u32, DecodeError> {
    let text = match node.attribute(name) {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Ok(0),
    };
    text.trim()
        .parse()
        .map_err(|source| DecodeError::InvalidAttribute {
            element: node.tag_name().name().to_owned(),
            attribute: name.to_owned(),
            value: text.to_owned(),
            source,
        })
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(name))
}

fn first_child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

fn tileset_ref_from_xml(node: Node) -> Result<TilesetReference, DecodeError> {
    Ok(TilesetReference {
        first_gid: attr_u32(&node, "firstgid")?,
        source: attr_string(&node, "source"),
    })
}

fn data_from_xml(node: Node) -> Data {
    // All text children, whitespace included; the CSV stage depends on it.
    let raw = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>();

    Data {
        encoding: attr_string(&node, "encoding"),
        content: LayerContent::default(),
        raw,
    }
}

fn layer_from_xml(node: Node) -> Result<Layer, DecodeError> {
    Ok(Layer {
        id: attr_u32(&node, "id")?,
        name: attr_string(&node, "name"),
        width: attr_u32(&node, "width")?,
        height: attr_u32(&node, "height")?,
        data: first_child(node, "data").map(data_from_xml).unwrap_or_default(),
    })
}

fn map_from_xml(node: Node) -> Result<Map, DecodeError> {
    Ok(Map {
        version: attr_string(&node, "version"),
        tiled_version: attr_string(&node, "tiledversion"),
        orientation: attr_string(&node, "orientation"),
        render_order: attr_string(&node, "renderorder"),
        width: attr_u32(&node, "width")?,
        height: attr_u32(&node, "height")?,
        tile_width: attr_u32(&node, "tilewidth")?,
        tile_height: attr_u32(&node, "tileheight")?,
        infinite: attr_u32(&node, "infinite")?,
        next_layer_id: attr_u32(&node, "nextlayerid")?,
        next_object_id: attr_u32(&node, "nextobjectid")?,
        tilesets: children(node, "tileset")
            .map(tileset_ref_from_xml)
            .collect::<Result<Vec<_>, _>>()?,
        layers: children(node, "layer")
            .map(layer_from_xml)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn property_from_xml(node: Node) -> Property {
    Property {
        name: attr_string(&node, "name"),
        kind: attr_string(&node, "type"),
        value: attr_string(&node, "value"),
    }
}

fn tile_from_xml(node: Node) -> Result<Tile, DecodeError> {
    Ok(Tile {
        id: attr_u32(&node, "id")?,
        // <properties> only groups; flatten every <property> under it
        properties: children(node, "properties")
            .flat_map(|group| children(group, "property"))
            .map(property_from_xml)
            .collect(),
    })
}

fn image_from_xml(node: Node) -> Result<Image, DecodeError> {
    Ok(Image {
        source: attr_string(&node, "source"),
        width: attr_u32(&node, "width")?,
        height: attr_u32(&node, "height")?,
    })
}

fn tileset_from_xml(node: Node) -> Result<Tileset, DecodeError> {
    Ok(Tileset {
        version: attr_string(&node, "version"),
        tiled_version: attr_string(&node, "tiledversion"),
        name: attr_string(&node, "name"),
        tile_width: attr_u32(&node, "tilewidth")?,
        tile_height: attr_u32(&node, "tileheight")?,
        tile_count: attr_u32(&node, "tilecount")?,
        columns: attr_u32(&node, "columns")?,
        image: first_child(node, "image")
            .map(image_from_xml)
            .transpose()?
            .unwrap_or_default(),
        tiles: children(node, "tile")
            .map(tile_from_xml)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Decode a `.tmx` document. Layer contents are left empty; only `Data::raw` is filled.
pub fn decode_map(bytes: &[u8]) -> Result<Map, MapError> {
    let doc = parse_xml(bytes)?;
    let root = doc.root_element();
    if !root.has_tag_name("map") {
        warn!(
            "decoding <{}> as a map, attributes may be missing",
            root.tag_name().name()
        );
    }

    let map = map_from_xml(root)?;
    debug!(
        "decoded {}x{} map with {} tileset(s) and {} layer(s)",
        map.width,
        map.height,
        map.tilesets.len(),
        map.layers.len()
    );
    Ok(map)
}

/// Decode a `.tsx` document.
pub fn decode_tileset(bytes: &[u8]) -> Result<Tileset, MapError> {
    let doc = parse_xml(bytes)?;
    let root = doc.root_element();
    if !root.has_tag_name("tileset") {
        warn!(
            "decoding <{}> as a tileset, attributes may be missing",
            root.tag_name().name()
        );
    }

    let tileset = tileset_from_xml(root)?;
    debug!(
        "decoded tileset '{}' with {} tile(s)",
        tileset.name,
        tileset.tiles.len()
    );
    Ok(tileset)
}

/// Decode either document kind, picked by the root element.
pub fn decode_document(bytes: &[u8]) -> Result<Document, MapError> {
    let doc = parse_xml(bytes)?;
    let root = doc.root_element();
    match root.tag_name().name() {
        "map" => Ok(Document::Map(map_from_xml(root)?)),
        "tileset" => Ok(Document::Tileset(tileset_from_xml(root)?)),
        other => Err(DecodeError::UnexpectedRoot {
            found: other.to_owned(),
        }
        .into()),
    }
}
