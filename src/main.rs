use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tiled_tmx_json::{load_document, to_json, to_json_pretty, ContentShape, Document, LoadOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shape {
    /// list of {x, y, tile} records
    Positional,
    /// rows of tile ids
    Matrix,
}

impl From<Shape> for ContentShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Positional => ContentShape::Positional,
            Shape::Matrix => ContentShape::Matrix,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert Tiled .tmx maps and .tsx tilesets to JSON", long_about = None)]
struct Args {
    /// .tmx or .tsx file to convert
    input: PathBuf,
    /// output JSON file (stdout if omitted)
    output: Option<PathBuf>,
    /// shape of each layer's decoded content
    #[arg(short, long, value_enum, default_value_t = Shape::Positional)]
    shape: Shape,
    /// write single-line JSON instead of indented
    #[arg(short, long, default_value_t = false)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;

    let options = LoadOptions {
        shape: args.shape.into(),
    };
    let document = load_document(&bytes, &options)
        .with_context(|| format!("Decoding {}", args.input.display()))?;

    match &document {
        Document::Map(map) => log::info!(
            "{}: {}x{} map, {} layer(s)",
            args.input.display(),
            map.width,
            map.height,
            map.layers.len()
        ),
        Document::Tileset(ts) => log::info!(
            "{}: tileset '{}', {} tile(s) with properties",
            args.input.display(),
            ts.name,
            ts.tiles.len()
        ),
    }

    let json = if args.compact {
        to_json(&document)?
    } else {
        to_json_pretty(&document)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Writing {}", path.display()))?;
            log::info!("JSON data successfully written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
