//! voc2coco: convert Pascal VOC XML annotations into one COCO JSON file.
//!
//! Every `.xml` file in a directory describes one image. The converter
//! assigns each image and object a sequential id, maps category names to
//! ids, synthesizes an outline polygon for every box, and writes a single
//! COCO `instances` document.
//!
//! # Modules
//!
//! - [`ir`]: Records, ids, bounding boxes, the category registry, and the
//!   VOC reader / COCO writer
//! - [`conversion`]: The conversion run and its summary
//! - [`error`]: Error types for voc2coco operations

pub mod conversion;
pub mod error;
pub mod ir;

use std::path::PathBuf;

use clap::Parser;

pub use error::{ErrorKind, Voc2CocoError};

use conversion::{ConvertOptions, ImageIdPolicy};
use ir::io_coco_json::write_coco_json;
use ir::io_voc_xml::collect_xml_files;
use ir::CategoryRegistry;

/// Convert Pascal VOC annotation to COCO format.
#[derive(Parser)]
#[command(name = "voc2coco")]
#[command(version, about)]
struct Cli {
    /// Directory path to xml files. Only files directly inside it whose
    /// extension is `xml` in any letter case (`a.xml`, `b.XML`) are read.
    xml_dir: PathBuf,

    /// Output COCO format json file.
    json_file: PathBuf,

    /// Predefined category table (YAML or JSON): a list of names, or a
    /// mapping of name to zero-based id. Without it, categories are
    /// discovered from the input files and sorted by name.
    #[arg(long, env = "VOC2COCO_CATEGORIES", conflicts_with = "labels")]
    categories: Option<PathBuf>,

    /// Predefined category names, in id order (comma separated).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    labels: Vec<String>,

    /// Use the integer stem of each image file name as its image id.
    #[arg(long)]
    image_id_from_filename: bool,

    /// Write indented JSON.
    #[arg(long)]
    pretty: bool,
}

/// Run the voc2coco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Voc2CocoError> {
    let cli = Cli::parse();

    let categories = if let Some(path) = &cli.categories {
        Some(CategoryRegistry::load_table(path)?)
    } else if !cli.labels.is_empty() {
        Some(CategoryRegistry::from_names(cli.labels.clone())?)
    } else {
        None
    };

    let options = ConvertOptions {
        categories,
        image_ids: if cli.image_id_from_filename {
            ImageIdPolicy::FromFileName
        } else {
            ImageIdPolicy::Sequential
        },
    };

    let xml_files = collect_xml_files(&cli.xml_dir)?;
    println!("Number of xml files: {}", xml_files.len());

    let (document, summary) = conversion::convert_files(&xml_files, options)?;
    log::info!("conversion summary:\n{summary}");

    write_coco_json(&cli.json_file, &document, cli.pretty)?;
    println!("Success: {}", cli.json_file.display());

    Ok(())
}
