//! VOC to COCO conversion.
//!
//! A run reads every XML file once, builds the category registry (from a
//! predefined table or a discovery scan over the parsed files), then walks
//! the files in order and turns each into one image record plus one
//! annotation record per object. Image and annotation ids are dense
//! counters owned by the [`Converter`].

pub mod report;

pub use report::ConversionSummary;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::Voc2CocoError;
use crate::ir::io_coco_json::CocoDocument;
use crate::ir::io_voc_xml::{self, VocAnnotation};
use crate::ir::{
    Annotation, AnnotationId, CategoryId, CategoryRegistry, IdCounter, Image, ImageId,
};

/// How image ids are assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageIdPolicy {
    /// Zero-based counter in file order.
    #[default]
    Sequential,
    /// Integer value of the image file name's stem, e.g. `000123.jpg` → 123.
    FromFileName,
}

/// Options for a conversion run.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Predefined category table. `None` runs the discovery scan.
    pub categories: Option<CategoryRegistry>,
    pub image_ids: ImageIdPolicy,
}

/// Accumulates records while files are extracted one at a time.
#[derive(Debug)]
pub struct Converter {
    registry: CategoryRegistry,
    policy: ImageIdPolicy,
    image_ids: IdCounter,
    annotation_ids: IdCounter,
    used_image_ids: BTreeSet<ImageId>,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
    initial_categories: usize,
}

impl Converter {
    pub fn new(registry: CategoryRegistry, policy: ImageIdPolicy) -> Self {
        let initial_categories = registry.len();
        Self {
            registry,
            policy,
            image_ids: IdCounter::new(),
            annotation_ids: IdCounter::new(),
            used_image_ids: BTreeSet::new(),
            images: Vec::new(),
            annotations: Vec::new(),
            initial_categories,
        }
    }

    /// Converts one parsed file, appending its image record and annotation
    /// records. Returns the image id and the number of annotations added.
    ///
    /// # Errors
    /// Fails on a box with `xmax <= xmin` or `ymax <= ymin`, on a file name
    /// that is not an integer under [`ImageIdPolicy::FromFileName`], or on
    /// a duplicated image id.
    pub fn extract(&mut self, parsed: &VocAnnotation) -> Result<(ImageId, usize), Voc2CocoError> {
        let image_id = self.next_image_id(parsed)?;

        let mut added = Vec::with_capacity(parsed.objects.len());
        for (object_index, object) in parsed.objects.iter().enumerate() {
            let registry_id = self.registry.resolve(&object.name);

            let bbox = object.bbox;
            if !bbox.is_positive() {
                return Err(Voc2CocoError::InvalidBBox {
                    path: parsed.source.clone(),
                    object_index,
                    xmin: bbox.xmin,
                    ymin: bbox.ymin,
                    xmax: bbox.xmax,
                    ymax: bbox.ymax,
                });
            }

            added.push(Annotation::from_bbox(
                AnnotationId::new(self.annotation_ids.next_id()),
                image_id,
                CategoryId::from_registry(registry_id),
                &bbox,
            ));
        }

        let count = added.len();
        self.images.push(Image::new(
            image_id,
            parsed.file_name.clone(),
            parsed.width,
            parsed.height,
        ));
        self.annotations.extend(added);

        log::debug!(
            "{}: image {} '{}' with {} object(s)",
            parsed.source.display(),
            image_id,
            parsed.file_name,
            count
        );

        Ok((image_id, count))
    }

    /// Assembles the COCO document from everything extracted so far.
    pub fn finish(
        self,
        xml_files: usize,
    ) -> Result<(CocoDocument, ConversionSummary), Voc2CocoError> {
        let categories_added = self
            .registry
            .iter()
            .skip(self.initial_categories)
            .map(|(name, _)| name.to_string())
            .collect();

        let summary = ConversionSummary {
            xml_files,
            images: self.images.len(),
            annotations: self.annotations.len(),
            categories: self.registry.len(),
            categories_added,
            predefined_categories: self.registry.is_predefined(),
        };

        let document = CocoDocument::assemble(self.images, self.annotations, &self.registry)?;
        Ok((document, summary))
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    fn next_image_id(&mut self, parsed: &VocAnnotation) -> Result<ImageId, Voc2CocoError> {
        let image_id = match self.policy {
            ImageIdPolicy::Sequential => ImageId::new(self.image_ids.next_id()),
            ImageIdPolicy::FromFileName => image_id_from_file_name(parsed)?,
        };

        if !self.used_image_ids.insert(image_id) {
            return Err(Voc2CocoError::VocXmlParse {
                path: parsed.source.clone(),
                message: format!(
                    "image id {image_id} derived from '{}' is already used by another file",
                    parsed.file_name
                ),
            });
        }

        Ok(image_id)
    }
}

/// Builds the category registry by scanning parsed files.
///
/// Each object contributes the text of its first child element.
pub fn discover_categories(parsed: &[VocAnnotation]) -> CategoryRegistry {
    CategoryRegistry::discover(
        parsed
            .iter()
            .flat_map(|file| file.objects.iter())
            .filter_map(|object| object.leading_text.as_deref()),
    )
}

/// Converts the given XML files, in the given order.
pub fn convert_files(
    xml_files: &[PathBuf],
    options: ConvertOptions,
) -> Result<(CocoDocument, ConversionSummary), Voc2CocoError> {
    let parsed = xml_files
        .iter()
        .map(|path| io_voc_xml::parse_voc_xml(path))
        .collect::<Result<Vec<_>, _>>()?;

    convert_parsed(&parsed, options)
}

/// Converts every top-level `.xml` file in `dir`.
pub fn convert_dir(
    dir: &Path,
    options: ConvertOptions,
) -> Result<(CocoDocument, ConversionSummary), Voc2CocoError> {
    let xml_files = io_voc_xml::collect_xml_files(dir)?;
    convert_files(&xml_files, options)
}

/// Converts already-parsed files.
pub fn convert_parsed(
    parsed: &[VocAnnotation],
    options: ConvertOptions,
) -> Result<(CocoDocument, ConversionSummary), Voc2CocoError> {
    let registry = match options.categories {
        Some(registry) => registry,
        None => {
            let registry = discover_categories(parsed);
            log::info!("discovered {} categories", registry.len());
            registry
        }
    };

    let mut converter = Converter::new(registry, options.image_ids);
    for file in parsed {
        converter.extract(file)?;
    }

    let (document, summary) = converter.finish(parsed.len())?;
    log::info!(
        "converted {} images, {} annotations, {} categories",
        summary.images,
        summary.annotations,
        summary.categories
    );
    Ok((document, summary))
}

fn image_id_from_file_name(parsed: &VocAnnotation) -> Result<ImageId, Voc2CocoError> {
    let normalized = parsed.file_name.replace('\\', "/");
    let stem = Path::new(&normalized)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    stem.parse::<u64>()
        .map(ImageId::new)
        .map_err(|_| Voc2CocoError::InvalidFilenameId {
            path: parsed.source.clone(),
            file_name: parsed.file_name.clone(),
        })
}
