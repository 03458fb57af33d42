#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// One `<object>` for [`voc_xml`]: name and `[xmin, ymin, xmax, ymax]`.
pub type ObjectDef<'a> = (&'a str, [f64; 4]);

/// Renders a minimal VOC annotation document.
pub fn voc_xml(filename: &str, width: u32, height: u32, objects: &[ObjectDef<'_>]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<annotation>\n");
    xml.push_str("  <folder>JPEGImages</folder>\n");
    xml.push_str(&format!("  <filename>{filename}</filename>\n"));
    xml.push_str(&format!(
        "  <size>\n    <width>{width}</width>\n    <height>{height}</height>\n    <depth>3</depth>\n  </size>\n"
    ));
    for (name, [xmin, ymin, xmax, ymax]) in objects {
        xml.push_str(&format!(
            "  <object>\n    <name>{name}</name>\n    <difficult>0</difficult>\n    <bndbox>\n      <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      <xmax>{xmax}</xmax>\n      <ymax>{ymax}</ymax>\n    </bndbox>\n  </object>\n"
        ));
    }
    xml.push_str("</annotation>\n");
    xml
}

pub fn write_voc(dir: &Path, xml_name: &str, xml: &str) {
    fs::create_dir_all(dir).expect("create xml dir");
    fs::write(dir.join(xml_name), xml).expect("write xml file");
}
