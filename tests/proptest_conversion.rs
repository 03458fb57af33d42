use std::collections::BTreeSet;
use std::path::PathBuf;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use voc2coco::conversion::{convert_parsed, ConvertOptions};
use voc2coco::ir::io_voc_xml::{VocAnnotation, VocObject};
use voc2coco::ir::BBoxXYXY;

const CATEGORY_NAMES: &[&str] = &[
    "car_red",
    "cat_big",
    "dog_small",
    "person_adult",
    "person_child",
];

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config
}

fn arb_positive_bbox() -> impl Strategy<Value = BBoxXYXY> {
    (0.0f64..1000.0, 0.0f64..1000.0, 0.5f64..500.0, 0.5f64..500.0)
        .prop_map(|(x, y, w, h)| BBoxXYXY::from_xyxy(x, y, x + w, y + h))
}

fn arb_object() -> impl Strategy<Value = VocObject> {
    (prop::sample::select(CATEGORY_NAMES), arb_positive_bbox()).prop_map(|(name, bbox)| {
        VocObject {
            name: name.to_string(),
            leading_text: Some(name.to_string()),
            bbox,
        }
    })
}

fn arb_files(max_files: usize, max_objects: usize) -> impl Strategy<Value = Vec<VocAnnotation>> {
    prop::collection::vec(prop::collection::vec(arb_object(), 0..=max_objects), 0..=max_files)
        .prop_map(|files| {
            files
                .into_iter()
                .enumerate()
                .map(|(idx, objects)| VocAnnotation {
                    source: PathBuf::from(format!("{idx}.xml")),
                    file_name: format!("{idx}.jpg"),
                    width: 1500,
                    height: 1500,
                    objects,
                })
                .collect()
        })
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn outline_vertices_lie_on_the_box_perimeter(bbox in arb_positive_bbox()) {
        let polygon = bbox.outline_polygon();
        let xs = [bbox.xmin, bbox.xmin + 0.5 * (bbox.xmax - bbox.xmin), bbox.xmax];
        let ys = [bbox.ymin, bbox.ymin + 0.5 * (bbox.ymax - bbox.ymin), bbox.ymax];

        for point in polygon.chunks(2) {
            let (x, y) = (point[0], point[1]);
            let on_vertical_edge = x == bbox.xmin || x == bbox.xmax;
            let on_horizontal_edge = y == bbox.ymin || y == bbox.ymax;
            prop_assert!(on_vertical_edge || on_horizontal_edge);
            prop_assert!(xs.iter().any(|v| (v - x).abs() < 1e-9));
            prop_assert!(ys.iter().any(|v| (v - y).abs() < 1e-9));
        }
        prop_assert_eq!(&polygon[0..2], &[bbox.xmin, bbox.ymin]);
        prop_assert_eq!(&polygon[8..10], &[bbox.xmax, bbox.ymax]);
    }

    #[test]
    fn ids_and_references_are_dense(files in arb_files(6, 5)) {
        let (document, summary) =
            convert_parsed(&files, ConvertOptions::default()).expect("convert");

        let image_ids: Vec<u64> = document.images.iter().map(|i| i.id.as_u64()).collect();
        prop_assert_eq!(image_ids, (0..files.len() as u64).collect::<Vec<_>>());

        let total_objects: usize = files.iter().map(|f| f.objects.len()).sum();
        let ann_ids: Vec<u64> = document.annotations.iter().map(|a| a.id.as_u64()).collect();
        prop_assert_eq!(ann_ids, (0..total_objects as u64).collect::<Vec<_>>());
        prop_assert_eq!(summary.annotations, total_objects);

        let category_ids: Vec<u64> = document.categories.iter().map(|c| c.id.as_u64()).collect();
        let expected_category_ids: Vec<u64> = (1..=document.categories.len() as u64).collect();
        prop_assert_eq!(category_ids.clone(), expected_category_ids);

        let category_id_set: BTreeSet<u64> = category_ids.into_iter().collect();
        for ann in &document.annotations {
            prop_assert!(ann.image_id.as_u64() < files.len() as u64);
            prop_assert!(category_id_set.contains(&ann.category_id.as_u64()));
            prop_assert!(ann.area > 0.0);
        }

        let names: Vec<&str> = document.categories.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        prop_assert_eq!(names, sorted);
    }

    #[test]
    fn discovery_is_independent_of_object_order(files in arb_files(4, 4)) {
        let mut reversed = files.clone();
        reversed.reverse();

        let (forward, _) = convert_parsed(&files, ConvertOptions::default()).expect("convert");
        let (backward, _) = convert_parsed(&reversed, ConvertOptions::default()).expect("convert");

        prop_assert_eq!(forward.categories, backward.categories);
    }
}
