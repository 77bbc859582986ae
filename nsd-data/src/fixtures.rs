//! Synthetic catalog shared by the unit tests.

use geo::{point, polygon};
use nsd_catalog::{Feature, MemoryCatalog, Properties};
use serde_json::{json, Value};

use crate::dataset::{DatasetBundle, Selector, DEFAULT_NAMESPACE, PIPESTEM_HUC8};
use crate::layer::NED_10M;
use crate::watershed::WATERSHED_COLLECTION;

pub const GENERIC_HUC8: &str = "07080201";
pub const OVERLAP_FIRST_HUC8: &str = "03040101";
pub const OVERLAP_SECOND_HUC8: &str = "03040102";
/// Watershed present in the boundary dataset but with no depressions.
pub const EMPTY_HUC8: &str = "07080202";

fn properties(pairs: &[(&str, Value)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn square(x0: f64, y0: f64, size: f64, props: Properties) -> Feature {
    let geometry = polygon![
        (x: x0, y: y0),
        (x: x0 + size, y: y0),
        (x: x0 + size, y: y0 + size),
        (x: x0, y: y0 + size),
        (x: x0, y: y0),
    ];
    Feature::new(Some(geometry.into()), props)
}

pub fn watershed(huc8: &str, area: Option<f64>, x0: f64, y0: f64, size: f64) -> Feature {
    let mut props = properties(&[("huc8", json!(huc8))]);
    if let Some(area) = area {
        props.insert("areasqkm".to_string(), json!(area));
    }
    square(x0, y0, size, props)
}

pub fn depression(area_m2: f64, volume_m3: f64) -> Feature {
    square(
        -93.5,
        42.0,
        0.01,
        properties(&[("area", json!(area_m2)), ("volume", json!(volume_m3))]),
    )
}

pub fn wetland(kind: &str) -> Feature {
    square(-93.2, 42.2, 0.01, properties(&[("WETLAND_TY", json!(kind))]))
}

fn outlet() -> Feature {
    Feature::new(Some(point!(x: -99.1, y: 47.1).into()), Properties::new())
}

pub fn watersheds() -> Vec<Feature> {
    let mut generic = watershed(GENERIC_HUC8, Some(4545.9), -94.0, 41.0, 2.0);
    generic
        .properties
        .insert("name".to_string(), json!("Upper Cedar"));
    let mut pipestem = watershed(PIPESTEM_HUC8, Some(2773.18), -99.5, 46.5, 1.0);
    pipestem
        .properties
        .insert("name".to_string(), json!("Pipestem"));
    vec![
        generic,
        pipestem,
        watershed(EMPTY_HUC8, Some(2100.0), -92.0, 41.0, 1.0),
        watershed(OVERLAP_FIRST_HUC8, Some(100.0), -81.0, 35.0, 1.0),
        watershed(OVERLAP_SECOND_HUC8, Some(200.0), -80.8, 35.0, 2.0),
    ]
}

/// Catalog with every dataset of the generic, enhanced and empty watersheds.
pub fn catalog() -> MemoryCatalog {
    let selector = Selector::default();
    let mut catalog = MemoryCatalog::new()
        .with_table(WATERSHED_COLLECTION, watersheds())
        .with_image(NED_10M)
        .with_table(
            format!("{}/Pipestem/Pipestem_HUC8", DEFAULT_NAMESPACE),
            vec![watershed(PIPESTEM_HUC8, None, -99.5, 46.5, 1.0)],
        );

    let generic = selector.select(GENERIC_HUC8);
    catalog = catalog
        .with_table(
            generic.generic().depressions.clone(),
            vec![
                depression(5_000_000.0, 2_000_000_000.0),
                depression(250_000.0, 1_000_000.0),
                depression(1_500.0, 900.0),
            ],
        )
        .with_table(
            generic.generic().wetlands.clone(),
            vec![
                wetland("Freshwater Emergent Wetland"),
                wetland("Freshwater Pond"),
                wetland("Freshwater Emergent Wetland"),
                wetland("Palustrine Mystery"),
            ],
        );

    let empty = selector.select(EMPTY_HUC8);
    catalog = catalog
        .with_table(empty.generic().depressions.clone(), Vec::new())
        .with_table(empty.generic().wetlands.clone(), vec![wetland("Lake")]);

    let pipestem = selector.select(PIPESTEM_HUC8);
    catalog = catalog
        .with_table(
            pipestem.generic().depressions.clone(),
            vec![depression(12_000.0, 3_000.0)],
        )
        .with_table(pipestem.generic().wetlands.clone(), vec![wetland("Riverine")]);
    if let DatasetBundle::Enhanced { enhanced, .. } = pipestem {
        catalog = catalog
            .with_image(enhanced.lidar)
            .with_image(enhanced.intensity)
            .with_table(enhanced.flow_paths, Vec::new())
            .with_table(enhanced.flow_from, vec![outlet()])
            .with_table(enhanced.flow_to, vec![outlet()])
            .with_table(enhanced.catchments, Vec::new())
            .with_table(enhanced.depressions_lidar, vec![depression(40.0, 8.0)])
            .with_table(enhanced.nwi, vec![wetland("Freshwater Pond")])
            .with_table(enhanced.huc10, Vec::new());
    }
    catalog
}
