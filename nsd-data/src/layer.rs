//! Layer composition: what to draw, how, and in which order.
//!
//! Layers are returned bottom to top; later entries draw over earlier ones.

use nsd_catalog::{CollectionExpr, Handle, ImageExpr};
use serde::Serialize;

use crate::dataset::{DatasetBundle, EnhancedDatasets, GenericDatasets};
use crate::style::{StyleRecord, WetlandType, WETLAND_PROPERTY};
use crate::watershed::Watershed;

/// National Elevation Dataset, 10 m.
pub const NED_10M: &str = "USGS/3DEP/10m";

/// Blue, semi-transparent depression fill.
pub const DEPRESSION_FILL: &str = "0000ff50";

/// Zoom used when centering on a whole HUC8.
pub const WATERSHED_ZOOM: u8 = 9;

/// Where the map opens before anything is selected.
pub const OVERVIEW_VIEWPORT: Viewport = Viewport {
    lon: -100.0,
    lat: 40.0,
    zoom: 4,
};

/// Close-up of the LiDAR survey area in Pipestem Creek.
pub const PIPESTEM_VIEWPORT: Viewport = Viewport {
    lon: -99.09526,
    lat: 47.099772,
    zoom: 15,
};

/// Visualization parameters handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisParams {
    /// Renderer defaults
    Default,
    /// One style for every feature
    Style(StyleRecord),
    /// Per-feature style keyed by a categorical attribute
    ByCategory {
        property: String,
        styles: Vec<(String, StyleRecord)>,
        fallback: StyleRecord,
    },
    /// Stretch a single band between `min` and `max`
    Raster {
        min: f64,
        max: f64,
        palette: Option<String>,
    },
    /// Palette for a painted single-band image
    Palette { palette: String },
    /// Marker color for point layers
    Color { color: String },
}

impl VisParams {
    fn raster(min: f64, max: f64) -> Self {
        VisParams::Raster {
            min,
            max,
            palette: None,
        }
    }

    fn palette(palette: &str) -> Self {
        VisParams::Palette {
            palette: palette.to_string(),
        }
    }

    fn color(color: &str) -> Self {
        VisParams::Color {
            color: color.to_string(),
        }
    }

    /// NWI wetland styling; unknown classes use the `Other` style.
    pub fn wetlands() -> Self {
        VisParams::ByCategory {
            property: WETLAND_PROPERTY.to_string(),
            styles: WetlandType::ALL
                .iter()
                .map(|t| (t.name().to_string(), t.style()))
                .collect(),
            fallback: WetlandType::Other.style(),
        }
    }
}

/// One renderable layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub name: String,
    pub data: Handle,
    pub vis: VisParams,
    /// Whether the layer starts switched on.
    pub shown: bool,
}

impl LayerSpec {
    pub fn new(name: &str, data: impl Into<Handle>, vis: VisParams, shown: bool) -> Self {
        LayerSpec {
            name: name.to_string(),
            data: data.into(),
            vis,
            shown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub lon: f64,
    pub lat: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub layers: Vec<LayerSpec>,
    pub viewport: Viewport,
}

impl Composition {
    pub fn layer(&self, name: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }
}

fn enhanced_layers(enhanced: &EnhancedDatasets) -> Vec<LayerSpec> {
    let depressions = StyleRecord::fill(DEPRESSION_FILL);
    vec![
        LayerSpec::new(
            "LiDAR Intensity",
            ImageExpr::asset(&enhanced.intensity),
            VisParams::raster(0.0, 255.0),
            false,
        ),
        LayerSpec::new(
            "LiDAR DEM",
            ImageExpr::asset(&enhanced.lidar),
            VisParams::raster(400.0, 700.0),
            false,
        ),
        LayerSpec::new(
            "DEM Hillshade",
            ImageExpr::asset(&enhanced.lidar).hillshade(),
            VisParams::Default,
            true,
        ),
        LayerSpec::new(
            "Catchments",
            ImageExpr::paint(CollectionExpr::asset(&enhanced.catchments), 2),
            VisParams::palette("pink"),
            false,
        ),
        LayerSpec::new(
            "Pipestem HUC-10",
            ImageExpr::paint(CollectionExpr::asset(&enhanced.huc10), 2),
            VisParams::Default,
            false,
        ),
        LayerSpec::new(
            "Depressions (1-m)",
            CollectionExpr::asset(&enhanced.depressions_lidar),
            VisParams::Style(depressions),
            true,
        ),
        LayerSpec::new(
            "Flow path",
            ImageExpr::paint(CollectionExpr::asset(&enhanced.flow_paths), 2),
            VisParams::palette("blue"),
            true,
        ),
        LayerSpec::new(
            "Water outlet",
            CollectionExpr::asset(&enhanced.flow_from),
            VisParams::color("red"),
            true,
        ),
        LayerSpec::new(
            "Water inlet",
            CollectionExpr::asset(&enhanced.flow_to),
            VisParams::color("green"),
            true,
        ),
    ]
}

fn generic_layers(generic: &GenericDatasets, selected: &CollectionExpr) -> Vec<LayerSpec> {
    vec![
        LayerSpec::new(
            "Selected Watershed",
            selected.clone(),
            VisParams::Style(StyleRecord::outline("ff0000ff", 2.0)),
            true,
        ),
        LayerSpec::new(
            "Depressions (10-m)",
            CollectionExpr::asset(&generic.depressions),
            VisParams::Style(StyleRecord::fill(DEPRESSION_FILL)),
            true,
        ),
        LayerSpec::new(
            "NWI Wetlands",
            CollectionExpr::asset(&generic.wetlands),
            VisParams::wetlands(),
            true,
        ),
    ]
}

/// Layers for a resolved watershed.
///
/// Order: clipped NED hillshade, then the enhanced layers if the bundle has
/// them, then the watershed outline, depressions and wetlands on top.
pub fn compose(bundle: &DatasetBundle, watershed: &Watershed) -> Composition {
    let selected = &watershed.selection;
    let mut layers = vec![LayerSpec::new(
        "Hillshade",
        ImageExpr::asset(NED_10M)
            .hillshade()
            .clip_to_collection(selected.clone()),
        VisParams::Default,
        true,
    )];
    let viewport = match bundle {
        DatasetBundle::Enhanced { enhanced, .. } => {
            layers.extend(enhanced_layers(enhanced));
            PIPESTEM_VIEWPORT
        }
        DatasetBundle::Generic(_) => {
            let (lon, lat) = watershed.bbox.center();
            Viewport {
                lon,
                lat,
                zoom: WATERSHED_ZOOM,
            }
        }
    };
    layers.extend(generic_layers(bundle.generic(), selected));
    Composition { layers, viewport }
}

/// Layers of the selection map shown before a watershed is picked.
pub fn compose_overview(namespace: &str, watersheds: &CollectionExpr) -> Composition {
    let layers = vec![
        LayerSpec::new(
            "NED (10-m)",
            ImageExpr::asset(NED_10M),
            VisParams::Raster {
                min: 0.0,
                max: 4000.0,
                palette: Some("terrain".to_string()),
            },
            true,
        ),
        LayerSpec::new(
            "Hillshade",
            ImageExpr::asset(NED_10M).hillshade(),
            VisParams::Default,
            true,
        ),
        LayerSpec::new(
            "NHD-HUC8",
            watersheds.clone(),
            VisParams::Style(StyleRecord::outline("00000088", 1.0)),
            true,
        ),
        LayerSpec::new(
            "Pipestem HUC8",
            CollectionExpr::asset(format!("{}/Pipestem/Pipestem_HUC8", namespace)),
            VisParams::Style(StyleRecord::outline("ffff00ff", 2.0)),
            true,
        ),
    ];
    Composition {
        layers,
        viewport: OVERVIEW_VIEWPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Selector, DEFAULT_NAMESPACE, PIPESTEM_HUC8};
    use crate::fixtures::{catalog, GENERIC_HUC8};
    use crate::location::Location;
    use crate::watershed::{reference_watersheds, resolve, CONUS, WATERSHED_COLLECTION};
    use nsd_catalog::{Realizer, DEFAULT_REALIZE_TIMEOUT};

    async fn watershed_at(lon: f64, lat: f64) -> Watershed {
        let catalog = catalog();
        let realizer = Realizer::new(&catalog, DEFAULT_REALIZE_TIMEOUT);
        let watersheds = reference_watersheds(WATERSHED_COLLECTION, CONUS);
        resolve(&realizer, &watersheds, Location::new(lon, lat).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_generic_composition() {
        let watershed = watershed_at(-93.0, 42.0).await;
        let bundle = Selector::default().select(&watershed.huc8);
        let composition = compose(&bundle, &watershed);
        assert_eq!(
            composition.names(),
            vec!["Hillshade", "Selected Watershed", "Depressions (10-m)", "NWI Wetlands"]
        );
        assert!(composition.layers.iter().all(|l| l.shown));
        assert_eq!(
            composition.viewport,
            Viewport {
                lon: -93.0,
                lat: 42.0,
                zoom: WATERSHED_ZOOM
            }
        );

        let depressions = composition.layer("Depressions (10-m)").unwrap();
        assert_eq!(
            depressions.data,
            Handle::Collection(CollectionExpr::asset(format!(
                "users/giswqs/depressions/{}",
                GENERIC_HUC8
            )))
        );
        assert_eq!(
            depressions.vis,
            VisParams::Style(StyleRecord::new(1.0, "00000000", "0000ff50"))
        );
        let boundary = composition.layer("Selected Watershed").unwrap();
        assert_eq!(boundary.data, Handle::Collection(watershed.selection.clone()));
    }

    #[tokio::test]
    async fn test_enhanced_composition() {
        let watershed = watershed_at(-99.0, 47.0).await;
        assert_eq!(watershed.huc8, PIPESTEM_HUC8);
        let bundle = Selector::default().select(&watershed.huc8);
        let composition = compose(&bundle, &watershed);
        assert_eq!(
            composition.names(),
            vec![
                "Hillshade",
                "LiDAR Intensity",
                "LiDAR DEM",
                "DEM Hillshade",
                "Catchments",
                "Pipestem HUC-10",
                "Depressions (1-m)",
                "Flow path",
                "Water outlet",
                "Water inlet",
                "Selected Watershed",
                "Depressions (10-m)",
                "NWI Wetlands",
            ]
        );
        let hidden: Vec<&str> = composition
            .layers
            .iter()
            .filter(|l| !l.shown)
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(
            hidden,
            vec!["LiDAR Intensity", "LiDAR DEM", "Catchments", "Pipestem HUC-10"]
        );
        assert_eq!(composition.viewport, PIPESTEM_VIEWPORT);
    }

    #[tokio::test]
    async fn test_wetlands_draw_last() {
        for (lon, lat) in [(-93.0, 42.0), (-99.0, 47.0)] {
            let watershed = watershed_at(lon, lat).await;
            let composition = compose(&Selector::default().select(&watershed.huc8), &watershed);
            let last = composition.layers.last().unwrap();
            assert_eq!(last.name, "NWI Wetlands");
            assert_eq!(last.vis, VisParams::wetlands());
        }
    }

    #[test]
    fn test_wetland_vis_table() {
        let VisParams::ByCategory {
            property,
            styles,
            fallback,
        } = VisParams::wetlands()
        else {
            panic!("wetland styling is categorical");
        };
        assert_eq!(property, "WETLAND_TY");
        assert_eq!(styles.len(), 8);
        assert_eq!(styles[0].0, "Freshwater Forested/Shrub Wetland");
        assert_eq!(styles[0].1.fill_color, "#00883799");
        assert_eq!(fallback.fill_color, "#B2865399");
    }

    #[test]
    fn test_overview() {
        let watersheds = reference_watersheds(WATERSHED_COLLECTION, CONUS);
        let composition = compose_overview(DEFAULT_NAMESPACE, &watersheds);
        assert_eq!(
            composition.names(),
            vec!["NED (10-m)", "Hillshade", "NHD-HUC8", "Pipestem HUC8"]
        );
        assert_eq!(composition.viewport, OVERVIEW_VIEWPORT);
        assert_eq!(
            composition.layer("Pipestem HUC8").unwrap().data,
            Handle::Collection(CollectionExpr::asset("users/giswqs/Pipestem/Pipestem_HUC8"))
        );
    }

    #[test]
    fn test_layer_spec_serializes() {
        let layer = LayerSpec::new(
            "Flow path",
            ImageExpr::paint(CollectionExpr::asset("flow"), 2),
            VisParams::palette("blue"),
            true,
        );
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["name"], "Flow path");
        assert_eq!(value["data"]["type"], "image");
        assert_eq!(value["data"]["source"]["kind"], "paint");
        assert_eq!(value["vis"]["kind"], "palette");
        assert_eq!(value["vis"]["palette"], "blue");
        assert_eq!(value["shown"], true);
    }
}
