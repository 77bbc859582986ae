//! Choosing which catalog assets describe a watershed.
//!
//! Every HUC8 code gets the generic bundle (10 m depressions and NWI
//! wetlands). The reserved Pipestem Creek subbasin additionally carries the
//! LiDAR-derived bundle.

use serde::Serialize;

/// Namespace holding the depression and wetland exports.
pub const DEFAULT_NAMESPACE: &str = "users/giswqs";

/// Pipestem Creek, North Dakota.
pub const PIPESTEM_HUC8: &str = "10160002";

/// `<namespace>/depressions/<huc8>`
pub fn depressions_id(namespace: &str, huc8: &str) -> String {
    format!("{}/depressions/{}", namespace, huc8)
}

/// `<namespace>/NWI-HU8/HU8_<huc8>_Wetlands`
pub fn wetlands_id(namespace: &str, huc8: &str) -> String {
    format!("{}/NWI-HU8/HU8_{}_Wetlands", namespace, huc8)
}

/// Datasets available for every watershed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericDatasets {
    /// 10 m depressions
    pub depressions: String,
    /// National Wetlands Inventory polygons
    pub wetlands: String,
}

/// LiDAR-derived datasets of the reserved watershed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancedDatasets {
    /// 3 m LiDAR DEM
    pub lidar: String,
    /// LiDAR intensity
    pub intensity: String,
    pub flow_paths: String,
    /// Depression outlets
    pub flow_from: String,
    /// Depression inlets
    pub flow_to: String,
    pub catchments: String,
    /// 1 m depressions
    pub depressions_lidar: String,
    pub nwi: String,
    pub huc10: String,
}

impl EnhancedDatasets {
    fn under(namespace: &str) -> Self {
        let id = |name: &str| format!("{}/Pipestem/{}", namespace, name);
        EnhancedDatasets {
            lidar: id("lidar_3m"),
            intensity: id("intensity"),
            flow_paths: id("flow_paths"),
            flow_from: id("flow_from"),
            flow_to: id("flow_to"),
            catchments: id("catchments"),
            depressions_lidar: id("depressions"),
            nwi: id("NWI"),
            huc10: id("Pipestem_HUC10"),
        }
    }

    /// All identifiers, in declaration order.
    pub fn ids(&self) -> [&str; 9] {
        [
            self.lidar.as_str(),
            self.intensity.as_str(),
            self.flow_paths.as_str(),
            self.flow_from.as_str(),
            self.flow_to.as_str(),
            self.catchments.as_str(),
            self.depressions_lidar.as_str(),
            self.nwi.as_str(),
            self.huc10.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetBundle {
    Generic(GenericDatasets),
    Enhanced {
        enhanced: EnhancedDatasets,
        generic: GenericDatasets,
    },
}

impl DatasetBundle {
    pub fn generic(&self) -> &GenericDatasets {
        match self {
            DatasetBundle::Generic(generic) => generic,
            DatasetBundle::Enhanced { generic, .. } => generic,
        }
    }

    pub fn is_enhanced(&self) -> bool {
        matches!(self, DatasetBundle::Enhanced { .. })
    }
}

/// Maps a HUC8 code to its dataset bundle. Total: every code gets a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    namespace: String,
    reserved_huc8: String,
}

impl Default for Selector {
    fn default() -> Self {
        Selector::new(DEFAULT_NAMESPACE, PIPESTEM_HUC8)
    }
}

impl Selector {
    pub fn new(namespace: &str, reserved_huc8: &str) -> Self {
        Selector {
            namespace: namespace.trim_end_matches('/').to_string(),
            reserved_huc8: reserved_huc8.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn select(&self, huc8: &str) -> DatasetBundle {
        let generic = GenericDatasets {
            depressions: depressions_id(&self.namespace, huc8),
            wetlands: wetlands_id(&self.namespace, huc8),
        };
        if huc8 == self.reserved_huc8 {
            DatasetBundle::Enhanced {
                enhanced: EnhancedDatasets::under(&self.namespace),
                generic,
            }
        } else {
            DatasetBundle::Generic(generic)
        }
    }
}
