//! Point to watershed resolution.

use geo::{BoundingRect, GeodesicArea};
use log::{debug, info};
use nsd_catalog::{BBox, Catalog, CollectionExpr, Feature, Realizer};
use nsd_utils::{huc, units};

use crate::error::{ExplorerError, Result};
use crate::location::Location;

/// Watershed Boundary Dataset, subbasin (HUC8) level.
pub const WATERSHED_COLLECTION: &str = "USGS/WBD/2017/HUC08";

/// Conterminous United States; the reference collection is restricted to it.
pub const CONUS: BBox = BBox::new(-127.18, 19.39, -62.75, 51.29);

pub const HUC8_PROPERTY: &str = "huc8";
pub const AREA_PROPERTY: &str = "areasqkm";
pub const NAME_PROPERTY: &str = "name";

/// The reference watershed collection as a lazy handle.
pub fn reference_watersheds(collection: &str, extent: BBox) -> CollectionExpr {
    CollectionExpr::asset(collection).filter_bbox(extent)
}

/// The watershed polygon enclosing a selected point.
#[derive(Debug, Clone, PartialEq)]
pub struct Watershed {
    pub huc8: String,
    pub name: Option<String>,
    /// `areasqkm` attribute, or the geodesic area of the polygon if absent.
    pub area_sqkm: f64,
    pub bbox: BBox,
    /// Lazy handle that selects exactly this watershed.
    pub selection: CollectionExpr,
    pub feature: Feature,
}

impl Watershed {
    fn from_feature(feature: Feature, selection: CollectionExpr) -> Result<Self> {
        let dataset = selection.asset.clone();
        let huc8 = feature
            .get_str(HUC8_PROPERTY)
            .filter(|code| huc::is_huc8(code))
            .ok_or_else(|| ExplorerError::invalid_attribute(&dataset, HUC8_PROPERTY))?
            .to_string();
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| ExplorerError::invalid_attribute(&dataset, "geometry"))?;
        let bbox = geometry
            .bounding_rect()
            .map(BBox::from)
            .ok_or_else(|| ExplorerError::invalid_attribute(&dataset, "geometry"))?;
        let area_sqkm = match feature.get_f64(AREA_PROPERTY) {
            Some(area) => area,
            None => {
                debug!("{} has no {}, using geodesic area", huc8, AREA_PROPERTY);
                units::sq_m_to_sq_km(geometry.geodesic_area_unsigned())
            }
        };
        let name = feature.get_str(NAME_PROPERTY).map(str::to_string);
        Ok(Watershed {
            huc8,
            name,
            area_sqkm,
            bbox,
            selection,
            feature,
        })
    }
}

fn selection_at(watersheds: &CollectionExpr, location: Location) -> CollectionExpr {
    watersheds
        .clone()
        .filter_bounds(location.lon(), location.lat())
        .first()
}

fn pick(selection: CollectionExpr, hits: Vec<Feature>, location: Location) -> Result<Watershed> {
    let feature = hits.into_iter().next().ok_or(ExplorerError::NoMatch {
        lon: location.lon(),
        lat: location.lat(),
    })?;
    let watershed = Watershed::from_feature(feature, selection)?;
    info!(
        "Resolved ({}, {}) to HUC8 {}",
        location.lon(),
        location.lat(),
        watershed.huc8
    );
    Ok(watershed)
}

/// Find the watershed containing `location`.
///
/// Polygons are tested in collection order and the first hit wins, so a
/// point on a shared boundary (or inside overlapping polygons) resolves to
/// whichever polygon the catalog lists first.
pub async fn resolve<C: Catalog>(
    realizer: &Realizer<'_, C>,
    watersheds: &CollectionExpr,
    location: Location,
) -> Result<Watershed> {
    let selection = selection_at(watersheds, location);
    let hits = realizer.features(&selection).await?;
    pick(selection, hits, location)
}

/// [`resolve`] over features already in memory, e.g. the source features
/// of `watersheds`. The op chain of `watersheds` is applied to them first.
pub fn resolve_in(
    watersheds: &CollectionExpr,
    location: Location,
    features: Vec<Feature>,
) -> Result<Watershed> {
    let selection = selection_at(watersheds, location);
    let hits = selection.apply(features);
    pick(selection, hits, location)
}
