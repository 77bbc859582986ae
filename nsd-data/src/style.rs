//! National Wetlands Inventory styling.

use log::debug;
use nsd_catalog::Feature;
use nsd_utils::color;
use serde::Serialize;

/// Attribute holding the wetland class name.
pub const WETLAND_PROPERTY: &str = "WETLAND_TY";

/// Alpha appended to the class color for polygon fills.
pub const FILL_ALPHA: &str = "99";

/// Semi-transparent black outline shared by every wetland polygon.
pub const WETLAND_OUTLINE: &str = "00000088";

/// Fully transparent color, for "no border" and "no fill".
pub const TRANSPARENT: &str = "00000000";

/// Line and fill style of a vector layer or feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRecord {
    pub width: f64,
    pub color: String,
    pub fill_color: String,
}

impl StyleRecord {
    pub fn new(width: f64, color: &str, fill_color: &str) -> Self {
        StyleRecord {
            width,
            color: color.to_string(),
            fill_color: fill_color.to_string(),
        }
    }

    /// Outline only.
    pub fn outline(color: &str, width: f64) -> Self {
        StyleRecord::new(width, color, TRANSPARENT)
    }

    /// Fill only.
    pub fn fill(fill_color: &str) -> Self {
        StyleRecord::new(1.0, TRANSPARENT, fill_color)
    }
}

/// Wetland classes of the NWI legend, in legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WetlandType {
    FreshwaterForestedShrub,
    FreshwaterEmergent,
    FreshwaterPond,
    EstuarineMarineWetland,
    Riverine,
    Lake,
    EstuarineMarineDeepwater,
    Other,
}

impl WetlandType {
    pub const ALL: [WetlandType; 8] = [
        WetlandType::FreshwaterForestedShrub,
        WetlandType::FreshwaterEmergent,
        WetlandType::FreshwaterPond,
        WetlandType::EstuarineMarineWetland,
        WetlandType::Riverine,
        WetlandType::Lake,
        WetlandType::EstuarineMarineDeepwater,
        WetlandType::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WetlandType::FreshwaterForestedShrub => "Freshwater Forested/Shrub Wetland",
            WetlandType::FreshwaterEmergent => "Freshwater Emergent Wetland",
            WetlandType::FreshwaterPond => "Freshwater Pond",
            WetlandType::EstuarineMarineWetland => "Estuarine and Marine Wetland",
            WetlandType::Riverine => "Riverine",
            WetlandType::Lake => "Lake",
            WetlandType::EstuarineMarineDeepwater => "Estuarine and Marine Deepwater",
            WetlandType::Other => "Other",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            WetlandType::FreshwaterForestedShrub => "#008837",
            WetlandType::FreshwaterEmergent => "#7FC31C",
            WetlandType::FreshwaterPond => "#688CC0",
            WetlandType::EstuarineMarineWetland => "#66C2A5",
            WetlandType::Riverine => "#0190BF",
            WetlandType::Lake => "#13007C",
            WetlandType::EstuarineMarineDeepwater => "#007C88",
            WetlandType::Other => "#B28653",
        }
    }

    /// Exact, case-sensitive match against the NWI class names.
    pub fn from_name(name: &str) -> Option<Self> {
        WetlandType::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Like [`from_name`](Self::from_name), but unknown names become `Other`.
    pub fn classify(name: &str) -> Self {
        WetlandType::from_name(name).unwrap_or_else(|| {
            debug!("Unmapped wetland type {:?}, styling as Other", name);
            WetlandType::Other
        })
    }

    pub fn style(&self) -> StyleRecord {
        StyleRecord::new(1.0, WETLAND_OUTLINE, &color::with_alpha(self.color(), FILL_ALPHA))
    }
}

/// Style of a wetland class by name. Never fails: unknown names get the
/// `Other` style.
pub fn style_for(name: &str) -> StyleRecord {
    WetlandType::classify(name).style()
}

/// Legend entries as (name, color) pairs.
pub fn legend() -> Vec<(&'static str, &'static str)> {
    WetlandType::ALL
        .iter()
        .map(|t| (t.name(), t.color()))
        .collect()
}

/// Number of features per wetland class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: &'static str,
    pub color: &'static str,
    pub count: usize,
}

/// Count wetland features per class, every class listed in legend order.
pub fn breakdown(features: &[Feature]) -> Vec<CategoryCount> {
    let mut counts = [0usize; 8];
    for feature in features {
        let kind = WetlandType::classify(feature.get_str(WETLAND_PROPERTY).unwrap_or_default());
        counts[kind as usize] += 1;
    }
    WetlandType::ALL
        .iter()
        .zip(counts)
        .map(|(t, count)| CategoryCount {
            name: t.name(),
            color: t.color(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::wetland;

    #[test]
    fn test_every_category_has_documented_color() {
        let expected = [
            ("Freshwater Forested/Shrub Wetland", "#008837"),
            ("Freshwater Emergent Wetland", "#7FC31C"),
            ("Freshwater Pond", "#688CC0"),
            ("Estuarine and Marine Wetland", "#66C2A5"),
            ("Riverine", "#0190BF"),
            ("Lake", "#13007C"),
            ("Estuarine and Marine Deepwater", "#007C88"),
            ("Other", "#B28653"),
        ];
        assert_eq!(legend(), expected.to_vec());
        for (name, color) in expected {
            let style = style_for(name);
            assert_eq!(style.fill_color, format!("{}99", color));
            assert_eq!(style.color, "00000088");
            assert_eq!(style.width, 1.0);
        }
    }

    #[test]
    fn test_unmapped_falls_back_to_other() {
        assert_eq!(style_for("Palustrine Mystery"), style_for("Other"));
        assert_eq!(style_for(""), style_for("Other"));
        // Lookup is case-sensitive
        assert_eq!(style_for("lake"), style_for("Other"));
        assert_eq!(WetlandType::from_name("lake"), None);
    }

    #[test]
    fn test_breakdown_without_attribute() {
        let counts = breakdown(&[Feature::new(None, Default::default()), wetland("Lake")]);
        assert_eq!(counts[5].count, 1);
        assert_eq!(counts[7].count, 1);
    }

    #[test]
    fn test_breakdown() {
        let features = vec![
            wetland("Lake"),
            wetland("Lake"),
            wetland("Riverine"),
            wetland("Unknown"),
        ];
        let counts = breakdown(&features);
        assert_eq!(counts.len(), 8);
        assert_eq!(counts[4].name, "Riverine");
        assert_eq!(counts[4].count, 1);
        assert_eq!(counts[5].count, 2);
        assert_eq!(counts[7].count, 1);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 4);
    }
}
