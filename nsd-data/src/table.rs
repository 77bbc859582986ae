//! Attribute tables as CSV, geometry dropped.

use std::collections::BTreeSet;

use nsd_catalog::Feature;
use serde_json::Value;

use crate::error::{ExplorerError, Result};

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render feature attributes as CSV.
///
/// The header is the sorted union of every property key; features lacking a
/// key get an empty cell.
pub fn attribute_table(features: &[Feature]) -> Result<String> {
    let columns: BTreeSet<&str> = features
        .iter()
        .flat_map(|f| f.properties.keys().map(String::as_str))
        .collect();
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !columns.is_empty() {
        writer
            .write_record(&columns)
            .map_err(|e| ExplorerError::Export(e.to_string()))?;
        for feature in features {
            let row = columns.iter().map(|c| cell(feature.property(c)));
            writer
                .write_record(row)
                .map_err(|e| ExplorerError::Export(e.to_string()))?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExplorerError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExplorerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(pairs: &[(&str, Value)]) -> Feature {
        Feature::new(
            None,
            pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        )
    }

    #[test]
    fn test_attribute_table() {
        let features = vec![
            feature(&[("huc8", json!("10160002")), ("areasqkm", json!(2773.18))]),
            feature(&[("huc8", json!("07080201")), ("name", json!("Upper Cedar, IA"))]),
        ];
        let table = attribute_table(&features).unwrap();
        assert_eq!(
            table,
            "areasqkm,huc8,name\n2773.18,10160002,\n,07080201,\"Upper Cedar, IA\"\n"
        );
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(attribute_table(&[]).unwrap(), "");
    }

    #[test]
    fn test_null_and_bool_cells() {
        let features = vec![feature(&[("a", Value::Null), ("b", json!(true))])];
        assert_eq!(attribute_table(&features).unwrap(), "a,b\n,true\n");
    }
}
