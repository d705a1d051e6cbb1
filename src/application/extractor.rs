// Reading extractor - decodes every raw value of one reading
use crate::application::converter::convert;
use crate::domain::catalog::Catalog;
use crate::domain::parameter::Category;
use crate::domain::telemetry::{ConvertedValue, TelemetryReading};
use serde::Serialize;
use std::collections::BTreeMap;

/// Converted values of one reading grouped by category, with unknown ids kept aside.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedReading {
    pub by_category: BTreeMap<Category, BTreeMap<u32, ConvertedValue>>,
    pub unknown: BTreeMap<u32, ConvertedValue>,
}

impl ExtractedReading {
    pub fn category(&self, category: Category) -> Option<&BTreeMap<u32, ConvertedValue>> {
        self.by_category.get(&category)
    }

    pub fn get(&self, id: u32) -> Option<&ConvertedValue> {
        self.by_category
            .values()
            .find_map(|values| values.get(&id))
            .or_else(|| self.unknown.get(&id))
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(BTreeMap::len).sum::<usize>() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn extract_all(reading: &TelemetryReading) -> ExtractedReading {
    let mut extracted = ExtractedReading::default();

    for (&id, &raw) in &reading.values {
        let converted = convert(id, raw);
        match converted.category {
            Some(category) => {
                extracted
                    .by_category
                    .entry(category)
                    .or_default()
                    .insert(id, converted);
            }
            None => {
                extracted.unknown.insert(id, converted);
            }
        }
    }

    extracted
}

/// Converted values for the named parameters only, in the order given.
///
/// Names missing from the catalog and parameters the reading did not report
/// are left out. A missing value is never treated as zero.
pub fn extract_named(reading: &TelemetryReading, names: &[&str]) -> Vec<ConvertedValue> {
    let catalog = Catalog::global();
    names
        .iter()
        .filter_map(|name| catalog.lookup_by_name(name))
        .filter_map(|def| {
            let id = u32::from(def.id);
            reading.raw(id).map(|raw| convert(id, raw))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn reading(values: &[(u32, f64)]) -> TelemetryReading {
        TelemetryReading::new(
            "dev-1".to_string(),
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            values.iter().copied().collect(),
        )
    }

    #[test]
    fn test_extract_all_groups_by_category() {
        let r = reading(&[(36, 2100.0), (239, 1.0), (85, 2050.0), (254, 35.0), (777, 5.0)]);
        let extracted = extract_all(&r);

        assert_eq!(extracted.len(), 5);
        assert_eq!(
            extracted.category(Category::EngineDiagnostic).unwrap()[&36].value,
            2100.0
        );
        assert!(extracted.category(Category::PermanentStatus).unwrap().contains_key(&239));
        assert!(extracted.category(Category::CanBus).unwrap().contains_key(&85));
        assert!((extracted.get(254).unwrap().value - 0.35).abs() < 1e-12);
        assert!(extracted.unknown[&777].is_unknown());
    }

    #[test]
    fn test_extract_all_empty_reading() {
        assert!(extract_all(&reading(&[])).is_empty());
    }

    #[test]
    fn test_extract_named_skips_absent_not_zero() {
        let r = reading(&[(36, 0.0), (32, 88.0)]);
        let values = extract_named(&r, &["Coolant Temperature", "Fuel Level", "Engine RPM", "Bogus"]);

        let names: Vec<_> = values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Coolant Temperature", "Engine RPM"]);
        assert_eq!(values[1].value, 0.0);
    }
}
