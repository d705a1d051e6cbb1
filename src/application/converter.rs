// Value converter - applies a catalog entry's decoding rule to a raw value
use crate::domain::catalog::Catalog;
use crate::domain::telemetry::ConvertedValue;

pub const UNKNOWN_PARAMETER: &str = "unknown parameter";

/// Decode `raw` for parameter `id`.
///
/// Unknown ids pass the raw value through with an error marker, since
/// firmware and catalog versions drift apart. Out-of-range values are
/// converted anyway and only flagged through `valid`.
pub fn convert(id: u32, raw: f64) -> ConvertedValue {
    let def = u16::try_from(id)
        .ok()
        .and_then(|id| Catalog::global().lookup(id));
    let Some(def) = def else {
        return ConvertedValue {
            id,
            name: format!("Unknown Parameter {id}"),
            raw,
            value: raw,
            unit: "-".to_string(),
            category: None,
            valid: false,
            error: Some(UNKNOWN_PARAMETER.to_string()),
        };
    };

    ConvertedValue {
        id,
        name: def.name.to_string(),
        raw,
        value: def.rule.apply(raw),
        unit: def.unit.to_string(),
        category: Some(def.category),
        valid: def.in_range(raw),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::{ConversionRule, Formula};

    #[test]
    fn test_multiplier_rules_match_raw_times_factor() {
        for def in Catalog::global().definitions() {
            let factor = match def.rule {
                ConversionRule::Identity => 1.0,
                ConversionRule::Multiply(k) => k,
                ConversionRule::Formula(Formula::MillivoltsToVolts)
                | ConversionRule::Formula(Formula::MetresToKilometres) => 0.001,
            };
            for raw in [0.0, 1.0, 7.0, 1234.0, def.max] {
                let converted = convert(u32::from(def.id), raw);
                let expected = raw * factor;
                assert!(
                    (converted.value - expected).abs() <= 1e-9 * expected.abs().max(1.0),
                    "{} raw {raw}: {} != {expected}",
                    def.name,
                    converted.value
                );
                assert_eq!(converted.raw, raw);
            }
        }
    }

    #[test]
    fn test_fractional_multiplier_is_not_truncated() {
        let maf = convert(40, 1234.0);
        assert!((maf.value - 12.34).abs() < 1e-9);
        assert_eq!(maf.unit, "g/s");

        let volts = convert(66, 12_650.0);
        assert!((volts.value - 12.65).abs() < 1e-9);
        assert_eq!(volts.unit, "V");
    }

    #[test]
    fn test_unknown_id_is_flagged_not_fatal() {
        let v = convert(9001, 42.0);
        assert_eq!(v.error.as_deref(), Some(UNKNOWN_PARAMETER));
        assert_eq!(v.name, "Unknown Parameter 9001");
        assert_eq!(v.value, 42.0);
        assert_eq!(v.unit, "-");
        assert!(v.category.is_none());
        assert!(v.is_unknown());
    }

    #[test]
    fn test_ids_outside_catalog_pass_raw_through() {
        let catalog = Catalog::global();
        let mut ids = vec![0, u32::from(u16::MAX), u32::from(u16::MAX) + 1, 70_000, u32::MAX];
        for def in catalog.definitions() {
            let id = u32::from(def.id);
            ids.extend([id.saturating_sub(1), id + 1]);
        }
        ids.retain(|&id| u16::try_from(id).ok().is_none_or(|id| catalog.lookup(id).is_none()));
        assert!(ids.len() > 5);

        for id in ids {
            let v = convert(id, -17.5);
            assert!(v.is_unknown(), "id {id}");
            assert!(!v.valid);
            assert_eq!(v.id, id);
            assert_eq!(v.value, -17.5);
            assert_eq!(v.name, format!("Unknown Parameter {id}"));
        }
    }

    #[test]
    fn test_out_of_range_is_converted_but_invalid() {
        let coolant = convert(32, 180.0);
        assert!(!coolant.valid);
        assert_eq!(coolant.value, 180.0);
        assert!(coolant.error.is_none());

        let level = convert(48, 55.0);
        assert!(level.valid);
    }
}
