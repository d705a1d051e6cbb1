// Parameter catalog - static table of decoding rules keyed by device I/O id
use super::parameter::{
    Category, ConversionRule, Formula, ParameterDefinition, Signedness,
};
use std::collections::HashMap;
use std::sync::LazyLock;

use Category::{CanBus, EngineDiagnostic, EventDriven, PermanentStatus};
use ConversionRule::{Identity, Multiply};
use Signedness::{Signed, Unsigned};

/// Id of the stored diagnostic-trouble-code count. Zero is a real reading here.
pub const DTC_COUNT_ID: u16 = 30;

const MV_TO_V: ConversionRule = ConversionRule::Formula(Formula::MillivoltsToVolts);
const M_TO_KM: ConversionRule = ConversionRule::Formula(Formula::MetresToKilometres);

#[allow(clippy::too_many_arguments)]
const fn param(
    id: u16,
    name: &'static str,
    bytes: u8,
    signedness: Signedness,
    min: f64,
    max: f64,
    unit: &'static str,
    rule: ConversionRule,
    category: Category,
    description: &'static str,
) -> ParameterDefinition {
    ParameterDefinition {
        id,
        name,
        bytes,
        signedness,
        min,
        max,
        unit,
        rule,
        category,
        description,
    }
}

#[rustfmt::skip]
const DEFINITIONS: &[ParameterDefinition] = &[
    // OBD-II
    param(30, "Number of DTC", 1, Unsigned, 0.0, 255.0, "", Identity, EngineDiagnostic, "Diagnostic trouble codes currently stored by the ECU"),
    param(31, "Engine Load", 1, Unsigned, 0.0, 100.0, "%", Identity, EngineDiagnostic, "Calculated engine load"),
    param(32, "Coolant Temperature", 1, Signed, -128.0, 127.0, "°C", Identity, EngineDiagnostic, "Engine coolant temperature"),
    param(33, "Short Fuel Trim", 1, Signed, -100.0, 100.0, "%", Identity, EngineDiagnostic, "Short term fuel trim, bank 1"),
    param(34, "Fuel Pressure", 2, Unsigned, 0.0, 765.0, "kPa", Identity, EngineDiagnostic, "Fuel pressure (gauge)"),
    param(35, "Intake MAP", 1, Unsigned, 0.0, 255.0, "kPa", Identity, EngineDiagnostic, "Intake manifold absolute pressure"),
    param(36, "Engine RPM", 2, Unsigned, 0.0, 16384.0, "rpm", Identity, EngineDiagnostic, "Engine speed"),
    param(37, "Vehicle Speed", 1, Unsigned, 0.0, 255.0, "km/h", Identity, EngineDiagnostic, "Vehicle speed reported by the ECU"),
    param(38, "Timing Advance", 1, Signed, -64.0, 63.0, "°", Identity, EngineDiagnostic, "Ignition timing advance before TDC"),
    param(39, "Intake Air Temperature", 1, Signed, -40.0, 215.0, "°C", Identity, EngineDiagnostic, "Intake air temperature"),
    param(40, "MAF", 2, Unsigned, 0.0, 65535.0, "g/s", Multiply(0.01), EngineDiagnostic, "Mass air flow rate"),
    param(41, "Throttle Position", 1, Unsigned, 0.0, 100.0, "%", Identity, EngineDiagnostic, "Absolute throttle position"),
    param(42, "Runtime Since Engine Start", 2, Unsigned, 0.0, 65535.0, "s", Identity, EngineDiagnostic, "Seconds since the engine was started"),
    param(43, "Distance Traveled MIL On", 2, Unsigned, 0.0, 65535.0, "km", Identity, EngineDiagnostic, "Distance driven with the malfunction indicator lamp on"),
    param(44, "Relative Fuel Rail Pressure", 2, Unsigned, 0.0, 65535.0, "kPa", Multiply(0.1), EngineDiagnostic, "Fuel rail pressure relative to manifold vacuum"),
    param(45, "Direct Fuel Rail Pressure", 2, Unsigned, 0.0, 65535.0, "kPa", Multiply(10.0), EngineDiagnostic, "Fuel rail gauge pressure (diesel or direct injection)"),
    param(46, "Commanded EGR", 1, Unsigned, 0.0, 100.0, "%", Identity, EngineDiagnostic, "Commanded exhaust gas recirculation"),
    param(47, "EGR Error", 1, Signed, -100.0, 100.0, "%", Identity, EngineDiagnostic, "Exhaust gas recirculation error"),
    param(48, "Fuel Level", 1, Unsigned, 0.0, 100.0, "%", Identity, EngineDiagnostic, "Fuel tank level input"),
    param(49, "Distance Since Codes Clear", 2, Unsigned, 0.0, 65535.0, "km", Identity, EngineDiagnostic, "Distance driven since trouble codes were cleared"),
    param(50, "Barometric Pressure", 1, Unsigned, 0.0, 255.0, "kPa", Identity, EngineDiagnostic, "Absolute barometric pressure"),
    param(51, "Control Module Voltage", 2, Unsigned, 0.0, 65535.0, "V", MV_TO_V, EngineDiagnostic, "ECU supply voltage"),
    param(52, "Absolute Load Value", 2, Unsigned, 0.0, 25700.0, "%", Identity, EngineDiagnostic, "Normalised air mass per intake stroke"),
    param(53, "Ambient Air Temperature", 1, Signed, -128.0, 127.0, "°C", Identity, EngineDiagnostic, "Ambient air temperature"),
    param(58, "Engine Oil Temperature", 1, Signed, -48.0, 207.0, "°C", Identity, EngineDiagnostic, "Engine oil temperature"),
    param(60, "Fuel Rate", 2, Unsigned, 0.0, 32767.0, "L/h", Multiply(0.01), EngineDiagnostic, "Engine fuel rate"),
    // Permanent device I/O
    param(16, "Total Odometer", 4, Unsigned, 0.0, 2_147_483_647.0, "km", M_TO_KM, PermanentStatus, "GNSS odometer since device install"),
    param(21, "GSM Signal", 1, Unsigned, 0.0, 5.0, "", Identity, PermanentStatus, "Cellular signal strength bars"),
    param(24, "Speed", 2, Unsigned, 0.0, 350.0, "km/h", Identity, PermanentStatus, "GNSS speed"),
    param(66, "External Voltage", 2, Unsigned, 0.0, 65535.0, "V", MV_TO_V, PermanentStatus, "Vehicle power supply voltage"),
    param(67, "Battery Voltage", 2, Unsigned, 0.0, 65535.0, "V", MV_TO_V, PermanentStatus, "Device internal battery voltage"),
    param(68, "Battery Current", 2, Unsigned, 0.0, 65535.0, "A", Multiply(0.001), PermanentStatus, "Device internal battery current"),
    param(239, "Ignition", 1, Unsigned, 0.0, 1.0, "", Identity, PermanentStatus, "Ignition line state"),
    param(240, "Movement", 1, Unsigned, 0.0, 1.0, "", Identity, PermanentStatus, "Accelerometer movement state"),
    // Event-driven device I/O
    param(250, "Trip", 1, Unsigned, 0.0, 1.0, "", Identity, EventDriven, "Trip start/stop event"),
    param(251, "Idling", 1, Unsigned, 0.0, 1.0, "", Identity, EventDriven, "Engine idling event"),
    param(253, "Green Driving Type", 1, Unsigned, 1.0, 3.0, "", Identity, EventDriven, "Harsh event kind: acceleration, braking, cornering"),
    param(254, "Green Driving Value", 1, Unsigned, 0.0, 255.0, "g", Multiply(0.01), EventDriven, "Harsh event magnitude"),
    param(255, "Over Speeding", 1, Unsigned, 0.0, 255.0, "km/h", Identity, EventDriven, "Speed at the over-speeding event"),
    // CAN bus
    param(81, "CAN Vehicle Speed", 1, Unsigned, 0.0, 255.0, "km/h", Identity, CanBus, "Vehicle speed from the CAN bus"),
    param(82, "Accelerator Pedal Position", 1, Unsigned, 0.0, 102.0, "%", Identity, CanBus, "Accelerator pedal position from the CAN bus"),
    param(85, "CAN Engine RPM", 2, Unsigned, 0.0, 16384.0, "rpm", Identity, CanBus, "Engine speed from the CAN bus"),
    param(89, "CAN Fuel Level", 1, Unsigned, 0.0, 100.0, "%", Identity, CanBus, "Fuel level from the CAN bus"),
    param(115, "CAN Engine Temperature", 2, Signed, -600.0, 1270.0, "°C", Multiply(0.1), CanBus, "Engine temperature from the CAN bus"),
];

/// Closed, read-only set of parameter definitions with O(1) lookups.
#[derive(Debug)]
pub struct Catalog {
    by_id: HashMap<u16, &'static ParameterDefinition>,
    by_name: HashMap<&'static str, &'static ParameterDefinition>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog::from_definitions(DEFINITIONS));

impl Catalog {
    fn from_definitions(definitions: &'static [ParameterDefinition]) -> Self {
        let by_id = definitions.iter().map(|d| (d.id, d)).collect();
        let by_name = definitions.iter().map(|d| (d.name, d)).collect();
        Self { by_id, by_name }
    }

    /// The process-wide catalog, built on first use.
    pub fn global() -> &'static Catalog {
        &CATALOG
    }

    pub fn lookup(&self, id: u16) -> Option<&'static ParameterDefinition> {
        self.by_id.get(&id).copied()
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&'static ParameterDefinition> {
        self.by_name.get(name).copied()
    }

    /// Definitions of one category, ordered by id.
    pub fn parameters_by_category(&self, category: Category) -> Vec<&'static ParameterDefinition> {
        let mut params: Vec<_> = DEFINITIONS
            .iter()
            .filter(|d| d.category == category)
            .collect();
        params.sort_by_key(|d| d.id);
        params
    }

    pub fn definitions(&self) -> &'static [ParameterDefinition] {
        DEFINITIONS
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_and_names_are_unique() {
        let ids: HashSet<u16> = DEFINITIONS.iter().map(|d| d.id).collect();
        let names: HashSet<&str> = DEFINITIONS.iter().map(|d| d.name).collect();
        assert_eq!(ids.len(), DEFINITIONS.len());
        assert_eq!(names.len(), DEFINITIONS.len());
        assert_eq!(Catalog::global().len(), DEFINITIONS.len());
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::global();
        let rpm = catalog.lookup(36).unwrap();
        assert_eq!(rpm.name, "Engine RPM");
        assert_eq!(rpm.unit, "rpm");
        assert!(catalog.lookup(9999).is_none());
        assert_eq!(catalog.lookup_by_name("Fuel Level").unwrap().id, 48);
    }

    #[test]
    fn test_every_category_populated_and_ordered() {
        let catalog = Catalog::global();
        for category in Category::ALL {
            let params = catalog.parameters_by_category(category);
            assert!(!params.is_empty(), "{category} has no parameters");
            assert!(params.windows(2).all(|w| w[0].id < w[1].id));
            assert!(params.iter().all(|p| p.category == category));
        }
        let diagnostic = catalog.parameters_by_category(EngineDiagnostic);
        assert_eq!(diagnostic.first().unwrap().id, DTC_COUNT_ID);
    }

    #[test]
    fn test_declared_ranges_are_ordered() {
        assert!(DEFINITIONS.iter().all(|d| d.min <= d.max));
    }
}
