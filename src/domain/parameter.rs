// Parameter definition domain model
use serde::Serialize;
use std::fmt;

/// Grouping of catalog parameters by how the device reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    EngineDiagnostic,
    PermanentStatus,
    EventDriven,
    CanBus,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::EngineDiagnostic,
        Category::PermanentStatus,
        Category::EventDriven,
        Category::CanBus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::EngineDiagnostic => "engine-diagnostic",
            Category::PermanentStatus => "permanent-status",
            Category::EventDriven => "event-driven",
            Category::CanBus => "can-bus",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// Named conversions that read better than a bare multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Formula {
    MillivoltsToVolts,
    MetresToKilometres,
}

impl Formula {
    fn apply(&self, raw: f64) -> f64 {
        match self {
            Formula::MillivoltsToVolts => raw * 0.001,
            Formula::MetresToKilometres => raw * 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "arg", rename_all = "snake_case")]
pub enum ConversionRule {
    Identity,
    Multiply(f64),
    Formula(Formula),
}

impl ConversionRule {
    pub fn apply(&self, raw: f64) -> f64 {
        match self {
            ConversionRule::Identity => raw,
            ConversionRule::Multiply(factor) => raw * factor,
            ConversionRule::Formula(formula) => formula.apply(raw),
        }
    }
}

/// Immutable catalog entry describing how to decode one parameter id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub id: u16,
    pub name: &'static str,
    pub bytes: u8,
    pub signedness: Signedness,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
    pub rule: ConversionRule,
    pub category: Category,
    pub description: &'static str,
}

impl ParameterDefinition {
    /// Declared bounds are advisory: they flag a value, they never clamp it.
    pub fn in_range(&self, raw: f64) -> bool {
        self.min <= raw && raw <= self.max
    }
}
