use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// One of the nine water-quality quantities recorded per sample.
///
/// The declaration order is the canonical order used for storage columns,
/// charts, reports and `Measurement::from_values`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Ph,
    Tds,
    Turbidity,
    Hardness,
    Chlorine,
    Conductivity,
    Nitrates,
    Fluoride,
    Iron,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::Ph,
        Parameter::Tds,
        Parameter::Turbidity,
        Parameter::Hardness,
        Parameter::Chlorine,
        Parameter::Conductivity,
        Parameter::Nitrates,
        Parameter::Fluoride,
        Parameter::Iron,
    ];

    /// Human-readable label, as printed on charts and reports.
    pub const fn label(self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Tds => "TDS",
            Parameter::Turbidity => "Turbidity",
            Parameter::Hardness => "Hardness",
            Parameter::Chlorine => "Chlorine",
            Parameter::Conductivity => "Conductivity",
            Parameter::Nitrates => "Nitrates",
            Parameter::Fluoride => "Fluoride",
            Parameter::Iron => "Iron",
        }
    }

    /// Measurement unit; pH is dimensionless and returns an empty string.
    pub const fn unit(self) -> &'static str {
        match self {
            Parameter::Ph => "",
            Parameter::Tds => "ppm",
            Parameter::Turbidity => "NTU",
            Parameter::Conductivity => "µS/cm",
            Parameter::Hardness
            | Parameter::Chlorine
            | Parameter::Nitrates
            | Parameter::Fluoride
            | Parameter::Iron => "mg/L",
        }
    }

    /// Lower-case key used for CLI flags and JSON fields.
    pub const fn key(self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::Tds => "tds",
            Parameter::Turbidity => "turbidity",
            Parameter::Hardness => "hardness",
            Parameter::Chlorine => "chlorine",
            Parameter::Conductivity => "conductivity",
            Parameter::Nitrates => "nitrates",
            Parameter::Fluoride => "fluoride",
            Parameter::Iron => "iron",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One submitted sample: a reading for each `Parameter`.
///
/// Readings are not range-checked here; negative values are accepted and
/// classified like any other number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub ph: f64,
    pub tds: f64,
    pub turbidity: f64,
    pub hardness: f64,
    pub chlorine: f64,
    pub conductivity: f64,
    pub nitrates: f64,
    pub fluoride: f64,
    pub iron: f64,
}

impl Measurement {
    /// Builds a measurement from readings in `Parameter::ALL` order.
    pub fn from_values(values: [f64; 9]) -> Self {
        let [ph, tds, turbidity, hardness, chlorine, conductivity, nitrates, fluoride, iron] =
            values;
        Self {
            ph,
            tds,
            turbidity,
            hardness,
            chlorine,
            conductivity,
            nitrates,
            fluoride,
            iron,
        }
    }

    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::Tds => self.tds,
            Parameter::Turbidity => self.turbidity,
            Parameter::Hardness => self.hardness,
            Parameter::Chlorine => self.chlorine,
            Parameter::Conductivity => self.conductivity,
            Parameter::Nitrates => self.nitrates,
            Parameter::Fluoride => self.fluoride,
            Parameter::Iron => self.iron,
        }
    }

    /// Readings paired with their parameter, in canonical order.
    pub fn values(&self) -> [(Parameter, f64); 9] {
        Parameter::ALL.map(|p| (p, self.value(p)))
    }

    /// Rejects NaN and infinite readings, naming the first offending field.
    pub fn ensure_finite(&self) -> Result<(), AppError> {
        match self.values().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((p, v)) => Err(AppError::InvalidInput {
                field: p.key(),
                value: v.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Three-way safety classification of a `Measurement`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Safe for Drinking")]
    SafeForDrinking,
    #[serde(rename = "Needs Filtration")]
    NeedsFiltration,
    #[serde(rename = "Unsafe – Contaminated")]
    UnsafeContaminated,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [
        Verdict::SafeForDrinking,
        Verdict::NeedsFiltration,
        Verdict::UnsafeContaminated,
    ];

    /// Label persisted in the `status` column. The unsafe label uses an en dash.
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::SafeForDrinking => "Safe for Drinking",
            Verdict::NeedsFiltration => "Needs Filtration",
            Verdict::UnsafeContaminated => "Unsafe – Contaminated",
        }
    }

    /// Exact inverse of `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label() == label)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted measurement with its verdict and submission timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub date: String,
    pub measurement: Measurement,
    pub verdict: Verdict,
}
