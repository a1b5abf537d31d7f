//! Booking feature record
//!
//! The ten model inputs, in the order the scaler and forest were fitted on.
//! Every conversion into a frame or a row goes through [`FEATURE_NAMES`].

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of model input fields
pub const N_FEATURES: usize = 10;

/// Field order shared by training and inference
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "cancellations",
    "days_since_last_booking",
    "is_evening",
    "is_rainy",
    "is_holiday",
    "booking_lead_time",
    "client_reliability",
    "is_first_appointment",
    "temperature",
    "is_peak_traffic",
];

/// Name of the label column in generated datasets
pub const TARGET_COLUMN: &str = "no_show";

/// One booking, as presented to the model.
///
/// | field                     | domain        |
/// |---------------------------|---------------|
/// | `cancellations`           | 0-5           |
/// | `days_since_last_booking` | 0-365         |
/// | `is_*` flags              | 0 / 1         |
/// | `booking_lead_time`       | 0-30 days     |
/// | `client_reliability`      | 0.0-1.0       |
/// | `temperature`             | 5-25 C        |
///
/// Decoding is strict: a missing or unknown key is an error. Flags accept
/// either `0`/`1` or `false`/`true`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingFeatures {
    pub cancellations: f64,
    pub days_since_last_booking: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_evening: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_rainy: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_holiday: f64,
    pub booking_lead_time: f64,
    pub client_reliability: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_first_appointment: f64,
    pub temperature: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_peak_traffic: f64,
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        Flag::Number(n) => Ok(n),
    }
}

impl BookingFeatures {
    /// Decode a record from a JSON object
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; N_FEATURES] {
        [
            self.cancellations,
            self.days_since_last_booking,
            self.is_evening,
            self.is_rainy,
            self.is_holiday,
            self.booking_lead_time,
            self.client_reliability,
            self.is_first_appointment,
            self.temperature,
            self.is_peak_traffic,
        ]
    }

    /// Build a record from values in [`FEATURE_NAMES`] order
    pub fn from_array(values: [f64; N_FEATURES]) -> Self {
        Self {
            cancellations: values[0],
            days_since_last_booking: values[1],
            is_evening: values[2],
            is_rainy: values[3],
            is_holiday: values[4],
            booking_lead_time: values[5],
            client_reliability: values[6],
            is_first_appointment: values[7],
            temperature: values[8],
            is_peak_traffic: values[9],
        }
    }

    /// One-row frame with a Float64 column per field
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = FEATURE_NAMES
            .iter()
            .zip(self.to_array())
            .map(|(name, value)| Series::new((*name).into(), &[value]).into())
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}
