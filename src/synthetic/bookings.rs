//! Synthetic booking generator

use crate::error::{Result, RiskError};
use crate::features::{BookingFeatures, FEATURE_NAMES, N_FEATURES, TARGET_COLUMN};
use polars::prelude::*;
use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper clip applied to the noisy latent probability
pub const MAX_PROBABILITY: f64 = 0.9;

const BASE_RATE: f64 = 0.15;
const W_CANCELLATIONS: f64 = 0.3;
const W_RAINY: f64 = 0.2;
const W_HOLIDAY: f64 = 0.1;
const W_EVENING: f64 = 0.05;
const W_LEAD_TIME: f64 = -0.1;
const W_RELIABILITY: f64 = -0.15;
const W_FIRST_APPOINTMENT: f64 = 0.1;
const W_COLD: f64 = 0.05;
const W_PEAK_TRAFFIC: f64 = 0.05;

const COLD_BELOW_CELSIUS: f64 = 10.0;
const NOISE_STD: f64 = 0.05;

const P_EVENING: f64 = 0.3;
const P_RAINY: f64 = 0.3;
const P_HOLIDAY: f64 = 0.05;
const P_FIRST_APPOINTMENT: f64 = 0.2;
const P_PEAK_TRAFFIC: f64 = 0.2;

/// Generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of bookings to generate
    pub n_samples: usize,
    /// Seed for the generator's own RNG
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the number of samples
    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Builder method to set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Noise-free no-show risk of a booking.
///
/// The generator adds Gaussian noise to this value and clips it to
/// `[0, MAX_PROBABILITY]` before drawing a label.
pub fn latent_probability(record: &BookingFeatures) -> f64 {
    let cold = if record.temperature < COLD_BELOW_CELSIUS { 1.0 } else { 0.0 };

    BASE_RATE
        + W_CANCELLATIONS * record.cancellations / 5.0
        + W_RAINY * record.is_rainy
        + W_HOLIDAY * record.is_holiday
        + W_EVENING * record.is_evening
        + W_LEAD_TIME * record.booking_lead_time / 30.0
        + W_RELIABILITY * record.client_reliability
        + W_FIRST_APPOINTMENT * record.is_first_appointment
        + W_COLD * cold
        + W_PEAK_TRAFFIC * record.is_peak_traffic
}

/// Generated bookings with their labels
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDataset {
    /// Feature records
    pub records: Vec<BookingFeatures>,
    /// Clipped noisy probability each label was drawn from
    pub probabilities: Vec<f64>,
    /// `true` when the booking was a no-show
    pub labels: Vec<bool>,
}

impl BookingDataset {
    /// Number of bookings
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no bookings
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fraction of bookings labeled as no-shows
    pub fn no_show_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&l| l).count() as f64 / self.labels.len() as f64
    }

    /// Frame with the ten feature columns followed by `no_show`.
    ///
    /// Integer and flag fields are Int64 columns, the two continuous fields
    /// are Float64.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(N_FEATURES + 1);

        for (idx, name) in FEATURE_NAMES.iter().enumerate() {
            let series = match *name {
                "client_reliability" | "temperature" => {
                    let values: Vec<f64> = self.records.iter().map(|r| r.to_array()[idx]).collect();
                    Series::new((*name).into(), values)
                }
                _ => {
                    let values: Vec<i64> =
                        self.records.iter().map(|r| r.to_array()[idx] as i64).collect();
                    Series::new((*name).into(), values)
                }
            };
            columns.push(series.into());
        }

        let labels: Vec<i64> = self.labels.iter().map(|&l| l as i64).collect();
        columns.push(Series::new(TARGET_COLUMN.into(), labels).into());

        Ok(DataFrame::new(columns)?)
    }

    /// Same as [`to_frame`](Self::to_frame) with a `no_show_probability` column
    /// inserted before the label.
    pub fn to_frame_with_probability(&self) -> Result<DataFrame> {
        let mut df = self.to_frame()?;
        let probability = Series::new("no_show_probability".into(), self.probabilities.clone());
        df.insert_column(N_FEATURES, probability)?;
        Ok(df)
    }
}

/// Seeded generator of synthetic bookings
#[derive(Debug, Clone)]
pub struct BookingGenerator {
    config: GeneratorConfig,
}

impl BookingGenerator {
    /// Create a generator
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Draw a full dataset.
    ///
    /// Each field is drawn for every booking before moving to the next field,
    /// then the noise vector, then the labels. The same seed always yields the
    /// same dataset.
    pub fn generate(&self) -> Result<BookingDataset> {
        let n = self.config.n_samples;
        if n == 0 {
            return Err(RiskError::ConfigError("n_samples must be positive".to_string()));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let cancellations = Self::draw_integers(&mut rng, n, 0, 5);
        let days_since_last_booking = Self::draw_integers(&mut rng, n, 0, 365);
        let is_evening = Self::draw_flags(&mut rng, n, P_EVENING)?;
        let is_rainy = Self::draw_flags(&mut rng, n, P_RAINY)?;
        let is_holiday = Self::draw_flags(&mut rng, n, P_HOLIDAY)?;
        let booking_lead_time = Self::draw_integers(&mut rng, n, 0, 30);
        let client_reliability = Self::draw_uniform(&mut rng, n, 0.0, 1.0);
        let is_first_appointment = Self::draw_flags(&mut rng, n, P_FIRST_APPOINTMENT)?;
        let temperature = Self::draw_uniform(&mut rng, n, 5.0, 25.0);
        let is_peak_traffic = Self::draw_flags(&mut rng, n, P_PEAK_TRAFFIC)?;

        let records: Vec<BookingFeatures> = (0..n)
            .map(|i| BookingFeatures {
                cancellations: cancellations[i],
                days_since_last_booking: days_since_last_booking[i],
                is_evening: is_evening[i],
                is_rainy: is_rainy[i],
                is_holiday: is_holiday[i],
                booking_lead_time: booking_lead_time[i],
                client_reliability: client_reliability[i],
                is_first_appointment: is_first_appointment[i],
                temperature: temperature[i],
                is_peak_traffic: is_peak_traffic[i],
            })
            .collect();

        let noise = Normal::new(0.0, NOISE_STD)
            .map_err(|e| RiskError::ConfigError(e.to_string()))?;
        let probabilities: Vec<f64> = records
            .iter()
            .map(|r| (latent_probability(r) + noise.sample(&mut rng)).clamp(0.0, MAX_PROBABILITY))
            .collect();

        let labels = probabilities
            .iter()
            .map(|&p| {
                Bernoulli::new(p)
                    .map(|b| b.sample(&mut rng))
                    .map_err(|e| RiskError::DataError(e.to_string()))
            })
            .collect::<Result<Vec<bool>>>()?;

        let dataset = BookingDataset { records, probabilities, labels };
        debug!(
            n_samples = n,
            seed = self.config.seed,
            no_show_rate = dataset.no_show_rate(),
            "Generated synthetic bookings"
        );

        Ok(dataset)
    }

    fn draw_integers(rng: &mut ChaCha8Rng, n: usize, low: i64, high: i64) -> Vec<f64> {
        let dist = Uniform::new_inclusive(low, high);
        (0..n).map(|_| dist.sample(rng) as f64).collect()
    }

    fn draw_uniform(rng: &mut ChaCha8Rng, n: usize, low: f64, high: f64) -> Vec<f64> {
        let dist = Uniform::new(low, high);
        (0..n).map(|_| dist.sample(rng)).collect()
    }

    fn draw_flags(rng: &mut ChaCha8Rng, n: usize, p: f64) -> Result<Vec<f64>> {
        let dist = Bernoulli::new(p).map_err(|e| RiskError::ConfigError(e.to_string()))?;
        Ok((0..n).map(|_| if dist.sample(rng) { 1.0 } else { 0.0 }).collect())
    }
}
