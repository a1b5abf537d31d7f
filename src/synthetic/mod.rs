//! Synthetic data generation module
//!
//! Fabricates a labeled booking dataset for training:
//! - Independent per-field draws (discrete uniform, uniform, Bernoulli)
//! - A hand-tuned linear no-show risk with Gaussian noise
//! - Bernoulli labels drawn from the clipped risk

mod bookings;

pub use bookings::{
    latent_probability, BookingDataset, BookingGenerator, GeneratorConfig, MAX_PROBABILITY,
};
