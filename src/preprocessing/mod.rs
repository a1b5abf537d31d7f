//! Data preprocessing module
//!
//! - Feature scaling (z-score standardization)
//! - Frame to matrix extraction in a fixed column order

mod scaler;

pub use scaler::{Scaler, ScalerParams};

use crate::error::{Result, RiskError};
use ndarray::{Array1, Array2};
use polars::prelude::*;

/// Extract named columns from a DataFrame into a row-major `Array2<f64>`.
///
/// Columns are read in the order of `col_names`, cast to Float64. Nulls are
/// rejected.
pub fn frame_to_matrix<S: AsRef<str>>(df: &DataFrame, col_names: &[S]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|name| float_values(df, name.as_ref()))
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_refs[c][r]))
}

/// Extract one column as a Float64 vector
pub fn frame_to_vector(df: &DataFrame, col_name: &str) -> Result<Array1<f64>> {
    Ok(Array1::from_vec(float_values(df, col_name)?))
}

fn float_values(df: &DataFrame, col_name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(col_name)
        .map_err(|_| RiskError::FeatureNotFound(col_name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;

    series
        .f64()?
        .into_iter()
        .map(|v| v.ok_or_else(|| RiskError::DataError(format!("null value in column {}", col_name))))
        .collect()
}
