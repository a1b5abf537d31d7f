//! Standard feature scaling

use crate::error::{Result, RiskError};
use tracing::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fitted statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    /// Column mean
    pub mean: f64,
    /// Population standard deviation (1.0 for constant columns)
    pub scale: f64,
}

/// Z-score scaler: `(x - mean) / std` per fitted column.
///
/// Columns are kept in the order they were fitted, and a frame presented to
/// [`transform`](Scaler::transform) must carry every one of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scaler {
    columns: Vec<String>,
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    /// Create an unfitted scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the scaler to the given columns of `df`
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        if df.height() == 0 {
            return Err(RiskError::PreprocessingError(
                "cannot fit scaler on an empty frame".to_string(),
            ));
        }

        let mut params = Vec::with_capacity(columns.len());
        for col_name in columns {
            let series = Self::float_column(df, col_name)?;
            params.push(Self::compute_params(&series)?);
        }

        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self.params = params;
        self.is_fitted = true;
        debug!(n_columns = self.columns.len(), n_rows = df.height(), "Fitted scaler");
        Ok(self)
    }

    /// Scale the fitted columns of `df`; other columns pass through untouched.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(RiskError::ModelNotFitted);
        }

        // Build all scaled columns first, then apply them in one pass
        let replacements: Vec<Series> = self
            .columns
            .iter()
            .zip(&self.params)
            .map(|(col_name, params)| {
                let series = Self::float_column(df, col_name)?;
                Self::scale_series(&series, params)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result.with_column(scaled)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Fitted column names, in fit order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fitted statistics for `column`
    pub fn params(&self, column: &str) -> Option<&ScalerParams> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.params[i])
    }

    /// Whether `fit` has run
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn float_column(df: &DataFrame, col_name: &str) -> Result<Series> {
        let column = df
            .column(col_name)
            .map_err(|_| RiskError::FeatureNotFound(col_name.to_string()))?;
        Ok(column.as_materialized_series().cast(&DataType::Float64)?)
    }

    fn compute_params(series: &Series) -> Result<ScalerParams> {
        let ca = series.f64()?;

        let mean = ca
            .mean()
            .ok_or_else(|| RiskError::PreprocessingError(format!("column {} has no values", series.name())))?;
        let std = ca.std(0).unwrap_or(0.0);

        Ok(ScalerParams {
            mean,
            scale: if std == 0.0 { 1.0 } else { std },
        })
    }

    fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
        let ca = series.f64()?;

        let scaled: Float64Chunked = ca
            .into_iter()
            .map(|opt| opt.map(|v| (v - params.mean) / params.scale))
            .collect();

        Ok(scaled.with_name(series.name().clone()).into_series())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("a".into(), &[1.0, 2.0, 3.0, 4.0, 5.0]).into(),
            Series::new("b".into(), &[10i64, 10, 20, 20, 40]).into(),
            Series::new("label".into(), &[0i64, 1, 0, 1, 1]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let df = frame();
        let mut scaler = Scaler::new();
        let result = scaler.fit_transform(&df, &["a", "b"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        let mean: f64 = col.mean().unwrap();
        assert!(mean.abs() < 1e-10);
        let std = col.std(0).unwrap();
        assert!((std - 1.0).abs() < 1e-10);

        // Integer columns come back as Float64
        assert_eq!(result.column("b").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_population_std() {
        let mut scaler = Scaler::new();
        scaler.fit(&frame(), &["a"]).unwrap();
        let p = scaler.params("a").unwrap();
        assert!((p.mean - 3.0).abs() < 1e-12);
        assert!((p.scale - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_row_scales_to_zero() {
        let mut scaler = Scaler::new();
        scaler.fit(&frame(), &["a", "b"]).unwrap();

        let mean_row = DataFrame::new(vec![
            Series::new("a".into(), &[scaler.params("a").unwrap().mean]).into(),
            Series::new("b".into(), &[scaler.params("b").unwrap().mean]).into(),
        ])
        .unwrap();

        let scaled = scaler.transform(&mean_row).unwrap();
        for name in ["a", "b"] {
            let v = scaled.column(name).unwrap().f64().unwrap().get(0).unwrap();
            assert!(v.abs() < 1e-12, "{} = {}", name, v);
        }
    }

    #[test]
    fn test_unscaled_columns_pass_through() {
        let mut scaler = Scaler::new();
        let result = scaler.fit_transform(&frame(), &["a"]).unwrap();
        assert_eq!(result.column("label").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_constant_column_keeps_unit_scale() {
        let df = DataFrame::new(vec![Series::new("c".into(), &[3.0, 3.0, 3.0]).into()]).unwrap();
        let mut scaler = Scaler::new();
        let result = scaler.fit_transform(&df, &["c"]).unwrap();
        assert_eq!(scaler.params("c").unwrap().scale, 1.0);
        assert_eq!(result.column("c").unwrap().f64().unwrap().get(0), Some(0.0));
    }

    #[test]
    fn test_missing_column() {
        let mut scaler = Scaler::new();
        scaler.fit(&frame(), &["a", "b"]).unwrap();

        let partial = DataFrame::new(vec![Series::new("a".into(), &[1.0]).into()]).unwrap();
        let err = scaler.transform(&partial).unwrap_err();
        assert!(matches!(err, RiskError::FeatureNotFound(ref c) if c == "b"));
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler = Scaler::new();
        assert!(matches!(scaler.transform(&frame()), Err(RiskError::ModelNotFitted)));
    }
}
