//! Built-in weighted-moving-average predictor.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};

use restocker_core::ProductId;
use restocker_demand::DemandPoint;

use crate::error::ForecastError;
use crate::forecaster::Forecaster;
use crate::prediction::Prediction;

/// In-process predictor: per product, a weighted moving average over the
/// most recent demand points, with heavier weight on newer days. Useful when
/// no external predictor is deployed; not a contract on forecast quality.
#[derive(Debug, Clone)]
pub struct LocalForecaster {
    /// How many trailing demand points per product feed the average.
    window: usize,
    /// How far ahead the forecast date lands.
    horizon_days: i64,
}

impl Default for LocalForecaster {
    fn default() -> Self {
        Self {
            window: 7,
            horizon_days: 7,
        }
    }
}

impl LocalForecaster {
    pub fn new(window: usize, horizon_days: i64) -> Self {
        Self {
            window,
            horizon_days,
        }
    }

    fn forecast_date(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.horizon_days)
    }

    /// Weighted average over the last `window` values of a chronological
    /// series. Weight grows linearly toward the most recent value.
    fn weighted_average(&self, series: &[i64]) -> f64 {
        let start = series.len().saturating_sub(self.window);
        let window = &series[start..];
        if window.is_empty() {
            return 0.0;
        }

        let mut sum = 0.0;
        let mut weight_sum = 0.0;
        for (i, sold) in window.iter().enumerate() {
            let weight = (i + 1) as f64;
            sum += *sold as f64 * weight;
            weight_sum += weight;
        }

        sum / weight_sum
    }
}

#[async_trait::async_trait]
impl Forecaster for LocalForecaster {
    async fn predict(&self, demand: &[DemandPoint]) -> Result<Vec<Prediction>, ForecastError> {
        let mut per_product: BTreeMap<ProductId, Vec<(NaiveDate, i64)>> = BTreeMap::new();
        for point in demand {
            per_product
                .entry(point.product_id)
                .or_default()
                .push((point.date, point.quantity_sold));
        }

        let forecast_date = self.forecast_date(Utc::now().date_naive());

        let predictions = per_product
            .into_iter()
            .map(|(product_id, mut history)| {
                history.sort_by_key(|(date, _)| *date);
                let series: Vec<i64> = history.into_iter().map(|(_, sold)| sold).collect();
                Prediction {
                    product_id,
                    predicted: Some(self.weighted_average(&series)),
                    forecast_date: Some(forecast_date),
                }
            })
            .collect();

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_point(product_id: ProductId, day: u32, sold: i64) -> DemandPoint {
        DemandPoint {
            product_id,
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            quantity_sold: sold,
        }
    }

    #[test]
    fn weighted_average_weights_recent_days_heavier() {
        let forecaster = LocalForecaster::default();
        // weights 1, 2, 3 over [10, 20, 30] -> (10 + 40 + 90) / 6
        let avg = forecaster.weighted_average(&[10, 20, 30]);
        assert!((avg - 140.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_average_uses_only_the_trailing_window() {
        let forecaster = LocalForecaster::new(2, 7);
        // Only [20, 30] with weights 1, 2 -> 80 / 3
        let avg = forecaster.weighted_average(&[10, 20, 30]);
        assert!((avg - 80.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_average_of_empty_series_is_zero() {
        let forecaster = LocalForecaster::default();
        assert_eq!(forecaster.weighted_average(&[]), 0.0);
    }

    #[tokio::test]
    async fn predicts_one_entry_per_product_with_horizon_date() {
        let forecaster = LocalForecaster::default();
        let a = ProductId::new();
        let b = ProductId::new();
        let demand = vec![
            test_point(a, 10, 5),
            test_point(a, 11, 8),
            test_point(b, 10, 2),
        ];

        let predictions = forecaster.predict(&demand).await.unwrap();
        assert_eq!(predictions.len(), 2);

        let expected_date = Utc::now().date_naive() + Duration::days(7);
        for p in &predictions {
            assert_eq!(p.forecast_date, Some(expected_date));
            assert!(p.predicted.is_some());
        }
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_prediction_set() {
        let forecaster = LocalForecaster::default();
        let predictions = forecaster.predict(&[]).await.unwrap();
        assert!(predictions.is_empty());
    }
}
