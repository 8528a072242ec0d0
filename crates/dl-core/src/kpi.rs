//! KPI and growth-rate computation over transaction-like rows.
//!
//! Works on any table that can be projected to `(date, revenue, customer)`.
//! Growth compares the 30 days ending at the dataset's latest date against
//! the 30 days before that.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Length of each comparison window, in days.
pub const GROWTH_WINDOW_DAYS: i64 = 30;

/// One transaction-like row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub revenue: f64,
    pub customer: Option<String>,
}

/// Totals plus period-over-period growth, in percent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct KpiMetrics {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub active_customers: u64,
    pub avg_order_value: f64,
    pub revenue_growth: f64,
    pub order_growth: f64,
    pub customer_growth: f64,
    pub aov_growth: f64,
}

/// Percentage change from `previous` to `current`.
///
/// Returns exactly `0.0` unless `previous` is strictly positive, so the result
/// is never NaN or infinite.
#[must_use]
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Default)]
struct PeriodTotals {
    revenue: f64,
    orders: u64,
    customers: u64,
}

impl PeriodTotals {
    fn collect<'a>(rows: impl Iterator<Item = &'a Transaction>) -> Self {
        let mut totals = Self::default();
        let mut customers = HashSet::new();
        for row in rows {
            totals.revenue += row.revenue;
            totals.orders += 1;
            if let Some(customer) = row.customer.as_deref() {
                customers.insert(customer);
            }
        }
        totals.customers = customers.len() as u64;
        totals
    }

    fn avg_order_value(&self) -> f64 {
        if self.orders > 0 {
            self.revenue / self.orders as f64
        } else {
            0.0
        }
    }
}

/// Compute KPI totals and growth rates.
///
/// Empty input yields all zeros. When either the current or the previous
/// window holds no rows, every growth figure is zero.
#[must_use]
pub fn get_kpi_metrics(transactions: &[Transaction]) -> KpiMetrics {
    let Some(latest) = transactions.iter().map(|t| t.date).max() else {
        return KpiMetrics::default();
    };

    let all = PeriodTotals::collect(transactions.iter());
    let mut metrics = KpiMetrics {
        total_revenue: all.revenue,
        total_orders: all.orders,
        active_customers: all.customers,
        avg_order_value: all.avg_order_value(),
        ..KpiMetrics::default()
    };

    let current_start = latest - Duration::days(GROWTH_WINDOW_DAYS);
    let previous_start = current_start - Duration::days(GROWTH_WINDOW_DAYS);

    let current = PeriodTotals::collect(transactions.iter().filter(|t| t.date >= current_start));
    let previous = PeriodTotals::collect(
        transactions
            .iter()
            .filter(|t| t.date >= previous_start && t.date < current_start),
    );

    if current.orders == 0 || previous.orders == 0 {
        return metrics;
    }

    metrics.revenue_growth = growth_rate(current.revenue, previous.revenue);
    metrics.order_growth = growth_rate(current.orders as f64, previous.orders as f64);
    metrics.customer_growth = growth_rate(current.customers as f64, previous.customers as f64);
    metrics.aov_growth = growth_rate(current.avg_order_value(), previous.avg_order_value());
    metrics
}

/// One day of the revenue trend.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    /// Trailing mean over the short window (fewer days at the start).
    pub rolling_short: f64,
    /// Trailing mean over the long window (fewer days at the start).
    pub rolling_long: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrendReport {
    pub points: Vec<TrendPoint>,
    /// Least-squares slope of daily revenue per day index; 0 for fewer than two days.
    pub slope: f64,
}

fn trailing_mean(values: &[f64], end: usize, window: usize) -> f64 {
    let start = (end + 1).saturating_sub(window.max(1));
    let slice = &values[start..=end];
    slice.iter().sum::<f64>() / slice.len() as f64
}

fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (idx, y) in values.iter().enumerate() {
        let dx = idx as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }
    numerator / denominator
}

/// Daily revenue sums with rolling means and an overall slope.
///
/// Days with no transactions are not filled in; windows count the days that
/// are present.
#[must_use]
pub fn daily_trend(transactions: &[Transaction], short_window: usize, long_window: usize) -> TrendReport {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in transactions {
        *daily.entry(row.date).or_insert(0.0) += row.revenue;
    }

    let revenues: Vec<f64> = daily.values().copied().collect();
    let points = daily
        .keys()
        .enumerate()
        .map(|(idx, date)| TrendPoint {
            date: *date,
            revenue: revenues[idx],
            rolling_short: trailing_mean(&revenues, idx, short_window),
            rolling_long: trailing_mean(&revenues, idx, long_window),
        })
        .collect();

    TrendReport {
        points,
        slope: least_squares_slope(&revenues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap() - Duration::days(offset)
    }

    fn tx(offset: i64, revenue: f64, customer: &str) -> Transaction {
        Transaction {
            date: day(offset),
            revenue,
            customer: Some(customer.to_string()),
        }
    }

    #[test]
    fn growth_is_zero_when_previous_is_zero() {
        assert_eq!(growth_rate(500.0, 0.0), 0.0);
        assert_eq!(growth_rate(0.0, 0.0), 0.0);
        assert!(growth_rate(f64::MAX, 0.0).is_finite());
    }

    #[test]
    fn growth_is_percentage_change() {
        assert_eq!(growth_rate(150.0, 100.0), 50.0);
        assert_eq!(growth_rate(50.0, 100.0), -50.0);
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(get_kpi_metrics(&[]), KpiMetrics::default());
    }

    #[test]
    fn totals_cover_every_row() {
        let rows = vec![tx(0, 100.0, "a"), tx(1, 50.0, "b"), tx(90, 30.0, "a")];
        let metrics = get_kpi_metrics(&rows);
        assert_eq!(metrics.total_revenue, 180.0);
        assert_eq!(metrics.total_orders, 3);
        assert_eq!(metrics.active_customers, 2);
        assert_eq!(metrics.avg_order_value, 60.0);
    }

    #[test]
    fn growth_compares_adjacent_windows() {
        // current window: offsets 0..=30, previous: 31..=60
        let rows = vec![
            tx(0, 200.0, "a"),
            tx(10, 100.0, "b"),
            tx(40, 100.0, "a"),
            tx(45, 50.0, "a"),
            tx(100, 999.0, "z"),
        ];
        let metrics = get_kpi_metrics(&rows);
        assert_eq!(metrics.revenue_growth, 100.0);
        assert_eq!(metrics.order_growth, 0.0);
        assert_eq!(metrics.customer_growth, 100.0);
        assert_eq!(metrics.aov_growth, 100.0);
    }

    #[test]
    fn boundary_day_belongs_to_current_window() {
        let rows = vec![tx(0, 10.0, "a"), tx(30, 10.0, "b"), tx(31, 10.0, "c")];
        let metrics = get_kpi_metrics(&rows);
        // current has two orders, previous one
        assert_eq!(metrics.order_growth, 100.0);
    }

    #[test]
    fn empty_previous_window_reports_zero_growth() {
        let rows = vec![tx(0, 10.0, "a"), tx(5, 20.0, "b")];
        let metrics = get_kpi_metrics(&rows);
        assert_eq!(metrics.revenue_growth, 0.0);
        assert_eq!(metrics.order_growth, 0.0);
        assert_eq!(metrics.customer_growth, 0.0);
        assert_eq!(metrics.aov_growth, 0.0);
    }

    #[test]
    fn zero_previous_revenue_is_not_nan() {
        let rows = vec![tx(0, 100.0, "a"), tx(40, 0.0, "b")];
        let metrics = get_kpi_metrics(&rows);
        assert_eq!(metrics.revenue_growth, 0.0);
        assert_eq!(metrics.aov_growth, 0.0);
        assert_eq!(metrics.order_growth, 0.0);
    }

    #[test]
    fn rows_without_customers_count_zero_customers() {
        let rows = vec![
            Transaction { date: day(0), revenue: 5.0, customer: None },
            Transaction { date: day(40), revenue: 5.0, customer: None },
        ];
        let metrics = get_kpi_metrics(&rows);
        assert_eq!(metrics.active_customers, 0);
        assert_eq!(metrics.customer_growth, 0.0);
    }

    #[test]
    fn trend_groups_by_day_and_rolls() {
        let rows = vec![
            tx(2, 10.0, "a"),
            tx(2, 20.0, "b"),
            tx(1, 60.0, "a"),
            tx(0, 90.0, "a"),
        ];
        let report = daily_trend(&rows, 2, 30);
        assert_eq!(report.points.len(), 3);
        assert_eq!(report.points[0].revenue, 30.0);
        assert_eq!(report.points[0].rolling_short, 30.0);
        assert_eq!(report.points[1].rolling_short, 45.0);
        assert_eq!(report.points[2].rolling_short, 75.0);
        assert_eq!(report.points[2].rolling_long, 60.0);
        assert_eq!(report.slope, 30.0);
    }

    #[test]
    fn trend_slope_is_zero_for_single_day() {
        let report = daily_trend(&[tx(0, 10.0, "a")], 7, 30);
        assert_eq!(report.slope, 0.0);
        assert!(daily_trend(&[], 7, 30).points.is_empty());
    }
}
