//! Dashboard aggregation.
//!
//! Fetches the four dashboard sources concurrently, reduces their outcomes
//! with a single rule (only the stats source may abort), and derives the
//! display metrics with a pure function. Aggregation never fails to its
//! caller: any failure yields [`DashboardSnapshot::fallback`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::{JoinError, JoinHandle};

use crate::errors::AppError;
use crate::models::dashboard::{
    DashboardSnapshot, DashboardStats, PercentChanges, SalesSummary, Timeframe,
};
use crate::models::financial::FinancialOverview;
use crate::models::sale::Sale;
use crate::models::tank::Tank;
use crate::upstream::UpstreamClient;

/// Price per liter used to value tank inventory when no per-tank price is known.
pub const DEFAULT_UNIT_PRICE: f64 = 500.0;

/// The four retrieval capabilities the aggregator depends on.
///
/// `Ok(None)` means the source answered without a payload.
pub trait DashboardSource: Send + Sync + 'static {
    fn fetch_dashboard_stats(
        &self,
    ) -> impl Future<Output = Result<Option<DashboardStats>, AppError>> + Send;

    fn fetch_financial_overview(
        &self,
    ) -> impl Future<Output = Result<Option<FinancialOverview>, AppError>> + Send;

    fn fetch_tanks(&self) -> impl Future<Output = Result<Option<Vec<Tank>>, AppError>> + Send;

    fn fetch_sales(&self) -> impl Future<Output = Result<Option<Vec<Sale>>, AppError>> + Send;
}

/// Settled result of one source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Data(T),
    Empty,
    Failed(String),
}

impl<T> SourceOutcome<T> {
    pub fn from_result(result: Result<Option<T>, AppError>) -> Self {
        match result {
            Ok(Some(data)) => Self::Data(data),
            Ok(None) => Self::Empty,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    fn from_task(result: Result<Result<Option<T>, AppError>, JoinError>) -> Self {
        match result {
            Ok(inner) => Self::from_result(inner),
            Err(e) if e.is_panic() => Self::Failed("retrieval task panicked".to_string()),
            Err(e) => Self::Failed(format!("retrieval task did not complete: {e}")),
        }
    }

    /// Payload of a secondary source; `Empty` and `Failed` both become the default.
    fn or_default(self, source: &'static str) -> T
    where
        T: Default,
    {
        match self {
            Self::Data(data) => data,
            Self::Empty => {
                tracing::debug!(source, "Dashboard source returned no data, using default");
                T::default()
            }
            Self::Failed(reason) => {
                tracing::warn!(source, reason = %reason, "Dashboard source failed, using default");
                T::default()
            }
        }
    }
}

/// Outcomes of all four sources after the join.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcomes {
    pub stats: SourceOutcome<DashboardStats>,
    pub financial: SourceOutcome<FinancialOverview>,
    pub tanks: SourceOutcome<Vec<Tank>>,
    pub sales: SourceOutcome<Vec<Sale>>,
}

/// Inputs to the derived-metrics computation once the sources are reduced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotInputs {
    pub financial: FinancialOverview,
    pub tanks: Vec<Tank>,
    pub sales: Vec<Sale>,
}

/// Constants the derived metrics depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsParams {
    pub unit_price: f64,
    pub changes: PercentChanges,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            unit_price: DEFAULT_UNIT_PRICE,
            changes: PercentChanges::default(),
        }
    }
}

/// Reduce the four outcomes. A failed stats source aborts with its reason;
/// secondary sources fall back to their defaults.
pub fn resolve_inputs(outcomes: SourceOutcomes) -> Result<SnapshotInputs, String> {
    if let SourceOutcome::Failed(reason) = outcomes.stats {
        return Err(reason);
    }

    Ok(SnapshotInputs {
        financial: outcomes.financial.or_default("financial_overview"),
        tanks: outcomes.tanks.or_default("tanks"),
        sales: outcomes.sales.or_default("sales"),
    })
}

/// Derive every snapshot field from already-fetched data. Pure.
pub fn compute_snapshot(inputs: SnapshotInputs, params: &MetricsParams) -> DashboardSnapshot {
    let SnapshotInputs {
        financial,
        tanks,
        sales,
    } = inputs;

    let inventory_value: f64 = tanks
        .iter()
        .map(|tank| tank.current_level * params.unit_price)
        .sum();
    let total_liters_sold: f64 = sales.iter().map(|sale| sale.quantity_liters).sum();

    let total_sales = financial.total_sales;
    let total_expenses = financial.total_expenses;
    let net_profit = financial.net_profit;
    let efficiency_ratio = efficiency_ratio(total_sales, total_expenses);
    let changes = params.changes;

    DashboardSnapshot {
        sales,
        expenses: Vec::new(),
        tanks,
        total_sales,
        total_expenses,
        net_profit,
        inventory_value,
        revenue: total_sales,
        revenue_percent_change: changes.revenue,
        fuel_sold: total_liters_sold,
        fuel_sold_percent_change: changes.fuel_sold,
        expenses_percent_change: changes.expenses,
        profit: net_profit,
        profit_percent_change: changes.profit,
        total_revenue: total_sales,
        revenue_change: changes.revenue,
        total_liters_sold,
        sales_volume_change: changes.fuel_sold,
        expenses_change: changes.expenses,
        efficiency_ratio,
        efficiency_change: changes.efficiency,
    }
}

/// Sales over expenses, or zero when there are no expenses.
fn efficiency_ratio(total_sales: f64, total_expenses: f64) -> f64 {
    if total_expenses > 0.0 {
        let ratio = total_sales / total_expenses;
        if ratio.is_finite() {
            return ratio;
        }
    }
    0.0
}

/// Builds dashboard snapshots from an injected [`DashboardSource`].
pub struct DashboardAggregator<S> {
    source: Arc<S>,
    params: MetricsParams,
    deadline: Option<Duration>,
}

impl<S> Clone for DashboardAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            params: self.params,
            deadline: self.deadline,
        }
    }
}

impl<S: DashboardSource> DashboardAggregator<S> {
    pub fn new(source: Arc<S>, params: MetricsParams) -> Self {
        Self {
            source,
            params,
            deadline: None,
        }
    }

    /// Give up and return the fallback if the sources have not all settled in time.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Fetch all sources and build a snapshot. Never fails.
    pub async fn get_dashboard_data(&self) -> DashboardSnapshot {
        let Some(outcomes) = self.fetch_all().await else {
            return DashboardSnapshot::fallback();
        };

        match resolve_inputs(outcomes) {
            Ok(inputs) => compute_snapshot(inputs, &self.params),
            Err(reason) => {
                tracing::error!(reason = %reason, "Dashboard stats unavailable, returning empty dashboard");
                DashboardSnapshot::fallback()
            }
        }
    }

    /// Run the four retrievals on their own tasks and wait for all of them.
    /// Returns `None` when the deadline elapses first.
    async fn fetch_all(&self) -> Option<SourceOutcomes> {
        let mut stats = self.spawn(|s| async move { s.fetch_dashboard_stats().await });
        let mut financial = self.spawn(|s| async move { s.fetch_financial_overview().await });
        let mut tanks = self.spawn(|s| async move { s.fetch_tanks().await });
        let mut sales = self.spawn(|s| async move { s.fetch_sales().await });

        let joined = async {
            tokio::join!(&mut stats, &mut financial, &mut tanks, &mut sales)
        };

        let settled = match self.deadline {
            None => Some(joined.await),
            Some(deadline) => tokio::time::timeout(deadline, joined).await.ok(),
        };

        let Some((stats_res, financial_res, tanks_res, sales_res)) = settled else {
            tracing::error!(
                deadline_ms = self.deadline.map_or(0, |d| d.as_millis() as u64),
                "Dashboard sources did not settle before the deadline"
            );
            stats.abort();
            financial.abort();
            tanks.abort();
            sales.abort();
            return None;
        };

        Some(SourceOutcomes {
            stats: SourceOutcome::from_task(stats_res),
            financial: SourceOutcome::from_task(financial_res),
            tanks: SourceOutcome::from_task(tanks_res),
            sales: SourceOutcome::from_task(sales_res),
        })
    }

    fn spawn<T, F, Fut>(&self, fetch: F) -> JoinHandle<Result<Option<T>, AppError>>
    where
        T: Send + 'static,
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = Result<Option<T>, AppError>> + Send + 'static,
    {
        tokio::spawn(fetch(Arc::clone(&self.source)))
    }
}

/// Current fuel level per tank; empty when the API fails or has no data.
pub async fn get_fuel_levels(client: &UpstreamClient) -> HashMap<String, f64> {
    match client.fuel_levels().await {
        Ok(levels) => levels.unwrap_or_default(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch fuel levels");
            HashMap::new()
        }
    }
}

/// Sales summary for `timeframe`; a zeroed summary when the API fails or has no data.
pub async fn get_sales_summary(client: &UpstreamClient, timeframe: Timeframe) -> SalesSummary {
    match client.sales_summary(timeframe).await {
        Ok(Some(summary)) => summary,
        Ok(None) => SalesSummary::empty(timeframe, Utc::now()),
        Err(e) => {
            tracing::error!(error = %e, timeframe = %timeframe, "Failed to fetch sales summary");
            SalesSummary::empty(timeframe, Utc::now())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// How a fake source answers one call.
    #[derive(Clone)]
    enum Reply<T> {
        Data(T),
        Empty,
        Error(&'static str),
        Panic,
    }

    impl<T> Reply<T> {
        fn resolve(self) -> Result<Option<T>, AppError> {
            match self {
                Reply::Data(data) => Ok(Some(data)),
                Reply::Empty => Ok(None),
                Reply::Error(msg) => Err(AppError::Upstream(msg.to_string())),
                Reply::Panic => panic!("simulated network fault"),
            }
        }
    }

    #[derive(Clone)]
    struct FakeSource {
        stats: Reply<DashboardStats>,
        financial: Reply<FinancialOverview>,
        tanks: Reply<Vec<Tank>>,
        sales: Reply<Vec<Sale>>,
        /// Per-source delay in milliseconds: stats, financial, tanks, sales.
        delays: [u64; 4],
    }

    impl FakeSource {
        fn healthy() -> Self {
            Self {
                stats: Reply::Data(DashboardStats::default()),
                financial: Reply::Data(FinancialOverview {
                    total_sales: 12_000.0,
                    total_expenses: 4_000.0,
                    net_profit: 8_000.0,
                }),
                tanks: Reply::Data(vec![tank("t1", 100.0), tank("t2", 50.0)]),
                sales: Reply::Data(vec![sale("s1", 20.0, 10_000.0), sale("s2", 30.0, 15_000.0)]),
                delays: [0; 4],
            }
        }

        async fn pause(&self, index: usize) {
            if self.delays[index] > 0 {
                tokio::time::sleep(Duration::from_millis(self.delays[index])).await;
            }
        }
    }

    impl DashboardSource for FakeSource {
        async fn fetch_dashboard_stats(&self) -> Result<Option<DashboardStats>, AppError> {
            self.pause(0).await;
            self.stats.clone().resolve()
        }

        async fn fetch_financial_overview(&self) -> Result<Option<FinancialOverview>, AppError> {
            self.pause(1).await;
            self.financial.clone().resolve()
        }

        async fn fetch_tanks(&self) -> Result<Option<Vec<Tank>>, AppError> {
            self.pause(2).await;
            self.tanks.clone().resolve()
        }

        async fn fetch_sales(&self) -> Result<Option<Vec<Sale>>, AppError> {
            self.pause(3).await;
            self.sales.clone().resolve()
        }
    }

    fn tank(id: &str, level: f64) -> Tank {
        Tank {
            id: id.to_string(),
            current_level: level,
            ..Default::default()
        }
    }

    fn sale(id: &str, liters: f64, amount: f64) -> Sale {
        Sale {
            id: id.to_string(),
            quantity_liters: liters,
            amount,
            ..Default::default()
        }
    }

    fn aggregator(source: FakeSource) -> DashboardAggregator<FakeSource> {
        DashboardAggregator::new(Arc::new(source), MetricsParams::default())
    }

    #[test]
    fn inventory_value_and_liters_sold() {
        let inputs = SnapshotInputs {
            financial: FinancialOverview::default(),
            tanks: vec![tank("t1", 100.0), tank("t2", 50.0)],
            sales: vec![sale("s1", 20.0, 0.0), sale("s2", 30.0, 0.0)],
        };
        let params = MetricsParams {
            unit_price: 500.0,
            ..Default::default()
        };
        let snapshot = compute_snapshot(inputs, &params);
        assert_eq!(snapshot.inventory_value, 75_000.0);
        assert_eq!(snapshot.total_liters_sold, 50.0);
        assert_eq!(snapshot.fuel_sold, 50.0);
        assert_eq!(snapshot.tanks.len(), 2);
        assert_eq!(snapshot.sales.len(), 2);
        assert!(snapshot.expenses.is_empty());
    }

    #[test]
    fn efficiency_ratio_guarded_when_no_expenses() {
        for total_sales in [0.0, 1.0, 9_999.0, f64::MAX] {
            let inputs = SnapshotInputs {
                financial: FinancialOverview {
                    total_sales,
                    total_expenses: 0.0,
                    net_profit: 0.0,
                },
                ..Default::default()
            };
            let snapshot = compute_snapshot(inputs, &MetricsParams::default());
            assert_eq!(snapshot.efficiency_ratio, 0.0);
        }
    }

    #[test]
    fn efficiency_ratio_stays_finite_on_overflow() {
        assert_eq!(efficiency_ratio(f64::MAX, f64::MIN_POSITIVE), 0.0);
        assert_eq!(efficiency_ratio(10.0, 4.0), 2.5);
        assert_eq!(efficiency_ratio(10.0, -4.0), 0.0);
    }

    #[test]
    fn aliases_mirror_financial_totals() {
        let inputs = SnapshotInputs {
            financial: FinancialOverview {
                total_sales: 900.0,
                total_expenses: 300.0,
                net_profit: 600.0,
            },
            ..Default::default()
        };
        let snapshot = compute_snapshot(inputs, &MetricsParams::default());
        assert_eq!(snapshot.revenue, 900.0);
        assert_eq!(snapshot.total_revenue, 900.0);
        assert_eq!(snapshot.profit, 600.0);
        assert_eq!(snapshot.net_profit, 600.0);
        assert_eq!(snapshot.efficiency_ratio, 3.0);
    }

    #[test]
    fn percent_changes_come_from_params() {
        let params = MetricsParams {
            unit_price: DEFAULT_UNIT_PRICE,
            changes: PercentChanges {
                revenue: 12.5,
                fuel_sold: 8.3,
                expenses: -5.2,
                profit: 15.7,
                efficiency: 3.2,
            },
        };
        let snapshot = compute_snapshot(SnapshotInputs::default(), &params);
        assert_eq!(snapshot.revenue_percent_change, 12.5);
        assert_eq!(snapshot.revenue_change, 12.5);
        assert_eq!(snapshot.fuel_sold_percent_change, 8.3);
        assert_eq!(snapshot.sales_volume_change, 8.3);
        assert_eq!(snapshot.expenses_percent_change, -5.2);
        assert_eq!(snapshot.expenses_change, -5.2);
        assert_eq!(snapshot.profit_percent_change, 15.7);
        assert_eq!(snapshot.efficiency_change, 3.2);

        let default = compute_snapshot(SnapshotInputs::default(), &MetricsParams::default());
        assert_eq!(default.revenue_percent_change, 0.0);
    }

    #[test]
    fn compute_is_idempotent() {
        let inputs = SnapshotInputs {
            financial: FinancialOverview {
                total_sales: 1234.56,
                total_expenses: 78.9,
                net_profit: 1155.66,
            },
            tanks: vec![tank("t1", 0.1), tank("t2", 0.2)],
            sales: vec![sale("s1", 1.1, 3.0)],
        };
        let params = MetricsParams::default();
        let first = compute_snapshot(inputs.clone(), &params);
        let second = compute_snapshot(inputs, &params);
        assert_eq!(first, second);
        assert_eq!(
            first.inventory_value.to_bits(),
            second.inventory_value.to_bits()
        );
        assert_eq!(
            first.efficiency_ratio.to_bits(),
            second.efficiency_ratio.to_bits()
        );
    }

    #[test]
    fn resolve_aborts_only_on_stats_failure() {
        let failed = SourceOutcomes {
            stats: SourceOutcome::Failed("down".to_string()),
            financial: SourceOutcome::Data(FinancialOverview::default()),
            tanks: SourceOutcome::Data(vec![tank("t1", 1.0)]),
            sales: SourceOutcome::Data(vec![]),
        };
        assert_eq!(resolve_inputs(failed).unwrap_err(), "down");

        let empty_stats = SourceOutcomes {
            stats: SourceOutcome::Empty,
            financial: SourceOutcome::Failed("x".to_string()),
            tanks: SourceOutcome::Empty,
            sales: SourceOutcome::Failed("y".to_string()),
        };
        assert_eq!(resolve_inputs(empty_stats).unwrap(), SnapshotInputs::default());
    }

    #[test]
    fn source_outcome_from_result() {
        let ok: SourceOutcome<i32> = SourceOutcome::from_result(Ok(Some(1)));
        assert_eq!(ok, SourceOutcome::Data(1));
        let empty: SourceOutcome<i32> = SourceOutcome::from_result(Ok(None));
        assert_eq!(empty, SourceOutcome::Empty);
        let failed: SourceOutcome<i32> =
            SourceOutcome::from_result(Err(AppError::Upstream("nope".to_string())));
        assert!(matches!(failed, SourceOutcome::Failed(ref msg) if msg == "Upstream error: nope"));
    }

    #[tokio::test]
    async fn happy_path_snapshot() {
        let snapshot = aggregator(FakeSource::healthy()).get_dashboard_data().await;
        assert_eq!(snapshot.total_sales, 12_000.0);
        assert_eq!(snapshot.total_expenses, 4_000.0);
        assert_eq!(snapshot.net_profit, 8_000.0);
        assert_eq!(snapshot.inventory_value, 75_000.0);
        assert_eq!(snapshot.total_liters_sold, 50.0);
        assert_eq!(snapshot.efficiency_ratio, 3.0);
        assert!(!snapshot.is_fallback());
    }

    #[tokio::test]
    async fn stats_failure_short_circuits_regardless_of_others() {
        let replies_ok = FakeSource::healthy();
        let mut all_bad = FakeSource::healthy();
        all_bad.financial = Reply::Error("financial down");
        all_bad.tanks = Reply::Panic;
        all_bad.sales = Reply::Empty;

        for mut source in [replies_ok, all_bad] {
            source.stats = Reply::Error("stats down");
            let snapshot = aggregator(source).get_dashboard_data().await;
            assert_eq!(snapshot, DashboardSnapshot::fallback());
        }
    }

    #[tokio::test]
    async fn secondary_failures_use_defaults() {
        let mut source = FakeSource::healthy();
        source.financial = Reply::Error("financial down");
        source.tanks = Reply::Empty;
        let snapshot = aggregator(source).get_dashboard_data().await;

        assert_eq!(snapshot.total_sales, 0.0);
        assert_eq!(snapshot.efficiency_ratio, 0.0);
        assert_eq!(snapshot.inventory_value, 0.0);
        assert!(snapshot.tanks.is_empty());
        assert_eq!(snapshot.total_liters_sold, 50.0);
        assert_eq!(snapshot.sales.len(), 2);
    }

    #[tokio::test]
    async fn every_secondary_combination_completes() {
        let healthy = FakeSource::healthy();
        for mask in 0u8..8 {
            let mut source = healthy.clone();
            if mask & 1 != 0 {
                source.financial = Reply::Error("financial");
            }
            if mask & 2 != 0 {
                source.tanks = Reply::Error("tanks");
            }
            if mask & 4 != 0 {
                source.sales = Reply::Empty;
            }
            let snapshot = aggregator(source).get_dashboard_data().await;

            let expected_sales = if mask & 1 != 0 { 0.0 } else { 12_000.0 };
            let expected_inventory = if mask & 2 != 0 { 0.0 } else { 75_000.0 };
            let expected_liters = if mask & 4 != 0 { 0.0 } else { 50.0 };
            assert_eq!(snapshot.total_sales, expected_sales, "mask {mask}");
            assert_eq!(snapshot.inventory_value, expected_inventory, "mask {mask}");
            assert_eq!(snapshot.total_liters_sold, expected_liters, "mask {mask}");
        }
    }

    #[tokio::test]
    async fn completion_order_does_not_matter() {
        let orders: [[u64; 4]; 4] = [
            [0, 10, 20, 30],
            [30, 20, 10, 0],
            [20, 0, 30, 10],
            [10, 30, 0, 20],
        ];
        let baseline = aggregator(FakeSource::healthy()).get_dashboard_data().await;
        for delays in orders {
            let mut source = FakeSource::healthy();
            source.delays = delays;
            let snapshot = aggregator(source).get_dashboard_data().await;
            assert_eq!(snapshot, baseline, "delays {delays:?}");
        }
    }

    #[tokio::test]
    async fn panicking_secondary_source_is_tolerated() {
        let mut source = FakeSource::healthy();
        source.sales = Reply::Panic;
        let snapshot = aggregator(source).get_dashboard_data().await;
        assert!(snapshot.sales.is_empty());
        assert_eq!(snapshot.total_liters_sold, 0.0);
        assert_eq!(snapshot.inventory_value, 75_000.0);
    }

    #[tokio::test]
    async fn panicking_stats_source_yields_fallback() {
        let mut source = FakeSource::healthy();
        source.stats = Reply::Panic;
        let snapshot = aggregator(source).get_dashboard_data().await;
        assert!(snapshot.is_fallback());
    }

    #[tokio::test]
    async fn deadline_elapsed_yields_fallback() {
        let mut source = FakeSource::healthy();
        source.delays = [2_000, 0, 0, 0];
        let aggregator = aggregator(source).with_deadline(Some(Duration::from_millis(20)));
        let snapshot = aggregator.get_dashboard_data().await;
        assert!(snapshot.is_fallback());
    }

    #[tokio::test]
    async fn deadline_not_reached_keeps_data() {
        let mut source = FakeSource::healthy();
        source.delays = [5, 5, 5, 5];
        let aggregator = aggregator(source).with_deadline(Some(Duration::from_secs(5)));
        let snapshot = aggregator.get_dashboard_data().await;
        assert_eq!(snapshot.inventory_value, 75_000.0);
    }
}
