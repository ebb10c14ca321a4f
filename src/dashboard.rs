//! One recomputation pass: filtered records in, every dashboard view out.

use crate::filter::{filter_by_visitor_types, FilterSelection};
use crate::loader::Dataset;
use crate::markers::{build_markers, MapMarker, MarkerShape};
use crate::reports;
use crate::types::{
    CategoryRow, OriginTable, RatingTrafficRow, RevenueSimulation, SiteTotalRow, SummaryStats,
    TrendRow, VisitorRecord,
};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub generated_at: DateTime<Local>,
    pub selected_visitor_types: Vec<String>,
    pub summary: SummaryStats,
    pub site_totals: Vec<SiteTotalRow>,
    pub monthly_trend: Vec<TrendRow>,
    pub categories: Vec<CategoryRow>,
    pub visitor_origin: OriginTable,
    pub rating_vs_traffic: Vec<RatingTrafficRow>,
    pub markers: Vec<MapMarker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueSimulation>,
    #[serde(skip)]
    pub filtered: Vec<VisitorRecord>,
}

impl DashboardView {
    /// True when nothing passed the filter; every chart is then skipped.
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

/// Filter the dataset and compute every view. `ticket_price` is only set in
/// the simulator layout.
pub fn build(
    dataset: &Dataset,
    selection: &FilterSelection,
    shape: MarkerShape,
    ticket_price: Option<u64>,
) -> DashboardView {
    let filtered = filter_by_visitor_types(&dataset.records, selection);
    info!(
        selected = ?selection.types(),
        rows = filtered.len(),
        of = dataset.records.len(),
        "recomputing dashboard"
    );

    let site_totals = reports::site_totals(&filtered);
    DashboardView {
        generated_at: Local::now(),
        selected_visitor_types: selection.types().to_vec(),
        summary: reports::generate_summary(&filtered),
        monthly_trend: reports::monthly_trend(&filtered),
        categories: reports::category_breakdown(&filtered),
        visitor_origin: reports::visitor_origin(&filtered),
        rating_vs_traffic: reports::rating_vs_traffic(&filtered),
        markers: build_markers(&site_totals, shape),
        revenue: ticket_price.map(|p| reports::simulate_revenue(&filtered, p)),
        site_totals,
        filtered,
    }
}
