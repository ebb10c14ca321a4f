use crate::registry;
use crate::types::{
    Category, CategoryRow, Month, OriginRow, OriginTable, RatingTrafficRow, RevenueRow,
    RevenueSimulation, SiteTotalRow, SummaryStats, TrendRow, VisitorRecord,
};
use std::collections::{BTreeMap, BTreeSet};

/// Shown in place of the top site when nothing passes the filter.
pub const NO_VALUE: &str = "-";

/// Ticket price the simulator starts from, in rupiah.
pub const DEFAULT_TICKET_PRICE: u64 = 10_000;

/// Visitor counts have no upper bound, so every total clamps at `u64::MAX`.
fn saturating_sum(values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

/// Visitor totals per site, sorted by site name.
pub fn site_totals(data: &[VisitorRecord]) -> Vec<SiteTotalRow> {
    let mut map: BTreeMap<&str, u64> = BTreeMap::new();
    for r in data {
        let total = map.entry(r.site_name.as_str()).or_default();
        *total = total.saturating_add(r.visitor_count);
    }
    map.into_iter()
        .map(|(site, total)| SiteTotalRow {
            site_name: site.to_string(),
            total,
        })
        .collect()
}

/// Site with the most visitors. Ties go to the alphabetically first site.
pub fn top_site(totals: &[SiteTotalRow]) -> Option<&SiteTotalRow> {
    totals
        .iter()
        .fold(None, |best: Option<&SiteTotalRow>, row| match best {
            Some(b) if b.total >= row.total => Some(b),
            _ => Some(row),
        })
}

pub fn generate_summary(data: &[VisitorRecord]) -> SummaryStats {
    let totals = site_totals(data);
    SummaryStats {
        total_visitors: saturating_sum(totals.iter().map(|r| r.total)),
        total_sites: totals.len(),
        top_site: top_site(&totals)
            .map(|r| r.site_name.clone())
            .unwrap_or_else(|| NO_VALUE.to_string()),
        avg_rating: registry::average_rating(),
        total_records: data.len(),
    }
}

/// Monthly totals per site, in calendar order then by site name. Rows without
/// a recognised month have no place on the time axis and are left out.
pub fn monthly_trend(data: &[VisitorRecord]) -> Vec<TrendRow> {
    let mut map: BTreeMap<(Month, &str), u64> = BTreeMap::new();
    for r in data {
        let Some(month) = r.month else { continue };
        let total = map.entry((month, r.site_name.as_str())).or_default();
        *total = total.saturating_add(r.visitor_count);
    }
    map.into_iter()
        .map(|((month, site), total)| TrendRow {
            month,
            site_name: site.to_string(),
            total,
        })
        .collect()
}

pub fn category_breakdown(data: &[VisitorRecord]) -> Vec<CategoryRow> {
    let mut map: BTreeMap<Category, u64> = BTreeMap::new();
    for r in data {
        let total = map.entry(Category::classify(&r.site_name)).or_default();
        *total = total.saturating_add(r.visitor_count);
    }
    let grand_total = saturating_sum(map.values().copied());
    let mut rows: Vec<CategoryRow> = map
        .into_iter()
        .map(|(category, total)| CategoryRow {
            category,
            total,
            share_pct: if grand_total == 0 {
                0.0
            } else {
                total as f64 / grand_total as f64 * 100.0
            },
        })
        .collect();
    // Stable sort keeps category order for equal totals.
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Visitor type × site pivot, zero-filled. Rows ascend by total so the
/// largest bar ends up on top of a horizontal bar chart.
pub fn visitor_origin(data: &[VisitorRecord]) -> OriginTable {
    let visitor_types: Vec<String> = data
        .iter()
        .map(|r| r.visitor_type.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut per_site: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for r in data {
        let col = visitor_types
            .iter()
            .position(|t| t == &r.visitor_type)
            .unwrap_or_default();
        let cell = &mut per_site
            .entry(r.site_name.as_str())
            .or_insert_with(|| vec![0; visitor_types.len()])[col];
        *cell = cell.saturating_add(r.visitor_count);
    }

    let mut rows: Vec<OriginRow> = per_site
        .into_iter()
        .map(|(site, counts)| OriginRow {
            site_name: site.to_string(),
            total: saturating_sum(counts.iter().copied()),
            counts,
        })
        .collect();
    rows.sort_by_key(|r| r.total);
    OriginTable { visitor_types, rows }
}

/// Per-site totals next to the registry rating; 0.0 when the site is unknown.
pub fn rating_vs_traffic(data: &[VisitorRecord]) -> Vec<RatingTrafficRow> {
    site_totals(data)
        .into_iter()
        .map(|row| RatingTrafficRow {
            rating: registry::lookup(&row.site_name)
                .map(|m| m.rating)
                .unwrap_or(0.0),
            site_name: row.site_name,
            total: row.total,
        })
        .collect()
}

/// Estimated ticket revenue, overall and per site (highest first).
pub fn simulate_revenue(data: &[VisitorRecord], ticket_price: u64) -> RevenueSimulation {
    let mut by_site: Vec<RevenueRow> = site_totals(data)
        .into_iter()
        .map(|row| RevenueRow {
            revenue: row.total.saturating_mul(ticket_price),
            visitors: row.total,
            site_name: row.site_name,
        })
        .collect();
    by_site.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    let total_visitors = saturating_sum(by_site.iter().map(|r| r.visitors));
    RevenueSimulation {
        ticket_price,
        total_visitors,
        estimated_revenue: total_visitors.saturating_mul(ticket_price),
        by_site,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(site: &str, month: Month, vt: &str, count: u64) -> VisitorRecord {
        VisitorRecord {
            site_name: site.to_string(),
            month: Some(month),
            visitor_type: vt.to_string(),
            visitor_count: count,
            coordinates: registry::coordinates_of(site),
        }
    }

    fn sample() -> Vec<VisitorRecord> {
        vec![
            rec("Pantai Suwuk", Month::Maret, "Domestik", 30_000),
            rec("Goa Jatijajar", Month::Januari, "Domestik", 1_000),
            rec("Pantai Suwuk", Month::Januari, "Domestik", 22_000),
            rec("Pantai Suwuk", Month::Januari, "Mancanegara", 500),
            rec("Waduk Sempor", Month::Desember, "Mancanegara", 4_000),
            rec("PAP Krakal", Month::Februari, "Domestik", 8_000),
        ]
    }

    #[test]
    fn site_totals_sum_per_site() {
        let totals = site_totals(&sample());
        let names: Vec<&str> = totals.iter().map(|r| r.site_name.as_str()).collect();
        assert_eq!(
            names,
            ["Goa Jatijajar", "PAP Krakal", "Pantai Suwuk", "Waduk Sempor"]
        );
        assert_eq!(totals[2].total, 52_500);
    }

    #[test]
    fn summary_reports_top_site() {
        let s = generate_summary(&sample());
        assert_eq!(s.top_site, "Pantai Suwuk");
        assert_eq!(s.total_sites, 4);
        assert_eq!(s.total_visitors, 65_500);
        assert_eq!(s.total_records, 6);
    }

    #[test]
    fn top_site_tie_goes_to_first_name() {
        let data = vec![
            rec("Waduk Sempor", Month::Mei, "Domestik", 10),
            rec("Goa Petruk", Month::Mei, "Domestik", 10),
        ];
        assert_eq!(generate_summary(&data).top_site, "Goa Petruk");
    }

    #[test]
    fn trend_follows_calendar_order() {
        let trend = monthly_trend(&sample());
        let months: Vec<Month> = trend.iter().map(|r| r.month).collect();
        assert_eq!(
            months,
            [
                Month::Januari,
                Month::Januari,
                Month::Februari,
                Month::Maret,
                Month::Desember
            ]
        );
        assert_eq!(trend[1].site_name, "Pantai Suwuk");
        assert_eq!(trend[1].total, 22_500);
    }

    #[test]
    fn categories_sorted_descending() {
        let rows = category_breakdown(&sample());
        let cats: Vec<Category> = rows.iter().map(|r| r.category).collect();
        assert_eq!(
            cats,
            [
                Category::Beach,
                Category::HotSpring,
                Category::Reservoir,
                Category::Cave
            ]
        );
        let share: f64 = rows.iter().map(|r| r.share_pct).sum();
        assert!((share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn classification_priority() {
        assert_eq!(Category::classify("Pantai Goa Cemara"), Category::Beach);
        assert_eq!(Category::classify("Goa Waduk"), Category::Cave);
        assert_eq!(Category::classify("Waduk Sempor"), Category::Reservoir);
        assert_eq!(Category::classify("PAP Krakal"), Category::HotSpring);
        assert_eq!(Category::classify(""), Category::HotSpring);
    }

    #[test]
    fn origin_pivot_zero_fills_and_sorts() {
        let table = visitor_origin(&sample());
        assert_eq!(table.visitor_types, ["Domestik", "Mancanegara"]);
        let first = &table.rows[0];
        assert_eq!(first.site_name, "Goa Jatijajar");
        assert_eq!(first.counts, vec![1_000, 0]);
        let last = table.rows.last().unwrap();
        assert_eq!(last.site_name, "Pantai Suwuk");
        assert_eq!(last.counts, vec![52_000, 500]);
        assert!(table.rows.windows(2).all(|w| w[0].total <= w[1].total));
    }

    #[test]
    fn rating_defaults_to_zero_for_unknown_site() {
        let data = vec![
            rec("Curug Sikulan", Month::Mei, "Domestik", 5),
            rec("Goa Petruk", Month::Mei, "Domestik", 7),
        ];
        let rows = rating_vs_traffic(&data);
        assert_eq!(rows[0].site_name, "Curug Sikulan");
        assert_eq!(rows[0].rating, 0.0);
        assert_eq!(rows[1].rating, 4.4);
    }

    #[test]
    fn revenue_multiplies_by_price() {
        let sim = simulate_revenue(&sample(), DEFAULT_TICKET_PRICE);
        assert_eq!(sim.total_visitors, 65_500);
        assert_eq!(sim.estimated_revenue, 655_000_000);
        assert_eq!(sim.by_site[0].site_name, "Pantai Suwuk");
        assert_eq!(simulate_revenue(&sample(), 0).estimated_revenue, 0);
    }

    #[test]
    fn revenue_saturates_instead_of_overflowing() {
        let data = vec![rec("Goa Petruk", Month::Mei, "Domestik", u64::MAX / 2)];
        assert_eq!(simulate_revenue(&data, 10).estimated_revenue, u64::MAX);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let half = u64::MAX / 2 + 1;
        let data = vec![
            rec("Goa Petruk", Month::Mei, "Domestik", half),
            rec("Goa Petruk", Month::Mei, "Mancanegara", half),
        ];
        assert_eq!(site_totals(&data)[0].total, u64::MAX);
        assert_eq!(monthly_trend(&data)[0].total, u64::MAX);
        assert_eq!(category_breakdown(&data)[0].total, u64::MAX);
        assert_eq!(visitor_origin(&data).rows[0].total, u64::MAX);
        assert_eq!(generate_summary(&data).total_visitors, u64::MAX);
        assert_eq!(simulate_revenue(&data, 1).total_visitors, u64::MAX);
    }

    #[test]
    fn trend_skips_rows_without_month() {
        let mut undated = rec("Goa Petruk", Month::Mei, "Domestik", 40);
        undated.month = None;
        let data = vec![undated, rec("Goa Petruk", Month::Juni, "Domestik", 2)];
        let trend = monthly_trend(&data);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].month, Month::Juni);
        assert_eq!(site_totals(&data)[0].total, 42);
    }

    #[test]
    fn empty_input_yields_empty_views() {
        let empty: Vec<VisitorRecord> = Vec::new();
        let s = generate_summary(&empty);
        assert_eq!(s.top_site, NO_VALUE);
        assert_eq!(s.total_visitors, 0);
        assert_eq!(s.total_sites, 0);
        assert!(site_totals(&empty).is_empty());
        assert!(monthly_trend(&empty).is_empty());
        assert!(category_breakdown(&empty).is_empty());
        assert_eq!(visitor_origin(&empty), OriginTable::default());
        assert!(rating_vs_traffic(&empty).is_empty());
        let sim = simulate_revenue(&empty, DEFAULT_TICKET_PRICE);
        assert_eq!(sim.estimated_revenue, 0);
        assert!(sim.by_site.is_empty());
    }
}
