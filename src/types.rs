use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// Row exactly as it appears in the source CSV. Everything is optional text so
/// the loader decides per field whether to skip the row or keep a gap.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Nama_Wisata")]
    pub site_name: Option<String>,
    #[serde(rename = "Bulan")]
    pub month: Option<String>,
    #[serde(rename = "Tipe_Wisatawan")]
    pub visitor_type: Option<String>,
    #[serde(rename = "Jumlah_Pengunjung")]
    pub visitor_count: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    Januari,
    Februari,
    Maret,
    April,
    Mei,
    Juni,
    Juli,
    Agustus,
    September,
    Oktober,
    November,
    Desember,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Januari,
        Month::Februari,
        Month::Maret,
        Month::April,
        Month::Mei,
        Month::Juni,
        Month::Juli,
        Month::Agustus,
        Month::September,
        Month::Oktober,
        Month::November,
        Month::Desember,
    ];

    /// Calendar position, 1 for Januari through 12 for Desember.
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::Januari => "Januari",
            Month::Februari => "Februari",
            Month::Maret => "Maret",
            Month::April => "April",
            Month::Mei => "Mei",
            Month::Juni => "Juni",
            Month::Juli => "Juli",
            Month::Agustus => "Agustus",
            Month::September => "September",
            Month::Oktober => "Oktober",
            Month::November => "November",
            Month::Desember => "Desember",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown month '{}'", s))
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One cleaned visitor row, enriched with the site's coordinates. `month` is
/// `None` when the source had a blank or unrecognised month; such rows still
/// count everywhere except the monthly trend.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitorRecord {
    pub site_name: String,
    pub month: Option<Month>,
    pub visitor_type: String,
    pub visitor_count: u64,
    pub coordinates: Option<Coordinates>,
}

/// Shape of the downloadable CSV; same columns as the source file.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Nama_Wisata")]
    pub site_name: &'a str,
    #[serde(rename = "Bulan")]
    pub month: Option<Month>,
    #[serde(rename = "Tipe_Wisatawan")]
    pub visitor_type: &'a str,
    #[serde(rename = "Jumlah_Pengunjung")]
    pub visitor_count: u64,
}

impl<'a> From<&'a VisitorRecord> for ExportRow<'a> {
    fn from(r: &'a VisitorRecord) -> Self {
        ExportRow {
            site_name: &r.site_name,
            month: r.month,
            visitor_type: &r.visitor_type,
            visitor_count: r.visitor_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Beach,
    Cave,
    Reservoir,
    HotSpring,
}

impl Category {
    /// Classify a site by name. Checked in a fixed order, so a name containing
    /// both "Pantai" and "Goa" is a beach.
    pub fn classify(site_name: &str) -> Category {
        if site_name.contains("Pantai") {
            Category::Beach
        } else if site_name.contains("Goa") {
            Category::Cave
        } else if site_name.contains("Waduk") {
            Category::Reservoir
        } else {
            Category::HotSpring
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Beach => "Beach",
            Category::Cave => "Cave",
            Category::Reservoir => "Reservoir",
            Category::HotSpring => "Hot Spring",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct SiteTotalRow {
    #[serde(rename = "Nama_Wisata")]
    #[tabled(rename = "Site")]
    pub site_name: String,
    #[serde(rename = "Jumlah_Pengunjung")]
    #[tabled(rename = "Visitors")]
    pub total: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct TrendRow {
    #[serde(rename = "Bulan")]
    #[tabled(rename = "Month")]
    pub month: Month,
    #[serde(rename = "Nama_Wisata")]
    #[tabled(rename = "Site")]
    pub site_name: String,
    #[serde(rename = "Jumlah_Pengunjung")]
    #[tabled(rename = "Visitors")]
    pub total: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CategoryRow {
    #[serde(rename = "Kategori")]
    #[tabled(rename = "Category")]
    pub category: Category,
    #[serde(rename = "Jumlah_Pengunjung")]
    #[tabled(rename = "Visitors")]
    pub total: u64,
    #[serde(rename = "Persen")]
    #[tabled(rename = "Share %", display_with = "display_pct")]
    pub share_pct: f64,
}

fn display_pct(v: &f64) -> String {
    format!("{:.0}%", v)
}

/// One row of the visitor-type × site pivot. `counts` lines up with
/// [`OriginTable::visitor_types`].
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OriginRow {
    pub site_name: String,
    pub counts: Vec<u64>,
    pub total: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct OriginTable {
    pub visitor_types: Vec<String>,
    pub rows: Vec<OriginRow>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RatingTrafficRow {
    #[serde(rename = "Nama_Wisata")]
    #[tabled(rename = "Site")]
    pub site_name: String,
    #[serde(rename = "Rating")]
    #[tabled(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "Jumlah_Pengunjung")]
    #[tabled(rename = "Visitors")]
    pub total: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RevenueRow {
    #[serde(rename = "Nama_Wisata")]
    #[tabled(rename = "Site")]
    pub site_name: String,
    #[serde(rename = "Jumlah_Pengunjung")]
    #[tabled(rename = "Visitors")]
    pub visitors: u64,
    #[serde(rename = "Pendapatan")]
    #[tabled(rename = "Revenue (Rp)")]
    pub revenue: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RevenueSimulation {
    pub ticket_price: u64,
    pub total_visitors: u64,
    pub estimated_revenue: u64,
    pub by_site: Vec<RevenueRow>,
}

/// Scalar KPI cards shown beside the charts.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SummaryStats {
    pub total_visitors: u64,
    pub total_sites: usize,
    pub top_site: String,
    pub avg_rating: f64,
    pub total_records: usize,
}
