//! Map markers for the site map.
//!
//! Every site with known coordinates becomes one marker; its colour comes from
//! the high-traffic threshold and, for the circle layout, its radius scales
//! linearly with the visitor total.

use crate::registry;
use crate::types::{Coordinates, SiteTotalRow};
use crate::util::{escape_html, format_int, format_rating};
use serde::Serialize;
use tracing::debug;

/// Totals strictly above this are drawn as high-traffic sites.
pub const HIGH_TRAFFIC_THRESHOLD: u64 = 50_000;

/// Visitors per unit of circle radius. Not clamped on purpose: very busy sites
/// dominate the map.
pub const RADIUS_DIVISOR: f64 = 30_000.0;

pub const MAP_CENTER: Coordinates = Coordinates { lat: -7.65, lon: 109.6 };
pub const MAP_ZOOM: u8 = 10;
pub const MAP_TILES: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";

pub const DESCRIPTION_PLACEHOLDER: &str = "Deskripsi belum tersedia.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficTier {
    HighTraffic,
    Normal,
}

impl TrafficTier {
    pub fn classify(total: u64) -> TrafficTier {
        if total > HIGH_TRAFFIC_THRESHOLD {
            TrafficTier::HighTraffic
        } else {
            TrafficTier::Normal
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TrafficTier::HighTraffic => "red",
            TrafficTier::Normal => "#039BE5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    /// Circle whose radius tracks the visitor total.
    ProportionalCircle,
    /// Fixed-size pin, coloured by tier.
    Pin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub site_name: String,
    pub position: Coordinates,
    pub total: u64,
    pub tier: TrafficTier,
    pub color: &'static str,
    pub radius: Option<f64>,
    pub tooltip: String,
    pub popup_html: String,
}

pub fn marker_radius(total: u64) -> f64 {
    total as f64 / RADIUS_DIVISOR
}

/// Build one marker per site that has coordinates. Unknown sites stay in the
/// tables and charts but are left off the map.
pub fn build_markers(totals: &[SiteTotalRow], shape: MarkerShape) -> Vec<MapMarker> {
    totals
        .iter()
        .filter_map(|row| {
            let Some(position) = registry::coordinates_of(&row.site_name) else {
                debug!(site = %row.site_name, "no coordinates, skipping marker");
                return None;
            };
            let tier = TrafficTier::classify(row.total);
            Some(MapMarker {
                site_name: row.site_name.clone(),
                position,
                total: row.total,
                tier,
                color: tier.color(),
                radius: match shape {
                    MarkerShape::ProportionalCircle => Some(marker_radius(row.total)),
                    MarkerShape::Pin => None,
                },
                tooltip: row.site_name.clone(),
                popup_html: popup_html(&row.site_name, row.total),
            })
        })
        .collect()
}

/// Popup card: name, rating badge, description and formatted total.
pub fn popup_html(site_name: &str, total: u64) -> String {
    let meta = registry::lookup(site_name);
    let rating = meta
        .map(|m| format_rating(m.rating))
        .unwrap_or_else(|| "-".to_string());
    let description = meta
        .map(|m| m.description)
        .unwrap_or(DESCRIPTION_PLACEHOLDER);
    format!(
        concat!(
            "<div style=\"font-family:sans-serif; width:200px\">",
            "<h5 style=\"margin-bottom:0px; color:#333\">{name}</h5>",
            "<span style=\"background-color:#2ecc71; color:white; padding:2px 6px; ",
            "border-radius:3px; font-size:11px;\">&#9733; {rating}</span>",
            "<p style=\"font-size:11px; margin-top:5px; color:#555\">{desc}</p>",
            "<hr style=\"margin:5px 0; border-top: 1px solid #eee;\">",
            "<b style=\"font-size:11px; color:#333\">Total: {total}</b>",
            "</div>"
        ),
        name = escape_html(site_name),
        rating = rating,
        desc = escape_html(description),
        total = format_int(total),
    )
}
