// Static metadata for every known tourism site in Kebumen.
//
// This is the single canonical table; the loader, the scatter view and the map
// popups all read from here. Names are matched after trimming whitespace.
use crate::types::Coordinates;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SiteMetadata {
    pub site_name: &'static str,
    pub coordinates: Coordinates,
    pub rating: f64,
    pub description: &'static str,
}

const SITES: &[(&str, f64, f64, f64, &str)] = &[
    ("Goa Jatijajar", -7.665, 109.432, 4.3, "Goa kapur alam dengan sungai bawah tanah."),
    ("Goa Petruk", -7.683, 109.418, 4.4, "Wisata susur goa alami yang menantang."),
    ("PAP Krakal", -7.595, 109.704, 4.1, "Pemandian air panas alami bersejarah."),
    ("Pantai Logending", -7.733, 109.390, 4.2, "Wisata hutan bakau dan muara sungai."),
    ("Pantai Petanahan", -7.787, 109.583, 4.2, "Pantai luas dengan hutan cemara udang."),
    ("Pantai Suwuk", -7.756, 109.475, 4.3, "Pantai keluarga dengan kebun binatang mini."),
    ("Waduk Sempor", -7.558, 109.489, 4.5, "Bendungan dengan pemandangan perbukitan hijau."),
    ("Waduk Wadaslintang", -7.584, 109.782, 4.5, "Waduk raksasa dengan panorama eksotis."),
];

pub static SITE_REGISTRY: Lazy<BTreeMap<&'static str, SiteMetadata>> = Lazy::new(|| {
    SITES
        .iter()
        .map(|&(name, lat, lon, rating, description)| {
            (
                name,
                SiteMetadata {
                    site_name: name,
                    coordinates: Coordinates { lat, lon },
                    rating,
                    description,
                },
            )
        })
        .collect()
});

/// Look up a site, ignoring incidental leading/trailing whitespace.
pub fn lookup(site_name: &str) -> Option<&'static SiteMetadata> {
    SITE_REGISTRY.get(site_name.trim())
}

pub fn coordinates_of(site_name: &str) -> Option<Coordinates> {
    lookup(site_name).map(|m| m.coordinates)
}

/// Mean rating over the whole registry. Independent of any filter.
pub fn average_rating() -> f64 {
    if SITE_REGISTRY.is_empty() {
        return 0.0;
    }
    SITE_REGISTRY.values().map(|m| m.rating).sum::<f64>() / SITE_REGISTRY.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_trims_whitespace() {
        let meta = lookup("  Pantai Suwuk ").unwrap();
        assert_eq!(meta.site_name, "Pantai Suwuk");
        assert_eq!(meta.rating, 4.3);
    }

    #[test]
    fn unknown_site_has_no_metadata() {
        assert!(lookup("Curug Sikulan").is_none());
        assert!(coordinates_of("Curug Sikulan").is_none());
    }

    #[test]
    fn ratings_stay_in_range() {
        for meta in SITE_REGISTRY.values() {
            assert!((0.0..=5.0).contains(&meta.rating), "{}", meta.site_name);
        }
    }

    #[test]
    fn average_rating_covers_all_sites() {
        // 4.3 + 4.4 + 4.1 + 4.2 + 4.2 + 4.3 + 4.5 + 4.5 = 34.5
        assert!((average_rating() - 34.5 / 8.0).abs() < 1e-9);
    }
}
