use crate::error::LoadError;
use crate::registry;
use crate::types::{Month, RawRow, VisitorRecord};
use crate::util::{clean_text, parse_count_safe};
use csv::{ReaderBuilder, StringRecord};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

pub const REQUIRED_COLUMNS: [&str; 4] =
    ["Nama_Wisata", "Bulan", "Tipe_Wisatawan", "Jumlah_Pengunjung"];

/// The whole visitor table, enriched with coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub source: PathBuf,
    pub records: Vec<VisitorRecord>,
    pub report: LoadReport,
}

/// What the loader had to work around while reading the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Rows dropped for a blank site or visitor type, or an invalid count.
    pub skipped_rows: usize,
    /// Rows kept without a month; they are left out of the trend only.
    pub unknown_months: usize,
    pub unmatched_sites: usize,
}

impl Dataset {
    /// Distinct visitor types in first-appearance order.
    pub fn visitor_types(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for r in &self.records {
            if !seen.iter().any(|t| t == &r.visitor_type) {
                seen.push(r.visitor_type.clone());
            }
        }
        seen
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == col) {
            return Err(LoadError::MissingColumn(col));
        }
    }
    let headers = StringRecord::from(headers.iter().map(str::trim).collect::<Vec<_>>());

    let mut records: Vec<VisitorRecord> = Vec::new();
    let mut report = LoadReport::default();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        report.total_rows += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = match record.deserialize::<RawRow>(Some(&headers)) {
            Ok(r) => r,
            Err(e) => {
                report.skipped_rows += 1;
                warn!(line, error = %e, "skipping unreadable row");
                continue;
            }
        };
        let record = match clean_row(row) {
            Ok(r) => r,
            Err(reason) => {
                report.skipped_rows += 1;
                warn!(line, reason, "skipping row");
                continue;
            }
        };
        if record.month.is_none() {
            report.unknown_months += 1;
            debug!(line, site = %record.site_name, "row has no recognised month");
        }
        if record.coordinates.is_none() {
            report.unmatched_sites += 1;
            debug!(line, site = %record.site_name, "site not in registry");
        }
        records.push(record);
    }

    info!(
        path = %path.display(),
        rows = records.len(),
        skipped = report.skipped_rows,
        unknown_months = report.unknown_months,
        unmatched_sites = report.unmatched_sites,
        "dataset loaded"
    );
    Ok(Dataset {
        source: path.to_path_buf(),
        records,
        report,
    })
}

/// Validate one row. Only the site, visitor type and count are required; an
/// unrecognised month is kept as `None`.
fn clean_row(row: RawRow) -> Result<VisitorRecord, &'static str> {
    let site_name = clean_text(row.site_name.as_deref()).ok_or("empty Nama_Wisata")?;
    let visitor_type =
        clean_text(row.visitor_type.as_deref()).ok_or("empty Tipe_Wisatawan")?;
    let visitor_count = parse_count_safe(row.visitor_count.as_deref())
        .ok_or("invalid Jumlah_Pengunjung")?;
    let month = row.month.as_deref().and_then(|m| m.parse::<Month>().ok());

    let coordinates = registry::coordinates_of(&site_name);
    Ok(VisitorRecord {
        site_name,
        month,
        visitor_type,
        visitor_count,
        coordinates,
    })
}

/// Owns the loaded dataset and reloads it when the source file changes.
///
/// Keyed by the file's modification time. Failed loads are not cached, so the
/// next `get` retries the file.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cached: Option<(SystemTime, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&mut self) -> Result<Arc<Dataset>, LoadError> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        if let Some((stamp, data)) = &self.cached {
            if *stamp == modified {
                debug!(path = %self.path.display(), "dataset cache hit");
                return Ok(Arc::clone(data));
            }
            info!(path = %self.path.display(), "source changed, reloading dataset");
        }
        self.cached = None;
        let data = Arc::new(load_dataset(&self.path)?);
        self.cached = Some((modified, Arc::clone(&data)));
        Ok(data)
    }

    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            debug!(path = %self.path.display(), "dataset cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}
