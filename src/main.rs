// Entry point and terminal front-end.
//
// - Option [1] loads the visitor CSV through the dataset cache.
// - Option [2] picks which visitor types pass the filter.
// - Option [3] recomputes every view, prints previews and writes the
//   download CSV, the dashboard JSON and the map page.
// - Option [4] runs the ticket revenue simulator.
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wisata_dashboard::config::{AppConfig, Layout};
use wisata_dashboard::dashboard::{self, DashboardView};
use wisata_dashboard::error::LoadError;
use wisata_dashboard::filter::FilterSelection;
use wisata_dashboard::loader::{Dataset, DatasetCache};
use wisata_dashboard::output;
use wisata_dashboard::reports;
use wisata_dashboard::types::RevenueSimulation;
use wisata_dashboard::util;

const TITLE: &str =
    "Dashboard Analisis Kinerja dan Pemetaan Potensi Objek Wisata Kabupaten Kebumen";

#[derive(Parser)]
#[command(name = "wisata_dashboard")]
#[command(about = "Tourism visitation dashboard for Kabupaten Kebumen", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when it does not exist
    #[arg(short, long, value_name = "FILE", default_value = "dashboard.toml")]
    config: PathBuf,

    /// Visitor CSV, overrides the configured path
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Directory for the CSV download, dashboard JSON and map page
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Dashboard layout
    #[arg(short, long, value_enum)]
    layout: Option<Layout>,

    /// Ticket price in rupiah for the revenue simulator
    #[arg(short, long)]
    ticket_price: Option<u64>,

    /// Load, generate once with every visitor type selected, then exit
    #[arg(long, default_value_t = false)]
    batch: bool,
}

struct AppState {
    config: AppConfig,
    cache: DatasetCache,
    dataset: Option<Arc<Dataset>>,
    selection: Option<FilterSelection>,
}

impl AppState {
    /// Fetch the dataset through the cache, picking up source changes. The
    /// filter resets to every visitor type when the data changed.
    fn refresh(&mut self) -> Result<Arc<Dataset>, LoadError> {
        match self.cache.get() {
            Ok(data) => {
                let changed = self
                    .dataset
                    .as_ref()
                    .map_or(true, |old| !Arc::ptr_eq(old, &data));
                if changed || self.selection.is_none() {
                    self.selection = Some(FilterSelection::all(&data));
                }
                self.dataset = Some(Arc::clone(&data));
                Ok(data)
            }
            Err(e) => {
                self.dataset = None;
                self.selection = None;
                Err(e)
            }
        }
    }

    /// Revenue for the current selection against the freshest data.
    fn simulate_revenue(&mut self) -> Result<RevenueSimulation, LoadError> {
        let data = self.refresh()?;
        let selection = self.selection.clone().unwrap_or_default();
        let filtered = wisata_dashboard::filter::filter_by_visitor_types(&data.records, &selection);
        Ok(reports::simulate_revenue(&filtered, self.config.dashboard.ticket_price))
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn warn_no_data(err: &LoadError) {
    warn!(error = %err, "dataset unavailable");
    println!("Warning: {}.", err.headline());
    println!("  {}", err);
    println!("The dashboard is disabled until the data file can be loaded.\n");
}

fn handle_load(state: &mut AppState) {
    state.cache.invalidate();
    match state.refresh() {
        Ok(data) => {
            let report = &data.report;
            println!(
                "Processing dataset... ({} rows read, {} loaded from {})",
                util::format_int(report.total_rows),
                util::format_int(data.records.len()),
                data.source.display()
            );
            if report.skipped_rows > 0 {
                println!(
                    "Note: {} rows skipped due to missing site, visitor type or count.",
                    util::format_int(report.skipped_rows)
                );
            }
            if report.unknown_months > 0 {
                println!(
                    "Note: {} rows have an unrecognised month and are left out of the trend.",
                    util::format_int(report.unknown_months)
                );
            }
            if report.unmatched_sites > 0 {
                println!(
                    "Note: {} rows reference sites without map coordinates.",
                    util::format_int(report.unmatched_sites)
                );
            }
            println!("Visitor types: {}\n", data.visitor_types().join(", "));
        }
        Err(e) => warn_no_data(&e),
    }
}

fn handle_filter(state: &mut AppState) {
    let Some(data) = state.dataset.clone() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let available = data.visitor_types();
    let current = state.selection.clone().unwrap_or_default();
    println!("Available visitor types: {}", available.join(", "));
    println!("Currently selected: {}", current.types().join(", "));
    let input = read_line("Visitor types (comma separated, * for all): ");
    let selection = if input == "*" {
        FilterSelection::all(&data)
    } else {
        FilterSelection::parse(&input)
    };
    for t in selection.types() {
        if !available.contains(t) {
            println!("Note: '{}' does not occur in the data.", t);
        }
    }
    if selection.is_empty() {
        println!("No visitor type selected; every view will be empty.");
    }
    info!(selected = ?selection.types(), "filter changed");
    state.selection = Some(selection);
    println!("");
}

fn print_card(value: &str, title: &str, unit: &str) {
    println!("  {:<24} {:>22}   ({})", title, value, unit);
}

fn print_summary(view: &DashboardView) {
    let s = &view.summary;
    println!("{}\n", TITLE);
    print_card(&util::format_int(s.total_visitors), "JUMLAH PENGUNJUNG", "Total 2023");
    print_card(&util::format_int(s.total_sites), "JUMLAH OBJEK WISATA", "Objek Aktif");
    print_card(&s.top_site, "WISATA FAVORIT", "Terfavorit");
    print_card(&util::format_rating(s.avg_rating), "RATA-RATA RATING", "Kepuasan");
    if let Some(rev) = &view.revenue {
        print_card(
            &util::format_rupiah(rev.estimated_revenue),
            "ESTIMASI PENDAPATAN",
            &format!("Tiket {}", util::format_rupiah(rev.ticket_price)),
        );
    }
    println!("");
}

fn write_artifacts(view: &DashboardView, dir: &std::path::Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    output::write_records_csv(&dir.join(output::EXPORT_FILE), &view.filtered)?;
    output::write_json(&dir.join(output::DASHBOARD_FILE), view)?;
    output::write_map_html(&dir.join(output::MAP_FILE), &view.markers)?;
    info!(dir = %dir.display(), "dashboard artifacts written");
    Ok(())
}

fn handle_generate(state: &mut AppState) -> Result<()> {
    if state.dataset.is_none() {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    }
    let data = match state.refresh() {
        Ok(d) => d,
        Err(e) => {
            warn_no_data(&e);
            return Ok(());
        }
    };
    let selection = state.selection.clone().unwrap_or_default();
    let layout = state.config.dashboard.layout;
    let price = (layout == Layout::Simulator).then_some(state.config.dashboard.ticket_price);
    let view = dashboard::build(&data, &selection, layout.marker_shape(), price);
    let rows = state.config.output.preview_rows;

    print_summary(&view);
    if view.is_empty() {
        println!("Warning: no records match the selected visitor types.\n");
    }

    output::preview_panel("Traffic Wisata Bulanan", &view.monthly_trend, rows);
    output::preview_panel(
        &format!("Peta Sebaran Lokasi ({} markers)", view.markers.len()),
        &view.site_totals,
        rows,
    );
    output::preview_panel("Kategori Minat", &view.categories, rows);
    output::preview_origin_table("Asal Pengunjung", &view.visitor_origin, rows);
    output::preview_panel("Rating vs Kunjungan", &view.rating_vs_traffic, rows);
    if let Some(rev) = &view.revenue {
        output::preview_panel("Simulasi Pendapatan", &rev.by_site, rows);
    }

    let dir = state.config.output.dir.clone();
    write_artifacts(&view, &dir)?;
    println!(
        "Outputs saved to {} ({}, {}, {})\n",
        dir.display(),
        output::EXPORT_FILE,
        output::DASHBOARD_FILE,
        output::MAP_FILE
    );
    Ok(())
}

fn handle_revenue(state: &mut AppState) {
    if state.dataset.is_none() {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    }
    let input = read_line(&format!(
        "Ticket price in Rp [{}]: ",
        state.config.dashboard.ticket_price
    ));
    if !input.is_empty() {
        match input.replace(',', "").parse::<u64>() {
            Ok(p) => state.config.dashboard.ticket_price = p,
            Err(_) => {
                println!("Invalid price. Enter a whole number of rupiah, 0 or more.\n");
                return;
            }
        }
    }
    let sim = match state.simulate_revenue() {
        Ok(sim) => sim,
        Err(e) => {
            warn_no_data(&e);
            return;
        }
    };
    println!(
        "\n{} visitors x {} = {}\n",
        util::format_int(sim.total_visitors),
        util::format_rupiah(sim.ticket_price),
        util::format_rupiah(sim.estimated_revenue)
    );
    output::preview_panel("Simulasi Pendapatan", &sim.by_site, state.config.output.preview_rows);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(data) = cli.data {
        config.input.data_csv = data;
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if let Some(layout) = cli.layout {
        config.dashboard.layout = layout;
    }
    if let Some(price) = cli.ticket_price {
        config.dashboard.ticket_price = price;
    }

    let mut state = AppState {
        cache: DatasetCache::new(config.input.data_csv.clone()),
        config,
        dataset: None,
        selection: None,
    };

    if cli.batch {
        handle_load(&mut state);
        if state.dataset.is_none() {
            anyhow::bail!("no data loaded from {}", state.cache.path().display());
        }
        return handle_generate(&mut state);
    }

    loop {
        println!("{}", TITLE);
        println!("[1] Load the file");
        println!("[2] Filter visitor types");
        println!("[3] Generate dashboard");
        println!("[4] Simulate revenue");
        println!("[5] Exit\n");
        match read_line("Enter choice: ").as_str() {
            "1" => handle_load(&mut state),
            "2" => handle_filter(&mut state),
            "3" => {
                println!("");
                if let Err(e) = handle_generate(&mut state) {
                    eprintln!("Write error: {:#}\n", e);
                }
            }
            "4" => handle_revenue(&mut state),
            "5" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1 to 5.\n"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::File;
    use std::time::Duration;

    fn state_for(path: PathBuf) -> AppState {
        let mut config = AppConfig::default();
        config.input.data_csv = path.clone();
        config.dashboard.ticket_price = 1_000;
        AppState {
            cache: DatasetCache::new(path),
            config,
            dataset: None,
            selection: None,
        }
    }

    #[test]
    fn revenue_follows_source_changes() {
        let path = env::temp_dir().join("wisata_main_revenue.csv");
        fs::write(
            &path,
            "Nama_Wisata,Bulan,Tipe_Wisatawan,Jumlah_Pengunjung\nGoa Petruk,Mei,Domestik,5\n",
        )
        .unwrap();
        let mut state = state_for(path.clone());
        assert_eq!(state.simulate_revenue().unwrap().estimated_revenue, 5_000);

        let mtime = fs::metadata(&path).unwrap().modified().unwrap();
        fs::write(
            &path,
            "Nama_Wisata,Bulan,Tipe_Wisatawan,Jumlah_Pengunjung\nGoa Petruk,Mei,Domestik,8\n",
        )
        .unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime + Duration::from_secs(60))
            .unwrap();
        assert_eq!(state.simulate_revenue().unwrap().estimated_revenue, 8_000);

        fs::remove_file(&path).unwrap();
        assert!(state.simulate_revenue().is_err());
        assert!(state.dataset.is_none());
    }
}
