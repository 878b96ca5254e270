use deal_metrics::{
    compute_dashboard, format_currency, format_percent, render_summary_report, write_deal_metrics_csv,
    DashboardState, FilterSelection, RecordKind, RecordStore,
};
use std::fs::File;

fn main() -> deal_metrics::Result<()> {
    let mut store = RecordStore::sample();

    // Replace sample collections with CSV files named on the command line:
    //   cargo run --example portfolio_dashboard -- deals=deals.csv units=units.csv
    for arg in std::env::args().skip(1) {
        if let Some((kind, path)) = arg.split_once('=') {
            let kind: RecordKind = kind.parse()?;
            let loaded = store.import_csv(kind, File::open(path)?)?;
            println!("Loaded {} {} from {}", loaded, kind, path);
        }
    }

    let overview = compute_dashboard(&store, &DashboardState::default());
    println!("{}\n", render_summary_report(&overview));

    println!("Unit mix:");
    for point in &overview.metrics.unit_mix {
        println!(
            " - {:>4}: {} units, avg rent {}",
            point.name,
            point.count,
            format_currency(point.avg_rent)
        );
    }

    println!("\nNOI by period:");
    for point in &overview.metrics.noi_series {
        println!(
            " - {}: NOI {}, cash flow {}",
            point.period,
            format_currency(point.noi),
            format_currency(point.cash_flow)
        );
    }

    let Some(first_status) = overview.filter_options.statuses.get(1).cloned() else {
        println!("\nNo deals loaded.");
        return Ok(());
    };

    let first_deal = store.deals[0].id.clone();
    let state = DashboardState::default()
        .with_filter(FilterSelection::all().with_status(first_status.as_str()))
        .select_deal(first_deal);
    let filtered = compute_dashboard(&store, &state);

    println!("\n{}", render_summary_report(&filtered));
    if let Some(detail) = &filtered.selected {
        println!("\nRent upside by unit:");
        for unit in &detail.units {
            println!(
                " - {} ({}): {} [{:?}]",
                unit.unit.unit_number,
                unit.unit.occupancy_status,
                format_currency(unit.rent_upside),
                unit.direction()
            );
        }
        println!("LTV {}", format_percent(detail.metrics.ltv));
    }

    let path = std::env::temp_dir().join("deal_metrics.csv");
    write_deal_metrics_csv(&filtered.deal_table, File::create(&path)?)?;
    println!("\nWrote deal metrics to {}", path.display());

    Ok(())
}
