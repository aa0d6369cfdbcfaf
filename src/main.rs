use anyhow::{bail, Context, Result};
use sales_dashboard::{init_tracing, load_csv, BindingError, DashboardConfig, Dispatcher};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "usage:
  sales-dashboard summary [csv]
  sales-dashboard render <event> <value-json> [csv]";

fn main() -> Result<()> {
    let config = DashboardConfig::from_env();
    init_tracing(config.log_json);

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("summary") => {
            let path = data_path(&config, args.get(2));
            run_summary(path)?;
        }
        Some("render") => {
            let (Some(event), Some(raw_value)) = (args.get(2), args.get(3)) else {
                bail!("render needs <event> <value-json>\n{}", USAGE);
            };
            let path = data_path(&config, args.get(4));
            run_render(path, event, raw_value)?;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn data_path(config: &DashboardConfig, arg: Option<&String>) -> PathBuf {
    arg.map(PathBuf::from)
        .unwrap_or_else(|| config.data_path.clone())
}

fn run_summary(path: PathBuf) -> Result<()> {
    let table = load_csv(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let (min_date, max_date) = table.date_bounds();
    let total_sales: f64 = table.iter().map(|tx| tx.sales).sum();
    let total_profit: f64 = table.iter().map(|tx| tx.profit).sum();

    println!("📂 {}", path.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Transactions: {}", table.len());
    println!("Order dates:  {} → {}", min_date, max_date);
    println!("Sales:        {:.2}", total_sales);
    println!("Profit:       {:.2}", total_profit);
    println!("Regions:      {}", table.regions().join(", "));
    println!("Categories:   {}", table.categories().join(", "));

    Ok(())
}

fn run_render(path: PathBuf, event: &str, raw_value: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(raw_value)
        .with_context(|| format!("Value is not JSON: {}", raw_value))?;

    let table = load_csv(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let dispatcher = Dispatcher::new(Arc::new(table));

    let update = match dispatcher.dispatch_json(event, value) {
        Ok(update) => update,
        Err(e @ BindingError::UnknownEvent(_)) => {
            bail!("{} (events: {})", e, dispatcher.events().join(", "));
        }
        Err(e) => return Err(e.into()),
    };
    println!("{}", serde_json::to_string_pretty(&update)?);

    Ok(())
}
