//! `catalog` - query the fashion dashboard catalogs from the terminal.
//!
//! ```text
//! catalog venues '?category=runway&sortBy=price-low'
//! catalog venues '?category=runway' --set capacity=2000+ --set sortBy=rating
//! catalog transactions --set status=overdue,pending --json
//! ```
//!
//! The query argument is decoded leniently, exactly like a bookmarked URL.
//! Each `--set key=value` is then applied as a single-field edit, the view
//! is evaluated, and the canonical query string of the resulting state is
//! printed so it can be bookmarked again.

mod edit;
mod records;
mod render;
mod views;

use anyhow::Result;
use catalog_query::{CatalogQueryEngine, FieldAccessor, QueryState};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::edit::{apply_edit, parse_assignment};
use crate::records::Listing;
use crate::views::CatalogName;

/// Search, filter, sort and page the fashion dashboard catalogs.
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about)]
struct Cli {
    /// Catalog to list
    #[arg(value_enum)]
    catalog: CatalogName,

    /// Query string, e.g. '?category=runway&sortBy=price-low&page=2'
    query: Option<String>,

    /// Override the view's page size
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Edit one field of the query; may be repeated
    #[arg(long = "set", value_name = "KEY=VALUE")]
    edits: Vec<String>,

    /// Print the result page as JSON
    #[arg(long)]
    json: bool,

    /// Log evaluation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.catalog {
        CatalogName::Venues => run(&records::venues()?, &cli)?,
        CatalogName::Events => run(&records::events()?, &cli)?,
        CatalogName::Sponsors => run(&records::sponsors()?, &cli)?,
        CatalogName::Transactions => run(&records::transactions()?, &cli)?,
    };
    print!("{}", output);
    Ok(())
}

fn run<T>(records: &[T], cli: &Cli) -> Result<String>
where
    T: FieldAccessor + Listing + Serialize,
{
    let engine = CatalogQueryEngine::new(cli.catalog.config(cli.page_size)?)?;

    let mut state = engine.decode_query_string(cli.query.as_deref().unwrap_or_default());
    for raw in &cli.edits {
        let (key, value) = parse_assignment(raw)?;
        state = apply_edit(state, &key, &value, engine.config())?;
    }

    render_view(&engine, records, &state, cli.json)
}

fn render_view<T>(
    engine: &CatalogQueryEngine,
    records: &[T],
    state: &QueryState,
    json: bool,
) -> Result<String>
where
    T: FieldAccessor + Listing + Serialize,
{
    let page = engine.evaluate(records, state)?;
    if json {
        render::json(&page, state)
    } else {
        Ok(render::plain(&page, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("catalog").chain(args.iter().copied())).unwrap()
    }

    fn run_cli(args: &[&str]) -> Result<String> {
        let cli = cli(args);
        match cli.catalog {
            CatalogName::Venues => run(&records::venues()?, &cli),
            CatalogName::Events => run(&records::events()?, &cli),
            CatalogName::Sponsors => run(&records::sponsors()?, &cli),
            CatalogName::Transactions => run(&records::transactions()?, &cli),
        }
    }

    #[test]
    fn parses_arguments() {
        let cli = cli(&["venues", "?page=2", "--set", "category=runway", "--page-size", "3", "--json"]);
        assert_eq!(cli.catalog, CatalogName::Venues);
        assert_eq!(cli.query.as_deref(), Some("?page=2"));
        assert_eq!(cli.edits, ["category=runway"]);
        assert_eq!(cli.page_size, Some(3));
        assert!(cli.json);
    }

    #[test]
    fn runway_venues_by_price() {
        let out = run_cli(&["venues", "?category=runway&sortBy=price-low"]).unwrap();
        let lines: Vec<&str> = out.lines().take(3).collect();
        assert!(lines[0].starts_with("Palazzo Senato"));
        assert!(lines[1].starts_with("Old Sorting Office"));
        assert!(lines[2].starts_with("Grand Palais Ephemere"));
        assert!(out.contains("query: ?category=runway&sortBy=price-low"));
    }

    #[test]
    fn edits_apply_after_decoding() {
        let out = run_cli(&[
            "venues",
            "?category=runway&page=3",
            "--set",
            "capacity=2000+",
            "--set",
            "sortBy=rating",
        ])
        .unwrap();
        let lines: Vec<&str> = out.lines().take(2).collect();
        assert!(lines[0].starts_with("Grand Palais Ephemere"));
        assert!(lines[1].starts_with("Old Sorting Office"));
        assert!(out.contains("page 1 of 1 (2 matching"));
        assert!(out.contains("query: ?capacity=2000%2B&category=runway&sortBy=rating"));
    }

    #[test]
    fn sponsors_use_their_default_sort() {
        let out = run_cli(&["sponsors", "--set", "tier=platinum,gold", "--json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let names: Vec<&str> = value["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            ["Maison Ambre", "Lumen Cosmetics", "Cava Rosa", "Verity Watches"]
        );
        assert_eq!(value["query"], "?tier=gold%2Cplatinum");
    }

    #[test]
    fn lenient_query_strict_edits() {
        let out = run_cli(&["transactions", "?page=abc&sortBy=biggest&amount=lots"]).unwrap();
        assert!(out.contains("page 1 of 1 (10 matching"));
        assert!(out.contains("query: ?\n"));

        assert!(run_cli(&["transactions", "--set", "amount=lots"]).is_err());
    }

    #[test]
    fn overdue_transactions_page() {
        let out = run_cli(&[
            "transactions",
            "--set",
            "status=overdue",
            "--page-size",
            "1",
        ])
        .unwrap();
        assert!(out.starts_with("2026-04-02 INV-2026-0402"));
        assert!(out.contains("page 1 of 2 (2 matching, 1 per page)"));
        assert!(out.contains("next:  ?page=2&status=overdue"));
    }
}
