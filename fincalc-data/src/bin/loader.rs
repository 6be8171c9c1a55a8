use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fincalc_core::calculations::common::round_half_up;
use fincalc_core::calculations::{IncomeTaxCalculator, land_transfer_tax};
use fincalc_core::RateTableStore;
use fincalc_data::RateTableLoader;
use fincalc_data::logging::init_logging;
use rust_decimal::Decimal;

/// Load rate tables and print a summary of each year.
///
/// Without `--dir` the built-in tables are used. The directory layout is:
/// - brackets.csv: year, jurisdiction, lower_bound, upper_bound, rate
/// - contributions.csv: year, name, rate, max_insurable_earnings, exemption
/// - personal_amounts.csv: year, federal, provincial, federal_abatement
/// - credit_bands.csv, childcare.csv, lending_rules.csv (optional)
#[derive(Parser, Debug)]
#[command(name = "rate-table-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the rate-table CSV files
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Only report this year
    #[arg(short, long)]
    year: Option<i32>,

    /// Gross annual income to run through the selected year's table
    #[arg(short, long)]
    gross: Option<Decimal>,

    /// Purchase price to compute land-transfer duty for
    #[arg(short, long)]
    price: Option<Decimal>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let store = match &args.dir {
        Some(dir) => {
            println!("Loading rate tables from: {}", dir.display());
            RateTableLoader::load_dir(dir)
                .with_context(|| format!("Failed to load rate tables from: {}", dir.display()))?
        }
        None => {
            println!("Using built-in rate tables");
            RateTableStore::builtin().context("Built-in rate tables are invalid")?
        }
    };

    println!("Loaded {} rate tables: {:?}", store.len(), store.years());

    let years = match args.year {
        Some(year) => vec![year],
        None => store.years(),
    };

    for year in years {
        let table = store
            .load(year)
            .with_context(|| format!("No rate table for {year}"))?;

        println!();
        println!("{year}");
        println!(
            "  federal brackets:    {} (top rate {})",
            table.federal_brackets.brackets().len(),
            table.federal_brackets.top_rate()
        );
        println!(
            "  provincial brackets: {} (top rate {})",
            table.provincial_brackets.brackets().len(),
            table.provincial_brackets.top_rate()
        );
        for rule in &table.payroll_contributions {
            println!(
                "  {:<8} {} up to {} (max {})",
                rule.name,
                rule.rate,
                rule.max_insurable_earnings,
                round_half_up(rule.max_contribution())
            );
        }

        if let Some(gross) = args.gross {
            let net = IncomeTaxCalculator::new(&table)
                .compute_net(gross)
                .with_context(|| format!("Failed to compute net income for {gross}"))?
                .rounded();
            println!("  net income on {}:", net.gross_annual);
            println!("    federal tax:    {}", net.federal_tax);
            println!("    provincial tax: {}", net.provincial_tax);
            println!("    contributions:  {}", net.total_contributions());
            println!("    net annual:     {}", net.net_annual);
            println!("    net monthly:    {}", net.net_monthly);
            println!("    effective rate: {}", net.effective_rate);
            println!("    marginal rate:  {}", net.marginal_rate);
        }

        if let Some(price) = args.price {
            match &table.land_transfer_brackets {
                Some(brackets) => {
                    let duty = land_transfer_tax(price, brackets)
                        .with_context(|| format!("Failed to compute land-transfer duty for {price}"))?;
                    println!("  land-transfer duty on {price}: {}", round_half_up(duty));
                }
                None => println!("  no land-transfer schedule for {year}"),
            }
        }
    }

    Ok(())
}
