use clap::Args;
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Instant;

use property_returns_core::providers::{RandomSampleData, SampleDataProvider};
use property_returns_core::with_metadata;

use super::CommandResult;

/// Arguments for generating placeholder listings
#[derive(Args)]
pub struct SampleArgs {
    /// Generate a single record for this address
    #[arg(long, conflicts_with = "location")]
    pub address: Option<String>,

    /// Generate several listings in this suburb or city
    #[arg(long)]
    pub location: Option<String>,

    /// Highest listing price when searching
    #[arg(long, default_value = "1500000")]
    pub max_budget: Decimal,

    /// Number of listings when searching
    #[arg(long, default_value_t = 5)]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_sample_property(args: SampleArgs) -> CommandResult {
    let start = Instant::now();
    let mut source = match args.seed {
        Some(seed) => RandomSampleData::seeded(seed),
        None => RandomSampleData::new(),
    };

    let records = if let Some(ref address) = args.address {
        vec![source.property(address)]
    } else if let Some(ref location) = args.location {
        source.search(location, args.max_budget, args.count)
    } else {
        return Err("--address or --location is required".into());
    };

    let mut warnings = vec!["Sample listings are randomly generated, not market data".to_string()];
    if records.is_empty() {
        warnings.push(format!("No sample listing fits a budget of {}", args.max_budget));
    }

    let output = with_metadata(
        "Uniform random placeholder listings",
        &json!({
            "address": args.address,
            "location": args.location,
            "max_budget": args.max_budget.to_string(),
            "count": args.count,
            "seed": args.seed,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        records,
    );
    Ok(serde_json::to_value(output)?)
}
