//! Rainreach CLI - weather-alert driven campaign geo targeting
//!
//! Usage:
//!   rainreach run                      # Run the targeting pipeline once
//!   rainreach run --dry-run            # Derive targets, touch no platform
//!   rainreach run -c custom.yaml       # Use an alternate config file
//!   rainreach campaigns                # List campaigns under the account
//!   rainreach resolve MDC031           # Resolve a zone code to ZIPs

use anyhow::Result;
use argh::FromArgs;

use rainreach::ads::{CampaignApi, GoogleAdsClient, MetaAdsClient};
use rainreach::alerts::AlertClient;
use rainreach::forecast::ForecastClient;
use rainreach::geo::GeoReference;
use rainreach::geocode::GeocodeClient;
use rainreach::{Config, Pipeline};

/// Rainreach - weather-alert driven campaign geo targeting
#[derive(FromArgs)]
struct Args {
    /// show version information
    #[argh(switch, short = 'V')]
    version: bool,

    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Run(RunArgs),
    Campaigns(CampaignsArgs),
    Resolve(ResolveArgs),
}

/// Run the targeting pipeline once
#[derive(FromArgs)]
#[argh(subcommand, name = "run")]
struct RunArgs {
    /// config file path (default: rainreach.yaml)
    #[argh(option, short = 'c', default = "String::from(\"rainreach.yaml\")")]
    config: String,

    /// derive and print targets without touching any ads platform
    #[argh(switch)]
    dry_run: bool,
}

/// List campaigns under the configured account
#[derive(FromArgs)]
#[argh(subcommand, name = "campaigns")]
struct CampaignsArgs {
    /// config file path (default: rainreach.yaml)
    #[argh(option, short = 'c', default = "String::from(\"rainreach.yaml\")")]
    config: String,
}

/// Resolve an alert zone code to counties and ZIPs
#[derive(FromArgs)]
#[argh(subcommand, name = "resolve")]
struct ResolveArgs {
    /// config file path (default: rainreach.yaml)
    #[argh(option, short = 'c', default = "String::from(\"rainreach.yaml\")")]
    config: String,

    /// UGC zone code (e.g. MDC031)
    #[argh(positional)]
    zone: String,
}

async fn run_pipeline(args: RunArgs) -> Result<()> {
    let config = Config::from_file(&args.config)?;

    let alerts = AlertClient::new(&config.alerts_url);
    let forecast = ForecastClient::from_env()?;
    let geocoder = GeocodeClient::from_env()?;

    if args.dry_run {
        let pipeline = Pipeline::new(config, alerts, forecast, geocoder)?;
        let plan = pipeline.plan().await;
        println!("fallback used: {}", plan.used_fallback);
        println!("zips ({}): {}", plan.zips.len(), plan.zips.join(", "));
        println!(
            "geo target ids ({}): {}",
            plan.geo_ids.len(),
            plan.geo_ids.join(", ")
        );
        return Ok(());
    }

    let ads = GoogleAdsClient::from_env(&config.google_ads.customer_id)?;
    let meta_client = match &config.meta {
        Some(_) => match MetaAdsClient::from_env() {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("[Main] Meta targeting disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let mut pipeline = Pipeline::new(config, alerts, forecast, geocoder)?;
    if let Some(client) = meta_client {
        pipeline = pipeline.with_meta_client(client);
    }

    let summary = pipeline.run(&ads).await;
    log::info!(
        "[Main] run complete: {} ZIPs, {} geo targets, fallback: {}, reconciled: {}, meta updated: {}",
        summary.zips.len(),
        summary.geo_ids.len(),
        summary.used_fallback,
        summary.reconciled,
        summary.meta_updated
    );
    Ok(())
}

async fn run_campaigns(args: CampaignsArgs) -> Result<()> {
    let config = Config::from_file(&args.config)?;
    let ads = GoogleAdsClient::from_env(&config.google_ads.customer_id)?;

    let campaigns = ads.list_campaigns().await?;
    if campaigns.is_empty() {
        println!("No campaigns found.");
        return Ok(());
    }
    for campaign in campaigns {
        println!(
            "ID: {}, Name: {}, Status: {}",
            campaign.id, campaign.name, campaign.status
        );
    }
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<()> {
    let config = Config::from_file(&args.config)?;
    let reference = GeoReference::load(&config.data.counties, &config.data.crosswalk)?;

    let counties = reference.counties.counties_for_zone(&args.zone);
    let zips = reference.zips_for_zone(&args.zone);
    println!("zone: {}", args.zone);
    println!("county fips ({}): {}", counties.len(), counties.join(", "));
    println!("zips ({}): {}", zips.len(), zips.join(", "));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    if args.version {
        println!("rainreach {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match args.command {
        // No subcommand = show help
        None => {
            eprintln!("Rainreach - weather-alert driven campaign geo targeting\n");
            eprintln!("Usage: rainreach <command>\n");
            eprintln!("Commands:");
            eprintln!("  run        Run the targeting pipeline once");
            eprintln!("               -c, --config <path>: config file (default: rainreach.yaml)");
            eprintln!("               --dry-run: derive targets, touch no platform");
            eprintln!("  campaigns  List campaigns under the configured account");
            eprintln!("  resolve    Resolve an alert zone code to counties and ZIPs");
            eprintln!("\nRun 'rainreach <command> --help' for more information.");
            Ok(())
        }
        Some(Command::Run(args)) => {
            run_pipeline(args).await?;
            Ok(())
        }
        Some(Command::Campaigns(args)) => {
            run_campaigns(args).await?;
            Ok(())
        }
        Some(Command::Resolve(args)) => {
            run_resolve(args)?;
            Ok(())
        }
    }
}
