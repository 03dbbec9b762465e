use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    CityConstraint, GenerationRequest, ItineraryGenerator, PexelsImageSearch, PlannerConfig,
};

/// CLI entry point for the itinerary generator
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let cities = matches
        .get_many::<String>("city")
        .unwrap_or_default()
        .map(|raw| parse_city_arg(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let request = GenerationRequest::new(cities)?;

    if matches.get_flag("prompt-only") {
        println!("{}", crate::generate_itinerary_prompt(&request));
        return Ok(());
    }

    let config = build_config(&matches)?;

    let mut generator = ItineraryGenerator::new(&config)?;
    if !matches.get_flag("no-images") {
        match PexelsImageSearch::from_env() {
            Ok(search) => generator = generator.with_image_search(Arc::new(search)),
            Err(err) => warn!("Image enrichment disabled: {}", err),
        }
    }

    info!("Using model: {}", generator.model());
    info!("Base URL: {}", config.base_url);

    match generator.generate(&request).await {
        Ok(itinerary) => {
            info!("{}", itinerary.summary());
            println!("{}", serde_json::to_string_pretty(&itinerary)?);
        }
        Err(e) => {
            error!("Itinerary generation failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

fn command() -> Command {
    Command::new("itinerary-gen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate an AI travel itinerary from per-city constraints")
        .arg(
            Arg::new("city")
                .short('c')
                .long("city")
                .value_name("NAME|START|END[|BUDGET[|COUNT]]")
                .help("City leg, e.g. \"Hanoi|2026-01-10|2026-01-12|5000000|6\" (repeatable)")
                .action(ArgAction::Append)
                .required(true),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Completion model (or set ITINERARY_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Completion API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Completion base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Deadline for the completion request"),
        )
        .arg(
            Arg::new("prompt-only")
                .long("prompt-only")
                .help("Print the generated prompt and exit without calling the model")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-images")
                .long("no-images")
                .help("Skip image enrichment even when PEXELS_API_KEY is set")
                .action(ArgAction::SetTrue),
        )
}

/// Environment config with command-line flags applied on top
fn build_config(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let mut config = match matches.get_one::<String>("api-key") {
        Some(api_key) => PlannerConfig::new(api_key.clone()).with_env_overrides(),
        None => PlannerConfig::from_env()?,
    };

    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.clone());
    }
    if let Some(timeout) = matches.get_one::<String>("timeout") {
        let seconds: u64 = timeout.parse().context("--timeout must be whole seconds")?;
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    Ok(config)
}

/// Parse `NAME|START|END[|BUDGET[|COUNT]]`; empty budget or count fields are skipped.
pub fn parse_city_arg(raw: &str) -> anyhow::Result<CityConstraint> {
    let parts: Vec<&str> = raw.split('|').map(str::trim).collect();
    if parts.len() < 3 || parts.len() > 5 {
        bail!("expected NAME|START|END[|BUDGET[|COUNT]], got `{}`", raw);
    }

    let parse_date = |value: &str| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("`{}` is not a YYYY-MM-DD date", value))
    };

    let mut city = CityConstraint::new(parts[0], parse_date(parts[1])?, parse_date(parts[2])?);

    if let Some(budget) = parts.get(3).filter(|v| !v.is_empty()) {
        city = city.with_budget(
            budget
                .parse()
                .with_context(|| format!("budget `{}` must be a positive integer", budget))?,
        );
    }
    if let Some(count) = parts.get(4).filter(|v| !v.is_empty()) {
        city = city.with_plan_count(
            count
                .parse()
                .with_context(|| format!("plan count `{}` must be a positive integer", count))?,
        );
    }

    Ok(city)
}
