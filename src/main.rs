use anyhow::Context;
use clap::Parser;
use concurso_map::utils::{logger, validation::Validate};
use concurso_map::{
    providers, render, scrape, AppConfig, CliConfig, GeocodeSource, LocalStorage,
    ResolutionPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting concurso-map");
    let config = AppConfig::load(&cli)?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("failed to build HTTP client")?;

    // Scrape the listing page into records.
    let html = scrape::fetch_page(&client, &config.source.listing_url).await?;
    let text = scrape::html_to_text(&html);
    let window = scrape::extract_window(&text, &config.source.start_marker, &config.source.end_marker)
        .with_context(|| {
            format!(
                "markers '{}'..'{}' not found in listing page",
                config.source.start_marker, config.source.end_marker
            )
        })?;
    let records = scrape::parse_records(&window, &config.source.state_tag);
    tracing::info!("Parsed {} listings", records.len());

    // Resolve coordinates through the provider cascade.
    let (cascade, recovery) = providers::standard_cascade(&config.geocoding, client);
    let pipeline = ResolutionPipeline::new(
        cascade,
        recovery,
        config.region_bounds(),
        config.politeness_delay(),
    );
    let summary = pipeline.run(records).await;

    tracing::info!("Summary:");
    for source in GeocodeSource::ALL {
        tracing::info!("  Found with {}: {}", source, summary.hits_for(source));
    }
    tracing::info!("  Institutions found within region: {}", summary.resolved_count());
    tracing::info!("  Out of region: {}", summary.out_of_region_count());
    tracing::info!("  Not found: {}", summary.not_found_count());
    tracing::info!("  Elapsed time: {:.1?}", summary.elapsed());

    // Render the map and the failure-bucket artifacts.
    let generated_on = chrono::Local::now().format("%d/%m/%Y").to_string();
    let map_html = render::render_map(&summary, config.region_bounds().center(), &generated_on);
    let storage = LocalStorage::new(config.output.path.clone());
    render::write_artifacts(&storage, &summary, &map_html, &config.output.map_filename).await?;

    tracing::info!(
        "✅ Map saved to {}/{}",
        config.output.path,
        config.output.map_filename
    );
    Ok(())
}
