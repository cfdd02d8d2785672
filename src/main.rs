use house_search::aggregate;
use house_search::config::Config;
use house_search::scrapers::{RightmoveScraper, Scraper, ZooplaApiScraper};
use tracing::{info, Level};

const CONFIG_PATH: &str = "config.json";
const MIN_BEDROOMS: u32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 House Search - Cambridge rentals");
    info!("===================================");

    let config = Config::load(CONFIG_PATH)?;

    let scrapers: Vec<Box<dyn Scraper>> = vec![
        Box::new(RightmoveScraper::new()?),
        Box::new(ZooplaApiScraper::new(config.zoopla_key)?),
    ];

    let adverts = aggregate::collect_rentals(&scrapers).await?;
    let adverts = aggregate::filter_and_sort(adverts, MIN_BEDROOMS);

    info!("✅ {} adverts after filtering\n", adverts.len());

    for (i, advert) in adverts.into_iter().enumerate() {
        // the bedroom filter already ran, so narrowing cannot fail here
        // for any source that reports a description (both of ours do)
        let advert = advert.into_full()?;
        println!(
            "{}. £{:.2} pcm, {} beds ({:?})",
            i + 1,
            advert.price,
            advert.bedrooms,
            advert.website
        );
        println!("   {}", advert.link);
        if !advert.description.is_empty() {
            println!("   {}", advert.description);
        }
        println!();
    }

    Ok(())
}
