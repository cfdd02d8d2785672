use crate::models::{Advert, TransactionType, Website};
use crate::scrapers::traits::Scraper;
use crate::scrapers::types::{Filter, Location};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Canonical site root used to absolutize result links
const ZOOPLA_URL: &str = "https://zoopla.co.uk/";

static RESULTS_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.listing-results").unwrap());
static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".listing-results-wrapper").unwrap());
static RESULT_INFO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".listing-results-right").unwrap());
static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.text-price").unwrap());
static NUM_BEDS: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".num-beds").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Zoopla search-page scraper; no API key required.
///
/// Pages through the to-rent results pages until one yields no parsed
/// results.
pub struct ZooplaHtmlScraper {
    client: Client,
    base_url: String,
}

impl ZooplaHtmlScraper {
    pub fn new() -> Result<Self> {
        Self::with_base_url("https://www.zoopla.co.uk".to_string())
    }

    /// Point the scraper at a different host (for tests)
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    async fn fetch_page(&self, location: Location, page: usize) -> Result<String> {
        let area = location.zoopla_area();
        // "Cambridge, Cambridgeshire" becomes "cambridgeshire/cambridge"
        let path = area
            .split(',')
            .map(|part| part.trim().to_lowercase())
            .rev()
            .collect::<Vec<_>>()
            .join("/");
        let url = format!("{}/to-rent/property/{}/", self.base_url, path);

        debug!("Fetching URL: {} (page {})", url, page);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("price_frequency", "per_month"),
                ("q", area),
                ("results_sort", "newest_listings"),
                ("search_source", "home"),
            ])
            .query(&[("page_size", 100usize), ("pn", page)])
            .send()
            .await
            .context("Failed to fetch Zoopla search page")?;

        if !response.status().is_success() {
            warn!("Zoopla returned status: {}", response.status());
            anyhow::bail!("Failed to fetch Zoopla search page: {}", response.status());
        }

        response.text().await.context("Failed to read response body")
    }

    /// Normalize one search-results page into adverts.
    ///
    /// A result block with no parsable price aborts the scrape; the page
    /// markup has no structural marker for the true description, so the
    /// longest candidate paragraph wins.
    fn parse_page(&self, html: &str, ttype: TransactionType) -> Result<Vec<Advert>> {
        let document = Html::parse_document(html);
        let mut adverts = Vec::new();

        for listing in document.select(&RESULTS_LIST) {
            for result in listing.select(&RESULT) {
                let info = result
                    .select(&RESULT_INFO)
                    .next()
                    .context("Result block without listing details")?;
                let price_tag = info
                    .select(&PRICE)
                    .next()
                    .context("Result block without a price element")?;

                let price_text = price_tag.text().collect::<String>();
                let price = parse_pcm_price(&price_text)
                    .with_context(|| format!("Unparsable price text: {}", price_text.trim()))?;

                let href = price_tag
                    .value()
                    .attr("href")
                    .context("Price element without an href")?;
                let link = format!(
                    "{}{}",
                    ZOOPLA_URL,
                    href.split('?').next().unwrap_or(href)
                );

                let bedrooms = info
                    .select(&NUM_BEDS)
                    .next()
                    .and_then(|tag| tag.text().collect::<String>().trim().parse().ok());

                let description = info
                    .select(&PARAGRAPH)
                    .map(|p| p.text().collect::<String>().trim().to_string())
                    .max_by_key(String::len);

                adverts.push(Advert {
                    transaction_type: ttype,
                    website: Website::Zoopla,
                    price,
                    bedrooms,
                    link,
                    description,
                });
            }
        }

        Ok(adverts)
    }
}

/// Price text looks like "£1,250 pcm"
fn parse_pcm_price(text: &str) -> Option<f64> {
    let text = text.trim();
    let start = text.find('£')? + '£'.len_utf8();
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != ',')
        .unwrap_or(rest.len());
    if end == 0 || !rest[end..].starts_with(" pcm") {
        return None;
    }
    let digits: String = rest[..end].chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[async_trait]
impl Scraper for ZooplaHtmlScraper {
    async fn get_properties(
        &self,
        location: Location,
        ttype: TransactionType,
        _furnished: bool,
        _filters: &[Filter],
    ) -> Result<Vec<Advert>> {
        info!("Starting Zoopla page scrape for {:?}", location);

        let mut adverts = Vec::new();
        let mut page = 1;

        loop {
            let html = self.fetch_page(location, page).await?;
            let page_adverts = self.parse_page(&html, ttype)?;
            if page_adverts.is_empty() {
                break;
            }
            adverts.extend(page_adverts);
            page += 1;
        }

        info!("Zoopla pages yielded {} adverts", adverts.len());
        Ok(adverts)
    }

    fn source_name(&self) -> &'static str {
        "Zoopla"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <ul class="listing-results">
          <li class="listing-results-wrapper">
            <div class="listing-results-right">
              <a class="text-price" href="to-rent/details/201?search_identifier=abc">£1,250 pcm</a>
              <span class="num-beds">2</span>
              <p>2 bed flat</p>
              <p>Spacious two bedroom flat located centrally near the station</p>
            </div>
          </li>
          <li class="listing-results-wrapper">
            <div class="listing-results-right">
              <a class="text-price" href="to-rent/details/202">£900 pcm</a>
              <p>Cosy property close to the river</p>
            </div>
          </li>
        </ul>
        </body></html>
    "#;

    fn scraper() -> ZooplaHtmlScraper {
        ZooplaHtmlScraper::new().unwrap()
    }

    #[test]
    fn parses_results_into_adverts() {
        let adverts = scraper().parse_page(PAGE, TransactionType::Rent).unwrap();
        assert_eq!(adverts.len(), 2);

        assert_eq!(adverts[0].price, 1250.0);
        assert_eq!(adverts[0].bedrooms, Some(2));
        assert_eq!(adverts[0].website, Website::Zoopla);
    }

    #[test]
    fn link_drops_the_query_string() {
        let adverts = scraper().parse_page(PAGE, TransactionType::Rent).unwrap();
        assert_eq!(adverts[0].link, "https://zoopla.co.uk/to-rent/details/201");
    }

    #[test]
    fn longest_paragraph_wins_as_description() {
        let adverts = scraper().parse_page(PAGE, TransactionType::Rent).unwrap();
        assert_eq!(
            adverts[0].description.as_deref(),
            Some("Spacious two bedroom flat located centrally near the station")
        );
    }

    #[test]
    fn missing_bed_count_maps_to_none() {
        let adverts = scraper().parse_page(PAGE, TransactionType::Rent).unwrap();
        assert_eq!(adverts[1].bedrooms, None);
    }

    #[test]
    fn unparsable_price_aborts_the_page() {
        let html = r#"
            <ul class="listing-results">
              <li class="listing-results-wrapper">
                <div class="listing-results-right">
                  <a class="text-price" href="to-rent/details/203">POA</a>
                </div>
              </li>
            </ul>
        "#;
        assert!(scraper().parse_page(html, TransactionType::Rent).is_err());
    }

    #[test]
    fn pcm_price_parsing() {
        assert_eq!(parse_pcm_price("£1,250 pcm"), Some(1250.0));
        assert_eq!(parse_pcm_price("  £900 pcm  "), Some(900.0));
        assert_eq!(parse_pcm_price("£900 pw"), None);
        assert_eq!(parse_pcm_price("POA"), None);
    }

    #[test]
    fn empty_page_yields_no_adverts() {
        let adverts = scraper()
            .parse_page("<html><body></body></html>", TransactionType::Rent)
            .unwrap();
        assert!(adverts.is_empty());
    }
}
