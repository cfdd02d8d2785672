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

/// Canonical site root; result links are always absolute against this,
/// regardless of which host the search was fetched from
const RIGHTMOVE_URL: &str = "https://www.rightmove.co.uk";

const PROPERTY_TYPES: &str = "bungalow,detached,flat,semi-detached,terraced";

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.propertyCard").unwrap());
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".propertyCard-priceValue").unwrap());
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.propertyCard-title").unwrap());
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.propertyCard-link").unwrap());

/// Rightmove search-page scraper.
///
/// One request per search; the site returns the full result set for the
/// query in a single page.
pub struct RightmoveScraper {
    client: Client,
    base_url: String,
}

impl RightmoveScraper {
    pub fn new() -> Result<Self> {
        Self::with_base_url(RIGHTMOVE_URL.to_string())
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

    /// Normalize one search-results page into adverts.
    ///
    /// The listing page carries no description text, so `description` is
    /// always the empty string here.
    fn parse_results(&self, html: &str, ttype: TransactionType) -> Vec<Advert> {
        let document = Html::parse_document(html);
        let mut adverts = Vec::new();

        for card in document.select(&CARD) {
            let Some(href) = card
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .filter(|href| !href.is_empty())
            else {
                // placeholder card with no listing behind it
                continue;
            };

            let price = card
                .select(&PRICE)
                .next()
                .and_then(|tag| parse_price(&tag.text().collect::<String>()));
            let Some(price) = price else {
                debug!("Skipping card without a parsable price: {}", href);
                continue;
            };

            let bedrooms = card
                .select(&TITLE)
                .next()
                .and_then(|tag| parse_bedrooms(&tag.text().collect::<String>()));

            adverts.push(Advert {
                transaction_type: ttype,
                website: Website::Rightmove,
                price,
                bedrooms,
                link: format!("{}{}", RIGHTMOVE_URL, href),
                description: Some(String::new()),
            });
        }

        adverts
    }
}

/// Price text looks like "£1,200 pcm" or "£350,000"
fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim();
    let start = text.find('£')? + '£'.len_utf8();
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Bedroom count is the first number in the card title
/// ("2 bedroom flat"); titles like "Studio flat" carry none
fn parse_bedrooms(title: &str) -> Option<u32> {
    title
        .split_whitespace()
        .find_map(|token| token.parse::<u32>().ok())
}

#[async_trait]
impl Scraper for RightmoveScraper {
    async fn get_properties(
        &self,
        location: Location,
        ttype: TransactionType,
        _furnished: bool,
        filters: &[Filter],
    ) -> Result<Vec<Advert>> {
        let path = match ttype {
            TransactionType::Rent => "property-to-rent",
            TransactionType::Buy => "property-for-sale",
        };
        let dont_show = if filters.contains(&Filter::NoShare) {
            "houseShare,retirement,student"
        } else {
            "retirement"
        };
        let url = format!("{}/{}/find.html", self.base_url, path);

        info!("Starting Rightmove scrape for {:?}", location);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("locationIdentifier", location.rightmove_identifier()),
                ("propertyType", PROPERTY_TYPES),
                ("includeLetAgreed", "false"),
                ("mustHave", ""),
                ("dontShow", dont_show),
                ("keywords", ""),
            ])
            .send()
            .await
            .context("Failed to fetch Rightmove search page")?;

        if !response.status().is_success() {
            warn!("Rightmove returned status: {}", response.status());
            anyhow::bail!("Failed to fetch Rightmove search page: {}", response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());

        let adverts = self.parse_results(&html, ttype);
        info!("Rightmove returned {} adverts", adverts.len());
        Ok(adverts)
    }

    fn source_name(&self) -> &'static str {
        "Rightmove"
    }
}
