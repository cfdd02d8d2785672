use crate::models::{Advert, TransactionType, Website};
use crate::scrapers::traits::Scraper;
use crate::scrapers::types::{Filter, Location};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const ZOOPLA_API_URL: &str = "https://api.zoopla.co.uk";

const PAGE_SIZE: usize = 100;

/// Phrases marking a listing as shared or room-only accommodation
const DESCRIPTION_BLOCKLIST: &[&str] = &[
    "communal bathroom",
    "communal kitchen",
    "communal areas",
    "communal living room",
    "house share",
    "shared house",
    "communal entrance hall",
    "single room",
    "this room",
    "communal space",
    "communal study",
    "room available",
    "communal cleaner",
    "rooms available",
    "per person",
    "sharing",
    "shared",
    "sharer",
    "student accommodation",
];

#[derive(Debug, Deserialize)]
struct ListingsPage {
    #[serde(default)]
    listing: Vec<ApiListing>,
}

#[derive(Debug, Deserialize)]
struct ApiListing {
    price: f64,
    #[serde(default)]
    num_bedrooms: Option<u32>,
    #[serde(default)]
    num_bathrooms: u32,
    #[serde(default)]
    property_type: String,
    #[serde(default)]
    description: String,
    details_url: String,
    listing_status: String,
}

/// Zoopla listings API scraper (requires an API key).
///
/// Pages through `property_listings.json` until a page comes back with
/// fewer than [`PAGE_SIZE`] results.
pub struct ZooplaApiScraper {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ZooplaApiScraper {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, ZOOPLA_API_URL.to_string())
    }

    /// Point the scraper at a different host (for tests)
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    async fn fetch_page(
        &self,
        location: Location,
        ttype: TransactionType,
        page_number: usize,
    ) -> Result<ListingsPage> {
        let listing_status = match ttype {
            TransactionType::Rent => "rent",
            TransactionType::Buy => "sale",
        };
        let url = format!("{}/api/v1/property_listings.json", self.base_url);

        debug!("Fetching Zoopla API page {}", page_number);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("listing_status", listing_status),
                ("area", location.zoopla_area()),
                ("order_by", "price"),
                ("ordering", "ascending"),
            ])
            .query(&[("page_size", PAGE_SIZE), ("page_number", page_number)])
            .send()
            .await
            .context("Failed to fetch Zoopla listings page")?;

        if !response.status().is_success() {
            warn!("Zoopla API returned status: {}", response.status());
            anyhow::bail!("Failed to fetch Zoopla listings: {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to decode Zoopla listings response")
    }

    /// Normalize one page of API results, applying the exclusion filters
    fn collect_page(
        results: &[ApiListing],
        ttype: TransactionType,
        filters: &[Filter],
        adverts: &mut Vec<Advert>,
    ) {
        let no_share = filters.contains(&Filter::NoShare);

        for result in results {
            if result.property_type == "Parking/garage" {
                continue;
            }
            let description = result.description.to_lowercase();
            if no_share
                && DESCRIPTION_BLOCKLIST
                    .iter()
                    .any(|block| description.contains(block))
            {
                continue;
            }
            if no_share && result.num_bathrooms < 1 {
                continue;
            }

            // API rental prices are quoted per week
            let price = match ttype {
                TransactionType::Rent => result.price * 52.0 / 12.0,
                TransactionType::Buy => result.price,
            };

            adverts.push(Advert {
                // the result's own status wins, even if it diverges from
                // the requested transaction type
                transaction_type: if result.listing_status == "rent" {
                    TransactionType::Rent
                } else {
                    TransactionType::Buy
                },
                website: Website::Zoopla,
                price,
                bedrooms: result.num_bedrooms,
                link: result.details_url.clone(),
                description: Some(result.description.clone()),
            });
        }
    }
}

#[async_trait]
impl Scraper for ZooplaApiScraper {
    async fn get_properties(
        &self,
        location: Location,
        ttype: TransactionType,
        _furnished: bool,
        filters: &[Filter],
    ) -> Result<Vec<Advert>> {
        info!("Starting Zoopla API scrape for {:?}", location);

        let mut adverts = Vec::new();
        let mut page_number = 1;

        loop {
            let page = self.fetch_page(location, ttype, page_number).await?;
            Self::collect_page(&page.listing, ttype, filters, &mut adverts);

            // a full page may be the last one; that costs one extra request
            if page.listing.len() == PAGE_SIZE {
                page_number += 1;
            } else {
                break;
            }
        }

        info!("Zoopla API returned {} adverts", adverts.len());
        Ok(adverts)
    }

    fn source_name(&self) -> &'static str {
        "Zoopla"
    }
}
