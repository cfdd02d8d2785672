use crate::models::{Advert, TransactionType};
use crate::scrapers::types::{Filter, Location};
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for all property scrapers
/// Each source owns its own pagination and filtering, since the sites'
/// search semantics are incompatible
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Fetch and normalize listings for a location and transaction type.
    ///
    /// Errors from the underlying fetch or parse propagate unmodified;
    /// a failed page aborts the scrape with no partial results.
    async fn get_properties(
        &self,
        location: Location,
        ttype: TransactionType,
        furnished: bool,
        filters: &[Filter],
    ) -> Result<Vec<Advert>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;

    /// Rentals for the one configured location, with shared accommodation
    /// excluded
    async fn get_cambridge_rentals(&self) -> Result<Vec<Advert>> {
        self.get_properties(
            Location::Cambridge,
            TransactionType::Rent,
            false,
            &[Filter::NoShare],
        )
        .await
    }
}
