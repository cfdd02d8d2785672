use crate::models::Advert;
use crate::scrapers::traits::Scraper;
use anyhow::Result;
use std::cmp::Ordering;
use tracing::info;

/// Run every registered scraper against the fixed location and
/// concatenate the results in registry order.
///
/// Fail loud: the first scraper error aborts the run with no partial
/// results.
pub async fn collect_rentals(scrapers: &[Box<dyn Scraper>]) -> Result<Vec<Advert>> {
    let mut adverts = Vec::new();
    for scraper in scrapers {
        info!("Scraping {}", scraper.source_name());
        let mut found = scraper.get_cambridge_rentals().await?;
        info!("{} contributed {} adverts", scraper.source_name(), found.len());
        adverts.append(&mut found);
    }
    Ok(adverts)
}

/// Drop adverts without a known bedroom count or with fewer than
/// `min_bedrooms`, then sort ascending by price. The sort is stable, so
/// ties keep their concatenation order.
pub fn filter_and_sort(mut adverts: Vec<Advert>, min_bedrooms: u32) -> Vec<Advert> {
    adverts.retain(|advert| advert.bedrooms.is_some_and(|beds| beds >= min_bedrooms));
    adverts.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
    adverts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionType, Website};

    fn advert(link: &str, price: f64, bedrooms: Option<u32>) -> Advert {
        Advert {
            transaction_type: TransactionType::Rent,
            website: Website::Rightmove,
            price,
            bedrooms,
            link: link.to_string(),
            description: Some(String::new()),
        }
    }

    #[test]
    fn filters_then_sorts_by_price() {
        // two sources concatenated in adapter order
        let adverts = vec![
            advert("a", 1200.0, Some(2)),
            advert("b", 900.0, Some(1)),
            advert("c", 1000.0, Some(3)),
        ];

        let result = filter_and_sort(adverts, 2);

        let summary: Vec<(f64, Option<u32>)> =
            result.iter().map(|ad| (ad.price, ad.bedrooms)).collect();
        assert_eq!(summary, vec![(1000.0, Some(3)), (1200.0, Some(2))]);
    }

    #[test]
    fn unknown_bedroom_counts_are_dropped() {
        let result = filter_and_sort(vec![advert("a", 500.0, None)], 2);
        assert!(result.is_empty());
    }

    #[test]
    fn all_survivors_meet_the_minimum() {
        let adverts = vec![
            advert("a", 700.0, Some(4)),
            advert("b", 600.0, None),
            advert("c", 650.0, Some(0)),
            advert("d", 800.0, Some(2)),
        ];
        for advert in filter_and_sort(adverts, 2) {
            assert!(advert.bedrooms.unwrap() >= 2);
        }
    }

    #[test]
    fn price_ties_keep_concatenation_order() {
        let adverts = vec![
            advert("first", 1000.0, Some(2)),
            advert("second", 1000.0, Some(2)),
            advert("third", 1000.0, Some(2)),
        ];

        let links: Vec<String> = filter_and_sort(adverts, 2)
            .into_iter()
            .map(|ad| ad.link)
            .collect();
        assert_eq!(links, vec!["first", "second", "third"]);
    }
}
