use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a listing is offered for rent or for sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    Rent,
    Buy,
}

/// Site a listing was scraped from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Website {
    Zoopla,
    Rightmove,
}

/// One normalized property listing.
///
/// Prices are monthly-equivalent: sources quoting per week are converted
/// at ingestion (`weekly * 52 / 12`), so fractional values are expected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Advert {
    pub transaction_type: TransactionType,
    pub website: Website,
    pub price: f64,
    /// Absent when the source did not report a bedroom count
    pub bedrooms: Option<u32>,
    /// Listing URL; doubles as the advert's identity
    pub link: String,
    /// Free text; an empty string means the source exposes no description
    pub description: Option<String>,
}

impl Advert {
    pub fn advert_id(&self) -> &str {
        &self.link
    }

    /// Narrow to a [`FullAdvert`], failing if `bedrooms` or `description`
    /// is missing.
    pub fn into_full(self) -> Result<FullAdvert> {
        let Some(bedrooms) = self.bedrooms else {
            bail!("advert {} is missing required field: bedrooms", self.link);
        };
        let Some(description) = self.description else {
            bail!("advert {} is missing required field: description", self.link);
        };
        Ok(FullAdvert {
            transaction_type: self.transaction_type,
            website: self.website,
            price: self.price,
            bedrooms,
            link: self.link,
            description,
        })
    }
}

/// An [`Advert`] whose bedroom count and description are guaranteed present,
/// for callers that need both defined (display, persistence)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullAdvert {
    pub transaction_type: TransactionType,
    pub website: Website,
    pub price: f64,
    pub bedrooms: u32,
    pub link: String,
    pub description: String,
}

/// Lifecycle of one advert identity across repeated scrapes.
///
/// Extension point for historical tracking; no driver consumes this yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertRecord {
    pub first_seen: DateTime<Utc>,
    /// Append-only snapshots, oldest first
    pub advert_history: Vec<Advert>,
    pub last_seen: Option<DateTime<Utc>>,
    pub removed: bool,
}

impl AdvertRecord {
    pub fn new(advert: Advert, seen_at: DateTime<Utc>) -> Self {
        Self {
            first_seen: seen_at,
            advert_history: vec![advert],
            last_seen: Some(seen_at),
            removed: false,
        }
    }

    /// Append a fresh snapshot and bump the last-seen timestamp
    pub fn observe(&mut self, advert: Advert, seen_at: DateTime<Utc>) {
        self.advert_history.push(advert);
        self.last_seen = Some(seen_at);
        self.removed = false;
    }

    /// Identity of the record: the most recent snapshot's link
    pub fn record_id(&self) -> &str {
        self.advert_history
            .last()
            .map(|advert| advert.advert_id())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advert(link: &str, bedrooms: Option<u32>, description: Option<&str>) -> Advert {
        Advert {
            transaction_type: TransactionType::Rent,
            website: Website::Zoopla,
            price: 1200.0,
            bedrooms,
            link: link.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn advert_identity_is_link() {
        let ad = advert("https://example.com/listing/1", Some(2), Some("Flat"));
        assert_eq!(ad.advert_id(), "https://example.com/listing/1");
    }

    #[test]
    fn into_full_succeeds_with_both_fields() {
        let full = advert("https://example.com/1", Some(3), Some(""))
            .into_full()
            .unwrap();
        assert_eq!(full.bedrooms, 3);
        assert_eq!(full.description, "");
    }

    #[test]
    fn into_full_rejects_missing_bedrooms() {
        let err = advert("https://example.com/1", None, Some("Flat"))
            .into_full()
            .unwrap_err();
        assert!(err.to_string().contains("bedrooms"));
    }

    #[test]
    fn into_full_rejects_missing_description() {
        let err = advert("https://example.com/1", Some(2), None)
            .into_full()
            .unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn record_tracks_latest_snapshot() {
        let t0 = Utc::now();
        let mut record = AdvertRecord::new(advert("https://example.com/a", Some(2), None), t0);
        assert_eq!(record.record_id(), "https://example.com/a");
        assert_eq!(record.first_seen, t0);

        let t1 = Utc::now();
        record.observe(advert("https://example.com/b", Some(2), None), t1);
        assert_eq!(record.record_id(), "https://example.com/b");
        assert_eq!(record.advert_history.len(), 2);
        assert_eq!(record.last_seen, Some(t1));
        assert_eq!(record.first_seen, t0);
    }
}
