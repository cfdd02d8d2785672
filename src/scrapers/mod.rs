pub mod rightmove;
pub mod traits;
pub mod types;
pub mod zoopla_api;
pub mod zoopla_html;

pub use rightmove::RightmoveScraper;
pub use traits::Scraper;
pub use types::{Filter, Location};
pub use zoopla_api::ZooplaApiScraper;
pub use zoopla_html::ZooplaHtmlScraper;
