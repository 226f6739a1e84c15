use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub mod product;

// Re-exports for convenience
pub use product::*;

/// Availability inferred from a single page check. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Unknown,
}

impl StockStatus {
    pub fn is_in_stock(self) -> bool {
        self == StockStatus::InStock
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockStatus::InStock => "in stock",
            StockStatus::OutOfStock => "out of stock",
            StockStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Which phrase ruleset applies to a page, derived from the product URL's host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SiteKind {
    PokemonCenter,
    MediaMarkt,
}

impl SiteKind {
    pub const ALL: [SiteKind; 2] = [SiteKind::PokemonCenter, SiteKind::MediaMarkt];

    /// Registrable domain the site is served from.
    pub fn domain(self) -> &'static str {
        match self {
            SiteKind::PokemonCenter => "pokemoncenter.com",
            SiteKind::MediaMarkt => "mediamarkt.nl",
        }
    }

    /// Matches the bare domain and any subdomain of it, case-insensitively.
    pub fn from_host(host: &str) -> Option<Self> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| {
            let domain = kind.domain();
            host == domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        parsed.host_str().and_then(Self::from_host)
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SiteKind::PokemonCenter => "Pokémon Center",
            SiteKind::MediaMarkt => "MediaMarkt",
        };
        f.write_str(label)
    }
}
