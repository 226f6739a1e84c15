//! Substring heuristics that turn a fetched product page into a [`StockStatus`].

use crate::models::{SiteKind, StockStatus};

/// Phrase tables for one site. All phrases are lower-case.
#[derive(Debug)]
pub struct SiteRules {
    pub kind: SiteKind,
    /// Bot-block or interstitial pages. Any hit means the page says nothing about stock.
    pub block_markers: &'static [&'static str],
    /// Checked before `in_stock`; sold-out pages often still render a disabled "add to cart".
    pub out_of_stock: &'static [&'static str],
    pub in_stock: &'static [&'static str],
}

static POKEMON_CENTER_RULES: SiteRules = SiteRules {
    kind: SiteKind::PokemonCenter,
    block_markers: &["pardon our interruption", "made us think you were a bot"],
    out_of_stock: &[
        "out of stock",
        "sold out",
        "notify me",
        "notify me when back",
        "currently unavailable",
        "coming soon",
        "out-of-stock",
    ],
    in_stock: &["add to cart", "add to bag", "in stock", "buy now"],
};

static MEDIAMARKT_RULES: SiteRules = SiteRules {
    kind: SiteKind::MediaMarkt,
    block_markers: &[],
    out_of_stock: &["uitverkocht", "niet op voorraad", "niet beschikbaar", "out of stock"],
    in_stock: &["in winkelwagen", "bestel", "op voorraad", "add to cart"],
};

pub fn rules_for(kind: SiteKind) -> &'static SiteRules {
    match kind {
        SiteKind::PokemonCenter => &POKEMON_CENTER_RULES,
        SiteKind::MediaMarkt => &MEDIAMARKT_RULES,
    }
}

impl SiteRules {
    pub fn classify(&self, page_text: &str) -> StockStatus {
        let text = page_text.to_lowercase();
        let contains_any = |phrases: &[&str]| phrases.iter().any(|phrase| text.contains(phrase));

        if contains_any(self.block_markers) {
            return StockStatus::Unknown;
        }
        if contains_any(self.out_of_stock) {
            return StockStatus::OutOfStock;
        }
        if contains_any(self.in_stock) {
            return StockStatus::InStock;
        }
        StockStatus::Unknown
    }
}

pub fn classify(kind: SiteKind, page_text: &str) -> StockStatus {
    rules_for(kind).classify(page_text)
}

/// Like [`classify`], resolving the site from the URL host. Unsupported hosts are `Unknown`.
pub fn classify_url(url: &str, page_text: &str) -> StockStatus {
    match SiteKind::from_url(url) {
        Some(kind) => {
            let status = classify(kind, page_text);
            tracing::debug!("{} rules: {} -> {}", kind, url, status);
            status
        }
        None => {
            tracing::warn!("No stock rules for {}, status unknown", url);
            StockStatus::Unknown
        }
    }
}
