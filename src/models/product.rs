use serde::{Deserialize, Serialize};

use crate::models::{SiteKind, StockStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub url: String,
}

impl Product {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn site_kind(&self) -> Option<SiteKind> {
        SiteKind::from_url(&self.url)
    }
}

/// Outcome of checking one product during a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckReport {
    pub product: Product,
    pub status: StockStatus,
}

impl CheckReport {
    pub fn new(product: Product, status: StockStatus) -> Self {
        Self { product, status }
    }
}

/// The products tracked when no configuration overrides them.
pub fn default_products() -> Vec<Product> {
    vec![
        Product::new(
            "Pokémon TCG Perfect Order ETB",
            "https://www.pokemoncenter.com/product/10-10372-109/pokemon-tcg-mega-evolution-perfect-order-pokemon-center-elite-trainer-box",
        ),
        Product::new(
            "Pokémon TCG Ascended Heroes ETB",
            "https://www.pokemoncenter.com/product/10-10315-108/pokemon-tcg-mega-evolution-ascended-heroes-pokemon-center-elite-trainer-box",
        ),
        Product::new(
            "Pokémon TCG Ascended Heroes Booster Bundle",
            "https://www.pokemoncenter.com/product/10-10311-114/pokemon-tcg-mega-evolution-ascended-heroes-booster-bundle-6-packs",
        ),
        Product::new(
            "MediaMarkt Ascended Heroes ETB",
            "https://www.mediamarkt.nl/nl/product/_pokemon-ue-me025-ascended-heroes-etb-trading-cards-1895844.html",
        ),
    ]
}
