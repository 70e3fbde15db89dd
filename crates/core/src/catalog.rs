//! Catalog and taxonomy snapshots supplied by the host.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::domain::product::{products_from_value, Audience, Product};
use crate::intent::Taxonomy;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse `{path}` as JSON: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("catalog `{0}` is not a JSON array of products")]
    NotAnArray(PathBuf),
}

fn read_json(path: &Path) -> Result<Value, CatalogError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })
}

/// Loads a product snapshot. Individual malformed entries are skipped.
pub fn load_products(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let value = read_json(path)?;
    let products =
        products_from_value(&value).ok_or_else(|| CatalogError::NotAnArray(path.to_path_buf()))?;

    tracing::debug!(
        event_name = "concierge.catalog.loaded",
        path = %path.display(),
        products = products.len(),
        "loaded catalog snapshot"
    );

    Ok(products)
}

/// Loads a taxonomy allow-list. A malformed document yields an unrestricted taxonomy.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, CatalogError> {
    let value = read_json(path)?;
    let taxonomy = Taxonomy::from_value(&value);
    if taxonomy.is_empty() {
        tracing::warn!(
            event_name = "concierge.taxonomy.unrestricted",
            path = %path.display(),
            "taxonomy file carried no usable families"
        );
    }
    Ok(taxonomy)
}

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    name: &'static str,
    occasion: &'static [&'static str],
    vibe: &'static [&'static str],
    audience: Audience,
    in_stock: bool,
    price: f64,
}

const DEMO_PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "tailored-navy-suit",
        name: "Tailored Navy Suit",
        occasion: &["business", "formal", "wedding"],
        vibe: &["classic", "elegant"],
        audience: Audience::Men,
        in_stock: true,
        price: 420.0,
    },
    ProductSeed {
        id: "structured-blazer",
        name: "Structured Blazer",
        occasion: &["business"],
        vibe: &["modern", "minimalist"],
        audience: Audience::Woman,
        in_stock: true,
        price: 189.0,
    },
    ProductSeed {
        id: "silk-slip-dress",
        name: "Silk Slip Dress",
        occasion: &["date", "party"],
        vibe: &["romantic", "elegant"],
        audience: Audience::Woman,
        in_stock: true,
        price: 149.0,
    },
    ProductSeed {
        id: "linen-camp-shirt",
        name: "Linen Camp Shirt",
        occasion: &["vacation", "casual"],
        vibe: &["relaxed"],
        audience: Audience::Men,
        in_stock: true,
        price: 68.0,
    },
    ProductSeed {
        id: "sequin-jumpsuit",
        name: "Sequin Jumpsuit",
        occasion: &["party"],
        vibe: &["bold", "edgy"],
        audience: Audience::Woman,
        in_stock: false,
        price: 210.0,
    },
    ProductSeed {
        id: "embroidered-maxi",
        name: "Embroidered Maxi Dress",
        occasion: &["vacation", "wedding"],
        vibe: &["boho", "romantic"],
        audience: Audience::Woman,
        in_stock: true,
        price: 175.0,
    },
    ProductSeed {
        id: "leather-moto-jacket",
        name: "Leather Moto Jacket",
        occasion: &["casual", "date"],
        vibe: &["edgy", "bold"],
        audience: Audience::None,
        in_stock: true,
        price: 260.0,
    },
    ProductSeed {
        id: "velvet-dinner-jacket",
        name: "Velvet Dinner Jacket",
        occasion: &["formal", "party"],
        vibe: &["classic", "bold"],
        audience: Audience::Men,
        in_stock: false,
        price: 330.0,
    },
    ProductSeed {
        id: "merino-crewneck",
        name: "Merino Crewneck",
        occasion: &["casual", "business"],
        vibe: &["minimalist", "modern"],
        audience: Audience::None,
        in_stock: true,
        price: 95.0,
    },
];

/// Small built-in snapshot used when no catalog file is configured.
pub fn demo_catalog() -> Vec<Product> {
    DEMO_PRODUCT_SEEDS
        .iter()
        .map(|seed| {
            let product = Product::new(seed.id)
                .with_name(seed.name)
                .with_occasions(seed.occasion)
                .with_vibes(seed.vibe)
                .with_audience(seed.audience)
                .with_price(seed.price);
            if seed.in_stock {
                product
            } else {
                product.out_of_stock()
            }
        })
        .collect()
}
