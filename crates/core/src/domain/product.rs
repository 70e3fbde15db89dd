use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Who a product or a request is aimed at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Men,
    Woman,
    #[default]
    None,
}

impl Audience {
    /// Exact match on the two concrete audiences; anything else is `None`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "men" => Self::Men,
            "woman" => Self::Woman,
            _ => Self::None,
        }
    }

    /// `Some` only for a concrete audience.
    pub fn known(self) -> Option<Self> {
        match self {
            Self::None => None,
            other => Some(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Woman => "woman",
            Self::None => "none",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTags {
    #[serde(default, deserialize_with = "lenient_tag_list")]
    pub occasion: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tag_list")]
    pub vibe: Vec<String>,
}

/// Catalog record as supplied by the host. Read-only to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: ProductTags,
    #[serde(default, deserialize_with = "lenient_audience")]
    pub audience: Audience,
    /// Only an explicit `false` marks a product unavailable.
    #[serde(default = "default_in_stock", deserialize_with = "lenient_in_stock")]
    pub in_stock: bool,
    /// `None` when the catalog carried something other than a number.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
}

impl Product {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ProductId(id.into()),
            name: None,
            tags: ProductTags::default(),
            audience: Audience::None,
            in_stock: true,
            price: None,
        }
    }

    pub fn with_occasions(mut self, tags: &[&str]) -> Self {
        self.tags.occasion = tags.iter().map(|tag| (*tag).to_owned()).collect();
        self
    }

    pub fn with_vibes(mut self, tags: &[&str]) -> Self {
        self.tags.vibe = tags.iter().map(|tag| (*tag).to_owned()).collect();
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }
}

fn default_in_stock() -> bool {
    true
}

fn lenient_in_stock<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool() != Some(false))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    };
    Ok(ProductId(id))
}

fn lenient_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

/// Non-object tag blocks read as empty.
fn lenient_tags<'de, D>(deserializer: D) -> Result<ProductTags, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Keeps string entries and drops everything else.
fn lenient_tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_owned).collect())
        .unwrap_or_default())
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|price| price.is_finite()))
}

fn lenient_audience<'de, D>(deserializer: D) -> Result<Audience, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(Audience::from_label).unwrap_or_default())
}

/// Reads a catalog from an arbitrary JSON value.
///
/// Returns `None` when the value is not an array. Elements that do not parse
/// as a product record are skipped.
pub fn products_from_value(value: &Value) -> Option<Vec<Product>> {
    let entries = value.as_array()?;
    Some(
        entries
            .iter()
            .filter(|entry| entry.is_object())
            .filter_map(|entry| serde_json::from_value::<Product>(entry.clone()).ok())
            .collect(),
    )
}
