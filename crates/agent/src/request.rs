use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use concierge_core::{products_from_value, Product};

/// Caller-supplied hints for one recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// `men` or `woman`; anything else is ignored
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_integer")]
    pub max_results: Option<i64>,
}

/// Input to [`crate::Concierge::recommend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default)]
    pub context: RequestContext,
    /// Per-call catalog snapshot. Anything other than an array counts as absent.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_products")]
    pub products: Option<Vec<Product>>,
}

impl RecommendRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.context.audience = Some(audience.into());
        self
    }

    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.context.max_results = Some(max_results);
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = Some(products);
        self
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned).unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned))
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value.as_f64().filter(|number| number.is_finite()).map(|number| number.trunc() as i64)
    }))
}

fn lenient_products<'de, D>(deserializer: D) -> Result<Option<Vec<Product>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(products_from_value(&value))
}
