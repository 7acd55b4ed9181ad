use serde::{Deserialize, Serialize};

/// Inbound comparison request. Wire field names are camelCase
/// (`currentPriceHUF`) to match the public endpoint contract.
#[derive(Clone, Debug, Deserialize)]
pub struct ComparisonRequest {
    pub query: String,
    #[serde(rename = "currentPriceHUF")]
    pub current_price_huf: HufAmount,
}

/// Candidate price as received on the wire. Callers send either a JSON
/// number or a numeric string ("250000"), so both shapes deserialize here
/// and are coerced at the boundary.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum HufAmount {
    Number(f64),
    Text(String),
}

impl HufAmount {
    /// Coerce to a finite f64. `None` marks the value as unusable and maps
    /// to a bad-request failure at the boundary.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.is_finite().then_some(*value),
            Self::Text(raw) => raw.trim().parse::<f64>().ok().filter(|value| value.is_finite()),
        }
    }
}

/// Price representation inside the agent's extracted item. The raw JSON
/// number or string is kept as-is so the response echoes exactly what the
/// agent produced; numeric interpretation is the normalizer's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(serde_json::Number),
    Text(String),
}

impl PriceValue {
    /// The string form the digit-stripping normalizer operates on.
    pub fn raw_string(&self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// The single cheapest listing extracted by the browsing agent. Constructed
/// only by the result parser and never mutated afterwards. `price` is
/// accepted as a wire alias for `price_huf`; the canonical key is used on
/// output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheapestItem {
    #[serde(alias = "price")]
    pub price_huf: PriceValue,
    pub store_name: String,
    pub product_url: String,
}

/// Successful comparison payload returned to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub cheapest: CheapestItem,
    pub suggestion: String,
}
