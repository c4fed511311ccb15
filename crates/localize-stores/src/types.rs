use std::fmt;

use serde::Deserialize;

/// Identifier that vendors send either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum FlexibleId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s.trim()),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// `{ value, formattedValue }` price object shared by both chains.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VendorPrice {
    pub value: f64,
    #[serde(default)]
    pub formatted_value: String,
}

impl From<VendorPrice> for localize_core::Price {
    fn from(price: VendorPrice) -> Self {
        Self {
            value: price.value,
            formatted_value: price.formatted_value,
        }
    }
}
