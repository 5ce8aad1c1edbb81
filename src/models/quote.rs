use serde::{Deserialize, Deserializer, Serialize};

/// Swap quote request body.
///
/// `amountIn` and `slippagePct` accept either a JSON string or a JSON
/// number; clients send both forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteRequest {
    pub input_mint: String,
    pub output_mint: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount_in: String,
    #[serde(
        default = "default_slippage",
        deserialize_with = "f64_or_string"
    )]
    pub slippage_pct: f64,
}

fn default_slippage() -> f64 {
    0.5
}

impl SwapQuoteRequest {
    /// Schema-level validation; the quote provider assumes well-formed
    /// input past this point.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.input_mint.trim().is_empty() {
            return Err("Input token mint is required");
        }
        if self.output_mint.trim().is_empty() {
            return Err("Output token mint is required");
        }
        // Amounts are base units (lamports), so a plain unsigned integer.
        if self.amount_in.is_empty() || !self.amount_in.bytes().all(|b| b.is_ascii_digit()) {
            return Err("Amount must be an integer amount in base units");
        }
        if !(0.0..=100.0).contains(&self.slippage_pct) {
            return Err("Slippage must be between 0 and 100 percent");
        }
        Ok(())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(u64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

fn f64_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Swap quote as returned to clients. Amounts stay in base-unit strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub input_mint: String,
    pub output_mint: String,
    pub input_amount: String,
    pub output_amount: String,
    pub price_impact: f64,
    pub slippage: f64,
    pub route: Vec<String>,
    pub min_output_amount: String,
}
