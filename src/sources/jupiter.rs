use reqwest::Client;
use serde::Deserialize;

use super::{ProviderError, QuoteProvider};
use crate::models::{SwapQuote, SwapQuoteRequest};
use async_trait::async_trait;

/// Jupiter v6 quote API.
pub struct JupiterProvider {
    client: Client,
    base_url: String,
}

impl JupiterProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JupiterQuoteResponse {
    error: Option<String>,
    #[serde(rename = "outAmount")]
    out_amount: Option<String>,
    /// Jupiter has shipped this both as a string and as a number.
    #[serde(rename = "priceImpactPct")]
    price_impact_pct: Option<serde_json::Value>,
    #[serde(rename = "otherAmountThreshold")]
    other_amount_threshold: Option<String>,
    #[serde(rename = "routePlan")]
    route_plan: Option<Vec<JupiterRouteStep>>,
}

#[derive(Debug, Deserialize)]
struct JupiterRouteStep {
    #[serde(rename = "swapInfo")]
    swap_info: Option<JupiterSwapInfo>,
    percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct JupiterSwapInfo {
    label: Option<String>,
}

fn price_impact(value: Option<&serde_json::Value>) -> f64 {
    value
        .and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.parse::<f64>().ok()))
        })
        .unwrap_or(0.0)
}

fn route_labels(steps: Vec<JupiterRouteStep>) -> Vec<String> {
    steps
        .into_iter()
        .map(|step| {
            step.swap_info
                .and_then(|info| info.label)
                .or_else(|| step.percent.map(|p| p.to_string()))
                .unwrap_or_else(|| "unknown".to_string())
        })
        .collect()
}

fn into_quote(request: &SwapQuoteRequest, body: JupiterQuoteResponse) -> Option<SwapQuote> {
    if body.error.is_some() {
        return None;
    }
    let output_amount = body.out_amount?;

    let route = match body.route_plan {
        Some(steps) if !steps.is_empty() => route_labels(steps),
        _ => vec![request.input_mint.clone(), request.output_mint.clone()],
    };

    Some(SwapQuote {
        input_mint: request.input_mint.clone(),
        output_mint: request.output_mint.clone(),
        input_amount: request.amount_in.clone(),
        output_amount,
        price_impact: price_impact(body.price_impact_pct.as_ref()),
        slippage: request.slippage_pct,
        route,
        min_output_amount: body.other_amount_threshold.unwrap_or_else(|| "0".to_string()),
    })
}

#[async_trait]
impl QuoteProvider for JupiterProvider {
    fn name(&self) -> &'static str {
        "Jupiter"
    }

    async fn quote(&self, request: &SwapQuoteRequest) -> Result<Option<SwapQuote>, ProviderError> {
        let slippage_bps = (request.slippage_pct * 100.0).floor() as u32;
        let url = format!(
            "{}/quote?inputMint={}&outputMint={}&amount={}&slippageBps={}",
            self.base_url, request.input_mint, request.output_mint, request.amount_in, slippage_bps
        );

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == 429 {
            return Err(ProviderError::RateLimit);
        }
        // Jupiter answers 4xx for unroutable pairs; treat that as "no
        // quote" rather than a failure.
        if !resp.status().is_success() {
            return Ok(None);
        }

        let body: JupiterQuoteResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(into_quote(request, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SwapQuoteRequest {
        serde_json::from_value(serde_json::json!({
            "inputMint": "So11111111111111111111111111111111111111112",
            "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "amountIn": "1000000000",
            "slippagePct": 0.5
        }))
        .unwrap()
    }

    #[test]
    fn quote_response_maps_onto_wire_shape() {
        let body: JupiterQuoteResponse = serde_json::from_str(
            r#"{
                "outAmount": "24850000",
                "otherAmountThreshold": "24725750",
                "priceImpactPct": "0.0012",
                "routePlan": [
                    {"swapInfo": {"label": "Orca"}, "percent": 60},
                    {"swapInfo": {"label": "Raydium CLMM"}, "percent": 40}
                ]
            }"#,
        )
        .unwrap();

        let quote = into_quote(&request(), body).unwrap();
        assert_eq!(quote.output_amount, "24850000");
        assert_eq!(quote.min_output_amount, "24725750");
        assert_eq!(quote.price_impact, 0.0012);
        assert_eq!(quote.slippage, 0.5);
        assert_eq!(quote.route, ["Orca", "Raydium CLMM"]);
        assert_eq!(quote.input_amount, "1000000000");
    }

    #[test]
    fn upstream_error_field_means_no_quote() {
        let body: JupiterQuoteResponse =
            serde_json::from_str(r#"{"error": "No routes found"}"#).unwrap();
        assert!(into_quote(&request(), body).is_none());
    }

    #[test]
    fn missing_route_plan_falls_back_to_mint_pair() {
        let body: JupiterQuoteResponse = serde_json::from_str(
            r#"{"outAmount": "100", "priceImpactPct": 0.5}"#,
        )
        .unwrap();

        let quote = into_quote(&request(), body).unwrap();
        assert_eq!(quote.price_impact, 0.5);
        assert_eq!(
            quote.route,
            [
                "So11111111111111111111111111111111111111112",
                "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
            ]
        );
        assert_eq!(quote.min_output_amount, "0");
    }
}
