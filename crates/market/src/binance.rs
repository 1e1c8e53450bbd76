use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use common::{Candle, Error, MarketData, Result};

const BASE_URL: &str = "https://api.binance.com";

/// REST API client for Binance. Used for kline history and ticker queries.
pub struct BinanceClient {
    api_key: String,
    secret: String,
    http: Client,
}

impl BinanceClient {
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            http: Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    fn timestamp_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    fn sign(&self, query: &str) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn public_get(&self, path: &str, query: &str) -> Result<String> {
        let url = format!("{BASE_URL}{path}?{query}");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        // 429 = request rate limit, 418 = auto-ban for ignoring 429s
        if status.as_u16() == 429 || status.as_u16() == 418 {
            return Err(Error::DataSource(format!(
                "rate limited by exchange (HTTP {status})"
            )));
        }
        if !status.is_success() {
            return Err(Error::DataSource(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }

    async fn signed_get(&self, path: &str, params: &str) -> Result<String> {
        let ts = Self::timestamp_ms();
        let query = if params.is_empty() {
            format!("timestamp={ts}")
        } else {
            format!("{params}&timestamp={ts}")
        };
        let signature = self.sign(&query);
        let url = format!("{BASE_URL}{path}?{query}&signature={signature}");

        let resp = self
            .http
            .get(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::DataSource(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }

    /// Authenticated no-op against the account endpoint. Called once at
    /// startup so bad credentials abort the process instead of surfacing
    /// as alerts on every cycle.
    pub async fn verify_credentials(&self) -> Result<()> {
        debug!("Verifying exchange credentials");
        self.signed_get("/api/v3/account", "").await.map(|_| ())
    }
}

#[async_trait]
impl MarketData for BinanceClient {
    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let query = format!("symbol={symbol}&interval={interval}&limit={limit}");
        debug!(symbol = %symbol, interval = %interval, limit, "Fetching klines");
        let body = self.public_get("/api/v3/klines", &query).await?;
        parse_klines(&body)
    }

    async fn current_price(&self, symbol: &str) -> Result<f64> {
        let body = self
            .public_get("/api/v3/ticker/price", &format!("symbol={symbol}"))
            .await?;

        let ticker: PriceTicker =
            serde_json::from_str(&body).map_err(|e| Error::DataSource(e.to_string()))?;

        ticker
            .price
            .parse::<f64>()
            .map_err(|e| Error::DataSource(e.to_string()))
    }
}

// ─── Kline response parsing ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct PriceTicker {
    price: String,
}

/// Binance returns each kline as a mixed-type array:
/// `[open_time_ms, "open", "high", "low", "close", "volume", close_time_ms, ...]`.
fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let rows: Vec<Vec<serde_json::Value>> = serde_json::from_str(body)?;
    rows.iter().map(|row| parse_kline_row(row)).collect()
}

fn parse_kline_row(row: &[serde_json::Value]) -> Result<Candle> {
    if row.len() < 6 {
        return Err(Error::DataSource(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time_ms = row[0]
        .as_i64()
        .ok_or_else(|| Error::DataSource("kline open time is not an integer".to_string()))?;
    let open_time: DateTime<Utc> = Utc
        .timestamp_millis_opt(open_time_ms)
        .single()
        .ok_or_else(|| Error::DataSource(format!("kline open time out of range: {open_time_ms}")))?;

    let field = |idx: usize, name: &str| -> Result<f64> {
        row[idx]
            .as_str()
            .ok_or_else(|| Error::DataSource(format!("kline {name} is not a string")))?
            .parse::<f64>()
            .map_err(|e| Error::DataSource(format!("kline {name} is not numeric: {e}")))
    };

    Ok(Candle {
        open_time,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}
