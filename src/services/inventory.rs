//! PartsBox inventory API client
//!
//! Thin wrapper over the four endpoints the pipeline uses: part creation,
//! stock addition, part listing, and part deletion. Request and response
//! bodies follow the PartsBox `part/…` / `stock/…` key convention.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::PartRecord;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Remote parts-inventory service as seen by the pipeline.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Create a part; returns the remote part id.
    async fn create_part(&self, record: &PartRecord) -> Result<String>;

    /// Add stock for an existing part at the configured storage location.
    async fn add_stock(&self, part_id: &str, quantity: i64, unit_price: Option<f64>)
        -> Result<()>;

    /// All remote part ids.
    async fn list_parts(&self) -> Result<Vec<String>>;

    /// Delete one part; returns the remote status category verbatim.
    async fn delete_part(&self, part_id: &str) -> Result<String>;
}

/// PartsBox API client.
pub struct PartsBoxClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    storage_id: String,
}

impl PartsBoxClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            storage_id: config.storage_id.clone(),
        })
    }

    /// POST a JSON body and return the parsed JSON response.
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(url = %url, "PartsBox request");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Map an enriched record onto the part-creation payload, with the same
    /// fallbacks the staged data was designed around: manufacturer part
    /// number falls back to the QR `pm` field, description to the LCSC code.
    fn creation_body(record: &PartRecord) -> Value {
        let pc = record.part_code().unwrap_or_default();
        let name = record
            .get("mfr_part_number")
            .or_else(|| record.get("pm"))
            .unwrap_or(pc);
        let description = record
            .get("description")
            .map(str::to_string)
            .unwrap_or_else(|| format!("LCSC {}", pc));

        json!({
            "part/type": "local",
            "part/name": name,
            "part/description": description,
            "part/footprint": record.get("package").unwrap_or("Unknown"),
            "part/manufacturer": record.get("manufacturer").unwrap_or("Unknown"),
            "part/mpn": record.get("mfr_part_number").unwrap_or("Unknown"),
            "part/notes": format!(
                "LCSC code: {}\nManufacturer: {}\nPackage: {}",
                pc,
                record.get("manufacturer").unwrap_or("Unknown"),
                record.get("package").unwrap_or("Unknown"),
            ),
            "part/tags": ["imported", "lcsc"],
        })
    }
}

#[async_trait]
impl InventoryService for PartsBoxClient {
    async fn create_part(&self, record: &PartRecord) -> Result<String> {
        let response = self.post("part/create", Self::creation_body(record)).await?;

        response["data"]["part/id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Api {
                status: 200,
                body: "part/create response carried no part/id".to_string(),
            })
    }

    async fn add_stock(
        &self,
        part_id: &str,
        quantity: i64,
        unit_price: Option<f64>,
    ) -> Result<()> {
        let mut body = json!({
            "stock/part-id": part_id,
            "stock/storage-id": self.storage_id,
            "stock/quantity": quantity,
            "stock/comments": "Initial import from LCSC QR",
        });
        if let Some(price) = unit_price {
            body["stock/price"] = json!(price);
            body["stock/currency"] = json!("usd");
        }

        self.post("stock/add", body).await?;
        Ok(())
    }

    async fn list_parts(&self) -> Result<Vec<String>> {
        let response = self.post("part/all", json!({})).await?;

        let ids = response["data"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["part/id"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ids)
    }

    async fn delete_part(&self, part_id: &str) -> Result<String> {
        let response = self
            .post("part/delete", json!({ "part/id": part_id }))
            .await?;

        // Pass the remote status category through verbatim; an absent status
        // field on a 2xx response still means the call went through.
        Ok(response["status"]
            .as_str()
            .unwrap_or("ok")
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_payload;

    #[test]
    fn creation_body_uses_enriched_fields() {
        let mut record = parse_payload("{pc:C123,qty:10}").unwrap();
        record.set("mfr_part_number", Some("NE555DR".to_string()));
        record.set("manufacturer", Some("TI".to_string()));
        record.set("package", Some("SOIC-8".to_string()));
        record.set("description", Some("Timer".to_string()));

        let body = PartsBoxClient::creation_body(&record);
        assert_eq!(body["part/name"], "NE555DR");
        assert_eq!(body["part/description"], "Timer");
        assert_eq!(body["part/footprint"], "SOIC-8");
        assert_eq!(body["part/mpn"], "NE555DR");
        assert_eq!(body["part/tags"][1], "lcsc");
    }

    #[test]
    fn creation_body_falls_back_for_bare_records() {
        let record = parse_payload("{pc:C123,pm:NE555,qty:10}").unwrap();

        let body = PartsBoxClient::creation_body(&record);
        assert_eq!(body["part/name"], "NE555");
        assert_eq!(body["part/description"], "LCSC C123");
        assert_eq!(body["part/footprint"], "Unknown");
        assert_eq!(body["part/manufacturer"], "Unknown");
    }
}
