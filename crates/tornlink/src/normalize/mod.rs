//! Upstream payload normalization
//!
//! The v1 and v2 schemas name and nest things differently; every resource is
//! decoded from whichever schema its route uses into the one canonical record
//! in [`tornlink_core`]. Decoding is pure: the same payload always yields the
//! same record, and a payload missing a required field is rejected rather
//! than filled with zeroes.

mod faction;
mod torn;
mod user;

use serde::Deserialize;
use serde_json::Value;

use tornlink_core::{ApiError, Canonical, LastAction, ResourceKey, Result, Status};
use tornlink_http::ApiVersion;

/// Decode `raw` into the canonical record for `key`
///
/// `raw` is the envelope-checked body of a request that may have carried
/// other selections as well; only the fields `key` needs are read.
pub fn normalize(key: ResourceKey, version: ApiVersion, raw: &Value) -> Result<Canonical> {
    let value = match (key, version) {
        (ResourceKey::UserSnapshot, ApiVersion::V1) => user::user_v1(raw)?.into(),
        (ResourceKey::CityBankDetails, ApiVersion::V2) => user::city_bank_v2(raw)?.into(),
        (ResourceKey::NetworthSnapshot, ApiVersion::V1) => user::networth_v1(raw)?.into(),
        (ResourceKey::BattleStats, ApiVersion::V1) => user::battle_stats_v1(raw)?.into(),
        (ResourceKey::ActiveGym, ApiVersion::V1) => user::active_gym_v1(raw)?.into(),
        (ResourceKey::FactionSnapshot, ApiVersion::V1) => faction::faction_v1(raw)?.into(),
        (ResourceKey::RankedWarSnapshot, ApiVersion::V1) => faction::ranked_wars_v1(raw)?.into(),
        (ResourceKey::RankedWarSnapshot, ApiVersion::V2) => faction::ranked_wars_v2(raw)?.into(),
        (ResourceKey::BankRates, ApiVersion::V1) => torn::bank_rates_v1(raw)?.into(),
        (ResourceKey::EducationCourses, ApiVersion::V1) => torn::education_v1(raw)?.into(),
        (key, version) => {
            return Err(ApiError::Malformed(format!(
                "no {} decoder for {key}",
                version.as_str()
            )));
        }
    };
    Ok(value)
}

/// Deserialize a wire struct, tagging failures with what was being decoded
fn decode<'de, T: Deserialize<'de>>(what: &str, raw: &'de Value) -> Result<T> {
    T::deserialize(raw).map_err(|e| ApiError::Malformed(format!("{what}: {e}")))
}

/// Read a currency amount; whole-valued floats are accepted
fn currency(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

#[derive(Debug, Default, Deserialize)]
struct StatusWire {
    #[serde(default)]
    state: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    until: u64,
}

impl From<StatusWire> for Status {
    fn from(wire: StatusWire) -> Self {
        Status {
            state: wire.state,
            description: wire.description,
            until: wire.until,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LastActionWire {
    #[serde(default)]
    status: String,
    #[serde(default)]
    timestamp: u64,
}

impl From<LastActionWire> for LastAction {
    fn from(wire: LastActionWire) -> Self {
        LastAction {
            status: wire.status,
            timestamp: wire.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unsupported_schema_is_malformed() {
        let err = normalize(ResourceKey::FactionSnapshot, ApiVersion::V2, &json!({})).unwrap_err();
        assert_eq!(err, ApiError::Malformed("no v2 decoder for faction".to_string()));
    }

    #[test]
    fn test_currency_accepts_whole_floats() {
        assert_eq!(currency(&json!(12)), Some(12));
        assert_eq!(currency(&json!(12.0)), Some(12));
        assert_eq!(currency(&json!(12.5)), None);
        assert_eq!(currency(&json!("12")), None);
    }
}
