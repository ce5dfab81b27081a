use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use tornlink_core::{
    ActiveGym, ApiError, BankBalance, Bar, BattleStats, CityBankDetails, NetworthSnapshot, Result,
    UserSnapshot,
};

use super::{StatusWire, currency, decode};

#[derive(Debug, Deserialize)]
struct BarWire {
    current: i64,
    maximum: i64,
    #[serde(default)]
    increment: i64,
    #[serde(default)]
    interval: u64,
    #[serde(default)]
    fulltime: u64,
}

impl From<BarWire> for Bar {
    fn from(wire: BarWire) -> Self {
        Bar {
            current: wire.current,
            maximum: wire.maximum,
            increment: wire.increment,
            interval: wire.interval,
            full_time: wire.fulltime,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileFactionWire {
    #[serde(default)]
    faction_id: u64,
}

/// `profile,bars,money` merged into one v1 body
#[derive(Debug, Deserialize)]
struct UserV1 {
    player_id: u64,
    name: String,
    level: u32,
    #[serde(default)]
    status: StatusWire,
    energy: BarWire,
    nerve: BarWire,
    happy: BarWire,
    life: BarWire,
    money_onhand: i64,
    #[serde(default)]
    points: i64,
    #[serde(default)]
    faction: Option<ProfileFactionWire>,
}

pub(super) fn user_v1(raw: &Value) -> Result<UserSnapshot> {
    let wire: UserV1 = decode("v1 user", raw)?;
    Ok(UserSnapshot {
        player_id: wire.player_id,
        name: wire.name,
        level: wire.level,
        status: wire.status.into(),
        energy: wire.energy.into(),
        nerve: wire.nerve.into(),
        happy: wire.happy.into(),
        life: wire.life.into(),
        money_onhand: wire.money_onhand,
        points: wire.points,
        // 0 means factionless
        faction_id: wire
            .faction
            .map(|f| f.faction_id)
            .filter(|&id| id != 0),
    })
}

#[derive(Debug, Deserialize)]
struct CityBankWire {
    amount: i64,
    time_left: u64,
}

#[derive(Debug, Deserialize)]
struct MoneyBodyV2 {
    #[serde(default)]
    city_bank: Option<CityBankWire>,
}

#[derive(Debug, Deserialize)]
struct MoneyV2 {
    money: MoneyBodyV2,
}

/// v2 `money`; a player without an investment reports no `city_bank`
pub(super) fn city_bank_v2(raw: &Value) -> Result<CityBankDetails> {
    let wire: MoneyV2 = decode("v2 money", raw)?;
    Ok(match wire.money.city_bank {
        Some(bank) => CityBankDetails {
            amount: bank.amount,
            time_left: bank.time_left,
        },
        None => CityBankDetails {
            amount: 0,
            time_left: 0,
        },
    })
}

/// Entries of the v1 `networth` object that are not money categories
const NETWORTH_METADATA: &[&str] = &["total", "bank", "parsetime", "timestamp"];

/// v1 `networth`: a flat object of category totals
///
/// `bank` is a bare amount here; the investment countdown only comes from
/// the v2 money selection.
pub(super) fn networth_v1(raw: &Value) -> Result<NetworthSnapshot> {
    let body = raw
        .get("networth")
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::Malformed("v1 networth: missing field `networth`".to_string()))?;

    let total = body
        .get("total")
        .and_then(currency)
        .ok_or_else(|| ApiError::Malformed("v1 networth: missing or invalid `total`".to_string()))?;

    let bank = body.get("bank").and_then(currency).map(|amount| BankBalance {
        amount,
        time_left: None,
    });

    let breakdown: BTreeMap<String, i64> = body
        .iter()
        .filter(|(name, _)| !NETWORTH_METADATA.contains(&name.as_str()))
        .filter_map(|(name, value)| currency(value).map(|amount| (name.clone(), amount)))
        .collect();

    Ok(NetworthSnapshot {
        total,
        bank,
        breakdown,
    })
}

#[derive(Debug, Deserialize)]
struct BattleStatsV1 {
    strength: f64,
    speed: f64,
    dexterity: f64,
    defense: f64,
}

pub(super) fn battle_stats_v1(raw: &Value) -> Result<BattleStats> {
    let wire: BattleStatsV1 = decode("v1 battlestats", raw)?;
    Ok(BattleStats {
        strength: wire.strength,
        speed: wire.speed,
        dexterity: wire.dexterity,
        defense: wire.defense,
    })
}

#[derive(Debug, Deserialize)]
struct GymV1 {
    active_gym: u32,
}

pub(super) fn active_gym_v1(raw: &Value) -> Result<ActiveGym> {
    let wire: GymV1 = decode("v1 gym", raw)?;
    Ok(ActiveGym {
        gym_id: wire.active_gym,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bar(current: i64, maximum: i64) -> Value {
        json!({"current": current, "maximum": maximum, "increment": 5, "interval": 600, "fulltime": 3000})
    }

    fn user_body() -> Value {
        json!({
            "player_id": 2001,
            "name": "Duke",
            "level": 72,
            "status": {"state": "Okay", "description": "Okay", "until": 0},
            "energy": bar(100, 150),
            "nerve": bar(20, 60),
            "happy": bar(4000, 5025),
            "life": bar(7000, 7500),
            "money_onhand": 1_250_000,
            "points": 340,
            "faction": {"faction_id": 9, "faction_name": "Example"},
            "parsetime": 0.01
        })
    }

    #[test]
    fn test_user_v1() {
        let user = user_v1(&user_body()).unwrap();
        assert_eq!(user.player_id, 2001);
        assert_eq!(user.energy.maximum, 150);
        assert_eq!(user.energy.full_time, 3000);
        assert_eq!(user.faction_id, Some(9));
        assert_eq!(user.status.state, "Okay");
    }

    #[test]
    fn test_user_v1_factionless() {
        let mut body = user_body();
        body["faction"] = json!({"faction_id": 0});
        assert_eq!(user_v1(&body).unwrap().faction_id, None);
    }

    #[test]
    fn test_user_v1_missing_bars_rejected() {
        let mut body = user_body();
        body.as_object_mut().unwrap().remove("energy");
        let err = user_v1(&body).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(ref m) if m.contains("energy")));
    }

    #[test]
    fn test_city_bank_v2() {
        let body = json!({"money": {"wallet": 5, "city_bank": {"amount": 2_000_000_000, "time_left": 86_400}}});
        assert_eq!(
            city_bank_v2(&body).unwrap(),
            CityBankDetails {
                amount: 2_000_000_000,
                time_left: 86_400
            }
        );
    }

    #[test]
    fn test_city_bank_v2_no_investment() {
        let body = json!({"money": {"wallet": 5, "city_bank": null}});
        assert_eq!(city_bank_v2(&body).unwrap().amount, 0);
        assert!(city_bank_v2(&json!({"wallet": 5})).is_err());
    }

    #[test]
    fn test_networth_v1() {
        let body = json!({
            "networth": {
                "pending": 0,
                "wallet": 1_250_000,
                "bank": 2_000_000_000,
                "points": 15_000_000.0,
                "total": 2_016_250_000,
                "parsetime": 0.25,
                "timestamp": 1_700_000_000
            }
        });
        let networth = networth_v1(&body).unwrap();
        assert_eq!(networth.total, 2_016_250_000);
        assert_eq!(
            networth.bank,
            Some(BankBalance {
                amount: 2_000_000_000,
                time_left: None
            })
        );
        assert_eq!(networth.breakdown.get("points"), Some(&15_000_000));
        assert!(!networth.breakdown.contains_key("total"));
        assert!(!networth.breakdown.contains_key("parsetime"));
        assert!(!networth.breakdown.contains_key("timestamp"));
        assert_eq!(networth.breakdown.len(), 3);
    }

    #[test]
    fn test_networth_v1_requires_total() {
        let body = json!({"networth": {"wallet": 10}});
        assert!(matches!(networth_v1(&body), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_battle_stats_and_gym() {
        let body = json!({
            "strength": 1000.5, "speed": 2000, "dexterity": 3000, "defense": 4000,
            "active_gym": 12
        });
        assert_eq!(battle_stats_v1(&body).unwrap().total(), 10000.5);
        assert_eq!(active_gym_v1(&body).unwrap().gym_id, 12);
    }
}
