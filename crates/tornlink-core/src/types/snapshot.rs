//! Canonical snapshot records
//!
//! These are the only shapes the rest of the client sees. They are built by
//! the normalizer and never mutated afterwards; merging produces new values.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::key::ResourceKey;

/// A regenerating player bar (energy, nerve, happy, life)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub current: i64,
    pub maximum: i64,
    pub increment: i64,
    /// Seconds between increments
    pub interval: u64,
    /// Seconds until the bar is full
    pub full_time: u64,
}

/// Player or member status line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: String,
    pub description: String,
    /// Unix timestamp the state ends at, 0 when open-ended
    pub until: u64,
}

/// Last-action marker for a player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    pub status: String,
    pub timestamp: u64,
}

/// Profile, bars and wallet of the credential's player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub player_id: u64,
    pub name: String,
    pub level: u32,
    pub status: Status,
    pub energy: Bar,
    pub nerve: Bar,
    pub happy: Bar,
    pub life: Bar,
    pub money_onhand: i64,
    pub points: i64,
    pub faction_id: Option<u64>,
}

/// A bank balance, with the investment countdown when known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankBalance {
    pub amount: i64,
    /// Seconds until the investment matures
    pub time_left: Option<u64>,
}

/// City bank investment as reported by the money selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityBankDetails {
    pub amount: i64,
    pub time_left: u64,
}

impl From<CityBankDetails> for BankBalance {
    fn from(details: CityBankDetails) -> Self {
        BankBalance {
            amount: details.amount,
            time_left: Some(details.time_left),
        }
    }
}

/// Player net worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworthSnapshot {
    pub total: i64,
    pub bank: Option<BankBalance>,
    /// Remaining categories (wallet, vault, items...) by upstream name
    pub breakdown: BTreeMap<String, i64>,
}

/// Battle stats of the credential's player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    pub strength: f64,
    pub speed: f64,
    pub dexterity: f64,
    pub defense: f64,
}

impl BattleStats {
    pub fn total(&self) -> f64 {
        self.strength + self.speed + self.dexterity + self.defense
    }
}

/// Gym the player is currently training at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveGym {
    pub gym_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionMember {
    pub id: u64,
    pub name: String,
    pub level: u32,
    pub days_in_faction: u32,
    pub position: String,
    pub status: Status,
    pub last_action: LastAction,
}

/// Faction overview with its members keyed by player id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionSnapshot {
    pub id: u64,
    pub name: String,
    pub tag: String,
    pub respect: i64,
    pub members: HashMap<u64, FactionMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedWarFaction {
    pub id: u64,
    pub name: String,
    pub score: i64,
    pub chain: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedWar {
    pub id: u64,
    pub start: u64,
    /// `None` while the war is running
    pub end: Option<u64>,
    pub target: i64,
    pub winner: Option<u64>,
    /// Highest score first
    pub factions: Vec<RankedWarFaction>,
}

/// Ranked wars, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedWarsSnapshot {
    pub wars: Vec<RankedWar>,
}

/// City bank investment term
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BankTerm {
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "2w")]
    TwoWeeks,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "2m")]
    TwoMonths,
    #[serde(rename = "3m")]
    ThreeMonths,
}

impl BankTerm {
    /// Parse the upstream term code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1w" => Some(BankTerm::OneWeek),
            "2w" => Some(BankTerm::TwoWeeks),
            "1m" => Some(BankTerm::OneMonth),
            "2m" => Some(BankTerm::TwoMonths),
            "3m" => Some(BankTerm::ThreeMonths),
            _ => None,
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            BankTerm::OneWeek => 7,
            BankTerm::TwoWeeks => 14,
            BankTerm::OneMonth => 30,
            BankTerm::TwoMonths => 60,
            BankTerm::ThreeMonths => 90,
        }
    }
}

/// City bank interest rates (annual percentage) by term
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankRates {
    pub rates: BTreeMap<BankTerm, f64>,
}

impl BankRates {
    /// Interest earned on `amount` over `term`, in whole currency units
    pub fn projected_interest(&self, term: BankTerm, amount: i64) -> Option<i64> {
        let rate = *self.rates.get(&term)?;
        let interest = amount as f64 * rate / 100.0 * f64::from(term.days()) / 365.0;
        Some(interest.floor() as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub code: Option<String>,
    /// Duration in seconds
    pub duration: Option<u64>,
}

/// Education course catalogue by course id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationCourses {
    pub courses: BTreeMap<u32, Course>,
}

impl EducationCourses {
    pub fn name(&self, id: u32) -> Option<&str> {
        self.courses.get(&id).map(|c| c.name.as_str())
    }
}

/// Any canonical value, tagged by resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Canonical {
    User(UserSnapshot),
    CityBank(CityBankDetails),
    Networth(NetworthSnapshot),
    BattleStats(BattleStats),
    ActiveGym(ActiveGym),
    Faction(FactionSnapshot),
    RankedWars(RankedWarsSnapshot),
    BankRates(BankRates),
    Education(EducationCourses),
}

impl Canonical {
    /// Key of the resource this value belongs to
    pub fn key(&self) -> ResourceKey {
        match self {
            Canonical::User(_) => ResourceKey::UserSnapshot,
            Canonical::CityBank(_) => ResourceKey::CityBankDetails,
            Canonical::Networth(_) => ResourceKey::NetworthSnapshot,
            Canonical::BattleStats(_) => ResourceKey::BattleStats,
            Canonical::ActiveGym(_) => ResourceKey::ActiveGym,
            Canonical::Faction(_) => ResourceKey::FactionSnapshot,
            Canonical::RankedWars(_) => ResourceKey::RankedWarSnapshot,
            Canonical::BankRates(_) => ResourceKey::BankRates,
            Canonical::Education(_) => ResourceKey::EducationCourses,
        }
    }
}

/// Static typing for a resource key
///
/// Ties each canonical record to exactly one [`ResourceKey`], so typed reads
/// cannot ask the wrong key for the wrong type.
pub trait Resource: Clone + Send + Sync + 'static {
    const KEY: ResourceKey;

    fn into_canonical(self) -> Canonical;

    fn from_canonical(value: &Canonical) -> Option<&Self>;
}

macro_rules! impl_resource {
    ($ty:ty, $key:ident, $variant:ident) => {
        impl Resource for $ty {
            const KEY: ResourceKey = ResourceKey::$key;

            fn into_canonical(self) -> Canonical {
                Canonical::$variant(self)
            }

            fn from_canonical(value: &Canonical) -> Option<&Self> {
                match value {
                    Canonical::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Canonical {
            fn from(value: $ty) -> Self {
                Canonical::$variant(value)
            }
        }
    };
}

impl_resource!(UserSnapshot, UserSnapshot, User);
impl_resource!(CityBankDetails, CityBankDetails, CityBank);
impl_resource!(NetworthSnapshot, NetworthSnapshot, Networth);
impl_resource!(BattleStats, BattleStats, BattleStats);
impl_resource!(ActiveGym, ActiveGym, ActiveGym);
impl_resource!(FactionSnapshot, FactionSnapshot, Faction);
impl_resource!(RankedWarsSnapshot, RankedWarSnapshot, RankedWars);
impl_resource!(BankRates, BankRates, BankRates);
impl_resource!(EducationCourses, EducationCourses, Education);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_roundtrip_through_canonical() {
        let gym = ActiveGym { gym_id: 4 };
        let canonical = gym.into_canonical();
        assert_eq!(canonical.key(), ResourceKey::ActiveGym);
        assert_eq!(ActiveGym::from_canonical(&canonical), Some(&gym));
        assert_eq!(BattleStats::from_canonical(&canonical), None);
    }

    #[test]
    fn test_projected_interest_is_integral() {
        let mut rates = BankRates::default();
        rates.rates.insert(BankTerm::ThreeMonths, 7.3);
        // 1_000_000 * 7.3% * 90/365
        assert_eq!(
            rates.projected_interest(BankTerm::ThreeMonths, 1_000_000),
            Some(18_000)
        );
        assert_eq!(rates.projected_interest(BankTerm::OneWeek, 1_000_000), None);
    }

    #[test]
    fn test_bank_term_codes() {
        assert_eq!(BankTerm::from_code("2m"), Some(BankTerm::TwoMonths));
        assert_eq!(BankTerm::from_code("6m"), None);
        assert_eq!(serde_json::to_string(&BankTerm::OneWeek).unwrap(), "\"1w\"");
    }

    #[test]
    fn test_battle_stats_total() {
        let stats = BattleStats {
            strength: 1.5,
            speed: 2.0,
            dexterity: 3.0,
            defense: 4.0,
        };
        assert_eq!(stats.total(), 10.5);
    }
}
