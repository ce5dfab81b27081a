//! Logical resource keys

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier for one independently cacheable unit of upstream data
///
/// The declaration order matters: resources are processed in this order
/// after a fetch, so `CityBankDetails` is stored before the
/// `NetworthSnapshot` it patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKey {
    UserSnapshot,
    CityBankDetails,
    NetworthSnapshot,
    BattleStats,
    ActiveGym,
    FactionSnapshot,
    RankedWarSnapshot,
    BankRates,
    EducationCourses,
}

impl ResourceKey {
    /// Every key, in processing order
    pub const ALL: [ResourceKey; 9] = [
        ResourceKey::UserSnapshot,
        ResourceKey::CityBankDetails,
        ResourceKey::NetworthSnapshot,
        ResourceKey::BattleStats,
        ResourceKey::ActiveGym,
        ResourceKey::FactionSnapshot,
        ResourceKey::RankedWarSnapshot,
        ResourceKey::BankRates,
        ResourceKey::EducationCourses,
    ];

    /// Get key as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::UserSnapshot => "user",
            ResourceKey::CityBankDetails => "city_bank",
            ResourceKey::NetworthSnapshot => "networth",
            ResourceKey::BattleStats => "battle_stats",
            ResourceKey::ActiveGym => "active_gym",
            ResourceKey::FactionSnapshot => "faction",
            ResourceKey::RankedWarSnapshot => "ranked_wars",
            ResourceKey::BankRates => "bank_rates",
            ResourceKey::EducationCourses => "education",
        }
    }

    /// Policy TTL for the key
    ///
    /// Fast-moving player state lives for seconds, reference data for hours.
    pub fn default_ttl(&self) -> Duration {
        match self {
            ResourceKey::UserSnapshot => Duration::from_secs(10),
            ResourceKey::CityBankDetails => Duration::from_secs(30),
            ResourceKey::NetworthSnapshot => Duration::from_secs(60),
            ResourceKey::BattleStats => Duration::from_secs(60),
            ResourceKey::ActiveGym => Duration::from_secs(5 * 60),
            ResourceKey::FactionSnapshot => Duration::from_secs(30),
            ResourceKey::RankedWarSnapshot => Duration::from_secs(60),
            ResourceKey::BankRates => Duration::from_secs(60 * 60),
            ResourceKey::EducationCourses => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Policy timeout for the request serving this key
    pub fn default_timeout(&self) -> Duration {
        match self {
            ResourceKey::UserSnapshot => Duration::from_secs(5),
            ResourceKey::FactionSnapshot
            | ResourceKey::RankedWarSnapshot
            | ResourceKey::EducationCourses => Duration::from_secs(15),
            _ => Duration::from_secs(10),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
