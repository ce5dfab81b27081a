//! Core types

mod entry;
mod key;
mod snapshot;
mod stats;

pub use entry::CacheEntry;
pub use key::ResourceKey;
pub use snapshot::{
    ActiveGym, BankBalance, BankRates, BankTerm, Bar, BattleStats, Canonical, CityBankDetails,
    Course, EducationCourses, FactionMember, FactionSnapshot, LastAction, NetworthSnapshot,
    RankedWar, RankedWarFaction, RankedWarsSnapshot, Resource, Status, UserSnapshot,
};
pub use stats::StoreStats;
