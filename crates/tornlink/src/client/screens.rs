//! Named orchestrators, one per screen
//!
//! Each screen asks for the resources it shows. Screens with overlapping
//! sets share cached resources, so moving between them costs only the
//! requests for what differs.

use tornlink_core::{ClientMetrics, ResourceKey};
use tornlink_http::Transport;

use super::ApiClient;
use crate::snapshot::Snapshot;

pub const PROFILE_OVERVIEW: [ResourceKey; 4] = [
    ResourceKey::UserSnapshot,
    ResourceKey::NetworthSnapshot,
    ResourceKey::CityBankDetails,
    ResourceKey::BattleStats,
];

pub const FACTION_OVERVIEW: [ResourceKey; 2] = [
    ResourceKey::FactionSnapshot,
    ResourceKey::RankedWarSnapshot,
];

pub const GYM_OVERVIEW: [ResourceKey; 3] = [
    ResourceKey::UserSnapshot,
    ResourceKey::BattleStats,
    ResourceKey::ActiveGym,
];

pub const BANK_OVERVIEW: [ResourceKey; 3] = [
    ResourceKey::UserSnapshot,
    ResourceKey::CityBankDetails,
    ResourceKey::BankRates,
];

pub const EDUCATION_CATALOG: [ResourceKey; 1] = [ResourceKey::EducationCourses];

impl<T: Transport, M: ClientMetrics> ApiClient<T, M> {
    /// Player profile with net worth and battle stats
    pub async fn profile_overview(&self) -> Snapshot {
        self.fetch(PROFILE_OVERVIEW).await
    }

    /// Own faction and its ranked wars
    pub async fn faction_overview(&self) -> Snapshot {
        self.fetch(FACTION_OVERVIEW).await
    }

    /// Inputs for the gym planner
    pub async fn gym_overview(&self) -> Snapshot {
        self.fetch(GYM_OVERVIEW).await
    }

    pub async fn bank_overview(&self) -> Snapshot {
        self.fetch(BANK_OVERVIEW).await
    }

    pub async fn education_catalog(&self) -> Snapshot {
        self.fetch(EDUCATION_CATALOG).await
    }
}
