//! Resource routing and request planning
//!
//! Each resource is served by one schema/entity pair and a few selections.
//! Misses that share a pair are coalesced into a single request carrying the
//! union of their selections.

use std::collections::BTreeMap;
use std::time::Duration;

use tornlink_core::ResourceKey;
use tornlink_http::{ApiVersion, Endpoint, Entity};

use crate::config::ClientConfig;

/// Where one resource is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub version: ApiVersion,
    pub entity: Entity,
    pub selections: &'static [&'static str],
}

impl Route {
    const fn new(version: ApiVersion, entity: Entity, selections: &'static [&'static str]) -> Self {
        Self {
            version,
            entity,
            selections,
        }
    }
}

/// Route for `key` under `config`
pub fn route(key: ResourceKey, config: &ClientConfig) -> Route {
    use ApiVersion::{V1, V2};

    match key {
        ResourceKey::UserSnapshot => Route::new(V1, Entity::User, &["profile", "bars", "money"]),
        ResourceKey::CityBankDetails => Route::new(V2, Entity::User, &["money"]),
        ResourceKey::NetworthSnapshot => Route::new(V1, Entity::User, &["networth"]),
        ResourceKey::BattleStats => Route::new(V1, Entity::User, &["battlestats"]),
        ResourceKey::ActiveGym => Route::new(V1, Entity::User, &["gym"]),
        ResourceKey::FactionSnapshot => Route::new(V1, Entity::Faction, &["basic"]),
        ResourceKey::RankedWarSnapshot => {
            Route::new(config.ranked_wars_version, Entity::Faction, &["rankedwars"])
        }
        ResourceKey::BankRates => Route::new(V1, Entity::Torn, &["bank"]),
        ResourceKey::EducationCourses => Route::new(V1, Entity::Torn, &["education"]),
    }
}

/// One coalesced request and the resources it serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRequest {
    pub endpoint: Endpoint,
    /// In processing order
    pub resources: Vec<ResourceKey>,
}

/// Group `misses` into one request per schema/entity pair
///
/// A coalesced request waits as long as the most patient resource it serves.
pub fn plan(misses: &[ResourceKey], config: &ClientConfig) -> Vec<PlannedRequest> {
    let mut sorted = misses.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut requests: BTreeMap<(ApiVersion, Entity), PlannedRequest> = BTreeMap::new();
    for key in sorted {
        let route = route(key, config);
        let request = requests
            .entry((route.version, route.entity))
            .or_insert_with(|| PlannedRequest {
                endpoint: Endpoint::new(route.version, route.entity).with_timeout(Duration::ZERO),
                resources: Vec::new(),
            });

        for selection in route.selections {
            request.endpoint.push_selection(*selection);
        }
        request.endpoint.timeout = request.endpoint.timeout.max(config.timeout_for(key));
        request.resources.push(key);
    }

    requests.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_resources_coalesce() {
        let config = ClientConfig::default();
        let plan = plan(
            &[
                ResourceKey::BattleStats,
                ResourceKey::UserSnapshot,
                ResourceKey::NetworthSnapshot,
                ResourceKey::CityBankDetails,
            ],
            &config,
        );

        assert_eq!(plan.len(), 2);
        let v1 = &plan[0];
        assert_eq!(v1.endpoint.version, ApiVersion::V1);
        assert_eq!(
            v1.endpoint.selections,
            vec!["profile", "bars", "money", "networth", "battlestats"]
        );
        assert_eq!(
            v1.resources,
            vec![
                ResourceKey::UserSnapshot,
                ResourceKey::NetworthSnapshot,
                ResourceKey::BattleStats
            ]
        );
        // user alone would wait 5s; networth and battlestats allow 10s
        assert_eq!(v1.endpoint.timeout, Duration::from_secs(10));

        let v2 = &plan[1];
        assert_eq!(v2.endpoint.describe(), "v2 user [money]");
        assert_eq!(v2.resources, vec![ResourceKey::CityBankDetails]);
    }

    #[test]
    fn test_faction_and_wars_split_by_schema() {
        let config = ClientConfig::default();
        let plan = plan(
            &[ResourceKey::FactionSnapshot, ResourceKey::RankedWarSnapshot],
            &config,
        );
        assert_eq!(plan.len(), 2);

        let legacy = ClientConfig::default().legacy_ranked_wars();
        let plan = super::plan(
            &[ResourceKey::FactionSnapshot, ResourceKey::RankedWarSnapshot],
            &legacy,
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].endpoint.describe(), "v1 faction [basic,rankedwars]");
    }

    #[test]
    fn test_duplicate_misses_collapse() {
        let config = ClientConfig::default();
        let plan = plan(&[ResourceKey::BankRates, ResourceKey::BankRates], &config);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].resources, vec![ResourceKey::BankRates]);
        assert_eq!(plan[0].endpoint.selections, vec!["bank"]);
    }

    #[test]
    fn test_timeout_override_applies() {
        let config = ClientConfig::default().timeout(ResourceKey::UserSnapshot, Duration::from_secs(2));
        let plan = plan(&[ResourceKey::UserSnapshot], &config);
        assert_eq!(plan[0].endpoint.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_empty_plan() {
        assert!(plan(&[], &ClientConfig::default()).is_empty());
    }
}
