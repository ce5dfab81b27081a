use std::collections::BTreeMap;

use tornlink_core::{
    ActiveGym, BankRates, BattleStats, Canonical, CityBankDetails, EducationCourses,
    FactionSnapshot, NetworthSnapshot, RankedWarsSnapshot, Resource, ResourceKey, UserSnapshot,
};

use crate::merge::patch_bank;

/// Result of one fetch: every requested resource that could be produced
///
/// A resource that could not be fetched or decoded is simply absent. There
/// is never a placeholder value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    values: BTreeMap<ResourceKey, Canonical>,
}

impl Snapshot {
    /// Typed access to one resource
    pub fn get<R: Resource>(&self) -> Option<&R> {
        self.values.get(&R::KEY).and_then(R::from_canonical)
    }

    pub fn get_canonical(&self, key: ResourceKey) -> Option<&Canonical> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: ResourceKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Keys present, in processing order
    pub fn keys(&self) -> impl Iterator<Item = ResourceKey> + '_ {
        self.values.keys().copied()
    }

    /// Requested keys that are absent
    pub fn missing(&self, requested: &[ResourceKey]) -> Vec<ResourceKey> {
        requested
            .iter()
            .copied()
            .filter(|key| !self.contains(*key))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn user(&self) -> Option<&UserSnapshot> {
        self.get()
    }

    pub fn city_bank(&self) -> Option<&CityBankDetails> {
        self.get()
    }

    pub fn networth(&self) -> Option<&NetworthSnapshot> {
        self.get()
    }

    pub fn battle_stats(&self) -> Option<&BattleStats> {
        self.get()
    }

    pub fn active_gym(&self) -> Option<&ActiveGym> {
        self.get()
    }

    pub fn faction(&self) -> Option<&FactionSnapshot> {
        self.get()
    }

    pub fn ranked_wars(&self) -> Option<&RankedWarsSnapshot> {
        self.get()
    }

    pub fn bank_rates(&self) -> Option<&BankRates> {
        self.get()
    }

    pub fn education(&self) -> Option<&EducationCourses> {
        self.get()
    }

    pub(crate) fn insert(&mut self, value: Canonical) {
        self.values.insert(value.key(), value);
    }

    /// Apply cross-resource patches between values in the same snapshot
    pub(crate) fn finish(mut self) -> Self {
        let Some(details) = self.city_bank().copied() else {
            return self;
        };
        if let Some(Canonical::Networth(networth)) = self.values.get_mut(&ResourceKey::NetworthSnapshot) {
            *networth = patch_bank(networth.clone(), &details);
        }
        self
    }
}

impl IntoIterator for Snapshot {
    type Item = (ResourceKey, Canonical);
    type IntoIter = std::collections::btree_map::IntoIter<ResourceKey, Canonical>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
