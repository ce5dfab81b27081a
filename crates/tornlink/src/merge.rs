//! Additive merging of canonical records
//!
//! A fresh value normally replaces the one it supersedes, but some sources
//! report less than others: the v1 networth bank has no investment countdown
//! while the v2 city bank has one. Merging keeps a field once it is known
//! instead of letting a thinner response erase it.

use tornlink_core::{
    ActiveGym, BankBalance, BankRates, BattleStats, Canonical, CityBankDetails, EducationCourses,
    FactionSnapshot, NetworthSnapshot, RankedWarsSnapshot, UserSnapshot,
};

/// Combine a newer record with the one it supersedes
pub trait MergeCanonical: Sized {
    /// Newer wins by default
    fn merge_canonical(self, newer: Self) -> Self {
        newer
    }
}

impl MergeCanonical for UserSnapshot {}
impl MergeCanonical for CityBankDetails {}
impl MergeCanonical for BattleStats {}
impl MergeCanonical for ActiveGym {}
impl MergeCanonical for FactionSnapshot {}
impl MergeCanonical for RankedWarsSnapshot {}
impl MergeCanonical for BankRates {}
impl MergeCanonical for EducationCourses {}

impl MergeCanonical for NetworthSnapshot {
    fn merge_canonical(self, newer: Self) -> Self {
        let bank = match (self.bank, newer.bank) {
            (Some(old), Some(new)) => Some(BankBalance {
                amount: new.amount,
                time_left: new.time_left.or(old.time_left),
            }),
            (old, new) => new.or(old),
        };
        let breakdown = if newer.breakdown.is_empty() {
            self.breakdown
        } else {
            newer.breakdown
        };
        NetworthSnapshot {
            total: newer.total,
            bank,
            breakdown,
        }
    }
}

/// Merge two canonical values of the same resource
///
/// Values of different resources never merge; `newer` is returned as is.
pub fn merge_canonical(old: Canonical, newer: Canonical) -> Canonical {
    match (old, newer) {
        (Canonical::User(a), Canonical::User(b)) => a.merge_canonical(b).into(),
        (Canonical::CityBank(a), Canonical::CityBank(b)) => a.merge_canonical(b).into(),
        (Canonical::Networth(a), Canonical::Networth(b)) => a.merge_canonical(b).into(),
        (Canonical::BattleStats(a), Canonical::BattleStats(b)) => a.merge_canonical(b).into(),
        (Canonical::ActiveGym(a), Canonical::ActiveGym(b)) => a.merge_canonical(b).into(),
        (Canonical::Faction(a), Canonical::Faction(b)) => a.merge_canonical(b).into(),
        (Canonical::RankedWars(a), Canonical::RankedWars(b)) => a.merge_canonical(b).into(),
        (Canonical::BankRates(a), Canonical::BankRates(b)) => a.merge_canonical(b).into(),
        (Canonical::Education(a), Canonical::Education(b)) => a.merge_canonical(b).into(),
        (_, newer) => newer,
    }
}

/// Fill the networth bank from the city bank investment
///
/// The city bank is the only source of the countdown, so its `time_left`
/// is always taken. A bank amount the networth already reports is kept.
pub fn patch_bank(networth: NetworthSnapshot, details: &CityBankDetails) -> NetworthSnapshot {
    let bank = match networth.bank {
        None => BankBalance::from(*details),
        Some(bank) => BankBalance {
            amount: bank.amount,
            time_left: Some(details.time_left),
        },
    };
    NetworthSnapshot {
        bank: Some(bank),
        ..networth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn networth(bank: Option<BankBalance>) -> NetworthSnapshot {
        NetworthSnapshot {
            total: 100,
            bank,
            breakdown: BTreeMap::from([("wallet".to_string(), 10)]),
        }
    }

    #[test]
    fn test_scalar_bank_keeps_known_time_left() {
        let old = networth(Some(BankBalance {
            amount: 50,
            time_left: Some(3600),
        }));
        let new = networth(Some(BankBalance {
            amount: 60,
            time_left: None,
        }));
        let merged = old.merge_canonical(new);
        assert_eq!(
            merged.bank,
            Some(BankBalance {
                amount: 60,
                time_left: Some(3600)
            })
        );
    }

    #[test]
    fn test_newer_populated_field_wins() {
        let old = networth(Some(BankBalance {
            amount: 50,
            time_left: Some(3600),
        }));
        let new = networth(Some(BankBalance {
            amount: 60,
            time_left: Some(1800),
        }));
        assert_eq!(old.merge_canonical(new).bank.unwrap().time_left, Some(1800));
    }

    #[test]
    fn test_missing_bank_retained() {
        let old = networth(Some(BankBalance {
            amount: 50,
            time_left: None,
        }));
        let mut new = networth(None);
        new.total = 120;
        let merged = old.merge_canonical(new);
        assert_eq!(merged.total, 120);
        assert_eq!(merged.bank.unwrap().amount, 50);
    }

    #[test]
    fn test_default_merge_replaces() {
        let merged = merge_canonical(
            ActiveGym { gym_id: 1 }.into(),
            ActiveGym { gym_id: 2 }.into(),
        );
        assert_eq!(merged, Canonical::ActiveGym(ActiveGym { gym_id: 2 }));
    }

    #[test]
    fn test_mismatched_resources_take_newer() {
        let merged = merge_canonical(ActiveGym { gym_id: 1 }.into(), networth(None).into());
        assert_eq!(merged, Canonical::Networth(networth(None)));
    }

    #[test]
    fn test_patch_bank() {
        let details = CityBankDetails {
            amount: 70,
            time_left: 900,
        };
        let patched = patch_bank(
            networth(Some(BankBalance {
                amount: 65,
                time_left: None,
            })),
            &details,
        );
        assert_eq!(
            patched.bank,
            Some(BankBalance {
                amount: 65,
                time_left: Some(900)
            })
        );
        assert_eq!(patched.bank, patch_bank(patched.clone(), &details).bank);

        let refreshed = patch_bank(
            patched,
            &CityBankDetails {
                amount: 80,
                time_left: 600,
            },
        );
        assert_eq!(
            refreshed.bank,
            Some(BankBalance {
                amount: 65,
                time_left: Some(600)
            })
        );

        let filled = patch_bank(networth(None), &details);
        assert_eq!(filled.bank, Some(BankBalance::from(details)));
    }
}
