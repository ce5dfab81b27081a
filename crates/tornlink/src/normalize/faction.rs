use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::Value;

use tornlink_core::{
    ApiError, FactionMember, FactionSnapshot, RankedWar, RankedWarFaction, RankedWarsSnapshot,
    Result,
};

use super::{LastActionWire, StatusWire, decode};

#[derive(Debug, Deserialize)]
struct MemberWire {
    name: String,
    level: u32,
    #[serde(default)]
    days_in_faction: u32,
    #[serde(default)]
    position: String,
    #[serde(default)]
    status: StatusWire,
    #[serde(default)]
    last_action: LastActionWire,
}

#[derive(Debug, Deserialize)]
struct FactionV1 {
    #[serde(rename = "ID")]
    id: u64,
    name: String,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    respect: i64,
    /// Keyed by player id as a string
    #[serde(default)]
    members: BTreeMap<String, MemberWire>,
}

pub(super) fn faction_v1(raw: &Value) -> Result<FactionSnapshot> {
    let wire: FactionV1 = decode("v1 faction", raw)?;

    let mut members = HashMap::with_capacity(wire.members.len());
    for (id, member) in wire.members {
        let id = parse_id("v1 faction member", &id)?;
        members.insert(
            id,
            FactionMember {
                id,
                name: member.name,
                level: member.level,
                days_in_faction: member.days_in_faction,
                position: member.position,
                status: member.status.into(),
                last_action: member.last_action.into(),
            },
        );
    }

    Ok(FactionSnapshot {
        id: wire.id,
        name: wire.name,
        tag: wire.tag,
        respect: wire.respect,
        members,
    })
}

#[derive(Debug, Deserialize)]
struct WarFactionV1 {
    name: String,
    score: i64,
    #[serde(default)]
    chain: i64,
}

#[derive(Debug, Deserialize)]
struct WarTimesV1 {
    start: u64,
    /// 0 while running
    #[serde(default)]
    end: u64,
    #[serde(default)]
    target: i64,
    /// 0 until decided
    #[serde(default)]
    winner: u64,
}

#[derive(Debug, Deserialize)]
struct RankedWarV1 {
    factions: BTreeMap<String, WarFactionV1>,
    war: WarTimesV1,
}

#[derive(Debug, Deserialize)]
struct RankedWarsV1 {
    rankedwars: BTreeMap<String, RankedWarV1>,
}

/// v1 `rankedwars`: wars and their factions are both maps keyed by id
pub(super) fn ranked_wars_v1(raw: &Value) -> Result<RankedWarsSnapshot> {
    let wire: RankedWarsV1 = decode("v1 rankedwars", raw)?;

    let mut wars = Vec::with_capacity(wire.rankedwars.len());
    for (war_id, war) in wire.rankedwars {
        let mut factions = Vec::with_capacity(war.factions.len());
        for (faction_id, faction) in war.factions {
            factions.push(RankedWarFaction {
                id: parse_id("v1 rankedwars faction", &faction_id)?,
                name: faction.name,
                score: faction.score,
                chain: faction.chain,
            });
        }
        wars.push(RankedWar {
            id: parse_id("v1 rankedwars war", &war_id)?,
            start: war.war.start,
            end: non_zero(war.war.end),
            target: war.war.target,
            winner: non_zero(war.war.winner),
            factions,
        });
    }

    Ok(ordered(wars))
}

#[derive(Debug, Deserialize)]
struct WarFactionV2 {
    id: u64,
    name: String,
    score: i64,
    #[serde(default)]
    chain: i64,
}

#[derive(Debug, Deserialize)]
struct RankedWarV2 {
    id: u64,
    start: u64,
    #[serde(default)]
    end: Option<u64>,
    #[serde(default)]
    target: i64,
    #[serde(default)]
    winner: Option<u64>,
    factions: Vec<WarFactionV2>,
}

#[derive(Debug, Deserialize)]
struct RankedWarsV2 {
    rankedwars: Vec<RankedWarV2>,
}

/// v2 `rankedwars`: a list of wars, each with a list of factions
pub(super) fn ranked_wars_v2(raw: &Value) -> Result<RankedWarsSnapshot> {
    let wire: RankedWarsV2 = decode("v2 rankedwars", raw)?;

    let wars = wire
        .rankedwars
        .into_iter()
        .map(|war| RankedWar {
            id: war.id,
            start: war.start,
            end: war.end.and_then(non_zero),
            target: war.target,
            winner: war.winner.and_then(non_zero),
            factions: war
                .factions
                .into_iter()
                .map(|f| RankedWarFaction {
                    id: f.id,
                    name: f.name,
                    score: f.score,
                    chain: f.chain,
                })
                .collect(),
        })
        .collect();

    Ok(ordered(wars))
}

/// Most recent war first, highest score first within a war
fn ordered(mut wars: Vec<RankedWar>) -> RankedWarsSnapshot {
    for war in &mut wars {
        war.factions
            .sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
    }
    wars.sort_by(|a, b| b.start.cmp(&a.start).then(b.id.cmp(&a.id)));
    RankedWarsSnapshot { wars }
}

fn non_zero(value: u64) -> Option<u64> {
    (value != 0).then_some(value)
}

fn parse_id(what: &str, id: &str) -> Result<u64> {
    id.parse()
        .map_err(|_| ApiError::Malformed(format!("{what}: invalid id {id:?}")))
}
