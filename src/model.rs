/*
 * vote aggregation, result calculation and the live prediction model.
 *
 * the model works by:
 * 1. summing counted votes at the polling places tallied so far (current
 *    election)
 * 2. summing the same polling places from the previous election
 * 3. computing a swing per party as the ratio of current to previous share
 * 4. applying that swing to the previous election's overall result
 * 5. normalising the outcome back to 100%
 */

use std::collections::{BTreeMap, BTreeSet};

use crate::defs::*;
use crate::errors::ValgError;

// reduce raw export rows to one record per (location, party). votes for
// duplicate keys are summed; the first-seen display name is kept
pub fn aggregate_votes<I>(rows: I) -> Result<VoteTable, ValgError>
where
    I: IntoIterator<Item = VoteRecord>,
{
    let mut by_key: BTreeMap<(String, String), (String, u64)> = BTreeMap::new();
    for row in rows {
        let entry = by_key
            .entry((row.location, row.party_code))
            .or_insert((row.party_name, 0));
        entry.1 += row.votes;
    }
    if by_key.is_empty() {
        return Err(ValgError::EmptyData);
    }
    let records = by_key
        .into_iter()
        .map(|((location, party_code), (party_name, votes))| VoteRecord {
            location,
            party_code,
            party_name,
            votes,
        })
        .collect();
    Ok(VoteTable { records })
}

// per-party share of the total, as percentages. totals are summed as
// integers first, so the division order can't introduce drift
fn shares<'a, I>(records: I) -> Result<ResultMapping, ValgError>
where
    I: IntoIterator<Item = &'a VoteRecord>,
{
    let mut per_party: VoteCount = BTreeMap::new();
    for record in records {
        *per_party.entry(record.party_code.clone()).or_insert(0) += record.votes;
    }
    let total: u64 = per_party.values().sum();
    if total == 0 {
        return Err(ValgError::ZeroTotalVotes);
    }
    Ok(per_party
        .into_iter()
        .map(|(party, votes)| (party, votes as f64 / total as f64 * 100.0))
        .collect())
}

pub fn aggregate_result(table: &VoteTable) -> Result<ResultMapping, ValgError> {
    shares(table.records.iter())
}

// the same calculation restricted to a subset of polling places. a subset
// matching no records at all is an input error, distinct from a matched
// subset that happens to hold zero votes
pub fn result_for_subset(
    table: &VoteTable,
    locations: &BTreeSet<String>,
) -> Result<ResultMapping, ValgError> {
    let matched: Vec<&VoteRecord> = table
        .records
        .iter()
        .filter(|r| locations.contains(&r.location))
        .collect();
    if matched.is_empty() {
        let wanted: Vec<&str> = locations.iter().map(|l| l.as_str()).collect();
        return Err(ValgError::NoMatchingData(wanted.join(", ")));
    }
    shares(matched)
}

// turn a percentage mapping back into vote counts against a known total,
// truncating each party's share
pub fn votes_from_shares(result: &ResultMapping, total_votes: u64) -> VoteCount {
    result
        .iter()
        .map(|(party, pct)| (party.clone(), (pct / 100.0 * total_votes as f64) as u64))
        .collect()
}

// prediction model primed with the previous election. the baseline table
// and its overall result are computed once and never change, so a single
// model can serve any number of prediction cycles
pub struct ElectionModel {
    baseline: VoteTable,
    baseline_result: ResultMapping,
}

impl ElectionModel {
    pub fn new<I>(baseline_rows: I) -> Result<ElectionModel, ValgError>
    where
        I: IntoIterator<Item = VoteRecord>,
    {
        ElectionModel::from_table(aggregate_votes(baseline_rows)?)
    }

    pub fn from_table(baseline: VoteTable) -> Result<ElectionModel, ValgError> {
        let baseline_result = aggregate_result(&baseline)?;
        Ok(ElectionModel {
            baseline,
            baseline_result,
        })
    }

    pub fn baseline(&self) -> &VoteTable {
        &self.baseline
    }

    pub fn baseline_result(&self) -> &ResultMapping {
        &self.baseline_result
    }

    // extrapolate a full result from the polling places counted so far.
    //
    // p: current-election shares within the counted places
    // q: previous-election shares within the same places
    // r: previous election's overall result
    //
    // for each party the predicted share is r * (p / q), with fallbacks
    // for parties the counted places can't give a swing for:
    // - in q with zero/missing p: swing is 0, the party collapses to 0
    // - missing from q but present in p: p is used directly
    // - in neither p nor q: r is carried through unchanged
    // - in p but not r (a new party): p is used directly
    pub fn predict(
        &self,
        current: &VoteTable,
        counted: &BTreeSet<String>,
    ) -> Result<ResultMapping, ValgError> {
        let p = result_for_subset(current, counted)?;
        let q = result_for_subset(&self.baseline, counted)?;
        let r = &self.baseline_result;

        let mut predicted: ResultMapping = BTreeMap::new();
        for (party, &r_share) in r {
            let q_share = q.get(party).cloned().unwrap_or(0.0);
            let value = if q_share > 0.0 {
                let swing = p.get(party).cloned().unwrap_or(0.0) / q_share;
                r_share * swing
            } else if let Some(&p_share) = p.get(party) {
                p_share
            } else {
                r_share
            };
            predicted.insert(party.clone(), value);
        }

        // parties that didn't exist in the previous election
        for (party, &p_share) in &p {
            predicted.entry(party.clone()).or_insert(p_share);
        }

        // normalise to 100%; an all-zero prediction stays all-zero rather
        // than dividing by zero
        let total: f64 = predicted.values().sum();
        if total > 0.0 {
            for value in predicted.values_mut() {
                *value = *value / total * 100.0;
            }
        }
        Ok(predicted)
    }
}
