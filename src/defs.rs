/*
 * core types
 */

use std::collections::{BTreeMap, BTreeSet};

// all votes cast for one party at one polling place, after aggregation
// of the raw export rows. party_code is the ballot letter ("A", "Ø", ..);
// party_name is the display name from the list header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub location: String,
    pub party_code: String,
    pub party_name: String,
    pub votes: u64,
}

// party or alliance code -> percentage share; sums to 100 when non-empty
pub type ResultMapping = BTreeMap<String, f64>;

// party or alliance code -> vote count
pub type VoteCount = BTreeMap<String, u64>;

// party or alliance code -> seats won
pub type SeatCount = BTreeMap<String, u32>;

// one aggregated vote table, at most one record per (location, party_code),
// held in (location, party_code) order. rebuilt fresh per dataset load
#[derive(Debug, Clone, Default)]
pub struct VoteTable {
    pub records: Vec<VoteRecord>,
}

impl VoteTable {
    pub fn locations(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.location.clone()).collect()
    }

    pub fn total_votes(&self) -> u64 {
        self.records.iter().map(|r| r.votes).sum()
    }

    // first-seen display name per party code
    pub fn party_names(&self) -> BTreeMap<String, String> {
        let mut names = BTreeMap::new();
        for record in &self.records {
            names
                .entry(record.party_code.clone())
                .or_insert_with(|| record.party_name.clone());
        }
        names
    }
}
