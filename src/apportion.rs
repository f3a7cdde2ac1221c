/*
 * seat apportionment: the D'Hondt highest-quotient method, applied first
 * across electoral alliances and then within each alliance.
 */

use std::collections::BTreeMap;

use num::rational::Ratio;

use crate::defs::{SeatCount, VoteCount};
use crate::errors::ValgError;

// a named coalition of parties that competes for seats as a bloc, then
// redistributes its seats among its members
#[derive(Debug, Clone)]
pub struct Alliance {
    pub name: String,
    pub parties: Vec<String>,
}

// allocate seats one at a time, each going to the candidate with the
// highest quotient votes / (seats won + 1). quotients are compared as
// exact rationals; a tied quotient goes to the candidate that sorts
// first by code. candidates without votes never win a seat, and a round
// with no votes left ends the allocation early
pub fn dhondt(votes: &VoteCount, seats: u32) -> SeatCount {
    let mut awarded: SeatCount = votes.keys().map(|c| (c.clone(), 0)).collect();
    for _ in 0..seats {
        let mut winner: Option<(&String, Ratio<u64>)> = None;
        for (candidate, &count) in votes {
            if count == 0 {
                continue;
            }
            let quotient = Ratio::new(count, u64::from(awarded[candidate] + 1));
            let beats_current = match &winner {
                Some((_, best)) => quotient > *best,
                None => true,
            };
            if beats_current {
                winner = Some((candidate, quotient));
            }
        }
        match winner {
            Some((candidate, _)) => *awarded.get_mut(candidate).unwrap() += 1,
            None => break,
        }
    }
    awarded
}

pub struct Alliances {
    alliances: Vec<Alliance>,
    party_to_alliance: BTreeMap<String, String>,
}

impl Alliances {
    // builds the reverse party -> alliance index; a party claimed by two
    // alliances is a configuration error
    pub fn new(alliances: Vec<Alliance>) -> Result<Alliances, ValgError> {
        let mut party_to_alliance = BTreeMap::new();
        for alliance in &alliances {
            for party in &alliance.parties {
                let previous = party_to_alliance.insert(party.clone(), alliance.name.clone());
                if let Some(previous) = previous {
                    return Err(ValgError::Config(format!(
                        "party {} is a member of both {} and {}",
                        party, previous, alliance.name
                    )));
                }
            }
        }
        Ok(Alliances {
            alliances,
            party_to_alliance,
        })
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn alliance_of(&self, party: &str) -> Option<&str> {
        self.party_to_alliance.get(party).map(|name| name.as_str())
    }

    // two-tier allocation: D'Hondt over alliance vote sums for the full
    // seat budget, then D'Hondt within each alliance over its members
    // with votes, for exactly the seats that alliance won. parties with
    // no seats (no votes, no alliance, or a shut-out alliance) are still
    // present in the output at zero
    pub fn apportion(&self, votes: &VoteCount, total_seats: u32) -> (SeatCount, SeatCount) {
        let mut alliance_votes: VoteCount = self
            .alliances
            .iter()
            .map(|a| (a.name.clone(), 0))
            .collect();
        for (party, &count) in votes {
            if let Some(alliance) = self.party_to_alliance.get(party) {
                *alliance_votes.get_mut(alliance).unwrap() += count;
            }
        }
        let alliance_seats = dhondt(&alliance_votes, total_seats);

        let mut party_seats: SeatCount = BTreeMap::new();
        for alliance in &self.alliances {
            let member_votes: VoteCount = alliance
                .parties
                .iter()
                .filter_map(|party| votes.get(party).map(|&v| (party.clone(), v)))
                .filter(|&(_, v)| v > 0)
                .collect();
            let seats = alliance_seats.get(&alliance.name).cloned().unwrap_or(0);
            if seats > 0 && !member_votes.is_empty() {
                for (party, won) in dhondt(&member_votes, seats) {
                    party_seats.insert(party, won);
                }
            }
            for party in &alliance.parties {
                party_seats.entry(party.clone()).or_insert(0);
            }
        }

        // parties outside every alliance take no part in the allocation,
        // but are never dropped from the result
        for party in votes.keys() {
            party_seats.entry(party.clone()).or_insert(0);
        }

        (party_seats, alliance_seats)
    }
}
