/*
 * live data snapshot: the JSON document the display layer polls, plus a
 * console summary of the same numbers.
 */

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::File;

use itertools::Itertools;
use num_format::{Locale, ToFormattedString};
use serde_derive::Serialize;

use crate::apportion::Alliances;
use crate::configuration::CountTask;
use crate::defs::{SeatCount, VoteCount};
use crate::errors::ValgError;

const DEFAULT_COLOR: &str = "#999999";

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub total_seats: u32,
    pub total_votes: u64,
    pub counted_locations: usize,
    pub total_locations: usize,
    pub percent_counted: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartyOutput {
    pub code: String,
    pub name: String,
    pub seats: u32,
    pub votes: u64,
    pub percent: f64,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct AllianceOutput {
    pub name: String,
    pub seats: u32,
    pub votes: u64,
    pub percent: f64,
    pub parties: Vec<PartyOutput>,
}

#[derive(Debug, Serialize)]
pub struct LiveData {
    pub metadata: Metadata,
    pub alliances: Vec<AllianceOutput>,
    pub parties: Vec<PartyOutput>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn by_seats(a: &PartyOutput, b: &PartyOutput) -> Ordering {
    b.seats
        .cmp(&a.seats)
        .then(b.votes.cmp(&a.votes))
        .then(a.code.cmp(&b.code))
}

impl LiveData {
    pub fn build(
        task: &CountTask,
        alliances: &Alliances,
        votes: &VoteCount,
        party_names: &BTreeMap<String, String>,
        party_seats: &SeatCount,
        alliance_seats: &SeatCount,
        counted_locations: usize,
        total_locations: usize,
    ) -> LiveData {
        let total_votes: u64 = votes.values().sum();
        let percent = |count: u64| {
            if total_votes == 0 {
                0.0
            } else {
                round2(count as f64 / total_votes as f64 * 100.0)
            }
        };
        let party_output = |code: &str| {
            let party_votes = votes.get(code).cloned().unwrap_or(0);
            PartyOutput {
                code: code.to_string(),
                name: party_names.get(code).cloned().unwrap_or_else(|| code.to_string()),
                seats: party_seats.get(code).cloned().unwrap_or(0),
                votes: party_votes,
                percent: percent(party_votes),
                color: task
                    .colors
                    .get(code)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            }
        };

        let mut alliance_outputs = Vec::new();
        let mut party_outputs = Vec::new();
        for alliance in alliances.alliances() {
            // zero-vote parties stay in the seat mappings but are noise
            // on a display, so they are left out of the snapshot
            let members: Vec<PartyOutput> = alliance
                .parties
                .iter()
                .map(|code| party_output(code))
                .filter(|p| p.votes > 0)
                .sorted_by(by_seats)
                .collect();
            let alliance_votes: u64 = members.iter().map(|p| p.votes).sum();
            party_outputs.extend(members.iter().cloned());
            alliance_outputs.push(AllianceOutput {
                name: alliance.name.clone(),
                seats: alliance_seats.get(&alliance.name).cloned().unwrap_or(0),
                votes: alliance_votes,
                percent: percent(alliance_votes),
                parties: members,
            });
        }

        // parties running outside every alliance
        for code in votes.keys() {
            if alliances.alliance_of(code).is_none() {
                let party = party_output(code);
                if party.votes > 0 {
                    party_outputs.push(party);
                }
            }
        }

        let alliance_outputs = alliance_outputs
            .into_iter()
            .sorted_by(|a, b| b.seats.cmp(&a.seats).then(b.votes.cmp(&a.votes)))
            .collect();
        let party_outputs = party_outputs.into_iter().sorted_by(by_seats).collect();

        let percent_counted = if total_locations == 0 {
            0.0
        } else {
            round2(counted_locations as f64 / total_locations as f64 * 100.0)
        };
        LiveData {
            metadata: Metadata {
                total_seats: task.total_seats,
                total_votes,
                counted_locations,
                total_locations,
                percent_counted,
            },
            alliances: alliance_outputs,
            parties: party_outputs,
        }
    }

    pub fn write_json(&self, path: &str) -> Result<(), ValgError> {
        let fd = File::create(path).map_err(|source| ValgError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::to_writer_pretty(fd, self).map_err(|source| ValgError::Json {
            path: path.to_string(),
            source,
        })
    }

    pub fn print_summary(&self, description: &str) {
        println!("{}", "=".repeat(70));
        println!(
            "{} - {} seats, {} of {} polling places counted ({:.1}%)",
            description,
            self.metadata.total_seats,
            self.metadata.counted_locations,
            self.metadata.total_locations,
            self.metadata.percent_counted
        );
        println!("{}", "=".repeat(70));
        for alliance in &self.alliances {
            if alliance.votes == 0 {
                continue;
            }
            println!(
                "\n{}: {} seats ({} votes, {:.2}%)",
                alliance.name,
                alliance.seats,
                alliance.votes.to_formatted_string(&Locale::en),
                alliance.percent
            );
            println!("{}", "-".repeat(70));
            for party in &alliance.parties {
                println!(
                    "  {:3} {:2} seats ({:>9} votes, {:5.2}%)",
                    party.code,
                    party.seats,
                    party.votes.to_formatted_string(&Locale::en),
                    party.percent
                );
            }
        }
        let allocated: u32 = self.parties.iter().map(|p| p.seats).sum();
        println!(
            "\nseats allocated: {} of {}",
            allocated, self.metadata.total_seats
        );
    }
}
