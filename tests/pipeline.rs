// full pipeline runs over a synthetic four-district municipal election:
// previous-election CSV in, swing prediction, vote scaling, two-tier seat
// allocation, JSON snapshot out.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;

use valgnat::apportion::{Alliance, Alliances};
use valgnat::configuration::read_config;
use valgnat::defs::VoteRecord;
use valgnat::kmd;
use valgnat::model::{aggregate_votes, votes_from_shares, ElectionModel};
use valgnat::output::LiveData;

fn rec(location: &str, code: &str, votes: u64) -> VoteRecord {
    VoteRecord {
        location: location.to_string(),
        party_code: code.to_string(),
        party_name: format!("Liste {}", code),
        votes,
    }
}

fn baseline_rows() -> Vec<VoteRecord> {
    vec![
        rec("Indre By", "A", 400),
        rec("Indre By", "B", 300),
        rec("Indre By", "Ø", 200),
        rec("Indre By", "C", 100),
        rec("Nørrebro", "A", 300),
        rec("Nørrebro", "B", 200),
        rec("Nørrebro", "Ø", 400),
        rec("Nørrebro", "C", 100),
        rec("Valby", "A", 500),
        rec("Valby", "B", 300),
        rec("Valby", "Ø", 100),
        rec("Valby", "C", 100),
        rec("Amager", "A", 350),
        rec("Amager", "B", 250),
        rec("Amager", "Ø", 250),
        rec("Amager", "C", 150),
    ]
}

// two counted districts, with Ø up 25% and A down 15% since the baseline
fn current_rows() -> Vec<VoteRecord> {
    vec![
        rec("Indre By", "A", 340),
        rec("Indre By", "B", 300),
        rec("Indre By", "Ø", 250),
        rec("Indre By", "C", 100),
        rec("Nørrebro", "A", 255),
        rec("Nørrebro", "B", 200),
        rec("Nørrebro", "Ø", 500),
        rec("Nørrebro", "C", 100),
    ]
}

#[test]
fn swing_moves_the_prediction_the_right_way() {
    let model = ElectionModel::new(baseline_rows()).unwrap();
    let current = aggregate_votes(current_rows()).unwrap();
    let counted = current.locations();
    let predicted = model.predict(&current, &counted).unwrap();

    let baseline = model.baseline_result();
    assert!(predicted["Ø"] > baseline["Ø"]);
    assert!(predicted["A"] < baseline["A"]);
    assert!((predicted.values().sum::<f64>() - 100.0).abs() < 1e-6);
}

#[test]
fn predicted_votes_fill_every_seat() {
    let model = ElectionModel::new(baseline_rows()).unwrap();
    let current = aggregate_votes(current_rows()).unwrap();
    let counted = current.locations();
    let predicted = model.predict(&current, &counted).unwrap();
    let votes = votes_from_shares(&predicted, model.baseline().total_votes());

    let alliances = Alliances::new(vec![
        Alliance {
            name: "Rød blok".to_string(),
            parties: vec!["A".to_string(), "Ø".to_string()],
        },
        Alliance {
            name: "Blå blok".to_string(),
            parties: vec!["B".to_string(), "C".to_string()],
        },
    ])
    .unwrap();
    let (party_seats, alliance_seats) = alliances.apportion(&votes, 11);

    assert_eq!(party_seats.values().sum::<u32>(), 11);
    assert_eq!(alliance_seats.values().sum::<u32>(), 11);
    for alliance in alliances.alliances() {
        let member_total: u32 = alliance
            .parties
            .iter()
            .map(|p| party_seats.get(p).cloned().unwrap_or(0))
            .sum();
        assert_eq!(member_total, alliance_seats[&alliance.name]);
    }
}

#[test]
fn rerunning_the_cycle_is_bit_identical() {
    let model = ElectionModel::new(baseline_rows()).unwrap();
    let current = aggregate_votes(current_rows()).unwrap();
    let counted = current.locations();

    let first = model.predict(&current, &counted).unwrap();
    let second = model.predict(&current, &counted).unwrap();
    assert_eq!(first, second);

    let votes_a = votes_from_shares(&first, model.baseline().total_votes());
    let votes_b = votes_from_shares(&second, model.baseline().total_votes());
    assert_eq!(votes_a, votes_b);
}

#[test]
fn baseline_subset_prediction_reproduces_baseline() {
    // counting any subset of an unchanged election must predict the
    // previous result exactly (swing = 1 everywhere)
    let model = ElectionModel::new(baseline_rows()).unwrap();
    let current = aggregate_votes(baseline_rows()).unwrap();
    for place in ["Indre By", "Valby", "Amager"] {
        let counted: BTreeSet<String> = [place.to_string()].into_iter().collect();
        let predicted = model.predict(&current, &counted).unwrap();
        for (party, share) in model.baseline_result() {
            assert!(
                (share - predicted[party]).abs() < 1e-6,
                "{} drifted at {}",
                party,
                place
            );
        }
    }
}

fn write_file(dir: &std::path::Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    let mut fd = fs::File::create(&path).unwrap();
    fd.write_all(contents.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

fn csv_for(rows: &[VoteRecord]) -> String {
    let mut out = String::from("\u{feff}Afstemningsområde;Bogstavbetegnelse;Listenavn;Stemmetal\n");
    for row in rows {
        out.push_str(&format!(
            "{};{};{};{}\n",
            row.location, row.party_code, row.party_name, row.votes
        ));
    }
    out
}

#[test]
fn file_driven_cycle_produces_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "baseline.csv", &csv_for(&baseline_rows()));
    let current_path = write_file(dir.path(), "current.csv", &csv_for(&current_rows()));
    let config_path = write_file(
        dir.path(),
        "valgnat.toml",
        r##"
description = "Kommunalvalg test"
total_seats = 11
baseline = "baseline.csv"

[[alliance]]
name = "Rød blok"
parties = ["A", "Ø"]

[[alliance]]
name = "Blå blok"
parties = ["B", "C"]

[colors]
A = "#E3515D"
"##,
    );

    let task = read_config(&config_path).unwrap();
    let alliances = Alliances::new(task.alliances.clone()).unwrap();
    let model = ElectionModel::new(kmd::data::results::load(&task.baseline).unwrap()).unwrap();
    let current = aggregate_votes(kmd::data::results::load(&current_path).unwrap()).unwrap();
    let counted = current.locations();
    assert_eq!(counted.len(), 2);

    let predicted = model.predict(&current, &counted).unwrap();
    let votes = votes_from_shares(&predicted, model.baseline().total_votes());
    let (party_seats, alliance_seats) = alliances.apportion(&votes, task.total_seats);
    let live = LiveData::build(
        &task,
        &alliances,
        &votes,
        &model.baseline().party_names(),
        &party_seats,
        &alliance_seats,
        counted.len(),
        model.baseline().locations().len(),
    );
    assert_eq!(live.metadata.total_seats, 11);
    assert_eq!(live.metadata.counted_locations, 2);
    assert_eq!(live.metadata.total_locations, 4);
    assert_eq!(live.parties.iter().map(|p| p.seats).sum::<u32>(), 11);

    let json_path = dir.path().join("live_data.json");
    live.write_json(json_path.to_str().unwrap()).unwrap();
    let value: serde_json::Value =
        serde_json::from_reader(fs::File::open(&json_path).unwrap()).unwrap();
    assert_eq!(value["metadata"]["total_seats"], 11);
    assert!(value["alliances"].as_array().unwrap().len() == 2);
}
