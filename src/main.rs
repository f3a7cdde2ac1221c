use std::process;

use clap::{crate_version, App, Arg};

use valgnat::apportion::Alliances;
use valgnat::configuration;
use valgnat::errors::ValgError;
use valgnat::kmd;
use valgnat::model::{self, ElectionModel};
use valgnat::output::LiveData;

// one full prediction/apportionment cycle; a live election night runs
// this again whenever the count CSV is refreshed
fn run(config_path: &str, current_path: &str, output_path: &str) -> Result<(), ValgError> {
    let task = configuration::read_config(config_path)?;
    let alliances = Alliances::new(task.alliances.clone())?;

    let baseline_rows = kmd::data::results::load(&task.baseline)?;
    let model = ElectionModel::new(baseline_rows)?;
    let total_locations = model.baseline().locations().len();
    println!(
        "baseline: {} records over {} polling places",
        model.baseline().records.len(),
        total_locations
    );

    let current_rows = kmd::data::results::load(current_path)?;
    let current = model::aggregate_votes(current_rows)?;
    // whatever polling places appear in the live file are the ones
    // considered fully counted
    let counted = current.locations();
    println!("counted so far: {} polling places", counted.len());

    let predicted = model.predict(&current, &counted)?;
    // scale predicted shares against the previous election's turnout to
    // get workable vote counts for the seat allocation
    let votes = model::votes_from_shares(&predicted, model.baseline().total_votes());
    let (party_seats, alliance_seats) = alliances.apportion(&votes, task.total_seats);

    let mut party_names = model.baseline().party_names();
    for (code, name) in current.party_names() {
        party_names.entry(code).or_insert(name);
    }

    let live = LiveData::build(
        &task,
        &alliances,
        &votes,
        &party_names,
        &party_seats,
        &alliance_seats,
        counted.len(),
        total_locations,
    );
    live.print_summary(&task.description);
    live.write_json(output_path)?;
    println!("wrote {}", output_path);
    Ok(())
}

fn main() {
    let matches = App::new("valgnat")
        .version(crate_version!())
        .about("live election night result prediction and seat apportionment")
        .arg(
            Arg::with_name("config")
                .help("count task TOML file")
                .required(true),
        )
        .arg(
            Arg::with_name("current")
                .help("CSV of counted polling places from the current election")
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("live_data.json")
                .help("where to write the JSON snapshot"),
        )
        .get_matches();

    let config = matches.value_of("config").unwrap();
    let current = matches.value_of("current").unwrap();
    let output = matches.value_of("output").unwrap();
    if let Err(error) = run(config, current, output) {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}
