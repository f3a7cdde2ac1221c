use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_derive::Deserialize;

use crate::apportion::Alliance;
use crate::errors::ValgError;

#[derive(Debug, Deserialize)]
struct AllianceConfig {
    name: String,
    parties: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Config {
    description: String,
    total_seats: u32,
    baseline: String,
    #[serde(rename = "alliance")]
    alliances: Vec<AllianceConfig>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

fn config_contents(input_file: &str) -> Result<Config, ValgError> {
    let buf = fs::read_to_string(input_file).map_err(|source| ValgError::Io {
        path: input_file.to_string(),
        source,
    })?;
    toml::from_str(&buf).map_err(|source| ValgError::ConfigFile {
        path: input_file.to_string(),
        source,
    })
}

// one prediction/apportionment task, with paths resolved relative to the
// config file's directory
#[derive(Debug, Clone)]
pub struct CountTask {
    pub description: String,
    pub total_seats: u32,
    pub baseline: String,
    pub alliances: Vec<Alliance>,
    pub colors: BTreeMap<String, String>,
}

pub fn read_config(input_file: &str) -> Result<CountTask, ValgError> {
    let config = config_contents(input_file)?;
    let dir = Path::new(input_file)
        .parent()
        .unwrap_or_else(|| Path::new(""));
    let in_dir = |s: &str| dir.join(s).to_string_lossy().into_owned();
    Ok(CountTask {
        baseline: in_dir(&config.baseline),
        description: config.description,
        total_seats: config.total_seats,
        alliances: config
            .alliances
            .into_iter()
            .map(|a| Alliance {
                name: a.name,
                parties: a.parties,
            })
            .collect(),
        colors: config.colors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE: &str = r##"
description = "Kommunalvalg København"
total_seats = 55
baseline = "kommunalvalg_2021.csv"

[[alliance]]
name = "Rød blok 1"
parties = ["A", "B", "M"]

[[alliance]]
name = "Blå blok"
parties = ["C", "D", "I", "K", "O", "V", "Æ"]

[colors]
A = "#E3515D"
"Ø" = "#E6801A"
"##;

    #[test]
    fn reads_a_count_task() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();
        let task = read_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(task.total_seats, 55);
        assert_eq!(task.alliances.len(), 2);
        assert_eq!(task.alliances[0].parties, vec!["A", "B", "M"]);
        assert!(task.baseline.ends_with("kommunalvalg_2021.csv"));
        assert_eq!(task.colors["A"], "#E3515D");
    }

    #[test]
    fn colors_are_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"description = \"x\"\ntotal_seats = 5\nbaseline = \"b.csv\"\n\n[[alliance]]\nname = \"X\"\nparties = [\"A\"]\n",
        )
        .unwrap();
        file.flush().unwrap();
        let task = read_config(file.path().to_str().unwrap()).unwrap();
        assert!(task.colors.is_empty());
    }

    #[test]
    fn bad_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"total_seats = \"five\"").unwrap();
        file.flush().unwrap();
        match read_config(file.path().to_str().unwrap()) {
            Err(ValgError::ConfigFile { .. }) => (),
            other => panic!("expected ConfigFile error, got {:?}", other),
        }
    }
}
