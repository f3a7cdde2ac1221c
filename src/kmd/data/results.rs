//
// Parse the per-polling-place vote count CSV export from the municipal
// election system: semicolon delimited, UTF-8 with a leading BOM, one row
// per (polling place, party list, ballot type).
//

use std::fs;

use serde_derive::Deserialize;

use crate::defs::VoteRecord;
use crate::errors::ValgError;

#[derive(Debug, Deserialize)]
pub struct VoteCountRow {
    // the bits we actually care about; the export carries more columns,
    // which the header-based deserializer skips
    #[serde(rename = "Afstemningsområde")]
    pub polling_place: String,
    #[serde(rename = "Bogstavbetegnelse")]
    pub party_code: String,
    #[serde(rename = "Listenavn")]
    pub party_name: String,
    #[serde(rename = "Stemmetal")]
    pub votes: u64,
}

pub fn load(filename: &str) -> Result<Vec<VoteRecord>, ValgError> {
    let contents = fs::read_to_string(filename).map_err(|source| ValgError::Io {
        path: filename.to_string(),
        source,
    })?;
    // the export starts with a BOM, which would otherwise end up glued to
    // the first header
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(contents.as_bytes());
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: VoteCountRow = result.map_err(|source| ValgError::Csv {
            path: filename.to_string(),
            source,
        })?;
        rows.push(VoteRecord {
            location: record.polling_place,
            party_code: record.party_code,
            party_name: record.party_name,
            votes: record.votes,
        });
    }
    Ok(rows)
}
