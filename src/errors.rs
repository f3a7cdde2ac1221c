use thiserror::Error;

// every failure the model or its plumbing can hit. the first four are the
// conditions callers are expected to match on; the rest wrap file handling
#[derive(Debug, Error)]
pub enum ValgError {
    #[error("no vote data supplied")]
    EmptyData,

    #[error("no vote data matched the requested locations: {0}")]
    NoMatchingData(String),

    #[error("dataset contains no votes")]
    ZeroTotalVotes,

    #[error("bad alliance configuration: {0}")]
    Config(String),

    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed vote data in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unable to parse {path}: {source}")]
    ConfigFile {
        path: String,
        source: toml::de::Error,
    },

    #[error("unable to write {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}
