//! Error types for configuration and option parsing.
//!
//! The graph pipeline itself has no failure path; these cover the surfaces
//! around it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A layout policy name that is not one of the known values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {option} value: '{value}'")]
pub struct ParseOptionError {
    pub option: &'static str,
    pub value: String,
}

impl ParseOptionError {
    pub fn new(option: &'static str, value: &str) -> Self {
        Self {
            option,
            value: value.to_string(),
        }
    }
}
