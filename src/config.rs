//! Environment configuration for processes that build their logger at startup.

use std::io;
use std::str::FromStr;

use envconfig::Envconfig;
use thiserror::Error;

use crate::logger::Logger;
use crate::types::Level;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(from = "JSONLOG_LEVEL", default = "info")]
    pub level: Level,

    #[envconfig(from = "JSONLOG_OUTPUT", default = "stdout")]
    pub output: Output,
}

impl Config {
    /// Build a logger writing to the configured output at the configured level.
    pub fn logger(&self) -> Logger {
        let logger = match self.output {
            Output::Stdout => Logger::new(io::stdout()),
            Output::Stderr => Logger::new(io::stderr()),
        };
        logger.with_level(self.level)
    }
}

/// Standard stream a configured logger writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Stdout,
    Stderr,
}

/// Returned when a string names neither `stdout` nor `stderr`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} is not a valid log output, expected stdout or stderr")]
pub struct ParseOutputError(pub String);

impl FromStr for Output {
    type Err = ParseOutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            _ => Err(ParseOutputError(s.to_string())),
        }
    }
}
