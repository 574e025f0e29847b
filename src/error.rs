use thiserror::Error;

use crate::config::ConfigError;
use crate::graph::GraphError;
use crate::parse::ParseError;

#[derive(Debug, Error)]
pub enum TopographError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("malformed input: {0}")]
    Parse(#[from] ParseError),
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TopographError>;
