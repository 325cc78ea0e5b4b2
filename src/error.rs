//! Errors surfaced by the command-line host.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ortho_config::OrthoError),
    #[error("invalid customization marker: {0}")]
    Marker(#[from] regex::Error),
    #[error("proposed scenario file {} does not exist", .0.display())]
    MissingProposal(std::path::PathBuf),
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("unknown scenario id(s) in {file}: {ids}")]
    UnknownScenario { file: String, ids: String },
}
