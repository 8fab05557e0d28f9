use thiserror::Error;

use crate::catalog::SpecParseError;
use crate::model::{ModuleError, UnknownAnalysisType, UnknownDifficulty};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    Difficulty(#[from] UnknownDifficulty),
    #[error(transparent)]
    AnalysisType(#[from] UnknownAnalysisType),
    #[error(transparent)]
    Spec(#[from] SpecParseError),
}
