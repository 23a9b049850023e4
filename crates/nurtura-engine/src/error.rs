use thiserror::Error;
use uuid::Uuid;

use nurtura_catalog::CatalogError;

use crate::generator::GenerateError;
use crate::parse::ParseError;
use crate::review::ReviewError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("child not found: {0}")]
    ChildNotFound(Uuid),

    #[error("no response for child {child_id} in section {section_id}")]
    ResponseNotFound { child_id: Uuid, section_id: Uuid },

    #[error("final report not found: {0}")]
    ReportNotFound(Uuid),

    #[error("unknown pool: {0}")]
    UnknownPool(Uuid),

    #[error("unknown section: {0}")]
    UnknownSection(Uuid),

    #[error("invalid answer: {0}")]
    Answer(#[from] CatalogError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerateError),

    #[error("generated output unusable: {0}")]
    Malformed(#[from] ParseError),

    #[error("review sequence violation: {0}")]
    Review(#[from] ReviewError),

    #[error("access denied")]
    AccessDenied,

    #[error("regeneration precondition not met: {0}")]
    Regeneration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
