//! Content loading errors.

use levelwright_domain::DocumentRef;

use super::ContentKind;
use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Content pack missing: {0}")]
    SourceMissing(String),

    #[error("Failed to load {kind} from {pack}: {source}")]
    Load {
        kind: ContentKind,
        pack: String,
        #[source]
        source: RepoError,
    },

    #[error("Failed to resolve {reference}: {message}")]
    Resolve {
        reference: DocumentRef,
        message: String,
    },
}
