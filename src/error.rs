// ============================================================
// Service Error Taxonomy
// ============================================================
// Every failure a caller can observe is one of these variants.
// The HTTP layer maps each variant to a status code and a JSON
// body of the form {"error": "<message>"} — the Display strings
// below are user-visible, so they must never leak internal
// paths or backtraces.
//
// Reference: thiserror crate documentation

use thiserror::Error;

/// Errors surfaced by the prediction and retraining pipelines.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The uploaded retrain payload is not a well-formed zip archive,
    /// or one of its entries tries to escape the extraction directory.
    /// No partial state survives this error.
    #[error("uploaded file is not a valid zip archive: {0}")]
    InvalidArchive(String),

    /// The archive extracted cleanly but produced zero usable
    /// training images. The model is left untouched.
    #[error(
        "no valid images found in the archive — expected top-level \
         directories named after class labels, each containing image files"
    )]
    NoValidData,

    /// The image supplied for prediction could not be decoded.
    #[error("could not decode the supplied image: {0}")]
    DecodeFailure(String),

    /// The request carried no usable file upload.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// A retrain request arrived while another retrain was running.
    /// Retrains are serialized, never interleaved.
    #[error("a retraining run is already in progress, try again later")]
    RetrainInProgress,

    /// Training, persistence, or other server-side failures.
    /// Fatal for the request; the served model is not left
    /// partially updated.
    #[error("internal error: the operation could not be completed")]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_message_hides_the_cause() {
        // The Display string for Internal must stay generic —
        // the underlying cause goes to the logs, not the client.
        let err = ServiceError::Internal(anyhow::anyhow!("/secret/path failed"));
        assert!(!err.to_string().contains("/secret/path"));
    }

    #[test]
    fn test_client_errors_carry_a_reason() {
        let err = ServiceError::InvalidArchive("not a zip".to_string());
        assert!(err.to_string().contains("not a zip"));
    }
}
