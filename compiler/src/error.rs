use protodts_syntax::HeritageToken;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    #[error("Root file {0} is not part of the program")]
    UnknownRootFile(String),

    /// The root file uses a construct the extractor cannot handle. This is a
    /// defect in the input, not a transient condition.
    #[error("Unexpected kind of heritage clause: {token} (in interface {interface})")]
    UnexpectedHeritageClause {
        token:     HeritageToken,
        interface: String,
    },

    #[error("Diagnostic code {0} appears more than once.")]
    DuplicateDiagnosticCode(u32),

    #[error("Generated diagnostic messages are not valid JSON: {0}")]
    InvalidGeneratedJson(String),
}
