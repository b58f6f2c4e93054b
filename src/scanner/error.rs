use thiserror::Error;

/// Everything that can go wrong between "scan requested" and "report
/// parsed". All variants are recovered at the menu boundary; none of
/// them touch a previously committed session.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid image reference '{0}'")]
    InvalidImageRef(String),

    #[error("failed to launch trivy: {0}")]
    Launch(#[from] std::io::Error),

    #[error("trivy exited with an error:\n{stderr}")]
    Process { stderr: String },

    #[error("trivy returned no output")]
    EmptyOutput,

    #[error("trivy output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("scan did not finish within {0} minutes")]
    Timeout(u64),
}
