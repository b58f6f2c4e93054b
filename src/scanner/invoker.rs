use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::scanner::error::ScanError;
use crate::scanner::image;
use crate::scanner::normalize::TrivyReport;

const TRIVY_BIN: &str = "trivy";
const SCAN_TIMEOUT_MINUTES: u64 = 15;

/// Run one Trivy scan against an image reference and parse its JSON
/// report. Spawns exactly one process and waits on it fully; the same
/// 15-minute bound is passed to Trivy and enforced on our side.
pub async fn run_scan(image_ref: &str) -> Result<TrivyReport, ScanError> {
    if !image::is_valid_reference(image_ref) {
        return Err(ScanError::InvalidImageRef(image_ref.to_string()));
    }

    // Argument vector only; the reference is never shell-interpreted.
    // kill_on_drop ensures an expired timeout also stops the child
    // instead of leaving it scanning in the background.
    let scan = Command::new(TRIVY_BIN)
        .kill_on_drop(true)
        .args([
            "image",
            "--format",
            "json",
            "--quiet",
            "--scanners",
            "vuln",
            "--timeout",
        ])
        .arg(format!("{}m", SCAN_TIMEOUT_MINUTES))
        .arg(image_ref)
        .output();

    let output = timeout(Duration::from_secs(SCAN_TIMEOUT_MINUTES * 60), scan)
        .await
        .map_err(|_| ScanError::Timeout(SCAN_TIMEOUT_MINUTES))??;

    if !output.status.success() {
        return Err(ScanError::Process {
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parsing half of the invoker, split out so the blank-output and
/// bad-JSON branches are testable without a trivy binary.
pub fn parse_output(stdout: &str) -> Result<TrivyReport, ScanError> {
    if stdout.trim().is_empty() {
        return Err(ScanError::EmptyOutput);
    }

    Ok(serde_json::from_str(stdout)?)
}
