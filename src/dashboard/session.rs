use crate::scanner::report::ScanResult;

/// Holds the most recent successful scan so filter and summary views can
/// re-render without re-invoking the scanner. At most one result lives
/// here; `commit` replaces it wholesale and nothing else mutates it.
#[derive(Debug, Default)]
pub struct Session {
    result: Option<ScanResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, result: ScanResult) {
        self.result = Some(result);
    }

    pub fn current(&self) -> Option<&ScanResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::report::{Severity, VulnRecord};
    use chrono::Local;

    fn result(image: &str, count: usize) -> ScanResult {
        let records = (0..count)
            .map(|i| VulnRecord {
                id: Some(format!("CVE-2024-{:04}", i)),
                package: "libfoo".to_string(),
                installed_version: "1.0".to_string(),
                fixed_version: None,
                severity: Severity::High,
                description: None,
                target: "app".to_string(),
                target_type: "os-pkg".to_string(),
            })
            .collect();

        ScanResult {
            image: image.to_string(),
            scanned_at: Local::now(),
            records,
        }
    }

    #[test]
    fn starts_empty() {
        assert!(Session::new().current().is_none());
    }

    #[test]
    fn commit_replaces_wholesale() {
        let mut session = Session::new();
        session.commit(result("nginx:1.14", 3));
        session.commit(result("alpine:3.19", 1));

        let current = session.current().unwrap();
        assert_eq!(current.image, "alpine:3.19");
        assert_eq!(current.records.len(), 1);
    }

    #[tokio::test]
    async fn failed_scan_leaves_prior_result_intact() {
        let mut session = Session::new();
        session.commit(result("nginx:1.14", 3));

        // Mirror the scan flow: only a successful scan reaches commit.
        let attempt = crate::scanner::invoker::run_scan("nginx; rm -rf /").await;
        if let Ok(report) = attempt {
            session.commit(ScanResult {
                image: "nginx; rm -rf /".to_string(),
                scanned_at: Local::now(),
                records: crate::scanner::normalize::normalize(&report),
            });
        }

        let current = session.current().unwrap();
        assert_eq!(current.image, "nginx:1.14");
        assert_eq!(current.records.len(), 3);
    }

    #[test]
    fn unparseable_output_never_produces_a_commit() {
        let mut session = Session::new();
        session.commit(result("nginx:1.14", 2));

        if let Ok(report) = crate::scanner::invoker::parse_output("unable to find image") {
            session.commit(ScanResult {
                image: "nginx:1.14".to_string(),
                scanned_at: Local::now(),
                records: crate::scanner::normalize::normalize(&report),
            });
        }

        let current = session.current().unwrap();
        assert_eq!(current.records.len(), 2);
    }
}
