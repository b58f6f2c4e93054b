use crate::scanner::report::{Severity, VulnRecord};

/// Active view filters. An empty severity list means no severity
/// restriction at all.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub severities: Vec<Severity>,
    pub fixable_only: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            severities: vec![Severity::Critical, Severity::High],
            fixable_only: false,
        }
    }
}

impl FilterOptions {
    pub fn matches(&self, record: &VulnRecord) -> bool {
        let severity_ok =
            self.severities.is_empty() || self.severities.contains(&record.severity);
        let fix_ok = !self.fixable_only || record.is_fixable();
        severity_ok && fix_ok
    }

    pub fn toggle_severity(&mut self, severity: Severity) {
        if self.severities.contains(&severity) {
            self.severities.retain(|s| *s != severity);
        } else {
            self.severities.push(severity);
        }
    }

    pub fn describe(&self) -> String {
        let severities = if self.severities.is_empty() {
            "all severities".to_string()
        } else {
            Severity::ALL
                .iter()
                .filter(|s| self.severities.contains(s))
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        if self.fixable_only {
            format!("{} (fixable only)", severities)
        } else {
            severities
        }
    }
}

/// Pure view over the records. Order-preserving and idempotent; the
/// input is never mutated and the scanner is never consulted.
pub fn apply(records: &[VulnRecord], options: &FilterOptions) -> Vec<VulnRecord> {
    records
        .iter()
        .filter(|record| options.matches(record))
        .cloned()
        .collect()
}
