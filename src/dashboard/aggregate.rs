use std::collections::{BTreeMap, HashMap};

use crate::scanner::report::{Severity, VulnRecord};

pub const TOP_PACKAGE_LIMIT: usize = 5;

/// Summary metrics over one normalized record set.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    /// Zero-filled over all five severities, so charts never skip a tier.
    pub by_severity: BTreeMap<Severity, usize>,
    pub fixable: usize,
    pub top_packages: Vec<(String, usize)>,
}

pub fn aggregate(records: &[VulnRecord]) -> Summary {
    let mut by_severity: BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|s| (*s, 0)).collect();
    let mut fixable = 0;

    for record in records {
        *by_severity.entry(record.severity).or_insert(0) += 1;
        if record.is_fixable() {
            fixable += 1;
        }
    }

    Summary {
        total: records.len(),
        by_severity,
        fixable,
        top_packages: top_packages(records, TOP_PACKAGE_LIMIT),
    }
}

/// The `limit` most frequent package names. Ties keep first-seen input
/// order (the sort is stable and candidates are collected in that order).
pub fn top_packages(records: &[VulnRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for record in records {
        let entry = counts.entry(record.package.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(record.package.as_str());
        }
        *entry += 1;
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|name| (name.to_string(), counts[name]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
