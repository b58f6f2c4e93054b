use serde::Deserialize;

use crate::scanner::report::{Severity, VulnRecord};

const UNKNOWN_TARGET: &str = "unknown";

/// Subset of the Trivy JSON report we consume. A report without a
/// "Results" key is a clean image and deserializes to an empty list.
#[derive(Debug, Default, Deserialize)]
pub struct TrivyReport {
    #[serde(rename = "Results", default)]
    pub results: Vec<TrivyResult>,
}

#[derive(Debug, Deserialize)]
pub struct TrivyResult {
    #[serde(rename = "Target")]
    pub target: Option<String>,
    #[serde(rename = "Type")]
    pub target_type: Option<String>,
    #[serde(rename = "Vulnerabilities", default)]
    pub vulnerabilities: Vec<TrivyVulnerability>,
}

#[derive(Debug, Deserialize)]
pub struct TrivyVulnerability {
    #[serde(rename = "VulnerabilityID")]
    pub id: Option<String>,
    #[serde(rename = "PkgName", default)]
    pub pkg_name: String,
    #[serde(rename = "InstalledVersion", default)]
    pub installed_version: String,
    #[serde(rename = "FixedVersion")]
    pub fixed_version: Option<String>,
    #[serde(rename = "Severity")]
    pub severity: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
}

/// Flatten the nested report into one record per vulnerability entry,
/// keeping the scanner's emission order. Total over any well-formed
/// report: missing fields become sentinels, never errors.
pub fn normalize(report: &TrivyReport) -> Vec<VulnRecord> {
    let mut records = Vec::new();

    for result in &report.results {
        let target = result.target.as_deref().unwrap_or(UNKNOWN_TARGET);
        let target_type = result.target_type.as_deref().unwrap_or(UNKNOWN_TARGET);

        for vuln in &result.vulnerabilities {
            records.push(VulnRecord {
                id: vuln.id.clone(),
                package: vuln.pkg_name.clone(),
                installed_version: vuln.installed_version.clone(),
                fixed_version: vuln.fixed_version.clone().filter(|v| !v.is_empty()),
                severity: vuln
                    .severity
                    .as_deref()
                    .map(Severity::parse)
                    .unwrap_or(Severity::Unknown),
                description: vuln.description.clone(),
                target: target.to_string(),
                target_type: target_type.to_string(),
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TrivyReport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn sample_report_normalizes_to_two_records() {
        let report = parse(
            r#"{"Results":[{"Target":"app","Type":"os-pkg","Vulnerabilities":[
                {"VulnerabilityID":"CVE-2024-0001","PkgName":"libfoo","InstalledVersion":"1.0","Severity":"CRITICAL"},
                {"VulnerabilityID":"CVE-2024-0002","PkgName":"libfoo","InstalledVersion":"1.0","FixedVersion":"1.1","Severity":"LOW"}
            ]}]}"#,
        );

        let records = normalize(&report);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id.as_deref(), Some("CVE-2024-0001"));
        assert_eq!(records[0].severity, Severity::Critical);
        assert_eq!(records[0].fixed_version, None);
        assert_eq!(records[0].target, "app");
        assert_eq!(records[0].target_type, "os-pkg");

        assert_eq!(records[1].fixed_version.as_deref(), Some("1.1"));
        assert_eq!(records[1].severity, Severity::Low);
    }

    #[test]
    fn missing_results_key_is_a_clean_image() {
        let report = parse(r#"{"SchemaVersion":2,"ArtifactName":"nginx:1.14"}"#);
        assert!(normalize(&report).is_empty());
    }

    #[test]
    fn group_without_vulnerabilities_contributes_nothing() {
        let report = parse(r#"{"Results":[{"Target":"usr/bin/app","Type":"gobinary"}]}"#);
        assert!(normalize(&report).is_empty());
    }

    #[test]
    fn missing_severity_defaults_to_unknown() {
        let report = parse(
            r#"{"Results":[{"Target":"app","Type":"os-pkg","Vulnerabilities":[
                {"VulnerabilityID":"CVE-2024-0003","PkgName":"libbar","InstalledVersion":"2.0"}
            ]}]}"#,
        );

        let records = normalize(&report);
        assert_eq!(records[0].severity, Severity::Unknown);
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn missing_target_fields_fall_back_to_unknown() {
        let report = parse(
            r#"{"Results":[{"Vulnerabilities":[
                {"VulnerabilityID":"CVE-2024-0004","PkgName":"libbaz","InstalledVersion":"3.0","Severity":"HIGH"}
            ]}]}"#,
        );

        let records = normalize(&report);
        assert_eq!(records[0].target, "unknown");
        assert_eq!(records[0].target_type, "unknown");
    }

    #[test]
    fn empty_fixed_version_counts_as_no_fix() {
        let report = parse(
            r#"{"Results":[{"Target":"app","Type":"os-pkg","Vulnerabilities":[
                {"VulnerabilityID":"CVE-2024-0005","PkgName":"libqux","InstalledVersion":"1.2","FixedVersion":"","Severity":"MEDIUM"}
            ]}]}"#,
        );

        let records = normalize(&report);
        assert!(!records[0].is_fixable());
    }

    #[test]
    fn duplicate_records_across_targets_are_all_retained() {
        let report = parse(
            r#"{"Results":[
                {"Target":"a","Type":"os-pkg","Vulnerabilities":[{"VulnerabilityID":"CVE-1","PkgName":"p","InstalledVersion":"1","Severity":"HIGH"}]},
                {"Target":"b","Type":"lang-pkg","Vulnerabilities":[{"VulnerabilityID":"CVE-1","PkgName":"p","InstalledVersion":"1","Severity":"HIGH"}]}
            ]}"#,
        );

        let records = normalize(&report);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target, "a");
        assert_eq!(records[1].target, "b");
    }
}
