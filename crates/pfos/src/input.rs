//! Reading manifest files from disk

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pfos_core::load_manifest;
use pfos_core::model::EventManifest;
use serde_json::Value;

/// Parse a manifest document. YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn parse_document(path: &Path, text: &str) -> Result<Value> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => serde_saphyr::from_str(text).wrap_err("invalid YAML"),
        _ => serde_json::from_str(text).wrap_err("invalid JSON"),
    }
}

/// Read, parse and validate a manifest file
pub fn read_manifest(path: &Path) -> Result<EventManifest> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let data = parse_document(path, &text)
        .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded manifest document");

    load_manifest(&data).wrap_err_with(|| format!("{} is not a valid manifest", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pfos_core::ValidationReport;
    use pfos_core::model::EventKind;

    const YAML: &str = r#"
startDate: "2025-01-01"
initialAccounts:
  cash: 5000
events:
  - id: salary
    kind: INCOME
    amount: 4000
    startDateOffset: 0
    metadata:
      incomeSource: salary
  - id: rent
    type: RECURRING_EXPENSE
    amount: 1500
    startDateOffset: 0
"#;

    #[test]
    fn test_reads_yaml_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.yaml");
        fs::write(&path, YAML).unwrap();

        let manifest = read_manifest(&path).unwrap();
        assert_eq!(manifest.events().len(), 2);
        assert_eq!(manifest.events()[0].kind, EventKind::CashflowIncome);
        assert_eq!(manifest.start_date(), Some(jiff::civil::date(2025, 1, 1)));
    }

    #[test]
    fn test_yaml_and_json_agree() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("plan.yml");
        fs::write(&yaml_path, YAML).unwrap();

        let value = parse_document(&yaml_path, YAML).unwrap();
        let json_path = dir.path().join("plan.json");
        fs::write(&json_path, serde_json::to_string(&value).unwrap()).unwrap();

        assert_eq!(read_manifest(&yaml_path).unwrap(), read_manifest(&json_path).unwrap());
    }

    #[test]
    fn test_invalid_manifest_keeps_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(
            &path,
            r#"{ "events": [ { "id": "x", "kind": "DEBT_PAYOFF", "monthOffset": 0 } ] }"#,
        )
        .unwrap();

        let err = read_manifest(&path).unwrap_err();
        let report = err.downcast_ref::<ValidationReport>().unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.to_string().contains("DEBT_PAYMENT"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn test_unparseable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(&path, "{ events: ").unwrap();
        let err = read_manifest(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"));
    }
}
