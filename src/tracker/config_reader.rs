use std::collections::BTreeMap;

use crate::tracker::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "projectName")]
    pub project_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "reportDate")]
    pub report_date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub kind: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    pub fn kind(&self) -> TrackerResult<RecordKind> {
        RecordKind::from_name(&self.kind).context(UnknownKindSnafu {
            kind: self.kind.clone(),
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(rename = "submittalDays")]
    pub submittal_days: Option<i64>,
    #[serde(rename = "rfiDays")]
    pub rfi_days: Option<i64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Filters {
    pub contractors: Option<Vec<String>>,
    pub disciplines: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "fileSources", default)]
    pub file_sources: Vec<FileSource>,
    pub thresholds: Option<Thresholds>,
    pub filters: Option<Filters>,
    pub organizations: Option<BTreeMap<String, String>>,
}

impl TrackerConfig {
    /// The extra directory entries, sorted by name.
    pub fn organization_entries(&self) -> Vec<(String, String)> {
        self.organizations
            .as_ref()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}

pub fn read_config(path: &str) -> TrackerResult<TrackerConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: TrackerConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    for cfs in config.file_sources.iter() {
        cfs.kind()?;
    }
    Ok(config)
}

pub fn read_summary(path: &str) -> TrackerResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"outputSettings": {"projectName": "P"}}"#).unwrap();
        assert_eq!(config.output_settings.project_name, "P");
        assert!(config.file_sources.is_empty());
        assert!(config.organization_entries().is_empty());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let p = std::env::temp_dir().join(format!("subtrack_{}_bad_kind.json", std::process::id()));
        fs::write(
            &p,
            r#"{"outputSettings": {"projectName": "P"},
                "fileSources": [{"kind": "change order", "filePath": "co.csv"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            read_config(&p.display().to_string()),
            Err(TrackerError::UnknownKind { .. })
        ));
    }

    #[test]
    fn malformed_config() {
        let p = std::env::temp_dir().join(format!("subtrack_{}_malformed.json", std::process::id()));
        fs::write(&p, "{ not json").unwrap();
        assert!(matches!(
            read_config(&p.display().to_string()),
            Err(TrackerError::ParsingJson { .. })
        ));
        assert!(matches!(
            read_config("/nonexistent/subtrack.json"),
            Err(TrackerError::OpeningJson { .. })
        ));
    }

    #[test]
    fn organizations_are_sorted() {
        let config: TrackerConfig = serde_json::from_str(
            r#"{"outputSettings": {"projectName": "P"},
                "organizations": {"Zed Quill": "Quill Mechanical", "Ann Lee": "Lee Design"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.organization_entries(),
            vec![
                ("Ann Lee".to_string(), "Lee Design".to_string()),
                ("Zed Quill".to_string(), "Quill Mechanical".to_string()),
            ]
        );
    }
}
