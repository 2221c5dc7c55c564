//! CSV export for failing-row extracts.

use std::path::{Path, PathBuf};

use crate::error::{InquestError, Result};
use crate::input::Table;

/// The extract file naming contract: `{agent_name}_{index:04}.csv`, with
/// `:` characters replaced by `_` so default timestamped agent names are
/// filesystem-safe.
pub fn extract_file_name(agent_name: &str, index: usize) -> String {
    format!("{}_{:04}.csv", agent_name.replace(':', "_"), index)
}

/// Write one extract to `dir`, returning the path of the created file.
pub fn export_extract(
    agent_name: &str,
    index: usize,
    extract: &Table,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let path = dir.as_ref().join(extract_file_name(agent_name, index));

    let file = std::fs::File::create(&path).map_err(|e| InquestError::Io {
        path: path.clone(),
        source: e,
    })?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&extract.headers)?;
    for row in &extract.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|e| InquestError::Io {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_contract() {
        assert_eq!(extract_file_name("myagent", 3), "myagent_0003.csv");
        assert_eq!(
            extract_file_name("agent_2024-01-02_10:30:00", 12),
            "agent_2024-01-02_10_30_00_0012.csv"
        );
        assert_eq!(extract_file_name("a", 12345), "a_12345.csv");
    }

    #[test]
    fn test_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let extract = Table::new(
            vec!["id".into(), "v".into()],
            vec![vec!["a".into(), "1".into()], vec!["b".into(), "2".into()]],
            b',',
        );

        let path = export_extract("agent", 7, &extract, dir.path()).unwrap();
        assert!(path.ends_with("agent_0007.csv"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "id,v\na,1\nb,2\n");
    }
}
