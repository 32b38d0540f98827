use std::path::Path;
use thiserror::Error;
use crate::domain::User;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

pub struct RosterExporter;

impl RosterExporter {
    /// Writes the roster as CSV: the fixed columns, then one column per
    /// custom field. Custom columns follow `field_names`, then any extra
    /// names found on users in first-seen order.
    pub fn export_to_csv(users: &[User], field_names: &[String], filename: &str) -> Result<String, ExportError> {
        let columns = Self::custom_columns(users, field_names);
        let wrap = |source: csv::Error| ExportError::Csv {
            path: filename.to_string(),
            source,
        };

        let mut writer = csv::Writer::from_path(Path::new(filename)).map_err(wrap)?;
        let mut header = vec!["name", "age", "contact", "role", "lat", "lng"];
        header.extend(columns.iter().map(String::as_str));
        writer.write_record(&header).map_err(wrap)?;

        for user in users {
            let (lat, lng) = match user.location {
                Some(location) => (location.lat.to_string(), location.lng.to_string()),
                None => (String::new(), String::new()),
            };
            let mut record = vec![
                user.name.clone(),
                user.age.clone(),
                user.contact.clone(),
                user.role.clone(),
                lat,
                lng,
            ];
            record.extend(
                columns
                    .iter()
                    .map(|column| user.custom_responses.get(column).unwrap_or_default().to_string()),
            );
            writer.write_record(&record).map_err(wrap)?;
        }

        writer.flush().map_err(|e| wrap(e.into()))?;
        Ok(filename.to_string())
    }

    fn custom_columns(users: &[User], field_names: &[String]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        let seen = field_names
            .iter()
            .cloned()
            .chain(users.iter().flat_map(|u| u.custom_responses.iter().map(|r| r.field_name.clone())));
        for name in seen {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        let path = path.to_str().unwrap();

        let mut ana = sample_user("Ana");
        ana.custom_responses.upsert("major", "physics");
        let mut bo = sample_user("Bo");
        bo.location = None;
        bo.custom_responses.upsert("pet", "cat");

        let written = RosterExporter::export_to_csv(&[ana, bo], &["major".to_string()], path).unwrap();
        assert_eq!(written, path);

        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, vec!["name", "age", "contact", "role", "lat", "lng", "major", "pet"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Ana");
        assert_eq!(&rows[0][4], "40");
        assert_eq!(&rows[0][6], "physics");
        assert_eq!(&rows[0][7], "");
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[1][7], "cat");
    }

    #[test]
    fn test_export_empty_roster_writes_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let path = path.to_str().unwrap();

        RosterExporter::export_to_csv(&[], &[], path).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "name,age,contact,role,lat,lng\n");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("roster.csv");

        let result = RosterExporter::export_to_csv(&[], &[], path.to_str().unwrap());

        assert!(matches!(result, Err(ExportError::Csv { .. })));
    }
}
