use crate::domain::{ExportError, Owner, Pet};

/// Writes the currently visible (already filtered) lists out as CSV.
pub struct CsvExporter;

impl CsvExporter {
    /// Exports pets with their expanded type and owner names. Returns the
    /// filename written, for the status bar.
    pub fn export_pets(pets: &[Pet], filename: &str) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_path(filename)?;
        writer.write_record(["name", "age", "type", "owner"])?;
        for pet in pets {
            let age = pet.age.to_string();
            let pet_type = pet.pet_type.as_ref().map(|t| t.name.as_str()).unwrap_or("");
            let owner = pet.owner.as_ref().map(|o| o.name.as_str()).unwrap_or("");
            writer.write_record([pet.name.as_str(), age.as_str(), pet_type, owner])?;
        }
        writer.flush()?;
        Ok(filename.to_string())
    }

    /// Exports owners with a semicolon-joined list of their pets' names.
    pub fn export_owners(owners: &[Owner], filename: &str) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_path(filename)?;
        writer.write_record(["name", "pets"])?;
        for owner in owners {
            let pets = owner
                .pets
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            writer.write_record([owner.name.as_str(), pets.as_str()])?;
        }
        writer.flush()?;
        Ok(filename.to_string())
    }
}
