//! Descriptor por defecto: `{prefix_}{level_}{descriptor}_{YYYYMMDD}_v{NNN}.{ext}`
//! bajo `YYYY/MM/DD/`.
//!
//! El formato debe reproducirse bit a bit para compatibilidad con los
//! ficheros ya publicados.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::MetadataDescriptor;
use crate::constants::{FILE_DATE_FORMAT, FOLDER_DATE_FORMAT};
use crate::errors::DescriptorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultDescriptor {
    pub prefix: Option<String>,
    pub level: Option<String>,
    pub descriptor: String,
    pub date: NaiveDateTime,
    pub version: u32,
    pub extension: String,
}

impl DefaultDescriptor {
    pub fn builder() -> DefaultDescriptorBuilder {
        DefaultDescriptorBuilder::default()
    }

    /// Descriptor base con prefijo y nivel aplicados (`prefix_level_descriptor`).
    fn qualified_descriptor(&self) -> String {
        let mut out = self.descriptor.clone();
        if let Some(level) = &self.level {
            out = format!("{level}_{out}");
        }
        if let Some(prefix) = &self.prefix {
            out = format!("{prefix}_{out}");
        }
        out
    }
}

impl MetadataDescriptor for DefaultDescriptor {
    fn folder_structure(&self) -> String {
        self.date.format(FOLDER_DATE_FORMAT).to_string()
    }

    fn file_name(&self) -> String {
        format!("{}_{}_v{:03}.{}",
                self.qualified_descriptor(),
                self.date.format(FILE_DATE_FORMAT),
                self.version,
                self.extension)
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    fn date(&self) -> Option<NaiveDateTime> {
        Some(self.date)
    }
}

/// Builder de `DefaultDescriptor`.
///
/// `descriptor`, `date` y `extension` son obligatorios; `version` arranca en 0
/// si no se indica.
#[derive(Debug, Default, Clone)]
pub struct DefaultDescriptorBuilder {
    prefix: Option<String>,
    level: Option<String>,
    descriptor: Option<String>,
    date: Option<NaiveDateTime>,
    version: Option<u32>,
    extension: Option<String>,
}

impl DefaultDescriptorBuilder {
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    pub fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn build(self) -> Result<DefaultDescriptor, DescriptorError> {
        let descriptor = self.descriptor.ok_or(DescriptorError::MissingField("descriptor"))?;
        let date = self.date.ok_or(DescriptorError::MissingField("date"))?;
        let extension = self.extension.ok_or(DescriptorError::MissingField("extension"))?;
        if descriptor.is_empty() {
            return Err(DescriptorError::Empty("descriptor"));
        }
        if extension.is_empty() {
            return Err(DescriptorError::Empty("extension"));
        }
        Ok(DefaultDescriptor { prefix: self.prefix,
                               level: self.level,
                               descriptor,
                               date,
                               version: self.version.unwrap_or(0),
                               extension })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn may_2nd() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 2).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn renders_plain_name_and_date_folder() {
        let d = DefaultDescriptor::builder().descriptor("pwr").date(may_2nd()).extension("txt").build().unwrap();
        assert_eq!(d.folder_structure(), "2025/05/02");
        assert_eq!(d.file_name(), "pwr_20250502_v000.txt");
    }

    #[test]
    fn prefix_wraps_level_wraps_descriptor() {
        let d = DefaultDescriptor::builder().prefix("imap_mag")
                                            .level("l1b")
                                            .descriptor("norm-mago")
                                            .date(may_2nd())
                                            .version(12)
                                            .extension("cdf")
                                            .build()
                                            .unwrap();
        assert_eq!(d.file_name(), "imap_mag_l1b_norm-mago_20250502_v012.cdf");
    }

    #[test]
    fn name_follows_version_mutation() {
        let mut d = DefaultDescriptor::builder().descriptor("hsk-pw").date(may_2nd()).extension("bin").build().unwrap();
        d.set_version(7);
        assert_eq!(d.version(), 7);
        assert_eq!(d.file_name(), "hsk-pw_20250502_v007.bin");
    }

    #[test]
    fn missing_fields_are_reported() {
        let err = DefaultDescriptor::builder().descriptor("pwr").extension("txt").build().unwrap_err();
        assert_eq!(err, DescriptorError::MissingField("date"));
        let err = DefaultDescriptor::builder().date(may_2nd()).extension("txt").build().unwrap_err();
        assert_eq!(err, DescriptorError::MissingField("descriptor"));
        let err = DefaultDescriptor::builder().descriptor("pwr").date(may_2nd()).extension("").build().unwrap_err();
        assert_eq!(err, DescriptorError::Empty("extension"));
    }
}
