use std::path::PathBuf;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SourceConfig {
    pub csv_path: PathBuf,
    pub delimiter: Delimiter,
}

/// CSV field delimiter; always a single ASCII byte once deserialized.
#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct Delimiter(u8);

impl Delimiter {
    pub fn byte(self) -> u8 {
        self.0
    }
}

impl TryFrom<String> for Delimiter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(Self(*byte)),
            _ => Err(format!(
                "delimiter must be a single ASCII character, got {value:?}"
            )),
        }
    }
}
