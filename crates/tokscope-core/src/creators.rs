use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::username::validate_username;
use crate::ConfigError;

/// A tracked account as declared in `config/creators.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorConfig {
    pub username: String,
    #[serde(default)]
    pub niche: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatorsFile {
    pub creators: Vec<CreatorConfig>,
}

/// Load and validate the creators seed file.
///
/// Usernames are normalized in place (leading `@` stripped).
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_creators(path: &Path) -> Result<CreatorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CreatorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut creators_file: CreatorsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CreatorsFileParse)?;

    validate_creators(&mut creators_file)?;

    Ok(creators_file)
}

fn validate_creators(creators_file: &mut CreatorsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for creator in &mut creators_file.creators {
        let username = validate_username(&creator.username)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if !seen.insert(username.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate creator username: '{username}'"
            )));
        }

        creator.username = username;
        creator.niche = creator.niche.trim().to_string();
    }

    Ok(())
}
