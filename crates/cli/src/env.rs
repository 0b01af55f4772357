use crate::error::CliError;
use std::{collections::HashMap, fs, path::Path};
use tracing::warn;

pub const DATABASE_URL: &str = "MMQ_DATABASE_URL";
pub const DATABASE_FORMAT: &str = "MMQ_DATABASE_FORMAT";
pub const PAGE_SIZE: &str = "MMQ_PAGE_SIZE";

/// Environment variable manager that loads from system and .env files.
///
/// Later sources win: `~/.mmq/.env`, then the process environment, then an
/// explicitly requested file.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        let mut manager = Self::default();

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".mmq/.env");
            if path.is_file() {
                if let Err(e) = manager.load_from_file(&path) {
                    warn!("Ignoring {}: {}", path.display(), e);
                }
            }
        }

        manager.vars.extend(std::env::vars());
        manager
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Parses `key` when set; a value that does not parse is an error
    /// rather than silently ignored.
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, CliError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| CliError::Config(format!("Invalid value for {key}: '{raw}'"))),
        }
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();
        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_env() {
        let mut env = EnvManager::default();
        let content = r#"
# Comment
MMQ_DATABASE_URL=postgres://localhost/mappings
export MMQ_PAGE_SIZE=50
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get(DATABASE_URL), Some("postgres://localhost/mappings"));
        assert_eq!(env.get_parsed::<u64>(PAGE_SIZE).unwrap(), Some(50));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = EnvManager::default();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
EMPTY=
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("EMPTY"), None);
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = EnvManager::default();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_invalid_parsed_value() {
        let mut env = EnvManager::default();
        env.parse_env_content("MMQ_PAGE_SIZE=lots").unwrap();
        assert!(matches!(
            env.get_parsed::<u64>(PAGE_SIZE),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "MMQ_DATABASE_FORMAT=mysql").unwrap();

        let mut env = EnvManager::default();
        env.parse_env_content("MMQ_DATABASE_FORMAT=postgres").unwrap();
        env.load_from_file(file.path()).unwrap();
        assert_eq!(env.get(DATABASE_FORMAT), Some("mysql"));
    }
}
