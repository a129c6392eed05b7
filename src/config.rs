// Run configuration.
//
// Values come from, in order of precedence: command-line flags, `BFHL_*`
// environment variables (both handled by clap), a `bfhl.toml` file, and
// finally interactive prompts for identity values that are still missing.
// Everything is merged into a plain `Settings` value that the workflow
// receives as a parameter.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::{Identity, FALLBACK_WEBHOOK_URL, GENERATE_WEBHOOK_URL};

/// Config file looked up in the working directory and under `~/.bfhl/`.
pub const CONFIG_FILE_NAME: &str = "bfhl.toml";

/// SQL file used when no source names one.
pub const DEFAULT_FINAL_SQL_PATH: &str = "final-sql.sql";

/// Identity values a run cannot start without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKey {
    Name,
    RegNo,
    Email,
}

impl IdentityKey {
    /// Prompt text for interactive input.
    pub fn label(self) -> &'static str {
        match self {
            IdentityKey::Name => "Full name",
            IdentityKey::RegNo => "Registration number",
            IdentityKey::Email => "Email",
        }
    }
}

/// Formats as the key used in `bfhl.toml`.
impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdentityKey::Name => "name",
            IdentityKey::RegNo => "regNo",
            IdentityKey::Email => "email",
        })
    }
}

/// URLs of the two gateway calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub generate_webhook: String,
    pub fallback_webhook: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            generate_webhook: GENERATE_WEBHOOK_URL.to_string(),
            fallback_webhook: FALLBACK_WEBHOOK_URL.to_string(),
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub identity: Identity,
    pub final_sql_path: PathBuf,
    pub endpoints: Endpoints,
}

/// Values contributed by a single source. `None` means the source did not
/// set the value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartialSettings {
    pub name: Option<String>,
    pub reg_no: Option<String>,
    pub email: Option<String>,
    pub final_sql_path: Option<PathBuf>,
    pub generate_url: Option<String>,
    pub fallback_url: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    bfhl: BfhlSection,
    #[serde(default)]
    endpoints: EndpointsSection,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct BfhlSection {
    name: Option<String>,
    #[serde(rename = "regNo")]
    reg_no: Option<String>,
    email: Option<String>,
    final_sql_path: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct EndpointsSection {
    generate_webhook: Option<String>,
    fallback_webhook: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PartialSettings {
    /// Parse a TOML config file. A relative `final-sql-path` is taken
    /// relative to the file's own directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: FileConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let final_sql_path = file.bfhl.final_sql_path.map(|p| {
            if p.is_relative() {
                base.join(p)
            } else {
                p
            }
        });

        Ok(PartialSettings {
            name: file.bfhl.name,
            reg_no: file.bfhl.reg_no,
            email: file.bfhl.email,
            final_sql_path,
            generate_url: file.endpoints.generate_webhook,
            fallback_url: file.endpoints.fallback_webhook,
        }
        .normalized())
    }

    /// Drop blank strings so they count as unset.
    pub fn normalized(self) -> Self {
        PartialSettings {
            name: non_blank(self.name),
            reg_no: non_blank(self.reg_no),
            email: non_blank(self.email),
            final_sql_path: self.final_sql_path.filter(|p| !p.as_os_str().is_empty()),
            generate_url: non_blank(self.generate_url),
            fallback_url: non_blank(self.fallback_url),
        }
    }

    /// Fill every value `self` leaves unset from `lower`.
    pub fn or(self, lower: PartialSettings) -> Self {
        PartialSettings {
            name: self.name.or(lower.name),
            reg_no: self.reg_no.or(lower.reg_no),
            email: self.email.or(lower.email),
            final_sql_path: self.final_sql_path.or(lower.final_sql_path),
            generate_url: self.generate_url.or(lower.generate_url),
            fallback_url: self.fallback_url.or(lower.fallback_url),
        }
    }

    fn identity_slot(&mut self, key: IdentityKey) -> &mut Option<String> {
        match key {
            IdentityKey::Name => &mut self.name,
            IdentityKey::RegNo => &mut self.reg_no,
            IdentityKey::Email => &mut self.email,
        }
    }

    /// Identity values that are still unset.
    pub fn missing_identity(&self) -> Vec<IdentityKey> {
        [
            (IdentityKey::Name, &self.name),
            (IdentityKey::RegNo, &self.reg_no),
            (IdentityKey::Email, &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key)
        .collect()
    }

    /// Ask `prompt` for each missing identity value.
    pub fn fill_missing<F>(&mut self, mut prompt: F) -> Result<()>
    where
        F: FnMut(IdentityKey) -> Result<String>,
    {
        for key in self.missing_identity() {
            *self.identity_slot(key) = non_blank(Some(prompt(key)?));
        }
        Ok(())
    }

    /// Finish merging. Fails listing every identity key that is unset.
    pub fn into_settings(self) -> Result<Settings> {
        let missing: Vec<String> = self.missing_identity().iter().map(|k| k.to_string()).collect();
        let (Some(name), Some(reg_no), Some(email)) = (self.name, self.reg_no, self.email) else {
            anyhow::bail!(
                "Missing configuration: {} (set them in {}, via BFHL_* environment variables or flags)",
                missing.join(", "),
                CONFIG_FILE_NAME
            );
        };

        let defaults = Endpoints::default();
        Ok(Settings {
            identity: Identity {
                name,
                reg_no,
                email,
            },
            final_sql_path: self
                .final_sql_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FINAL_SQL_PATH)),
            endpoints: Endpoints {
                generate_webhook: self.generate_url.unwrap_or(defaults.generate_webhook),
                fallback_webhook: self.fallback_url.unwrap_or(defaults.fallback_webhook),
            },
        })
    }
}

/// Find the config file to read. An explicitly named file must exist; the
/// default locations are optional.
pub fn locate_config(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(dirs::home_dir()
        .map(|home| home.join(".bfhl").join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file()))
}

/// Merge `overrides` (flags and env) over the config file, optionally
/// prompting for identity values that are still missing.
pub fn load_settings(
    overrides: PartialSettings,
    config_path: Option<&Path>,
    interactive: bool,
) -> Result<Settings> {
    let mut merged = overrides.normalized();
    if let Some(path) = locate_config(config_path)? {
        tracing::debug!(path = %path.display(), "reading config file");
        merged = merged.or(PartialSettings::from_file(&path)?);
    }
    if interactive {
        merged.fill_missing(crate::ui::prompt_for)?;
    }
    merged.into_settings()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use crate::test_support::EnvGuard;
    use serial_test::serial;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn file_uses_original_property_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[bfhl]
name = "Alice"
regNo = "REG1234"
email = "a@x.com"
final-sql-path = "answers/final.sql"

[endpoints]
generate-webhook = "http://localhost:9000/gen"
"#,
        );

        let partial = PartialSettings::from_file(&path).unwrap();
        assert_eq!(partial.name.as_deref(), Some("Alice"));
        assert_eq!(partial.reg_no.as_deref(), Some("REG1234"));
        assert_eq!(partial.email.as_deref(), Some("a@x.com"));
        assert_eq!(
            partial.final_sql_path,
            Some(dir.path().join("answers/final.sql"))
        );
        assert_eq!(partial.generate_url.as_deref(), Some("http://localhost:9000/gen"));
        assert_eq!(partial.fallback_url, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[bfhl]\nreg_no = \"REG1\"\n");
        let err = PartialSettings::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn higher_source_wins_and_blanks_fall_through() {
        let flags = PartialSettings {
            name: Some("Flag Name".into()),
            email: Some("  ".into()),
            ..Default::default()
        }
        .normalized();
        let file = PartialSettings {
            name: Some("File Name".into()),
            reg_no: Some("REG42".into()),
            email: Some("file@x.com".into()),
            ..Default::default()
        };

        let settings = flags.or(file).into_settings().unwrap();
        assert_eq!(settings.identity.name, "Flag Name");
        assert_eq!(settings.identity.reg_no, "REG42");
        assert_eq!(settings.identity.email, "file@x.com");
        assert_eq!(settings.final_sql_path, PathBuf::from(DEFAULT_FINAL_SQL_PATH));
        assert_eq!(settings.endpoints, Endpoints::default());
    }

    #[test]
    fn missing_identity_lists_every_key() {
        let partial = PartialSettings {
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        let err = partial.into_settings().unwrap_err();
        assert!(err.to_string().contains("Missing configuration: name, regNo"));
    }

    #[test]
    fn identity_keys_display_as_config_names() {
        let names: Vec<String> = [IdentityKey::Name, IdentityKey::RegNo, IdentityKey::Email]
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(names, vec!["name", "regNo", "email"]);
        assert_eq!(IdentityKey::RegNo.label(), "Registration number");
    }

    #[test]
    fn prompts_only_for_missing_values() {
        let mut partial = PartialSettings {
            name: Some("Alice".into()),
            ..Default::default()
        };
        let mut asked = Vec::new();
        partial
            .fill_missing(|key| {
                asked.push(key);
                Ok(format!("{}-value", key))
            })
            .unwrap();

        assert_eq!(asked, vec![IdentityKey::RegNo, IdentityKey::Email]);
        let settings = partial.into_settings().unwrap();
        assert_eq!(settings.identity.reg_no, "regNo-value");
        assert_eq!(settings.identity.email, "email-value");
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let path = write_config(dir.path(), "");
        assert_eq!(locate_config(Some(&path)).unwrap(), Some(path));
    }

    #[test]
    fn load_settings_merges_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[bfhl]\nname = \"Alice\"\nregNo = \"REG1234\"\nemail = \"a@x.com\"\n",
        );
        let overrides = PartialSettings {
            final_sql_path: Some(PathBuf::from("/tmp/answer.sql")),
            fallback_url: Some("http://localhost:1/fallback".into()),
            ..Default::default()
        };

        let settings = load_settings(overrides, Some(&path), false).unwrap();
        assert_eq!(settings.identity.name, "Alice");
        assert_eq!(settings.final_sql_path, PathBuf::from("/tmp/answer.sql"));
        assert_eq!(settings.endpoints.fallback_webhook, "http://localhost:1/fallback");
        assert_eq!(settings.endpoints.generate_webhook, GENERATE_WEBHOOK_URL);
    }

    #[test]
    #[serial]
    fn env_var_beats_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[bfhl]\nname = \"Alice\"\nregNo = \"REGFILE11\"\nemail = \"a@x.com\"\n",
        );
        let _reg_no = EnvGuard::set("BFHL_REG_NO", "REGENV22");

        let cli = Cli::try_parse_from(["bfhl-submit"]).unwrap();
        let settings = load_settings(cli.overrides(), Some(&path), false).unwrap();

        assert_eq!(settings.identity.reg_no, "REGENV22");
        assert_eq!(settings.identity.name, "Alice");
    }

    #[test]
    #[serial]
    fn flag_beats_env_var_and_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[bfhl]\nname = \"Alice\"\nregNo = \"REGFILE11\"\nemail = \"a@x.com\"\n",
        );
        let _reg_no = EnvGuard::set("BFHL_REG_NO", "REGENV22");

        let cli = Cli::try_parse_from(["bfhl-submit", "--reg-no", "REGFLAG33"]).unwrap();
        let settings = load_settings(cli.overrides(), Some(&path), false).unwrap();

        assert_eq!(settings.identity.reg_no, "REGFLAG33");
    }
}
