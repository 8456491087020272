//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../demos/config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    if output::is_json() {
        output::report(
            "config.init",
            json!({ "path": path.display().to_string() }),
        );
        return Ok(());
    }

    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note(&format!(
        "2. Run: bundlefit config validate -c {}",
        path.display()
    ));
    output::note(&format!(
        "3. Run: bundlefit allocate request.toml -c {}",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    if output::is_json() {
        output::report("config.show", json!({ "config": serde_json::to_value(&config)? }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Path", path.display());

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    output::section("Solver");
    output::field("Backend", config.solver.backend);
    output::field("Verbose", config.solver.verbose);
    output::field(
        "Time limit",
        config
            .solver
            .time_limit_secs
            .map_or_else(|| "none".to_string(), |secs| format!("{secs}s")),
    );

    output::section("Allocation");
    output::field("Weight tolerance", config.allocation.weight_tolerance);
    output::field("Clamp tolerance", config.allocation.clamp_tolerance);

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;

    if output::is_json() {
        output::report(
            "config.validate",
            json!({ "path": path.display().to_string(), "valid": true }),
        );
        return Ok(());
    }

    output::section("Config Validation");
    output::field("Path", path.display());
    output::success("Config file is valid");
    output::field(
        "Next",
        format!("bundlefit config show -c {}", path.display()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp directory")
    }

    #[test]
    fn test_config_template_parses_to_defaults() {
        let config = Config::parse_toml(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_execute_init_creates_parent_directories() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("nested").join("bundlefit.toml");

        execute_init(&config_path, false).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_init_fails_if_file_exists_without_force() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("bundlefit.toml");
        fs::write(&config_path, "existing content").unwrap();

        assert!(execute_init(&config_path, false).is_err());
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "existing content"
        );
    }

    #[test]
    fn test_execute_init_overwrites_with_force() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("bundlefit.toml");
        fs::write(&config_path, "existing content").unwrap();

        execute_init(&config_path, true).unwrap();

        assert_eq!(fs::read_to_string(&config_path).unwrap(), CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_validate_reports_invalid_config() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("bundlefit.toml");
        fs::write(&config_path, "[allocation]\nweight_tolerance = -1\n").unwrap();

        assert!(execute_validate(&config_path).is_err());
    }
}
