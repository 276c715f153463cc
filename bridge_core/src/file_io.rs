//! # File I/O Module
//!
//! Project and configuration files on disk:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## File Format
//!
//! Projects are saved as `.sbd` (slab bridge design) files containing JSON.
//! A configuration file is a bare [`DesignConfig`] in JSON; any field it
//! omits takes its default.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bridge_core::file_io::{load_project, save_project};
//! use bridge_core::project::BridgeProject;
//! use std::path::Path;
//!
//! let project = BridgeProject::new("Engineer", "SB-001", "Client");
//! let path = Path::new("bridge.sbd");
//!
//! save_project(&project, path).unwrap();
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.meta.job_id, "SB-001");
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::config::DesignConfig;
use crate::errors::{CalcError, CalcResult};
use crate::project::{BridgeProject, SCHEMA_VERSION};

/// Extension used for project files
pub const PROJECT_EXTENSION: &str = "sbd";

/// Save a project to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize project to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp over the target (atomic on most filesystems)
///
/// # Example
///
/// ```rust,no_run
/// use bridge_core::file_io::save_project;
/// use bridge_core::project::BridgeProject;
/// use std::path::Path;
///
/// let project = BridgeProject::new("Engineer", "SB-001", "Client");
/// save_project(&project, Path::new("bridge.sbd"))?;
/// # Ok::<(), bridge_core::errors::CalcError>(())
/// ```
pub fn save_project(project: &BridgeProject, path: &Path) -> CalcResult<()> {
    write_json_atomic(project, path)?;
    tracing::debug!(path = %path.display(), job_id = %project.meta.job_id, "project saved");
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(BridgeProject)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::MissingField)` - A required field is absent
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<BridgeProject> {
    let contents = read_file(path)?;

    // Check the version before the full parse so an incompatible file
    // reports a version problem rather than a schema error.
    let header: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
    let version = header
        .get("meta")
        .and_then(|meta| meta.get("version"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| CalcError::missing_field("meta.version"))?;
    validate_version(&version)?;

    let project: BridgeProject =
        serde_json::from_value(header).map_err(|e| CalcError::from_json_error(&e))?;

    tracing::debug!(path = %path.display(), version = %version, "project loaded");
    Ok(project)
}

/// Load a design configuration file. Omitted fields take their defaults.
pub fn load_config(path: &Path) -> CalcResult<DesignConfig> {
    let contents = read_file(path)?;
    let config: DesignConfig =
        serde_json::from_str(&contents).map_err(|e| CalcError::from_json_error(&e))?;
    config.validate()?;
    Ok(config)
}

/// Save a design configuration file (atomic, like projects).
pub fn save_config(config: &DesignConfig, path: &Path) -> CalcResult<()> {
    write_json_atomic(config, path)
}

fn read_file(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// `bridge.sbd` -> `bridge.sbd.tmp`
fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp.set_extension(extension);
    tmp
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .map(|p| p.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| mismatch())?;
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // In 0.x a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 {
        if file_parts[1] > current_parts[1] {
            return Err(mismatch());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::AbutmentType;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_project_path(name: &str) -> PathBuf {
        temp_dir().join(format!("bridge_core_test_{}_{}.sbd", name, std::process::id()))
    }

    #[test]
    fn test_tmp_path_generation() {
        let tmp = tmp_path_for(Path::new("/path/to/bridge.sbd"));
        assert_eq!(tmp, Path::new("/path/to/bridge.sbd.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_project_path("roundtrip");

        let mut project = BridgeProject::new("Test Engineer", "TEST-001", "Test Client");
        project.input.abutment_type = AbutmentType::Cantilever;
        project.config.allowable_afflux_m = 0.15;
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded, project);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_project_path("atomic");
        let tmp_path = tmp_path_for(&path);

        let project = BridgeProject::new("Test", "TEST", "Client");
        save_project(&project, &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());

        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());

        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("abc").is_err());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_project_path("newer");

        let mut project = BridgeProject::new("Test", "TEST", "Client");
        project.meta.version = "0.9.0".to_string();
        save_project(&project, &path).unwrap();

        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_reports_missing_field() {
        let path = temp_project_path("missing");

        let project = BridgeProject::new("Test", "TEST", "Client");
        let mut value = serde_json::to_value(&project).unwrap();
        value["input"].as_object_mut().unwrap().remove("soil");
        fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let err = load_project(&path).unwrap_err();
        assert!(matches!(err, CalcError::MissingField { ref field } if field == "soil"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_project(Path::new("/nonexistent/dir/bridge.sbd")).unwrap_err();
        assert!(matches!(err, CalcError::FileError { .. }));
    }

    #[test]
    fn test_partial_config_file() {
        let path = temp_dir().join(format!("bridge_core_test_config_{}.json", std::process::id()));
        fs::write(&path, r#"{ "allowable_afflux_m": 0.2 }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.allowable_afflux_m, 0.2);
        assert_eq!(config.min_sliding_sf, DesignConfig::default().min_sliding_sf);

        let _ = fs::remove_file(&path);
    }
}
