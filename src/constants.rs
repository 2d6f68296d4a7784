// src/constants.rs

/// The name of the directory containing configurator metadata for a project.
pub const CONFIGURATOR_DIR: &str = ".configurator";

/// The name of the iteration history directory (inside .configurator/).
pub const ITERATIONS_DIR: &str = "iterations";

/// The name of the backup snapshot directory (inside .configurator/).
pub const BACKUPS_DIR: &str = "backups";

/// The prefix of every backup snapshot folder name.
pub const BACKUP_PREFIX: &str = "backup";

/// The name of the applied-configuration folder at the project root.
pub const APPLIED_CONFIG_DIR: &str = ".claude";

/// The name of the component catalog file (inside .configurator/, unless overridden).
pub const CATALOG_FILENAME: &str = "components.json";

/// The name of the optional user settings file (in ~/.config/configurator/).
pub const SETTINGS_FILENAME: &str = "settings.toml";
