pub mod document;
pub mod translate;

use std::path::{Path, PathBuf};

pub use document::{ConfigDocument, Element};
pub use translate::{configuration_element, translate, AnalyzerOptions};

/// Errors that can occur when loading or translating `phpmd.xml`.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("PHPMD configuration file missing: {}", .0.display())]
    #[diagnostic(
        code(phpmd_hook::config::not_found),
        help("create a phpmd.xml with a <configuration> section at the project root")
    )]
    NotFound(PathBuf),
    #[error("failed to read config: {0}")]
    #[diagnostic(code(phpmd_hook::config::read))]
    ReadError(#[from] std::io::Error),
    #[error("invalid XML: {0}")]
    #[diagnostic(code(phpmd_hook::config::parse))]
    ParseError(String),
    #[error("invalid config: {0}")]
    #[diagnostic(code(phpmd_hook::config::schema))]
    SchemaError(String),
}

/// Whether the configuration file is present as a regular file.
pub fn configuration_file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Load `config_path` and translate its `configuration` section into
/// analyzer arguments.
///
/// The config path itself is passed through as the third argument.
pub fn load_arguments(config_path: &Path) -> Result<Vec<String>, ConfigError> {
    let document = ConfigDocument::load(config_path)?;
    let configuration = configuration_element(&document)?;
    translate(configuration, config_path)
}
