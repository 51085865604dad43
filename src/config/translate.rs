//! Translation of the `configuration` element into PHPMD arguments.
//!
//! All lookups search the whole subtree below the element, not just direct
//! children: a `source` nested inside an `exclude` is picked up by both.

use std::path::Path;

use super::document::{ConfigDocument, Element};
use super::ConfigError;

/// Analyzer options read from a `configuration` element.
///
/// Optional sections that are absent (or flatten to nothing) are empty or
/// `None` and produce no argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub sources: Vec<String>,
    pub output_mode: String,
    pub excludes: Vec<String>,
    pub minimum_priority: Option<String>,
    pub report_file: Option<String>,
    pub suffixes: Vec<String>,
    pub strict: bool,
}

/// Locate the single `configuration` element anywhere in the document.
pub fn configuration_element(document: &ConfigDocument) -> Result<Element<'_>, ConfigError> {
    let mut found = document.find_elements("configuration").into_iter();
    let configuration = found
        .next()
        .ok_or_else(|| schema("No configuration section found"))?;
    if let Some(extra) = found.next() {
        return Err(schema_at(&extra, "More than one configuration section found"));
    }
    Ok(configuration)
}

/// Translate a `configuration` element into the ordered analyzer arguments.
///
/// `config_path` is passed through verbatim as the third argument.
pub fn translate(
    configuration: Element<'_>,
    config_path: &Path,
) -> Result<Vec<String>, ConfigError> {
    Ok(AnalyzerOptions::from_element(configuration)?.to_arguments(config_path))
}

impl AnalyzerOptions {
    /// Read and validate every section, failing on the first violation.
    pub fn from_element(configuration: Element<'_>) -> Result<Self, ConfigError> {
        if configuration.find_elements("source").is_empty() {
            return Err(schema("No source defined"));
        }
        let sources = flatten_groups(&configuration, "source", "path");
        if sources.is_empty() {
            return Err(schema("No source paths defined"));
        }

        let output = at_most_one(&configuration, "output", "output")?
            .ok_or_else(|| schema("No output defined"))?;
        let output_mode =
            required_attribute(&output, "mode", "Output does not have a mode defined")?;

        let excludes = flatten_groups(&configuration, "exclude", "path");

        let minimum_priority = at_most_one(&configuration, "minimum-priority", "minimum priority")?
            .map(|element| {
                required_attribute(
                    &element,
                    "value",
                    "Minimum priority does not have a value defined",
                )
            })
            .transpose()?;

        let report_file = at_most_one(&configuration, "report", "report file")?
            .map(|element| {
                required_attribute(&element, "file", "Report file does not have a file defined")
            })
            .transpose()?;

        let suffixes = flatten_groups(&configuration, "suffixes", "suffix");
        let strict = !configuration.find_elements("strict").is_empty();

        Ok(AnalyzerOptions {
            sources,
            output_mode: output_mode.to_string(),
            excludes,
            minimum_priority: minimum_priority.map(String::from),
            report_file: report_file.map(String::from),
            suffixes,
            strict,
        })
    }

    /// Render the argument vector in PHPMD's positional order:
    /// sources, output mode, config path, then the optional flags.
    pub fn to_arguments(&self, config_path: &Path) -> Vec<String> {
        let mut arguments = vec![
            self.sources.join(","),
            self.output_mode.clone(),
            config_path.to_string_lossy().into_owned(),
        ];

        if !self.excludes.is_empty() {
            arguments.push(format!("--exclude={}", self.excludes.join(",")));
        }
        if let Some(priority) = &self.minimum_priority {
            arguments.push(format!("--minimumpriority={priority}"));
        }
        if let Some(file) = &self.report_file {
            arguments.push(format!("--reportfile={file}"));
        }
        if !self.suffixes.is_empty() {
            arguments.push(format!("--suffixes={}", self.suffixes.join(",")));
        }
        if self.strict {
            arguments.push("--strict".to_string());
        }
        arguments
    }
}

/// Text of every `leaf_tag` under every `group_tag`, group order first,
/// then leaf order within the group. No sorting or deduplication.
fn flatten_groups(configuration: &Element<'_>, group_tag: &str, leaf_tag: &str) -> Vec<String> {
    configuration
        .find_elements(group_tag)
        .iter()
        .flat_map(|group| group.find_elements(leaf_tag))
        .map(|leaf| leaf.text())
        .collect()
}

fn at_most_one<'a>(
    configuration: &Element<'a>,
    tag: &str,
    what: &str,
) -> Result<Option<Element<'a>>, ConfigError> {
    let mut found = configuration.find_elements(tag).into_iter();
    let first = found.next();
    if let Some(extra) = found.next() {
        return Err(schema_at(&extra, format!("More than one {what} defined")));
    }
    Ok(first)
}

fn required_attribute<'a>(
    element: &Element<'a>,
    name: &str,
    message: &str,
) -> Result<&'a str, ConfigError> {
    element
        .attribute(name)
        .ok_or_else(|| schema_at(element, message))
}

fn schema(message: impl Into<String>) -> ConfigError {
    ConfigError::SchemaError(message.into())
}

fn schema_at(element: &Element<'_>, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::SchemaError(format!("line {}: {message}", element.line()))
}
