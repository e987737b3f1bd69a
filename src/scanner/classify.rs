//! File classification for the project walk.
//!
//! Spec documents are recognized by extension alone. Configuration files need
//! a config extension and must also satisfy one of the ordered name rules in
//! [`CONFIG_NAME_RULES`].

use super::ScanOptions;
use crate::core::ConfigFormat;
use std::path::Path;

/// What a discovered file is to the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    HttpSpec,
    RpcSpec,
    Config(ConfigFormat),
}

/// A named predicate over a lower-cased file name
pub struct ConfigNameRule {
    pub name: &'static str,
    matches: fn(&str, &ScanOptions) -> bool,
}

impl ConfigNameRule {
    pub fn matches(&self, file_name: &str, options: &ScanOptions) -> bool {
        (self.matches)(file_name, options)
    }
}

/// Evaluated in order; the first match wins.
pub static CONFIG_NAME_RULES: &[ConfigNameRule] = &[
    ConfigNameRule {
        name: "conventional-name",
        matches: is_conventional_name,
    },
    ConfigNameRule {
        name: "name-keyword",
        matches: contains_name_keyword,
    },
];

fn is_conventional_name(file_name: &str, options: &ScanOptions) -> bool {
    options
        .config_conventional_names
        .iter()
        .any(|name| name.eq_ignore_ascii_case(file_name))
}

fn contains_name_keyword(file_name: &str, options: &ScanOptions) -> bool {
    options
        .config_name_keywords
        .iter()
        .any(|keyword| file_name.contains(&keyword.to_lowercase()))
}

/// Name of the first config rule accepting `file_name`.
pub fn matching_config_rule(file_name: &str, options: &ScanOptions) -> Option<&'static str> {
    let lowered = file_name.to_lowercase();
    CONFIG_NAME_RULES
        .iter()
        .find(|rule| rule.matches(&lowered, options))
        .map(|rule| rule.name)
}

pub fn classify(path: &Path, options: &ScanOptions) -> Option<FileClass> {
    let ext = path.extension()?.to_str()?;

    if ext == options.http_spec_extension {
        return Some(FileClass::HttpSpec);
    }
    if ext == options.rpc_spec_extension {
        return Some(FileClass::RpcSpec);
    }

    let format = ConfigFormat::from_extension(ext)?;
    let file_name = path.file_name()?.to_str()?;
    matching_config_rule(file_name, options).map(|_| FileClass::Config(format))
}
