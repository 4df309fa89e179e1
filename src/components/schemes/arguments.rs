//! Launch arguments and environment variables of scheme actions.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{Error, Result};
use crate::native::scheme::{CommandLineArgument, EnvironmentVariable};

/// One argument: bare characters, or quoted runs kept whole
const ARGUMENT_PATTERN: &str = r#"(?:[^\s"']+|"[^"]*"|'[^']*')+"#;

/// Split a shell-like argument string into enabled arguments
pub fn split(arguments: &str) -> Result<Vec<CommandLineArgument>> {
    let regex = Regex::new(ARGUMENT_PATTERN).map_err(Error::Regex)?;
    Ok(regex
        .find_iter(arguments)
        .map(|m| CommandLineArgument {
            argument: m.as_str().to_string(),
            enabled: true,
        })
        .collect())
}

/// Enabled arguments joined back with single spaces
pub fn join(arguments: &[CommandLineArgument]) -> String {
    arguments
        .iter()
        .filter(|a| a.enabled)
        .map(|a| a.argument.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Enabled variables, sorted by key
pub fn environment_variables(environment: &BTreeMap<String, String>) -> Vec<EnvironmentVariable> {
    environment
        .iter()
        .map(|(key, value)| EnvironmentVariable {
            key: key.clone(),
            value: value.clone(),
            enabled: true,
        })
        .collect()
}

pub fn environment(variables: &[EnvironmentVariable]) -> BTreeMap<String, String> {
    variables
        .iter()
        .filter(|v| v.enabled)
        .map(|v| (v.key.clone(), v.value.clone()))
        .collect()
}
