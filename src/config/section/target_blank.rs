//! `[target-blank]` configuration.
//!
//! The section is kept as an untyped table so that the historical value
//! shapes (`add_css_classes = false`, space separated strings) are accepted
//! as-is, then resolved into a typed [`LinkPolicy`].
//!
//! | Key               | Type            | Effect                                   |
//! |-------------------|-----------------|------------------------------------------|
//! | `css_class`       | string or false | only rewrite anchors carrying this class |
//! | `add_css_classes` | string or false | classes prepended to rewritten anchors   |
//! | `noopener`        | bool (true)     | add `noopener` to `rel`                  |
//! | `noreferrer`      | bool (true)     | add `noreferrer` to `rel`                |
//! | `rel`             | string          | extra `rel` tokens, after the defaults   |

use serde::{Deserialize, Serialize};
use toml::Value;

use crate::config::ConfigError;
use crate::core::LinkPolicy;

/// TOML section name.
pub const SECTION: &str = "target-blank";

const CSS_CLASS: &str = "css_class";
const ADD_CSS_CLASSES: &str = "add_css_classes";
const NOOPENER: &str = "noopener";
const NOREFERRER: &str = "noreferrer";
const REL: &str = "rel";

const KNOWN_KEYS: [&str; 5] = [CSS_CLASS, ADD_CSS_CLASSES, NOOPENER, NOREFERRER, REL];

/// Raw `[target-blank]` rule table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetBlankConfig {
    rules: toml::Table,
}

impl From<toml::Table> for TargetBlankConfig {
    fn from(rules: toml::Table) -> Self {
        Self { rules }
    }
}

impl TargetBlankConfig {
    /// Resolve the rule table into a policy for `site_url`.
    ///
    /// Missing keys take their defaults; a recognized key with a value of the
    /// wrong type is an error.
    pub fn resolve(&self, site_url: Option<&str>) -> Result<LinkPolicy, ConfigError> {
        let policy = LinkPolicy::new(site_url.unwrap_or_default())
            .with_required_class(self.required_class()?)
            .with_added_classes(self.split_or_false(ADD_CSS_CLASSES)?)
            .with_noopener(self.flag(NOOPENER, true)?)
            .with_noreferrer(self.flag(NOREFERRER, true)?)
            .with_extra_rel(self.tokens(REL)?);
        Ok(policy)
    }

    /// Keys this section does not recognize, as full field paths.
    pub fn unknown_keys(&self) -> Vec<String> {
        self.rules
            .keys()
            .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
            .map(|key| format!("{SECTION}.{key}"))
            .collect()
    }

    /// `css_class`: a non-empty string, or false/absent for "no filter".
    fn required_class(&self) -> Result<Option<String>, ConfigError> {
        match self.rules.get(CSS_CLASS) {
            None | Some(Value::Boolean(false)) => Ok(None),
            Some(Value::String(class)) => {
                let class = class.trim();
                Ok((!class.is_empty()).then(|| class.to_string()))
            }
            Some(other) => Err(type_error(CSS_CLASS, "a string or false", other)),
        }
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.rules.get(key) {
            None => Ok(default),
            Some(Value::Boolean(value)) => Ok(*value),
            Some(other) => Err(type_error(key, "a boolean", other)),
        }
    }

    /// Space separated string.
    fn tokens(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.rules.get(key) {
            None => Ok(Vec::new()),
            Some(Value::String(value)) => Ok(split_tokens(value)),
            Some(other) => Err(type_error(key, "a string", other)),
        }
    }

    /// Space separated string, or false to disable.
    fn split_or_false(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.rules.get(key) {
            None | Some(Value::Boolean(false)) => Ok(Vec::new()),
            Some(Value::String(value)) => Ok(split_tokens(value)),
            Some(other) => Err(type_error(key, "a string or false", other)),
        }
    }
}

fn split_tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(String::from).collect()
}

fn type_error(key: &str, expected: &str, found: &Value) -> ConfigError {
    ConfigError::Validation(format!(
        "`{SECTION}.{key}` must be {expected}, found {}",
        found.type_str()
    ))
}
