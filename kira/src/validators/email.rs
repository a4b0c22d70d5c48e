//! The `email` validator.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{parse_settings, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::{KiraError, Result};
use crate::i18n::{params, Params};

const KIND: &str = "email";
const MESSAGES: &[(&str, &str)] = &[
    ("invalid", "Invalid e-mail address"),
    ("blacklisted", "E-mail addresses at {server} are not accepted"),
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmailSettings {
    #[serde(default)]
    regexp: Option<String>,
    #[serde(default)]
    black_servers: Vec<String>,
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Address syntax check plus a mail-server blacklist.
///
/// Blacklisted servers come from both the engine configuration and the
/// contract settings; matching is case-insensitive on the part after `@`.
#[derive(Debug, Clone)]
pub struct Email {
    pattern: Regex,
    black_servers: Vec<String>,
    messages: Messages,
}

impl Email {
    /// Builds from contract settings.
    pub fn build(settings: &Map<String, Value>, ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: EmailSettings = parse_settings(KIND, settings)?;
        let source = parsed.regexp.as_deref().unwrap_or(&ctx.config.email_regexp);
        let pattern = Regex::new(source)
            .map_err(|e| KiraError::invalid_settings(KIND, format!("bad 'regexp': {e}")))?;

        let mut black_servers: Vec<String> = ctx
            .config
            .email_black_servers
            .iter()
            .chain(parsed.black_servers.iter())
            .map(|server| server.trim().to_lowercase())
            .filter(|server| !server.is_empty())
            .collect();
        black_servers.sort();
        black_servers.dedup();

        Ok(Box::new(Self {
            pattern,
            black_servers,
            messages: Messages::new(KIND, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }

    /// Servers this validator rejects, lowercased.
    #[must_use]
    pub fn black_servers(&self) -> &[String] {
        &self.black_servers
    }
}

impl Validator for Email {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        let Value::String(address) = &value else {
            return Err(KiraError::type_mismatch(KIND, "a string", &value));
        };
        if !self.pattern.is_match(address) {
            return Ok(ValidatorOutcome::Rejected(self.messages.render("invalid", &Params::new())));
        }
        if let Some((_, server)) = address.rsplit_once('@') {
            let server = server.to_lowercase();
            if self.black_servers.contains(&server) {
                let message = self.messages.render("blacklisted", &params([("server", server)]));
                return Ok(ValidatorOutcome::Rejected(message));
            }
        }
        Ok(ValidatorOutcome::Accepted(value))
    }
}
