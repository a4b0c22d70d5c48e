//! A `filter_var`-style format filter.
//!
//! A [`FilterSpec`] is built once from a filter name, an options map and a
//! list of flags; applying it to a value yields the (possibly converted) value
//! or `None` when the value does not pass.

use regex::Regex;
use serde_json::{Map, Value};
use std::net::IpAddr;
use std::sync::LazyLock;

use super::typecast;
use crate::errors::{KiraError, Result};

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)+$")
        .expect("valid email regex")
});

#[allow(clippy::expect_used)]
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<host>[^\s/?#]+)(?P<path>/[^\s?#]*)?(?:\?(?P<query>[^\s#]*))?(?:#[^\s]*)?$")
        .expect("valid url regex")
});

#[allow(clippy::expect_used)]
static MAC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}|(?:[0-9A-Fa-f]{2}-){5}[0-9A-Fa-f]{2}|(?:[0-9A-Fa-f]{4}\.){2}[0-9A-Fa-f]{4})$")
        .expect("valid mac regex")
});

#[allow(clippy::expect_used)]
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?\.)*[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?$")
        .expect("valid domain regex")
});

/// A compiled filter.
#[derive(Debug, Clone)]
pub enum FilterSpec {
    /// Integer, optionally range-checked; converts to a number.
    Int {
        /// Inclusive lower bound.
        min_range: Option<i64>,
        /// Inclusive upper bound.
        max_range: Option<i64>,
    },
    /// Float, optionally range-checked; converts to a number.
    Float {
        /// Inclusive lower bound.
        min_range: Option<f64>,
        /// Inclusive upper bound.
        max_range: Option<f64>,
        /// Accept `,` thousand separators.
        allow_thousand: bool,
    },
    /// Boolean spelled the way HTML forms spell it; converts to a bool.
    Bool,
    /// E-mail address.
    Email,
    /// Absolute URL.
    Url {
        /// Require a path component.
        path_required: bool,
        /// Require a query component.
        query_required: bool,
    },
    /// IPv4 or IPv6 address.
    Ip {
        /// Accept IPv4.
        v4: bool,
        /// Accept IPv6.
        v6: bool,
        /// Reject private ranges.
        no_private: bool,
        /// Reject reserved ranges.
        no_reserved: bool,
    },
    /// MAC address.
    Mac,
    /// Host name.
    Domain,
    /// Custom pattern.
    Regexp(Regex),
}

impl FilterSpec {
    /// Builds a filter from its name, options and flags.
    pub fn build(filter: &str, options: &Map<String, Value>, flags: &[String]) -> Result<Self> {
        let fault = |reason: String| KiraError::invalid_settings("filter_var", reason);
        let known_flags: &[&str] = match filter {
            "float" => &["allow_thousand"],
            "url" => &["path_required", "query_required"],
            "ip" => &["ipv4", "ipv6", "no_priv_range", "no_res_range"],
            _ => &[],
        };
        if let Some(unknown) = flags.iter().find(|f| !known_flags.contains(&f.as_str())) {
            return Err(fault(format!("flag '{unknown}' is not valid for filter '{filter}'")));
        }
        let has = |flag: &str| flags.iter().any(|f| f == flag);

        let int_option = |key: &str| -> Result<Option<i64>> {
            options
                .get(key)
                .map(|v| typecast::to_int(v).ok_or_else(|| fault(format!("option '{key}' must be an integer"))))
                .transpose()
        };
        let float_option = |key: &str| -> Result<Option<f64>> {
            options
                .get(key)
                .map(|v| typecast::to_float(v).ok_or_else(|| fault(format!("option '{key}' must be a number"))))
                .transpose()
        };

        let spec = match filter {
            "int" => Self::Int {
                min_range: int_option("min_range")?,
                max_range: int_option("max_range")?,
            },
            "float" => Self::Float {
                min_range: float_option("min_range")?,
                max_range: float_option("max_range")?,
                allow_thousand: has("allow_thousand"),
            },
            "bool" | "boolean" => Self::Bool,
            "email" => Self::Email,
            "url" => Self::Url {
                path_required: has("path_required"),
                query_required: has("query_required"),
            },
            "ip" => {
                let (v4, v6) = match (has("ipv4"), has("ipv6")) {
                    (false, false) => (true, true),
                    pair => pair,
                };
                Self::Ip {
                    v4,
                    v6,
                    no_private: has("no_priv_range"),
                    no_reserved: has("no_res_range"),
                }
            }
            "mac" => Self::Mac,
            "domain" => Self::Domain,
            "regexp" => {
                let pattern = options
                    .get("regexp")
                    .and_then(Value::as_str)
                    .ok_or_else(|| fault("filter 'regexp' needs a 'regexp' option".to_string()))?;
                let re = Regex::new(pattern).map_err(|e| fault(format!("bad regexp: {e}")))?;
                Self::Regexp(re)
            }
            other => return Err(fault(format!("unknown filter '{other}'"))),
        };
        Ok(spec)
    }

    /// Applies the filter. `None` means the value did not pass.
    #[must_use]
    pub fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            Self::Int { min_range, max_range } => {
                let n = match value {
                    Value::Number(n) => n.as_i64()?,
                    Value::String(s) => parse_filter_int(s.trim())?,
                    _ => return None,
                };
                let in_range = min_range.map_or(true, |min| n >= min)
                    && max_range.map_or(true, |max| n <= max);
                in_range.then(|| Value::Number(n.into()))
            }
            Self::Float { min_range, max_range, allow_thousand } => {
                let f = match value {
                    Value::Number(n) => n.as_f64()?,
                    Value::String(s) if *allow_thousand => typecast::parse_float(&s.trim().replace(',', ""))?,
                    Value::String(s) => typecast::parse_float(s.trim())?,
                    _ => return None,
                };
                let in_range = min_range.map_or(true, |min| f >= min)
                    && max_range.map_or(true, |max| f <= max);
                if in_range {
                    serde_json::Number::from_f64(f).map(Value::Number)
                } else {
                    None
                }
            }
            Self::Bool => typecast::to_bool(value).map(Value::Bool),
            Self::Email => matches_str(value, |s| EMAIL.is_match(s)),
            Self::Url { path_required, query_required } => matches_str(value, |s| {
                URL.captures(s).is_some_and(|caps| {
                    (!path_required || caps.name("path").is_some_and(|p| p.as_str().len() > 1))
                        && (!query_required || caps.name("query").is_some_and(|q| !q.as_str().is_empty()))
                })
            }),
            Self::Ip { v4, v6, no_private, no_reserved } => matches_str(value, |s| {
                let Ok(ip) = s.parse::<IpAddr>() else {
                    return false;
                };
                let family_ok = match ip {
                    IpAddr::V4(_) => *v4,
                    IpAddr::V6(_) => *v6,
                };
                family_ok && !(*no_private && is_private(&ip)) && !(*no_reserved && is_reserved(&ip))
            }),
            Self::Mac => matches_str(value, |s| MAC.is_match(s)),
            Self::Domain => matches_str(value, |s| s.len() <= 253 && DOMAIN.is_match(s)),
            Self::Regexp(re) => matches_str(value, |s| re.is_match(s)),
        }
    }
}

fn matches_str(value: &Value, check: impl Fn(&str) -> bool) -> Option<Value> {
    let text = typecast::to_string(value)?;
    check(&text).then(|| value.clone())
}

fn is_private(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private(),
        // fc00::/7
        IpAddr::V6(v6) => (v6.segments()[0] & 0xfe00) == 0xfc00,
    }
}

fn is_reserved(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let first = v4.octets()[0];
            v4.is_loopback()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                || first == 0
                || first >= 240
        }
        IpAddr::V6(v6) => {
            v6.is_loopback() || v6.is_unspecified() || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Integer text as the `int` filter reads it: optional sign, no leading zeros.
fn parse_filter_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    typecast::parse_int(text)
}
