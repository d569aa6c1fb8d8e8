//! Declarative header-matching rules.
//!
//! Each rule is matched case-insensitively against the trimmed header text,
//! anchored at the start. `{level}` and `{parent}` are replaced with the sheet's
//! admin level and its parent level before compiling.

use regex::Regex;

use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRole {
    Code,
    Name,
    Parent,
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    pub role: HeaderRole,
    pub pattern: &'static str,
    /// Headers containing this text (any case) never match.
    pub exclude: Option<&'static str>,
    /// Lower tiers are tried first; the first tier with a match wins.
    pub priority: u8,
    /// The tier only counts when it matches exactly one header.
    pub unique: bool,
}

pub const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        role: HeaderRole::Code,
        pattern: r"^.*{level}.*code?",
        exclude: Some("unhcr"),
        priority: 0,
        unique: false,
    },
    HeaderRule {
        role: HeaderRole::Code,
        pattern: r"^.*pcode?",
        exclude: None,
        priority: 1,
        unique: true,
    },
    HeaderRule {
        role: HeaderRole::Name,
        pattern: r"^adm(in)?{level}(name)?_?([a-z]{2}$|name$)",
        exclude: Some("alt"),
        priority: 0,
        unique: false,
    },
    HeaderRule {
        role: HeaderRole::Name,
        pattern: r"^name_?{level}",
        exclude: Some("alt"),
        priority: 0,
        unique: false,
    },
    HeaderRule {
        role: HeaderRole::Parent,
        pattern: r"^.*{parent}.*code?",
        exclude: Some("unhcr"),
        priority: 0,
        unique: false,
    },
    HeaderRule {
        role: HeaderRole::Date,
        pattern: r"^validon$",
        exclude: None,
        priority: 0,
        unique: false,
    },
];

/// Values substituted into rule patterns for one sheet.
#[derive(Debug, Clone)]
pub struct Substitutions {
    pub level: String,
    pub parent: String,
}

impl Substitutions {
    fn apply(&self, pattern: &str) -> String {
        pattern
            .replace("{level}", &self.level)
            .replace("{parent}", &self.parent)
    }
}

struct CompiledRule {
    regex: Regex,
    exclude: Option<&'static str>,
}

impl CompiledRule {
    fn new(rule: &HeaderRule, vars: &Substitutions) -> Result<Self, ResolveError> {
        let pattern = format!("(?i){}", vars.apply(rule.pattern));
        let regex = Regex::new(&pattern).map_err(|e| ResolveError::InvalidPattern {
            pattern,
            message: e.to_string(),
        })?;
        Ok(Self {
            regex,
            exclude: rule.exclude,
        })
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        let excluded = self
            .exclude
            .is_some_and(|text| header.to_lowercase().contains(text));
        !excluded && self.regex.is_match(header)
    }
}

/// Headers matching `role`, in sheet order, taken from the first tier that matches.
///
/// A unique tier that matches more than one header yields nothing.
pub fn match_role<'h>(
    role: HeaderRole,
    headers: &'h [String],
    vars: &Substitutions,
) -> Result<Vec<&'h str>, ResolveError> {
    let mut tiers: Vec<u8> = HEADER_RULES
        .iter()
        .filter(|rule| rule.role == role)
        .map(|rule| rule.priority)
        .collect();
    tiers.sort_unstable();
    tiers.dedup();

    for tier in tiers {
        let tier_rules: Vec<&HeaderRule> = HEADER_RULES
            .iter()
            .filter(|rule| rule.role == role && rule.priority == tier)
            .collect();
        let compiled = tier_rules
            .iter()
            .map(|rule| CompiledRule::new(rule, vars))
            .collect::<Result<Vec<_>, _>>()?;
        let matched: Vec<&str> = headers
            .iter()
            .map(String::as_str)
            .filter(|header| compiled.iter().any(|rule| rule.matches(header)))
            .collect();
        if matched.is_empty() {
            continue;
        }
        if tier_rules.iter().any(|rule| rule.unique) && matched.len() != 1 {
            return Ok(Vec::new());
        }
        return Ok(matched);
    }
    Ok(Vec::new())
}
