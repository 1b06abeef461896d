//! Ticker universe: named exchange groups with disjoint membership.
//!
//! Groups are declared in order. Construction runs a deduplication pass so
//! that every ticker belongs to exactly one group: the first group keeps all
//! of its members, every later group keeps only the tickers no earlier group
//! already holds. The declared membership is kept as well, for scans that
//! work on a single group exactly as it was listed.

use crate::error::EngineError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const DEFAULT_UNIVERSE: &str = include_str!("../../config/universe.json");

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GroupDefinition {
    pub name: String,
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerGroup {
    pub name: String,
    /// Membership as declared, uppercased, without repeats.
    pub declared: Vec<String>,
    /// Membership after deduplication against earlier groups.
    pub members: Vec<String>,
}

/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    groups: Vec<TickerGroup>,
}

/// Makes group memberships pairwise disjoint, preserving group and ticker order.
pub fn dedupe_groups(groups: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(groups.len());
    for group in groups {
        let mut kept = Vec::new();
        for ticker in group {
            if seen.insert(ticker.clone()) {
                kept.push(ticker.clone());
            }
        }
        result.push(kept);
    }
    result
}

impl Universe {
    pub fn new(definitions: Vec<GroupDefinition>) -> Result<Self, EngineError> {
        if definitions.is_empty() {
            return Err(EngineError::ConfigError("Universe has no groups".to_string()));
        }

        let mut names = HashSet::new();
        let mut declared_lists = Vec::with_capacity(definitions.len());
        for def in &definitions {
            let name = def.name.trim();
            if name.is_empty() {
                return Err(EngineError::ConfigError("Universe group with empty name".to_string()));
            }
            if !names.insert(name.to_uppercase()) {
                return Err(EngineError::ConfigError(format!("Duplicate universe group '{}'", name)));
            }
            let mut seen = HashSet::new();
            let declared: Vec<String> = def
                .tickers
                .iter()
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty() && seen.insert(t.clone()))
                .collect();
            declared_lists.push(declared);
        }

        let members = dedupe_groups(&declared_lists);
        let groups = definitions
            .into_iter()
            .zip(declared_lists)
            .zip(members)
            .map(|((def, declared), members)| TickerGroup {
                name: def.name.trim().to_string(),
                declared,
                members,
            })
            .collect();

        Ok(Universe { groups })
    }

    pub fn from_json(content: &str) -> Result<Self, EngineError> {
        let definitions: Vec<GroupDefinition> = serde_json::from_str(content)
            .map_err(|e| EngineError::ConfigError(format!("Invalid universe JSON: {}", e)))?;
        Self::new(definitions)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The embedded BIST30 / BIST50 / BIST100 / YILDIZ universe.
    pub fn load_default() -> Result<Self, EngineError> {
        Self::from_json(DEFAULT_UNIVERSE)
    }

    pub fn groups(&self) -> &[TickerGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&TickerGroup> {
        self.groups.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Groups matching `names`, in declaration order. An empty selection
    /// selects every group.
    pub fn select(&self, names: &[String]) -> Result<Vec<&TickerGroup>, EngineError> {
        if names.is_empty() {
            return Ok(self.groups.iter().collect());
        }
        if let Some(unknown) = names.iter().find(|n| self.group(n).is_none()) {
            return Err(EngineError::ConfigError(format!(
                "Unknown group '{}'. Available: {}",
                unknown,
                self.group_names().join(", ")
            )));
        }
        Ok(self
            .groups
            .iter()
            .filter(|g| names.iter().any(|n| g.name.eq_ignore_ascii_case(n)))
            .collect())
    }

    /// Every ticker of the universe, each exactly once.
    pub fn all_tickers(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(String::as_str))
            .collect()
    }
}
