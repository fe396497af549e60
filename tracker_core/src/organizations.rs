//! Resolution of free-text person names to organizations.
//!
//! Exports often only carry the name of the person holding an item ("Ball in Court",
//! "Assigned To", ...). The resolver turns such cells into the organizations these
//! people belong to, using a directory of known people and a few fallbacks.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use regex::Regex;

use crate::fields::UNKNOWN;

/// The people known on the project, lowercased, and their organization.
const BUILTIN_DIRECTORY: &[(&str, &str)] = &[
    ("trent eklund", "SMP"),
    ("nadia okafor", "SMP"),
    ("harold benning", "SMP"),
    ("marc-andre belisle", "CIMA+"),
    ("sophie lachance", "CIMA+"),
    ("gurpreet sandhu", "CIMA+"),
    ("rachel whitcombe", "CRB"),
    ("owen castellano", "CRB"),
    ("dmitri volkov", "CRB"),
    ("kendra mills", "Bird Construction"),
    ("jorge almeida", "Bird Construction"),
    ("tessa holloway", "Bird Construction"),
    ("liam oconnell", "Icon Electric"),
    ("priya natarajan", "Icon Electric"),
    ("bernard fox", "Owner"),
    ("amelia grant", "Owner"),
];

// Segments shorter than this are never looked up as part of a longer name.
const MIN_PARTIAL_NAME_LEN: usize = 3;

/// An immutable mapping from person name to organization.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OrganizationDirectory {
    entries: BTreeMap<String, String>,
}

impl OrganizationDirectory {
    pub fn builtin() -> OrganizationDirectory {
        OrganizationDirectory::from_entries(
            BUILTIN_DIRECTORY
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    pub fn from_entries<I: IntoIterator<Item = (String, String)>>(
        entries: I,
    ) -> OrganizationDirectory {
        let mut res = OrganizationDirectory {
            entries: BTreeMap::new(),
        };
        res.extend(entries);
        res
    }

    /// The built-in directory with some extra entries. Extra entries replace built-in
    /// entries with the same name.
    pub fn with_extra(extra: &[(String, String)]) -> OrganizationDirectory {
        let mut res = OrganizationDirectory::builtin();
        res.extend(extra.iter().cloned());
        res
    }

    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, entries: I) {
        for (name, org) in entries {
            let key = normalize_name(&name);
            let org = org.trim().to_string();
            if !key.is_empty() && !org.is_empty() {
                self.entries.insert(key, org);
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(&normalize_name(name)).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The distinct organization names, lowercased, without the party roles.
    pub fn organization_tokens(&self) -> BTreeSet<String> {
        self.entries
            .values()
            .map(|o| o.to_lowercase())
            .filter(|o| !PARTY_ROLES.contains(&o.as_str()))
            .collect()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }
}

/// Generic parties of a project. Some people resolve to them, but they name no company.
const PARTY_ROLES: &[&str] = &["owner", "architect", "consultant", "contractor", "unknown"];

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// The ways of finding the organization of a single name, tried in order.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NameStrategy {
    /// `Jane Doe (Acme Corp)`: the annotation is the organization.
    Parenthetical,
    /// The name is in the directory.
    Exact,
    /// A directory name contains the segment, or the other way around.
    /// The longest directory name wins, then the first in alphabetical order.
    Partial,
}

impl NameStrategy {
    pub const CHAIN: [NameStrategy; 3] = [
        NameStrategy::Parenthetical,
        NameStrategy::Exact,
        NameStrategy::Partial,
    ];
}

/// Resolves cells holding person names to organization labels.
#[derive(Debug, Clone)]
pub struct NameResolver {
    directory: OrganizationDirectory,
    parenthetical: Regex,
}

impl NameResolver {
    pub fn new(directory: OrganizationDirectory) -> NameResolver {
        NameResolver {
            directory,
            parenthetical: Regex::new(r"\(([^()]*)\)").expect("constant regex"),
        }
    }

    pub fn directory(&self) -> &OrganizationDirectory {
        &self.directory
    }

    /// Resolves a cell to a comma-separated, sorted list of organizations.
    ///
    /// Never fails: returns `Unknown` when nothing can be resolved. When some names
    /// resolve and others do not, the unresolved ones are dropped.
    pub fn resolve(&self, cell: &str) -> String {
        let mut orgs: BTreeSet<String> = split_names(cell)
            .iter()
            .map(|seg| {
                self.resolve_one(seg)
                    .unwrap_or_else(|| UNKNOWN.to_string())
            })
            .collect();
        if orgs.len() > 1 {
            orgs.remove(UNKNOWN);
        }
        if orgs.is_empty() {
            UNKNOWN.to_string()
        } else {
            orgs.into_iter().collect::<Vec<String>>().join(", ")
        }
    }

    /// The organization of a single name, from the first strategy that finds one.
    pub fn resolve_one(&self, segment: &str) -> Option<String> {
        let res = NameStrategy::CHAIN
            .iter()
            .find_map(|s| self.apply(*s, segment).map(|org| (*s, org)));
        debug!("resolve_one: {:?} -> {:?}", segment, res);
        res.map(|(_, org)| org)
    }

    pub fn apply(&self, strategy: NameStrategy, segment: &str) -> Option<String> {
        match strategy {
            NameStrategy::Parenthetical => self
                .parenthetical
                .captures(segment)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            NameStrategy::Exact => self
                .directory
                .lookup(&self.strip_annotations(segment))
                .map(|s| s.to_string()),
            NameStrategy::Partial => {
                let name = normalize_name(&self.strip_annotations(segment));
                if name.is_empty() {
                    return None;
                }
                let mut best: Option<(&String, &String)> = None;
                for (key, org) in self.directory.iter() {
                    let matches = name.contains(key.as_str())
                        || (name.chars().count() >= MIN_PARTIAL_NAME_LEN
                            && key.contains(name.as_str()));
                    // Iteration is in alphabetical order: only a strictly longer key replaces.
                    if matches && best.map_or(true, |(k, _)| key.len() > k.len()) {
                        best = Some((key, org));
                    }
                }
                best.map(|(_, org)| org.clone())
            }
        }
    }

    fn strip_annotations(&self, segment: &str) -> String {
        self.parenthetical
            .replace_all(segment, "")
            .trim()
            .to_string()
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        NameResolver::new(OrganizationDirectory::builtin())
    }
}

/// Splits a cell on commas, semicolons and newlines, except inside parentheses.
fn split_names(cell: &str) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut depth: usize = 0;
    for c in cell.chars() {
        match c {
            '(' => {
                depth += 1;
                cur.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                cur.push(c);
            }
            ',' | ';' | '\n' | '\r' if depth == 0 => {
                res.push(std::mem::take(&mut cur));
            }
            _ => cur.push(c),
        }
    }
    res.push(cur);
    res.iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
