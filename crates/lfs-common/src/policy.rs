//! Sensitivity policy: which named components get redacted or tokenized.
//!
//! A policy holds an include set and an exclude set of component names
//! (LDAP attribute types or JSON field names). Configurations are expected
//! to populate at most one of the two sets meaningfully; when both are
//! empty, every name is sensitive. LDAP names are expanded against a
//! directory schema so that a policy naming `cn` also covers its OID.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An already-resolved mapping from LDAP attribute names to their OIDs.
///
/// Schema loading itself is out of scope; callers hand the framework a
/// finished name→OID map.
#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    oids_by_name: HashMap<String, String>,
}

impl AttributeSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute name and its OID. Names are matched
    /// case-insensitively, as LDAP attribute types are.
    pub fn register(&mut self, name: &str, oid: &str) {
        self.oids_by_name
            .insert(name.to_ascii_lowercase(), oid.to_string());
    }

    /// Look up the OID for an attribute name, if the schema knows it.
    pub fn oid_for(&self, name: &str) -> Option<&str> {
        self.oids_by_name
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Resolves whether a named component is sensitive under configured
/// include/exclude name sets.
///
/// Immutable after construction; safe to share across logging threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityPolicy {
    included: HashSet<String>,
    excluded: HashSet<String>,
    fold_case: bool,
}

impl SensitivityPolicy {
    /// Policy under which every component is sensitive (both sets empty).
    pub fn all_sensitive() -> Self {
        Self {
            included: HashSet::new(),
            excluded: HashSet::new(),
            fold_case: true,
        }
    }

    /// Build a policy over LDAP attribute names. Names match
    /// case-insensitively and each configured name is expanded to also
    /// cover its schema-resolved OID alias.
    pub fn for_attributes<I, E, S, T>(
        included: I,
        excluded: E,
        schema: Option<&AttributeSchema>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            included: expand_attribute_names(included, schema),
            excluded: expand_attribute_names(excluded, schema),
            fold_case: true,
        }
    }

    /// Build a policy over JSON field names. Names match exactly, with no
    /// case folding and no schema aliasing.
    pub fn for_json_fields<I, E, S, T>(included: I, excluded: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            included: included
                .into_iter()
                .map(|n| n.as_ref().to_string())
                .collect(),
            excluded: excluded
                .into_iter()
                .map(|n| n.as_ref().to_string())
                .collect(),
            fold_case: false,
        }
    }

    /// Resolve sensitivity for a component name.
    ///
    /// With a non-empty include set, a name is sensitive iff it is in the
    /// set. Otherwise, with a non-empty exclude set, a name is sensitive
    /// iff it is NOT in the set. With both sets empty, every name is
    /// sensitive.
    ///
    /// A component with no resolvable name (`None`) is not sensitive under
    /// include mode but sensitive under exclude mode and under the
    /// everything-sensitive default. The asymmetry is deliberate and
    /// load-bearing for filter leaves that carry only a matching rule ID.
    pub fn is_name_sensitive(&self, name: Option<&str>) -> bool {
        let name = name.map(|n| {
            if self.fold_case {
                n.to_ascii_lowercase()
            } else {
                n.to_string()
            }
        });

        if !self.included.is_empty() {
            match name {
                Some(n) => self.included.contains(&n),
                None => false,
            }
        } else if !self.excluded.is_empty() {
            match name {
                Some(n) => !self.excluded.contains(&n),
                None => true,
            }
        } else {
            true
        }
    }
}

impl Default for SensitivityPolicy {
    fn default() -> Self {
        // Fail-closed default
        Self::all_sensitive()
    }
}

fn expand_attribute_names<I, S>(names: I, schema: Option<&AttributeSchema>) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut expanded = HashSet::new();
    for name in names {
        let name = name.as_ref();
        if let Some(oid) = schema.and_then(|s| s.oid_for(name)) {
            expanded.insert(oid.to_ascii_lowercase());
        }
        expanded.insert(name.to_ascii_lowercase());
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_empty_policy_everything_sensitive() {
        let policy = SensitivityPolicy::all_sensitive();
        assert!(policy.is_name_sensitive(Some("cn")));
        assert!(policy.is_name_sensitive(Some("anything")));
        assert!(policy.is_name_sensitive(None));
    }

    #[test]
    fn test_include_mode() {
        let policy = SensitivityPolicy::for_attributes(["cn", "mail"], NONE, None);
        assert!(policy.is_name_sensitive(Some("cn")));
        assert!(policy.is_name_sensitive(Some("mail")));
        assert!(!policy.is_name_sensitive(Some("dc")));
    }

    #[test]
    fn test_exclude_mode() {
        let policy = SensitivityPolicy::for_attributes(NONE, ["dc", "ou"], None);
        assert!(!policy.is_name_sensitive(Some("dc")));
        assert!(!policy.is_name_sensitive(Some("ou")));
        assert!(policy.is_name_sensitive(Some("cn")));
    }

    #[test]
    fn test_unnamed_component_asymmetry() {
        let include = SensitivityPolicy::for_attributes(["cn"], NONE, None);
        let exclude = SensitivityPolicy::for_attributes(NONE, ["cn"], None);

        assert!(!include.is_name_sensitive(None));
        assert!(exclude.is_name_sensitive(None));
    }

    #[test]
    fn test_attribute_names_case_insensitive() {
        let policy = SensitivityPolicy::for_attributes(["CN"], NONE, None);
        assert!(policy.is_name_sensitive(Some("cn")));
        assert!(policy.is_name_sensitive(Some("Cn")));
    }

    #[test]
    fn test_oid_aliasing() {
        let mut schema = AttributeSchema::new();
        schema.register("cn", "2.5.4.3");

        let policy = SensitivityPolicy::for_attributes(["cn"], NONE, Some(&schema));
        assert!(policy.is_name_sensitive(Some("cn")));
        assert!(policy.is_name_sensitive(Some("2.5.4.3")));
        assert!(!policy.is_name_sensitive(Some("2.5.4.4")));
    }

    #[test]
    fn test_json_field_names_exact() {
        let policy = SensitivityPolicy::for_json_fields(["userPassword"], NONE);
        assert!(policy.is_name_sensitive(Some("userPassword")));
        assert!(!policy.is_name_sensitive(Some("userpassword")));
    }
}
