// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output name mangling and per-run uniqueness

use rustc_hash::{FxHashMap, FxHashSet};

/// Whether `c` would change the field layout of IDF text
pub fn breaks_idf_syntax(c: char) -> bool {
    matches!(c, ',' | ';' | '!') || c.is_control()
}

/// Whether `text` can be written as one IDF field and read back unchanged
pub fn is_idf_text(text: &str) -> bool {
    text.trim() == text && !text.chars().any(breaks_idf_syntax)
}

/// Restrict a name to characters safe in simulation input
///
/// Whitespace runs become a single `_`. Letters and digits of any script are
/// kept, as are `_`, `-` and `.`; everything else is dropped. Pure, so equal
/// input mangles equally. May return an empty string.
pub fn mangle_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push('_');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

/// Drop only the characters that would break IDF syntax (`,` `;` `!`)
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !breaks_idf_syntax(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Result of claiming a name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameClaim {
    pub name: String,
    /// A suffix had to be appended
    pub renamed: bool,
    /// Every suffix up to the limit was taken; `name` is a duplicate
    pub exhausted: bool,
}

/// Tracks names issued within one translation run, per name group
///
/// Comparison is case-insensitive, matching how IDF resolves names.
#[derive(Clone, Debug)]
pub struct NameRegistry {
    taken: FxHashMap<String, FxHashSet<String>>,
    separator: &'static str,
    max_suffix: usize,
}

impl NameRegistry {
    pub fn new(separator: &'static str, max_suffix: usize) -> Self {
        Self {
            taken: FxHashMap::default(),
            separator,
            max_suffix,
        }
    }

    pub fn is_taken(&self, group: &str, name: &str) -> bool {
        self.taken
            .get(group)
            .is_some_and(|names| names.contains(&name.to_lowercase()))
    }

    /// Claim `candidate` in `group`, appending `<sep>1`, `<sep>2`, ... on collision
    pub fn claim(&mut self, group: &str, candidate: &str) -> NameClaim {
        let chosen = if !self.is_taken(group, candidate) {
            Some((candidate.to_string(), false))
        } else {
            (1..=self.max_suffix)
                .map(|n| format!("{}{}{}", candidate, self.separator, n))
                .find(|name| !self.is_taken(group, name))
                .map(|name| (name, true))
        };

        match chosen {
            Some((name, renamed)) => {
                self.taken
                    .entry(group.to_string())
                    .or_default()
                    .insert(name.to_lowercase());
                NameClaim {
                    name,
                    renamed,
                    exhausted: false,
                }
            }
            None => NameClaim {
                name: candidate.to_string(),
                renamed: false,
                exhausted: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mangle_name() {
        assert_eq!(mangle_name("Brick Wall"), "Brick_Wall");
        assert_eq!(mangle_name("  Zone  #1 (north) "), "Zone_1_north");
        assert_eq!(mangle_name("R-13.5_insul"), "R-13.5_insul");
        assert_eq!(mangle_name("Wall, exterior; !x"), "Wall_exterior_x");
        assert_eq!(mangle_name("Brick Wall"), mangle_name("Brick Wall"));
    }

    #[test]
    fn test_mangle_keeps_other_scripts() {
        assert_eq!(mangle_name("事务所"), "事务所");
        assert_eq!(mangle_name("Büro Süd"), "Büro_Süd");
        assert_eq!(mangle_name(" #!?; "), "");
    }

    #[test]
    fn test_is_idf_text() {
        assert!(is_idf_text("Brick Wall"));
        assert!(is_idf_text("事务所"));
        assert!(is_idf_text(""));
        assert!(!is_idf_text("Brick, red"));
        assert!(!is_idf_text("a;b"));
        assert!(!is_idf_text("x !- y"));
        assert!(!is_idf_text("two\nlines"));
        assert!(!is_idf_text(" padded"));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Wall, exterior; !x"), "Wall exterior x");
        assert_eq!(sanitize_name(" Space 1 "), "Space 1");
    }

    #[test]
    fn test_claim_appends_suffix_per_group() {
        let mut names = NameRegistry::new("_", 9999);
        assert_eq!(names.claim("Zone", "Office").name, "Office");
        let second = names.claim("Zone", "office");
        assert_eq!(second.name, "office_1");
        assert!(second.renamed);
        assert_eq!(names.claim("Zone", "Office").name, "Office_2");
        // Different group, independent namespace
        assert!(!names.claim("MaterialName", "Office").renamed);
    }

    #[test]
    fn test_claim_exhausts_suffix_budget() {
        let mut names = NameRegistry::new(" ", 1);
        names.claim("Zone", "A");
        assert_eq!(names.claim("Zone", "A").name, "A 1");
        let third = names.claim("Zone", "A");
        assert!(third.exhausted);
        assert_eq!(third.name, "A");
    }
}
