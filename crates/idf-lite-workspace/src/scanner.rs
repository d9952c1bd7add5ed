// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object scanner for IDF text
//!
//! Splits IDF text into raw object bodies: `!` comments are stripped per line,
//! and text is accumulated until the terminating `;`. Each body remembers the
//! line it started on.

use memchr::memchr;
use rustc_hash::FxHashMap;

/// Comment-free text of one object, up to and including `;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawObject {
    /// 1-based line of the first non-blank character
    pub line: usize,
    pub text: String,
    /// False when input ended before `;`
    pub terminated: bool,
}

impl RawObject {
    /// Type name as written (text before the first `,` or `;`)
    pub fn type_name(&self) -> &str {
        let end = self
            .text
            .find([',', ';'])
            .unwrap_or(self.text.len());
        self.text[..end].trim()
    }
}

/// Line-oriented object scanner
pub struct ObjectScanner<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    pending: String,
    pending_line: usize,
}

impl<'a> ObjectScanner<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().enumerate(),
            pending: String::new(),
            pending_line: 1,
        }
    }

    /// Count objects by lower-cased type name
    pub fn count_by_type(content: &'a str) -> FxHashMap<String, usize> {
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        for raw in Self::new(content) {
            *counts.entry(raw.type_name().to_lowercase()).or_insert(0) += 1;
        }
        counts
    }
}

impl Iterator for ObjectScanner<'_> {
    type Item = RawObject;

    fn next(&mut self) -> Option<RawObject> {
        loop {
            if let Some(end) = memchr(b';', self.pending.as_bytes()) {
                let rest = self.pending.split_off(end + 1);
                let text = std::mem::replace(&mut self.pending, rest);
                if text[..end].trim().is_empty() {
                    continue;
                }
                return Some(RawObject {
                    line: self.pending_line,
                    text,
                    terminated: true,
                });
            }

            let Some((index, line)) = self.lines.next() else {
                if self.pending.trim().is_empty() {
                    return None;
                }
                return Some(RawObject {
                    line: self.pending_line,
                    text: std::mem::take(&mut self.pending),
                    terminated: false,
                });
            };

            let code = match memchr(b'!', line.as_bytes()) {
                Some(pos) => &line[..pos],
                None => line,
            };
            if self.pending.trim().is_empty() {
                self.pending.clear();
                if code.trim().is_empty() {
                    continue;
                }
                self.pending_line = index + 1;
            }
            self.pending.push_str(code);
            self.pending.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IDF: &str = "! Header comment\n\
Version,9.6;\n\
\n\
Material,\n\
  Brick,   !- Name\n\
  Rough,   !- Roughness\n\
  0.1;     !- Thickness\n\
Zone, Office; Zone, Lab;\n";

    #[test]
    fn test_scanner_splits_objects() {
        let objects: Vec<RawObject> = ObjectScanner::new(TEST_IDF).collect();
        assert_eq!(objects.len(), 4);
        assert_eq!(objects[0].type_name(), "Version");
        assert_eq!(objects[0].line, 2);
        assert_eq!(objects[1].type_name(), "Material");
        assert_eq!(objects[1].line, 4);
        assert!(!objects[1].text.contains("!-"));
        assert_eq!(objects[3].text.trim(), "Zone, Lab;");
    }

    #[test]
    fn test_unterminated_object() {
        let objects: Vec<RawObject> = ObjectScanner::new("Zone,\n  Office\n").collect();
        assert_eq!(objects.len(), 1);
        assert!(!objects[0].terminated);
    }

    #[test]
    fn test_count_by_type() {
        let counts = ObjectScanner::count_by_type(TEST_IDF);
        assert_eq!(counts.get("zone"), Some(&2));
        assert_eq!(counts.get("material"), Some(&1));
    }
}
