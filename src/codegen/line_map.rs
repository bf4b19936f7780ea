//! Mapping from generated lines back to the pseudocode
//!
//! Errors raised while running or parsing the generated program point at a
//! Python line; the map turns that into the line the user wrote.

use serde::Serialize;

/// One generated line and the source line it was produced from (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineMapping {
    pub python: usize,
    pub source: usize,
}

/// Generated-to-source line table, ordered by Python line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineMap {
    entries: Vec<LineMapping>,
}

impl LineMap {
    pub(crate) fn push(&mut self, python: usize, source: usize) {
        self.entries.push(LineMapping { python, source });
    }

    /// Move every entry down by `lines`, for text inserted above the body
    pub(crate) fn shift(&mut self, lines: usize) {
        for entry in &mut self.entries {
            entry.python += lines;
        }
    }

    pub fn entries(&self) -> &[LineMapping] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source line of a generated line. Lines produced by no statement
    /// (preamble, blank lines) resolve to the nearest mapped line, the
    /// earlier one on a tie.
    pub fn source_line(&self, python_line: usize) -> Option<usize> {
        self.entries
            .iter()
            .min_by_key(|entry| entry.python.abs_diff(python_line))
            .map(|entry| entry.source)
    }

    /// Every generated line produced from a source line
    pub fn python_lines(&self, source_line: usize) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.source == source_line)
            .map(|entry| entry.python)
    }
}

/// A generated program together with its line map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compiled {
    pub code: String,
    pub line_map: LineMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(usize, usize)]) -> LineMap {
        let mut map = LineMap::default();
        for &(python, source) in pairs {
            map.push(python, source);
        }
        map
    }

    #[test]
    fn test_source_line_lookup() {
        let map = map(&[(10, 5), (11, 6), (12, 6), (15, 8)]);
        assert_eq!(map.source_line(11), Some(6));
        assert_eq!(map.source_line(1), Some(5));
        assert_eq!(map.source_line(13), Some(6));
        assert_eq!(map.source_line(14), Some(8));
        assert_eq!(map.source_line(40), Some(8));
        assert_eq!(LineMap::default().source_line(1), None);
    }

    #[test]
    fn test_python_lines_and_shift() {
        let mut map = map(&[(1, 5), (2, 6), (3, 6)]);
        map.shift(10);
        assert_eq!(map.python_lines(6).collect::<Vec<_>>(), vec![12, 13]);
        assert_eq!(map.entries()[0], LineMapping { python: 11, source: 5 });
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_string(&map(&[(3, 1)])).unwrap();
        assert_eq!(json, r#"[{"python":3,"source":1}]"#);
    }
}
