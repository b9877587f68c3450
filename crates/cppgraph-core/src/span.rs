use serde::{Deserialize, Serialize};

/// Source range of one syntactic element, 1-based lines and 0-based columns
/// as reported by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub file: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceRange {
    pub fn new(file: impl Into<String>, start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            file: file.into(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Position-sanity check: lines start at 1, the range does not run
    /// backwards, and columns are ordered when the range is a single line.
    pub fn is_sane(&self) -> bool {
        self.start_line >= 1
            && self.end_line >= self.start_line
            && (self.start_line < self.end_line || self.end_col >= self.start_col)
    }

    /// Whether `line:col` falls inside this range, inclusive on both ends.
    pub fn contains_pos(&self, line: u32, col: u32) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }

    /// Lexicographic extent, used to pick the *smallest* enclosing node when
    /// several ranges contain a position.
    pub fn extent(&self) -> (u64, u64) {
        let lines = (self.end_line - self.start_line) as u64;
        let cols = if self.start_line == self.end_line {
            (self.end_col.saturating_sub(self.start_col)) as u64
        } else {
            u32::MAX as u64
        };
        (lines, cols)
    }

    /// Deterministic ordering key used by the stitcher.
    pub fn sort_key(&self) -> (String, u32, u32) {
        (self.file.clone(), self.start_line, self.start_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanity_rules() {
        assert!(SourceRange::new("a.cpp", 1, 0, 1, 0).is_sane());
        assert!(SourceRange::new("a.cpp", 3, 8, 5, 0).is_sane());
        assert!(!SourceRange::new("a.cpp", 0, 0, 1, 0).is_sane());
        assert!(!SourceRange::new("a.cpp", 4, 0, 3, 0).is_sane());
        assert!(!SourceRange::new("a.cpp", 2, 9, 2, 4).is_sane());
    }

    #[test]
    fn containment_is_inclusive() {
        let r = SourceRange::new("a.cpp", 2, 4, 2, 10);
        assert!(r.contains_pos(2, 4));
        assert!(r.contains_pos(2, 10));
        assert!(!r.contains_pos(2, 11));
        assert!(!r.contains_pos(3, 0));
    }
}
