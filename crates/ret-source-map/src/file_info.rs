//! Efficient file information for location lookups

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// A character whose UTF-8 and UTF-16 widths differ from one byte/one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct WideChar {
    /// Byte offset of the character
    offset: usize,
    len_utf8: usize,
    len_utf16: usize,
}

impl WideChar {
    fn end(&self) -> usize {
        self.offset + self.len_utf8
    }
}

/// Efficient file content analysis for location lookups
///
/// This struct stores metadata about a file that enables fast conversion
/// between byte offsets and (row, UTF-16 column) positions without storing
/// the full file content. Columns are reported in UTF-16 code units because
/// that is what editor hosts speak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Byte offsets of each newline character in the file
    line_breaks: Vec<usize>,

    /// Every non-ASCII character, in offset order
    wide_chars: Vec<WideChar>,

    /// Total length of the file in bytes
    total_length: usize,
}

impl FileInformation {
    /// Create file information by analyzing content
    ///
    /// Scans the content once to build an index of line breaks and
    /// multi-byte characters. Lookups are O(log n) via binary search.
    pub fn new(content: &str) -> Self {
        let mut line_breaks = Vec::new();
        let mut wide_chars = Vec::new();

        for (idx, ch) in content.char_indices() {
            if ch == '\n' {
                line_breaks.push(idx);
            } else if !ch.is_ascii() {
                wide_chars.push(WideChar {
                    offset: idx,
                    len_utf8: ch.len_utf8(),
                    len_utf16: ch.len_utf16(),
                });
            }
        }

        FileInformation {
            line_breaks,
            wide_chars,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset to a Location with row and UTF-16 column
    ///
    /// Offsets falling inside a multi-byte character snap back to the start
    /// of that character. Returns None if the offset is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use ret_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("hello\nworld");
    /// let loc = info.offset_to_location(6).unwrap();
    /// assert_eq!(loc.row, 1);
    /// assert_eq!(loc.column, 0);
    /// ```
    pub fn offset_to_location(&self, offset: usize) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }
        let offset = self.snap_to_char_boundary(offset);

        // line_breaks[i] is the position of the i-th newline, and that
        // newline belongs to the line it terminates.
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };

        let line_start = self.line_start(row);
        let column = self.utf16_width(line_start, offset);

        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Convert a row and UTF-16 column back to a byte offset
    ///
    /// Columns past the end of the line clamp to the line end, and a column
    /// pointing into the middle of a surrogate pair resolves to the start of
    /// that character. Returns None if the row does not exist.
    pub fn location_to_offset(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.line_count() {
            return None;
        }

        let line_start = self.line_start(row);
        let line_end = self
            .line_breaks
            .get(row)
            .copied()
            .unwrap_or(self.total_length);

        let mut offset = line_start;
        let mut col = 0;
        for wide in self.wide_chars_between(line_start, line_end) {
            let ascii_run = wide.offset - offset;
            if col + ascii_run >= column {
                return Some(offset + (column - col));
            }
            col += ascii_run;
            offset = wide.offset;

            if col + wide.len_utf16 > column {
                return Some(offset);
            }
            col += wide.len_utf16;
            offset = wide.end();
        }

        Some((offset + (column - col)).min(line_end))
    }

    /// Byte offset where `row` begins. Rows past the end map to the file end.
    pub fn line_start(&self, row: usize) -> usize {
        if row == 0 {
            0
        } else {
            self.line_breaks
                .get(row - 1)
                .map(|brk| brk + 1)
                .unwrap_or(self.total_length)
        }
    }

    /// Get the total length of the file in bytes
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Get the number of lines in the file
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }

    fn wide_chars_between(&self, start: usize, end: usize) -> &[WideChar] {
        let lo = self.wide_chars.partition_point(|w| w.offset < start);
        let hi = self.wide_chars.partition_point(|w| w.offset < end);
        &self.wide_chars[lo..hi]
    }

    fn utf16_width(&self, start: usize, end: usize) -> usize {
        let bytes = end - start;
        let savings: usize = self
            .wide_chars_between(start, end)
            .iter()
            .map(|w| w.len_utf8 - w.len_utf16)
            .sum();
        bytes - savings
    }

    fn snap_to_char_boundary(&self, offset: usize) -> usize {
        let idx = self.wide_chars.partition_point(|w| w.offset < offset);
        match idx.checked_sub(1).map(|i| self.wide_chars[i]) {
            Some(wide) if offset < wide.end() => wide.offset,
            _ => offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file() {
        let info = FileInformation::new("");
        assert_eq!(info.total_length(), 0);
        assert_eq!(info.line_count(), 1);

        let loc = info.offset_to_location(0).unwrap();
        assert_eq!(loc.offset, 0);
        assert_eq!(loc.row, 0);
        assert_eq!(loc.column, 0);
    }

    #[test]
    fn test_multiple_lines() {
        let content = "line 1\nline 2\nline 3";
        let info = FileInformation::new(content);
        assert_eq!(info.line_count(), 3);

        // At first newline (offset 6 is '\n')
        let loc = info.offset_to_location(6).unwrap();
        assert_eq!(loc.row, 0);
        assert_eq!(loc.column, 6);

        // Start of second line
        let loc = info.offset_to_location(7).unwrap();
        assert_eq!(loc.row, 1);
        assert_eq!(loc.column, 0);

        // End of file
        let loc = info.offset_to_location(20).unwrap();
        assert_eq!(loc.row, 2);
        assert_eq!(loc.column, 6);
    }

    #[test]
    fn test_out_of_bounds() {
        let info = FileInformation::new("hello");
        assert!(info.offset_to_location(100).is_none());
        assert!(info.location_to_offset(3, 0).is_none());
    }

    #[test]
    fn test_columns_count_utf16_units() {
        // 'é' is 2 bytes / 1 unit, '😀' is 4 bytes / 2 units
        let content = "é😀x\nwörld";
        let info = FileInformation::new(content);

        let x = content.find('x').unwrap();
        assert_eq!(x, 6);
        let loc = info.offset_to_location(x).unwrap();
        assert_eq!((loc.row, loc.column), (0, 3));

        let r = content.find('r').unwrap();
        let loc = info.offset_to_location(r).unwrap();
        assert_eq!((loc.row, loc.column), (1, 2));
    }

    #[test]
    fn test_offset_inside_char_snaps_back() {
        let info = FileInformation::new("aé");
        let loc = info.offset_to_location(2).unwrap();
        assert_eq!(loc.offset, 1);
        assert_eq!(loc.column, 1);
    }

    #[test]
    fn test_location_to_offset_round_trip() {
        let content = "{\n  \"grüße\": 1,\n  \"😀\": 2\n}";
        let info = FileInformation::new(content);

        for (offset, _) in content.char_indices() {
            let loc = info.offset_to_location(offset).unwrap();
            assert_eq!(
                info.location_to_offset(loc.row, loc.column),
                Some(offset),
                "offset {offset} via {loc:?}"
            );
        }
    }

    #[test]
    fn test_location_to_offset_clamps_to_line_end() {
        let info = FileInformation::new("ab\ncd");
        assert_eq!(info.location_to_offset(0, 10), Some(2));
        assert_eq!(info.location_to_offset(1, 10), Some(5));
    }

    #[test]
    fn test_file_ending_with_newline() {
        let content = "line 1\nline 2\n";
        let info = FileInformation::new(content);
        assert_eq!(info.line_count(), 3);

        let loc = info.offset_to_location(14).unwrap();
        assert_eq!(loc.row, 2);
        assert_eq!(loc.column, 0);
        assert_eq!(info.line_start(2), 14);
    }
}
