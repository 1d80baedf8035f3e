//! Raw source-line access for comment- and text-aware checks.
//!
//! The tree model carries no comments, so the few checks that need them
//! (empty-block detection, header matching, Javadoc scanning) receive a
//! [`FileSource`] alongside the tree.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading an external text resource (header files, analyzed sources).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The resource could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Resource that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The resource's bytes are not valid in the requested charset.
    #[error("{path} is not valid {charset}")]
    Decode {
        /// Resource that failed to decode.
        path: PathBuf,
        /// Charset the caller asked for.
        charset: &'static str,
    },

    /// The caller asked for a charset outside the supported set.
    #[error("unsupported charset `{name}`")]
    UnsupportedCharset {
        /// The unrecognized charset name.
        name: String,
    },
}

/// Character encoding accepted by [`read_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Strict UTF-8.
    #[default]
    Utf8,
    /// ISO-8859-1, decoded byte-for-byte.
    Latin1,
}

impl Charset {
    /// Resolves a configuration charset name.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnsupportedCharset`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self, SourceError> {
        match name.to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Ok(Self::Utf8),
            "ISO-8859-1" | "LATIN-1" | "LATIN1" => Ok(Self::Latin1),
            _ => Err(SourceError::UnsupportedCharset {
                name: name.to_owned(),
            }),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
        }
    }
}

/// Reads a text resource as lines, in the given charset.
///
/// This is the engine's only file-reading surface; hosts that keep sources
/// in memory construct [`FileSource`] values directly instead.
///
/// # Errors
///
/// Returns a [`SourceError`] carrying the resource path and the underlying
/// cause when the file is unreadable or not valid in `charset`.
pub fn read_lines(path: &Path, charset: Charset) -> Result<Vec<String>, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = match charset {
        Charset::Utf8 => String::from_utf8(bytes).map_err(|_| SourceError::Decode {
            path: path.to_path_buf(),
            charset: charset.label(),
        })?,
        Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
    };
    Ok(split_lines(&content))
}

fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_owned).collect()
}

/// One analyzed file's path and raw lines.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    lines: Vec<String>,
}

impl FileSource {
    /// Builds a source from in-memory content.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            path: path.into(),
            lines: split_lines(content),
        }
    }

    /// Builds a source from already-split lines.
    #[must_use]
    pub fn from_lines(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// The file's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns line `n` (1-based), or `None` past the end.
    #[must_use]
    pub fn line(&self, n: usize) -> Option<&str> {
        n.checked_sub(1).and_then(|i| self.lines.get(i)).map(String::as_str)
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text from `(start_line, start_col)` inclusive to `(end_line, end_col)`
    /// exclusive, 1-based and char-indexed, with `\n` between lines.
    ///
    /// Out-of-range positions clamp to the available text.
    #[must_use]
    pub fn text_range(
        &self,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> String {
        if start_line > end_line || start_line == 0 || start_col == 0 {
            return String::new();
        }
        let mut out = String::new();
        for n in start_line..=end_line {
            let Some(line) = self.line(n) else { break };
            let from = if n == start_line { start_col - 1 } else { 0 };
            let to = if n == end_line {
                end_col.saturating_sub(1)
            } else {
                usize::MAX
            };
            if n != start_line {
                out.push('\n');
            }
            out.extend(line.chars().skip(from).take(to.saturating_sub(from)));
        }
        out
    }

    /// Byte offset of a 1-based line/column position, for diagnostic spans.
    ///
    /// Returns 0 for out-of-range positions.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let mut offset = 0;
        for (i, content) in self.lines.iter().enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += content.len() + 1;
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> FileSource {
        FileSource::new("Sample.java", "class A {\n    // note\n}\n")
    }

    #[test]
    fn line_access_is_one_based() {
        let src = source();
        assert_eq!(src.line(1), Some("class A {"));
        assert_eq!(src.line(3), Some("}"));
        assert_eq!(src.line(4), None);
        assert_eq!(src.line(0), None);
        assert_eq!(src.line_count(), 3);
    }

    #[test]
    fn text_range_spans_lines() {
        let src = source();
        // From the `{` on line 1 col 9 to the `}` on line 3 col 1, exclusive.
        assert_eq!(src.text_range(1, 9, 3, 1), "{\n    // note\n");
        // Single-line slice.
        assert_eq!(src.text_range(2, 5, 2, 12), "// note");
    }

    #[test]
    fn text_range_clamps_out_of_range() {
        let src = source();
        assert_eq!(src.text_range(3, 1, 9, 1), "}");
        assert_eq!(src.text_range(5, 1, 2, 1), "");
    }

    #[test]
    fn offset_tracks_line_starts() {
        let src = source();
        assert_eq!(src.offset_for(1, 1), 0);
        assert_eq!(src.offset_for(2, 1), 10);
        assert_eq!(src.offset_for(2, 5), 14);
    }

    #[test]
    fn charset_names_resolve() {
        assert_eq!(Charset::from_name("utf-8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::from_name("ISO-8859-1").unwrap(), Charset::Latin1);
        assert!(matches!(
            Charset::from_name("EBCDIC"),
            Err(SourceError::UnsupportedCharset { .. })
        ));
    }
}
