//! Two-column packing of annotation text.
//!
//! Annotation boxes are too short for a unit's full wargear listing, so the
//! text is split into two side-by-side columns. The text is cut into groups
//! (one per model entry, one per paragraph, ...) and a group is never split
//! between the columns.

use std::iter;

use thiserror::Error;

/// Two-part group delimiter.
///
/// `group` is the hard break between two groups (`"\n"`, or `"\n\n"` for a
/// paragraph break whose blank line costs one line of budget).
/// `continuation` is the marker that starts every group after the first one
/// (a bullet, or nothing). It is consumed when splitting and put back when a
/// group is placed after another one in the same column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Separator<'a> {
    pub group: &'a str,
    pub continuation: &'a str,
}

impl Separator<'static> {
    /// One group per line.
    pub const LINE: Separator<'static> = Separator {
        group: "\n",
        continuation: "",
    };

    /// One group per blank-line separated paragraph.
    pub const PARAGRAPH: Separator<'static> = Separator {
        group: "\n\n",
        continuation: "",
    };

    /// One group per bulleted entry of a unit listing.
    pub const BULLET: Separator<'static> = Separator {
        group: "\n",
        continuation: "  \u{2022} ",
    };
}

impl Separator<'_> {
    /// Blank lines standing for the separator between two groups of the same
    /// column. The two line breaks framing the separator are not counted.
    pub fn blank_lines(&self) -> usize {
        self.group.split('\n').count().saturating_sub(2)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The box cannot hold a single line.
    #[error("a column must hold at least one line")]
    ZeroLineLimit,
}

/// A column that received more lines than the limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overflow {
    /// 1 or 2.
    pub column: u8,
    /// Line count of the column once the offending group was placed.
    pub lines: usize,
    /// The group that did not fit.
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnSplit {
    pub column1: String,
    pub column2: String,
    pub overflows: Vec<Overflow>,
}

#[derive(Default)]
struct Column {
    lines: Vec<String>,
    count: usize,
    groups: usize,
    full: bool,
}

impl Column {
    fn push_group(&mut self, group: &[&str], prefix: &str, blank_lines: usize) {
        self.lines
            .extend(iter::repeat(String::new()).take(blank_lines));
        if let Some((first, rest)) = group.split_first() {
            self.lines.push(format!("{prefix}{first}"));
            self.lines.extend(rest.iter().map(|l| l.to_string()));
        }
        self.count += blank_lines + group.len();
        self.groups += 1;
    }
}

struct Packer<'s> {
    limit: usize,
    separator: Separator<'s>,
    blank_lines: usize,
    column1: Column,
    column2: Column,
    overflows: Vec<Overflow>,
}

impl<'s> Packer<'s> {
    fn new(limit: usize, separator: Separator<'s>) -> Self {
        Packer {
            limit,
            separator,
            blank_lines: separator.blank_lines(),
            column1: Column::default(),
            column2: Column::default(),
            overflows: Vec::new(),
        }
    }

    fn place(mut self, group: &[&str]) -> Self {
        if !self.column1.full {
            if self.column1.groups == 0 {
                self.column1.push_group(group, "", 0);
                self.check_overflow(1, group);
                return self;
            }
            if self.column1.count + self.blank_lines + group.len() <= self.limit {
                self.column1
                    .push_group(group, self.separator.continuation, self.blank_lines);
                return self;
            }
            self.column1.full = true;
        }

        if self.column2.groups == 0 {
            self.column2.push_group(group, "", 0);
        } else {
            self.column2
                .push_group(group, self.separator.continuation, self.blank_lines);
        }
        self.check_overflow(2, group);
        self
    }

    fn check_overflow(&mut self, column: u8, group: &[&str]) {
        let limit = self.limit;
        let col = if column == 1 {
            &mut self.column1
        } else {
            &mut self.column2
        };
        if col.full || col.count <= limit {
            return;
        }
        col.full = true;
        self.overflows.push(Overflow {
            column,
            lines: col.count,
            text: group.join("\n"),
        });
    }

    fn finish(self) -> ColumnSplit {
        ColumnSplit {
            column1: self.column1.lines.join("\n"),
            column2: self.column2.lines.join("\n"),
            overflows: self.overflows,
        }
    }
}

/// Split `text` into its groups of non-blank lines.
/// An empty group separator makes the whole text a single group.
fn split_groups<'t>(text: &'t str, separator: &Separator<'_>) -> Vec<Vec<&'t str>> {
    let raw: Vec<&str> = if separator.group.is_empty() {
        vec![text]
    } else {
        let delimiter = format!("{}{}", separator.group, separator.continuation);
        text.split(delimiter.as_str()).collect()
    };
    raw.into_iter()
        .filter(|g| !g.trim().is_empty())
        .map(|g| g.lines().filter(|l| !l.trim().is_empty()).collect())
        .collect()
}

/// Distribute the groups of `text` over two columns of `lines_limit` lines.
///
/// Column 1 is filled in order until the next group (plus the separator's
/// blank lines) would not fit; that group and every later one go to
/// column 2. The first group of each column is neither prefixed nor
/// preceded by blank lines. Overflowing groups are still emitted and
/// reported in [`ColumnSplit::overflows`].
pub fn arrange_in_two(
    text: &str,
    lines_limit: usize,
    separator: Separator<'_>,
) -> Result<ColumnSplit, LayoutError> {
    if lines_limit == 0 {
        return Err(LayoutError::ZeroLineLimit);
    }
    let groups = split_groups(text, &separator);
    let packer = groups
        .iter()
        .fold(Packer::new(lines_limit, separator), |packer, group| {
            packer.place(group)
        });
    Ok(packer.finish())
}
