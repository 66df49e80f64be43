use std::fmt;
use std::path::PathBuf;

/// Inclusive, 1-based page numbers in a source PDF.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
}

impl PageRange {
    pub fn single(page: u32) -> Self {
        PageRange {
            first: page,
            last: page,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.last - self.first + 1
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "page {}", self.first)
        } else {
            write!(f, "pages {}-{}", self.first, self.last)
        }
    }
}

/// One page of a source PDF.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourcePage {
    pub origin: PathBuf,
    pub page: u32,
}

/// Header block of an army list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListHeader {
    /// The header lines as written, used for the recap annotation.
    pub text: String,
    pub list_name: String,
    pub total_points: u32,
    /// Army name, with a second line (sub-faction) joined by `" -- "`.
    pub army_name: String,
    pub game_format: String,
    pub max_points: u32,
    pub detachment: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    /// Trimmed, upper-cased name; the datasheet key.
    pub id: String,
    pub points: u32,
    /// The unit's block of the list, used as annotation text.
    pub full_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArmyList {
    pub header: ListHeader,
    /// Everything below the header, used for the recap page.
    pub body: String,
    pub units: Vec<Unit>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    pub origin: PathBuf,
    pub pages: PageRange,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from '{}'", self.pages, self.origin.display())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detachment {
    pub name: String,
    pub origin: PathBuf,
    pub rule: PageRange,
    pub stratagems: PageRange,
    pub enhancements: Option<PageRange>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Datasheet {
    pub id: String,
    pub origin: PathBuf,
    /// First page is the datasheet itself, following ones the unit composition.
    pub pages: PageRange,
    /// Annotation text; empty for armoury pages.
    pub extra_text: String,
    pub is_armoury: bool,
}

impl fmt::Display for Datasheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from '{}'", self.pages, self.origin.display())
    }
}

/// Width and height of a page in PDF points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}
