//! YAML indexes mapping an army's rules and datasheets to pages of its PDF.
//!
//! ```yaml
//! associated_file: data/pdf/Space Marines.pdf
//! army_rule: 4
//! detachments:
//!   - name: Gladius Task Force
//!     rule: 5
//!     stratagems: [6, 7]
//!     enhancements: 8
//! armoury_full_pages: [9, 10]
//! armoury_half_pages: [11, 12]
//! datasheets:
//!   CAPTAIN: [20, 21]
//! includes: []
//! includes_allies: [Imperial Agents.yaml]
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::Library;
use crate::error::Error;
use crate::model::{Datasheet, Detachment, PageRange, Rule, Unit};

/// A page reference: either one page or an inclusive `[first, last]` pair.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum PageRef {
    Single(u32),
    Range(Vec<u32>),
}

impl PageRef {
    fn resolve(&self, path: &Path, what: &str) -> Result<PageRange, Error> {
        let invalid = |reason: String| Error::InvalidIndex {
            path: path.to_path_buf(),
            reason: format!("{what}: {reason}"),
        };
        let range = match self {
            PageRef::Single(page) => PageRange::single(*page),
            PageRef::Range(pages) => match pages.as_slice() {
                [first, last] => PageRange {
                    first: *first,
                    last: *last,
                },
                _ => {
                    return Err(invalid(format!(
                        "expected a page or a [first, last] pair, got {} numbers",
                        pages.len()
                    )));
                }
            },
        };
        if range.first == 0 || range.first > range.last {
            return Err(invalid(format!(
                "invalid page range [{}, {}]",
                range.first, range.last
            )));
        }
        Ok(range)
    }
}

#[derive(Deserialize, Debug)]
struct DetachmentEntry {
    name: String,
    rule: PageRef,
    stratagems: PageRef,
    enhancements: Option<PageRef>,
}

#[derive(Deserialize, Debug)]
struct IndexFile {
    associated_file: PathBuf,
    army_rule: Option<PageRef>,
    detachments: Option<Vec<DetachmentEntry>>,
    armoury_full_pages: Option<PageRef>,
    armoury_half_pages: Option<PageRef>,
    datasheets: Option<BTreeMap<String, PageRef>>,
    includes: Option<Vec<String>>,
    includes_allies: Option<Vec<String>>,
}

/// Everything the loaded indexes know about.
#[derive(Debug, Default)]
pub struct Catalog {
    pub army_rules: Vec<Rule>,
    pub detachments: BTreeMap<String, Detachment>,
    pub armoury_full_pages: Vec<Rule>,
    pub armoury_half_pages: Vec<Datasheet>,
    pub datasheets: HashMap<String, Datasheet>,
}

/// Find the index of `army_name`, falling back to the part before `" -- "`
/// (the main army of a sub-faction).
pub fn resolve_army_index(index_dir: &Path, army_name: &str) -> Result<PathBuf, Error> {
    let candidate = index_dir.join(format!("{army_name}.yaml"));
    if candidate.is_file() {
        return Ok(candidate);
    }
    let Some((main_army, _)) = army_name.split_once(" -- ") else {
        return Err(Error::ArmyNotFound(army_name.to_string()));
    };
    log::warn!("No index for '{army_name}', trying '{main_army}'");
    let candidate = index_dir.join(format!("{main_army}.yaml"));
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(Error::ArmyNotFound(main_army.to_string()))
    }
}

fn read_index(path: &Path) -> Result<IndexFile, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    serde_yaml::from_str(&text).map_err(|e| Error::InvalidIndex {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn army_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Catalog {
    /// Load an army index and, recursively, the indexes it includes.
    pub fn load(library: &Library, index_path: &Path) -> Result<Catalog, Error> {
        let mut catalog = Catalog::default();
        let mut visited = HashSet::new();
        catalog.load_rec(library, index_path, true, &mut visited)?;
        Ok(catalog)
    }

    fn load_rec(
        &mut self,
        library: &Library,
        index_path: &Path,
        is_main: bool,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<(), Error> {
        if !visited.insert(index_path.to_path_buf()) {
            log::warn!("Index '{}' already loaded, skipping", index_path.display());
            return Ok(());
        }
        log::info!("Loading '{}'...", index_path.display());
        let index = read_index(index_path)?;
        let origin = if index.associated_file.is_absolute() {
            index.associated_file.clone()
        } else {
            library.data_root.join(&index.associated_file)
        };

        if is_main {
            if let Some(army_rule) = &index.army_rule {
                self.army_rules.push(Rule {
                    id: army_name_of(index_path),
                    origin: origin.clone(),
                    pages: army_rule.resolve(index_path, "army_rule")?,
                });
            }
            for entry in index.detachments.iter().flatten() {
                let what = |part: &str| format!("detachment '{}' {part}", entry.name);
                let detachment = Detachment {
                    name: entry.name.clone(),
                    origin: origin.clone(),
                    rule: entry.rule.resolve(index_path, &what("rule"))?,
                    stratagems: entry.stratagems.resolve(index_path, &what("stratagems"))?,
                    enhancements: entry
                        .enhancements
                        .as_ref()
                        .map(|e| e.resolve(index_path, &what("enhancements")))
                        .transpose()?,
                };
                self.detachments.insert(entry.name.clone(), detachment);
            }
        }

        if let Some(full) = &index.armoury_full_pages {
            self.armoury_full_pages.push(Rule {
                id: "armoury".to_string(),
                origin: origin.clone(),
                pages: full.resolve(index_path, "armoury_full_pages")?,
            });
        }
        if let Some(half) = &index.armoury_half_pages {
            self.armoury_half_pages.push(Datasheet {
                id: "armoury".to_string(),
                origin: origin.clone(),
                pages: half.resolve(index_path, "armoury_half_pages")?,
                extra_text: String::new(),
                is_armoury: true,
            });
        }
        for (id, page_ref) in index.datasheets.iter().flatten() {
            let id = id.trim().to_uppercase();
            let pages = page_ref.resolve(index_path, &format!("datasheet '{id}'"))?;
            self.datasheets.insert(
                id.clone(),
                Datasheet {
                    id,
                    origin: origin.clone(),
                    pages,
                    extra_text: String::new(),
                    is_armoury: false,
                },
            );
        }

        for include in index.includes.iter().flatten() {
            let path = library.index_dir.join(include);
            self.load_rec(library, &path, true, visited)?;
        }
        if is_main {
            for include in index.includes_allies.iter().flatten() {
                let path = library.index_dir.join(include);
                self.load_rec(library, &path, false, visited)?;
            }
        }
        Ok(())
    }

    /// The single army rule of the loaded indexes.
    pub fn army_rule(&self) -> Result<&Rule, Error> {
        match self.army_rules.as_slice() {
            [rule] => Ok(rule),
            [] => Err(Error::NoArmyRule),
            rules => Err(Error::SeveralArmyRules(
                rules.iter().map(|r| r.id.clone()).collect(),
            )),
        }
    }

    pub fn detachment(&self, name: &str) -> Result<&Detachment, Error> {
        self.detachments
            .get(name)
            .ok_or_else(|| Error::DetachmentNotFound {
                name: name.to_string(),
                available: self.detachments.keys().cloned().collect(),
            })
    }

    /// The datasheet of `unit`, carrying the unit's text as annotation.
    pub fn datasheet_for(&self, unit: &Unit) -> Result<Datasheet, Error> {
        let datasheet = self
            .datasheets
            .get(&unit.id)
            .ok_or_else(|| {
                let mut available: Vec<String> = self.datasheets.keys().cloned().collect();
                available.sort();
                Error::DatasheetNotFound {
                    unit: unit.id.clone(),
                    available,
                }
            })?;
        Ok(Datasheet {
            extra_text: unit.full_text.clone(),
            ..datasheet.clone()
        })
    }
}
