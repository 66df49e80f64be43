//! Ordering of the playbook pages.
//!
//! Rules pages are copied whole. Datasheets are half pages and are printed
//! two per sheet: the first one on the top half of a fresh sheet, the next
//! one on the bottom half.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{AnnotStyle, Features, ListMode, Options, Region};
use crate::error::Error;
use crate::index::Catalog;
use crate::layout::Separator;
use crate::model::{ArmyList, Datasheet, PageRange, PageSize, SourcePage};

/// Font size of the list header on the recap page.
pub const LIST_HEADER_FONT_SIZE: f32 = 18.0;
/// Share of the page height taken by the recap header box.
const LIST_HEADER_RATIO: f32 = 0.1;
/// Recap boxes inset, as a share of the page width.
const LIST_MARGIN_RATIO: f32 = 0.1;

/// Text box drawn over a page.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub region: Region,
    pub text: String,
    pub separator: Separator<'static>,
    /// Overrides the style's font size.
    pub font_size: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PageContent {
    /// Blank page of the reference size.
    Recap,
    /// A source page copied at its own size.
    Full(SourcePage),
    /// Reference-size page holding one or two half-page sources.
    Sheet {
        top: SourcePage,
        bottom: Option<SourcePage>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlannedPage {
    pub content: PageContent,
    pub annotations: Vec<Annotation>,
}

impl PlannedPage {
    fn new(content: PageContent) -> Self {
        PlannedPage {
            content,
            annotations: Vec::new(),
        }
    }
}

struct Sequencer<'o> {
    features: &'o Features,
    annot: &'o AnnotStyle,
    pages: Vec<PlannedPage>,
    next_is_top: bool,
    prev_is_armoury: bool,
}

impl<'o> Sequencer<'o> {
    fn new(options: &'o Options) -> Self {
        Sequencer {
            features: &options.features,
            annot: &options.annot,
            pages: Vec::new(),
            next_is_top: true,
            prev_is_armoury: true,
        }
    }

    fn copy_pages(&mut self, what: &str, origin: &Path, pages: PageRange) {
        log::info!("Adding {what} ({pages} from '{}')", origin.display());
        for page in pages.pages() {
            self.pages.push(PlannedPage::new(PageContent::Full(SourcePage {
                origin: origin.to_path_buf(),
                page,
            })));
        }
    }

    fn recap(&mut self, list: &ArmyList, reference: PageSize) {
        log::info!("Adding a first page with the list recap");
        let PageSize { width, height } = reference;
        let margin = LIST_MARGIN_RATIO * width;

        let header_h = LIST_HEADER_RATIO * height;
        let header = Region::new(margin, height - margin - header_h, width - 2.0 * margin, header_h);

        let body_h = (1.0 - LIST_HEADER_RATIO) * height - 2.0 * margin;
        let body = Region::new(
            margin,
            (1.0 - LIST_HEADER_RATIO) * height - margin - body_h,
            width - 2.0 * margin,
            body_h,
        );

        let mut page = PlannedPage::new(PageContent::Recap);
        page.annotations.push(Annotation {
            region: header,
            text: list.header.text.clone(),
            separator: Separator::LINE,
            font_size: Some(LIST_HEADER_FONT_SIZE),
        });
        page.annotations.push(Annotation {
            region: body,
            text: list.body.clone(),
            separator: Separator::PARAGRAPH,
            font_size: None,
        });
        self.pages.push(page);
    }

    fn unit_annotation(&self, region: Region, datasheet: &Datasheet) -> Option<Annotation> {
        (self.features.with_unit_annot && !datasheet.extra_text.is_empty()).then(|| Annotation {
            region,
            text: datasheet.extra_text.clone(),
            separator: Separator::BULLET,
            font_size: None,
        })
    }

    /// Place every page of `datasheet` on the sheets.
    fn datasheet(&mut self, datasheet: &Datasheet) {
        log::info!("Adding '{}' ({datasheet})", datasheet.id);
        let spans_sheets = datasheet.pages.page_count() > 1 && !datasheet.is_armoury;
        if spans_sheets {
            self.next_is_top = true;
        }
        if self.features.with_armoury_padding && self.prev_is_armoury && !datasheet.is_armoury {
            self.next_is_top = true;
        }

        for page in datasheet.pages.pages() {
            let source = SourcePage {
                origin: datasheet.origin.clone(),
                page,
            };
            if self.next_is_top {
                let mut sheet = PlannedPage::new(PageContent::Sheet {
                    top: source,
                    bottom: None,
                });
                sheet
                    .annotations
                    .extend(self.unit_annotation(self.annot.top, datasheet));
                self.pages.push(sheet);
                self.next_is_top = false;
            } else {
                let annotation = if self.features.with_unit_comp {
                    None
                } else {
                    self.unit_annotation(self.annot.bottom, datasheet)
                };
                if let Some(PlannedPage {
                    content: PageContent::Sheet { bottom, .. },
                    annotations,
                }) = self.pages.last_mut()
                {
                    *bottom = Some(source);
                    annotations.extend(annotation);
                }
                self.next_is_top = true;
            }
        }

        if spans_sheets {
            self.next_is_top = true;
        }
        self.prev_is_armoury = datasheet.is_armoury;
    }
}

/// Lay out the playbook of `list` as a sequence of pages.
///
/// `reference` is the size of the sheets and of the recap page.
pub fn plan_playbook(
    list: &ArmyList,
    catalog: &Catalog,
    options: &Options,
    reference: PageSize,
) -> Result<Vec<PlannedPage>, Error> {
    let features = &options.features;
    let army_rule = catalog.army_rule()?;
    let detachment = catalog.detachment(&list.header.detachment)?;
    log::info!(
        "Playing with army rule '{}' and detachment '{}'",
        army_rule.id,
        detachment.name
    );

    // Resolve every unit first so a missing datasheet fails before any work.
    let mut used_origins: HashSet<PathBuf> = HashSet::new();
    let mut datasheets = Vec::with_capacity(list.units.len());
    for unit in &list.units {
        let mut datasheet = catalog.datasheet_for(unit)?;
        used_origins.insert(datasheet.origin.clone());
        if !features.with_unit_comp {
            datasheet.pages = PageRange::single(datasheet.pages.first);
        }
        datasheets.push(datasheet);
    }

    let mut seq = Sequencer::new(options);

    if features.list_mode == ListMode::Full {
        seq.recap(list, reference);
    }
    if features.with_army_rule {
        seq.copy_pages(
            &format!("'{}' army rule", army_rule.id),
            &army_rule.origin,
            army_rule.pages,
        );
    }
    if features.with_detachment_rule {
        seq.copy_pages(
            &format!("'{}' detachment rule", detachment.name),
            &detachment.origin,
            detachment.rule,
        );
    }
    if features.with_detachment_stratagems {
        seq.copy_pages(
            &format!("'{}' stratagems", detachment.name),
            &detachment.origin,
            detachment.stratagems,
        );
    }
    if features.with_detachment_enhancements {
        if let Some(enhancements) = detachment.enhancements {
            seq.copy_pages(
                &format!("'{}' enhancements", detachment.name),
                &detachment.origin,
                enhancements,
            );
        }
    }

    let mut half_pages: Vec<Datasheet> = Vec::new();
    if features.with_armoury {
        for armoury in catalog
            .armoury_full_pages
            .iter()
            .filter(|r| used_origins.contains(&r.origin))
        {
            seq.copy_pages("armoury", &armoury.origin, armoury.pages);
        }
        half_pages.extend(
            catalog
                .armoury_half_pages
                .iter()
                .filter(|d| used_origins.contains(&d.origin))
                .cloned(),
        );
    }

    for datasheet in half_pages.iter().chain(&datasheets) {
        seq.datasheet(datasheet);
    }

    let mut pages = seq.pages;
    if features.list_mode == ListMode::JustHeader {
        let first = pages.first_mut().ok_or(Error::EmptyPlaybook)?;
        log::info!("Adding a header with list info");
        first.annotations.push(Annotation {
            region: options.annot.header_army,
            text: list.header.text.clone(),
            separator: Separator::LINE,
            font_size: None,
        });
    }
    if pages.is_empty() {
        return Err(Error::EmptyPlaybook);
    }
    Ok(pages)
}
