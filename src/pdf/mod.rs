mod annot;
mod import;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::assembly::{PageContent, PlannedPage};
use crate::config::AnnotStyle;
use crate::error::Error;
use crate::fonts::register_fonts;
use crate::model::PageSize;

use annot::draw_annotation;
use import::ImportedPage;
pub use import::Sources;

struct OutputPage {
    size: PageSize,
    content: Content,
    xobjects: Vec<(String, Ref)>,
    has_text: bool,
}

impl OutputPage {
    fn new(size: PageSize) -> Self {
        OutputPage {
            size,
            content: Content::new(),
            xobjects: Vec::new(),
            has_text: false,
        }
    }

    /// Draw `page` scaled by `scale`, its MediaBox corner moved to `(x, y)`.
    fn place(&mut self, page: &ImportedPage, scale: f32, x: f32, y: f32) {
        let name = format!("Pg{}", self.xobjects.len());
        let (x0, y0) = page.origin;
        self.content.save_state();
        self.content
            .transform([scale, 0.0, 0.0, scale, x - x0 * scale, y - y0 * scale]);
        self.content.x_object(Name(name.as_bytes()));
        self.content.restore_state();
        self.xobjects.push((name, page.xobject));
    }
}

/// Write the planned pages as a PDF.
///
/// Sheets and the recap page take the `reference` size; copied pages keep
/// their own.
pub fn render(
    plan: &[PlannedPage],
    style: &AnnotStyle,
    reference: PageSize,
    sources: &mut Sources,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let fonts = register_fonts(&mut pdf, &style.font_face, &mut alloc);

    // Phase 1: import source pages and draw the page contents
    let mut outputs: Vec<OutputPage> = Vec::with_capacity(plan.len());
    for planned in plan {
        let mut out = match &planned.content {
            PageContent::Recap => OutputPage::new(reference),
            PageContent::Full(source) => {
                let imported = sources.import(source, &mut pdf, &mut alloc)?;
                let mut out = OutputPage::new(imported.size);
                out.place(&imported, 1.0, 0.0, 0.0);
                out
            }
            PageContent::Sheet { top, bottom } => {
                let mut out = OutputPage::new(reference);
                let imported = sources.import(top, &mut pdf, &mut alloc)?;
                let scale = reference.width / imported.size.width;
                out.place(&imported, scale, 0.0, (reference.height / 2.0).floor());
                if let Some(bottom) = bottom {
                    let imported = sources.import(bottom, &mut pdf, &mut alloc)?;
                    let scale = reference.width / imported.size.width;
                    out.place(&imported, scale, 0.0, 0.0);
                }
                out
            }
        };

        for annotation in &planned.annotations {
            draw_annotation(&mut out.content, annotation, style, &fonts)?;
            out.has_text = true;
        }
        outputs.push(out);
    }

    let t_pages = t0.elapsed();

    // Phase 2: page tree
    let n = outputs.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for (i, out) in outputs.into_iter().enumerate() {
        let raw = out.content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);

        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, out.size.width, out.size.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        if out.has_text {
            let mut font_dict = resources.fonts();
            for entry in fonts.entries() {
                font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }
        if !out.xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &out.xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    log::debug!(
        "Render phases: pages={:.1}ms, assembly={:.1}ms ({n} pages)",
        t_pages.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_pages).as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
