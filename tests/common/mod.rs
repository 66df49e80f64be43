#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use playbook_pdf::config::{Library, Options};
use tempfile::TempDir;

pub const A4: (f32, f32) = (595.0, 842.0);
pub const HALF_A4: (f32, f32) = (595.0, 421.0);

/// Army list export used across the tests. The two Intercessor entries are
/// consecutive and get fused.
pub const LIST: &str = "\
Strike Team (1995 points)
Space Marines
Dark Angels
Strike Force (2000 points)
Gladius Task Force


CHARACTER

Captain (80 points)
  \u{2022} 1x Captain
    1x Master-crafted power weapon

BATTLELINE

Intercessor Squad (80 points)
  \u{2022} 5x Intercessors

Intercessor Squad (85 points)
  \u{2022} 5x Intercessors
    1x Astartes grenade launcher
";

/// Page sizes of the test codex: full rules pages, one odd-sized detachment
/// page, then half pages for the armoury and the datasheets.
pub fn codex_sizes() -> Vec<(f32, f32)> {
    let mut sizes = vec![A4; 10];
    sizes[4] = (600.0, 800.0);
    sizes.extend(std::iter::repeat_n(HALF_A4, 14));
    sizes
}

/// Write a PDF whose page `n` shows "Page n", all pages sharing one font.
pub fn write_codex(path: &Path, sizes: &[(f32, f32)]) {
    write_codex_with(path, sizes, false);
}

/// Like [`write_codex`], with page 1 drawn by two content streams. Neither
/// stream ends with a newline.
pub fn write_split_codex(path: &Path, sizes: &[(f32, f32)]) {
    write_codex_with(path, sizes, true);
}

fn write_codex_with(path: &Path, sizes: &[(f32, f32)], split_first: bool) {
    let mut pdf = Pdf::new();
    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let font_id = Ref::new(3);
    let extra_id = Ref::new(4 + 2 * sizes.len() as i32);
    pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

    let mut page_ids = Vec::new();
    for (i, (w, h)) in sizes.iter().enumerate() {
        let page_id = Ref::new(4 + 2 * i as i32);
        let content_id = Ref::new(5 + 2 * i as i32);
        let split = split_first && i == 0;
        page_ids.push(page_id);
        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, *w, *h)).parent(pages_id);
            if split {
                page.contents_array([content_id, extra_id]);
            } else {
                page.contents(content_id);
            }
            page.resources().fonts().pair(Name(b"F1"), font_id);
        }
        let label = format!("Page {}", i + 1);
        let mut content = Content::new();
        content
            .begin_text()
            .set_font(Name(b"F1"), 24.0)
            .next_line(72.0, 72.0)
            .show(Str(label.as_bytes()))
            .end_text();
        pdf.stream(content_id, &content.finish());
        if split {
            pdf.stream(extra_id, b"q 0 0 1 rg Q");
        }
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    fs::write(path, pdf.finish()).expect("write codex");
}

/// Decoded content of every Form XObject of `doc`.
pub fn form_contents(doc: &Document) -> Vec<String> {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .is_ok_and(|n| n == b"Form")
        })
        .map(|s| {
            let data = s.decompressed_content().unwrap_or_else(|_| s.content.clone());
            String::from_utf8_lossy(&data).into_owned()
        })
        .collect()
}

pub const SPACE_MARINES_INDEX: &str = "\
associated_file: codex.pdf
army_rule: 1
detachments:
  - name: Gladius Task Force
    rule: 5
    stratagems: [6, 7]
    enhancements: 8
  - name: Firestorm Assault Force
    rule: 2
    stratagems: 3
    enhancements: null
armoury_full_pages: [9, 10]
armoury_half_pages: [11, 12]
datasheets:
  Captain: [20, 21]
  intercessor squad: [22, 23]
";

/// A library directory with an index dir and a data root.
pub struct Fixture {
    pub dir: TempDir,
    pub library: Library,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let index_dir = dir.path().join("pdf_index");
        let data_root = dir.path().join("pdf");
        fs::create_dir_all(&index_dir).expect("create index dir");
        fs::create_dir_all(&data_root).expect("create data root");
        Fixture {
            dir,
            library: Library {
                index_dir,
                data_root,
            },
        }
    }

    /// The Space Marines index and its codex.
    pub fn space_marines() -> Self {
        let fixture = Fixture::new();
        fixture.write_index("Space Marines", SPACE_MARINES_INDEX);
        write_codex(&fixture.library.data_root.join("codex.pdf"), &codex_sizes());
        fixture
    }

    pub fn write_index(&self, army: &str, yaml: &str) -> PathBuf {
        let path = self.library.index_dir.join(format!("{army}.yaml"));
        fs::write(&path, yaml).expect("write index");
        path
    }

    pub fn options(&self) -> Options {
        Options {
            library: self.library.clone(),
            ..Options::default()
        }
    }
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn as_number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r as f32,
        other => panic!("not a number: {other:?}"),
    }
}

/// (width, height) of a page's MediaBox.
pub fn media_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let page = doc.get_dictionary(page_id).expect("page dict");
    let mbox = page
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .expect("MediaBox array");
    let v: Vec<f32> = mbox.iter().map(as_number).collect();
    (v[2] - v[0], v[3] - v[1])
}

pub fn page_text(doc: &Document, page_id: ObjectId) -> String {
    let content = doc.get_page_content(page_id).expect("page content");
    String::from_utf8_lossy(&content).into_owned()
}

/// Names in a page's /Resources sub-dictionary, e.g. `Font` or `XObject`.
pub fn resource_names(doc: &Document, page_id: ObjectId, kind: &[u8]) -> Vec<String> {
    let page = doc.get_dictionary(page_id).expect("page dict");
    let Ok(resources) = page.get(b"Resources") else {
        return Vec::new();
    };
    let resources = match resources {
        Object::Reference(id) => doc.get_dictionary(*id).expect("resources"),
        Object::Dictionary(d) => d,
        other => panic!("unexpected resources {other:?}"),
    };
    let Ok(sub) = resources.get(kind) else {
        return Vec::new();
    };
    let sub = match sub {
        Object::Reference(id) => doc.get_dictionary(*id).expect("sub dict"),
        Object::Dictionary(d) => d,
        other => panic!("unexpected sub dict {other:?}"),
    };
    sub.iter()
        .map(|(k, _)| String::from_utf8_lossy(k).into_owned())
        .collect()
}
