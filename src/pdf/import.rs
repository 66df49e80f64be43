//! Import of source PDF pages as Form XObjects.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use memmap2::Mmap;
use pdf_writer::{Filter, Name, Null, Obj, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::model::{PageSize, SourcePage};

/// Page-tree depth after which inherited attribute lookup gives up.
const MAX_TREE_DEPTH: usize = 32;

/// A source page written to the output as a Form XObject.
#[derive(Clone, Copy, Debug)]
pub(super) struct ImportedPage {
    pub(super) xobject: Ref,
    /// Lower-left corner of the source MediaBox.
    pub(super) origin: (f32, f32),
    pub(super) size: PageSize,
}

struct Source {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
    /// Source objects already written to the output.
    copied: HashMap<ObjectId, Ref>,
    imported: HashMap<u32, ImportedPage>,
}

/// The source PDFs of a run, each parsed once.
#[derive(Default)]
pub struct Sources {
    files: HashMap<PathBuf, Source>,
}

fn load_document(path: &Path) -> Result<Document, Error> {
    let file = std::fs::File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        ))
    })?;
    let data = unsafe { Mmap::map(&file) }?;
    Document::load_mem(&data).map_err(|e| Error::pdf(path, e))
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn resolve<'d>(doc: &'d Document, obj: &'d Object) -> Option<&'d Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, following the page tree for inherited ones.
fn inherited<'d>(doc: &'d Document, page_id: ObjectId, key: &[u8]) -> Option<&'d Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return resolve(doc, value);
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let Object::Array(items) = inherited(doc, page_id, b"MediaBox")? else {
        return None;
    };
    let values: Vec<f32> = items
        .iter()
        .filter_map(|item| resolve(doc, item).and_then(number))
        .collect();
    let [x0, y0, x1, y1] = values.as_slice() else {
        return None;
    };
    Some([x0.min(*x1), y0.min(*y1), x0.max(*x1), y0.max(*y1)])
}

/// Decoded content of a page. The streams of a `/Contents` array are joined
/// with a newline so tokens at stream boundaries stay apart.
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, lopdf::Error> {
    let mut content = Vec::new();
    for id in doc.get_page_contents(page_id) {
        let stream = doc.get_object(id)?.as_stream()?;
        if !content.is_empty() {
            content.push(b'\n');
        }
        match stream.decompressed_content() {
            Ok(data) => content.extend_from_slice(&data),
            Err(_) => content.extend_from_slice(&stream.content),
        }
    }
    Ok(content)
}

/// Writes objects of one source document into the output, renumbering
/// references. Each source object is written at most once.
struct ObjectCopier<'s> {
    doc: &'s Document,
    copied: &'s mut HashMap<ObjectId, Ref>,
    pending: Vec<ObjectId>,
}

impl ObjectCopier<'_> {
    fn remap(&mut self, id: ObjectId, alloc: &mut impl FnMut() -> Ref) -> Ref {
        if let Some(r) = self.copied.get(&id) {
            return *r;
        }
        let r = alloc();
        self.copied.insert(id, r);
        self.pending.push(id);
        r
    }

    fn write(&mut self, obj: Obj<'_>, src: &Object, alloc: &mut impl FnMut() -> Ref) {
        match src {
            Object::Null => obj.primitive(Null),
            Object::Boolean(b) => obj.primitive(*b),
            Object::Integer(i) => obj.primitive((*i).clamp(i32::MIN as i64, i32::MAX as i64) as i32),
            Object::Real(r) => obj.primitive(*r as f32),
            Object::Name(name) => obj.primitive(Name(name)),
            Object::String(bytes, _) => obj.primitive(Str(bytes)),
            Object::Array(items) => {
                let mut array = obj.array();
                for item in items {
                    self.write(array.push(), item, alloc);
                }
            }
            Object::Dictionary(dict) => {
                let mut out = obj.dict();
                for (key, value) in dict.iter() {
                    self.write(out.insert(Name(key)), value, alloc);
                }
            }
            // Streams are always indirect; a direct one is malformed.
            Object::Stream(_) => obj.primitive(Null),
            Object::Reference(id) => {
                let r = self.remap(*id, alloc);
                obj.primitive(r);
            }
        }
    }

    /// Write every object referenced so far, and what they reference.
    fn flush(&mut self, pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) {
        let doc = self.doc;
        while let Some(id) = self.pending.pop() {
            let target = self.copied[&id];
            match doc.get_object(id) {
                Ok(Object::Stream(stream)) => {
                    let mut out = pdf.stream(target, &stream.content);
                    for (key, value) in stream.dict.iter() {
                        if key.as_slice() == b"Length" {
                            continue;
                        }
                        self.write(out.insert(Name(key)), value, alloc);
                    }
                }
                Ok(obj) => self.write(pdf.indirect(target), obj, alloc),
                Err(e) => {
                    log::warn!("Dangling reference {} {} R: {e}", id.0, id.1);
                    pdf.indirect(target).primitive(Null);
                }
            }
        }
    }
}

impl Sources {
    fn source(&mut self, path: &Path) -> Result<&mut Source, Error> {
        match self.files.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let t0 = std::time::Instant::now();
                let doc = load_document(path)?;
                let pages = doc.get_pages();
                log::debug!(
                    "Loaded '{}' ({} pages) in {:.1}ms",
                    path.display(),
                    pages.len(),
                    t0.elapsed().as_secs_f64() * 1000.0,
                );
                Ok(entry.insert(Source {
                    doc,
                    pages,
                    copied: HashMap::new(),
                    imported: HashMap::new(),
                }))
            }
        }
    }

    fn page_id(source: &Source, path: &Path, page: u32) -> Result<ObjectId, Error> {
        source
            .pages
            .get(&page)
            .copied()
            .ok_or_else(|| Error::PageOutOfRange {
                path: path.to_path_buf(),
                page,
                count: source.pages.len() as u32,
            })
    }

    /// MediaBox size of a source page.
    pub fn page_size(&mut self, path: &Path, page: u32) -> Result<PageSize, Error> {
        let source = self.source(path)?;
        let page_id = Self::page_id(source, path, page)?;
        let [x0, y0, x1, y1] = media_box(&source.doc, page_id)
            .ok_or_else(|| Error::pdf(path, format!("page {page} has no valid MediaBox")))?;
        Ok(PageSize {
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Write `page` to `pdf` as a Form XObject, once per run.
    pub(super) fn import(
        &mut self,
        page: &SourcePage,
        pdf: &mut Pdf,
        alloc: &mut impl FnMut() -> Ref,
    ) -> Result<ImportedPage, Error> {
        let path = page.origin.as_path();
        let source = self.source(path)?;
        if let Some(done) = source.imported.get(&page.page) {
            return Ok(*done);
        }
        let page_id = Self::page_id(source, path, page.page)?;
        let [x0, y0, x1, y1] = media_box(&source.doc, page_id).ok_or_else(|| {
            Error::pdf(path, format!("page {} has no valid MediaBox", page.page))
        })?;
        let content = page_content(&source.doc, page_id)
            .map_err(|e| Error::pdf(path, format!("page {}: {e}", page.page)))?;
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&content, 6);

        let xobject = alloc();
        let Source {
            doc,
            copied,
            imported,
            ..
        } = source;
        let mut copier = ObjectCopier {
            doc,
            copied,
            pending: Vec::new(),
        };
        {
            let mut form = pdf.form_xobject(xobject, &compressed);
            form.filter(Filter::FlateDecode);
            form.bbox(Rect::new(x0, y0, x1, y1));
            if let Some(resources) = inherited(doc, page_id, b"Resources") {
                copier.write(form.insert(Name(b"Resources")), resources, alloc);
            }
        }
        copier.flush(pdf, alloc);

        let done = ImportedPage {
            xobject,
            origin: (x0, y0),
            size: PageSize {
                width: x1 - x0,
                height: y1 - y0,
            },
        };
        imported.insert(page.page, done);
        log::debug!(
            "Imported page {} of '{}' ({} objects copied so far)",
            page.page,
            path.display(),
            copier.copied.len(),
        );
        Ok(done)
    }
}
