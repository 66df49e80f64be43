use pdf_writer::{Name, Pdf, Ref};

/// A base-14 font registered in the output.
pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
}

/// Regular and bold faces used by the annotation boxes.
pub(crate) struct FontSet {
    pub(crate) regular: FontEntry,
    pub(crate) bold: FontEntry,
}

impl FontSet {
    pub(crate) fn entries(&self) -> [&FontEntry; 2] {
        [&self.regular, &self.bold]
    }
}

/// Base font name of the bold face of a base-14 family.
pub(crate) fn bold_face(font_face: &str) -> String {
    match font_face {
        "Times-Roman" => "Times-Bold".to_string(),
        other => format!("{other}-Bold"),
    }
}

fn register_base14(
    pdf: &mut Pdf,
    base_font: &str,
    pdf_name: &str,
    alloc: &mut impl FnMut() -> Ref,
) -> FontEntry {
    let font_ref = alloc();
    pdf.type1_font(font_ref)
        .base_font(Name(base_font.as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    log::debug!("register_font: {base_font} as /{pdf_name}");
    FontEntry {
        pdf_name: pdf_name.to_string(),
        font_ref,
    }
}

pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    font_face: &str,
    alloc: &mut impl FnMut() -> Ref,
) -> FontSet {
    FontSet {
        regular: register_base14(pdf, font_face, "F1", alloc),
        bold: register_base14(pdf, &bold_face(font_face), "F2", alloc),
    }
}

/// Map a char to its WinAnsi (Windows-1252) byte.
/// Bytes 0x80-0x9F hold typographic characters; Latin-1 maps directly.
fn char_to_winansi(c: char) -> Option<u8> {
    let byte = match c as u32 {
        0x0020..=0x007E | 0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Encode a line of annotation text for a WinAnsi base-14 font.
/// Tabs become spaces; characters outside the encoding become `?`.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    let mut unmapped = 0usize;
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\t' => b' ',
            c => char_to_winansi(c).unwrap_or_else(|| {
                unmapped += 1;
                b'?'
            }),
        })
        .collect();
    if unmapped > 0 {
        log::debug!("{unmapped} char(s) of {s:?} have no WinAnsi code");
    }
    bytes
}
