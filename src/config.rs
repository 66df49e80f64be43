use std::path::PathBuf;

use crate::error::Error;

/// What the recap at the start of the playbook looks like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListMode {
    /// A first page with the list header and the whole list.
    #[default]
    Full,
    /// The list header drawn in a box on the first page.
    JustHeader,
    Nothing,
}

impl std::str::FromStr for ListMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(ListMode::Full),
            "just_header" => Ok(ListMode::JustHeader),
            "nothing" => Ok(ListMode::Nothing),
            other => Err(Error::InvalidOption(format!("unknown list mode '{other}'"))),
        }
    }
}

/// Which sections end up in the playbook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Features {
    pub with_army_rule: bool,
    pub with_detachment_rule: bool,
    pub with_detachment_stratagems: bool,
    pub with_detachment_enhancements: bool,
    pub with_armoury: bool,
    /// Start datasheets on a fresh sheet after the armoury half pages.
    pub with_armoury_padding: bool,
    /// Print the unit composition verso of each datasheet.
    pub with_unit_comp: bool,
    pub with_unit_annot: bool,
    pub list_mode: ListMode,
}

impl Default for Features {
    fn default() -> Self {
        Features {
            with_army_rule: true,
            with_detachment_rule: true,
            with_detachment_stratagems: true,
            with_detachment_enhancements: true,
            with_armoury: true,
            with_armoury_padding: false,
            with_unit_comp: false,
            with_unit_annot: true,
            list_mode: ListMode::Full,
        }
    }
}

/// Rectangle in PDF points, origin at the bottom-left of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Region {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Region { x, y, w, h }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse_hex(raw: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidColor(raw.to_string());
        let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        let [r, g, b] = match hex.len() {
            6 => [
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ],
            3 => [
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            ],
            _ => return Err(invalid()),
        };
        Ok(Rgb {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        })
    }
}

/// Geometry and style of the annotation boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotStyle {
    pub header_army: Region,
    pub top: Region,
    pub bottom: Region,
    /// Base-14 font family; the bold face is `<font_face>-Bold`.
    pub font_face: String,
    pub font_size: f32,
    pub line_spacing: f32,
    pub color_fg: Rgb,
    pub color_bg: Rgb,
    pub color_br: Rgb,
}

const GREY_20: Rgb = Rgb {
    r: 0x20 as f32 / 255.0,
    g: 0x20 as f32 / 255.0,
    b: 0x20 as f32 / 255.0,
};

const GREY_E3: Rgb = Rgb {
    r: 0xe3 as f32 / 255.0,
    g: 0xe3 as f32 / 255.0,
    b: 0xe3 as f32 / 255.0,
};

impl Default for AnnotStyle {
    fn default() -> Self {
        AnnotStyle {
            header_army: Region::new(0.0, 477.0, 157.0, 61.0),
            top: Region::new(157.0, 445.0, 200.0, 93.0),
            bottom: Region::new(157.0, 175.0, 200.0, 93.0),
            font_face: "Helvetica".to_string(),
            font_size: 12.0,
            line_spacing: 1.2,
            color_fg: GREY_20,
            color_bg: GREY_E3,
            color_br: GREY_20,
        }
    }
}

impl AnnotStyle {
    /// Line height for text set at `font_size`, which may differ from the
    /// style's own size.
    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_spacing
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(Error::InvalidOption(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(Error::InvalidOption(format!(
                "line spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        if self.font_face.trim().is_empty() {
            return Err(Error::InvalidOption("font face is empty".into()));
        }
        Ok(())
    }
}

/// Where the PDF indexes and the PDFs they reference live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    /// Directory holding one `<army>.yaml` index per army.
    pub index_dir: PathBuf,
    /// Base for relative `associated_file` paths.
    pub data_root: PathBuf,
}

impl Default for Library {
    fn default() -> Self {
        Library {
            index_dir: PathBuf::from("data").join("pdf_index"),
            data_root: PathBuf::from("."),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    pub library: Library,
    pub features: Features,
    pub annot: AnnotStyle,
}
