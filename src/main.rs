use std::path::PathBuf;

use clap::{Args, Parser};
use playbook_pdf::config::{AnnotStyle, Features, Library, ListMode, Options, Region, Rgb};

/// Paired `--with-x` / `--without-x` switch; the last one given wins.
macro_rules! toggle {
    ($name:ident, $with:literal, $without:literal, $help:literal) => {
        #[derive(Args, Debug)]
        struct $name {
            #[doc = $help]
            #[arg(id = $with, long = $with, overrides_with = $without)]
            with: bool,
            #[arg(id = $without, long = $without, overrides_with = $with, hide = true)]
            without: bool,
        }

        impl $name {
            fn resolve(&self, default: bool) -> bool {
                match (self.with, self.without) {
                    (true, _) => true,
                    (_, true) => false,
                    _ => default,
                }
            }
        }
    };
}

toggle!(ArmyRule, "with-army-rule", "without-army-rule", "Copy the army rule pages");
toggle!(DetachmentRule, "with-detachment-rule", "without-detachment-rule", "Copy the detachment rule pages");
toggle!(
    DetachmentStratagems,
    "with-detachment-stratagems",
    "without-detachment-stratagems",
    "Copy the detachment stratagem pages"
);
toggle!(
    DetachmentEnhancements,
    "with-detachment-enhancements",
    "without-detachment-enhancements",
    "Copy the detachment enhancement pages"
);
toggle!(Armoury, "with-armoury", "without-armoury", "Add the armoury pages of the used PDFs");
toggle!(
    ArmouryPadding,
    "with-armoury-padding",
    "without-armoury-padding",
    "Start the datasheets on a fresh sheet after the armoury"
);
toggle!(UnitComp, "with-unit-comp", "without-unit-comp", "Print the unit composition verso of each datasheet");
toggle!(UnitAnnot, "with-unit-annot", "without-unit-annot", "Draw the unit entry of the list over its datasheet");

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Army list exported as text
    #[arg(short, long)]
    input: PathBuf,

    /// Output PDF path [default: the input with a .pdf extension]
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    army_rule: ArmyRule,
    #[command(flatten)]
    detachment_rule: DetachmentRule,
    #[command(flatten)]
    detachment_stratagems: DetachmentStratagems,
    #[command(flatten)]
    detachment_enhancements: DetachmentEnhancements,
    #[command(flatten)]
    armoury: Armoury,
    #[command(flatten)]
    armoury_padding: ArmouryPadding,
    #[command(flatten)]
    unit_comp: UnitComp,
    #[command(flatten)]
    unit_annot: UnitAnnot,

    /// full, just_header or nothing
    #[arg(short, long, default_value = "full")]
    list_mode: ListMode,

    #[arg(long)]
    annot_font_face: Option<String>,
    #[arg(long)]
    annot_font_size: Option<f32>,
    #[arg(long)]
    annot_line_spacing: Option<f32>,
    /// Text color, #rrggbb or #rgb
    #[arg(long, value_parser = parse_color)]
    annot_color_fg: Option<Rgb>,
    /// Background color
    #[arg(long, value_parser = parse_color)]
    annot_color_bg: Option<Rgb>,
    /// Border color
    #[arg(long, value_parser = parse_color)]
    annot_color_br: Option<Rgb>,

    #[arg(long)]
    annot_header_army_x: Option<f32>,
    #[arg(long)]
    annot_header_army_y: Option<f32>,
    #[arg(long)]
    annot_header_army_w: Option<f32>,
    #[arg(long)]
    annot_header_army_h: Option<f32>,
    #[arg(long)]
    annot_top_x: Option<f32>,
    #[arg(long)]
    annot_top_y: Option<f32>,
    #[arg(long)]
    annot_top_w: Option<f32>,
    #[arg(long)]
    annot_top_h: Option<f32>,
    #[arg(long)]
    annot_bottom_x: Option<f32>,
    #[arg(long)]
    annot_bottom_y: Option<f32>,
    #[arg(long)]
    annot_bottom_w: Option<f32>,
    #[arg(long)]
    annot_bottom_h: Option<f32>,

    /// Directory of the per-army PDF indexes
    #[arg(long)]
    index_dir: Option<PathBuf>,

    /// Base directory of relative PDF paths in the indexes
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Log debug details and timings
    #[arg(short, long)]
    verbose: bool,
}

fn parse_color(raw: &str) -> Result<Rgb, String> {
    Rgb::parse_hex(raw).map_err(|e| e.to_string())
}

fn region(
    default: Region,
    x: Option<f32>,
    y: Option<f32>,
    w: Option<f32>,
    h: Option<f32>,
) -> Region {
    Region::new(
        x.unwrap_or(default.x),
        y.unwrap_or(default.y),
        w.unwrap_or(default.w),
        h.unwrap_or(default.h),
    )
}

impl Cli {
    fn options(&self) -> Options {
        let defaults = Features::default();
        let features = Features {
            with_army_rule: self.army_rule.resolve(defaults.with_army_rule),
            with_detachment_rule: self.detachment_rule.resolve(defaults.with_detachment_rule),
            with_detachment_stratagems: self
                .detachment_stratagems
                .resolve(defaults.with_detachment_stratagems),
            with_detachment_enhancements: self
                .detachment_enhancements
                .resolve(defaults.with_detachment_enhancements),
            with_armoury: self.armoury.resolve(defaults.with_armoury),
            with_armoury_padding: self.armoury_padding.resolve(defaults.with_armoury_padding),
            with_unit_comp: self.unit_comp.resolve(defaults.with_unit_comp),
            with_unit_annot: self.unit_annot.resolve(defaults.with_unit_annot),
            list_mode: self.list_mode,
        };

        let style = AnnotStyle::default();
        let annot = AnnotStyle {
            header_army: region(
                style.header_army,
                self.annot_header_army_x,
                self.annot_header_army_y,
                self.annot_header_army_w,
                self.annot_header_army_h,
            ),
            top: region(
                style.top,
                self.annot_top_x,
                self.annot_top_y,
                self.annot_top_w,
                self.annot_top_h,
            ),
            bottom: region(
                style.bottom,
                self.annot_bottom_x,
                self.annot_bottom_y,
                self.annot_bottom_w,
                self.annot_bottom_h,
            ),
            font_face: self.annot_font_face.clone().unwrap_or(style.font_face),
            font_size: self.annot_font_size.unwrap_or(style.font_size),
            line_spacing: self.annot_line_spacing.unwrap_or(style.line_spacing),
            color_fg: self.annot_color_fg.unwrap_or(style.color_fg),
            color_bg: self.annot_color_bg.unwrap_or(style.color_bg),
            color_br: self.annot_color_br.unwrap_or(style.color_br),
        };

        let mut library = Library::default();
        if let Some(dir) = &self.index_dir {
            library.index_dir = dir.clone();
        }
        if let Some(root) = &self.data_root {
            library.data_root = root.clone();
        }

        Options {
            library,
            features,
            annot,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = cli.options();
    match playbook_pdf::convert_list_file_to_pdf(&cli.input, cli.output.as_deref(), &options) {
        Ok(output) => log::info!("Playbook written to '{}'", output.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
