mod error;
mod fonts;
mod pdf;

pub mod assembly;
pub mod config;
pub mod index;
pub mod layout;
pub mod list;
pub mod model;

pub use error::Error;

use std::path::{Path, PathBuf};
use std::time::Instant;

use config::Options;
use index::Catalog;

/// Build the playbook of an army list and return the PDF bytes.
pub fn render_playbook(list_text: &str, options: &Options) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    options.annot.validate()?;

    let list = list::parse_list(list_text)?;
    let index_path = index::resolve_army_index(&options.library.index_dir, &list.header.army_name)?;
    let catalog = Catalog::load(&options.library, &index_path)?;
    let t_parse = t0.elapsed();

    let mut sources = pdf::Sources::default();
    let army_rule = catalog.army_rule()?;
    let reference = sources.page_size(&army_rule.origin, 1)?;
    log::debug!(
        "Reference page size {}x{} from '{}'",
        reference.width,
        reference.height,
        army_rule.origin.display()
    );
    let plan = assembly::plan_playbook(&list, &catalog, options, reference)?;
    let t_plan = t0.elapsed();

    let bytes = pdf::render(&plan, &options.annot, reference, &mut sources)?;
    let t_render = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, plan={:.1}ms, render={:.1}ms ({} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_plan - t_parse).as_secs_f64() * 1000.0,
        (t_render - t_plan).as_secs_f64() * 1000.0,
        plan.len(),
        bytes.len(),
    );

    Ok(bytes)
}

pub fn convert_list_to_pdf(list_text: &str, output: &Path, options: &Options) -> Result<(), Error> {
    let t0 = Instant::now();

    let bytes = render_playbook(list_text, options)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: build={:.1}ms, write={:.1}ms, total={:.1}ms (output {})",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        output.display(),
    );

    Ok(())
}

/// Convert the list in `input`. Without `output` the PDF is written next to
/// the input with a `.pdf` extension. Returns the written path.
pub fn convert_list_file_to_pdf(
    input: &Path,
    output: Option<&Path>,
    options: &Options,
) -> Result<PathBuf, Error> {
    let list_text = std::fs::read_to_string(input).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, input.display()),
        ))
    })?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("pdf"));
    convert_list_to_pdf(&list_text, &output, options)?;
    Ok(output)
}
