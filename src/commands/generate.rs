//! `generate` subcommand.
use anyhow::{Context, Result};
use clap::Command;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Renders the man page of `cmd` and of every subcommand below it into
/// `output_dir`, or the current directory when none is given. Subcommand pages
/// are named `<parent>-<sub>.1`, e.g. `jt-generate-man.1`.
///
/// Returns the paths written, parents before children.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or a page
/// cannot be written.
pub fn generate_man_pages(
    cmd: &Command,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .context("create output Man directories")?;

    let mut written = Vec::new();
    let mut pending = vec![(cmd.get_name().to_string(), cmd.clone())];
    while let Some((name, page)) = pending.pop() {
        let subs: Vec<&Command> = page.get_subcommands().collect();
        for sub in subs.into_iter().rev() {
            pending.push((format!("{name}-{}", sub.get_name()), sub.clone()));
        }
        written.push(render(&output_dir, name, page)?);
    }
    Ok(written)
}

/// Writes one page. clap_mangen takes the page title from the command name,
/// so the command is renamed to its prefixed form first.
fn render(output_dir: &Path, name: String, page: Command) -> Result<PathBuf> {
    let path = output_dir.join(format!("{name}.1"));
    // Without clap's `string` feature a command name must be `&'static str`.
    // Leaking is fine for a one-shot generator.
    let name: &'static str = Box::leak(name.into_boxed_str());
    let page = page.name(name).disable_help_subcommand(true);
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(page)
        .render(&mut file)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("rendered man page {}", path.display());
    Ok(path)
}
