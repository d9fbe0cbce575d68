use std::{
    fs,
    io::Write,
    path::Path,
};

use failure::{Error, ResultExt};
use stl2scad::Encoding;
use tempfile::NamedTempFile;

use crate::{
    args::SourceArgs,
    ui,
};


pub mod convert;
pub mod info;


/// Reads the whole source file into memory and prints where it comes from.
fn load_source(args: &SourceArgs) -> Result<Vec<u8>, Error> {
    let data = fs::read(&args.source)
        .context(format!("failed to read '{}'", args.source))?;

    let encoding = args.encoding.unwrap_or_else(|| Encoding::sniff(&data));
    info!(
        "Source: '{}' ({} bytes, {} encoding{})",
        args.source,
        ui::fmt_with_thousand_sep(data.len() as u64),
        encoding,
        if args.encoding.is_some() { ", forced" } else { "" },
    );

    Ok(data)
}

/// Writes `data` to `path` atomically: the data is first written to a
/// temporary file in the target directory, which is then renamed to `path`.
/// `path` never contains a partially written file and is left untouched if
/// any step fails.
fn write_atomically(path: &Path, data: &[u8]) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .context(format!("failed to create temporary file in '{}'", dir.display()))?;
    log::debug!("writing {} bytes to temporary file {:?}", data.len(), file.path());
    file.write_all(data)?;
    file.as_file().sync_all()?;

    file.persist(path)
        .context(format!("failed to move temporary file to '{}'", path.display()))?;

    Ok(())
}
