use std::{
    path::PathBuf,
    time::Instant,
};

use failure::{Error, ResultExt};
use stl2scad::{io::scad_path_for, read_solids, write_scad};

use crate::{
    args::{ConvertArgs, GlobalArgs},
    commands::{info::print_solids, load_source, write_atomically},
};


pub fn run(_global_args: &GlobalArgs, args: &ConvertArgs) -> Result<(), Error> {
    let start_time = Instant::now();
    let options = args.options();
    let target = args.target.as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| scad_path_for(&args.source.source));

    let data = load_source(&args.source)?;

    let before_load = Instant::now();
    let solids = progress!(["Reading '{}'", args.source.source] => {
        read_solids(&data, &options).context("could not read source file")?
    });
    let load_time = before_load.elapsed();

    if solids.is_empty() {
        warn!("The source file does not contain any solid, the script will be empty");
    } else {
        println!();
        print_solids(&solids, &options.default_solid_name);
        println!();
    }

    // The whole script is rendered into memory first, so that nothing is
    // written if any solid fails.
    let before_write = Instant::now();
    let mut script = Vec::new();
    progress!(["Writing '{}'", target.display()] => {
        write_scad(&solids, &options, &mut script)
            .context("could not generate OpenSCAD script")?;
        write_atomically(&target, &script)
            .context(format!("could not write target file '{}'", target.display()))?;
    });
    let write_time = before_write.elapsed();

    info!(
        "Processing time: {:.2?} ({:.2?} loading, {:.2?} writing)",
        start_time.elapsed(),
        load_time,
        write_time,
    );

    Ok(())
}
