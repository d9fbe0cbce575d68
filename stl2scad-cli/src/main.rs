use failure::Error;
use structopt::StructOpt;

#[macro_use]
mod ui;

mod args;
mod commands;

use crate::{
    args::{Args, Command, GlobalArgs},
};


/// We just catch potential errors here and pretty print them. The actual
/// useful code is in `run()`.
fn main() {
    if let Err(e) = run() {
        error!("An error occured: {}", e);

        for cause in e.iter_causes() {
            error!("  ... caused by: {}", cause);
        }

        if std::env::var("RUST_BACKTRACE") == Ok("1".to_string()) {
            error!();
            error!("{}", e.backtrace());
        }

        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let args = Args::from_args();
    let global_args = &args.global;
    init_logger(global_args);

    match &args.command {
        Command::Convert { args } => {
            commands::convert::run(global_args, args)?;
        }
        Command::Info { args } => {
            commands::info::run(global_args, args)?;
        }
    }

    Ok(())
}

/// Routes the log records of the library to stderr. The filter is read from
/// `RUST_LOG` and defaults to `warn` (`debug` with `--verbose`).
fn init_logger(global_args: &GlobalArgs) {
    let default_filter = if global_args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}
