//! forg - list or move the files of a directory by extension

use anyhow::Result;
use std::io::{self, IsTerminal};

use filekit::cli::{self, OrganizeCli};
use filekit::core::logging;

fn main() -> Result<()> {
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    let Some(cli) =
        cli::parse_args::<OrganizeCli, _, _, _, _>(std::env::args_os(), &mut out, &mut err)?
    else {
        return Ok(());
    };

    logging::init_tracing(cli.output.verbose, !cli.output.no_color);

    let render = cli.output.render_config(io::stdout().is_terminal());
    if !render.color {
        colored::control::set_override(false);
    }

    cli::run_forg(&cli, render, &mut out, &mut err)
}
