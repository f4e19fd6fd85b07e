//! jinjagen's entry point.
//! Parses arguments, builds the generator with the requested hook modules
//! and renders the source tree into the output directory.

use jinjagen::{
    cli::{get_args, Args},
    config::load_context,
    error::{default_error_handler, Result},
    generator::{Context, Generator},
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the optional context file
/// 2. Builds the generator over the source root
/// 3. Applies hook modules in command line order
/// 4. Renders the whole tree
fn run(args: Args) -> Result<()> {
    let ctx = match &args.context {
        Some(path) => load_context(path)?,
        None => Context::new(),
    };

    let generator = Generator::builder(&args.root)
        .keep_trailing_newline(args.keep_trailing_newline)
        .modules(args.modules)
        .build()?;

    generator.render_site(&args.output_dir, &ctx)?;

    log::info!(
        "Site generated from '{}' into '{}'.",
        args.root.display(),
        args.output_dir.display()
    );
    Ok(())
}
