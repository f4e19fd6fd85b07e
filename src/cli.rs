//! Command-line interface implementation for jinjagen.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::hooks::ModuleRequest;

/// Command-line arguments structure for jinjagen.
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate files from Jinja templates", long_about = None)]
pub struct Args {
    /// Path to output directory
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Source root
    #[arg(short, long, value_name = "SOURCE_DIR", default_value = ".")]
    pub root: PathBuf,

    /// Add globals from module or much more!
    #[arg(
        short = 'm',
        long = "module",
        value_name = "MODULE_NAME[:SUBPARAM]",
        value_parser = parse_module
    )]
    pub modules: Vec<ModuleRequest>,

    /// JSON or YAML file whose top-level mapping is passed to every template
    #[arg(short, long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Keep the final newline of template sources
    #[arg(long)]
    pub keep_trailing_newline: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_module(s: &str) -> Result<ModuleRequest, String> {
    let request = ModuleRequest::parse(s);
    if request.name.is_empty() {
        return Err("module name must not be empty".to_string());
    }
    Ok(request)
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let printed = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                if let Err(err) = printed {
                    eprintln!("{err}");
                }
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
