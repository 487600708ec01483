use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use tracing::{debug, Level};

use stf::language::{DescriptorError, Engine, LoadingError};
use stf::parsing::{Handlers, Options, Reader, TokenKind};

mod output;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("stf")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("Reader for STF vehicle descriptor files.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what the reader is doing to standard error."),
        )
        .arg(
            Arg::new("case-sensitive")
                .long("case-sensitive")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Match keywords exactly rather than ignoring case."),
        )
        .arg(
            Arg::new("no-includes")
                .long("no-includes")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Treat include directives as ordinary tokens rather than reading the files they name."),
        )
        .subcommand(
            Command::new("check")
                .about("Check that the given file is structurally well formed")
                .arg(
                    Arg::new("concise")
                        .long("concise")
                        .action(ArgAction::SetTrue)
                        .help("Report errors on a single line rather than with source context."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The descriptor file to check."),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("List the tokens the reader sees in the given file")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The descriptor file to tokenize."),
                ),
        )
        .subcommand(
            Command::new("engine")
                .about("Show the name and description from an engine file")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The .eng file to read."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let options = Options::default()
        .case_sensitive(matches.get_flag("case-sensitive"))
        .includes(!matches.get_flag("no-includes"));
    debug!(?options);

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let filename = filename_argument(submatches);
            let concise = submatches.get_flag("concise");

            let mut reader = Reader::open(filename, options).unwrap_or_else(|error| fail_loading(&error));
            match reader.process_file(Handlers::new()) {
                Ok(()) => println!("{}: ok", filename.display()),
                Err(error) => {
                    if concise {
                        eprintln!("{}", error);
                    } else {
                        eprintln!("{}", error.full_details());
                    }
                    std::process::exit(1);
                }
            }
        }
        Some(("tokens", submatches)) => {
            let filename = filename_argument(submatches);

            let mut reader = Reader::open(filename, options).unwrap_or_else(|error| fail_loading(&error));
            loop {
                let token = match reader.next_token() {
                    Ok(token) => token,
                    Err(error) => {
                        eprintln!("{}", reader.describe(error).full_details());
                        std::process::exit(1);
                    }
                };
                if token.kind == TokenKind::EndOfInput {
                    break;
                }
                println!(
                    "{}:{}\t{:?}\t{}",
                    token.position.line, token.position.column, token.kind, token.text
                );
            }
        }
        Some(("engine", submatches)) => {
            let filename = filename_argument(submatches);

            match Engine::load(filename, options) {
                Ok(engine) => print!("{}", output::engine_summary(&engine)),
                Err(DescriptorError::Loading(error)) => fail_loading(&error),
                Err(DescriptorError::Parsing(error)) => {
                    eprintln!("{}", error.full_details());
                    std::process::exit(1);
                }
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: stf [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn filename_argument(submatches: &ArgMatches) -> &Path {
    match submatches.get_one::<String>("filename") {
        Some(filename) => Path::new(filename),
        None => unreachable!("filename is a required argument"),
    }
}

fn fail_loading(error: &LoadingError) -> ! {
    eprintln!(
        "{}: {}",
        "error".bright_red(),
        error
            .to_string()
            .bold()
    );
    std::process::exit(1);
}
