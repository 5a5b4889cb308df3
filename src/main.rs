use std::path::Path;
use std::process;

use clap::{Arg, ArgAction, Command};

use minicc::pipeline::{self, CompileOptions};

fn main() {
    let matches = Command::new("minicc")
        .version("0.1")
        .about("MiniC front end: AST construction and IR lowering")
        .arg(
            Arg::new("ast")
                .long("ast")
                .action(ArgAction::SetTrue)
                .help("Dump AST"),
        )
        .arg(
            Arg::new("ir")
                .long("ir")
                .action(ArgAction::SetTrue)
                .help("Dump IR"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Input file")
                .required(true)
                .index(1),
        )
        .get_matches();

    let input_path = matches
        .get_one::<String>("INPUT")
        .expect("INPUT is required");
    let options = CompileOptions {
        print_ast: matches.get_flag("ast"),
        print_ir: matches.get_flag("ir"),
    };

    match pipeline::process_path(Path::new(input_path), &options) {
        Ok(outcome) if outcome.errors.is_empty() => {}
        _ => process::exit(1),
    }
}
