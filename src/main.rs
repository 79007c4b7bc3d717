use std::env;
use std::fs;
use std::process;

use cigrid::diagnostics::Diagnostics;
use cigrid::flags::CigridFlags;
use cigrid::parser::Parser;
use cigrid::printer::pretty_print;

/// Every argument but the last is a flag; the last is the input file.
/// Returns `None` after recording a fatal diagnostic.
fn handle_flags(args: &[String], diag: &mut Diagnostics) -> Option<CigridFlags> {
    if args.len() < 2 {
        diag.fatal("no arguments or input file provided");
        return None;
    }

    let mut flags = CigridFlags::default();
    for arg in &args[1..args.len() - 1] {
        match arg.as_str() {
            "--pretty-print" => flags.pretty_print = true,
            "--line-error" => flags.line_error = true,
            "--name-analysis" => flags.name_analysis = true,
            "--type-check" => flags.type_check = true,
            "--debug" => flags.debug = true,
            "--compile" => flags.compile = true,
            "--asm-gen" => flags.asm_gen = true,
            "--liveness" => flags.liveness = true,
            _ => {
                diag.fatal(format!("unknown flag: {}", arg));
                return None;
            }
        }
    }
    Some(flags)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut diag = Diagnostics::new();

    let flags = match handle_flags(&args, &mut diag) {
        Some(flags) => flags,
        None => {
            diag.print_all();
            process::exit(1);
        }
    };

    let filename = &args[args.len() - 1];
    let source = match fs::read_to_string(filename) {
        Ok(source) => source,
        Err(_) => {
            diag.fatal(format!("{}: No such file or directory", filename));
            diag.print_all();
            process::exit(1);
        }
    };

    let mut parser = Parser::new(&source, flags, diag);
    let result = parser.parse();
    let diag = parser.into_diagnostics();
    diag.print_all();

    match result {
        Ok(prog) => {
            if flags.pretty_print {
                print!("{}", pretty_print(&prog));
            }
        }
        Err(err) => {
            if flags.line_error {
                eprintln!("error on line {}", err.pos.line);
            } else {
                eprintln!("{}", err);
            }
            process::exit(1);
        }
    }
}
