// process-hooks - Main entry point
use clap::Parser;
use process_hooks::cli::Cli;
use process_hooks::error::exit_codes;
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            eprintln!("{}", process_hooks::cli::USAGE);
            process::exit(exit_codes::CLI_ERROR);
        }
    };

    let exit_code = match cli.run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.user_message(false));
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
