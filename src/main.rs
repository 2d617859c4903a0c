//! `mm_dac`: multiply two random n × n matrices with the Morton
//! divide-and-conquer algorithm.

use morton_matmul::config::{Command, Config, USAGE};
use morton_matmul::driver::run;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let config = match Config::from_args(std::env::args()) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Usage) => {
            eprint!("{USAGE}");
            return ExitCode::from(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    let report = match run(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    print!("{}", report.summary());
    ExitCode::from(report.exit_code(config.strict) as u8)
}
