use std::process::ExitCode;

use symhd_core::log::{error, init_logger};
use symhd_lib::{args::parse_args, report::run};

fn main() -> ExitCode {
    let args = parse_args();

    if let Err(err) = init_logger(args.logdir.as_deref(), &args.log_level) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(&args).and_then(|report| report.render(args.json)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
