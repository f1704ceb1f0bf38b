use std::process::ExitCode;

use rm_sim::loader::load_file;
use rm_sim::models::FeasibilityResult;
use rm_sim::validation::validate_tasks;
use rm_sim::SimulationConfig;

const USAGE: &str = "usage: rm-sim [--trace] <tasks.txt>";

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct Args {
    path: String,
    trace: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut path = None;
    let mut trace = false;
    for arg in args {
        if arg == "--trace" {
            trace = true;
        } else if arg.starts_with("--") {
            return Err(format!("unknown option: {arg}"));
        } else if path.is_some() {
            return Err(USAGE.to_string());
        } else {
            path = Some(arg);
        }
    }

    let path = path.ok_or_else(|| USAGE.to_string())?;
    if !path.to_lowercase().ends_with(".txt") {
        return Err(format!("input file must be a .txt file: {path}"));
    }
    Ok(Args { path, trace })
}

fn main() -> ExitCode {
    env_logger::init();

    let Args { path, trace } = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let tasks = match load_file(&path) {
        Ok(tasks) => tasks,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::from(2);
        }
    };

    if let Err(errors) = validate_tasks(&tasks) {
        for err in errors {
            eprintln!("{path}: {}", err.message);
        }
        return ExitCode::from(2);
    }

    let config = SimulationConfig::new().with_trace(trace);
    let report = match rm_sim::run_with_config(&tasks, config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::from(2);
        }
    };

    // Decisions go to stderr so stdout stays the bare verdict.
    for event in &report.trace {
        eprintln!("{event:?}");
    }
    if trace {
        eprintln!(
            "{} events, {} preemptions, ended at tick {} of {}",
            report.events_processed,
            report.total_preemptions(),
            report.end_time,
            report.hyperperiod
        );
    }

    match report.result {
        FeasibilityResult::Feasible { preemptions } => {
            let counts: Vec<String> = preemptions.iter().map(u64::to_string).collect();
            println!("feasible");
            println!("{}", counts.join(","));
        }
        FeasibilityResult::Infeasible => println!("infeasible"),
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_plain_path() {
        assert_eq!(
            args(&["tasks.TXT"]),
            Ok(Args {
                path: "tasks.TXT".to_string(),
                trace: false
            })
        );
    }

    #[test]
    fn test_trace_flag_either_side() {
        let expected = Ok(Args {
            path: "tasks.txt".to_string(),
            trace: true,
        });
        assert_eq!(args(&["--trace", "tasks.txt"]), expected);
        assert_eq!(args(&["tasks.txt", "--trace"]), expected);
    }

    #[test]
    fn test_rejected_arguments() {
        assert_eq!(args(&[]), Err(USAGE.to_string()));
        assert_eq!(args(&["--trace"]), Err(USAGE.to_string()));
        assert_eq!(args(&["a.txt", "b.txt"]), Err(USAGE.to_string()));
        assert!(args(&["tasks.csv"]).unwrap_err().contains(".txt"));
        assert!(args(&["--verbose", "tasks.txt"]).unwrap_err().contains("--verbose"));
    }
}
