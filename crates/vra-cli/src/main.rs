use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use vra_cli::commands::{run_check, run_init, run_request};
use vra_cli::parse_amounts;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("vra")
        .version(env!("CARGO_PKG_VERSION"))
        .about("VM Resource Arbiter - deadlock avoidance for compute allocation")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("init")
                .about("Seed a scenario file with the example instance")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .default_value("scenario.json")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the scenario"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Run the safety check against a scenario")
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scenario file to check"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the structured verdict as JSON"),
                ),
        )
        .subcommand(
            Command::new("request")
                .about("Evaluate an incremental resource request for one VM")
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scenario file holding the current state"),
                )
                .arg(
                    Arg::new("vm")
                        .long("vm")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Requesting VM index"),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .help("Requested units per resource kind, e.g. 1,0,2"),
                )
                .arg(
                    Arg::new("commit")
                        .long("commit")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the updated scenario here when granted"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the structured outcome as JSON"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("init", args)) => {
            let out = args.get_one::<PathBuf>("out").unwrap();
            match run_init(out) {
                Ok(()) => println!("Wrote example scenario to {}", out.display()),
                Err(err) => fail(&err),
            }
        }
        Some(("check", args)) => {
            let scenario = args.get_one::<PathBuf>("scenario").unwrap();
            let json = args.get_flag("json");

            match run_check(scenario) {
                Ok(verdict) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&verdict).unwrap());
                    } else if verdict.is_safe {
                        println!("State is SAFE");
                        println!("Completion order: {}", format_sequence(&verdict.sequence));
                    } else {
                        println!("State is UNSAFE - no completion order exists");
                    }
                    process::exit(if verdict.is_safe { 0 } else { 1 });
                }
                Err(err) => fail(&err),
            }
        }
        Some(("request", args)) => {
            let scenario = args.get_one::<PathBuf>("scenario").unwrap();
            let vm = *args.get_one::<usize>("vm").unwrap();
            let amount = args.get_one::<String>("amount").unwrap();
            let commit = args.get_one::<PathBuf>("commit");
            let json = args.get_flag("json");

            let amounts = match parse_amounts(amount) {
                Ok(amounts) => amounts,
                Err(err) => fail(&err.into()),
            };

            match run_request(scenario, vm, &amounts, commit.map(PathBuf::as_path)) {
                Ok(outcome) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
                    } else if outcome.granted {
                        println!("Request granted for VM {vm}");
                        println!("Available now: {:?}", outcome.state.available());
                        println!("Completion order: {}", format_sequence(&outcome.safety.sequence));
                    } else if let Some(reason) = outcome.denial {
                        println!("Request denied: {reason}");
                    }
                    process::exit(if outcome.granted { 0 } else { 1 });
                }
                Err(err) => fail(&err),
            }
        }
        _ => {}
    }
}

fn format_sequence(sequence: &[usize]) -> String {
    sequence
        .iter()
        .map(|vm| format!("VM {vm}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn fail(err: &anyhow::Error) -> ! {
    eprintln!("error: {err:#}");
    process::exit(2);
}
