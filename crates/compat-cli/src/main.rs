use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use compat_cli::{init_tracing, Verbosity};
use compat_driver::{report, BatchDriver, DriverConfig, ErrorPolicy, ReportFormat};
use compat_engine::{EngineConfig, Pipeline};
use std::path::PathBuf;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("zig-compat-fix")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Migrate Zig container call sites to the 0.15 API")
        .arg(
            Arg::new("path")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present("list-rules")
                .help("Zig file or directory to fix"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Show what would change without writing"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("text")
                .value_parser(value_parser!(ReportFormat))
                .help("Report format: text or json"),
        )
        .arg(
            Arg::new("handle")
                .long("handle")
                .value_name("IDENT")
                .help("Allocator identifier to insert (default: allocator)"),
        )
        .arg(
            Arg::new("disable")
                .long("disable")
                .value_name("RULE")
                .action(ArgAction::Append)
                .help("Skip a rule by name (repeatable)"),
        )
        .arg(
            Arg::new("on-error")
                .long("on-error")
                .value_parser(value_parser!(ErrorPolicy))
                .help("What to do with unreadable files: skip or abort"),
        )
        .arg(
            Arg::new("list-rules")
                .long("list-rules")
                .action(ArgAction::SetTrue)
                .help("List rules in application order and exit"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Log errors only"),
        )
}

/// Configuration file first, then flags on top
fn load_config(args: &ArgMatches) -> anyhow::Result<DriverConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig::new(),
    };

    if args.get_flag("dry-run") {
        config.dry_run = true;
    }
    if let Some(handle) = args.get_one::<String>("handle") {
        config.engine.handle.clone_from(handle);
    }
    if let Some(rules) = args.get_many::<String>("disable") {
        config.engine.disabled_rules.extend(rules.cloned());
    }
    if let Some(policy) = args.get_one::<ErrorPolicy>("on-error") {
        config.on_error = *policy;
    }
    Ok(config)
}

fn list_rules(engine: &EngineConfig) -> anyhow::Result<()> {
    let catalog = Pipeline::zig_015(EngineConfig::default().with_handle(engine.handle.clone()))?;
    for rule in catalog.rules() {
        let state = if engine.is_enabled(rule.name()) { "" } else { " (disabled)" };
        println!(
            "{:<24} {:<20} {:<18} {:<20} {}{}",
            rule.name(),
            rule.kind().label(),
            rule.kind().target(),
            rule.guard().to_string(),
            rule.category(),
            state
        );
    }
    Ok(())
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;

    if args.get_flag("list-rules") {
        return list_rules(&config.engine);
    }

    let path = args
        .get_one::<PathBuf>("path")
        .context("a file or directory path is required")?;
    let format = args
        .get_one::<ReportFormat>("format")
        .copied()
        .unwrap_or_default();

    let driver = BatchDriver::new(config)?;
    let batch = driver.run(path)?;
    print!("{}", report::render(&batch, format)?);
    Ok(())
}

fn main() -> ExitCode {
    let args = cli().get_matches();
    init_tracing(Verbosity::from_flags(
        args.get_flag("verbose"),
        args.get_flag("quiet"),
    ));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{:?}", err);
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}
