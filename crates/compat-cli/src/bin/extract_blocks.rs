use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use compat_cli::{init_tracing, Verbosity};
use compat_driver::ReportFormat;
use compat_extract::{extract_file, partition, CodeBlock, ZIG};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const PREVIEW_WIDTH: usize = 60;

fn cli() -> Command {
    Command::new("zig-extract-blocks")
        .version(env!("CARGO_PKG_VERSION"))
        .about("List fenced Zig code blocks in a markdown guide")
        .arg(
            Arg::new("markdown")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Markdown file to scan"),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .default_value(ZIG)
                .help("Fence language to extract"),
        )
        .arg(
            Arg::new("runnable-only")
                .long("runnable-only")
                .action(ArgAction::SetTrue)
                .help("Only list complete programs and tests"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("text")
                .value_parser(value_parser!(ReportFormat))
                .help("Output format: text or json"),
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

fn render_text(path: &Path, blocks: Vec<CodeBlock>, runnable_only: bool) -> String {
    let mut out = String::new();
    let name = path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    let total = blocks.len();
    let (runnable, snippets) = partition(blocks);

    let _ = writeln!(out, "=== {name} ===");
    let _ = writeln!(out, "Total blocks: {total}");
    let _ = writeln!(out, "Runnable examples: {}", runnable.len());
    let _ = writeln!(out, "Inline snippets: {}", snippets.len());

    let mut sections = vec![("Runnable Examples", runnable)];
    if !runnable_only {
        sections.push(("Inline Snippets", snippets));
    }
    for (heading, blocks) in sections {
        if blocks.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n--- {heading} ({}) ---", blocks.len());
        for block in &blocks {
            let _ = write!(
                out,
                "  Block #{} (lines {}-{}, {} lines)",
                block.index,
                block.start_line,
                block.end_line,
                block.line_count()
            );
            match &block.title {
                Some(title) => {
                    let _ = writeln!(out, " {title}");
                }
                None => out.push('\n'),
            }
            let preview: String = block.first_line().chars().take(PREVIEW_WIDTH).collect();
            let _ = writeln!(out, "    {preview}...");
        }
    }
    out
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let Some(path) = args.get_one::<PathBuf>("markdown") else {
        anyhow::bail!("a markdown file is required");
    };
    let language = args.get_one::<String>("language").map_or(ZIG, String::as_str);
    let runnable_only = args.get_flag("runnable-only");

    let mut blocks = extract_file(path, language)?;
    tracing::info!("Found {} {} blocks in {}", blocks.len(), language, path.display());

    match args
        .get_one::<ReportFormat>("format")
        .copied()
        .unwrap_or_default()
    {
        ReportFormat::Text => print!("{}", render_text(path, blocks, runnable_only)),
        ReportFormat::Json => {
            if runnable_only {
                blocks.retain(|b| b.is_runnable);
            }
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
    }
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
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}
