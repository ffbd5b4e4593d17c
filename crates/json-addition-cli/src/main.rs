//! Command-line interface for `json-addition`.
//!
//! Resolves the input glob patterns, layers the rules (defaults, then a
//! rules file, then flags), merges the documents with `json-addition-core`
//! and prints the result or writes it to a file. The camelCase spellings of
//! the original tool's flags (`--inputFiles`, `--ruleSort`, ...) are accepted
//! and normalized before clap sees them.

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use json_addition_core::{
    expand_patterns, merge_documents, read_documents, write_document, BinaryOperation, Node,
    RuleOverrides, RulesConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION_BANNER: &str = concat!("json-addition version ", env!("CARGO_PKG_VERSION"));

const HELP_TEXT: &str = r#"Usage: json-addition --input-files="<glob1> [<glob2> [... <globN>]]" [--output-file=<file>] [OPTION]...
Add or subtract JSON documents field by field.

Options:
  -s --silent                      Do not print or write the result.
  -v --verbose                     Log the rules and the resolved files (overrides --silent).
  -h --help                        Show this help.
     --version                     Print the version.
     --input-files="<globs>"       Whitespace separated glob patterns of input files.
     --output-file=<file>          Write the result to <file> instead of STDOUT.
     --rules=<file>                Load addition rules from a JSON file.
     --rule-binary-operation=<OR|AND>
                                   How two booleans combine (default OR).
     --rule-ignore-errors          Join unmergeable values as "a, b" instead of failing.
     --rule-sort                   Sort combined arrays.
     --rule-unique                 Remove duplicates from combined arrays.
     --subtract                    Subtract the following documents from the first one.

Examples:
  json-addition --input-files="data/input-1.json data/input-2.json"
  json-addition --input-files="data/input-*.json" --output-file=out/total.json
  json-addition --input-files="data/input-3.json data/input-2.json" --subtract
"#;

const COLOR_RESET: &str = "\u{1b}[0m";
const COLOR_RED: &str = "\u{1b}[31m";
const COLOR_GREEN: &str = "\u{1b}[32m";

#[derive(Debug, Parser)]
#[command(
    name = "json-addition",
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    #[arg(long = "help", short = 'h', action = ArgAction::SetTrue, hide = true)]
    help: bool,

    #[arg(long = "version", action = ArgAction::SetTrue, hide = true)]
    version: bool,

    /// Whitespace separated glob patterns of input files.
    #[arg(long = "input-files")]
    input_files: Option<String>,

    /// Write the result to FILE instead of STDOUT.
    #[arg(long = "output-file")]
    output_file: Option<PathBuf>,

    /// JSON rules file (`globalAdditionRules` / `specificAdditionRules`).
    #[arg(long = "rules")]
    rules: Option<PathBuf>,

    /// Boolean combination, `OR` or `AND`.
    #[arg(long = "rule-binary-operation")]
    rule_binary_operation: Option<String>,

    #[arg(long = "rule-ignore-errors", action = ArgAction::SetTrue)]
    rule_ignore_errors: bool,

    #[arg(long = "rule-sort", action = ArgAction::SetTrue)]
    rule_sort: bool,

    #[arg(long = "rule-unique", action = ArgAction::SetTrue)]
    rule_unique: bool,

    #[arg(long = "subtract", action = ArgAction::SetTrue)]
    subtract: bool,

    #[arg(short = 's', long = "silent", action = ArgAction::SetTrue)]
    silent: bool,

    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let mut stderr = io::stderr();
            let (red, reset) =
                if stderr.is_terminal() { (COLOR_RED, COLOR_RESET) } else { ("", "") };
            let _ = writeln!(stderr, "{red}\u{2718}{reset} {err:#}");
            std::process::exit(1);
        }
    }
}

fn try_main() -> Result<i32> {
    let args = canonicalize_args(std::env::args_os());
    let cli = Cli::try_parse_from(args).map_err(|err| anyhow!("{err}\n{HELP_TEXT}"))?;

    if cli.help {
        print!("{HELP_TEXT}");
        return Ok(0);
    }
    if cli.version {
        println!("{VERSION_BANNER}");
        return Ok(0);
    }

    init_logging(cli.verbose);
    run(&cli)?;
    Ok(0)
}

fn run(cli: &Cli) -> Result<()> {
    let rules = build_rules(cli)?;

    let patterns: Vec<&str> =
        cli.input_files.as_deref().map(|raw| raw.split_whitespace().collect()).unwrap_or_default();
    if patterns.is_empty() {
        return Err(anyhow!("Please provide an argument for --input-files\n{HELP_TEXT}"));
    }

    let files = expand_patterns(&patterns)?;
    info!(files = ?files, "working on these files");
    let documents = read_documents(&files)?;
    let merged = merge_documents(&documents, &rules)?;

    // --verbose wins over --silent.
    if cli.silent && !cli.verbose {
        return Ok(());
    }
    emit(cli.output_file.as_deref(), &merged)
}

fn build_rules(cli: &Cli) -> Result<RulesConfig> {
    let mut rules = RulesConfig::default();

    if let Some(path) = &cli.rules {
        let from_file = RulesConfig::from_path(path)
            .with_context(|| format!("Could not find a valid JSON file at: {}", path.display()))?;
        info!(
            path = %path.display(),
            rules = %serde_json::to_string_pretty(&from_file).unwrap_or_default(),
            "using addition rules from file"
        );
        rules.merge_from(&from_file);
    }

    rules.merge_from(&RulesConfig::new().with_global(flag_overrides(cli)?));
    Ok(rules)
}

fn flag_overrides(cli: &Cli) -> Result<RuleOverrides> {
    let mut overrides = RuleOverrides::default();
    if let Some(raw) = &cli.rule_binary_operation {
        let operation: BinaryOperation =
            raw.parse().context("Invalid argument for --rule-binary-operation")?;
        overrides = overrides.with_binary_operation(operation);
    }
    if cli.rule_ignore_errors {
        overrides = overrides.with_ignore_errors(true);
    }
    if cli.rule_sort {
        overrides = overrides.with_sort(true);
    }
    if cli.rule_unique {
        overrides = overrides.with_unique(true);
    }
    if cli.subtract {
        overrides = overrides.with_subtract(true);
    }
    Ok(overrides)
}

fn emit(output_file: Option<&std::path::Path>, merged: &Node) -> Result<()> {
    match output_file {
        Some(path) => {
            write_document(path, merged)?;
            let mut stdout = io::stdout();
            let (green, reset) =
                if stdout.is_terminal() { (COLOR_GREEN, COLOR_RESET) } else { ("", "") };
            writeln!(
                stdout,
                "{green}\u{2714}{reset} Output successfully written to file: {}",
                path.display()
            )?;
        }
        None => {
            let rendered = merged.to_pretty_json().context("failed to serialize result")?;
            let mut stdout = io::stdout();
            writeln!(stdout, "{rendered}")?;
            stdout.flush().ok();
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Maps the original camelCase and single-dash flag spellings onto clap's.
fn canonicalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    const RENAMES: &[(&str, &str)] = &[
        ("inputFiles", "input-files"),
        ("outputFile", "output-file"),
        ("ruleBinaryOperation", "rule-binary-operation"),
        ("ruleIgnoreErrors", "rule-ignore-errors"),
        ("ruleSort", "rule-sort"),
        ("ruleUnique", "rule-unique"),
        ("help", "help"),
        ("version", "version"),
        ("rules", "rules"),
        ("subtract", "subtract"),
        ("silent", "silent"),
        ("verbose", "verbose"),
    ];

    let mut canonicalized = Vec::new();
    for (idx, arg) in args.into_iter().enumerate() {
        if idx == 0 {
            canonicalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            canonicalized.push(arg);
            continue;
        };
        let Some(flag) = text.strip_prefix("--").or_else(|| text.strip_prefix('-')) else {
            canonicalized.push(arg);
            continue;
        };
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };
        match RENAMES.iter().find(|(from, _)| *from == name) {
            Some((_, to)) => match value {
                Some(value) => canonicalized.push(OsString::from(format!("--{to}={value}"))),
                None => canonicalized.push(OsString::from(format!("--{to}"))),
            },
            None => canonicalized.push(arg),
        }
    }
    canonicalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    fn parse(items: &[&str]) -> Cli {
        Cli::try_parse_from(canonicalize_args(args(items))).expect("arguments parse")
    }

    #[test]
    fn canonicalizes_camel_case_flags() {
        let canonicalized = canonicalize_args(args(&[
            "json-addition",
            "--inputFiles=a.json b.json",
            "--outputFile",
            "out.json",
            "--ruleBinaryOperation=AND",
            "--ruleIgnoreErrors",
            "--ruleSort",
            "--ruleUnique",
        ]));
        assert_eq!(
            canonicalized,
            args(&[
                "json-addition",
                "--input-files=a.json b.json",
                "--output-file",
                "out.json",
                "--rule-binary-operation=AND",
                "--rule-ignore-errors",
                "--rule-sort",
                "--rule-unique",
            ])
        );
    }

    #[test]
    fn canonicalizes_single_dash_long_flags() {
        let canonicalized =
            canonicalize_args(args(&["json-addition", "-help", "-version", "-subtract", "-s", "-v"]));
        assert_eq!(
            canonicalized,
            args(&["json-addition", "--help", "--version", "--subtract", "-s", "-v"])
        );
    }

    #[test]
    fn leaves_values_and_unknown_flags_alone() {
        let canonicalized = canonicalize_args(args(&["json-addition", "--rules", "-", "--other"]));
        assert_eq!(canonicalized, args(&["json-addition", "--rules", "-", "--other"]));
    }

    #[test]
    fn flags_layer_over_rules() {
        let cli = parse(&[
            "json-addition",
            "--inputFiles=x.json",
            "--ruleBinaryOperation=AND",
            "--subtract",
            "--ruleSort",
        ]);
        let rules = build_rules(&cli).unwrap().effective_global();
        assert_eq!(rules.binary_operation(), BinaryOperation::And);
        assert!(rules.subtract());
        assert!(rules.sort());
        assert!(!rules.unique());
        assert!(!rules.ignore_errors());
    }

    #[test]
    fn invalid_binary_operation_is_rejected() {
        let cli = parse(&["json-addition", "--rule-binary-operation", "XOR"]);
        let err = build_rules(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("--rule-binary-operation"));
    }
}
