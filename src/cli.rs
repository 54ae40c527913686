//! Minimal CLI: parse specifications given inline, or check files of them.
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use type_spec::report::{self, Source};
use type_spec::{TypeParseError, TypeParser};

// ---------------------------------- TYPES ---------------------------------- //

/// parse type specifications such as `Hash[String, Array[Integer]]` and print their canonical form
#[derive(Parser, Debug)]
#[command(name = "type-spec", version)]
pub struct CommandLineInterface {
    /// log interpreter decisions to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// never color diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse each argument and print the resulting type
    Parse(ParseArgs),
    /// parse every line of the given files and report failures
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// one or more specifications
    #[arg(required = true)]
    specs: Vec<String>,

    /// how to print successfully parsed types
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// One or more inputs. May be literal paths or quoted glob patterns
    ///
    /// Each non-blank line is one specification; lines starting with `#` are skipped.
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// canonical specification text
    Text,
    /// JSON rendering of the type object
    Json,
    /// Rust debug rendering
    Debug,
}

// ------------------------------ IMPLEMENTATION ----------------------------- //

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        self.init_logging();
        if self.no_color {
            colored::control::set_override(false);
        }
        let color = !self.no_color && std::io::stderr().is_terminal();
        let parser = TypeParser::new();

        let failed = match &self.cmd {
            Command::Parse(target) => run_parse(&parser, target, color)?,
            Command::Check(target) => run_check(&parser, target)?,
        };
        Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }

    fn init_logging(&self) {
        let default = if self.verbose { "type_spec=debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        // a subscriber may already be installed, e.g. when embedded
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

fn run_parse(parser: &TypeParser, target: &ParseArgs, color: bool) -> Result<usize> {
    let mut failed = 0;
    for spec in &target.specs {
        match parser.parse(spec) {
            Ok(ty) => match target.format {
                OutputFormat::Text => println!("{ty}"),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&ty).context("failed to serialize type")?;
                    println!("{json}");
                }
                OutputFormat::Debug => println!("{ty:#?}"),
            },
            Err(error) => {
                failed += 1;
                eprint!("{}", report::render(&error, &Source::new(spec), color));
            }
        }
    }
    Ok(failed)
}

/// One specification line read from an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SpecLine {
    file: usize,
    line: usize, // 1-based
    text: String,
}

fn run_check(parser: &TypeParser, target: &CheckArgs) -> Result<usize> {
    let paths = resolve_file_path_patterns(&target.input)?;
    let mut lines = Vec::new();
    for (file, path) in paths.iter().enumerate() {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        lines.extend(spec_lines(file, &source));
    }

    // the parser carries no per-call state, so one instance serves every thread
    let results: Vec<(&SpecLine, Result<_, TypeParseError>)> = lines
        .par_iter()
        .map(|spec| (spec, parser.parse(&spec.text)))
        .collect();

    let mut failed = 0;
    for (spec, result) in &results {
        if let Err(error) = result {
            failed += 1;
            let path = paths[spec.file].display();
            println!("{path}:{}: {error}", spec.line);
        }
    }
    println!("checked {} specifications, {failed} failed", results.len());
    Ok(failed)
}

fn spec_lines(file: usize, source: &str) -> Vec<SpecLine> {
    source
        .lines()
        .enumerate()
        .filter(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        })
        .map(|(i, l)| SpecLine { file, line: i + 1, text: l.trim().to_string() })
        .collect()
}

// ---------------------------- INTERNAL HELPERS ----------------------------- //

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lines_skip_blanks_and_comments() {
        let src = "Array[String]\n\n  # a comment\n  Integer[1, 2]  \n";
        let lines = spec_lines(3, src);
        assert_eq!(
            lines,
            vec![
                SpecLine { file: 3, line: 1, text: "Array[String]".into() },
                SpecLine { file: 3, line: 4, text: "Integer[1, 2]".into() },
            ]
        );
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["specs/a.txt", "b.txt"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("specs/a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/nonexistent-dir-for-type-spec/*.txt"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"));
    }

    #[test]
    fn parses_command_line() {
        let cli = CommandLineInterface::try_parse_from([
            "type-spec", "parse", "--format", "json", "Array[String]",
        ])
        .unwrap();
        let Command::Parse(args) = cli.cmd else {
            panic!("expected the parse subcommand");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.specs, vec!["Array[String]".to_string()]);
    }
}
