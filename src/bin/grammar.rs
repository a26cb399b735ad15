//! Command-line interface for grammar
//! This binary tokenises and parses files with one of the bundled grammars.
//!
//! Usage:
//!   grammar parse `<path>` [--lang `<lang>`] [--format `<format>`] [--complete]  - Parse and print a document
//!   grammar tokens `<path>` [--lang `<lang>`] [--format `<format>`]             - Print the token stream
//!   grammar describe [--lang `<lang>`]                                         - Print the compiled rules
//!
//! `<path>` may be `-` to read standard input. `--config <file>` layers a TOML file over the
//! built-in defaults and `-v` (repeatable) raises the log level.

use clap::{Arg, ArgAction, ArgMatches, Command};
use grammar::grammars::Language;
use grammar::ParseOptions;
use grammar_config::{GrammarConfig, Loader, LogLevel};
use log::{LevelFilter, Log, Metadata, Record};
use std::fmt::Display;
use std::io::Read;

const LANGUAGES: [&str; 3] = ["json", "sexpr", "sjson"];

fn main() {
    let matches = Command::new("grammar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse documents with declarative grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Raise the log level (repeat for more)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a document and print its tree or value")
                .arg(path_arg())
                .arg(lang_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["pretty", "json", "yaml"])
                        .default_value("pretty"),
                )
                .arg(
                    Arg::new("complete")
                        .long("complete")
                        .help("Fail unless the whole input is consumed")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a document")
                .arg(path_arg())
                .arg(lang_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("describe")
                .about("Print the compiled rule descriptors of a grammar")
                .arg(lang_arg()),
        )
        .get_matches();

    let config = load_config(&matches);
    init_logging(config.log.level, matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches, &config),
        Some(("tokens", tokens_matches)) => handle_tokens_command(tokens_matches),
        Some(("describe", describe_matches)) => handle_describe_command(describe_matches),
        _ => unreachable!(),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the input file, or - for standard input")
        .required(true)
        .index(1)
}

fn lang_arg() -> Arg {
    Arg::new("lang")
        .long("lang")
        .short('l')
        .help("Grammar to use")
        .value_parser(LANGUAGES)
        .default_value("json")
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn load_config(matches: &ArgMatches) -> GrammarConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(("parse", parse_matches)) = matches.subcommand() {
        if parse_matches.get_flag("complete") {
            loader = loader
                .set_override("parse.complete", true)
                .unwrap_or_else(|e| fail(e));
        }
    }
    loader
        .build()
        .unwrap_or_else(|e| fail(format!("invalid configuration: {e}")))
}

fn language(matches: &ArgMatches) -> Language {
    let name = matches
        .get_one::<String>("lang")
        .map(String::as_str)
        .unwrap_or("json");
    name.parse().unwrap_or_else(|e| fail(e))
}

fn read_source(matches: &ArgMatches) -> String {
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("-");
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .unwrap_or_else(|e| fail(format!("reading standard input: {e}")));
        source
    } else {
        std::fs::read_to_string(path).unwrap_or_else(|e| fail(format!("reading {path}: {e}")))
    }
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches, config: &GrammarConfig) {
    let lang = language(matches);
    let source = read_source(matches);
    let options = ParseOptions {
        complete: config.parse.complete,
        trace: config.parse.trace || log::max_level() >= LevelFilter::Trace,
    };
    let document = lang.parse_str(&source, &options).unwrap_or_else(|e| fail(e));

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("pretty");
    let output = match format {
        "pretty" => document.pretty(config.pretty.indent),
        "json" | "yaml" => {
            let value = document.compile().unwrap_or_else(|e| fail(e));
            let rendered = if format == "json" {
                serde_json::to_string_pretty(&value).map_err(|e| e.to_string())
            } else {
                serde_yaml::to_string(&value).map_err(|e| e.to_string())
            };
            let mut rendered = rendered.unwrap_or_else(|e| fail(e));
            if !rendered.ends_with('\n') {
                rendered.push('\n');
            }
            rendered
        }
        other => fail(format!("unknown format '{other}'")),
    };
    print!("{output}");
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) {
    let lang = language(matches);
    let source = read_source(matches);
    let tokens = lang.tokenise(&source).unwrap_or_else(|e| fail(e));

    match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => {
            let json = serde_json::to_string_pretty(tokens.tokens()).unwrap_or_else(|e| fail(e));
            println!("{json}");
        }
        _ => {
            for token in tokens.tokens() {
                println!("{token}");
            }
        }
    }
}

/// Handle the describe command
fn handle_describe_command(matches: &ArgMatches) {
    let lang = language(matches);
    let descriptors = lang.descriptors().unwrap_or_else(|e| fail(e));
    for (i, descriptor) in descriptors.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{descriptor}");
    }
}

/// Writes log records to standard error.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(level: LogLevel, verbose: u8) {
    let configured = match level {
        LogLevel::Off => LevelFilter::Off,
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    };
    let raised = match verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(configured.max(raised));
    }
}
