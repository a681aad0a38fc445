use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use xdumps::{RenderConfig, RenderConfigBuilder, Renderer, Value};

fn cli() -> Command {
    Command::new("xdumps")
        .about("Render a JSON document the way diagnostics render values")
        .arg(
            Arg::new("input")
                .help("Input JSON file, or '-' for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Render config (JSON); defaults to the user config file when present"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Containers nested deeper than this are cut"),
        )
        .arg(
            Arg::new("max-width")
                .long("max-width")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Elements shown per container"),
        )
        .arg(
            Arg::new("max-length")
                .long("max-length")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Total output budget in characters"),
        )
        .arg(
            Arg::new("truncate-strings")
                .long("truncate-strings")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Characters kept per string"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Pretty-print with this many spaces per level"),
        )
        .arg(
            Arg::new("rshift")
                .long("rshift")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .help("Left padding added to every output line"),
        )
        .arg(
            Arg::new("separators")
                .long("separators")
                .num_args(2)
                .value_names(["ITEM", "KEY"])
                .help("Item and key separators, e.g. --separators '; ' ' = '"),
        )
        .arg(
            Arg::new("string-bypass")
                .long("string-bypass")
                .action(ArgAction::SetTrue)
                .help("Print a top-level JSON string as-is"),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .action(ArgAction::SetTrue)
                .help("Print the token sequence, one token per line"),
        )
}

fn overrides(matches: &ArgMatches) -> RenderConfigBuilder {
    let mut builder = RenderConfig::builder();
    if let Some(&value) = matches.get_one::<i64>("max-depth") {
        builder = builder.max_depth(value);
    }
    if let Some(&value) = matches.get_one::<i64>("max-width") {
        builder = builder.max_container_width(value);
    }
    if let Some(&value) = matches.get_one::<i64>("max-length") {
        builder = builder.max_total_length(value);
    }
    if let Some(&value) = matches.get_one::<i64>("truncate-strings") {
        builder = builder.truncate_string_length(value);
    }
    if let Some(&value) = matches.get_one::<i64>("indent") {
        builder = builder.indent(Some(value));
    }
    if let Some(&value) = matches.get_one::<i64>("rshift") {
        builder = builder.rshift(value);
    }
    if let Some(mut values) = matches.get_many::<String>("separators") {
        if let (Some(item), Some(key)) = (values.next(), values.next()) {
            builder = builder.separators(item.as_str(), key.as_str());
        }
    }
    if matches.get_flag("string-bypass") {
        builder = builder.string_bypass(true);
    }
    builder
}

fn load_config(matches: &ArgMatches) -> Result<RenderConfig> {
    let base = match matches.get_one::<PathBuf>("config") {
        Some(path) => RenderConfigBuilder::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let path = RenderConfig::default_path();
            RenderConfigBuilder::from_optional_file(path.as_deref())
                .context("loading the default config file")?
        }
    };

    Ok(base.merge(overrides(matches)).build()?)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("reading {input}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let matches = cli().get_matches();

    let input = matches
        .get_one::<String>("input")
        .context("missing input argument")?;
    let config = load_config(&matches)?;

    let json: serde_json::Value = serde_json::from_str(&read_input(input)?)
        .with_context(|| format!("parsing JSON from {input}"))?;
    let value = Value::from(json);

    let renderer = Renderer::new(config);
    if matches.get_flag("tokens") {
        for token in renderer.tokenize(&value).tokens() {
            println!("{token:?}");
        }
    } else {
        println!("{}", renderer.render(&value));
    }

    Ok(())
}
