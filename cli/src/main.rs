use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use clap::Parser;
use formtree::{build, get_value, RawValue, Value};
use serde::Serialize;

/// Reads a flat JSON object of path-encoded keys (`"profile[0].name"`)
/// and prints the nested structure. A thin collaborator: all the work
/// happens in the formtree library.
#[derive(Parser, Debug)]
#[command(name = "formtree", version, about = "Nest flat bracket/dot form keys")]
struct Args {
    /// Input file with a flat JSON object. Omit or use '-' for stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Extract a single path from the built structure instead of
    /// printing the whole tree.
    #[arg(short, long, value_name = "path")]
    get: Option<String>,

    /// Indentation size (0 for compact output).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let input = read_input(args.input.as_deref())?;
    let entries = parse_entries(&input)?;
    let tree = Value::Object(build(entries));

    let rendered = match &args.get {
        Some(path) => get_value(&tree, path)?
            .map(serde_json::Value::from)
            .unwrap_or(serde_json::Value::Null),
        None => serde_json::Value::from(tree),
    };

    with_output_writer(args.output.as_deref(), |writer| {
        write_json(writer, &rendered, args.indent)
    })
}

fn read_input(input: Option<&str>) -> Result<String, Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
    }
}

/// Flat entries from a JSON object. Strings and nulls map directly;
/// other scalars keep their JSON text.
fn parse_entries(input: &str) -> Result<Vec<(String, RawValue)>, Box<dyn Error>> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    let serde_json::Value::Object(map) = value else {
        return Err("input must be a flat JSON object".into());
    };
    let entries = map
        .into_iter()
        .map(|(key, value)| {
            let raw = match value {
                serde_json::Value::String(text) => RawValue::Text(text),
                serde_json::Value::Null => RawValue::Null,
                other => RawValue::Text(other.to_string()),
            };
            (key, raw)
        })
        .collect();
    Ok(entries)
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_json(
    writer: &mut dyn Write,
    value: &serde_json::Value,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}
