//! anneal-unify: reconcile semi-structured JSON rows against an expected schema
//!
//! Usage:
//!   # Read NDJSON from a file, write unified NDJSON to stdout
//!   anneal-unify events.jsonl --paths "id,status,meta.source$oid"
//!
//!   # Read from stdin
//!   echo '{"id": 1}' | anneal-unify --paths "id,meta.ts$date"
//!
//!   # Expected paths from a file, one per line
//!   anneal-unify events.jsonl --paths-file expected.txt
//!
//!   # Print the unified schema instead of the rows
//!   anneal-unify events.jsonl --paths-file expected.txt --schema

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anneal::{unify, FieldPath, JsonTable};
use anyhow::Result;
use clap::Parser;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "anneal-unify")]
#[command(about = "Reconcile semi-structured JSON rows against an expected schema", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Comma-separated expected column paths, e.g. "id,meta.ts$date"
    #[arg(long, short = 'p')]
    paths: Option<String>,

    /// File with one expected column path per line ('#' lines are skipped)
    #[arg(long)]
    paths_file: Option<String>,

    /// Print the unified schema instead of the rows
    #[arg(long)]
    schema: bool,

    /// Compact schema output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let expected = collect_paths(&args)?;
    if expected.is_empty() {
        anyhow::bail!("no expected paths given; use --paths or --paths-file");
    }

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(File::open(file_path)?))
    } else {
        Box::new(std::io::stdin())
    };

    let rows = read_rows(reader)?;
    if rows.is_empty() {
        eprintln!("Warning: no JSON objects found in input");
    }

    let table = JsonTable::from_rows(rows);
    let unified = unify(table, &expected)?;

    if args.schema {
        let output = if args.compact {
            serde_json::to_string(unified.schema())?
        } else {
            serde_json::to_string_pretty(unified.schema())?
        };
        println!("{}", output);
    } else {
        let mut stdout = std::io::stdout();
        unified.write_ndjson(&mut stdout)?;
        stdout.flush()?;
    }

    Ok(())
}

fn collect_paths(args: &Args) -> Result<Vec<FieldPath>> {
    let mut expected = Vec::new();

    if let Some(list) = &args.paths {
        expected.extend(
            list.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(FieldPath::new),
        );
    }

    if let Some(path_file) = &args.paths_file {
        let content = std::fs::read_to_string(path_file)?;
        expected.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(FieldPath::new),
        );
    }

    Ok(expected)
}

/// Read rows using SIMD-accelerated parsing when the input is a single
/// JSON document (object or array), falling back to line-oriented
/// serde_json for NDJSON
fn read_rows(reader: Box<dyn Read>) -> Result<Vec<Map<String, Value>>> {
    let mut content = Vec::new();
    let mut buf_reader = BufReader::new(reader);
    buf_reader.read_to_end(&mut content)?;

    let mut rows = Vec::new();

    // simd-json parses in place, so give it its own buffer and keep the
    // original for the NDJSON fallback
    let mut simd_buf = content.clone();
    match simd_json::to_owned_value(&mut simd_buf) {
        Ok(simd_json::OwnedValue::Array(arr)) => {
            for elem in arr.iter() {
                let json_str = simd_json::to_string(elem)?;
                let value: Value = serde_json::from_str(&json_str)?;
                if let Value::Object(obj) = value {
                    rows.push(obj);
                }
            }
        }
        Ok(elem) => {
            let json_str = simd_json::to_string(&elem)?;
            let value: Value = serde_json::from_str(&json_str)?;
            if let Value::Object(obj) = value {
                rows.push(obj);
            }
        }
        Err(_) => {
            // NDJSON or malformed input
            let content_str = String::from_utf8_lossy(&content);
            for line in content_str.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let value: Value = serde_json::from_str(line)?;
                if let Value::Object(obj) = value {
                    rows.push(obj);
                }
            }
        }
    }

    Ok(rows)
}
