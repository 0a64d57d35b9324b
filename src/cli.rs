//! Minimal CLI: load definitions → (check | match | schema | list)
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use json_adt::{Handlers, Registry, registry::Entry, schema::emit_schema, trace};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON documents against runtime product/sum type definitions
#[derive(Parser, Debug)]
#[command(name = "json-adt", version)]
pub struct CommandLineInterface {
    /// trace every successful construction to stderr
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// construct every input document as the named type
    Check(CheckOut),
    /// report which union variant each input document dispatches to
    Match(MatchOut),
    /// print the JSON-schema-ish view of a type
    Schema(SchemaOut),
    /// list registered type names
    List(ListOut),
}

#[derive(Args, Debug, Clone)]
struct DefinitionSettings {
    /// definition files, applied in order on top of the built-ins
    #[arg(long, short, num_args = 1..)]
    defs: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    definitions: DefinitionSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// type to construct each document as
    #[arg(long = "type", short = 't')]
    type_name: String,

    /// print constructed values as NDJSON on stdout
    #[arg(long)]
    emit: bool,
}

#[derive(clap::Parser, Debug)]
struct MatchOut {
    #[command(flatten)]
    definitions: DefinitionSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// union to dispatch each document through
    #[arg(long = "union", short = 'u')]
    union_name: String,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    definitions: DefinitionSettings,

    #[arg(long = "type", short = 't')]
    type_name: String,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ListOut {
    #[command(flatten)]
    definitions: DefinitionSettings,
}

/// One JSON document plus where it came from, for reporting.
#[derive(Debug, Clone)]
struct Document {
    origin: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl DefinitionSettings {
    fn load(&self) -> Result<Registry> {
        let mut registry = Registry::with_builtins();
        for path in &self.defs {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read definitions ({})", path.display()))?;
            registry
                .load_str(&source)
                .with_context(|| format!("failed to load definitions ({})", path.display()))?;
        }
        Ok(registry)
    }
}

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let mut out = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let (origin, source) = if source_path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                ("<stdin>".to_string(), buf)
            } else {
                let origin = source_path.to_string_lossy().to_string();
                let source = std::fs::read_to_string(&source_path)
                    .with_context(|| format!("failed to read source file ({origin})"))?;
                (origin, source)
            };
            for doc in parse_documents(&origin, &source, self.ndjson)? {
                out.push(self.select(doc)?);
            }
        }
        Ok(out)
    }

    fn select(&self, doc: Document) -> Result<Document> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(doc);
        };
        let value = doc
            .value
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {}", doc.origin))?;
        Ok(Document { origin: doc.origin, value })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        if self.trace {
            trace::set_enabled(true);
        }
        match &self.cmd {
            Command::Check(target) => target.run(),
            Command::Match(target) => target.run(),
            Command::Schema(target) => target.run(),
            Command::List(target) => target.run(),
        }
    }
}

impl CheckOut {
    fn run(&self) -> Result<ExitCode> {
        let registry = self.definitions.load()?;
        let ty = registry
            .ty(&self.type_name)
            .ok_or_else(|| anyhow!("unknown type `{}`", self.type_name))?;

        let mut failed = 0usize;
        let docs = self.input_settings.load_documents()?;
        for doc in &docs {
            match ty.construct(doc.value.clone()) {
                Ok(instance) => {
                    eprintln!("{} {}", "✅".green(), doc.origin);
                    if self.emit {
                        println!("{}", serde_json::to_string(&instance)?);
                    }
                }
                Err(error) => {
                    failed += 1;
                    eprintln!("{} {}: {error}", "❌".red(), doc.origin);
                }
            }
        }
        eprintln!("{}", summary(docs.len(), failed));
        Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

impl MatchOut {
    fn run(&self) -> Result<ExitCode> {
        let registry = self.definitions.load()?;
        let union = registry
            .union(&self.union_name)
            .ok_or_else(|| anyhow!("`{}` is not a registered union", self.union_name))?;

        let handlers = union
            .variant_names()
            .fold(Handlers::new(), |handlers, name| handlers.on(name, move |_| name));

        let mut failed = 0usize;
        let docs = self.input_settings.load_documents()?;
        for doc in &docs {
            match union.case(&doc.value, &handlers) {
                Ok(variant) => println!("{}\t{}", doc.origin, variant.cyan()),
                Err(error) => {
                    failed += 1;
                    eprintln!("{} {}: {error}", "❌".red(), doc.origin);
                }
            }
        }
        eprintln!("{}", summary(docs.len(), failed));
        Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

impl SchemaOut {
    fn run(&self) -> Result<ExitCode> {
        let registry = self.definitions.load()?;
        let ty = registry
            .ty(&self.type_name)
            .ok_or_else(|| anyhow!("unknown type `{}`", self.type_name))?;
        let schema_src = serde_json::to_string_pretty(&emit_schema(ty))?;
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &schema_src)
                .with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            println!("{schema_src}");
        }
        Ok(ExitCode::SUCCESS)
    }
}

impl ListOut {
    fn run(&self) -> Result<ExitCode> {
        let registry = self.definitions.load()?;
        for (_, entry) in registry.iter() {
            match entry {
                Entry::Type(ty) => println!("{:<6} {}", "type".dimmed(), ty),
                Entry::Union(union) => println!("{:<6} {}", "union".dimmed(), union),
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_documents(origin: &str, source: &str, ndjson: bool) -> Result<Vec<Document>> {
    if !ndjson {
        let value = serde_json::from_str::<Value>(source)
            .with_context(|| format!("failed to parse JSON source file ({origin})"))?;
        return Ok(vec![Document { origin: origin.to_string(), value }]);
    }
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(ix, line)| {
            let origin = format!("{origin}:{}", ix + 1);
            let value = serde_json::from_str::<Value>(line)
                .with_context(|| format!("failed to parse NDJSON line ({origin})"))?;
            Ok(Document { origin, value })
        })
        .collect()
}

fn summary(total: usize, failed: usize) -> String {
    let line = format!("{} of {total} documents passed", total - failed);
    if failed == 0 { line.green().to_string() } else { line.yellow().to_string() }
}

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
            for entry in glob::glob(pattern)? {
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
    fn ndjson_skips_blank_lines_and_numbers_origins() {
        let docs = parse_documents("in.ndjson", "{\"a\":1}\n\n[2]\n", true).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].origin, "in.ndjson:1");
        assert_eq!(docs[1].origin, "in.ndjson:3");
        assert_eq!(docs[1].value, serde_json::json!([2]));
    }

    #[test]
    fn bad_json_names_the_source() {
        let err = parse_documents("broken.json", "{", false).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn json_pointer_selects_subnode() {
        let settings = InputSettings { ndjson: false, json_pointer: Some("/data/0".into()), input: vec![] };
        let doc = Document { origin: "x".into(), value: serde_json::json!({"data": [{"k": true}]}) };
        assert_eq!(settings.select(doc).unwrap().value, serde_json::json!({"k": true}));

        let doc = Document { origin: "x".into(), value: serde_json::json!({}) };
        assert!(settings.select(doc).is_err());
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "-"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("-")]);
    }

    #[test]
    fn cli_parses_check() {
        let cli = CommandLineInterface::try_parse_from([
            "json-adt", "--trace", "check", "-d", "defs.json", "--type", "Point", "-i", "a.json", "b.json",
        ])
        .unwrap();
        assert!(cli.trace);
        match cli.cmd {
            Command::Check(target) => {
                assert_eq!(target.type_name, "Point");
                assert_eq!(target.input_settings.input, ["a.json", "b.json"]);
                assert_eq!(target.definitions.defs, [PathBuf::from("defs.json")]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
