use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use answerdb_cli::ingest::{self, IngestReport};
use answerdb_cli::logging::init_tracing;
use answerdb_cli::App;
use answerdb_core::config::Config;
use answerdb_core::types::{Collection, RenderStyle};

const USAGE: &str = "Usage: answerdb <command> [args...]

Commands:
  ask <query> [--style plain|markup] [--source TAG]   answer one query
  chat [--style plain|markup]                          answer queries from stdin (:reload, :quit)
  ingest <file|dir>                                    store harvested documents from JSON files
  override <file|dir>                                  store editor versions that replace harvested ones
  revert <id>                                          drop the manual version of a document
  unknown [remove <query>]                             list or delete recorded unknown queries
  keywords <file|dir>                                  print extracted keywords without storing";

struct Options {
    positional: Vec<String>,
    style: RenderStyle,
    source: String,
}

fn usage_exit(message: &str) -> ! {
    eprintln!("{message}\n\n{USAGE}");
    std::process::exit(1)
}

fn parse_args() -> (String, Options) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { usage_exit("Missing command"); }
    let cmd = args.remove(0);
    let mut opts = Options { positional: Vec::new(), style: RenderStyle::Plain, source: "cli".to_string() };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--style" => {
                let Some(value) = args.get(i + 1) else { usage_exit("--style requires a value") };
                opts.style = value.parse().unwrap_or_else(|e| usage_exit(&format!("{e}")));
                i += 1;
            }
            "--source" => {
                let Some(value) = args.get(i + 1) else { usage_exit("--source requires a value") };
                opts.source = value.clone();
                i += 1;
            }
            other if other.starts_with("--") => usage_exit(&format!("Unknown option: {other}")),
            other => opts.positional.push(other.to_string()),
        }
        i += 1;
    }
    (cmd, opts)
}

fn print_report(report: &IngestReport, collection: Collection) {
    println!(
        "Stored {} of {} documents in '{}' (keywords extracted for {})",
        report.stored, report.read, collection, report.keywords_filled
    );
}

fn chat(app: &App, opts: &Options) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "" => {}
            ":quit" | ":q" => break,
            ":reload" => match app.synonyms.reload() {
                Ok(groups) => println!("Reloaded {groups} synonym groups"),
                Err(e) => println!("Reload failed, keeping previous synonyms: {e:#}"),
            },
            query => println!("{}\n", app.resolver.resolve(query, opts.style, &opts.source)?),
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (cmd, opts) = parse_args();
    let app = App::from_config(&config)?;
    match cmd.as_str() {
        "ask" => {
            if opts.positional.is_empty() { usage_exit("ask requires a query"); }
            let query = opts.positional.join(" ");
            println!("{}", app.resolver.resolve(&query, opts.style, &opts.source)?);
        }
        "chat" => chat(&app, &opts)?,
        "ingest" | "override" => {
            let Some(path) = opts.positional.first().map(PathBuf::from) else { usage_exit(&format!("{cmd} requires a path")) };
            let collection = if cmd == "override" { Collection::Manual } else { Collection::Automatic };
            let report = ingest::ingest(&app.store, &app.keyword_extractor(), &path, collection)?;
            print_report(&report, collection);
        }
        "revert" => {
            let Some(id) = opts.positional.first() else { usage_exit("revert requires a document id") };
            if app.store.revert_override(id)? {
                println!("Removed manual version of '{id}'");
            } else {
                println!("No manual version of '{id}'");
            }
        }
        "unknown" => match opts.positional.first().map(String::as_str) {
            None | Some("list") => {
                let records = app.store.unknown_queries()?;
                for record in &records { println!("{}", record.query_text); }
                eprintln!("{} unknown queries", records.len());
            }
            Some("remove") => {
                let query = opts.positional[1..].join(" ");
                if query.is_empty() { usage_exit("unknown remove requires a query"); }
                let removed = app.store.remove_unknown(&query)?;
                println!("{}", if removed { "Removed" } else { "Not recorded" });
            }
            Some(other) => usage_exit(&format!("Unknown subcommand: unknown {other}")),
        },
        "keywords" => {
            let Some(path) = opts.positional.first().map(PathBuf::from) else { usage_exit("keywords requires a path") };
            let mut docs = ingest::validate(ingest::load_all(&path)?);
            for doc in docs.iter_mut() { doc.keywords.clear(); }
            ingest::fill_keywords(&mut docs, &app.keyword_extractor());
            for doc in &docs {
                let terms: Vec<String> = doc.keywords.iter().map(|k| format!("{} ({:.3})", k.term, k.confidence)).collect();
                println!("{}: {}", doc.id, terms.join(", "));
            }
        }
        _ => usage_exit(&format!("Unknown command: {cmd}")),
    }
    Ok(())
}
