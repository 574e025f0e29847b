use std::path::{Path, PathBuf};
use std::{env, fs, io};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dialoguer::Select;
use serde::Serialize;

use crate::config::resolve::load_settings_with_overrides;
use crate::config::Settings;
use crate::error::{Result, TopographError};
use crate::graph::{ops, viz};
use crate::parse::ParsedGraph;
use crate::pipeline::{self, GraphSource, SortOutcome};
use crate::util::output;

const EXIT_CYCLE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "topograph")]
#[command(about = "Topological sort for graph files", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Sort(SortArgs),
    Check(CheckArgs),
    Show(ShowArgs),
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    pub file: Option<PathBuf>,
    #[arg(long, conflicts_with = "file")]
    pub stdin: bool,
}

#[derive(Args, Debug)]
pub struct SortArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long, default_value = "tree")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_output_format(input: &str) -> Result<OutputFormat> {
    match input.to_ascii_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        _ => Err(TopographError::Other(anyhow::anyhow!(format!(
            "unknown output format '{}'",
            input
        )))),
    }
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        output::set_color(false);
    }
    match dispatch(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            output::error(&err.to_string());
            std::process::exit(1);
        }
    }
}

fn dispatch(cli: Cli) -> Result<i32> {
    if let Commands::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "topograph", &mut io::stdout());
        return Ok(0);
    }

    let cwd = env::current_dir()?;
    let settings = load_settings_with_overrides(&cwd, cli.config)?;
    let ctx = Context {
        settings,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Sort(args) => handle_sort(args, &ctx),
        Commands::Check(args) => handle_check(args, &ctx),
        Commands::Show(args) => handle_show(args, &ctx),
        Commands::Completions(_) => Ok(0),
    }
}

struct Context {
    settings: Settings,
    quiet: bool,
}

impl Context {
    fn format(&self, json: bool) -> Result<OutputFormat> {
        if json {
            return Ok(OutputFormat::Json);
        }
        parse_output_format(&self.settings.defaults.format)
    }

    fn echo(&self) -> bool {
        !self.quiet && self.settings.defaults.echo
    }
}

fn handle_sort(args: SortArgs, ctx: &Context) -> Result<i32> {
    let format = ctx.format(args.json)?;
    let strict = args.strict || ctx.settings.defaults.strict;
    let Some(source) = resolve_source(&args.input, &ctx.settings)? else {
        output::warn("no graph file selected");
        return Ok(0);
    };

    let parsed = source.parse()?;
    if format == OutputFormat::Text && ctx.echo() {
        print_definitions(&parsed);
    }
    let result = pipeline::sort(parsed)?;

    match format {
        OutputFormat::Json => print_json(&result.outcome)?,
        OutputFormat::Text => match &result.outcome {
            SortOutcome::Ordered { order } => {
                println!();
                println!("Graph nodes in topological order:");
                for name in order {
                    println!("{}", name);
                }
                println!("End of graph");
            }
            SortOutcome::Cycle { .. } => println!("Cycle detected in the graph"),
        },
    }

    if result.outcome.is_cycle() {
        if !ctx.quiet && format == OutputFormat::Text {
            output::info(&format!("{} contains a cycle; run `topograph check` for details", source));
        }
        if strict {
            return Ok(EXIT_CYCLE);
        }
    }
    Ok(0)
}

#[derive(Serialize)]
struct CheckJson {
    acyclic: bool,
    cycles: Vec<Vec<String>>,
}

fn handle_check(args: CheckArgs, ctx: &Context) -> Result<i32> {
    let format = ctx.format(args.json)?;
    let Some(source) = resolve_source(&args.input, &ctx.settings)? else {
        output::warn("no graph file selected");
        return Ok(0);
    };

    let parsed = source.parse()?;
    let cycles = ops::find_cycles(&parsed.graph);
    let acyclic = cycles.is_empty();

    match format {
        OutputFormat::Json => print_json(&CheckJson { acyclic, cycles })?,
        OutputFormat::Text => {
            if acyclic {
                println!("no cycles found");
            }
            for cycle in &cycles {
                let mut path = cycle.clone();
                if let Some(first) = cycle.first() {
                    path.push(first.clone());
                }
                println!("cycle: {}", path.join(" -> "));
            }
        }
    }

    if acyclic {
        Ok(0)
    } else {
        Ok(EXIT_CYCLE)
    }
}

fn handle_show(args: ShowArgs, ctx: &Context) -> Result<i32> {
    let Some(source) = resolve_source(&args.input, &ctx.settings)? else {
        output::warn("no graph file selected");
        return Ok(0);
    };
    let parsed = source.parse()?;

    match args.format.to_ascii_lowercase().as_str() {
        "tree" => print!("{}", viz::render_tree(&parsed.graph)),
        "dot" => print!("{}", viz::render_dot(&parsed.graph)),
        "json" => print_json(&viz::to_json(&parsed.graph))?,
        other => {
            return Err(TopographError::Other(anyhow::anyhow!(format!(
                "unknown graph format '{}'",
                other
            ))))
        }
    }
    Ok(0)
}

fn print_definitions(parsed: &ParsedGraph) {
    println!();
    println!("Nodes:");
    for name in &parsed.vertices {
        println!("{}", name);
    }
    println!();
    println!("Edges:");
    for (from, to) in &parsed.edges {
        println!("{} {}", from, to);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| TopographError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

fn resolve_source(input: &InputArgs, settings: &Settings) -> Result<Option<GraphSource>> {
    if input.stdin {
        return Ok(Some(GraphSource::Stdin));
    }
    if let Some(file) = input.file.as_ref() {
        return Ok(Some(GraphSource::Path(file.clone())));
    }
    pick_graph_file(Path::new(&settings.defaults.graphs_dir))
        .map(|picked| picked.map(GraphSource::Path))
}

fn pick_graph_file(dir: &Path) -> Result<Option<PathBuf>> {
    let files = list_graph_files(dir)?;
    if files.is_empty() {
        return Err(TopographError::Other(anyhow::anyhow!(format!(
            "no graph file given and no files found in {}",
            dir.display()
        ))));
    }
    if !console::Term::stderr().is_term() {
        return Err(TopographError::Other(anyhow::anyhow!(
            "no graph file given and no terminal available to pick one"
        )));
    }

    let labels: Vec<String> = files
        .iter()
        .map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string())
        })
        .collect();
    let selection = Select::new()
        .with_prompt(format!("Choose a graph file in {}", dir.display()))
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|err| TopographError::Other(anyhow::Error::new(err)))?;

    Ok(selection.map(|idx| files[idx].clone()))
}

fn list_graph_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if path.is_file() && !hidden {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use crate::cli::{list_graph_files, parse_output_format, Cli, Commands, OutputFormat};

    #[test]
    fn parses_output_formats_case_insensitively() {
        assert_eq!(parse_output_format("JSON").expect("json"), OutputFormat::Json);
        assert_eq!(parse_output_format("text").expect("text"), OutputFormat::Text);
        assert!(parse_output_format("yaml").is_err());
    }

    #[test]
    fn stdin_conflicts_with_file() {
        assert!(Cli::try_parse_from(["topograph", "sort", "--stdin", "graph.txt"]).is_err());
        let cli = Cli::try_parse_from(["topograph", "--quiet", "sort", "--stdin"]).expect("parse");
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Sort(args) if args.input.stdin));
    }

    #[test]
    fn lists_visible_files_sorted() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "topograph-list-{}-{nanos}",
            std::process::id()
        ));
        fs::create_dir_all(dir.join("nested")).expect("create dir");
        fs::write(dir.join("b.txt"), "").expect("write b");
        fs::write(dir.join("a.txt"), "").expect("write a");
        fs::write(dir.join(".hidden"), "").expect("write hidden");

        let files = list_graph_files(&dir).expect("list files");
        assert_eq!(files, vec![dir.join("a.txt"), dir.join("b.txt")]);
        assert!(list_graph_files(&dir.join("missing"))
            .expect("list missing dir")
            .is_empty());

        let _ = fs::remove_dir_all(dir);
    }
}
