mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, analyze, ask, edit, image, init, publish, read, set, speak, tree, write, AddArgs,
    AnalyzeArgs, AskArgs, EditArgs, ImageArgs, InitArgs, PublishArgs, ReadArgs, SetArgs,
    SpeakArgs, TreeArgs, WriteArgs,
};
use tracing_subscriber::EnvFilter;

/// Folio CLI - write, enrich and publish long-form stories
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output from folio crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Folio library
    Init(InitArgs),

    /// Show projects, chapters, pages and assets
    Tree(TreeArgs),

    /// Create a project, chapter, page or asset
    Add(AddArgs),

    /// Replace a page's content or insert an asset mention
    Write(WriteArgs),

    /// Change a title or a project description
    Set(SetArgs),

    /// Publish or unpublish a project
    Publish(PublishArgs),

    /// Rewrite part of a page with AI
    Edit(EditArgs),

    /// Read published works
    Read(ReadArgs),

    /// Ask the writing assistant
    Ask(AskArgs),

    /// Generate an image
    Image(ImageArgs),

    /// Describe an image file
    Analyze(AnalyzeArgs),

    /// Synthesize speech to raw PCM
    Speak(SpeakArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,folio=debug,folio_common=debug,folio_model=debug,folio_references=debug,folio_storage=debug,folio_ai=debug,folio_editor=debug,folio_portal=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Tree(args) => tree(args, &cwd),
        Command::Add(args) => add(args, &cwd),
        Command::Write(args) => write(args, &cwd),
        Command::Set(args) => set(args, &cwd),
        Command::Publish(args) => publish(args, &cwd),
        Command::Edit(args) => edit(args, &cwd).await,
        Command::Read(args) => read(args, &cwd),
        Command::Ask(args) => ask(args, &cwd).await,
        Command::Image(args) => image(args, &cwd).await,
        Command::Analyze(args) => analyze(args, &cwd).await,
        Command::Speak(args) => speak(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
