use super::ai_client;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_ai::WritingMode;

#[derive(Debug, Args)]
pub struct AskArgs {
    pub prompt: String,

    /// fast, complex or research
    #[arg(short, long, default_value = "fast")]
    pub mode: WritingMode,
}

pub async fn ask(args: AskArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let client = ai_client(&config)?;

    println!("{} Thinking ({})...", "💭".bright_blue(), args.mode.to_string().cyan());
    let reply = args.mode.run(&client, &args.prompt).await?;

    println!();
    println!("{}", reply.text);

    if !reply.sources.is_empty() {
        println!();
        println!("{}", "Sources".bold());
        for source in &reply.sources {
            let title = if source.title.is_empty() {
                source.uri.as_str()
            } else {
                source.title.as_str()
            };
            println!("  {} {}", title, source.uri.dimmed());
        }
    }
    Ok(())
}
