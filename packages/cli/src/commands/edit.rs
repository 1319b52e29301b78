use super::{ai_client, open_session, print_notices};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_ai::EditAction;
use folio_editor::InlineEditOutcome;
use std::time::Instant;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Page to edit
    pub page_id: String,

    /// improve, expand or summarize
    #[arg(short, long, default_value = "improve")]
    pub action: EditAction,

    /// Rewrite the first occurrence of this text
    #[arg(short = 'm', long = "match", conflicts_with_all = ["start", "end"])]
    pub matching: Option<String>,

    /// Selection start (byte offset)
    #[arg(long, requires = "end")]
    pub start: Option<usize>,

    /// Selection end (byte offset, exclusive)
    #[arg(long, requires = "start")]
    pub end: Option<usize>,
}

pub async fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let (config, mut session) = open_session(cwd)?;
    let client = ai_client(&config)?;

    session.select_item(&args.page_id)?;
    let content = session
        .content()
        .ok_or_else(|| anyhow!("{} is not a page", args.page_id))?
        .to_string();

    let (start, end) = match (&args.matching, args.start, args.end) {
        (Some(needle), _, _) => {
            let start = content
                .find(needle.as_str())
                .ok_or_else(|| anyhow!("\"{}\" does not appear on the page", needle))?;
            (start, start + needle.len())
        }
        (None, Some(start), Some(end)) => (start, end),
        _ => (0, content.len()),
    };
    session.select_text(start, end)?;

    println!(
        "{} {} bytes with {}...",
        "🪄".bright_blue(),
        end - start,
        args.action.to_string().cyan()
    );

    let outcome = session.run_inline_edit(&client, args.action).await?;
    print_notices(&mut session);

    if let InlineEditOutcome::Applied { .. } = outcome {
        session.flush(Instant::now())?;
        println!("  {}", session.status_text().dimmed());
    }
    Ok(())
}
