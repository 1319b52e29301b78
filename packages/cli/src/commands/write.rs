use super::{open_session, print_notices};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Page to write to
    pub page_id: String,

    /// New content (reads stdin when neither --text nor --file is given)
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read new content from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Append instead of replacing
    #[arg(short, long)]
    pub append: bool,

    /// Insert a mention of this asset instead of writing text
    #[arg(long, conflicts_with_all = ["text", "file", "append"])]
    pub insert_asset: Option<String>,

    /// Byte offset for --insert-asset (defaults to the end of the page)
    #[arg(long, requires = "insert_asset")]
    pub at: Option<usize>,
}

pub fn write(args: WriteArgs, cwd: &str) -> Result<()> {
    let (_, mut session) = open_session(cwd)?;
    session.select_item(&args.page_id)?;
    let current = session
        .content()
        .ok_or_else(|| anyhow!("{} is not a page", args.page_id))?
        .to_string();
    let now = Instant::now();

    if let Some(asset_id) = &args.insert_asset {
        let offset = args.at.unwrap_or(current.len());
        session.insert_asset_reference(asset_id, offset, now)?;
    } else {
        let input = read_input(&args)?;
        let content = if args.append {
            format!("{current}{input}")
        } else {
            input
        };
        session.type_content(content, now)?;
    }

    match session.flush(Instant::now())? {
        Some(report) if report.wrote => {
            println!("  {} Saved {}", "✓".green(), report.item_id.cyan())
        }
        _ => println!("  {} No changes to save", "•".dimmed()),
    }
    print_notices(&mut session);
    println!("  {}", session.status_text().dimmed());
    Ok(())
}

fn read_input(args: &WriteArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
