use super::open_session;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct PublishArgs {
    pub project_id: String,

    /// Hide the project from readers again
    #[arg(long)]
    pub unpublish: bool,
}

pub fn publish(args: PublishArgs, cwd: &str) -> Result<()> {
    let (_, mut session) = open_session(cwd)?;
    session.set_published(&args.project_id, !args.unpublish)?;

    if args.unpublish {
        println!("  {} {} is now a draft", "✓".green(), args.project_id.cyan());
    } else {
        println!("  {} {} is published", "✓".green(), args.project_id.cyan());
        println!("  Read it with: folio read {}", args.project_id);
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Project, chapter or page id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,
}

pub fn set(args: SetArgs, cwd: &str) -> Result<()> {
    if args.title.is_none() && args.description.is_none() {
        bail!("Nothing to change. Pass --title and/or --description");
    }

    let (_, mut session) = open_session(cwd)?;

    if let Some(title) = &args.title {
        session.select_item(&args.id)?;
        session.rename(title)?;
        println!("  {} Renamed {} to {}", "✓".green(), args.id.cyan(), title.bold());
    }
    if let Some(description) = &args.description {
        session.set_description(&args.id, description)?;
        println!("  {} Updated description of {}", "✓".green(), args.id.cyan());
    }
    Ok(())
}
