use super::{open_session, print_notices};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use folio_model::AssetType;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(subcommand)]
    pub item: AddItem,
}

#[derive(Debug, Subcommand)]
pub enum AddItem {
    /// New empty project
    Project { title: String },

    /// New chapter at the end of a project
    Chapter { project_id: String, title: String },

    /// New empty page at the end of a chapter
    Page {
        project_id: String,
        chapter_id: String,
        title: String,
    },

    /// New catalog asset
    Asset {
        name: String,

        /// character, location, item or image
        #[arg(short = 't', long = "type", default_value = "character")]
        asset_type: AssetType,

        #[arg(short, long, default_value = "")]
        description: String,
    },
}

pub fn add(args: AddArgs, cwd: &str) -> Result<()> {
    let (_, mut session) = open_session(cwd)?;

    let (kind, id) = match args.item {
        AddItem::Project { title } => ("project", session.create_project(&title)?.id),
        AddItem::Chapter { project_id, title } => {
            ("chapter", session.create_chapter(&project_id, &title)?.id)
        }
        AddItem::Page {
            project_id,
            chapter_id,
            title,
        } => (
            "page",
            session.create_page(&project_id, &chapter_id, &title)?.id,
        ),
        AddItem::Asset {
            name,
            asset_type,
            description,
        } => (
            "asset",
            session.create_asset(&name, asset_type, &description)?.id,
        ),
    };

    print_notices(&mut session);
    println!("  {} Added {} {}", "✓".green(), kind, id.cyan());
    Ok(())
}
