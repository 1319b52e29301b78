use super::open_session;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Print the library as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn tree(args: TreeArgs, cwd: &str) -> Result<()> {
    let (_, session) = open_session(cwd)?;
    let store = session.store();

    if args.json {
        let snapshot = serde_json::json!({
            "projects": store.projects(),
            "assets": store.assets(),
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", "Projects".bright_blue().bold());
    if store.projects().is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for project in store.projects() {
        let badge = if project.is_published {
            " published".green().to_string()
        } else {
            " draft".yellow().to_string()
        };
        println!("  {} {}{}", project.title.bold(), project.id.dimmed(), badge);
        for chapter in &project.chapters {
            println!("    {} {}", chapter.title, chapter.id.dimmed());
            for page in &chapter.pages {
                let mentions = folio_references::references(&page.content).count();
                println!(
                    "      {} {} ({} chars, {} mention(s))",
                    page.title,
                    page.id.dimmed(),
                    page.content.chars().count(),
                    mentions
                );
            }
        }
    }

    println!();
    println!("{}", "Assets".bright_blue().bold());
    if store.assets().is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for asset in store.assets() {
        println!(
            "  {} {} [{}]",
            asset.name.bold(),
            asset.id.dimmed(),
            asset.asset_type.to_string().cyan()
        );
    }

    Ok(())
}
