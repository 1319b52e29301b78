use super::open_session;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use folio_portal::{html, HtmlOptions, Library, ReadingView, Resolution};
use folio_references::RenderedSegment;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Published project to open (lists the library when omitted)
    pub project_id: Option<String>,

    /// Page to open instead of the first one
    #[arg(short, long)]
    pub page: Option<String>,

    /// Show the detail of an asset mentioned in the project
    #[arg(long)]
    pub asset: Option<String>,

    /// Report mentions of assets that no longer exist
    #[arg(long)]
    pub check: bool,

    /// Write HTML to this file instead of printing text
    #[arg(long)]
    pub html: Option<PathBuf>,
}

pub fn read(args: ReadArgs, cwd: &str) -> Result<()> {
    let (_, session) = open_session(cwd)?;
    let store = session.store();
    let library = Library::new(store.projects(), store.assets());

    let Some(project_id) = &args.project_id else {
        return list(&library, &args);
    };

    let mut view = match library.resolve(project_id) {
        Resolution::Found(view) => view,
        Resolution::NotFound(not_found) => {
            if let Some(path) = &args.html {
                std::fs::write(path, html::render_not_found(&not_found, HtmlOptions::default()))?;
            }
            bail!("{} ({})", not_found.message, not_found.back_label);
        }
    };

    if let Some(page_id) = &args.page {
        view.select_page(page_id)?;
    }

    if args.check {
        return check(&view);
    }

    if let Some(asset_id) = &args.asset {
        match view.open_asset(asset_id).detail() {
            Some(detail) => {
                println!("{} {}", detail.name().bold(), detail.type_label().cyan());
                if let Some(url) = detail.image_url() {
                    println!("  image: {}", truncate(url, 60).dimmed());
                }
                println!("{}", detail.description());
            }
            None => println!("{} Asset not found.", "⚠️".yellow()),
        }
        return Ok(());
    }

    if let Some(path) = &args.html {
        std::fs::write(path, html::render_reading_page(&view, HtmlOptions::default()))?;
        println!("  {} Wrote {}", "✓".green(), path.display());
        return Ok(());
    }

    print_reading(&view);
    Ok(())
}

fn list(library: &Library<'_>, args: &ReadArgs) -> Result<()> {
    if let Some(path) = &args.html {
        std::fs::write(path, html::render_listing(library, HtmlOptions::default()))?;
        println!("  {} Wrote {}", "✓".green(), path.display());
        return Ok(());
    }

    println!("{}", "Published Works".bright_blue().bold());
    if let Some(message) = library.empty_message() {
        println!("  {}", message.dimmed());
    }
    for entry in library.listing() {
        println!("  {} {}", entry.title.bold(), entry.id.dimmed());
        if !entry.description.is_empty() {
            println!("    {}", entry.description);
        }
    }
    Ok(())
}

fn check(view: &ReadingView<'_>) -> Result<()> {
    let dangling = view.dangling_references();
    if dangling.is_empty() {
        println!("  {} Every mention resolves", "✓".green());
        return Ok(());
    }
    for reference in &dangling {
        println!(
            "  {} {} on page {} points at missing asset {}",
            "✗".red(),
            reference.display_name.bold(),
            reference.page_id.cyan(),
            reference.asset_id.yellow()
        );
    }
    bail!("{} dangling mention(s)", dangling.len())
}

fn print_reading(view: &ReadingView<'_>) {
    println!("{}", view.project().title.bright_blue().bold());
    for chapter in view.table_of_contents() {
        println!("  {}", chapter.title.bold());
        for page in &chapter.pages {
            let marker = if page.active { "▸" } else { " " };
            println!("   {} {} {}", marker, page.title, page.id.dimmed());
        }
    }
    println!();

    let (Some(page), Some(segments)) = (view.active_page(), view.render_active()) else {
        println!("{}", "Select a page to start reading.".dimmed());
        return;
    };

    println!("{}", page.title.bold());
    let mut text = String::new();
    for segment in segments {
        match segment {
            RenderedSegment::PlainText { text: plain } => text.push_str(plain),
            RenderedSegment::AssetMention {
                display_name,
                resolved: true,
                ..
            } => text.push_str(&display_name.cyan().underline().to_string()),
            RenderedSegment::AssetMention { display_name, .. } => {
                text.push_str(&display_name.red().to_string())
            }
        }
    }
    println!("{text}");
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
