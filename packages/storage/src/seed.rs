//! Default library content written on first run

use folio_common::Clock;
use folio_model::{Asset, AssetType, Chapter, ModelResult, Page, Project};

pub const SEED_PROJECT_ID: &str = "proj-1";
pub const SEED_CHAPTER_ID: &str = "chap-1";
pub const SEED_PAGE_ID: &str = "page-1";
pub const SEED_ASSET_ID: &str = "asset-1";

const SEED_PAGE_CONTENT: &str = "The rain fell in sheets, blurring the neon signs into a watercolor mess. \
[[asset:asset-1:Kael]] adjusted his collar, the synthetic fabric doing little to ward off the chill. \
He was waiting for a ghost.";

pub fn seed_projects(clock: &dyn Clock) -> ModelResult<Vec<Project>> {
    let page = Page::with_id(SEED_PAGE_ID, "First Encounter", clock)?.with_content(SEED_PAGE_CONTENT);

    let mut chapter = Chapter::with_id(SEED_CHAPTER_ID, "The Silent Signal", clock)?;
    chapter.pages.push(page);

    let mut project = Project::with_id(SEED_PROJECT_ID, "The Crimson Cipher", clock)?;
    project.description = "A sci-fi thriller set in neo-kyoto.".to_string();
    project.is_published = true;
    project.chapters.push(chapter);

    Ok(vec![project])
}

pub fn seed_assets(clock: &dyn Clock) -> ModelResult<Vec<Asset>> {
    let kael = Asset::with_id(SEED_ASSET_ID, "Kael", AssetType::Character, clock)?
        .with_description("A grizzled cyber-detective haunted by his past.");
    Ok(vec![kael])
}
