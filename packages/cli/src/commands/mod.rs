pub mod add;
pub mod ask;
pub mod edit;
pub mod init;
pub mod media;
pub mod publish;
pub mod read;
pub mod tree;
pub mod write;

pub use add::{add, AddArgs};
pub use ask::{ask, AskArgs};
pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use media::{analyze, image, speak, AnalyzeArgs, ImageArgs, SpeakArgs};
pub use publish::{publish, set, PublishArgs, SetArgs};
pub use read::{read, ReadArgs};
pub use tree::{tree, TreeArgs};
pub use write::{write, WriteArgs};

use crate::config::Config;
use anyhow::Result;
use colored::Colorize;
use folio_ai::GeminiClient;
use folio_common::SystemClock;
use folio_editor::{DocumentStore, EditSession, NoticeLevel};
use folio_storage::JsonFileStore;
use std::sync::Arc;

/// Open the library in `cwd` for editing
pub(crate) fn open_session(cwd: &str) -> Result<(Config, EditSession<JsonFileStore>)> {
    let config = Config::load(cwd)?;
    let data_dir = config.get_data_dir(cwd);
    tracing::debug!(data_dir = %data_dir.display(), "Opening library");
    let backing = JsonFileStore::new(data_dir);
    let store = DocumentStore::open(backing, Arc::new(SystemClock))?;
    let session = EditSession::new(store, config.autosave.clone());
    Ok((config, session))
}

pub(crate) fn ai_client(config: &Config) -> Result<GeminiClient> {
    let client = GeminiClient::from_env(config.ai.clone())?;
    tracing::debug!(api_key_env = %config.ai.api_key_env, "AI client ready");
    Ok(client)
}

/// Print and clear the session's pending notices
pub(crate) fn print_notices(session: &mut EditSession<JsonFileStore>) {
    for notice in session.drain_notices() {
        match notice.level {
            NoticeLevel::Success => println!("  {} {}", "✓".green(), notice.message),
            NoticeLevel::Warning => println!("  {} {}", "⚠️".yellow(), notice.message),
            NoticeLevel::Error => eprintln!("  {} {}", "✗".red(), notice.message),
        }
    }
}
