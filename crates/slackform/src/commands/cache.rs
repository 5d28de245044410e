//! `cache`: inspect and invalidate list snapshots on disk.

use slackform_core::{FileCache, ListCache};

use crate::cli::{CacheArgs, CacheCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: CacheArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cache = FileCache::new(config::resolve_cache_dir(global)?);

    match args.command {
        CacheCommand::Path => {
            output::print_output(&cache.dir().display().to_string(), global.quiet);
        }
        CacheCommand::Clear { key: Some(key) } => {
            let path = cache.path_for(&key).ok_or_else(|| CliError::Validation {
                field: "key".into(),
                reason: format!("'{key}' must be a plain name without path separators or '..'"),
            })?;
            cache.clear(&key);
            if !global.quiet {
                eprintln!("Cleared {}", path.display());
            }
        }
        CacheCommand::Clear { key: None } => {
            cache.clear_all();
            if !global.quiet {
                eprintln!("Cleared {}", cache.dir().display());
            }
        }
    }
    Ok(())
}
