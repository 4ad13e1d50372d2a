//! Collection browsing commands.

use std::path::Path;

use snowdex::AppError;
use snowdex_core::{CollectorRank, EntryId, ImageData, ProfileId, STAT_MAX, SnowmanEntry};

use super::open_store;

const BAR_WIDTH: usize = 20;

/// List a profile's entries, most recent first.
#[allow(clippy::print_stdout)]
pub fn list(profile_id: &ProfileId) -> Result<(), AppError> {
    let entries = open_store()?.load_collection(profile_id);
    let rank = CollectorRank::for_count(entries.len());

    println!("{} snowmen collected ({rank})", entries.len());
    if let Some(next) = rank.next_threshold() {
        println!("{} more to the next rank", next.saturating_sub(entries.len()));
    }

    for entry in &entries {
        println!(
            "{}  {}  {:<24} [{}] {}{}",
            entry.captured_at.format("%Y-%m-%d %H:%M"),
            entry.id,
            entry.name(),
            entry.rarity().localized_label(),
            entry.analysis.kind,
            if entry.has_sticker() { "  *sticker" } else { "" }
        );
    }
    Ok(())
}

/// Where `show` writes the entry's images.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exports<'a> {
    /// Sticker, or the photo when the entry has no sticker.
    pub sticker: Option<&'a Path>,
    /// Original photo.
    pub photo: Option<&'a Path>,
}

impl<'a> Exports<'a> {
    /// Each requested path paired with the image it receives.
    fn plan<'e>(self, entry: &'e SnowmanEntry) -> Vec<(&'a Path, &'e ImageData)> {
        self.sticker
            .map(|path| (path, entry.display_image()))
            .into_iter()
            .chain(self.photo.map(|path| (path, &entry.source_image)))
            .collect()
    }
}

/// Show one entry and write any requested images.
#[allow(clippy::print_stdout)]
pub async fn show(
    profile_id: &ProfileId,
    entry_id: &EntryId,
    exports: Exports<'_>,
) -> Result<(), AppError> {
    let entry = open_store()?
        .load_collection(profile_id)
        .into_iter()
        .find(|entry| &entry.id == entry_id)
        .ok_or_else(|| AppError::NotFound(format!("entry {entry_id}")))?;

    print_entry(&entry);

    let plan = exports.plan(&entry);
    if !plan.is_empty() {
        println!();
    }
    for (path, image) in plan {
        tokio::fs::write(path, image.as_bytes())
            .await
            .map_err(snowdex_core::ImageError::from)?;
        println!(
            "Wrote {} image ({} bytes) to {}",
            image.mime_type(),
            image.len(),
            path.display()
        );
    }
    Ok(())
}

/// Print an entry as a dex card.
#[allow(clippy::print_stdout)]
pub fn print_entry(entry: &SnowmanEntry) {
    let analysis = &entry.analysis;

    println!("{}  [{}]", analysis.name, entry.rarity().localized_label());
    println!("Type: {}   Rarity: {}", analysis.kind, entry.rarity());
    println!("Captured: {}", entry.captured_at.to_rfc3339());
    println!("Id: {}", entry.id);
    println!();
    println!("{}", analysis.description);
    println!();
    for (kind, value) in entry.stats().iter() {
        println!("  {:<13} {:>3} {}", kind.label(), value, bar(value));
    }
    println!("  {:<13} {:>3}", "Total", entry.stats().total());
    println!();
    println!("Fun fact: {}", analysis.fun_fact);
    if !entry.has_sticker() {
        println!("(no sticker; showing photo)");
    }
}

fn bar(value: u8) -> String {
    let filled = usize::from(value) * BAR_WIDTH / usize::from(STAT_MAX);
    format!(
        "{}{}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH.saturating_sub(filled))
    )
}
