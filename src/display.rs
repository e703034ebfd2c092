use crate::analysis::{Analysis, LARGE_PLAYLIST, playlist_line};
use crate::automerge::AutoMergeReport;
use crate::error::Result;
use crate::merge::MergeOutcome;
use crate::model::{DuplicateGroup, Playlist};
use crate::quota::merge_cost;
use cliclack::{log, note};

pub fn playlists(playlists: &[Playlist]) -> Result<()> {
    let lines = playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| format!("{:2}. {}", i + 1, playlist_line(playlist)))
        .collect::<Vec<_>>()
        .join("\n");

    note(
        format!("📜 Your playlists ({})", playlists.len()),
        if lines.is_empty() { "No playlists" } else { lines.as_str() },
    )?;
    Ok(())
}

pub fn duplicates(groups: &[DuplicateGroup]) -> Result<()> {
    if groups.is_empty() {
        log::success("No duplicate playlists found!")?;
        return Ok(());
    }

    log::info(format!(
        "🔍 Found {} groups of potential duplicates:",
        groups.len()
    ))?;
    for (i, group) in groups.iter().enumerate() {
        let members = group
            .playlists
            .iter()
            .map(|p| format!("  - {} ({} videos)", p.title, p.item_count))
            .collect::<Vec<_>>()
            .join("\n");
        note(format!("Group {}", i + 1), members)?;
    }
    Ok(())
}

pub fn analysis(analysis: &Analysis) -> Result<()> {
    let summary = format!(
        "📁 Total playlists: {}\n\
         🎬 Total videos: {}\n\
         📈 Large playlists (>{LARGE_PLAYLIST} videos): {}\n\
         ⚠️  Full playlists: {}\n\
         📭 Empty playlists: {}\n\
         🔍 Duplicate groups: {}\n\
         🎯 Videos in duplicates: {}",
        analysis.total_playlists,
        analysis.total_videos,
        analysis.large.len(),
        analysis.full.len(),
        analysis.empty.len(),
        analysis.duplicate_groups,
        analysis.videos_in_duplicates,
    );
    note("📊 Playlist analysis", summary)?;

    if !analysis.empty.is_empty() {
        let empty = analysis
            .empty
            .iter()
            .map(|p| format!("  • {}", p.title))
            .collect::<Vec<_>>()
            .join("\n");
        note("🗑️  Empty playlists (can be safely deleted)", empty)?;
    }

    if analysis.duplicate_groups == 0 {
        log::success("No duplicates found - your playlists are well organized!")?;
    }
    Ok(())
}

pub fn merge_outcome(target: &Playlist, outcome: &MergeOutcome) -> Result<()> {
    if outcome.truncated {
        log::warning(format!(
            "'{}' would exceed the item limit; only the first {} new videos were added",
            target.title, outcome.planned
        ))?;
    }
    for (video_id, reason) in &outcome.failed {
        log::warning(format!("Failed to add {video_id}: {reason}"))?;
    }
    log::success(format!(
        "Merged {} videos into '{}'",
        outcome.inserted, target.title
    ))?;
    Ok(())
}

pub fn auto_merge_report(report: &AutoMergeReport, dry_run: bool) -> Result<()> {
    if dry_run {
        note(
            "🔍 Dry run",
            format!(
                "Would merge {} groups\n\
                 Would add {} videos\n\
                 Would delete {} playlists\n\
                 Estimated quota cost: {} units",
                report.merged_groups,
                report.planned_videos,
                report.planned_deletions,
                merge_cost(report.planned_videos, report.planned_deletions),
            ),
        )?;
    } else {
        log::success(format!("Merged {} groups", report.merged_groups))?;
        log::info(format!("🗑️  Deleted {} playlists", report.deleted_playlists))?;
    }

    if !report.errors.is_empty() {
        log::error(format!(
            "{} errors occurred:\n{}",
            report.errors.len(),
            report
                .errors
                .iter()
                .map(|e| format!("  - {e}"))
                .collect::<Vec<_>>()
                .join("\n")
        ))?;
    }
    Ok(())
}
