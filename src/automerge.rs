use crate::merge::{ITEM_CAP, MergeOptions, merge_into, select_target};
use crate::operations::delete_playlist;
use crate::service::PlaylistService;
use crate::session::Session;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoMergeReport {
    pub merged_groups: usize,
    /// Videos the merges planned to insert
    pub planned_videos: usize,
    /// Source playlists of the merged groups, deleted or due for deletion
    pub planned_deletions: usize,
    pub deleted_playlists: usize,
    pub errors: Vec<String>,
}

/// Merge every duplicate group into its largest playlist and delete the rest.
///
/// Groups are handled in order and independently: a failing group is
/// recorded in the report and the next group still runs, with no rollback of
/// earlier groups. Sources are deleted only after their group merged. The
/// session is rebuilt from the surviving playlists at the end.
pub async fn auto_merge(
    service: &dyn PlaylistService,
    session: &mut Session,
    options: &MergeOptions,
) -> AutoMergeReport {
    let mut report = AutoMergeReport::default();
    let mut deleted: HashSet<String> = HashSet::new();

    for (index, group) in session.duplicates.iter().enumerate() {
        let number = index + 1;
        let Some((target, sources)) = select_target(group) else {
            continue;
        };

        info!(
            group = number,
            target = %target.title,
            items = target.item_count,
            sources = sources.len(),
            "processing duplicate group"
        );

        if target.item_count as usize >= ITEM_CAP {
            warn!(group = number, target = %target.title, "target playlist is full, skipping");
            report.errors.push(format!(
                "Group {number}: Target playlist '{}' is at the {ITEM_CAP} item limit",
                target.title
            ));
            continue;
        }

        match merge_into(service, &sources, target, options).await {
            Ok(outcome) => {
                report.merged_groups += 1;
                report.planned_videos += outcome.planned;
                report.planned_deletions += sources.len();
            }
            Err(e) => {
                warn!(group = number, error = %e, "merge failed");
                report.errors.push(format!("Group {number}: {e}"));
                continue;
            }
        }

        if options.dry_run {
            continue;
        }

        for source in sources {
            match delete_playlist(service, source).await {
                Ok(()) => {
                    report.deleted_playlists += 1;
                    deleted.insert(source.id.clone());
                }
                Err(e) => {
                    warn!(playlist = %source.id, error = %e, "failed to delete source playlist");
                    report
                        .errors
                        .push(format!("Failed to delete '{}': {e}", source.title));
                }
            }
        }
    }

    if !deleted.is_empty() {
        session.retain_surviving(&deleted);
    }

    report
}
