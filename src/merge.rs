use crate::error::{Error, Result};
use crate::model::{DuplicateGroup, Playlist};
use crate::service::PlaylistService;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum number of videos a playlist may hold.
pub const ITEM_CAP: usize = 5000;

/// Videos to insert into a merge target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Video IDs in the order they were first seen across the sources
    pub to_insert: Vec<String>,
    /// Whether candidates were dropped to stay within the item cap
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Pause between two consecutive inserts
    pub insert_delay: Duration,
    /// Plan the merge without inserting anything
    pub dry_run: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            insert_delay: Duration::from_millis(100),
            dry_run: false,
        }
    }
}

/// What happened when a plan was executed.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub planned: usize,
    pub inserted: usize,
    pub truncated: bool,
    /// Videos whose insert failed, with the reason
    pub failed: Vec<(String, String)>,
}

/// Split a group into its merge target and the sources merged into it.
///
/// The playlist with the most items is the target; on a tie the first one wins.
pub fn select_target(group: &DuplicateGroup) -> Option<(&Playlist, Vec<&Playlist>)> {
    let (target_index, _) = group
        .playlists
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u32)>, (index, playlist)| match best {
            Some((_, count)) if count >= playlist.item_count => best,
            _ => Some((index, playlist.item_count)),
        })?;

    let sources = group
        .playlists
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != target_index)
        .map(|(_, playlist)| playlist)
        .collect();

    Some((&group.playlists[target_index], sources))
}

/// Compute which source videos to add to a target.
///
/// `existing` lists the target's current video IDs, one per item. A video
/// present in several sources is inserted once, and never when the target
/// already holds it. Candidates beyond `capacity` are dropped.
pub fn plan_merge(
    target_title: &str,
    sources: &[Vec<String>],
    existing: &[String],
    capacity: usize,
) -> Result<MergePlan> {
    if existing.len() >= capacity {
        return Err(Error::CapacityExceeded {
            title: target_title.to_string(),
            count: existing.len(),
            cap: capacity,
        });
    }

    let present: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut to_insert: Vec<String> = sources
        .iter()
        .flatten()
        .filter(|video| !present.contains(video.as_str()) && seen.insert(video.as_str()))
        .cloned()
        .collect();

    let room = capacity - existing.len();
    let truncated = to_insert.len() > room;
    to_insert.truncate(room);

    Ok(MergePlan {
        to_insert,
        truncated,
    })
}

/// Merge the videos of `sources` into `target`.
///
/// Fails only when the playlists cannot be read or the target is full. A
/// failed insert is recorded in the outcome and the remaining inserts still
/// run. Sources are left untouched.
pub async fn merge_into(
    service: &dyn PlaylistService,
    sources: &[&Playlist],
    target: &Playlist,
    options: &MergeOptions,
) -> Result<MergeOutcome> {
    let mut source_videos: Vec<Vec<String>> = Vec::with_capacity(sources.len());
    for source in sources {
        let items = service.list_playlist_items(&source.id).await?;
        debug!(playlist = %source.id, items = items.len(), "fetched source items");
        source_videos.push(items.into_iter().map(|item| item.video_id).collect());
    }

    let existing: Vec<String> = service
        .list_playlist_items(&target.id)
        .await?
        .into_iter()
        .map(|item| item.video_id)
        .collect();

    let plan = plan_merge(&target.title, &source_videos, &existing, ITEM_CAP)?;
    if plan.truncated {
        warn!(
            target = %target.title,
            kept = plan.to_insert.len(),
            cap = ITEM_CAP,
            "merge would exceed the item cap, extra videos are dropped"
        );
    }

    let mut outcome = MergeOutcome {
        planned: plan.to_insert.len(),
        truncated: plan.truncated,
        ..Default::default()
    };

    if options.dry_run {
        return Ok(outcome);
    }

    for (index, video_id) in plan.to_insert.iter().enumerate() {
        if index > 0 && !options.insert_delay.is_zero() {
            tokio::time::sleep(options.insert_delay).await;
        }

        match service.insert_item(&target.id, video_id).await {
            Ok(()) => outcome.inserted += 1,
            Err(e) => {
                warn!(video = %video_id, target = %target.id, error = %e, "failed to add video");
                outcome.failed.push((video_id.clone(), e.to_string()));
            }
        }
    }

    info!(
        target = %target.title,
        inserted = outcome.inserted,
        failed = outcome.failed.len(),
        "merge finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fake::FakeService;

    fn group(counts: &[u32]) -> DuplicateGroup {
        DuplicateGroup {
            key: "k".to_string(),
            playlists: counts
                .iter()
                .enumerate()
                .map(|(i, count)| Playlist::new(format!("p{i}"), format!("K {i}"), *count))
                .collect(),
        }
    }

    fn videos(prefix: &str, range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| format!("{prefix}{i}")).collect()
    }

    fn no_delay() -> MergeOptions {
        MergeOptions {
            insert_delay: Duration::ZERO,
            dry_run: false,
        }
    }

    #[test]
    fn test_select_target_picks_largest() {
        let g = group(&[10, 50, 20]);
        let (target, sources) = select_target(&g).unwrap();
        assert_eq!(target.id, "p1");
        let source_ids: Vec<_> = sources.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(source_ids, vec!["p0", "p2"]);
    }

    #[test]
    fn test_select_target_tie_goes_to_first() {
        let g = group(&[50, 50, 10]);
        let (target, sources) = select_target(&g).unwrap();
        assert_eq!(target.id, "p0");
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_select_target_empty_group() {
        let g = group(&[]);
        assert!(select_target(&g).is_none());
    }

    #[test]
    fn test_plan_skips_videos_already_in_target() {
        let sources = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["c".to_string(), "d".to_string(), "a".to_string()],
        ];
        let existing = vec!["b".to_string(), "x".to_string()];

        let plan = plan_merge("T", &sources, &existing, ITEM_CAP).unwrap();
        assert_eq!(plan.to_insert, vec!["a", "c", "d"]);
        assert!(!plan.truncated);
        assert!(plan.to_insert.iter().all(|v| !existing.contains(v)));
    }

    #[test]
    fn test_plan_truncates_at_capacity() {
        let existing = videos("old", 0..4990);
        let sources = vec![videos("new", 0..20)];

        let plan = plan_merge("T", &sources, &existing, 5000).unwrap();
        assert_eq!(plan.to_insert.len(), 10);
        assert_eq!(plan.to_insert, videos("new", 0..10));
        assert!(plan.truncated);
    }

    #[test]
    fn test_plan_exactly_filling_capacity_is_not_truncated() {
        let existing = videos("old", 0..4990);
        let sources = vec![videos("new", 0..10)];

        let plan = plan_merge("T", &sources, &existing, 5000).unwrap();
        assert_eq!(plan.to_insert.len(), 10);
        assert!(!plan.truncated);
    }

    #[test]
    fn test_plan_full_target_is_rejected() {
        let existing = videos("old", 0..5000);
        let sources = vec![videos("new", 0..3)];

        let err = plan_merge("Full", &sources, &existing, 5000).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded { count: 5000, cap: 5000, .. }
        ));
    }

    #[tokio::test]
    async fn test_merge_into_inserts_missing_videos() {
        let service = FakeService::new()
            .with_playlist("t", "Road Trip Music", &["a", "b"])
            .with_playlist("s1", "Road Trip", &["b", "c", "d"])
            .with_playlist("s2", "road trip!", &["d", "e"]);
        let playlists = service.list_playlists().await.unwrap();
        let sources = vec![&playlists[1], &playlists[2]];

        let outcome = merge_into(&service, &sources, &playlists[0], &no_delay())
            .await
            .unwrap();

        assert_eq!(outcome.planned, 3);
        assert_eq!(outcome.inserted, 3);
        assert!(outcome.failed.is_empty());
        assert_eq!(service.videos("t"), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(service.videos("s1"), vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_merge_into_isolates_insert_failures() {
        let mut service = FakeService::new()
            .with_playlist("t", "Chill", &[])
            .with_playlist("s", "Chill Mix", &["a", "b", "c"]);
        service.fail_inserts.insert("b".to_string());
        let playlists = service.list_playlists().await.unwrap();

        let outcome = merge_into(&service, &[&playlists[1]], &playlists[0], &no_delay())
            .await
            .unwrap();

        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, "b");
        assert_eq!(service.videos("t"), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_merge_into_dry_run_inserts_nothing() {
        let service = FakeService::new()
            .with_playlist("t", "Chill", &["a"])
            .with_playlist("s", "Chill Mix", &["a", "b"]);
        let playlists = service.list_playlists().await.unwrap();
        let options = MergeOptions {
            dry_run: true,
            ..no_delay()
        };

        let outcome = merge_into(&service, &[&playlists[1]], &playlists[0], &options)
            .await
            .unwrap();

        assert_eq!(outcome.planned, 1);
        assert_eq!(outcome.inserted, 0);
        assert!(!service.calls().iter().any(|c| c.starts_with("insert")));
    }

    #[tokio::test]
    async fn test_merge_into_fails_when_source_unreadable() {
        let mut service = FakeService::new()
            .with_playlist("t", "Chill", &[])
            .with_playlist("s", "Chill Mix", &["a"]);
        service.fail_listings.insert("s".to_string());
        let playlists = service.list_playlists().await.unwrap();

        let result = merge_into(&service, &[&playlists[1]], &playlists[0], &no_delay()).await;
        assert!(result.is_err());
        assert!(!service.calls().iter().any(|c| c.starts_with("insert")));
    }
}
