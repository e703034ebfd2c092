use crate::merge::ITEM_CAP;
use crate::model::{DuplicateGroup, Playlist};

/// Playlists above this many videos are reported as large.
pub const LARGE_PLAYLIST: u32 = 1000;

/// Library statistics computed from playlist metadata alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis<'a> {
    pub total_playlists: usize,
    pub total_videos: u64,
    pub large: Vec<&'a Playlist>,
    pub full: Vec<&'a Playlist>,
    pub empty: Vec<&'a Playlist>,
    pub duplicate_groups: usize,
    pub videos_in_duplicates: u64,
}

impl<'a> Analysis<'a> {
    pub fn of(playlists: &'a [Playlist], duplicates: &[DuplicateGroup]) -> Self {
        Self {
            total_playlists: playlists.len(),
            total_videos: playlists.iter().map(|p| u64::from(p.item_count)).sum(),
            large: playlists
                .iter()
                .filter(|p| p.item_count > LARGE_PLAYLIST)
                .collect(),
            full: playlists.iter().filter(|p| is_full(p)).collect(),
            empty: playlists.iter().filter(|p| p.item_count == 0).collect(),
            duplicate_groups: duplicates.len(),
            videos_in_duplicates: duplicates.iter().map(DuplicateGroup::total_items).sum(),
        }
    }
}

pub fn is_full(playlist: &Playlist) -> bool {
    playlist.item_count as usize >= ITEM_CAP
}

/// One display line for a playlist, flagging the ones at the item cap.
pub fn playlist_line(playlist: &Playlist) -> String {
    let status = if is_full(playlist) { "⚠️  FULL" } else { "✅ OK" };
    format!(
        "{} ({} videos) {}",
        playlist.title, playlist.item_count, status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::find_duplicate_groups;

    #[test]
    fn test_analysis_counts() {
        let playlists = vec![
            Playlist::new("a", "Road Trip Music", 5),
            Playlist::new("b", "Road Trip", 3),
            Playlist::new("c", "Archive", 5000),
            Playlist::new("d", "Big", 1001),
            Playlist::new("e", "Nothing", 0),
            Playlist::new("f", "Watch Later", 100),
        ];
        let duplicates = find_duplicate_groups(&playlists);

        let analysis = Analysis::of(&playlists, &duplicates);
        assert_eq!(analysis.total_playlists, 6);
        assert_eq!(analysis.total_videos, 6109);
        assert_eq!(analysis.large.len(), 2);
        assert_eq!(analysis.full.len(), 1);
        assert_eq!(analysis.full[0].id, "c");
        assert_eq!(analysis.empty.len(), 1);
        assert_eq!(analysis.duplicate_groups, 1);
        assert_eq!(analysis.videos_in_duplicates, 8);
    }

    #[test]
    fn test_playlist_line() {
        assert_eq!(
            playlist_line(&Playlist::new("a", "Jazz", 12)),
            "Jazz (12 videos) ✅ OK"
        );
        assert!(playlist_line(&Playlist::new("b", "Archive", 5000)).ends_with("FULL"));
    }
}
