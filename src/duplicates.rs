use crate::model::{DuplicateGroup, Playlist};
use crate::normalize::normalize;
use std::collections::HashMap;

/// Title of the platform-reserved playlist that is never merged or deleted.
pub const WATCH_LATER: &str = "watch later";

pub fn is_watch_later(title: &str) -> bool {
    title.to_lowercase() == WATCH_LATER
}

/// Group playlists whose titles normalize to the same key.
///
/// Watch Later is skipped. Groups come out in the order their key was first
/// seen and keep the encounter order of their members; keys with a single
/// playlist are dropped. Titles made only of stop words share the empty key
/// and are grouped together.
pub fn find_duplicate_groups(playlists: &[Playlist]) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for playlist in playlists {
        if is_watch_later(&playlist.title) {
            continue;
        }

        let key = normalize(&playlist.title);
        match index_by_key.get(&key) {
            Some(&index) => groups[index].playlists.push(playlist.clone()),
            None => {
                index_by_key.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    playlists: vec![playlist.clone()],
                });
            }
        }
    }

    groups.retain(|group| group.playlists.len() > 1);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ids(group: &DuplicateGroup) -> Vec<&str> {
        group.playlists.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_road_trip_scenario() {
        let playlists = vec![
            Playlist::new("a", "Road Trip Music", 5),
            Playlist::new("b", "Road Trip", 3),
            Playlist::new("wl", "Watch Later", 100),
        ];

        let groups = find_duplicate_groups(&playlists);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "road trip");
        assert_eq!(ids(&groups[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_watch_later_never_grouped() {
        let playlists = vec![
            Playlist::new("wl1", "Watch Later", 10),
            Playlist::new("wl2", "WATCH LATER", 20),
            Playlist::new("wl3", "watch later", 30),
            Playlist::new("x", "Watch Later Playlist", 1),
            Playlist::new("y", "watch later videos", 1),
        ];

        let groups = find_duplicate_groups(&playlists);
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["x", "y"]);
        assert!(groups
            .iter()
            .flat_map(|g| &g.playlists)
            .all(|p| !is_watch_later(&p.title)));
    }

    #[test]
    fn test_singletons_are_dropped() {
        let playlists = vec![
            Playlist::new("a", "Jazz", 1),
            Playlist::new("b", "Rock", 1),
            Playlist::new("c", "Rock Songs", 1),
        ];

        let groups = find_duplicate_groups(&playlists);
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["b", "c"]);
    }

    #[test]
    fn test_stop_word_only_titles_group_together() {
        let playlists = vec![
            Playlist::new("a", "Music Playlist", 1),
            Playlist::new("b", "Jazz", 1),
            Playlist::new("c", "Liked Videos", 1),
        ];

        let groups = find_duplicate_groups(&playlists);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "");
        assert_eq!(ids(&groups[0]), vec!["a", "c"]);
    }

    #[test]
    fn test_membership_independent_of_order() {
        let playlists = vec![
            Playlist::new("a", "Chill", 1),
            Playlist::new("b", "Gym Mix", 1),
            Playlist::new("c", "chill songs", 1),
            Playlist::new("d", "Gym", 1),
            Playlist::new("e", "Solo", 1),
        ];
        let mut reversed = playlists.clone();
        reversed.reverse();

        let as_sets = |groups: Vec<DuplicateGroup>| -> BTreeSet<BTreeSet<String>> {
            groups
                .into_iter()
                .map(|g| g.playlists.into_iter().map(|p| p.id).collect())
                .collect()
        };

        let forward = find_duplicate_groups(&playlists);
        assert_eq!(ids(&forward[0]), vec!["a", "c"]);
        assert_eq!(ids(&forward[1]), vec!["b", "d"]);

        let backward = find_duplicate_groups(&reversed);
        assert_eq!(ids(&backward[0]), vec!["d", "b"]);

        assert_eq!(as_sets(forward), as_sets(backward));
    }
}
