use crate::duplicates::find_duplicate_groups;
use crate::error::{Error, Result};
use crate::model::{DuplicateGroup, Playlist};
use std::collections::HashSet;

/// Everything a run knows about the user's library.
///
/// Handed explicitly to each command and menu handler; nothing is kept
/// once the process exits.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub playlists: Vec<Playlist>,
    pub duplicates: Vec<DuplicateGroup>,
}

impl Session {
    pub fn new(playlists: Vec<Playlist>) -> Self {
        let duplicates = find_duplicate_groups(&playlists);
        Self {
            playlists,
            duplicates,
        }
    }

    /// Recompute the duplicate groups from the current playlists.
    pub fn refresh_duplicates(&mut self) {
        self.duplicates = find_duplicate_groups(&self.playlists);
    }

    /// Replace the playlist list with the playlists not in `deleted`.
    pub fn retain_surviving(&mut self, deleted: &HashSet<String>) {
        let surviving = self
            .playlists
            .iter()
            .filter(|p| !deleted.contains(&p.id))
            .cloned()
            .collect();
        self.playlists = surviving;
        self.refresh_duplicates();
    }

    pub fn remove_playlist(&mut self, id: &str) {
        let deleted = HashSet::from([id.to_string()]);
        self.retain_surviving(&deleted);
    }

    pub fn rename_playlist(&mut self, id: &str, title: &str) -> Result<()> {
        let playlist = self
            .playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::InvalidSelection(format!("unknown playlist {id}")))?;
        playlist.title = title.to_string();
        self.refresh_duplicates();
        Ok(())
    }

    /// Drop a group once it has been handled, without regrouping.
    pub fn remove_group(&mut self, index: usize) -> Result<DuplicateGroup> {
        if index >= self.duplicates.len() {
            return Err(Error::InvalidSelection(format!(
                "group {} does not exist",
                index + 1
            )));
        }
        Ok(self.duplicates.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(vec![
            Playlist::new("a", "Road Trip Music", 5),
            Playlist::new("b", "Road Trip", 3),
            Playlist::new("c", "Jazz", 7),
            Playlist::new("d", "Jazz Collection", 1),
            Playlist::new("wl", "Watch Later", 100),
        ])
    }

    #[test]
    fn test_new_computes_groups() {
        let s = session();
        assert_eq!(s.playlists.len(), 5);
        assert_eq!(s.duplicates.len(), 2);
    }

    #[test]
    fn test_retain_surviving_rebuilds_list() {
        let mut s = session();
        s.retain_surviving(&HashSet::from(["b".to_string(), "d".to_string()]));

        let ids: Vec<_> = s.playlists.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "wl"]);
        assert!(s.duplicates.is_empty());
    }

    #[test]
    fn test_rename_regroups() {
        let mut s = session();
        s.rename_playlist("c", "Blues").unwrap();

        assert_eq!(s.playlists[2].title, "Blues");
        assert_eq!(s.duplicates.len(), 1);
        assert!(s.rename_playlist("missing", "x").is_err());
    }

    #[test]
    fn test_remove_group() {
        let mut s = session();
        let removed = s.remove_group(1).unwrap();
        assert_eq!(removed.key, "jazz");
        assert_eq!(s.duplicates.len(), 1);
        assert!(matches!(s.remove_group(5), Err(Error::InvalidSelection(_))));
    }
}
