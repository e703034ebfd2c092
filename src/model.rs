use serde::Serialize;

/// A playlist owned by the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub item_count: u32,
}

impl Playlist {
    pub fn new(id: impl Into<String>, title: impl Into<String>, item_count: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            item_count,
        }
    }
}

/// One entry of a playlist: a video reference at a zero-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistItem {
    /// ID of the playlist item itself, used for deletes and position updates
    pub item_id: String,
    pub video_id: String,
    pub title: String,
    pub position: u32,
}

/// Playlists that normalize to the same comparison key.
///
/// Always holds at least two playlists, in the order they were encountered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub key: String,
    pub playlists: Vec<Playlist>,
}

impl DuplicateGroup {
    pub fn total_items(&self) -> u64 {
        self.playlists.iter().map(|p| u64::from(p.item_count)).sum()
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}
