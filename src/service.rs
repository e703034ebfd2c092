use crate::error::Result;
use crate::model::{Page, Playlist, PlaylistItem};
use async_trait::async_trait;

/// Operations the tool needs from the video platform.
///
/// Calls are issued one at a time on a single task, so the futures need not be `Send`.
#[async_trait(?Send)]
pub trait PlaylistService {
    /// Fetch one page of the authenticated user's playlists.
    async fn list_playlist_page(&self, page_token: Option<&str>) -> Result<Page<Playlist>>;

    /// Fetch one page of the items of a playlist.
    async fn list_item_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>>;

    async fn insert_item(&self, playlist_id: &str, video_id: &str) -> Result<()>;

    async fn delete_item(&self, item_id: &str) -> Result<()>;

    async fn update_item_position(
        &self,
        item_id: &str,
        playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<()>;

    async fn delete_playlist(&self, playlist_id: &str) -> Result<()>;

    async fn update_playlist_title(&self, playlist_id: &str, title: &str) -> Result<()>;

    /// Issue the cheapest authenticated call, to find out whether quota is left.
    async fn check_access(&self) -> Result<()>;

    /// Fetch all playlists, following page tokens until the last page.
    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let mut playlists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_playlist_page(page_token.as_deref()).await?;
            playlists.extend(page.items);

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(playlists)
    }

    /// Fetch all items of a playlist, following page tokens until the last page.
    async fn list_playlist_items(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .list_item_page(playlist_id, page_token.as_deref())
                .await?;
            items.extend(page.items);

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(items)
    }
}
