use crate::duplicates::is_watch_later;
use crate::error::{Error, Result};
use crate::model::Playlist;
use crate::service::PlaylistService;
use crate::session::Session;
use tracing::{info, warn};

/// Delete a playlist, unless it is Watch Later.
pub async fn delete_playlist(service: &dyn PlaylistService, playlist: &Playlist) -> Result<()> {
    if is_watch_later(&playlist.title) {
        return Err(Error::ProtectedPlaylist(playlist.title.clone()));
    }

    service.delete_playlist(&playlist.id).await?;
    info!(playlist = %playlist.id, title = %playlist.title, "deleted playlist");
    Ok(())
}

/// Rename a playlist remotely, then in the session.
pub async fn rename_playlist(
    service: &dyn PlaylistService,
    session: &mut Session,
    playlist_id: &str,
    new_title: &str,
) -> Result<()> {
    let new_title = new_title.trim();
    if new_title.is_empty() {
        return Err(Error::InvalidSelection("the new title is empty".to_string()));
    }

    service.update_playlist_title(playlist_id, new_title).await?;
    session.rename_playlist(playlist_id, new_title)
}

/// Add a video to `to`, then remove its first occurrence from `from`.
pub async fn move_video(
    service: &dyn PlaylistService,
    video_id: &str,
    from_playlist_id: &str,
    to_playlist_id: &str,
) -> Result<()> {
    service.insert_item(to_playlist_id, video_id).await?;

    let items = service.list_playlist_items(from_playlist_id).await?;
    match items.iter().find(|item| item.video_id == video_id) {
        Some(item) => service.delete_item(&item.item_id).await?,
        None => warn!(video = %video_id, playlist = %from_playlist_id, "video not found in source"),
    }

    Ok(())
}

/// Move videos to new zero-based positions, one move at a time.
///
/// Positions shift after every move, so the playlist is re-read before each.
pub async fn reorder_videos(
    service: &dyn PlaylistService,
    playlist_id: &str,
    moves: &[(String, u32)],
) -> Result<()> {
    for (video_id, position) in moves {
        let items = service.list_playlist_items(playlist_id).await?;
        let Some(item) = items.iter().find(|item| &item.video_id == video_id) else {
            warn!(video = %video_id, playlist = %playlist_id, "video no longer in playlist");
            continue;
        };

        service
            .update_item_position(&item.item_id, playlist_id, video_id, *position)
            .await?;
    }

    Ok(())
}

/// Parse `"<video number> <new position>"`, both one-based.
///
/// Returns the zero-based index of the video and its zero-based target position.
pub fn parse_reorder_command(command: &str, video_count: usize) -> Result<(usize, u32)> {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let [video, position] = parts.as_slice() else {
        return Err(Error::InvalidSelection(
            "enter two numbers: <video number> <new position>".to_string(),
        ));
    };

    let video: usize = video
        .parse()
        .map_err(|_| Error::InvalidSelection(format!("'{video}' is not a number")))?;
    let position: u32 = position
        .parse()
        .map_err(|_| Error::InvalidSelection(format!("'{position}' is not a number")))?;

    if video == 0 || video > video_count || position == 0 {
        return Err(Error::InvalidSelection(
            "invalid video number or position".to_string(),
        ));
    }

    Ok((video - 1, position - 1))
}
