use crate::display;
use crate::duplicates::is_watch_later;
use crate::error::{Error, Result};
use crate::merge::{MergeOptions, merge_into, select_target};
use crate::model::Playlist;
use crate::operations::{self, parse_reorder_command};
use crate::service::PlaylistService;
use crate::session::Session;
use cliclack::{confirm, input, log, outro, select, spinner};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Merge,
    Rename,
    Delete,
    MoveVideo,
    Reorder,
    ShowPlaylists,
    ShowDuplicates,
    Exit,
}

/// Manual mode: let the user run one operation at a time until they exit.
///
/// A failing operation is reported and the menu comes back; only a broken
/// terminal ends the loop early.
pub async fn manual_menu(
    service: &dyn PlaylistService,
    session: &mut Session,
    options: &MergeOptions,
) -> Result<()> {
    loop {
        let action = select("🎮 What would you like to do?")
            .item(Action::Merge, "Merge duplicate playlists", "")
            .item(Action::Rename, "Rename a playlist", "")
            .item(Action::Delete, "Delete a playlist", "")
            .item(Action::MoveVideo, "Move video between playlists", "")
            .item(Action::Reorder, "Reorder videos in a playlist", "")
            .item(Action::ShowPlaylists, "Show all playlists", "")
            .item(Action::ShowDuplicates, "Show duplicates analysis", "")
            .item(Action::Exit, "Exit", "")
            .interact()?;

        let result = match action {
            Action::Merge => merge_group(service, session, options).await,
            Action::Rename => rename(service, session).await,
            Action::Delete => delete(service, session).await,
            Action::MoveVideo => move_video(service, session).await,
            Action::Reorder => reorder(service, session).await,
            Action::ShowPlaylists => display::playlists(&session.playlists),
            Action::ShowDuplicates => display::duplicates(&session.duplicates),
            Action::Exit => break,
        };

        match result {
            Err(Error::Io(e)) => return Err(Error::Io(e)),
            Err(e) => log::error(format!("❌ {e}"))?,
            Ok(()) => {}
        }
    }

    outro("Goodbye! 👋")?;
    Ok(())
}

/// Ask for one playlist, returning its index in `playlists`.
fn pick_playlist(prompt: &str, playlists: &[Playlist], exclude: Option<usize>) -> Result<usize> {
    let choices: Vec<(usize, String, &str)> = playlists
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != exclude)
        .map(|(index, playlist)| (index, playlist.title.clone(), ""))
        .collect();

    if choices.is_empty() {
        return Err(Error::InvalidSelection("there are no playlists to choose from".to_string()));
    }

    Ok(select(prompt).items(&choices).filter_mode().interact()?)
}

async fn merge_group(
    service: &dyn PlaylistService,
    session: &mut Session,
    options: &MergeOptions,
) -> Result<()> {
    if session.duplicates.is_empty() {
        log::info("No duplicates to merge!")?;
        return Ok(());
    }

    let groups: Vec<(usize, String, String)> = session
        .duplicates
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let title = group.playlists[0].title.clone();
            let others = format!("and {} others", group.playlists.len() - 1);
            (index, title, others)
        })
        .collect();
    let group_index = select("Select a group to merge").items(&groups).interact()?;
    let group = session.duplicates[group_index].clone();

    let suggested = select_target(&group)
        .and_then(|(target, _)| group.playlists.iter().position(|p| p.id == target.id))
        .unwrap_or_default();
    let members: Vec<(usize, String, String)> = group
        .playlists
        .iter()
        .enumerate()
        .map(|(index, p)| (index, p.title.clone(), format!("{} videos", p.item_count)))
        .collect();
    let target_index = select("Select target playlist (videos will be merged into this one)")
        .items(&members)
        .initial_value(suggested)
        .interact()?;

    let target = &group.playlists[target_index];
    let sources: Vec<&Playlist> = group
        .playlists
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != target_index)
        .map(|(_, playlist)| playlist)
        .collect();

    let listing = sources
        .iter()
        .map(|source| format!("  - {}", source.title))
        .collect::<Vec<_>>()
        .join("\n");
    log::info(format!("Merging into: {}\nFrom:\n{listing}", target.title))?;

    if !confirm("Proceed with merge?").interact()? {
        return Ok(());
    }

    let sp = spinner();
    sp.start(format!("Merging into '{}'", target.title));
    let outcome = merge_into(service, &sources, target, options).await;
    sp.stop("Merge finished");
    let outcome = outcome?;
    display::merge_outcome(target, &outcome)?;

    if options.dry_run {
        session.remove_group(group_index)?;
        return Ok(());
    }

    let delete_sources = confirm(format!(
        "Delete the {} merged source playlists?",
        sources.len()
    ))
    .initial_value(false)
    .interact()?;

    if !delete_sources {
        session.remove_group(group_index)?;
        return Ok(());
    }

    let mut deleted = HashSet::new();
    for source in sources {
        match operations::delete_playlist(service, source).await {
            Ok(()) => {
                deleted.insert(source.id.clone());
            }
            Err(e) => log::warning(format!("Failed to delete '{}': {e}", source.title))?,
        }
    }
    log::success(format!("Deleted {} playlists", deleted.len()))?;
    session.retain_surviving(&deleted);

    Ok(())
}

async fn rename(service: &dyn PlaylistService, session: &mut Session) -> Result<()> {
    let index = pick_playlist("Select playlist to rename", &session.playlists, None)?;
    let playlist = session.playlists[index].clone();

    let new_title: String = input(format!("Enter new title for '{}'", playlist.title))
        .placeholder(&playlist.title)
        .interact()?;

    operations::rename_playlist(service, session, &playlist.id, &new_title).await?;
    log::success(format!("Renamed playlist to '{}'", new_title.trim()))?;
    Ok(())
}

async fn delete(service: &dyn PlaylistService, session: &mut Session) -> Result<()> {
    log::warning("⚠️  This will permanently delete the playlist!")?;
    let index = pick_playlist("Select playlist to delete", &session.playlists, None)?;
    let playlist = session.playlists[index].clone();

    if is_watch_later(&playlist.title) {
        return Err(Error::ProtectedPlaylist(playlist.title));
    }

    let confirmed = confirm(format!(
        "Are you sure you want to delete '{}'?",
        playlist.title
    ))
    .initial_value(false)
    .interact()?;
    if !confirmed {
        return Ok(());
    }

    operations::delete_playlist(service, &playlist).await?;
    session.remove_playlist(&playlist.id);
    log::success("Playlist deleted!")?;
    Ok(())
}

async fn move_video(service: &dyn PlaylistService, session: &Session) -> Result<()> {
    let source_index = pick_playlist("Select source playlist", &session.playlists, None)?;
    let source = session.playlists[source_index].clone();

    let items = service.list_playlist_items(&source.id).await?;
    if items.is_empty() {
        log::info(format!("'{}' has no videos", source.title))?;
        return Ok(());
    }

    let videos: Vec<(usize, String, &str)> = items
        .iter()
        .enumerate()
        .map(|(index, item)| (index, item.title.clone(), ""))
        .collect();
    let video_index = select(format!("Select a video from '{}' to move", source.title))
        .items(&videos)
        .filter_mode()
        .interact()?;
    let video = &items[video_index];

    let target_index = pick_playlist("Select target playlist", &session.playlists, Some(source_index))?;
    let target = &session.playlists[target_index];

    operations::move_video(service, &video.video_id, &source.id, &target.id).await?;
    log::success(format!("Moved '{}' to '{}'", video.title, target.title))?;
    Ok(())
}

async fn reorder(service: &dyn PlaylistService, session: &Session) -> Result<()> {
    let index = pick_playlist("Select playlist", &session.playlists, None)?;
    let playlist = session.playlists[index].clone();

    let items = service.list_playlist_items(&playlist.id).await?;
    let listing = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{:3}. {}", i + 1, item.title))
        .collect::<Vec<_>>()
        .join("\n");
    log::info(format!("Videos in '{}':\n{listing}", playlist.title))?;

    let mut moves: Vec<(String, u32)> = Vec::new();
    loop {
        let command: String = input("Move a video: '<video number> <new position>', or 'done'")
            .placeholder("3 1")
            .interact()?;
        if command.trim().eq_ignore_ascii_case("done") {
            break;
        }

        match parse_reorder_command(&command, items.len()) {
            Ok((video, position)) => moves.push((items[video].video_id.clone(), position)),
            Err(e) => log::warning(e.to_string())?,
        }
    }

    if moves.is_empty() {
        return Ok(());
    }

    operations::reorder_videos(service, &playlist.id, &moves).await?;
    log::success("Videos reordered successfully!")?;
    Ok(())
}
