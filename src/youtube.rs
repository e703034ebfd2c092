use crate::config;
use crate::error::{Error, Result};
use crate::model::{Page, Playlist, PlaylistItem};
use crate::service::PlaylistService;
use async_trait::async_trait;
use google_youtube3::{
    YouTube,
    api::{
        Playlist as ApiPlaylist, PlaylistItem as ApiPlaylistItem, PlaylistItemSnippet,
        PlaylistSnippet, ResourceId,
    },
    hyper_rustls, hyper_util, yup_oauth2,
};
use tracing::debug;

const SCOPES: &[&str] = &["https://www.googleapis.com/auth/youtube"];
const PAGE_SIZE: u32 = 50;

pub struct YouTubeClient {
    hub: YouTube<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>,
}

fn parts() -> Vec<String> {
    vec!["snippet".to_string(), "contentDetails".to_string()]
}

fn video_resource(video_id: &str) -> ResourceId {
    ResourceId {
        kind: Some("youtube#video".to_string()),
        video_id: Some(video_id.to_string()),
        ..Default::default()
    }
}

impl YouTubeClient {
    pub async fn new(oauth_json_path: &str) -> Result<Self> {
        // Read OAuth2 credentials from the provided JSON file
        let secret = yup_oauth2::read_application_secret(oauth_json_path).await?;

        // The token cache sits next to the configuration file
        let cache_dir = config::config_dir()?;
        std::fs::create_dir_all(&cache_dir)?;
        let token_cache_path = cache_dir.join("token_cache.json");

        let auth = yup_oauth2::InstalledFlowAuthenticator::builder(
            secret,
            yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(token_cache_path)
        .build()
        .await?;

        // Authenticate upfront so the browser flow does not interrupt a merge
        let _ = auth.token(SCOPES).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();

        let hub = YouTube::new(
            hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
                .build(connector),
            auth,
        );

        Ok(Self { hub })
    }
}

fn to_playlist(playlist: ApiPlaylist) -> Option<Playlist> {
    let id = playlist.id?;
    let title = playlist
        .snippet
        .and_then(|snippet| snippet.title)
        .unwrap_or_default();
    let item_count = playlist
        .content_details
        .and_then(|details| details.item_count)
        .unwrap_or_default();

    Some(Playlist::new(id, title, item_count))
}

fn to_item(item: ApiPlaylistItem) -> Option<PlaylistItem> {
    let item_id = item.id?;
    let video_id = item.content_details?.video_id?;
    let snippet = item.snippet.unwrap_or_default();

    Some(PlaylistItem {
        item_id,
        video_id,
        title: snippet.title.unwrap_or_default(),
        position: snippet.position.unwrap_or_default(),
    })
}

#[async_trait(?Send)]
impl PlaylistService for YouTubeClient {
    async fn list_playlist_page(&self, page_token: Option<&str>) -> Result<Page<Playlist>> {
        let mut request = self
            .hub
            .playlists()
            .list(&parts())
            .mine(true)
            .max_results(PAGE_SIZE);

        if let Some(token) = page_token {
            request = request.page_token(token);
        }

        let (_, response) = request.doit().await?;
        let items: Vec<Playlist> = response
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(to_playlist)
            .collect();
        debug!(count = items.len(), "fetched playlist page");

        Ok(Page {
            items,
            next_page_token: response.next_page_token,
        })
    }

    async fn list_item_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>> {
        let mut request = self
            .hub
            .playlist_items()
            .list(&parts())
            .playlist_id(playlist_id)
            .max_results(PAGE_SIZE);

        if let Some(token) = page_token {
            request = request.page_token(token);
        }

        let (_, response) = request.doit().await?;
        let items: Vec<PlaylistItem> = response
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(to_item)
            .collect();
        debug!(playlist = %playlist_id, count = items.len(), "fetched item page");

        Ok(Page {
            items,
            next_page_token: response.next_page_token,
        })
    }

    async fn insert_item(&self, playlist_id: &str, video_id: &str) -> Result<()> {
        let playlist_item = ApiPlaylistItem {
            snippet: Some(PlaylistItemSnippet {
                playlist_id: Some(playlist_id.to_string()),
                resource_id: Some(video_resource(video_id)),
                ..Default::default()
            }),
            ..Default::default()
        };

        self.hub
            .playlist_items()
            .insert(playlist_item)
            .add_part("snippet")
            .doit()
            .await?;
        debug!(playlist = %playlist_id, video = %video_id, "inserted video");

        Ok(())
    }

    async fn delete_item(&self, item_id: &str) -> Result<()> {
        self.hub.playlist_items().delete(item_id).doit().await?;
        debug!(item = %item_id, "deleted playlist item");

        Ok(())
    }

    async fn update_item_position(
        &self,
        item_id: &str,
        playlist_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<()> {
        let playlist_item = ApiPlaylistItem {
            id: Some(item_id.to_string()),
            snippet: Some(PlaylistItemSnippet {
                playlist_id: Some(playlist_id.to_string()),
                resource_id: Some(video_resource(video_id)),
                position: Some(position),
                ..Default::default()
            }),
            ..Default::default()
        };

        self.hub
            .playlist_items()
            .update(playlist_item)
            .add_part("snippet")
            .doit()
            .await?;
        debug!(item = %item_id, position, "moved playlist item");

        Ok(())
    }

    async fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        self.hub.playlists().delete(playlist_id).doit().await?;

        Ok(())
    }

    async fn update_playlist_title(&self, playlist_id: &str, title: &str) -> Result<()> {
        let playlist = ApiPlaylist {
            id: Some(playlist_id.to_string()),
            snippet: Some(PlaylistSnippet {
                title: Some(title.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        self.hub
            .playlists()
            .update(playlist)
            .add_part("snippet")
            .doit()
            .await?;
        debug!(playlist = %playlist_id, title = %title, "renamed playlist");

        Ok(())
    }

    async fn check_access(&self) -> Result<()> {
        let (_, response) = self
            .hub
            .channels()
            .list(&vec!["snippet".to_string()])
            .mine(true)
            .doit()
            .await?;

        if response.items.unwrap_or_default().is_empty() {
            return Err(Error::Service(
                "the authenticated account has no channel".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use google_youtube3::api::{PlaylistContentDetails, PlaylistItemContentDetails};

    #[test]
    fn test_to_playlist() {
        let api = ApiPlaylist {
            id: Some("PL1".to_string()),
            snippet: Some(PlaylistSnippet {
                title: Some("Road Trip".to_string()),
                ..Default::default()
            }),
            content_details: Some(PlaylistContentDetails {
                item_count: Some(42),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert_eq!(to_playlist(api), Some(Playlist::new("PL1", "Road Trip", 42)));
        assert_eq!(to_playlist(ApiPlaylist::default()), None);
    }

    #[test]
    fn test_to_item_requires_video_id() {
        let api = ApiPlaylistItem {
            id: Some("item".to_string()),
            snippet: Some(PlaylistItemSnippet {
                title: Some("Song".to_string()),
                position: Some(3),
                ..Default::default()
            }),
            content_details: Some(PlaylistItemContentDetails {
                video_id: Some("vid".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let item = to_item(api.clone()).unwrap();
        assert_eq!(item.video_id, "vid");
        assert_eq!(item.position, 3);

        let without_video = ApiPlaylistItem {
            content_details: None,
            ..api
        };
        assert!(to_item(without_video).is_none());
    }
}
