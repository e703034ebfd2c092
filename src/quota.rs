use crate::service::PlaylistService;

/// Default daily quota of a YouTube Data API v3 project.
pub const DAILY_QUOTA: u32 = 10_000;

/// Quota units charged per call.
pub const OPERATION_COSTS: [(&str, u32); 6] = [
    ("channels.list", 1),
    ("playlists.list", 1),
    ("playlistItems.list", 1),
    ("playlistItems.insert", 50),
    ("playlists.delete", 50),
    ("playlists.update", 50),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaStatus {
    Available,
    Exceeded,
    Failed(String),
}

/// Probe the API with its cheapest call.
pub async fn check_quota(service: &dyn PlaylistService) -> QuotaStatus {
    match service.check_access().await {
        Ok(()) => QuotaStatus::Available,
        Err(e) if e.is_quota_exceeded() => QuotaStatus::Exceeded,
        Err(e) => QuotaStatus::Failed(e.to_string()),
    }
}

/// Units needed to insert `videos` videos and delete `playlists` playlists.
pub fn merge_cost(videos: usize, playlists: usize) -> u64 {
    (videos as u64 + playlists as u64) * 50
}
