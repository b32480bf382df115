use async_trait::async_trait;
use url::Url;
use crate::config::Config;
use crate::error::AppError;
use crate::subs_and_channels::make_youtube_url;

pub const VIDEO_KIND: &str = "youtube#video";
const MAX_RESULTS: &str = "10";

#[derive(Debug, Deserialize)]
pub struct YoutubeSearchResult {
    pub items: Vec<YoutubeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeItem {
    pub id: YoutubeResourceId,
    pub snippet: Option<YoutubeSnippet>,
}

/// `kind` tells videos, channels and playlists apart.
#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeResourceId {
    pub kind: String,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeSnippet {
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: YoutubeThumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoutubeThumbnails {
    pub default: Option<YoutubeThumbnailDetail>,
    pub medium: Option<YoutubeThumbnailDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeThumbnailDetail {
    #[serde(rename = "url")]
    pub thmburl: String,
}

/// What the results page shows for one video.
#[derive(Debug, Serialize, PartialEq)]
pub struct VideoResult {
    pub vid: String,
    pub title: String,
    pub description: String,
    pub channelname: String,
    pub thumbnail: String,
    pub url: String,
}

#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Raw items for `query`, in upstream order.
    async fn search(&self, query: &str) -> Result<Vec<YoutubeItem>, AppError>;
}

pub struct YoutubeSearch {
    client: reqwest::Client,
    url: Url,
    key: String,
    search_type: String,
}

impl YoutubeSearch {
    pub fn new(config: &Config) -> Result<YoutubeSearch, failure::Error> {
        Ok(YoutubeSearch {
            client: reqwest::Client::new(),
            url: config.search_url()?,
            key: config.youtube_api_key.clone(),
            search_type: config.search_type.clone(),
        })
    }

    fn build_request(&self, query: &str) -> Result<reqwest::Request, reqwest::Error> {
        self.client
            .get(self.url.clone())
            .query(&[
                ("q", query),
                ("part", "snippet"),
                ("maxResults", MAX_RESULTS),
                ("type", self.search_type.as_str()),
                ("key", self.key.as_str()),
            ])
            .build()
    }
}

#[async_trait]
impl VideoSearch for YoutubeSearch {
    async fn search(&self, query: &str) -> Result<Vec<YoutubeItem>, AppError> {
        let req = self.build_request(query)?;
        debug!("Searching youtube for {:?}", query);
        let res = self.client.execute(req).await?.error_for_status()?;
        let result: YoutubeSearchResult = res.json().await?;
        Ok(result.items)
    }
}

/// Keeps video hits and drops channels and playlists.
pub fn only_videos(items: Vec<YoutubeItem>) -> Vec<VideoResult> {
    items.into_iter()
        .filter(|i| i.id.kind == VIDEO_KIND)
        .filter_map(construct_video_result)
        .collect()
}

fn construct_video_result(i: YoutubeItem) -> Option<VideoResult> {
    let vid = i.id.video_id?;
    let snippet = i.snippet;
    let thumbnail = snippet.as_ref()
        .and_then(|s| s.thumbnails.default.as_ref().or(s.thumbnails.medium.as_ref()))
        .map(|t| t.thmburl.clone())
        .unwrap_or_default();
    let (title, description, channelname) = match snippet {
        Some(s) => (s.title, s.description, s.channel_title),
        None => (vid.clone(), String::new(), String::new()),
    };
    Some(VideoResult {
        url: make_youtube_url(&vid),
        vid,
        title,
        description,
        channelname,
        thumbnail,
    })
}
