use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use preferences::{AppInfo, prefs_base_dir};
use url::Url;

pub const APP_INFO: AppInfo = AppInfo { name: "tubelog", author: "tubelog" };
pub const PREFS_KEY: &str = "tubelog_prefs";

const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Runtime settings, built once in `main` and handed to whoever needs them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub database: PathBuf,
    pub youtube_api_key: String,
    pub youtube_search_url: String,
    /// Value of the `type` parameter sent upstream. Empty lets every kind through.
    pub search_type: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut database = prefs_base_dir().unwrap_or_else(|| PathBuf::from("."));
        database.push("tubelog");
        database.push("tubelog.db");
        Config {
            bind: DEFAULT_BIND.to_string(),
            database,
            youtube_api_key: String::new(),
            youtube_search_url: DEFAULT_SEARCH_URL.to_string(),
            search_type: String::new(),
        }
    }
}

impl Config {
    /// Defaults, then the stored preferences file, then environment variables.
    pub fn load() -> Result<Config, failure::Error> {
        let path = prefs_path();
        Config::load_from(path.as_deref(), |k| std::env::var(k).ok())
    }

    pub fn load_from<F>(prefs: Option<&Path>, lookup: F) -> Result<Config, failure::Error>
        where F: Fn(&str) -> Option<String>
    {
        let stored = match prefs {
            Some(p) => read_preferences(p)?,
            None => None,
        };
        let config = stored.unwrap_or_default().with_overrides(lookup);
        config.check()?;
        if config.youtube_api_key.is_empty() {
            warn!("YOUTUBE_API_KEY is not set, video searches will be rejected upstream");
        }
        Ok(config)
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Config
        where F: Fn(&str) -> Option<String>
    {
        if let Some(v) = lookup("TUBELOG_BIND") {
            self.bind = v;
        }
        if let Some(v) = lookup("TUBELOG_DATABASE") {
            self.database = PathBuf::from(v);
        }
        if let Some(v) = lookup("YOUTUBE_API_KEY") {
            self.youtube_api_key = v;
        }
        if let Some(v) = lookup("YOUTUBE_SEARCH_URL") {
            self.youtube_search_url = v;
        }
        if let Some(v) = lookup("YOUTUBE_SEARCH_TYPE") {
            self.search_type = v;
        }
        self
    }

    pub fn search_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.youtube_search_url)
    }

    fn check(&self) -> Result<(), failure::Error> {
        self.search_url()
            .map_err(|e| format_err!("invalid YOUTUBE_SEARCH_URL {:?}: {}", self.youtube_search_url, e))?;
        Ok(())
    }
}

/// `<prefs base dir>/tubelog/tubelog_prefs.prefs.json`
pub fn prefs_path() -> Option<PathBuf> {
    prefs_base_dir().map(|mut p| {
        p.push(APP_INFO.name);
        p.push(format!("{}.prefs.json", PREFS_KEY));
        p
    })
}

/// A missing file is not an error, a malformed one is.
fn read_preferences(path: &Path) -> Result<Option<Config>, failure::Error> {
    match File::open(path) {
        Ok(f) => {
            let c = serde_json::from_reader(f)
                .map_err(|e| format_err!("Could not read preferences {:?}: {}", path, e))?;
            info!("Loaded stored preferences from {:?}", path);
            Ok(Some(c))
        }
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No stored preferences at {:?}, using defaults", path);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
