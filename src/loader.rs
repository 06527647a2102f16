use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::Result;

use crate::models::Poem;
use crate::settings::Settings;

/// Somewhere poem files can be read from by name.
pub trait PoemSource {
    /// Human readable location of a resource, for log messages
    fn location(&self, name: &str) -> String;

    fn fetch(&self, name: &str) -> Result<String>;
}

/// Poems served over HTTP at `<base>/poems/<file>`.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let base = base.trim_end_matches('/').to_string();
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("flipbook");
        if base.starts_with("http://127.0.0.1") || base.starts_with("http://localhost") {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self { client, base })
    }

    /// URL of a poem file, with the file name percent-encoded.
    pub fn resource_url(&self, name: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&format!("{}/poems/", self.base))?;
        url.path_segments_mut()
            .map_err(|_| eyre::eyre!("Cannot build poem URL from base '{}'", self.base))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

impl PoemSource for HttpSource {
    fn location(&self, name: &str) -> String {
        self.resource_url(name)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}/poems/{}", self.base, name))
    }

    fn fetch(&self, name: &str) -> Result<String> {
        let url = self.resource_url(name)?;
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

/// Poems stored as files in a local directory.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every `.txt` file in the directory, sorted by name.
    pub fn discover(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".txt"))
            .collect();
        names.sort();
        Ok(names)
    }
}

impl PoemSource for DirSource {
    fn location(&self, name: &str) -> String {
        self.dir.join(name).display().to_string()
    }

    /// Reads the file as UTF-8, dropping a leading byte-order mark.
    fn fetch(&self, name: &str) -> Result<String> {
        let text = fs::read_to_string(self.dir.join(name))?;
        match text.strip_prefix('\u{feff}') {
            Some(rest) => Ok(rest.to_string()),
            None => Ok(text),
        }
    }
}

pub fn title_from_filename(name: &str) -> String {
    name.strip_suffix(".txt").unwrap_or(name).to_string()
}

/// Fetch every named poem in order. Resources that fail or are empty are
/// skipped with a warning; this never fails as a whole.
pub fn load_poems(source: &dyn PoemSource, files: &[String]) -> Vec<Poem> {
    let mut poems = Vec::new();
    log::info!("Loading {} poem file(s)", files.len());

    for name in files {
        log::debug!("Attempting to load: {}", source.location(name));
        let text = match source.fetch(name) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Failed to load {}: {}", name, err);
                continue;
            }
        };

        let content = text.trim();
        if content.is_empty() {
            log::warn!("Poem {} has no content", name);
            continue;
        }

        let title = title_from_filename(name);
        log::debug!("Loaded poem '{}' ({} characters)", title, content.len());
        poems.push(Poem {
            title,
            content: content.to_string(),
        });
    }

    if poems.is_empty() {
        log::error!("No poems were loaded from {} file(s)", files.len());
    } else {
        log::info!("Total poems loaded: {}", poems.len());
    }
    poems
}

/// Pick the poem source and file list from settings.
pub fn source_from_settings(settings: &Settings) -> Result<(Box<dyn PoemSource>, Vec<String>)> {
    if let Some(base) = settings.base_url.as_deref() {
        let timeout = Duration::from_secs(settings.request_timeout_secs.max(1));
        let source = HttpSource::new(base, timeout)?;
        return Ok((Box::new(source), settings.poem_files.clone()));
    }

    let source = DirSource::new(&settings.poems_dir);
    let files = if settings.poem_files.is_empty() {
        source.discover().unwrap_or_else(|err| {
            log::warn!(
                "Could not list poems in {}: {}",
                source.dir().display(),
                err
            );
            Vec::new()
        })
    } else {
        settings.poem_files.clone()
    };
    Ok((Box::new(source), files))
}
