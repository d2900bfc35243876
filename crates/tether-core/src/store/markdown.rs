use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config;
use crate::error::StoreError;
use crate::model::{CandidateFilter, Status, WorkItem};
use crate::source::WorkItemSource;
use crate::store::frontmatter;

/// Directory created by `tt init` at the project root.
pub const TETHER_DIR: &str = ".tether";

/// The markdown-file-backed item store.
///
/// Snapshot order is deterministic: items are loaded in file-name order, so
/// downstream stable sorts (ranking ties) are reproducible across runs on an
/// unchanged tree.
#[derive(Debug, Clone)]
pub struct MarkdownStore {
    root: PathBuf,
}

impl MarkdownStore {
    /// Wrap a project root without checking for initialization.
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            root: project_root.to_path_buf(),
        }
    }

    /// Wrap a project root, failing when `.tether/` is missing.
    pub fn open(project_root: &Path) -> Result<Self, StoreError> {
        let store = Self::new(project_root);
        if store.is_initialized() {
            Ok(store)
        } else {
            Err(StoreError::NotInitialized)
        }
    }

    /// Scaffold `.tether/items/` and a commented config template.
    ///
    /// Idempotent: returns `false` when the directory already existed.
    pub fn init(project_root: &Path) -> Result<(Self, bool), StoreError> {
        let store = Self::new(project_root);
        let created = !store.is_initialized();

        fs::create_dir_all(store.items_dir())?;

        let config_path = store.tether_dir().join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, config::default_config_toml())?;
        }

        Ok((store, created))
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.items_dir().is_dir()
    }

    fn tether_dir(&self) -> PathBuf {
        self.root.join(TETHER_DIR)
    }

    fn items_dir(&self) -> PathBuf {
        self.tether_dir().join("items")
    }

    fn item_path(&self, id: &str) -> PathBuf {
        self.items_dir().join(format!("{id}.md"))
    }

    /// Build a fresh snapshot of every item in the store.
    ///
    /// Unparsable files are skipped with a warning; a single bad file never
    /// takes down a whole command.
    pub fn load_items(&self) -> Result<Vec<WorkItem>, StoreError> {
        if !self.is_initialized() {
            return Err(StoreError::NotInitialized);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(self.items_dir())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .collect();
        paths.sort();

        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable item file");
                    continue;
                }
            };

            match frontmatter::parse_item(&content, &stem, &path) {
                Ok(item) => items.push(item),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unparsable item file");
                }
            }
        }

        debug!(count = items.len(), "loaded item snapshot");
        Ok(items)
    }

    /// Resolve an id or unique id prefix against the current snapshot.
    pub fn resolve_id(&self, prefix: &str) -> Result<String, StoreError> {
        let items = self.load_items()?;

        if let Some(item) = items.iter().find(|item| item.id == prefix) {
            return Ok(item.id.clone());
        }

        let matches: Vec<String> = items
            .iter()
            .filter(|item| item.id.starts_with(prefix))
            .map(|item| item.id.clone())
            .collect();

        match matches.len() {
            0 => Err(StoreError::ItemNotFound {
                id: prefix.to_string(),
            }),
            1 => Ok(matches.into_iter().next().unwrap_or_default()),
            _ => Err(StoreError::AmbiguousId {
                prefix: prefix.to_string(),
                matches,
            }),
        }
    }

    /// Load a single item by id or unique prefix.
    pub fn read_item(&self, idish: &str) -> Result<WorkItem, StoreError> {
        let id = self.resolve_id(idish)?;
        let items = self.load_items()?;
        items
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(StoreError::ItemNotFound { id })
    }

    /// Returns `true` if an item file exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.item_path(id).exists()
    }

    /// Write a new item file, refusing to overwrite an existing one.
    pub fn write_new(&self, item: &WorkItem) -> Result<PathBuf, StoreError> {
        if !self.is_initialized() {
            return Err(StoreError::NotInitialized);
        }
        if self.contains(&item.id) {
            return Err(StoreError::DuplicateItem {
                id: item.id.clone(),
            });
        }
        self.write_item(item)
    }

    /// Write (or overwrite) an item file.
    pub fn write_item(&self, item: &WorkItem) -> Result<PathBuf, StoreError> {
        if !self.is_initialized() {
            return Err(StoreError::NotInitialized);
        }

        let path = self.item_path(&item.id);
        let content = frontmatter::render_item(item).map_err(|source| StoreError::FrontMatter {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, content)?;
        debug!(path = %path.display(), "wrote item file");
        Ok(path)
    }

    /// Transition an item's status, rewriting its front-matter in place.
    ///
    /// The body and all other fields are preserved; `updated_at` is bumped.
    pub fn update_status(&self, idish: &str, target: Status) -> Result<WorkItem, StoreError> {
        let mut item = self.read_item(idish)?;

        item.status
            .can_transition_to(target)
            .map_err(|err| StoreError::InvalidTransition {
                from: err.from.to_string(),
                to: err.to.to_string(),
            })?;

        item.status = target;
        item.updated_at = Some(chrono::Utc::now());
        self.write_item(&item)?;
        Ok(item)
    }

    /// Allocate a fresh item id from a title: slugified, made unique with a
    /// numeric suffix when taken.
    #[must_use]
    pub fn allocate_id(&self, title: &str) -> String {
        let slug = slugify(title);
        if !self.contains(&slug) {
            return slug;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{slug}-{n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl WorkItemSource for MarkdownStore {
    fn list_candidates(&self, filter: &CandidateFilter) -> anyhow::Result<Vec<WorkItem>> {
        let mut items: Vec<WorkItem> = self
            .load_items()?
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        Ok(items)
    }
}

/// Lowercase, hyphen-separated slug for item file names.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_dash = true;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
        if slug.len() >= 48 {
            break;
        }
    }

    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug
    }
}
