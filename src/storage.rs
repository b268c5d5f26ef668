use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::app_dirs::AppDirs;
use crate::category::Category;
use crate::error::{Result, SplitError};

/// Durable home of the category list.
pub trait CategoryGateway {
    fn load(&self) -> Result<Vec<Category>>;
    fn save(&self, categories: &[Category]) -> Result<()>;
}

/// Categories as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::categories_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CategoryGateway for JsonFileGateway {
    fn load(&self) -> Result<Vec<Category>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no categories file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(SplitError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| SplitError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, categories: &[Category]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SplitError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = serde_json::to_vec_pretty(categories).map_err(SplitError::Encode)?;
        fs::write(&self.path, data).map_err(|source| SplitError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Gateway kept in memory. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    saved: Arc<Mutex<Vec<Category>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryGateway {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            saved: Arc::new(Mutex::new(categories)),
            saves: Arc::default(),
        }
    }

    pub fn snapshot(&self) -> Vec<Category> {
        self.saved.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or_default()
    }
}

impl CategoryGateway for MemoryGateway {
    fn load(&self) -> Result<Vec<Category>> {
        Ok(self.snapshot())
    }

    fn save(&self, categories: &[Category]) -> Result<()> {
        if let Ok(mut saved) = self.saved.lock() {
            *saved = categories.to_vec();
        }
        if let Ok(mut n) = self.saves.lock() {
            *n += 1;
        }
        Ok(())
    }
}

/// Owns the category list and writes it back through a gateway.
pub struct CategoryStore {
    categories: Vec<Category>,
    gateway: Box<dyn CategoryGateway>,
}

impl std::fmt::Debug for CategoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryStore")
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

impl CategoryStore {
    pub fn open(gateway: impl CategoryGateway + 'static) -> Result<Self> {
        let categories = gateway.load()?;
        info!(count = categories.len(), "loaded categories");
        Ok(Self {
            categories,
            gateway: Box::new(gateway),
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Mutable access for reconciliation; call [`persist`](Self::persist) after.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Category> {
        self.categories.get_mut(index)
    }

    /// Index of the first category whose title matches, ignoring case.
    pub fn find(&self, title: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|c| c.title.eq_ignore_ascii_case(title.trim()))
    }

    pub fn add(&mut self, category: Category) -> Result<usize> {
        category.validate()?;
        self.categories.push(category);
        self.persist()?;
        Ok(self.categories.len() - 1)
    }

    pub fn update(&mut self, index: usize, category: Category) -> Result<()> {
        category.validate()?;
        let slot = self
            .categories
            .get_mut(index)
            .ok_or_else(|| SplitError::CategoryNotFound(format!("#{}", index + 1)))?;
        *slot = category;
        self.persist()
    }

    pub fn remove(&mut self, index: usize) -> Result<Category> {
        if index >= self.categories.len() {
            return Err(SplitError::CategoryNotFound(format!("#{}", index + 1)));
        }
        let removed = self.categories.remove(index);
        self.persist()?;
        Ok(removed)
    }

    pub fn persist(&self) -> Result<()> {
        self.gateway.save(&self.categories)?;
        debug!(count = self.categories.len(), "saved categories");
        Ok(())
    }
}
