use crate::constants::{
    CONFIG_FILE, DEFAULT_MAX_PRICE, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, DISPENSARIES_TABLE,
    HOTELS_TABLE, TOURS_TABLE,
};
use crate::domain::ListingKind;
use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Full project URL, e.g. https://xyzcompany.supabase.co
    pub url: Option<String>,
    /// Used to build the URL when `url` is not set
    pub project_ref: Option<String>,
    pub anon_key: Option<String>,
    pub timeout_seconds: u64,
    pub tables: TableNames,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            project_ref: None,
            anon_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            tables: TableNames::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub tours: String,
    pub dispensaries: String,
    pub hotels: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            tours: TOURS_TABLE.to_string(),
            dispensaries: DISPENSARIES_TABLE.to_string(),
            hotels: HOTELS_TABLE.to_string(),
        }
    }
}

impl TableNames {
    pub fn table_for(&self, kind: ListingKind) -> &str {
        match kind {
            ListingKind::Tour => &self.tours,
            ListingKind::Dispensary => &self.dispensaries,
            ListingKind::Hotel => &self.hotels,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_size: usize,
    pub max_price: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl Config {
    /// Loads `catalog.toml` when it exists, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_FILE).exists() {
            Self::from_path(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `SUPABASE_*` and `CATALOG_*` variables on top of the file values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SUPABASE_URL") {
            self.supabase.url = Some(url);
        }
        if let Some(project_ref) = lookup("SUPABASE_PROJECT_REF") {
            self.supabase.project_ref = Some(project_ref);
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = Some(key);
        }
        if let Some(raw) = lookup("CATALOG_PAGE_SIZE") {
            self.catalog.page_size = raw.trim().parse().map_err(|_| {
                CatalogError::Config(format!("CATALOG_PAGE_SIZE is not a number: {}", raw))
            })?;
        }
        if let Some(raw) = lookup("CATALOG_MAX_PRICE") {
            self.catalog.max_price = raw.trim().parse().map_err(|_| {
                CatalogError::Config(format!("CATALOG_MAX_PRICE is not a number: {}", raw))
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.catalog.page_size == 0 {
            return Err(CatalogError::Config(
                "catalog.page_size must be at least 1".to_string(),
            ));
        }
        if !self.catalog.max_price.is_finite() || self.catalog.max_price < 0.0 {
            return Err(CatalogError::Config(format!(
                "catalog.max_price must be a non-negative number, got {}",
                self.catalog.max_price
            )));
        }
        Ok(())
    }

    /// Resolves the project URL, allowing either a full URL or a project ref.
    pub fn supabase_url(&self) -> Result<String> {
        if let Some(url) = self.supabase.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim_end_matches('/').to_string());
        }
        match self.supabase.project_ref.as_deref() {
            Some(project_ref) if !project_ref.trim().is_empty() => {
                Ok(format!("https://{}.supabase.co", project_ref.trim()))
            }
            _ => Err(CatalogError::Config(
                "set SUPABASE_URL or SUPABASE_PROJECT_REF".to_string(),
            )),
        }
    }

    pub fn supabase_key(&self) -> Result<String> {
        self.supabase
            .anon_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CatalogError::Config("set SUPABASE_ANON_KEY".to_string()))
    }
}
