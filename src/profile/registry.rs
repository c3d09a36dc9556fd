//! Profile Registry
//!
//! Built-in profiles are embedded in the binary; user directories may add or
//! replace them. Loading priority: built-in < user. The registry is
//! read-only once built.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{DocumentType, Profile};
use crate::config::Config;

/// Extension of profile files looked up in profile directories
pub const PROFILE_EXTENSION: &str = ".profile.toml";

/// Number of leading characters inspected by [`ProfileRegistry::detect`]
const DETECTION_WINDOW: usize = 1000;

/// Embedded profiles, as `(file name, TOML)`
pub const BUILTIN_PROFILES: [(&str, &str); 5] = [
    (
        "geral.profile.toml",
        include_str!("../../resources/profiles/geral.profile.toml"),
    ),
    (
        "ceg.profile.toml",
        include_str!("../../resources/profiles/ceg.profile.toml"),
    ),
    (
        "condel.profile.toml",
        include_str!("../../resources/profiles/condel.profile.toml"),
    ),
    (
        "cnrh.profile.toml",
        include_str!("../../resources/profiles/cnrh.profile.toml"),
    ),
    (
        "coaride.profile.toml",
        include_str!("../../resources/profiles/coaride.profile.toml"),
    ),
];

/// Where a profile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProfileSource {
    BuiltIn = 0,
    User = 1,
}

/// A profile with its source
#[derive(Debug, Clone)]
pub struct LoadedProfile {
    pub profile: Profile,
    pub source: ProfileSource,
    pub source_path: Option<PathBuf>,
}

/// Profiles by document type
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<DocumentType, LoadedProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every embedded profile
    pub fn with_builtin_profiles() -> Self {
        let mut registry = Self::new();
        registry.add_builtin_profiles();
        registry
    }

    /// Embedded profiles plus the directories named in `config`
    ///
    /// Directories are loaded lowest priority first so that earlier entries
    /// in `config.profile_dirs` win.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::with_builtin_profiles();
        for dir in config.profile_dirs.iter().rev() {
            if let Err(e) = registry.load_dir(dir) {
                log::warn!("{:#}", e);
            }
        }
        registry
    }

    fn add_builtin_profiles(&mut self) {
        for (file_name, content) in BUILTIN_PROFILES {
            match Profile::from_toml(content) {
                Ok(profile) => {
                    self.insert(LoadedProfile {
                        profile,
                        source: ProfileSource::BuiltIn,
                        source_path: None,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse embedded profile {}: {:#}. Skipping.",
                        file_name,
                        e
                    );
                }
            }
        }
    }

    /// Add a profile unless one of higher priority is already registered
    pub fn insert(&mut self, loaded: LoadedProfile) -> bool {
        let document_type = loaded.profile.document_type;
        let replace = self
            .profiles
            .get(&document_type)
            .is_none_or(|existing| loaded.source >= existing.source);
        if replace {
            self.profiles.insert(document_type, loaded);
        }
        replace
    }

    /// Load every `*.profile.toml` file in `dir`
    ///
    /// A missing directory is not an error. A file that fails to parse is
    /// logged and skipped. Returns the number of profiles loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read profile directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(PROFILE_EXTENSION))
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match load_profile_file(&path) {
                Ok(profile) => {
                    log::info!(
                        "Loaded profile '{}' from {}",
                        profile.document_type.tag(),
                        path.display()
                    );
                    self.insert(LoadedProfile {
                        profile,
                        source: ProfileSource::User,
                        source_path: Some(path),
                    });
                    loaded += 1;
                }
                Err(e) => log::warn!("{:#}", e),
            }
        }
        Ok(loaded)
    }

    pub fn get(&self, document_type: DocumentType) -> Option<&LoadedProfile> {
        self.profiles.get(&document_type)
    }

    pub fn list(&self) -> impl Iterator<Item = &LoadedProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Identify the document type from the first characters of `text`
    ///
    /// Profiles are tried in [`DocumentType`] order; the first one with a
    /// detection substring present wins.
    pub fn detect(&self, text: &str) -> DocumentType {
        let window: String = text.chars().take(DETECTION_WINDOW).collect();
        let upper = window.to_uppercase();

        self.profiles
            .values()
            .filter(|loaded| loaded.profile.document_type != DocumentType::Unknown)
            .find(|loaded| {
                loaded
                    .profile
                    .detect
                    .iter()
                    .any(|needle| upper.contains(&needle.to_uppercase()))
            })
            .map(|loaded| loaded.profile.document_type)
            .unwrap_or_default()
    }

    /// Base profile used for `Unknown` and for sections a profile omits
    pub fn base(&self) -> Profile {
        self.get(DocumentType::Unknown)
            .map(|loaded| loaded.profile.clone())
            .unwrap_or_else(|| Profile::minimal(DocumentType::Unknown))
    }

    /// Effective profile for `document_type`, with omitted sections taken
    /// from the base profile
    pub fn profile_for(&self, document_type: DocumentType) -> Profile {
        let base = self.base();
        match self.get(document_type) {
            Some(loaded) if document_type != DocumentType::Unknown => {
                loaded.profile.merged_over(&base)
            }
            Some(_) => base,
            None => {
                log::debug!(
                    "No profile for '{}', using base profile",
                    document_type.tag()
                );
                Profile {
                    document_type,
                    ..base
                }
            }
        }
    }
}

fn load_profile_file(path: &Path) -> Result<Profile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file: {}", path.display()))?;
    Profile::from_toml(&content)
        .with_context(|| format!("Failed to load profile file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_all_parse() {
        for (file_name, content) in BUILTIN_PROFILES {
            assert!(
                Profile::from_toml(content).is_ok(),
                "embedded profile {} failed to parse",
                file_name
            );
        }
        let registry = ProfileRegistry::with_builtin_profiles();
        assert_eq!(registry.len(), DocumentType::ALL.len());
    }

    #[test]
    fn test_detect() {
        let registry = ProfileRegistry::with_builtin_profiles();
        assert_eq!(
            registry.detect("MINISTÉRIO\nRESOLUÇÃO CEG/MIDR Nº 3, DE 5 DE MAIO DE 2024"),
            DocumentType::Ceg
        );
        assert_eq!(
            registry.detect("resolução cnrh nº 12, de 3 de março de 2024"),
            DocumentType::Cnrh
        );
        assert_eq!(registry.detect("Texto qualquer"), DocumentType::Unknown);
    }

    #[test]
    fn test_detect_looks_only_at_leading_window() {
        let registry = ProfileRegistry::with_builtin_profiles();
        let text = format!("{}RESOLUÇÃO CEG", "x".repeat(DETECTION_WINDOW));
        assert_eq!(registry.detect(&text), DocumentType::Unknown);
    }

    #[test]
    fn test_user_profile_replaces_builtin() {
        let mut registry = ProfileRegistry::with_builtin_profiles();
        let replaced = registry.insert(LoadedProfile {
            profile: Profile::minimal(DocumentType::Ceg),
            source: ProfileSource::User,
            source_path: None,
        });
        assert!(replaced);
        assert_eq!(
            registry.get(DocumentType::Ceg).unwrap().source,
            ProfileSource::User
        );

        let kept = registry.insert(LoadedProfile {
            profile: Profile::minimal(DocumentType::Ceg),
            source: ProfileSource::BuiltIn,
            source_path: None,
        });
        assert!(!kept);
    }

    #[test]
    fn test_profile_for_falls_back_to_base_sections() {
        let registry = ProfileRegistry::with_builtin_profiles();
        let ceg = registry.profile_for(DocumentType::Ceg);
        assert_eq!(ceg.document_type, DocumentType::Ceg);
        assert!(ceg.ementa.is_some());
        assert!(ceg.closing.is_some());
    }

    #[test]
    fn test_empty_registry_uses_minimal_profile() {
        let registry = ProfileRegistry::new();
        let profile = registry.profile_for(DocumentType::Condel);
        assert_eq!(profile.document_type, DocumentType::Condel);
        assert!(profile.epigraph.is_none());
    }
}
