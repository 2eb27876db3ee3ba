//! Module loading for native extensions
//!
//! This module handles:
//! - The preload table of statically linked entry points
//! - The loaded-module cache
//! - Searching the native path (`cpath`) for extension libraries
//! - Resolving the module-open symbol and calling it
//!
//! # Resolution
//!
//! `require(name)` tries, in order:
//! 1. The loaded-module cache
//! 2. The preload table
//! 3. Every template of the native path, with `?` replaced by the module name
//!    (dots turned into directory separators). Without a configured path the
//!    platform default is searched.
//!
//! The entry point is called like any native function, with the module name
//! and the place it was found as arguments. Its first result is cached and
//! returned; a module that returns nothing is recorded as `true`.
//!
//! # Circular Dependencies
//!
//! Modules currently being opened are tracked, and requiring one of them
//! again fails with the full chain instead of recursing.

use super::errors::LoadError;
use super::value::Value;
use super::State;
use crate::bridge::CFunction;
use libloading::Library;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Prefix of every module-open entry point.
pub const OPEN_PREFIX: &str = "luaopen_";

#[cfg(windows)]
pub const DEFAULT_CPATH: &str = ".\\?.dll;.\\lib?.dll";

#[cfg(not(windows))]
pub const DEFAULT_CPATH: &str = "./?.so;./lib?.so;/usr/local/lib/satell/?.so";

/// Name of the entry point for module `name`.
///
/// Everything up to and including the first `-` is ignored, so different
/// versions of a module can share one entry point; dots become underscores.
pub fn open_symbol(name: &str) -> String {
    let base = name.split_once('-').map_or(name, |(_, rest)| rest);
    format!("{}{}", OPEN_PREFIX, base.replace('.', "_"))
}

/// Expand a configured native path: `;;` stands for the default path.
pub fn expand_cpath(configured: &str) -> String {
    if !configured.contains(";;") {
        return configured.to_string();
    }
    let expanded = configured.replacen(";;", &format!(";{};", DEFAULT_CPATH), 1);
    expanded.trim_matches(';').to_string()
}

/// Search `path` for the file of module `name`.
///
/// Returns the first existing file and every candidate that was tried.
pub fn search_path(name: &str, path: &str) -> (Option<PathBuf>, Vec<PathBuf>) {
    let file_name = name.replace('.', &MAIN_SEPARATOR.to_string());
    let mut tried = Vec::new();

    for template in path.split(';').filter(|t| !t.is_empty()) {
        let candidate = PathBuf::from(template.replace('?', &file_name));
        if candidate.is_file() {
            return (Some(candidate), tried);
        }
        log::debug!("no native module at '{}'", candidate.display());
        tried.push(candidate);
    }

    (None, tried)
}

impl State {
    /// Register a statically linked module entry point under `name`.
    pub fn preload(&mut self, name: &str, open: CFunction) {
        self.preload.insert(name.to_string(), open);
    }

    /// Configure the native search path. `;;` expands to [`DEFAULT_CPATH`].
    ///
    /// # Safety
    ///
    /// `require` loads and runs code from any library found on this path.
    /// Every such library must be a Satell extension built against this
    /// version of `satell-core`, and must be trusted.
    pub unsafe fn set_cpath(&mut self, path: &str) {
        self.cpath = Some(expand_cpath(path));
    }

    /// The native search path in effect: the configured one, or
    /// [`DEFAULT_CPATH`] when none was set.
    pub fn cpath(&self) -> &str {
        self.cpath.as_deref().unwrap_or(DEFAULT_CPATH)
    }

    /// The cached value of an already opened module.
    pub fn loaded(&self, name: &str) -> Option<&Value> {
        self.loaded.get(name)
    }

    /// Open module `name` once and return the value its entry point produced.
    pub fn require(&mut self, name: &str) -> Result<Value, LoadError> {
        if let Some(value) = self.loaded.get(name) {
            return Ok(value.clone());
        }

        if self.loading.iter().any(|m| m == name) {
            let mut chain = self.loading.clone();
            chain.push(name.to_string());
            return Err(LoadError::Cycle {
                name: name.to_string(),
                chain,
            });
        }

        let (open, origin) = self.find_opener(name)?;
        log::debug!("opening module '{}' from {}", name, origin);

        self.loading.push(name.to_string());
        let outcome = self.call_native(&open_symbol(name), open, vec![Value::from(name), origin]);
        self.loading.pop();

        let results = outcome.map_err(|source| LoadError::Script {
            name: name.to_string(),
            source,
        })?;

        let value = match results.into_iter().next() {
            None | Some(Value::Nil) => Value::Boolean(true),
            Some(value) => value,
        };

        Ok(self
            .loaded
            .entry(name.to_string())
            .or_insert(value)
            .clone())
    }

    fn find_opener(&mut self, name: &str) -> Result<(CFunction, Value), LoadError> {
        if let Some(open) = self.preload.get(name) {
            return Ok((*open, Value::from(":preload:")));
        }

        let (found, tried) = search_path(name, self.cpath());
        let Some(path) = found else {
            return Err(LoadError::NotFound {
                name: name.to_string(),
                tried,
            });
        };

        let open = self.load_library(&path, &open_symbol(name))?;
        Ok((open, Value::string(path.to_string_lossy().as_bytes())))
    }

    fn load_library(&mut self, path: &Path, symbol: &str) -> Result<CFunction, LoadError> {
        log::debug!("loading native library '{}'", path.display());

        // SAFETY: libraries on the search path were declared trusted by the
        // caller of `set_cpath`.
        let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Library {
            path: path.to_path_buf(),
            source,
        })?;

        // SAFETY: module-open symbols have the `CFunction` signature by convention.
        let open = unsafe { library.get::<CFunction>(symbol.as_bytes()) }
            .map(|sym| *sym)
            .map_err(|_| {
                log::warn!("'{}' has no symbol '{}'", path.display(), symbol);
                LoadError::MissingSymbol {
                    symbol: symbol.to_string(),
                    path: path.to_path_buf(),
                }
            })?;

        // Kept until the state is dropped; `open` points into it.
        self.libraries.push(library);
        Ok(open)
    }
}
