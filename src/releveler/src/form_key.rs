//! Plugin and record identifiers.
//!
//! A [`ModKey`] names one plugin in the load order (`Skyrim.esm`), and a
//! [`FormKey`] identifies a record by its local ID within the plugin that
//! first defined it (`01BCC0:Skyrim.esm`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Largest local form ID (the top byte is the load order index in-game)
const MAX_LOCAL_ID: u32 = 0x00FF_FFFF;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormKeyError {
    #[error("Invalid mod key '{0}': expected <name>.esm, .esp or .esl")]
    InvalidModKey(String),

    #[error("Invalid form key '{0}': expected <hex id>:<mod key>")]
    InvalidFormKey(String),

    #[error("Form ID out of range in '{0}' (max 0xFFFFFF)")]
    IdOutOfRange(String),
}

/// Plugin file type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModType {
    Master,
    Plugin,
    Light,
}

impl ModType {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Master => "esm",
            Self::Plugin => "esp",
            Self::Light => "esl",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "esm" => Some(Self::Master),
            "esp" => Some(Self::Plugin),
            "esl" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Plugin identifier. Names compare case-insensitively, like the game's file lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModKey {
    name: String,
    mod_type: ModType,
}

impl ModKey {
    pub fn new(name: impl Into<String>, mod_type: ModType) -> Self {
        Self {
            name: name.into(),
            mod_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mod_type(&self) -> ModType {
        self.mod_type
    }

    /// File name as it appears in the data folder
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.mod_type.extension())
    }
}

impl PartialEq for ModKey {
    fn eq(&self, other: &Self) -> bool {
        self.mod_type == other.mod_type && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for ModKey {}

impl Hash for ModKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
        self.mod_type.hash(state);
    }
}

impl fmt::Display for ModKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.mod_type.extension())
    }
}

impl FromStr for ModKey {
    type Err = FormKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, ext) = s
            .trim()
            .rsplit_once('.')
            .ok_or_else(|| FormKeyError::InvalidModKey(s.to_string()))?;

        if name.is_empty() {
            return Err(FormKeyError::InvalidModKey(s.to_string()));
        }

        let mod_type =
            ModType::from_extension(ext).ok_or_else(|| FormKeyError::InvalidModKey(s.to_string()))?;

        Ok(Self::new(name, mod_type))
    }
}

impl TryFrom<String> for ModKey {
    type Error = FormKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModKey> for String {
    fn from(key: ModKey) -> Self {
        key.to_string()
    }
}

/// Record identifier: local ID plus the plugin that defined it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormKey {
    id: u32,
    mod_key: ModKey,
}

impl FormKey {
    pub fn new(id: u32, mod_key: ModKey) -> Result<Self, FormKeyError> {
        if id > MAX_LOCAL_ID {
            return Err(FormKeyError::IdOutOfRange(format!("{:X}:{}", id, mod_key)));
        }
        Ok(Self { id, mod_key })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Plugin that originally defined this record
    pub fn mod_key(&self) -> &ModKey {
        &self.mod_key
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}:{}", self.id, self.mod_key)
    }
}

impl FromStr for FormKey {
    type Err = FormKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id_str, mod_str) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| FormKeyError::InvalidFormKey(s.to_string()))?;

        let id = u32::from_str_radix(id_str, 16)
            .map_err(|_| FormKeyError::InvalidFormKey(s.to_string()))?;
        if id > MAX_LOCAL_ID {
            return Err(FormKeyError::IdOutOfRange(s.to_string()));
        }

        Ok(Self {
            id,
            mod_key: mod_str.parse()?,
        })
    }
}

impl TryFrom<String> for FormKey {
    type Error = FormKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormKey> for String {
    fn from(key: FormKey) -> Self {
        key.to_string()
    }
}
