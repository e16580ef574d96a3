use std::time::Duration;

use serde_json::Value;

use crate::analysis::tokenizer::{Tokenizer, TokenizerConfig};
use crate::core::error::Result;

/// Sorting options for database creation.
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub enabled: bool,
    pub unsortable_properties: Vec<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            enabled: true,
            unsortable_properties: Vec::new(),
        }
    }
}

pub type BeforeInsertHook = Box<dyn Fn(&Value) -> Result<()> + Send + Sync>;
pub type AfterInsertHook = Box<dyn Fn(&str, &Value) -> Result<()> + Send + Sync>;
pub type BeforeRemoveHook = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;
pub type AfterRemoveHook = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;
pub type BeforeUpdateHook = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;
pub type AfterUpdateHook = Box<dyn Fn(&str, &Value) -> Result<()> + Send + Sync>;
pub type BeforeInsertMultipleHook = Box<dyn Fn(&[Value]) -> Result<()> + Send + Sync>;
pub type AfterInsertMultipleHook = Box<dyn Fn(&[String], &[Value]) -> Result<()> + Send + Sync>;
pub type BeforeRemoveMultipleHook = Box<dyn Fn(&[String]) -> Result<()> + Send + Sync>;
pub type AfterRemoveMultipleHook = Box<dyn Fn(&[String]) -> Result<()> + Send + Sync>;
pub type BeforeUpdateMultipleHook = Box<dyn Fn(&[String]) -> Result<()> + Send + Sync>;
pub type AfterUpdateMultipleHook = Box<dyn Fn(&[String], &[Value]) -> Result<()> + Send + Sync>;

/// Lifecycle hooks invoked around writes. A failing `before_*` hook aborts
/// the operation before any state changes.
#[derive(Default)]
pub struct Hooks {
    pub before_insert: Vec<BeforeInsertHook>,
    pub after_insert: Vec<AfterInsertHook>,
    pub before_remove: Vec<BeforeRemoveHook>,
    pub after_remove: Vec<AfterRemoveHook>,
    pub before_update: Vec<BeforeUpdateHook>,
    pub after_update: Vec<AfterUpdateHook>,
    pub before_insert_multiple: Vec<BeforeInsertMultipleHook>,
    pub after_insert_multiple: Vec<AfterInsertMultipleHook>,
    pub before_remove_multiple: Vec<BeforeRemoveMultipleHook>,
    pub after_remove_multiple: Vec<AfterRemoveMultipleHook>,
    pub before_update_multiple: Vec<BeforeUpdateMultipleHook>,
    pub after_update_multiple: Vec<AfterUpdateMultipleHook>,
}

/// Tokenizer override: either a configuration for the default pipeline or a
/// caller-built instance.
pub enum TokenizerComponent {
    Config(TokenizerConfig),
    Instance(Box<dyn Tokenizer>),
}

pub type GetDocumentIdFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;
pub type FormatElapsedFn = Box<dyn Fn(Duration) -> String + Send + Sync>;

/// Swappable collaborators. Anything left `None` uses the built-in
/// implementation.
#[derive(Default)]
pub struct Components {
    pub tokenizer: Option<TokenizerComponent>,
    /// Resolves a document's external id; the default reads a string `id`
    /// field and falls back to a generated v4 UUID.
    pub get_document_id: Option<GetDocumentIdFn>,
    pub format_elapsed_time: Option<FormatElapsedFn>,
    pub hooks: Hooks,
}

/// Creation arguments for [`crate::core::database::Database`].
pub struct DatabaseConfig {
    /// JSON-style schema definition; nested objects flatten to dotted paths.
    pub schema: Value,
    /// Language name from the closed supported set. Mutually exclusive with
    /// a custom tokenizer instance.
    pub language: Option<String>,
    pub sort: SortConfig,
    pub components: Components,
    /// Identifier of this database instance; generated when absent.
    pub id: Option<String>,
}

impl DatabaseConfig {
    pub fn new(schema: Value) -> Self {
        DatabaseConfig {
            schema,
            language: None,
            sort: SortConfig::default(),
            components: Components::default(),
            id: None,
        }
    }
}
