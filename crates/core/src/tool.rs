//! Tool trait: the abstraction over named capabilities.
//!
//! A tool takes the raw request text and returns a result payload plus a
//! confidence value. The set of built-in tools is closed (image, text, code,
//! web research); community tools join at runtime after screening.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;
use crate::error::ToolError;

/// Default skill level of a freshly registered tool.
pub const DEFAULT_SKILL_LEVEL: f64 = 0.7;

/// Skill level a tool must exceed before advanced execution kicks in.
pub const DEFAULT_ADVANCED_CUTOFF: f64 = 0.8;

/// Which execution path produced an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    Basic,
    Advanced,
}

/// Where a registered tool came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOrigin {
    BuiltIn,
    Community,
}

/// The result of a tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable result payload
    pub result: String,

    /// Confidence in [0, 1]
    pub confidence: f64,

    pub mode: ToolMode,

    /// Tool-specific fields (resolution, language, sources_checked, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ToolOutput {
    pub fn new(result: impl Into<String>, confidence: f64, mode: ToolMode) -> Self {
        Self {
            result: result.into(),
            confidence,
            mode,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach a tool-specific field.
    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// The core Tool trait.
///
/// Tools are stateless; the registry owns each tool's skill level and usage
/// counter and passes the current skill level in on every call.
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "image_generation").
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    fn origin(&self) -> ToolOrigin {
        ToolOrigin::BuiltIn
    }

    /// Execute the tool's basic path.
    fn execute_basic(&self, input: &str, skill_level: f64) -> Result<ToolOutput, ToolError>;

    /// Execute the tool's advanced path. Only called once the tool's skill
    /// level exceeds the registry's advanced cutoff.
    fn execute_advanced(&self, input: &str, skill_level: f64) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::new(
            format!("Advanced execution: {input}"),
            skill_level,
            ToolMode::Advanced,
        ))
    }
}

/// Per-tool bookkeeping held by the registry.
struct RegisteredTool {
    tool: Box<dyn Tool>,
    skill_level: Mutex<f64>,
    usage_count: AtomicU64,
}

impl RegisteredTool {
    fn skill_level(&self) -> f64 {
        *self.skill_level.lock().expect("skill level lock poisoned")
    }
}

/// A registry of available tools.
///
/// Shared process-wide behind an `Arc`. Registration, skill updates and
/// usage counting are all safe under concurrent use.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<RegisteredTool>>>,
    base_skill_level: f64,
    advanced_cutoff: f64,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::with_skill_levels(DEFAULT_SKILL_LEVEL, DEFAULT_ADVANCED_CUTOFF)
    }

    /// Create a registry whose tools start at `base_skill_level` and switch
    /// to advanced execution above `advanced_cutoff`.
    pub fn with_skill_levels(base_skill_level: f64, advanced_cutoff: f64) -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            base_skill_level: base_skill_level.clamp(0.0, 1.0),
            advanced_cutoff,
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        let entry = self.entry_for(tool);
        self.tools.write().expect("tool registry lock poisoned").insert(name, entry);
    }

    /// Register a tool unless the name is already taken.
    /// Returns `false` when an existing tool kept the name.
    pub fn register_if_absent(&self, tool: Box<dyn Tool>) -> bool {
        let mut tools = self.tools.write().expect("tool registry lock poisoned");
        if tools.contains_key(tool.name()) {
            return false;
        }
        let name = tool.name().to_string();
        tools.insert(name, self.entry_for(tool));
        true
    }

    fn entry_for(&self, tool: Box<dyn Tool>) -> Arc<RegisteredTool> {
        Arc::new(RegisteredTool {
            tool,
            skill_level: Mutex::new(self.base_skill_level),
            usage_count: AtomicU64::new(0),
        })
    }

    fn lookup(&self, name: &str) -> Result<Arc<RegisteredTool>, ToolError> {
        self.tools
            .read()
            .expect("tool registry lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.read().expect("tool registry lock poisoned").contains_key(name)
    }

    /// Run a tool's basic path against the input.
    pub fn execute(&self, name: &str, input: &str) -> Result<ToolOutput, ToolError> {
        let entry = self.lookup(name)?;
        entry.usage_count.fetch_add(1, Ordering::Relaxed);
        let skill = entry.skill_level();
        debug!(tool = name, skill, "Executing tool");
        entry.tool.execute_basic(input, skill)
    }

    /// Run a tool's advanced path if its skill level allows, basic otherwise.
    pub fn execute_advanced(&self, name: &str, input: &str) -> Result<ToolOutput, ToolError> {
        let entry = self.lookup(name)?;
        entry.usage_count.fetch_add(1, Ordering::Relaxed);
        let skill = entry.skill_level();
        if skill > self.advanced_cutoff {
            debug!(tool = name, skill, "Executing tool (advanced)");
            entry.tool.execute_advanced(input, skill)
        } else {
            debug!(tool = name, skill, "Skill below advanced cutoff, using basic path");
            entry.tool.execute_basic(input, skill)
        }
    }

    /// Raise a tool's skill level by `factor`, saturating at 1.0.
    /// Returns the new skill level.
    pub fn improve_skill(&self, name: &str, factor: f64) -> Result<f64, ToolError> {
        let entry = self.lookup(name)?;
        let mut skill = entry.skill_level.lock().expect("skill level lock poisoned");
        *skill = (*skill + factor).min(1.0);
        Ok(*skill)
    }

    pub fn skill_level(&self, name: &str) -> Option<f64> {
        self.lookup(name).ok().map(|e| e.skill_level())
    }

    pub fn usage_count(&self, name: &str) -> Option<u64> {
        self.lookup(name).ok().map(|e| e.usage_count.load(Ordering::Relaxed))
    }

    pub fn description(&self, name: &str) -> Option<String> {
        self.lookup(name).ok().map(|e| e.tool.description().to_string())
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tools
            .read()
            .expect("tool registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of registered tools with the given origin.
    pub fn count_by_origin(&self, origin: ToolOrigin) -> usize {
        self.tools
            .read()
            .expect("tool registry lock poisoned")
            .values()
            .filter(|e| e.tool.origin() == origin)
            .count()
    }

    pub fn len(&self) -> usize {
        self.tools.read().expect("tool registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
