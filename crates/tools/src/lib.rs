//! Built-in tool implementations for BRX.
//!
//! The built-in set is closed: image generation, text generation, code
//! generation and web research. Community tools admitted through the
//! submission intake are wrapped in [`CommunityTool`] and registered
//! alongside them at runtime.
//!
//! None of the tools perform I/O; outputs are deterministic stand-ins that
//! carry the same shape a real backend would.

pub mod code_generation;
pub mod community;
pub mod image_generation;
pub mod text_generation;
pub mod web_research;

use brx_core::tool::ToolRegistry;

pub use code_generation::CodeGenerationTool;
pub use community::CommunityTool;
pub use image_generation::ImageGenerationTool;
pub use text_generation::TextGenerationTool;
pub use web_research::WebResearchTool;

/// Names of the built-in tools, in planner priority order.
pub const BUILTIN_TOOLS: [&str; 4] = [
    image_generation::NAME,
    code_generation::NAME,
    text_generation::NAME,
    web_research::NAME,
];

/// Create a default tool registry with all built-in tools.
pub fn default_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    register_builtins(&registry);
    registry
}

/// Register the built-in tools into an existing registry.
pub fn register_builtins(registry: &ToolRegistry) {
    registry.register(Box::new(ImageGenerationTool));
    registry.register(Box::new(TextGenerationTool));
    registry.register(Box::new(CodeGenerationTool));
    registry.register(Box::new(WebResearchTool));
}

#[cfg(test)]
mod tests {
    use super::*;
    use brx_core::tool::ToolOrigin;

    #[test]
    fn default_registry_has_all_builtins() {
        let registry = default_registry();
        for name in BUILTIN_TOOLS {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.count_by_origin(ToolOrigin::BuiltIn), 4);
    }

    #[test]
    fn builtins_report_base_skill_as_confidence() {
        let registry = default_registry();
        for name in BUILTIN_TOOLS {
            let output = registry.execute(name, "teste").unwrap();
            assert_eq!(output.confidence, 0.7);
        }
    }
}
