//! Built-in tool catalog
//!
//! Five operations: brainstorm, validate, refine, prd and architecture.

use serde_json::json;

use super::definition::Tool;

pub const BRAINSTORM: &str = "idearalph_brainstorm";
pub const VALIDATE: &str = "idearalph_validate";
pub const REFINE: &str = "idearalph_refine";
pub const PRD: &str = "idearalph_prd";
pub const ARCHITECTURE: &str = "idearalph_architecture";

fn score_properties() -> serde_json::Value {
    let mut props = serde_json::Map::new();
    for field in <crate::domain::PmfScoresFull as crate::domain::Dimensions>::FIELDS {
        props.insert(
            field.to_string(),
            json!({ "type": "number", "minimum": 0, "maximum": 10 }),
        );
    }
    serde_json::Value::Object(props)
}

/// Catalog of the tools this crate exposes, in a stable order
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// The five built-in tools
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.add(
            Tool::new(
                BRAINSTORM,
                "Generate a startup idea for a topic and score it on 10 PMF dimensions.\n\n\
                 Returns: a scored startup idea with PMF analysis and suggestions for improvement.",
            )
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "The topic or domain to brainstorm startup ideas for"
                    },
                    "constraints": {
                        "type": "string",
                        "description": "Any constraints or preferences (e.g., 'solo founder friendly', 'B2B SaaS')"
                    }
                },
                "required": ["topic"]
            })),
        );

        catalog.add(
            Tool::new(
                VALIDATE,
                "Validate and score an existing startup idea on 10 PMF (Product-Market Fit) dimensions.\n\n\
                 Scores on: problemClarity, marketSize, uniqueness, feasibility, monetization, timing, \
                 virality, defensibility, teamFit, ralphFactor",
            )
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "idea": { "type": "string", "description": "The startup idea to validate and score" }
                },
                "required": ["idea"]
            })),
        );

        catalog.add(
            Tool::new(
                REFINE,
                "Run the Ralph Loop to iteratively refine a startup idea.\n\n\
                 Modes: \"single\" = one round, \"target\" = until the target score is reached, \
                 \"max\" = run all iterations. Each iteration scores, critiques and improves the idea.",
            )
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "idea": { "type": "string", "description": "The startup idea to refine" },
                    "mode": {
                        "type": "string",
                        "enum": ["single", "target", "max"],
                        "default": "target",
                        "description": "Refinement mode"
                    },
                    "targetScore": {
                        "type": "number",
                        "minimum": 1,
                        "maximum": 10,
                        "default": 9.5,
                        "description": "Target average PMF score for 'target' mode"
                    },
                    "maxIterations": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 20,
                        "default": 10,
                        "description": "Maximum refinement iterations"
                    }
                },
                "required": ["idea"]
            })),
        );

        catalog.add(
            Tool::new(
                PRD,
                "Generate a Product Requirements Document for a startup idea.\n\n\
                 Levels: \"napkin\" = quick 1-page sketch, \"science-fair\" = detailed PRD with personas \
                 and user stories, \"genius\" = investor-ready with TAM/SAM/SOM and go-to-market.",
            )
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "idea": { "type": "string", "description": "The startup idea to generate a PRD for" },
                    "level": {
                        "type": "string",
                        "enum": ["napkin", "science-fair", "genius", "quick", "detailed", "comprehensive"],
                        "default": "napkin",
                        "description": "PRD detail level"
                    },
                    "scores": {
                        "type": "object",
                        "description": "Pre-existing PMF scores from a prior validation",
                        "properties": score_properties()
                    },
                    "includeArchitecture": {
                        "type": "boolean",
                        "default": false,
                        "description": "Append an architecture and implementation plan"
                    }
                },
                "required": ["idea"]
            })),
        );

        catalog.add(
            Tool::new(
                ARCHITECTURE,
                "Generate an architecture and implementation plan for a validated startup idea. \
                 Use this after validating or refining an idea to get a concrete build plan.",
            )
            .with_schema(json!({
                "type": "object",
                "properties": {
                    "idea": { "type": "string", "description": "The validated startup idea" },
                    "prd": { "type": "string", "description": "The PRD content, if already generated" },
                    "techPreferences": {
                        "type": "string",
                        "description": "Tech stack preferences (e.g., 'SvelteKit, Supabase')"
                    }
                },
                "required": ["idea"]
            })),
        );

        catalog
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// List all tool names
    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Get all tools
    pub fn all(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Get number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Add a tool, replacing any existing tool with the same name
    pub fn add(&mut self, tool: Tool) {
        self.tools.retain(|t| t.name != tool.name);
        self.tools.push(tool);
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in tool definitions
pub fn tool_catalog() -> Vec<Tool> {
    ToolCatalog::builtin().all().cloned().collect()
}
