//! Tool surface - named operations with JSON schemas, routed to the engine

mod catalog;
mod definition;
mod handlers;
mod plan;
mod router;

pub use catalog::{ARCHITECTURE, BRAINSTORM, PRD, REFINE, ToolCatalog, VALIDATE, tool_catalog};
pub use definition::Tool;
pub use handlers::{
    ArchitectureInput, BrainstormInput, PrdInput, RefineInput, Stage, ToolOutput, ValidateInput, format_score_result,
    format_scores, next_steps,
};
pub use plan::{DEFAULT_STACK, build_plan};
pub use router::{LocalToolRouter, ToolRouter};
