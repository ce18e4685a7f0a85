//! CLI command definitions using clap.
//!
//! Subcommands fall into three groups:
//! - the Ralph Loop and its single steps: loop, generate, refine, evaluate
//! - the tool surface: brainstorm, validate, improve, prd, plan, tools
//! - the idea store: list, show, delete

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// idearalph - startup ideas, iterated until they're dope
#[derive(Parser, Debug)]
#[command(name = "idearalph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an idea and refine it until it's dope or the budget runs out
    Loop {
        /// Topic or seed for the first idea
        #[arg(short, long)]
        prompt: Option<String>,

        /// Chaos level 1-10 (higher = weirder)
        #[arg(long)]
        chaos: Option<u8>,

        /// Total passes including the first generation
        #[arg(short, long)]
        max_iterations: Option<u32>,

        /// Dope level 1-5 that ends the loop early
        #[arg(short, long)]
        threshold: Option<u8>,

        /// Tag the run with a user id
        #[arg(short, long)]
        user: Option<String>,

        /// Persist the result to the idea store
        #[arg(short, long)]
        save: bool,
    },

    /// Generate a single idea
    Generate {
        #[arg(short, long)]
        prompt: Option<String>,

        #[arg(long, default_value_t = 5)]
        chaos: u8,
    },

    /// Run one refinement pass on an idea
    Refine {
        idea: String,

        /// Current dope level 0-5
        #[arg(short, long, default_value_t = 0)]
        level: u8,

        /// 1-based pass number
        #[arg(short, long, default_value_t = 1)]
        iteration: u32,

        #[arg(short, long, default_value_t = 3)]
        max_iterations: u32,

        /// Feedback from the previous pass
        #[arg(short, long)]
        feedback: Option<String>,

        #[arg(long, default_value_t = 5)]
        chaos: u8,
    },

    /// Score an idea on the six-dimension scale with strengths and weaknesses
    Evaluate { idea: String },

    /// Brainstorm and score an idea for a topic
    Brainstorm {
        topic: String,

        #[arg(long)]
        constraints: Option<String>,
    },

    /// Score an idea on ten PMF dimensions
    Validate { idea: String },

    /// Critique, improve and re-score an idea
    Improve {
        idea: String,

        /// single, target or max
        #[arg(short, long, default_value = "target")]
        mode: String,

        #[arg(short, long, default_value_t = 9.5)]
        target: f64,

        #[arg(short = 'n', long, default_value_t = 10)]
        max_iterations: u32,
    },

    /// Write a PRD for an idea
    Prd {
        idea: String,

        /// napkin, science-fair or genius
        #[arg(short, long, default_value = "napkin")]
        level: String,

        /// Append an implementation plan
        #[arg(short, long)]
        architecture: bool,
    },

    /// Print an architecture and implementation plan
    Plan {
        idea: String,

        /// Tech stack preferences
        #[arg(short, long)]
        tech: Option<String>,
    },

    /// Print the tool catalog as JSON
    Tools,

    /// List saved ideas
    List {
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show a saved idea and its iterations
    Show { id: String },

    /// Delete a saved idea and its iterations
    Delete { id: String },
}
