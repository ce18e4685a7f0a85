use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use idearalph::domain::{Dimensions, DopeLevel, IdeaIteration, RalphLoopResult};
use idearalph::engine::RalphEngine;
use idearalph::llm::ModelGateway;
use idearalph::runner::{LoopConfig, LoopRunner};
use idearalph::storage::{IdeaStore, JsonlStorage, open_idea_store};
use idearalph::tools::{self, LocalToolRouter, ToolRouter};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("idearalph")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("idearalph.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

struct App {
    config: Config,
    engine: Arc<RalphEngine>,
    verbose: bool,
}

impl App {
    fn new(config: Config, verbose: bool) -> Result<Self> {
        let gateway = Arc::new(ModelGateway::new(config.gateway_settings()));
        let engine = Arc::new(RalphEngine::new(gateway).context("Failed to build prompt templates")?);
        Ok(Self {
            config,
            engine,
            verbose,
        })
    }

    fn store(&self) -> Result<IdeaStore<JsonlStorage>> {
        let dir = &self.config.storage.dir;
        open_idea_store(dir).context(format!("Failed to open idea store at {}", dir.display()))
    }

    fn router(&self) -> LocalToolRouter {
        LocalToolRouter::new(self.engine.clone())
    }

    async fn call_tool(&self, name: &str, args: serde_json::Value) -> Result<()> {
        let output = self
            .router()
            .call(name, args)
            .await
            .context(format!("{} failed", name))?;
        println!("{}", output.text);
        if self.verbose {
            println!("{}", serde_json::to_string_pretty(&output.structured)?.dimmed());
        }
        Ok(())
    }
}

fn dope_colored(level: DopeLevel) -> ColoredString {
    let text = format!("{} ({})", level, level.description());
    match level.value() {
        0..=1 => text.red(),
        2..=3 => text.yellow(),
        _ => text.green(),
    }
}

fn print_iteration(iteration: &IdeaIteration) {
    println!(
        "{} {}  dope {}",
        "Pass".cyan(),
        iteration.iteration_number,
        dope_colored(iteration.dope_level)
    );
    if let Some(changes) = &iteration.changes_made {
        println!("  {} {}", "changes:".dimmed(), changes);
    }
    println!("  {}", iteration.idea_content);
}

fn print_loop_result(result: &RalphLoopResult, verbose: bool) {
    let status = result.status_message();
    let title = if result.success {
        status.title.green().bold()
    } else {
        status.title.yellow().bold()
    };
    println!("{}", title);
    println!("{}", status.message);
    println!("{} \"{}\"\n", "Ralph says:".cyan(), status.quote);

    println!("{} {}", "Idea:".bold(), result.idea.name);
    println!("{}\n", result.idea.current_text());

    if let Some(scores) = &result.idea.pmf_scores {
        println!("{} {:.1}/10", "PMF:".bold(), scores.aggregate());
        println!("{}\n", tools::format_scores(scores));
    }

    if verbose {
        for iteration in &result.iterations {
            print_iteration(iteration);
        }
    }
    println!("{} {}", "Id:".dimmed(), result.idea.id);
}

async fn run_application(cli: &Cli, app: &App) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Loop {
            prompt,
            chaos,
            max_iterations,
            threshold,
            user,
            save,
        } => {
            let defaults = app.config.loop_config();
            let loop_config = LoopConfig {
                max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
                dope_threshold: threshold.unwrap_or(defaults.dope_threshold),
                chaos_level: chaos.unwrap_or(defaults.chaos_level),
                user_id: user.clone(),
            };
            let runner = LoopRunner::with_config(app.engine.clone(), app.config.runner_config());

            println!("{}", "Ralph is thinking...".cyan());
            let result = runner
                .run(&loop_config, prompt.as_deref())
                .await
                .context("Ralph Loop failed")?;
            print_loop_result(&result, app.verbose);

            if *save {
                app.store()?.save_result(&result).context("Failed to save idea")?;
                println!("{} {}", "Saved:".green(), result.idea.id);
            }
            Ok(())
        }
        Commands::Generate { prompt, chaos } => {
            let draft = app
                .engine
                .generate_idea(*chaos, prompt.as_deref())
                .await
                .context("Generate failed")?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }
        Commands::Refine {
            idea,
            level,
            iteration,
            max_iterations,
            feedback,
            chaos,
        } => {
            let draft = app
                .engine
                .refine_idea(
                    idea,
                    DopeLevel::new(*level),
                    *iteration,
                    *max_iterations,
                    feedback.as_deref(),
                    *chaos,
                )
                .await
                .context("Refine failed")?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }
        Commands::Evaluate { idea } => {
            let evaluation = app.engine.evaluate_idea(idea).await.context("Evaluate failed")?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
            Ok(())
        }
        Commands::Brainstorm { topic, constraints } => {
            app.call_tool(tools::BRAINSTORM, json!({ "topic": topic, "constraints": constraints }))
                .await
        }
        Commands::Validate { idea } => app.call_tool(tools::VALIDATE, json!({ "idea": idea })).await,
        Commands::Improve {
            idea,
            mode,
            target,
            max_iterations,
        } => {
            app.call_tool(
                tools::REFINE,
                json!({ "idea": idea, "mode": mode, "targetScore": target, "maxIterations": max_iterations }),
            )
            .await
        }
        Commands::Prd {
            idea,
            level,
            architecture,
        } => {
            app.call_tool(
                tools::PRD,
                json!({ "idea": idea, "level": level, "includeArchitecture": architecture }),
            )
            .await
        }
        Commands::Plan { idea, tech } => {
            app.call_tool(tools::ARCHITECTURE, json!({ "idea": idea, "techPreferences": tech }))
                .await
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&tools::tool_catalog())?);
            Ok(())
        }
        Commands::List { user } => {
            let ideas = app.store()?.list_ideas(user.as_deref())?;
            if ideas.is_empty() {
                println!("{}", "No saved ideas".dimmed());
            }
            for idea in ideas {
                println!(
                    "{}  {}  {}  {}",
                    idea.id.dimmed(),
                    dope_colored(idea.dope_level),
                    idea.status,
                    idea.name.bold()
                );
            }
            Ok(())
        }
        Commands::Show { id } => {
            let store = app.store()?;
            let idea = store.get_idea(id)?.ok_or_else(|| eyre!("No idea with id {}", id))?;
            println!("{} [{}]", idea.name.bold(), idea.status);
            println!("{} {}", "Dope level:".cyan(), dope_colored(idea.dope_level));
            if let Some(quote) = &idea.ralph_quote {
                println!("{} \"{}\"", "Ralph says:".cyan(), quote);
            }
            println!("\n{}\n", idea.current_text());
            for iteration in store.iterations_for(id)? {
                print_iteration(&iteration);
            }
            Ok(())
        }
        Commands::Delete { id } => {
            let removed = app.store()?.delete_idea(id).context(format!("Failed to delete {}", id))?;
            println!("{} {} ({} iterations)", "Deleted:".red(), id, removed);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    let app = App::new(config, cli.is_verbose())?;
    run_application(&cli, &app).await.context("Application failed")?;

    Ok(())
}
