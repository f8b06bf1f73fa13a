#![warn(clippy::pedantic)]

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use planner_domain::{self as domain, ExerciseCatalog, PlanService, classifier};
use planner_storage::{
    config,
    dto::{self, List},
    gateway::Gateway,
    memory::{MemoryCatalog, MemoryIdentity, MemoryPlans},
    rest::{CatalogConfig, REST},
};

mod logger;

const LOCAL_TOKEN: &str = "local";

#[derive(Parser, Debug)]
#[command(name = "planner", version, about = "Weekly workout plan generator")]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace) or filter directives
    #[arg(long, env = "PLANNER_LOG", default_value = "warn", global = true)]
    log_level: String,

    /// Registry configuration, the built-in registry is used if omitted
    #[arg(long, env = "PLANNER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assign a movement pattern tag to every exercise of a catalog
    Tag {
        /// Catalog in JSON format
        catalog: PathBuf,

        /// Write the tagged catalog to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the supported goals and sessions per week
    Splits,

    /// Generate a weekly plan
    Generate {
        /// Catalog in JSON format, untagged exercises are classified on load
        #[arg(long, required_unless_present = "catalog_url", conflicts_with = "catalog_url")]
        catalog: Option<PathBuf>,

        /// Base URL of a catalog service
        #[arg(long)]
        catalog_url: Option<String>,

        /// Request timeout of the catalog service in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        #[arg(long)]
        goal: domain::Goal,

        #[arg(long)]
        sessions: u8,

        /// Equipment context (gym, dumbbells, home, travel)
        #[arg(long, default_value = "gym")]
        equipment: String,

        /// Exercise to leave out, can be repeated
        #[arg(long = "exclude")]
        excluded: Vec<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init(&cli.log_level)?;

    let registry = registry(cli.config.as_deref())?;

    match cli.command {
        Command::Tag { catalog, output } => tag(&catalog, output.as_deref()),
        Command::Splits => {
            print!("{}", splits(&registry));
            Ok(())
        }
        Command::Generate {
            catalog,
            catalog_url,
            timeout,
            goal,
            sessions,
            equipment,
            excluded,
        } => {
            let request = domain::CreatePlan {
                goal,
                sessions_per_week: sessions,
                equipment,
                injuries: excluded.into_iter().map(domain::ExerciseID::from).collect(),
            };
            let plan = match (catalog, catalog_url) {
                (Some(path), _) => generate(read_catalog(&path)?, registry, request).await?,
                (None, Some(url)) => {
                    let config = CatalogConfig {
                        base_url: url,
                        timeout: Duration::from_secs(timeout),
                    };
                    generate(REST::new(&config)?, registry, request).await?
                }
                (None, None) => anyhow::bail!("either --catalog or --catalog-url is required"),
            };
            println!("{}", serde_json::to_string_pretty(&dto::Plan::from(&plan))?);
            Ok(())
        }
    }
}

fn registry(path: Option<&Path>) -> Result<domain::Registry> {
    match path {
        Some(path) => config::load(path)
            .with_context(|| format!("failed to load registry from {}", path.display())),
        None => Ok(domain::Registry::default()),
    }
}

fn read_exercises(path: &Path) -> Result<Vec<domain::Exercise>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let exercises: List<dto::Exercise> = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;
    Ok(Vec::from(exercises)
        .into_iter()
        .map(domain::Exercise::from)
        .collect())
}

fn read_catalog(path: &Path) -> Result<MemoryCatalog> {
    let catalog = MemoryCatalog::new(read_exercises(path)?.into_iter().map(|exercise| {
        if exercise.tags.is_empty() {
            classifier::tag_exercise(exercise)
        } else {
            exercise
        }
    }));
    info!("loaded {} exercises from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn tag(catalog: &Path, output: Option<&Path>) -> Result<()> {
    let (exercises, summary) = classifier::tag_catalog(read_exercises(catalog)?);

    for (tag, count) in &summary.tags {
        info!("{tag}: {count}");
    }
    info!(
        "tagged {} exercises, {} by muscle group, {} compound",
        exercises.len(),
        summary.fallback,
        summary.compound
    );

    let json = serde_json::to_string_pretty(
        &exercises.iter().map(dto::Exercise::from).collect::<Vec<_>>(),
    )?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn splits(registry: &domain::Registry) -> String {
    registry
        .blueprints
        .iter()
        .map(|((goal, sessions_per_week), days)| {
            format!(
                "{goal} {sessions_per_week}: {}\n",
                days.iter()
                    .map(|day| day.name.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
        .collect()
}

async fn generate<C: ExerciseCatalog>(
    catalog: C,
    registry: domain::Registry,
    request: domain::CreatePlan,
) -> Result<domain::GeneratedPlan> {
    let service = domain::Service::new(
        Gateway::new(
            catalog,
            MemoryPlans::default(),
            MemoryIdentity::new([(
                LOCAL_TOKEN,
                domain::User {
                    id: 1.into(),
                    roles: BTreeSet::from([domain::Role::Member]),
                },
            )]),
        ),
        Arc::new(registry),
    );
    let token = domain::Token::new(LOCAL_TOKEN);
    let plan = service.create_plan(&token, request).await?;
    for exercise in service.get_plan_exercises(&token, plan.id).await? {
        info!("selected exercise {} \"{}\"", exercise.id, exercise.name);
    }
    Ok(plan)
}
