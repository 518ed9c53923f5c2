mod config;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prioritizer::{comparison, normalize_value, Analysis, AnalysisRequest, Engine, Narrator};
use roadmap_core::{Feature, Framework, Roadmap};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roadmap")]
#[command(about = "Pick a prioritization framework, score features and plan a roadmap", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keyword tables to use instead of the discovered config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a framework for a problem
    Select {
        #[arg(short = 't', long, default_value = "")]
        problem_type: String,

        #[arg(short, long, default_value = "")]
        summary: String,
    },
    /// Score features with a framework
    Score {
        #[arg(short, long, default_value = "RICE")]
        framework: String,

        /// JSON file holding an array of feature strings or records
        #[arg(long)]
        file: Option<PathBuf>,

        features: Vec<String>,
    },
    /// Lay features out over a two-phase roadmap
    Roadmap {
        #[arg(short, long, default_value = "RICE")]
        framework: String,

        /// JSON file holding an array of feature strings or scored records
        #[arg(long, conflicts_with = "features")]
        file: Option<PathBuf>,

        features: Vec<String>,
    },
    /// Select, score and schedule in one pass
    Analyze {
        #[arg(short = 't', long, default_value = "")]
        problem_type: String,

        #[arg(short, long, default_value = "")]
        summary: String,

        /// Skip selection and use this framework
        #[arg(short, long)]
        framework: Option<String>,

        #[arg(long)]
        file: Option<PathBuf>,

        features: Vec<String>,
    },
    /// Analyse every request in a JSON array file
    Batch {
        #[arg(long)]
        file: PathBuf,
    },
    /// Compare the four frameworks
    Frameworks,
    /// Write the built-in keyword tables to .roadmap/config.toml
    Init {
        #[arg(long)]
        force: bool,
    },
}

/// Output of the `roadmap` command.
#[derive(Debug, Serialize)]
pub struct PlannedRoadmap {
    /// Token as given on the command line.
    pub requested: String,
    pub framework: Framework,
    pub fell_back: bool,
    pub roadmap: Roadmap,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cwd = std::env::current_dir()?;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Select {
            problem_type,
            summary,
        } => {
            let engine = load_engine(config_path, &cwd).await?;
            let selection = engine.selector().evaluate(&problem_type, &summary);
            if cli.json {
                print_json(&selection)?;
            } else {
                render::selection(&selection);
                println!("{}", Narrator::explain_framework(selection.framework, Some(&selection)));
            }
        }
        Commands::Score {
            framework,
            file,
            features,
        } => {
            let engine = load_engine(config_path, &cwd).await?;
            let features = collect_features(file.as_deref(), features).await?;
            let resolution = engine.resolver().resolve(&framework, &features);
            if cli.json {
                print_json(&resolution)?;
            } else {
                render::resolution(&resolution);
            }
        }
        Commands::Roadmap {
            framework,
            file,
            features,
        } => {
            let engine = load_engine(config_path, &cwd).await?;
            let requested = framework;
            let (framework, fell_back) = parse_framework(&requested);
            let roadmap = match file {
                Some(path) => {
                    let value = read_json(&path).await?;
                    engine
                        .generator()
                        .generate_value(&value, framework)
                        .with_context(|| format!("Invalid features in {}", path.display()))?
                }
                None => {
                    let features: Vec<Feature> = features.into_iter().map(Feature::from).collect();
                    engine.generator().generate(&features, framework)
                }
            };
            let planned = PlannedRoadmap {
                requested,
                framework,
                fell_back,
                roadmap,
            };
            if cli.json {
                print_json(&planned)?;
            } else {
                render::planned_roadmap(&planned);
                println!("{}", Narrator::explain_roadmap(&planned.roadmap));
            }
        }
        Commands::Analyze {
            problem_type,
            summary,
            framework,
            file,
            features,
        } => {
            let engine = load_engine(config_path, &cwd).await?;
            let features = collect_features(file.as_deref(), features).await?;
            let mut request = AnalysisRequest::new(problem_type, summary).with_features(features);
            request.framework_override = framework;

            let analysis = engine.analyze(&request);
            if cli.json {
                print_json(&analysis)?;
            } else {
                render::analysis(&analysis);
            }
        }
        Commands::Batch { file } => {
            let engine = load_engine(config_path, &cwd).await?;
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let requests: Vec<AnalysisRequest> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse requests in {}", file.display()))?;

            let analyses = run_batch(Arc::new(engine), requests).await?;
            if cli.json {
                print_json(&analyses)?;
            } else {
                for analysis in &analyses {
                    render::analysis(analysis);
                }
            }
        }
        Commands::Frameworks => frameworks(cli.json)?,
        Commands::Init { force } => init_config(&cwd, force).await?,
    }

    Ok(())
}

/// Analyse requests on the blocking pool. Results keep the input order.
async fn run_batch(engine: Arc<Engine>, requests: Vec<AnalysisRequest>) -> Result<Vec<Analysis>> {
    tracing::info!(requests = requests.len(), "Running batch");

    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || engine.analyze(&request))
        })
        .collect();

    let mut analyses = Vec::with_capacity(handles.len());
    for handle in handles {
        analyses.push(handle.await.context("Analysis task failed")?);
    }
    Ok(analyses)
}

/// Features from `--file` first, then positional arguments.
async fn collect_features(file: Option<&Path>, positional: Vec<String>) -> Result<Vec<Feature>> {
    let mut features = match file {
        Some(path) => {
            let value = read_json(path).await?;
            normalize_value(&value)
                .with_context(|| format!("Invalid features in {}", path.display()))?
        }
        None => Vec::new(),
    };
    features.extend(positional.into_iter().map(Feature::from));
    Ok(features)
}

async fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

async fn load_engine(config_path: Option<&Path>, cwd: &Path) -> Result<Engine> {
    let tables = config::load(config_path, cwd).await?;
    Engine::new(tables).context("Failed to build engine")
}

/// Normalize a framework token, reporting whether the RICE fallback was taken.
fn parse_framework(token: &str) -> (Framework, bool) {
    let (framework, fell_back) = Framework::parse_or_default(token);
    if fell_back {
        tracing::warn!(requested = %token, fallback = %framework, "Unknown framework, using fallback");
    }
    (framework, fell_back)
}

fn frameworks(json: bool) -> Result<()> {
    let profiles = comparison();
    if json {
        print_json(&profiles)?;
    } else {
        render::comparison(&profiles);
    }
    Ok(())
}

async fn init_config(cwd: &Path, force: bool) -> Result<()> {
    match config::write_default(cwd, force).await? {
        Some(path) => {
            println!("Wrote default keyword tables to {}", path.display());
            println!("Edit it to retune selection signals, scoring constants and roadmap phases.");
        }
        None => {
            println!(
                "Config already exists at {}/{}. Use --force to overwrite.",
                config::CONFIG_DIR,
                config::CONFIG_FILE
            );
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roadmap_cli=info,prioritizer=info".into()),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_analyze_command() {
        let cli = Cli::try_parse_from([
            "roadmap",
            "--json",
            "analyze",
            "-t",
            "performance",
            "-s",
            "latency issue",
            "Fix crash",
            "Dark mode",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Analyze {
                problem_type,
                features,
                framework,
                ..
            } => {
                assert_eq!(problem_type, "performance");
                assert_eq!(features, vec!["Fix crash", "Dark mode"]);
                assert!(framework.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["roadmap", "frameworks", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_roadmap_file_conflicts_with_positional() {
        assert!(Cli::try_parse_from(["roadmap", "roadmap", "--file", "f.json", "Dark mode"]).is_err());
    }

    #[test]
    fn test_unknown_roadmap_framework_is_reported() {
        let (framework, fell_back) = parse_framework("WSJF");
        let roadmap = Engine::default()
            .generator()
            .generate(&vec![Feature::from("Fix onboarding crash")], framework);
        let planned = PlannedRoadmap {
            requested: "WSJF".to_string(),
            framework,
            fell_back,
            roadmap,
        };

        let json = serde_json::to_value(&planned).unwrap();

        assert_eq!(json["requested"], "WSJF");
        assert_eq!(json["framework"], "RICE");
        assert_eq!(json["fell_back"], true);
        assert_eq!(
            json["roadmap"]["Q1 (0–3 months) — Highest Impact First"][0],
            "Fix onboarding crash"
        );
    }

    #[test]
    fn test_known_roadmap_framework_is_not_a_fallback() {
        assert_eq!(parse_framework(" moscow "), (Framework::Moscow, false));
    }

    #[test]
    fn test_batch_requires_file() {
        assert!(Cli::try_parse_from(["roadmap", "batch"]).is_err());
    }

    #[tokio::test]
    async fn test_collect_features_from_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("features.json");
        tokio::fs::write(&path, r#"[{"feature": "Fix crash", "score": 2}, {"feature": "Dark mode"}]"#)
            .await
            .unwrap();

        let features = collect_features(Some(&path), vec!["Extra".to_string()])
            .await
            .unwrap();

        assert_eq!(
            features,
            vec![
                Feature::from("Fix crash"),
                Feature::from("Dark mode"),
                Feature::from("Extra")
            ]
        );
    }

    #[tokio::test]
    async fn test_collect_features_rejects_mixed_shapes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("features.json");
        tokio::fs::write(&path, r#"["Fix crash", {"feature": "Dark mode"}]"#)
            .await
            .unwrap();

        assert!(collect_features(Some(&path), Vec::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let engine = Arc::new(Engine::default());
        let requests = vec![
            AnalysisRequest::new("performance", "latency issue").with_features(["Fix crash"]),
            AnalysisRequest::new("delivery", "release deadline").with_features(["Fix crash"]),
            AnalysisRequest::new("retention", "users voice frustration").with_features(["Fix crash"]),
        ];

        let analyses = run_batch(engine, requests).await.unwrap();

        let frameworks: Vec<Framework> = analyses.iter().map(|a| a.framework).collect();
        assert_eq!(frameworks, vec![Framework::Ice, Framework::Moscow, Framework::Kano]);
    }
}
