//! goodrouter CLI
//!
//! Loads a route table from TOML and exercises it from the command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes.toml ──▶ config (load + validate) ──▶ RouteRegistry::from_config
//!                                                      │
//!        check / resolve / build ◀─────────────────────┤
//!                                                      ▼
//!        walk ──▶ Router::spawn ──▶ queue ──▶ engine ──▶ hooks + render
//!                                                      │
//!                       stdout: one JSON line per transition
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use goodrouter::config::load_config;
use goodrouter::observability::{logging, metrics};
use goodrouter::{ActiveRoute, HookKind, RouteDef, RouteParams, RouteRegistry, Router, Shutdown, TransitionOptions};

#[derive(Parser)]
#[command(name = "goodrouter")]
#[command(about = "Inspect and exercise a hierarchical route table", long_about = None)]
struct Cli {
    /// Route table in TOML.
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and list the flattened routes
    Check,
    /// Resolve a path to its route chain and parameters
    Resolve { path: String },
    /// Build the path of a named route from key=value parameters
    Build {
        name: String,
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Run transitions in order, printing hooks fired and the composed render
    Walk {
        /// JSON context passed to every hook.
        #[arg(long)]
        context: Option<String>,
        /// Reload the final route after the walk.
        #[arg(long)]
        reload: bool,
        /// Print Prometheus metrics when done.
        #[arg(long)]
        metrics: bool,
        /// Paths to visit; "-" transitions to no route.
        paths: Vec<String>,
    },
}

type Events = Arc<Mutex<Vec<String>>>;

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

/// Record every lifecycle hook as `<route>-<hook>` and render `{route, params, child}`.
fn traced(def: RouteDef<Value, Value>, events: &Events) -> RouteDef<Value, Value> {
    let name = def.name().to_string();
    let mut def = def;
    for kind in HookKind::LIFECYCLE {
        let events = events.clone();
        let label = format!("{name}-{kind}");
        def = def.on(kind, move |_| {
            let events = events.clone();
            let label = label.clone();
            async move {
                events.lock().expect("event log mutex poisoned").push(label);
                Ok(())
            }
        });
    }
    def.render(move |state| {
        let name = name.clone();
        async move {
            Ok(json!({
                "route": name,
                "params": state.next_params,
                "child": state.child,
            }))
        }
    })
}

/// One JSON line per transition: target, render result, hooks fired, committed route.
fn print_step(path: Value, result: Option<Value>, events: &Events, active: &ActiveRoute) {
    let hooks = std::mem::take(&mut *events.lock().expect("event log mutex poisoned"));
    let line = json!({
        "path": path,
        "result": result,
        "hooks": hooks,
        "active": active,
    });
    println!("{line}");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability)?;

    tracing::debug!(
        config = %cli.config.display(),
        routes = config.routes.len(),
        queue_capacity = config.queue.capacity,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Check => {
            let registry = RouteRegistry::<Value, Value>::from_config(&config.routes, |def| def)?;
            for node in registry.nodes() {
                let chain = registry.chain_for(node.id)?;
                println!(
                    "{:<24} {:<32} {}",
                    node.name,
                    node.pattern.as_ref().map(|p| p.template()).unwrap_or("-"),
                    registry.names(&chain).join(" > ")
                );
            }
        }
        Commands::Resolve { path } => {
            let registry = RouteRegistry::<Value, Value>::from_config(&config.routes, |def| def)?;
            let output = match registry.resolve_by_path(&path) {
                Some(matched) => {
                    let chain = registry.chain_for(matched.route)?;
                    json!({
                        "route": registry.node(matched.route).name,
                        "stack": registry.names(&chain),
                        "params": matched.params,
                    })
                }
                None => Value::Null,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Build { name, params } => {
            let registry = RouteRegistry::<Value, Value>::from_config(&config.routes, |def| def)?;
            let params: RouteParams = params.into_iter().collect();
            println!("{}", registry.resolve_by_name(&name, &params)?);
        }
        Commands::Walk {
            context,
            reload,
            metrics: print_metrics,
            paths,
        } => {
            let prometheus = if print_metrics || config.observability.metrics_enabled {
                Some(metrics::init_metrics()?)
            } else {
                None
            };

            let context: Option<Value> = context.as_deref().map(serde_json::from_str).transpose()?;
            let events: Events = Arc::new(Mutex::new(Vec::new()));
            let registry =
                RouteRegistry::from_config(&config.routes, |def| traced(def, &events))?;

            let shutdown = Shutdown::new();
            let router = Router::spawn(registry, &config.queue, &shutdown);

            let steps = paths.iter().map(|path| (path != "-").then_some(path.as_str()));
            for step in steps {
                let result = router
                    .transition(step, context.clone(), TransitionOptions::default())
                    .await?;
                print_step(json!(step), result, &events, &router.active());
            }

            if reload {
                let result = router.reload(context.clone()).await?;
                print_step(json!("<reload>"), result, &events, &router.active());
            }

            shutdown.trigger();

            if let Some(handle) = prometheus {
                print!("{}", handle.render());
            }
        }
    }

    Ok(())
}
