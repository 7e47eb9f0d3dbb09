use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::core::catalog::Catalog;
use crate::core::constraint::constraint_spec;
use crate::core::coordinate::{Coordinate, Ga, Gav};
use crate::core::dependency::Scope;
use crate::core::revision::Revision;
use crate::core::version::Version;
use crate::error::Result;
use crate::graph::builder::ArtifactRecord;
use crate::graph::check::{check_graph, GraphReport};
use crate::resolver::{ResolutionError, ResolverConfig};
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "artifact-graph")]
#[command(about = "Time-travelling Maven dependency graph queries", long_about = None)]
pub struct Cli {
    #[arg(short, long, env = "ARTIFACT_GRAPH_CONFIG")]
    pub config: Option<PathBuf>,
    /// Artifact records to load, overriding the config file.
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// What the given coordinates depend on
    Deps(DepsArgs),
    /// What depends on one artifact version
    Dependents(DependentsArgs),
    /// Union of the dependencies of several artifacts
    Batch(BatchArgs),
    /// One descriptor and its declared dependencies
    Show(ShowArgs),
    /// Unresolvable edges and dependency cycles
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub struct ResolveFlags {
    /// Resolution timestamp; artifacts released later are invisible.
    #[arg(long)]
    pub at: Option<i64>,
    /// Stop after the direct edges.
    #[arg(long)]
    pub direct: bool,
    #[arg(long = "scope")]
    pub scopes: Vec<Scope>,
    #[arg(long)]
    pub include_optional: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DepsArgs {
    /// `group:artifact[:version-or-range]`
    #[arg(required = true)]
    pub coordinates: Vec<String>,
    #[command(flatten)]
    pub flags: ResolveFlags,
}

#[derive(Args, Debug)]
pub struct DependentsArgs {
    /// `group:artifact`
    pub ga: String,
    pub version: String,
    #[command(flatten)]
    pub flags: ResolveFlags,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// `group:artifact:version`
    #[arg(required = true)]
    pub gavs: Vec<String>,
    #[arg(long)]
    pub at: Option<i64>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub gav: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub at: Option<i64>,
    #[arg(long)]
    pub json: bool,
}

impl ResolveFlags {
    fn apply(&self, mut config: ResolverConfig) -> ResolverConfig {
        if let Some(at) = self.at {
            config.timestamp = at;
        }
        if self.direct {
            config.transitive = false;
        }
        if !self.scopes.is_empty() {
            config = config.with_scopes(self.scopes.iter().copied());
        }
        if self.include_optional {
            config.include_optional = true;
        }
        config
    }
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        output::set_colors(false);
    }
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let catalog = open_catalog(cli.config, cli.data)?;
    match cli.command {
        Commands::Deps(args) => handle_deps(args, &catalog),
        Commands::Dependents(args) => handle_dependents(args, &catalog),
        Commands::Batch(args) => handle_batch(args, &catalog),
        Commands::Show(args) => handle_show(args, &catalog),
        Commands::Check(args) => handle_check(args, &catalog),
    }
}

fn open_catalog(config: Option<PathBuf>, data: Option<PathBuf>) -> Result<Catalog> {
    let cwd = env::current_dir().context("failed to read current directory")?;
    Catalog::discover_with_overrides(cwd, config, data)
}

fn handle_deps(args: DepsArgs, catalog: &Catalog) -> Result<()> {
    let seeds = args
        .coordinates
        .iter()
        .map(|coordinate| Coordinate::parse(coordinate))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let config = args.flags.apply(catalog.resolver_config()?);

    let revisions = catalog.resolver().resolve(&seeds, &config)?;
    if !args.flags.json {
        output::heading(&format!(
            "dependencies of {} {}",
            args.coordinates.join(" "),
            describe_cutoff(config.timestamp)
        ));
    }
    print_revisions(&revisions, args.flags.json)
}

fn handle_dependents(args: DependentsArgs, catalog: &Catalog) -> Result<()> {
    let ga = Ga::parse(&args.ga)?;
    let version = Version::new(args.version.as_str());
    let config = args.flags.apply(catalog.resolver_config()?);

    let revisions = catalog
        .resolver()
        .resolve_dependents(&ga, &version, &config);
    if !args.flags.json {
        output::heading(&format!(
            "dependents of {ga}:{version} {}",
            describe_cutoff(config.timestamp)
        ));
    }
    print_revisions(&revisions, args.flags.json)
}

fn handle_batch(args: BatchArgs, catalog: &Catalog) -> Result<()> {
    let gavs = args
        .gavs
        .iter()
        .map(|gav| Gav::parse(gav))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mut config = catalog.resolver_config()?;
    if let Some(at) = args.at {
        config.timestamp = at;
    }

    let revisions = catalog.resolver().resolve_batch(&gavs, &config)?;
    print_revisions(&revisions, args.json)
}

fn handle_show(args: ShowArgs, catalog: &Catalog) -> Result<()> {
    let gav = Gav::parse(&args.gav)?;
    let pom = catalog
        .graph
        .get(&gav)
        .ok_or_else(|| ResolutionError::CoordinateNotFound(gav.to_string()))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ArtifactRecord::from(pom.as_ref()))?
        );
        return Ok(());
    }

    let mut lines = vec![Revision::from(pom.as_ref()).to_string()];
    for dep in &pom.dependencies {
        let mut line = format!(
            "  {}:{} [{}]",
            dep.ga,
            constraint_spec(&dep.version_constraints),
            dep.scope
        );
        if dep.optional {
            line.push_str(" optional");
        }
        if !dep.exclusions.is_empty() {
            let excluded = dep
                .exclusions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            line.push_str(&format!(" excludes {excluded}"));
        }
        lines.push(line);
    }
    output::print_lines(lines);
    Ok(())
}

fn handle_check(args: CheckArgs, catalog: &Catalog) -> Result<()> {
    let timestamp = args.at.unwrap_or(catalog.resolver_config()?.timestamp);
    let report = check_graph(&catalog.graph, timestamp);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&GraphCheckJson::from(&report))?
        );
        return Ok(());
    }

    print_graph_report(&report);
    Ok(())
}

fn print_revisions(revisions: &BTreeSet<Revision>, json: bool) -> Result<()> {
    if json {
        let entries: Vec<RevisionJson> = revisions.iter().map(RevisionJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    output::print_lines(revisions.iter().map(ToString::to_string));
    Ok(())
}

fn print_graph_report(report: &GraphReport) {
    if report.is_clean() {
        output::info("no missing dependencies or cycles");
        return;
    }

    let mut lines = Vec::new();
    if !report.missing.is_empty() {
        output::warn(&format!("{} unresolvable dependencies", report.missing.len()));
        for missing in &report.missing {
            lines.push(format!(
                "missing: {} -> {}:{}",
                missing.from, missing.dependency, missing.constraint
            ));
        }
    }
    if !report.cycles.is_empty() {
        output::warn(&format!("{} dependency cycles", report.cycles.len()));
        for cycle in &report.cycles {
            let members = cycle
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            lines.push(format!("cycle: {members}"));
        }
    }
    output::print_lines(lines);
}

fn describe_cutoff(timestamp: i64) -> String {
    if timestamp == ResolverConfig::LATEST {
        "(latest)".to_string()
    } else {
        format!("at {timestamp}")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RevisionJson {
    group_id: String,
    artifact_id: String,
    version: String,
    release_date: i64,
}

impl From<&Revision> for RevisionJson {
    fn from(revision: &Revision) -> Self {
        Self {
            group_id: revision.gav.ga.group_id.clone(),
            artifact_id: revision.gav.ga.artifact_id.clone(),
            version: revision.gav.version.to_string(),
            release_date: revision.release_date,
        }
    }
}

#[derive(Serialize)]
struct GraphCheckJson {
    missing: Vec<GraphMissingJson>,
    cycles: Vec<Vec<String>>,
}

#[derive(Serialize)]
struct GraphMissingJson {
    from: String,
    dependency: String,
    constraint: String,
}

impl From<&GraphReport> for GraphCheckJson {
    fn from(report: &GraphReport) -> Self {
        Self {
            missing: report
                .missing
                .iter()
                .map(|missing| GraphMissingJson {
                    from: missing.from.to_string(),
                    dependency: missing.dependency.to_string(),
                    constraint: missing.constraint.clone(),
                })
                .collect(),
            cycles: report
                .cycles
                .iter()
                .map(|cycle| cycle.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }
}
