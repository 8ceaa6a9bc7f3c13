//! CLI command implementations.

pub(crate) mod page;
pub(crate) mod roots;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Args;
use sitenav_config::{CliSettings, Config};
use sitenav_site::{
    BuildReport, NavigationNode, NavigationSettings, NavigationTreeBuilder, UrlResolver, UrlScheme,
};
use sitenav_store_fs::SitePlanStore;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use page::PageArgs;
pub(crate) use roots::RootsArgs;

/// Arguments shared by the tree building commands.
#[derive(Args, Debug)]
pub(crate) struct CommonArgs {
    /// Site whose plan is traversed.
    #[arg(short, long, env = "SITENAV_SITE")]
    site: String,

    /// Deepest level to expand; negative means unbounded (overrides config).
    #[arg(short, long, allow_negative_numbers = true)]
    depth: Option<i32>,

    /// Preview date, "YYYY-MM-DD HH:MM:SS" (overrides config).
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDateTime>,

    /// Path to configuration file (default: auto-discover sitenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site plan file (overrides config).
    #[arg(short, long)]
    plan: Option<PathBuf>,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_date_arg(value: &str) -> Result<NaiveDateTime, String> {
    sitenav_config::parse_date(value).map_err(|e| e.to_string())
}

/// Loaded configuration and site plan for one command run.
struct Session {
    config: Config,
    plan: SitePlanStore,
}

impl CommonArgs {
    /// Load config and the site plan it points at.
    fn open(&self, output: &Output) -> Result<Session, CliError> {
        let cli_settings = CliSettings {
            plan: self.plan.clone(),
            max_depth: self.depth,
            effective_date: self.date,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Using configuration file");
        }
        if !self.json {
            output.info(&format!("Site plan: {}", config.plan_path.display()));
        }

        let plan = SitePlanStore::open(&config.plan_path)?;
        let session = Session { config, plan };
        session.require_site(&self.site)?;
        Ok(session)
    }
}

impl Session {
    /// Fail with the list of known sites when `site` is not in the plan.
    fn require_site(&self, site: &str) -> Result<(), CliError> {
        if self.plan.site_names().any(|name| name == site) {
            return Ok(());
        }
        let mut known: Vec<&str> = self.plan.site_names().collect();
        known.sort_unstable();
        Err(CliError::NotFound(unknown_site_message(site, &known)))
    }

    /// Traversal depth after CLI overrides.
    fn max_depth(&self) -> i32 {
        self.config.navigation.max_depth
    }

    /// Tree builder over the loaded plan.
    fn builder(&self) -> Result<NavigationTreeBuilder<'_>, CliError> {
        let urls = &self.config.urls;
        let resolver = match &urls.dispatcher {
            Some(dispatcher) => UrlResolver::new(UrlScheme {
                servlet: urls.servlet.clone(),
                vanity_prefix: urls.vanity_prefix.clone(),
                dispatcher: dispatcher.clone(),
            }),
            None => UrlResolver::from_properties(&self.plan, &urls.servlet, &urls.vanity_prefix),
        };

        let navigation = &self.config.navigation;
        let settings = NavigationSettings {
            link_label_attribute: navigation.link_label_attribute.clone(),
            path_attribute: navigation.path_attribute.clone(),
            effective_date: navigation.effective_date,
        };

        Ok(NavigationTreeBuilder::new(
            &self.plan, &self.plan, resolver, settings,
        )?)
    }
}

/// Print a build report as a tree or JSON, with skipped rows on stderr.
fn print_report(output: &Output, report: &BuildReport, json: bool) -> Result<(), CliError> {
    output.skipped(&report.skipped);
    if json {
        output.document(&serde_json::to_string_pretty(&report.nodes)?);
    } else {
        output.tree(&report.nodes);
        output.info(&summary(report));
    }
    Ok(())
}

fn unknown_site_message(site: &str, known: &[&str]) -> String {
    if known.is_empty() {
        format!("Site '{site}' not found; the site plan defines no sites")
    } else {
        format!("Site '{site}' not found; known sites: {}", known.join(", "))
    }
}

/// One-line description of a built tree.
fn summary(report: &BuildReport) -> String {
    let skipped = report.skipped.len();
    let Some(deepest) = report.nodes.iter().map(NavigationNode::max_level).max() else {
        return format!("0 nodes, {skipped} skipped");
    };
    let total: usize = report.nodes.iter().map(NavigationNode::count).sum();
    let leaves = report
        .nodes
        .iter()
        .flat_map(NavigationNode::descendants)
        .filter(|node| node.is_leaf())
        .count();
    format!("{total} nodes ({leaves} leaves, deepest level {deepest}), {skipped} skipped")
}
