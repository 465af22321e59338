use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use git_ccs::analyzer::{ChangeMapping, Section, Sections};
use git_ccs::cli::Ccs;
use git_ccs::config::{self, Config};
use git_ccs::domain::{
    AlphaNumericIdentifier, ChangeType, CombinedStrategy, CounterStrategy, StaticStrategy,
    Strategy, Version,
};
use git_ccs::git::Git2Repository;
use git_ccs::logging::{self, LogLevel};
use git_ccs::ui;

#[derive(Parser)]
#[command(
    name = "git-ccs",
    version,
    about = "Conventional Commits & Semantic Versioning for git repositories"
)]
struct Cli {
    #[arg(long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, default_value = ".", help = "Path inside the repository")]
    repo: String,

    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the next version from the commits since the latest tag
    Next {
        #[command(subcommand)]
        kind: NextKind,
    },
    /// Print the commits of a version as JSON
    Log(RangeArgs),
    /// Print the latest version
    Latest(RangeArgs),
    /// Print the changelog of a version as Markdown
    Changes(ChangesArgs),
}

#[derive(Subcommand)]
enum NextKind {
    /// Next release version
    Release(MappingArgs),
    /// Next pre-release version
    PreRelease(PreReleaseArgs),
}

#[derive(Args)]
struct MappingArgs {
    #[arg(short = 'n', long = "none", value_delimiter = ',', help = "Types that change nothing")]
    none: Vec<String>,

    #[arg(short = 'p', long = "patch", value_delimiter = ',', help = "Types that bump the patch")]
    patch: Vec<String>,

    #[arg(short = 'm', long = "minor", value_delimiter = ',', help = "Types that bump the minor")]
    minor: Vec<String>,

    #[arg(short = 'M', long = "major", value_delimiter = ',', help = "Types that bump the major")]
    major: Vec<String>,
}

impl MappingArgs {
    fn apply(&self, mapping: ChangeMapping) -> ChangeMapping {
        mapping
            .add(ChangeType::None, self.none.iter().cloned())
            .add(ChangeType::Patch, self.patch.iter().cloned())
            .add(ChangeType::Minor, self.minor.iter().cloned())
            .add(ChangeType::Major, self.major.iter().cloned())
    }
}

#[derive(Args)]
struct PreReleaseArgs {
    #[arg(short = 'c', long = "counter", num_args = 0..=1, default_missing_value = "RC", help = "Counting indicator, e.g. RC.1")]
    counter: Option<String>,

    #[arg(short = 's', long = "static", num_args = 0..=1, default_missing_value = "SNAPSHOT", help = "Fixed indicator, e.g. SNAPSHOT")]
    fixed: Option<String>,

    #[arg(short = 'f', long = "format", conflicts_with_all = ["counter", "fixed"], help = "Example indicator to deduce the strategy from")]
    format: Option<String>,

    #[command(flatten)]
    mapping: MappingArgs,
}

impl PreReleaseArgs {
    /// Strategy from the flags, else from the configured format
    fn strategy(&self, config: &Config) -> Result<Box<dyn Strategy>> {
        if let Some(format) = &self.format {
            return Ok(git_ccs::domain::deduct(format)?);
        }

        let counter = match &self.counter {
            Some(label) => Some(CounterStrategy::new(AlphaNumericIdentifier::new(label.as_str())?)),
            None => None,
        };
        let fixed = match &self.fixed {
            Some(label) => Some(StaticStrategy::new(AlphaNumericIdentifier::new(label.as_str())?)),
            None => None,
        };

        let strategy: Box<dyn Strategy> = match (counter, fixed) {
            (Some(counter), Some(fixed)) => Box::new(CombinedStrategy::new(counter, fixed)),
            (Some(counter), None) => Box::new(counter),
            (None, Some(fixed)) => Box::new(fixed),
            (None, None) => config.pre_release.strategy()?,
        };
        Ok(strategy)
    }
}

#[derive(Args)]
struct RangeArgs {
    #[arg(short, long, help = "Only consider release versions as the start")]
    release: bool,

    #[arg(short, long, help = "Version to look at instead of the unreleased changes")]
    target: Option<String>,
}

impl RangeArgs {
    fn target(&self) -> Result<Option<Version>> {
        self.target
            .as_deref()
            .map(|t| Version::parse(t).with_context(|| format!("Invalid target version '{}'", t)))
            .transpose()
    }
}

#[derive(Args)]
struct ChangesArgs {
    #[command(flatten)]
    range: RangeArgs,

    #[arg(short = 's', long = "section", help = "Section as 'Headline=type1,type2', repeatable")]
    sections: Vec<String>,

    #[arg(short = 'b', long = "breaking-changes", help = "Headline of the breaking changes section")]
    breaking_changes: Option<String>,

    #[arg(short = 'l', long = "level", help = "Markdown headline level (1-7)")]
    level: Option<u8>,
}

impl ChangesArgs {
    fn sections(&self, config: &Config) -> Result<Sections> {
        let mut sections = if self.sections.is_empty() {
            config.changes.sections()
        } else {
            let mut sections = Sections::empty()
                .with_breaking_changes(config.changes.breaking_changes.clone());
            for arg in &self.sections {
                sections = sections.with_section(parse_section(arg)?);
            }
            sections
        };
        if let Some(headline) = &self.breaking_changes {
            sections = sections.with_breaking_changes(headline.clone());
        }
        Ok(sections)
    }

    fn level(&self, config: &Config) -> Result<u8> {
        Ok(config::validate_level(
            self.level.unwrap_or(config.changes.level),
        )?)
    }
}

fn parse_section(arg: &str) -> Result<Section> {
    let (headline, types) = arg
        .split_once('=')
        .with_context(|| format!("Section '{}' must look like 'Headline=type1,type2'", arg))?;
    let types: Vec<&str> = types
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if headline.trim().is_empty() || types.is_empty() {
        anyhow::bail!("Section '{}' needs a headline and at least one type", arg);
    }
    Ok(Section::new(headline.trim(), types))
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Run a command, returning whether it found what it was asked for
fn run(cli: Cli) -> Result<bool> {
    let config = config::load_config(cli.config.as_deref()).context("Error loading config")?;
    let repo = Git2Repository::open(&cli.repo)
        .with_context(|| format!("Git repository error at '{}'", cli.repo))?;
    let ccs = Ccs::new(repo);

    match cli.command {
        Command::Next { kind } => {
            ui::display_status("Analyzing commits since the latest version tag");
            for warning in ccs.boundary_warnings()? {
                ui::display_boundary_warning(&warning);
            }
            let base = config.mapping.change_mapping();
            let next = match kind {
                NextKind::Release(args) => ccs.next_release(&args.apply(base))?.to_string(),
                NextKind::PreRelease(args) => {
                    let strategy = args.strategy(&config)?;
                    ccs.next_pre_release(strategy.as_ref(), &args.mapping.apply(base))?
                        .to_string()
                }
            };
            ui::print_result(&next);
        }
        Command::Log(args) => {
            let target = args.target()?;
            ui::print_result(&ccs.change_log_json(args.release, target.as_ref())?);
        }
        Command::Latest(args) => {
            let target = args.target()?;
            match ccs.latest_version(args.release, target.as_ref())? {
                Some(version) => ui::print_result(&version.to_string()),
                None => {
                    ui::display_error("no version found");
                    return Ok(false);
                }
            }
        }
        Command::Changes(args) => {
            let sections = args.sections(&config)?;
            let level = args.level(&config)?;
            let target = args.range.target()?;
            let markdown =
                ccs.change_log_markdown(args.range.release, target.as_ref(), &sections, level)?;
            ui::print_result(&markdown);
        }
    }

    Ok(true)
}
