use std::{fs, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::info;
use jvmconnect_core::core::config::{DEFAULT_STORAGE_KEY, DEFAULT_PROBE_TIMEOUT};
use jvmconnect_core::storage::legacy::parse_profiles;
use jvmconnect_core::{
    ConnectionProfile, FileProfileStore, HttpProbeClient, NavigationError, Navigator, Registry,
    RegistryConfig, RegistryError,
};
use url::Url;

/// Hands console URLs to the user instead of a browser.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn open(&self, url: &Url) -> Result<(), NavigationError> {
        println!("{url}");
        Ok(())
    }
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "jvmconnect", version, subcommand_required = true)]
pub struct Args {
    /// Directory holding the connection documents (default: user config dir)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,
    /// Name of the connection document
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_KEY)]
    pub key: String,
    /// Per-probe timeout in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,
    /// URL of the console page, used for proxied connections, `connect` and `defaults`
    #[arg(long, global = true)]
    pub page_url: Option<Url>,
    /// In-app route at the end of the page URL, e.g. /jvm/connect
    #[arg(long, global = true)]
    pub route: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show saved connections
    List {
        /// Probe every connection and show whether it is reachable
        #[arg(long)]
        probe: bool,
    },
    /// Save a new connection
    Add {
        name: String,
        #[arg(long)]
        scheme: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        path: Option<String>,
        /// Full agent URL; overrides scheme/host/port/path
        #[arg(long)]
        jolokia_url: Option<String>,
        /// Reach the agent through the console's proxy
        #[arg(long)]
        use_proxy: bool,
    },
    /// Delete a saved connection
    Remove { name: String },
    /// Add connections from a JSON file; existing names are kept
    Import { file: PathBuf },
    /// Check whether a saved connection's agent answers
    Probe { name: String },
    /// Check credentials against a saved connection's agent
    Login {
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Print the console URL that opens a saved connection
    Connect { name: String },
    /// Show the values a new connection would start from
    Defaults,
}

type CliRegistry = Registry<FileProfileStore, HttpProbeClient>;

fn build_registry(args: &Args) -> anyhow::Result<CliRegistry> {
    let store = match &args.store_dir {
        Some(dir) => FileProfileStore::with_dir(dir),
        None => FileProfileStore::new(),
    }
    .context("opening connection store")?;
    let client = HttpProbeClient::new().context("building HTTP client")?;

    let mut config = RegistryConfig::default()
        .with_storage_key(args.key.clone())
        .with_probe_timeout(Duration::from_millis(args.timeout_ms));
    config.page_url = args.page_url.clone();
    config.route_path = args.route.clone();

    Ok(Registry::new(config, store, client, Box::new(PrintNavigator)))
}

fn describe(profile: &ConnectionProfile) -> String {
    if let Some(url) = &profile.jolokia_url {
        return url.clone();
    }
    format!(
        "{}://{}:{}{}{}",
        profile.scheme.as_deref().unwrap_or("http"),
        profile.host.as_deref().unwrap_or("localhost"),
        profile.port.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
        profile.path.as_deref().unwrap_or(""),
        if profile.use_proxy { " (proxied)" } else { "" }
    )
}

fn reachable_mark(reachable: Option<bool>) -> &'static str {
    match reachable {
        Some(true) => "up",
        Some(false) => "down",
        None => "?",
    }
}

/// Exit status when an agent is unreachable or refuses the credentials.
const CHECK_FAILED: u8 = 2;

pub async fn run_cli(args: Args) -> anyhow::Result<ExitCode> {
    let registry = build_registry(&args)?;

    match args.command {
        Command::List { probe } => {
            let mut profiles = registry.load();
            if probe {
                info!("Probing {} connection(s)", profiles.len());
                registry.update_reachable_flags(&mut profiles).await;
            }
            for profile in &profiles {
                println!(
                    "{:<5} {:<24} {}",
                    reachable_mark(profile.reachable),
                    profile.name,
                    describe(profile)
                );
            }
        }
        Command::Add {
            name,
            scheme,
            host,
            port,
            path,
            jolokia_url,
            use_proxy,
        } => {
            if registry.find(&name).is_some() {
                return Err(anyhow!("a connection named '{name}' already exists"));
            }
            let defaults = registry.default_options();
            let profile = ConnectionProfile {
                name: name.clone(),
                scheme,
                host,
                port: port.or(defaults.port),
                path: path.or(defaults.path),
                jolokia_url,
                use_proxy,
                ..ConnectionProfile::default()
            };
            registry.import(vec![profile])?;
            println!("saved '{name}'");
        }
        Command::Remove { name } => {
            if !registry.remove(&name)? {
                return Err(RegistryError::UnknownConnection(name).into());
            }
            println!("removed '{name}'");
        }
        Command::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let imported = parse_profiles(&raw)
                .with_context(|| format!("{} is not a list or map of connections", file.display()))?;
            let before = registry.load().len();
            let merged = registry.import(imported)?;
            println!("imported {} connection(s)", merged.len() - before);
        }
        Command::Probe { name } => {
            let profile = registry.get(&name)?;
            let verdict = registry.probe(&profile).await;
            println!("{name}: {verdict}");
            if !verdict.ok {
                return Ok(ExitCode::from(CHECK_FAILED));
            }
        }
        Command::Login {
            name,
            username,
            password,
        } => {
            let profile = registry.get(&name)?;
            if registry.check_credentials(&profile, &username, &password).await {
                println!("{name}: credentials accepted");
            } else {
                println!("{name}: credentials rejected");
                return Ok(ExitCode::from(CHECK_FAILED));
            }
        }
        Command::Connect { name } => {
            let profile = registry.get(&name)?;
            registry.connect(&profile)?;
        }
        Command::Defaults => {
            println!("{}", serde_json::to_string_pretty(&registry.default_options())?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
