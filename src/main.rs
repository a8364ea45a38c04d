use clap::{ArgGroup, Args, Parser, Subcommand};
use quack::app::editor;
use quack::app::{self, AppConfig};
use quack::config;
#[cfg(feature = "harness")]
use quack::harness;
use quack::logging;
use quack::ui::theme;

/// Terminal rubber-duck pad: a line editor with cloud sync, AI code review,
/// and a voice-agent bridge.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// User identifier owning the code record. Overrides `sync.user_id`.
    #[arg(long)]
    user: Option<String>,

    /// Record store deployment URL. Overrides `sync.deployment_url`.
    #[arg(long)]
    store_url: Option<String>,

    #[cfg(feature = "harness")]
    /// Run against fixture data without any network access.
    #[arg(long, default_value_t = false)]
    demo: bool,

    #[cfg(feature = "harness")]
    /// Render deterministic frames to stdout without entering interactive mode.
    #[arg(long, default_value_t = false)]
    harness_dump: bool,

    #[cfg(feature = "harness")]
    /// Harness frame width.
    #[arg(long, default_value_t = 120)]
    harness_width: u16,

    #[cfg(feature = "harness")]
    /// Harness frame height.
    #[arg(long, default_value_t = 36)]
    harness_height: u16,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect or edit quack configuration.
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("config_action")
        .required(true)
        .multiple(false)
        .args(["edit", "path"])
))]
struct ConfigCommand {
    /// Open the config file in $VISUAL/$EDITOR/nvim/vim/vi.
    #[arg(long)]
    edit: bool,

    /// Print the config file path.
    #[arg(long)]
    path: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Config(command)) = cli.command {
        return handle_config_command(command);
    }

    let config = config::load_or_create()?;
    theme::apply(config.theme);

    #[cfg(feature = "harness")]
    if cli.harness_dump {
        let dump = harness::render_demo_dump(cli.harness_width, cli.harness_height)?;
        println!("{dump}");
        return Ok(());
    }

    let _logging = logging::init();

    app::run(AppConfig {
        user_id: cli.user.or(config.sync.user_id),
        store_url: cli.store_url.or(config.sync.deployment_url),
        debounce: config.sync.debounce,
        review: config.review,
        agent_endpoint: config.agent.endpoint,
        #[cfg(feature = "harness")]
        demo: cli.demo,
    })
    .await
}

fn handle_config_command(command: ConfigCommand) -> anyhow::Result<()> {
    let path = config::ensure_config_file()?;

    if command.path {
        println!("{}", path.display());
        return Ok(());
    }

    if command.edit {
        editor::edit_file_with_system_editor(path.as_path())?;
        return Ok(());
    }

    Ok(())
}
