//! CLI entry point for `ctrlcraft`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use ctrlcraft_inquiry::config::Config;
use ctrlcraft_inquiry::i18n;
use ctrlcraft_inquiry::model::draft::{Field, InquiryDraft};
use ctrlcraft_inquiry::notice::{ConsoleNotices, NoticeSink};
use ctrlcraft_inquiry::page::{ConsoleNavigator, InquiryPage};
use ctrlcraft_inquiry::relay::{EmailJsRelay, Relay};

#[derive(Parser)]
#[command(name = "ctrlcraft", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and send an inquiry
    Submit {
        #[command(flatten)]
        form: FormArgs,
        #[command(flatten)]
        images: ImageArgs,
        #[command(flatten)]
        relay: RelayArgs,
        /// Print the template parameters instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Load images and show the preview list
    Preview {
        #[command(flatten)]
        images: ImageArgs,
        /// Remove the entry at this 1-based position before printing (repeatable)
        #[arg(long, value_name = "N")]
        remove: Vec<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show or initialize the configuration file
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[derive(Args)]
struct FormArgs {
    /// TOML file with form fields (`first_name = "..."`, ...); flags override it
    #[arg(long, value_name = "FILE")]
    form: Option<PathBuf>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    service: Option<String>,
    #[arg(long)]
    controller_type: Option<String>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    timeline: Option<String>,
    /// Design description
    #[arg(long)]
    description: Option<String>,
    /// Confirm the shipping requirements
    #[arg(long)]
    shipping_confirmed: bool,
}

#[derive(Args)]
struct ImageArgs {
    /// Reference image to attach (repeatable)
    #[arg(long = "image", value_name = "PATH")]
    images: Vec<PathBuf>,
    /// Directory (or single file) dropped onto the form
    #[arg(long = "drop", value_name = "PATH")]
    drop: Option<PathBuf>,
}

#[derive(Args)]
struct RelayArgs {
    /// EmailJS public key
    #[arg(long, env = "CTRLCRAFT_PUBLIC_KEY", hide_env_values = true)]
    public_key: Option<String>,
    /// EmailJS service identifier
    #[arg(long, env = "CTRLCRAFT_SERVICE_ID")]
    service_id: Option<String>,
    /// EmailJS template identifier
    #[arg(long, env = "CTRLCRAFT_TEMPLATE_ID")]
    template_id: Option<String>,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--lang" {
            if let Some(lang) = args.get(i + 1).and_then(|c| i18n::Lang::from_code(c)) {
                return lang;
            }
        }
        if let Some(lang) = arg
            .strip_prefix("--lang=")
            .and_then(i18n::Lang::from_code)
        {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about());

    for (name, about) in [
        ("submit", i18n::help_cmd_submit()),
        ("preview", i18n::help_cmd_preview()),
        ("config", i18n::help_cmd_config()),
        ("completions", i18n::help_cmd_completions()),
        ("manpage", i18n::help_cmd_manpage()),
    ] {
        cmd = cmd.mut_subcommand(name, |s| s.about(about));
    }
    cmd
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Detect language BEFORE clap parsing so --help is localized
    i18n::set_lang(detect_lang_early());

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = ctrlcraft_inquiry::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Submit {
            form,
            images,
            relay,
            dry_run,
        } => cmd_submit(config, form, images, relay, dry_run).await,
        Commands::Preview {
            images,
            remove,
            json,
        } => cmd_preview(&config, images, &remove, json).await,
        Commands::Config { init } => cmd_config(&config, init),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = ctrlcraft_inquiry::config::log_file_path(config);
    let log_target = log_path
        .parent()
        .zip(log_path.file_name())
        .filter(|(dir, _)| std::fs::create_dir_all(dir).is_ok());
    if let Some((log_dir, log_name)) = log_target {
        let file_appender = tracing_appender::rolling::never(log_dir, log_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ctrlcraft", &mut std::io::stdout());
    Ok(())
}

fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    if init {
        let path = ctrlcraft_inquiry::config::save_config(&Config::default())?;
        println!("  {} {}", i18n::cli_config_written(), path.display());
        return Ok(());
    }
    if let Some(path) = ctrlcraft_inquiry::config::config_file_path() {
        println!("# {}: {}", i18n::cli_config_path(), path.display());
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Build the draft from the optional form file, then apply flags on top.
fn read_draft(args: &FormArgs) -> anyhow::Result<InquiryDraft> {
    let mut draft = match &args.form {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("{}: {}", i18n::err_file_not_found(), path.display());
            }
            InquiryDraft::from_toml(&std::fs::read_to_string(path)?)?
        }
        None => InquiryDraft::default(),
    };

    let overrides = [
        (Field::FirstName, &args.first_name),
        (Field::LastName, &args.last_name),
        (Field::Email, &args.email),
        (Field::Phone, &args.phone),
        (Field::Service, &args.service),
        (Field::ControllerType, &args.controller_type),
        (Field::Color, &args.color),
        (Field::Timeline, &args.timeline),
        (Field::DesignDescription, &args.description),
    ];
    for (field, value) in overrides {
        if let Some(v) = value {
            draft.set(field, v);
        }
    }
    if args.shipping_confirmed {
        draft.shipping_confirmed = true;
    }
    Ok(draft)
}

fn build_page(config: &Config, relay: Arc<dyn Relay>, notices: Arc<ConsoleNotices>) -> InquiryPage {
    InquiryPage::new(config, relay, notices, Arc::new(ConsoleNavigator))
}

/// Feed picker and drop selections into the page's intake.
async fn load_images(page: &InquiryPage, images: &ImageArgs) -> anyhow::Result<()> {
    if !images.images.is_empty() {
        page.select_files(&images.images).await?;
    }
    if let Some(dir) = &images.drop {
        page.drop_files(dir).await?;
    }
    Ok(())
}

async fn cmd_submit(
    mut config: Config,
    form: FormArgs,
    images: ImageArgs,
    relay_args: RelayArgs,
    dry_run: bool,
) -> anyhow::Result<()> {
    if let Some(key) = relay_args.public_key {
        config.relay.public_key = key;
    }
    if let Some(id) = relay_args.service_id {
        config.relay.service_id = id;
    }
    if let Some(id) = relay_args.template_id {
        config.relay.template_id = id;
    }

    let notices = Arc::new(ConsoleNotices::new(config.notices.ttl()));
    let relay = EmailJsRelay::new(&config.relay)?;
    if !dry_run {
        if let Err(e) = relay.init() {
            // Submission reports "not ready" below; say why here.
            tracing::warn!(error = %e, "EmailJS relay unavailable");
            notices.error(e.to_string());
        }
    }

    let mut page = build_page(&config, Arc::new(relay), Arc::clone(&notices));
    page.fill(read_draft(&form)?);
    load_images(&page, &images).await?;

    if dry_run {
        let attachments = page.intake().snapshot();
        let message = page.submission().prepare(page.form(), &attachments)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&message.template_params())?
        );
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(page.submit_control().label());
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = page.submit().await;
    pb.finish_and_clear();

    outcome?;
    Ok(())
}

async fn cmd_preview(
    config: &Config,
    images: ImageArgs,
    remove: &[usize],
    json: bool,
) -> anyhow::Result<()> {
    let notices = Arc::new(ConsoleNotices::new(config.notices.ttl()));
    let relay = EmailJsRelay::new(&config.relay)?;
    let page = build_page(config, Arc::new(relay), notices);
    load_images(&page, &images).await?;

    // Highest first, so the numbers the user typed keep pointing at the same files.
    let mut positions: Vec<usize> = remove.iter().filter(|&&n| n > 0).map(|n| n - 1).collect();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    for position in positions {
        let buttons = page.intake().remove_buttons();
        match buttons.iter().find(|b| b.position() == position) {
            Some(button) => {
                button.click()?;
            }
            None => tracing::warn!(position = position + 1, "No image at that position"),
        }
    }

    let preview = page.intake().preview();
    if json {
        println!("{}", serde_json::to_string_pretty(preview.entries())?);
        return Ok(());
    }

    use humansize::{format_size, BINARY};
    let total: u64 = page.intake().snapshot().iter().map(|a| a.byte_size).sum();
    println!();
    for line in preview.render_lines(40) {
        println!("  {line}");
    }
    println!();
    println!(
        "  {:<12} {}/{}",
        i18n::cli_images(),
        preview.len(),
        config.intake.max_attachments
    );
    println!("  {:<12} {}", i18n::cli_total_size(), format_size(total, BINARY));
    println!();
    Ok(())
}
