use anyhow::{anyhow, Context};
use clap::Parser;
use stacksmith::config::toml_config::StackConfig;
use stacksmith::templates;
use stacksmith::utils::{logger, validation::Validate};

#[derive(Parser)]
#[command(name = "render-template")]
#[command(about = "Render a CloudFormation template from a TOML stack config")]
struct Args {
    /// Path to TOML stack configuration file
    #[arg(short, long, default_value = "stack.toml")]
    config: String,

    /// Override the template named in the config
    #[arg(long)]
    template: Option<String>,

    /// Pretty-print the JSON document
    #[arg(long)]
    pretty: bool,

    /// List available templates and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose, None)?;

    if args.list {
        for name in templates::available() {
            println!("{}", name);
        }
        return Ok(());
    }

    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = StackConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 應用命令列覆蓋設定
    if let Some(template) = args.template {
        tracing::info!("🔧 Template overridden to: {}", template);
        config.template = template;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e.into());
    }

    if let Some(stack_name) = &config.stack_name {
        tracing::info!("📋 Stack: {}", stack_name);
    }

    let renderer = templates::find(&config.template)
        .ok_or_else(|| anyhow!("unknown template '{}'", config.template))?;
    let user_data = config.user_data()?;

    let document = renderer
        .render(Some(&user_data))
        .with_context(|| format!("Failed to render template '{}'", config.template))?;

    let json = if args.pretty {
        document.to_json_pretty()?
    } else {
        document.to_json()?
    };

    tracing::info!("✅ Rendered {} ({} bytes)", renderer.name(), json.len());
    println!("{}", json);

    Ok(())
}
