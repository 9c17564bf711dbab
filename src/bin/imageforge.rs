//! CLI for ImageForge - prompt-to-image generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use imageforge::auth::{AuthClient, AuthMode, CredentialsForm, SessionStore};
use imageforge::studio::save_image;
use imageforge::{
    AspectRatio, GenerationRequest, ImageProvider, RelayProvider, StylePreset, VyroProvider,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imageforge")]
#[command(about = "Generate images from text prompts (Vyro API or inference relay)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a text prompt
    Generate(GenerateArgs),

    /// List available styles and aspect ratios
    Styles,

    /// Sign in, sign up, or sign out against the identity provider
    #[command(subcommand)]
    Account(AccountCommand),

    /// Run the inference relay service
    #[cfg(feature = "server")]
    Serve,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Style preset
    #[arg(short, long, default_value = "realistic")]
    style: StylePreset,

    /// Aspect ratio
    #[arg(short, long, default_value = "1:1")]
    aspect_ratio: AspectRatio,

    /// Directory the image is saved into
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Provider to use
    #[arg(short, long, value_enum, default_value = "vyro")]
    provider: ProviderArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Vyro,
    Relay,
}

#[derive(Subcommand)]
enum AccountCommand {
    /// Exchange email/password credentials for a session
    SignIn {
        /// Account email
        email: String,
        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    SignUp {
        /// Account email
        email: String,
        /// Account password (minimum 6 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            generate(args, cli.json).await?;
        }
        Commands::Styles => {
            list_styles(cli.json)?;
        }
        Commands::Account(command) => {
            account(command, cli.json).await?;
        }
        #[cfg(feature = "server")]
        Commands::Serve => {
            let config = imageforge::relay::RelayConfig::from_env()?;
            imageforge::relay::serve(config).await?;
        }
    }

    Ok(())
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let request = GenerationRequest::new(&args.prompt)
        .with_style(args.style)
        .with_aspect_ratio(args.aspect_ratio);

    let outcome = match args.provider {
        ProviderArg::Vyro => {
            let provider = VyroProvider::builder().build()?;
            provider.generate(&request).await?
        }
        ProviderArg::Relay => {
            let provider = RelayProvider::builder().build()?;
            provider.generate(&request).await?
        }
    };

    let client = reqwest::Client::new();
    let path = save_image(&client, &outcome.reference, &args.dir).await?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "output": path.display().to_string(),
            "prompt": outcome.prompt,
            "style": args.style.as_str(),
            "aspect_ratio": args.aspect_ratio.as_str(),
            "provider": outcome.provider.to_string(),
            "duration_ms": outcome.duration_ms,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Generated image: {} via {}",
            path.display(),
            outcome.provider
        );
        if let Some(duration) = outcome.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }

    Ok(())
}

async fn account(command: AccountCommand, json_output: bool) -> anyhow::Result<()> {
    let provider = AuthClient::builder().build()?;
    let store = SessionStore::new();

    match command {
        AccountCommand::SignIn { email, password } => {
            let mut form = CredentialsForm {
                mode: AuthMode::SignIn,
                email,
                password,
                ..CredentialsForm::new()
            };
            form.submit(&provider, &store).await?;

            let session = store
                .current()
                .ok_or_else(|| anyhow::anyhow!("provider returned no session"))?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&session)?);
            } else {
                println!("Signed in as {}", session.email);
            }
        }
        AccountCommand::SignUp { email, password } => {
            let mut form = CredentialsForm {
                mode: AuthMode::SignUp,
                email: email.clone(),
                confirm_password: password.clone(),
                password,
                ..CredentialsForm::new()
            };
            form.submit(&provider, &store).await?;

            if json_output {
                println!("{}", serde_json::json!({ "confirmation_sent": true, "email": email }));
            } else {
                println!("Check your email to confirm your account!");
            }
        }
    }

    Ok(())
}

fn list_styles(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let result = serde_json::json!({
            "styles": StylePreset::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "aspect_ratios": AspectRatio::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Styles:");
        for style in StylePreset::ALL {
            println!("  {} ({})", style.label(), style.as_str());
        }
        println!("\nAspect ratios:");
        for ratio in AspectRatio::ALL {
            println!("  {}", ratio.as_str());
        }
    }

    Ok(())
}
