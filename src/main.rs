use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use eink_photo::{FaceBox, FramePreparer, Palette};
use inkframe::api;
use inkframe::models::{AppConfig, InputFormat, Location};
use inkframe::rendering::{calibration, decode_image};
use inkframe::server;
use inkframe::services::prepare_artifacts;

#[derive(Parser)]
#[command(name = "inkframe")]
#[command(about = "Inkframe - photo pipeline and random image server for color e-ink frames")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Crop, tone and dither a local image to a PNG file
    Process {
        /// Input image (jpg, png, webp; heic/heif with the heif feature)
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// JSON file with face boxes: [{"left", "top", "width", "height"}]
        #[arg(long)]
        faces: Option<PathBuf>,
    },
    /// Write a palette calibration chart and a palette.json to edit
    Calibrate {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inkframe API",
        description = "Photo pipeline and random image server for color e-ink frames",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_event,
        api::handle_upload_url,
        api::handle_upload,
        api::handle_random_image,
        api::handle_image,
    ),
    components(schemas(
        api::ObjectCreatedEvent,
        api::events::EventDetail,
        api::events::BucketRef,
        api::events::ObjectRef,
        api::ProcessResponse,
        api::UploadUrlResponse,
        api::RandomImageResponse,
        api::ImageMetadata,
        Location,
    )),
    tags(
        (name = "Pipeline", description = "Upload processing"),
        (name = "Upload", description = "Signed uploads"),
        (name = "Images", description = "Image selection and delivery")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Process {
            input,
            output,
            faces,
        }) => run_process_command(&input, &output, faces.as_deref()),
        Some(Commands::Calibrate { output }) => run_calibrate_command(&output),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkframe=warn,eink_photo=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn load_config() -> AppConfig {
    let config_file = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yaml".to_string());
    AppConfig::load_from_file(Path::new(&config_file)).with_env_overrides()
}

/// Run the image pipeline on a local file (no server or stores needed)
fn run_process_command(input: &Path, output: &Path, faces: Option<&Path>) -> anyhow::Result<()> {
    init_cli_logging();

    let config = load_config();
    let palette = server::load_configured_palette(&config);

    let bytes = std::fs::read(input)?;
    let format = InputFormat::from_key(&input.to_string_lossy()).unwrap_or(InputFormat::Jpeg);
    let decoded = decode_image(&bytes, format)
        .map_err(|e| anyhow::anyhow!("Failed to decode {}: {e}", input.display()))?;

    let faces: Vec<FaceBox> = match faces {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };

    let preparer = FramePreparer::new(palette)
        .target(config.frame.width, config.frame.height)
        .tone(config.tone.to_options())
        .face_margin(config.faces.margin);
    let artifacts = prepare_artifacts(&preparer, &decoded.image, &faces, false)?;

    std::fs::write(output, &artifacts.dithered_png)?;
    println!(
        "Processed {} -> {} ({}x{}, {} bytes)",
        input.display(),
        output.display(),
        config.frame.width,
        config.frame.height,
        artifacts.dithered_png.len()
    );

    Ok(())
}

/// Write palette_test.png and palette.json for the built-in palette
fn run_calibrate_command(output: &Path) -> anyhow::Result<()> {
    init_cli_logging();

    std::fs::create_dir_all(output)?;
    let palette = Palette::default_eink();

    let chart_path = output.join("palette_test.png");
    calibration::render_calibration_chart(&palette).save(&chart_path)?;
    println!("Wrote {}", chart_path.display());

    let palette_path = output.join("palette.json");
    std::fs::write(&palette_path, calibration::palette_json(&palette)?)?;
    println!("Wrote {}", palette_path.display());

    Ok(())
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let palette_path = std::env::var("PALETTE_PATH").ok();
    let data_dir = std::env::var("DATA_DIR").ok();

    println!("Inkframe v{VERSION}");
    println!("Photo pipeline for color e-ink frames\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR    = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE  = {}",
        config_file.as_deref().unwrap_or("config.yaml (default)")
    );
    println!(
        "  PALETTE_PATH = {}",
        palette_path.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  DATA_DIR     = {}",
        data_dir.as_deref().unwrap_or("(not set)")
    );

    let config_path = PathBuf::from(config_file.as_deref().unwrap_or("config.yaml"));
    println!("\nSources:");
    println!(
        "  Config:  {}",
        if config_path.exists() {
            config_path.display().to_string()
        } else {
            "defaults (file not found)".to_string()
        }
    );

    let config = AppConfig::load_from_file(&config_path).with_env_overrides();
    let palette = config.resolved_palette_path();
    println!(
        "  Palette: {}",
        if palette.exists() {
            palette.display().to_string()
        } else {
            "built-in (file not found)".to_string()
        }
    );
    println!("  Data:    {}", config.storage.data_dir.display());

    println!("\nCommands:");
    println!("  inkframe serve       Start the HTTP server");
    println!("  inkframe process     Dither a local image to PNG");
    println!("  inkframe calibrate   Write a palette calibration chart");
    println!("\nRun 'inkframe --help' for more details.");
}

async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkframe=info,eink_photo=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = load_config();

    tracing::info!(
        data_dir = %config.storage.data_dir.display(),
        bucket = %config.storage.bucket,
        public_url = %config.server.public_url,
        "Storage configured"
    );

    let state = server::create_app_state(config).await?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Inkframe server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
