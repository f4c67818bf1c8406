//! xhs-mcp: MCP server for Xiaohongshu notes.
//!
//! Usage:
//!   xhs-mcp --mcp                       # Start MCP server (stdio)
//!   xhs-mcp --mcp --transport http      # Start MCP server (HTTP, port 8809)
//!   xhs-mcp check-cookie                # Check the session cookie
//!   xhs-mcp search <keywords>           # CLI search mode
//!   xhs-mcp note <url>                  # Print a note
//!
//! The session cookie is read from `--cookie` or `XHS_COOKIE`.

use clap::{Parser, Subcommand, ValueEnum};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::ServiceExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xhs_mcp::api::{ClientConfig, HttpXhsClient, XhsApi, DEFAULT_API_BASE};
use xhs_mcp::server::{self, XhsServer, DEFAULT_HTTP_PORT, MCP_HTTP_PATH};
use xhs_mcp::tools;

#[derive(Parser)]
#[command(name = "xhs-mcp")]
#[command(about = "MCP server for reading and commenting on Xiaohongshu notes")]
#[command(version)]
struct Cli {
    /// Run as MCP server
    #[arg(long)]
    mcp: bool,

    /// MCP transport used with --mcp
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Listen address (IP) for the HTTP transport
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Listen port for the HTTP transport
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// Session cookie of a logged-in web session
    #[arg(long, env = "XHS_COOKIE", hide_env_values = true)]
    cookie: String,

    /// Web API base URL
    #[arg(long, env = "XHS_BASE_URL", default_value = DEFAULT_API_BASE)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transport {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// Streamable HTTP on --host:--port
    Http,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the session cookie is still valid
    CheckCookie,

    /// Show the recommendation feed
    Feed,

    /// Search notes by keywords
    Search {
        /// Search keywords
        keywords: String,
    },

    /// Show a note's content
    Note {
        /// Note URL (with xsec_token) or id+token
        url: String,
    },

    /// Show a note's comments
    Comments {
        /// Note URL (with xsec_token) or id+token
        url: String,
    },

    /// Post a comment on a note
    Comment {
        /// Note id
        note_id: String,

        /// Comment text
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // CRITICAL: Log to stderr only (stdout is JSON-RPC for MCP)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("xhs_mcp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::new(cli.cookie)
        .with_base_url(cli.base_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    tracing::debug!(?config, "client configuration");
    let api: Arc<dyn XhsApi> = Arc::new(HttpXhsClient::new(config)?);

    if cli.mcp {
        match cli.transport {
            Transport::Stdio => run_mcp_server(api).await,
            Transport::Http => {
                let addr = server::http_address(&cli.host, cli.port)?;
                run_http_server(api, addr).await
            }
        }
    } else if let Some(cmd) = cli.command {
        run_cli(api.as_ref(), cmd).await
    } else {
        // Default: show help
        eprintln!("Use --mcp to start MCP server, or a subcommand for CLI mode.");
        eprintln!("Run with --help for more information.");
        std::process::exit(1);
    }
}

async fn run_mcp_server(api: Arc<dyn XhsApi>) -> anyhow::Result<()> {
    tracing::info!("Starting MCP server on stdio");

    let server = XhsServer::new(api);

    // Run the MCP server on stdin/stdout
    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

async fn run_http_server(api: Arc<dyn XhsApi>, addr: SocketAddr) -> anyhow::Result<()> {
    let service = StreamableHttpService::new(
        move || Ok(XhsServer::new(Arc::clone(&api))),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );
    let router = axum::Router::new().nest_service(MCP_HTTP_PATH, service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, path = MCP_HTTP_PATH, "Starting MCP server on streamable HTTP");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;

    Ok(())
}

async fn run_cli(api: &dyn XhsApi, cmd: Commands) -> anyhow::Result<()> {
    let text = match cmd {
        Commands::CheckCookie => tools::execute_check_cookie(api).await?,
        Commands::Feed => tools::execute_home_feed(api).await?,
        Commands::Search { keywords } => {
            tools::execute_search_notes(api, tools::SearchNotesInput { keywords }).await?
        }
        Commands::Note { url } => {
            tools::execute_get_note_content(api, tools::NoteInput { url }).await?
        }
        Commands::Comments { url } => {
            tools::execute_get_note_comments(api, tools::NoteInput { url }).await?
        }
        Commands::Comment { note_id, text } => {
            let input = tools::PostCommentInput {
                note_id,
                comment: text,
            };
            tools::execute_post_comment(api, input).await?
        }
    };

    println!("{text}");
    Ok(())
}
