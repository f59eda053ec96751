use crate::controller::{ControllerClass, EchoController};
use crate::dispatcher::Dispatcher;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::{Request, Response};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use http::Method;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for brrtdispatch
///
/// Loads a route table bound to the echo controller and either lists it or
/// dispatches one simulated request through it.
#[derive(Debug, Parser)]
#[command(name = "brrtdispatch")]
#[command(about = "Route table inspection and request simulation", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print every route in a route table
    Routes {
        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        table: PathBuf,
    },
    /// Dispatch one request and print the response
    Request {
        /// Route table file (YAML or JSON)
        #[arg(short, long)]
        table: PathBuf,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request target, optionally with a query string
        #[arg(short, long)]
        path: String,

        /// Request cookie as name=value (repeatable)
        #[arg(long = "cookie")]
        cookies: Vec<String>,

        /// Request header as "Name: value" (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

/// One route table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    /// Action of the echo controller (`index`, `show`, ...)
    pub action: String,
}

/// Route table file contents
///
/// ```yaml
/// routes:
///   - { method: GET, path: /, action: index }
///   - { method: GET, path: "/pets/{id}", action: show }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteTable {
    /// Load a table; `.json` files are JSON, anything else YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let table = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON route table {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML route table {}", path.display()))?
        };
        Ok(table)
    }

    /// Build a router binding every entry to [`EchoController`].
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown method or a rejected route.
    pub fn build_router(&self) -> anyhow::Result<Router> {
        let echo = ControllerClass::of::<EchoController>();
        let mut router = Router::new();
        for entry in &self.routes {
            let method = parse_method(&entry.method)?;
            router
                .add(method, &entry.path, echo.clone(), &entry.action)
                .with_context(|| format!("Invalid route {} {}", entry.method, entry.path))?;
        }
        info!(routes_count = self.routes.len(), "Route table loaded");
        Ok(router)
    }
}

fn parse_method(method: &str) -> anyhow::Result<Method> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{method}'"))
}

/// Build the simulated request from CLI arguments.
///
/// # Errors
///
/// Returns an error for a malformed cookie, header, body or target.
pub fn build_request(
    method: &str,
    path: &str,
    cookies: &[String],
    headers: &[String],
    body: Option<&str>,
) -> anyhow::Result<Request> {
    let mut builder = http::Request::builder()
        .method(parse_method(method)?)
        .uri(path);

    for header in headers {
        let Some((name, value)) = header.split_once(':') else {
            bail!("Header '{header}' must look like 'Name: value'");
        };
        builder = builder.header(name.trim(), value.trim());
    }
    for cookie in cookies {
        let Some((name, value)) = cookie.split_once('=') else {
            bail!("Cookie '{cookie}' must look like 'name=value'");
        };
        let pair = format!("{}={}", name.trim(), urlencoding::encode(value));
        builder = builder.header(http::header::COOKIE, pair);
    }

    let bytes = match body {
        Some(raw) => {
            serde_json::from_str::<serde_json::Value>(raw).context("Request body must be JSON")?;
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
            raw.as_bytes().to_vec()
        }
        None => Vec::new(),
    };

    let request = builder.body(bytes).context("Invalid request")?;
    Ok(Request::from(request))
}

/// Write `response` as an HTTP/1.1 message.
///
/// # Errors
///
/// Returns an error if the response is not valid HTTP or writing fails.
pub fn write_response(out: &mut impl Write, response: &Response) -> anyhow::Result<()> {
    let http = response.to_http().context("Response is not valid HTTP")?;
    writeln!(out, "HTTP/1.1 {} {}", response.status(), response.reason())?;
    for (name, value) in http.headers() {
        writeln!(out, "{}: {}", name, value.to_str().unwrap_or("<binary>"))?;
    }
    writeln!(out)?;
    let body = http.body();
    if !body.is_empty() {
        out.write_all(body)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Execute a parsed command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if the route table cannot be loaded or the request
/// cannot be built.
pub fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Routes { table } => {
            let router = RouteTable::load(table)?.build_router()?;
            for route in router.routes() {
                writeln!(out, "{route}")?;
            }
            Ok(())
        }
        Commands::Request {
            table,
            method,
            path,
            cookies,
            headers,
            body,
        } => {
            let router = RouteTable::load(table)?.build_router()?;
            let dispatcher = Dispatcher::with_config(router, RuntimeConfig::from_env());
            let request = build_request(method, path, cookies, headers, body.as_deref())?;
            let response = dispatcher.call(request);
            write_response(out, &response)
        }
    }
}

/// Run the CLI using arguments from the process environment.
///
/// # Errors
///
/// Returns any error raised by the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}
