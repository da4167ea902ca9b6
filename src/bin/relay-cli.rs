use std::collections::BTreeMap;

use clap::{Parser, ValueEnum};
use serde_json::Value;

use api_relay::relay::{RelayMethod, RelayRequest};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Send a request through a running api-relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// HTTP method issued upstream
    #[arg(value_enum)]
    method: Method,

    /// Upstream path, appended to the relay's base URL
    endpoint: String,

    /// Query parameter, repeatable (key=value)
    #[arg(short, long = "query", value_parser = parse_query)]
    query: Vec<(String, String)>,

    /// Header, repeatable (Name: value)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// JSON payload
    #[arg(short, long, value_parser = parse_json)]
    data: Option<Value>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for RelayMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => RelayMethod::Get,
            Method::Post => RelayMethod::Post,
            Method::Put => RelayMethod::Put,
            Method::Patch => RelayMethod::Patch,
            Method::Delete => RelayMethod::Delete,
        }
    }
}

fn split_pair(s: &str, sep: char) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected '{}' in '{}'", sep, s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty name in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn parse_query(s: &str) -> Result<(String, String), String> {
    split_pair(s, '=')
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    split_pair(s, ':')
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON payload: {}", e))
}

fn build_request(cli: &Cli) -> RelayRequest {
    let collect = |pairs: &[(String, String)]| -> Option<BTreeMap<String, String>> {
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.iter().cloned().collect())
        }
    };

    RelayRequest {
        endpoint: Some(cli.endpoint.clone()),
        method: cli.method.into(),
        payload: cli.data.clone(),
        query: collect(&cli.query),
        headers: collect(&cli.headers),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/relay", cli.url.trim_end_matches('/')))
        .json(&build_request(&cli))
        .send()
        .await?;

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }

    println!("{}", rendered);
    Ok(())
}
