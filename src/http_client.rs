use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::config::ScrapeConfig;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Process-wide blocking client. The first caller's timeout and user agent
/// win; later configs reuse the same client.
pub fn http_client(config: &ScrapeConfig) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to build http client")
    })
}

pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status} for {url}"));
    }
    Ok(body)
}

pub fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status} for {url}"));
    }
    let bytes = resp.bytes().context("failed reading body")?;
    Ok(bytes.to_vec())
}
