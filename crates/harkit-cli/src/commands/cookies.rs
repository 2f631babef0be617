use crate::OutputFormat;
use anyhow::Result;
use harkit_core::har::{Cookie, Har, HarReader};
use serde::Serialize;
use std::path::Path;

/// Cookies re-derived from one entry's current headers
#[derive(Debug, Clone, Serialize)]
pub struct EntryCookies {
    pub index: usize,
    pub url: String,
    pub request: Vec<Cookie>,
    pub response: Vec<Cookie>,
}

/// Re-derive cookies for every entry that carries any
pub fn collect(har: &Har) -> Vec<EntryCookies> {
    har.log
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| EntryCookies {
            index,
            url: entry.request.url.clone(),
            request: entry.request.derived_cookies(),
            response: entry.response.derived_cookies(),
        })
        .filter(|cookies| !cookies.request.is_empty() || !cookies.response.is_empty())
        .collect()
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Deriving cookies from HAR file: {}", file.display());

    let har = HarReader::from_file(file)?;
    let cookies = collect(&har);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cookies)?),
        OutputFormat::Pretty => output_pretty(&cookies),
    }

    Ok(())
}

fn output_pretty(entries: &[EntryCookies]) {
    use console::style;

    if entries.is_empty() {
        println!("{}", style("No cookies found").dim());
        return;
    }

    for entry in entries {
        println!("\n{} {}", style(format!("#{}", entry.index)).bold().cyan(), entry.url);
        for cookie in &entry.request {
            println!("  {} {}={}", style("sent").green(), cookie.name, cookie.value);
        }
        for cookie in &entry.response {
            let mut flags = Vec::new();
            if cookie.secure == Some(true) {
                flags.push("Secure");
            }
            if cookie.http_only == Some(true) {
                flags.push("HttpOnly");
            }
            if let Some(same_site) = &cookie.same_site {
                flags.push(same_site.as_str());
            }
            println!(
                "  {} {}={} {}",
                style("set ").yellow(),
                cookie.name,
                cookie.value,
                style(flags.join(" ")).dim()
            );
        }
    }
}
