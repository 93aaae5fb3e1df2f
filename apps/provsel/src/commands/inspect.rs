use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use provsel_core::{CmsDecoder, ProfileDecoder};

#[derive(Debug, Args)]
#[command(arg_required_else_help = true)]
pub struct InspectArgs {
    /// Profile files to classify
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
    /// Seconds allowed for each `security cms` decode
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub decode_timeout: u64,
}

pub async fn execute(args: InspectArgs) -> Result<()> {
    let decoder = CmsDecoder::with_timeout(Duration::from_secs(args.decode_timeout));

    for file in &args.files {
        let Some(payload) = decoder.decode(file).await else {
            println!("?? {}  (unreadable)", file.display());
            continue;
        };

        let expires = payload
            .expiration_date
            .map(|date| {
                DateTime::<Utc>::from(SystemTime::from(date))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:<10}  {}  UUID={}  team={}  bundleID={}  exp={}",
            payload.kind().as_str(),
            payload.display_name(),
            payload.uuid(),
            payload.team(),
            payload.bundle_id(),
            expires,
        );
    }

    Ok(())
}
