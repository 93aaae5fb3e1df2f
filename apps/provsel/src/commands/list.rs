use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use provsel_core::{decode_installed_profiles, installed_profiles_dir, CmsDecoder};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory holding installed profiles (default: ~/Library/MobileDevice/Provisioning Profiles)
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,
    /// Seconds allowed for each `security cms` decode
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub decode_timeout: u64,
}

struct Row {
    kind: &'static str,
    name: String,
    uuid: String,
    team: String,
    bundle_id: String,
    expires: SystemTime,
}

pub async fn execute(args: ListArgs) -> Result<()> {
    let dir = match args.profiles_dir {
        Some(dir) => dir,
        None => installed_profiles_dir()?,
    };

    let decoder = CmsDecoder::with_timeout(Duration::from_secs(args.decode_timeout));
    let decoded = decode_installed_profiles(&decoder, &dir).await?;

    let mut rows: Vec<Row> = decoded
        .iter()
        // Rows without an identity are not worth listing.
        .filter(|profile| {
            !profile.payload.uuid().is_empty() && !profile.payload.application_identifier().is_empty()
        })
        .map(|profile| Row {
            kind: profile.payload.kind().as_str(),
            name: profile.payload.display_name().to_string(),
            uuid: profile.payload.uuid().to_string(),
            team: profile.payload.team().to_string(),
            bundle_id: profile.payload.bundle_id().to_string(),
            expires: profile
                .payload
                .expiration_date
                .map(SystemTime::from)
                .unwrap_or(UNIX_EPOCH),
        })
        .collect();

    if rows.is_empty() {
        println!("(no profiles installed in {})", dir.display());
        return Ok(());
    }

    rows.sort_by(|a, b| {
        (a.kind, &a.bundle_id, a.expires).cmp(&(b.kind, &b.bundle_id, b.expires))
    });
    for row in &rows {
        println!(
            "{:<10}  {}  UUID={}  team={}  bid={}  exp={}",
            row.kind,
            row.name,
            row.uuid,
            row.team,
            row.bundle_id,
            DateTime::<Utc>::from(row.expires).format("%Y-%m-%d"),
        );
    }

    Ok(())
}
