use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use provsel_core::{
    installed_profiles_dir, render_env_file, scan_candidates, CmsDecoder, SAFARI_WEB_EXTENSION,
};

/// Fixed token the signing pipeline greps for when nothing qualifies.
pub const NO_PROFILE_SENTINEL: &str = "NO_PROFILE_WITH_SAFARI_EXTENSION_ENTITLEMENT";

pub const DEFAULT_ENV_FILE: &str = ".provtmp/sel.env";

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Directory holding installed profiles (default: ~/Library/MobileDevice/Provisioning Profiles)
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,
    /// Env file written for the signing pipeline
    #[arg(long, short, value_name = "FILE", default_value = DEFAULT_ENV_FILE)]
    pub output: PathBuf,
    /// Extension point the selected profile must be entitled to
    #[arg(long, value_name = "ID", default_value = SAFARI_WEB_EXTENSION)]
    pub extension_point: String,
    /// Seconds allowed for each `security cms` decode
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub decode_timeout: u64,
}

pub async fn execute(args: SelectArgs) -> Result<()> {
    let dir = match args.profiles_dir {
        Some(dir) => dir,
        None => installed_profiles_dir()?,
    };

    let decoder = CmsDecoder::with_timeout(Duration::from_secs(args.decode_timeout));
    let candidates = scan_candidates(&decoder, &dir, &args.extension_point).await?;

    // First in enumeration order wins; nothing qualifying is a distinct,
    // grep-able outcome and must not touch the output file.
    let Some(best) = candidates.first() else {
        println!("{NO_PROFILE_SENTINEL}");
        std::process::exit(2);
    };
    log::debug!(
        "selected {} ({} candidate(s))",
        best.path.display(),
        candidates.len()
    );

    tokio::fs::write(&args.output, render_env_file(best))
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("{}", best.name);
    println!("{}", best.uuid);
    println!("{}", best.team);
    println!("{}", best.bundle_id);

    Ok(())
}
