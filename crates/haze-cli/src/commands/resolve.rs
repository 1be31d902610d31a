//! Settings resolution command

use super::{load_settings, parse_platform};
use anyhow::{bail, Result};
use haze_core::{resolve, PlatformProbe, PlatformTier};

pub struct ResolveArgs {
    pub settings: Option<String>,
    pub platform: Option<String>,
    pub user_agent: Option<String>,
    pub touch_points: u32,
    pub screen_width: u32,
    pub reduced_motion: bool,
    pub format: String,
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let store = load_settings(args.settings.as_deref())?;

    let tier = match (&args.platform, &args.user_agent) {
        (Some(name), _) => parse_platform(name)?,
        (None, Some(ua)) => {
            let tier = PlatformTier::classify(&PlatformProbe {
                user_agent: ua.clone(),
                max_touch_points: args.touch_points,
                screen_width: args.screen_width,
            });
            log::info!("user agent classified as {}", tier);
            tier
        }
        (None, None) => PlatformTier::Desktop,
    };

    let config = resolve(&store, tier, args.reduced_motion);

    match args.format.as_str() {
        "toml" => print!("{}", toml::to_string_pretty(&config)?),
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        other => bail!("unknown format '{}'; valid values: toml, json", other),
    }

    Ok(())
}
