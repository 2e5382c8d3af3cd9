use anyhow::Result;
use tinkersan_core::Tinker;

use super::detect;
use crate::cli::GlobalArgs;
use crate::logging::LogHandle;

pub fn completions_command(global: &GlobalArgs, all: bool, log: &LogHandle) -> Result<()> {
    let completions = if all {
        Tinker::new(global.settings()).completions(None)
    } else {
        let (tinker, detection) = detect(global, global.settings(), log)?;
        tinker.completions(Some(detection.framework()))
    };

    println!("{}", serde_json::to_string_pretty(&completions)?);
    Ok(())
}
