pub mod completions;
pub mod detect;
pub mod init;
pub mod run;

pub use completions::completions_command;
pub use detect::detect_command;
pub use init::init_command;
pub use run::run_command;

use anyhow::Result;
use tinkersan_core::{Detection, Settings, Tinker, WorkspaceContext};

use crate::cli::GlobalArgs;
use crate::logging::LogHandle;

/// Build the facade and detect root and framework for the command line context
pub(crate) fn detect(
    global: &GlobalArgs,
    settings: Settings,
    log: &LogHandle,
) -> Result<(Tinker, Detection)> {
    let ctx: WorkspaceContext = global.context()?;
    let mut tinker = Tinker::new(settings);
    let detection = tinker.detect(&ctx)?;
    if detection.verbose_logging {
        log.raise_to_debug();
    }
    Ok((tinker, detection))
}
