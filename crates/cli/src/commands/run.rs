use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::path::Path;
use tinkersan_core::ComposerOptions;
use tracing::{debug, info};

use super::detect;
use crate::cli::GlobalArgs;
use crate::logging::LogHandle;

pub fn run_command(
    global: &GlobalArgs,
    code: Option<&str>,
    file: Option<&Path>,
    dry_run: bool,
    keep_bootstrap_output: bool,
    log: &LogHandle,
) -> Result<()> {
    let code = read_snippet(code, file)?;
    debug!("Running {} bytes of PHP", code.len());

    let mut global = global.clone();
    if global.active_file.is_none() {
        // A snippet file inside the project doubles as the active file
        global.active_file = file.filter(|f| f.as_os_str() != "-").map(Path::to_path_buf);
    }

    let settings = global.settings().with_composer_options(ComposerOptions {
        discard_bootstrap_output: !keep_bootstrap_output,
        ..ComposerOptions::default()
    });
    let (tinker, detection) = detect(&global, settings, log)?;
    let prepared = tinker.prepare_detected(detection, &code)?;

    if dry_run {
        eprintln!("Project root: {}", prepared.root.display());
        eprintln!("Framework: {}", prepared.framework);
        println!("{}", prepared.script);
        return Ok(());
    }

    info!(
        "Running {} snippet in {}",
        prepared.framework,
        prepared.root.display()
    );
    let output = tinker
        .run(&prepared)
        .with_context(|| format!("Failed to run PHP in {}", prepared.root.display()))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.text.as_bytes())?;
    if !output.text.is_empty() && !output.text.ends_with('\n') {
        writeln!(stdout)?;
    }
    stdout.flush()?;

    if !output.success {
        std::process::exit(output.exit_code.unwrap_or(1));
    }
    Ok(())
}

fn read_snippet(code: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (code, file) {
        (Some(code), _) => Ok(code.to_string()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read PHP code from stdin")?;
            Ok(code)
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => bail!("No PHP code given: pass it with -e or as a file"),
    }
}
