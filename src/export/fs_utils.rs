// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask a yes/no question on stdout and read the answer from `input`.
/// Anything but `y`/`yes` counts as no.
fn confirm(prompt: &str, input: &mut impl BufRead) -> io::Result<bool> {
    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Check that the export target may be created or replaced.
///
/// The parent directory must exist. An existing file is only replaced with
/// `force` or after the user confirms.
pub(super) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.is_dir()
    {
        return Err(AppError::Export(format!(
            "target directory does not exist: {}",
            dir.display()
        )));
    }

    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));
    if confirm("Overwrite?", &mut io::stdin().lock())? {
        Ok(())
    } else {
        Err(AppError::Export(
            "export cancelled, existing file not overwritten".into(),
        ))
    }
}
