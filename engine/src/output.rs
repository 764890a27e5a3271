use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{Result, SkillError};

fn output_error(path: &Path) -> impl FnOnce(std::io::Error) -> SkillError + '_ {
    move |source| SkillError::Output {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `contents` to `path`, creating missing parent directories, and
/// returns the absolute path written.
pub fn save(path: &Path, contents: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error(parent))?;
    }
    fs::write(path, contents).map_err(output_error(path))?;
    Ok(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}

/// Prints a text response, and also saves it verbatim when `path` is set.
pub fn emit_text(out: &mut impl Write, text: &str, path: Option<&Path>) -> Result<Option<PathBuf>> {
    let stdout_err = |source| SkillError::Output {
        path: PathBuf::from("<stdout>"),
        source,
    };
    writeln!(out, "{text}").map_err(stdout_err)?;

    let Some(path) = path else {
        return Ok(None);
    };
    let saved = save(path, text.as_bytes())?;
    writeln!(out, "\nResponse saved: {}", saved.display()).map_err(stdout_err)?;
    Ok(Some(saved))
}

/// Saves generated media and reports where it went. The bytes themselves are
/// never printed.
pub fn emit_media(out: &mut impl Write, kind: &str, path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let saved = save(path, bytes)?;
    writeln!(
        out,
        "{kind} saved: {} ({} KB)",
        saved.display(),
        bytes.len() / 1024
    )
    .map_err(|source| SkillError::Output {
        path: PathBuf::from("<stdout>"),
        source,
    })?;
    Ok(saved)
}
