//! Boundary-condition artifact for the downstream simulator.
//!
//! One line per timestep, chronological. Each line holds an
//! `<ra> <dec> <insolation>` triplet per active source in id order, all
//! fields separated by single spaces. No header and no trailing newline.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use grahan_core::{CouplingError, SourceEphemeris};
use tracing::debug;

/// Render the artifact text for `sources` over `timesteps` rows.
pub fn format_boundary_rows(sources: &[SourceEphemeris], timesteps: usize) -> String {
    let mut out = String::with_capacity(timesteps * sources.len() * 48);
    for t in 0..timesteps {
        if t > 0 {
            out.push('\n');
        }
        for (i, eph) in sources.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let triplet = format!("{} {} {}", eph.ra_rad[t], eph.dec_rad[t], eph.insolation_wm2[t]);
            out.push_str(&triplet);
        }
    }
    out
}

/// Write `contents` to `dir/name`, replacing any previous artifact.
///
/// `name` may include subdirectories of `dir`; they must already exist.
///
/// The text goes to a hidden sibling first and is renamed into place, so
/// readers never observe a partial file.
pub fn write_boundary_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, CouplingError> {
    let target = dir.join(name);
    let file_name = target
        .file_name()
        .ok_or_else(|| CouplingError::Configuration(format!("output file {name:?} has no file name")))?
        .to_string_lossy()
        .into_owned();
    let staging = target.with_file_name(format!(".{file_name}.partial"));

    let result = (|| {
        let mut file = fs::File::create(&staging)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &target)
    })();
    if let Err(err) = result {
        if let Err(cleanup) = fs::remove_file(&staging) {
            debug!(path = %staging.display(), error = %cleanup, "staging file not removed");
        }
        return Err(err.into());
    }
    Ok(target)
}
