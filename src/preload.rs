//! Index preloading: glob ingestion followed by module registration.

use crate::config::GlobSource;
use crate::index::CrossRefIndex;
use crate::source::SourceUnit;

/// Fill `index` from the configured glob source, then register every unit's
/// module. Unreadable glob files only produce warnings.
pub fn preload(index: &mut CrossRefIndex, units: &[SourceUnit], source: &GlobSource) {
    match source {
        GlobSource::None => {}
        GlobSource::PerUnit => {
            for unit in units {
                let glob = unit.glob_path();
                if let Err(e) = index.merge_glob_file(Some(unit), &glob) {
                    tracing::warn!(
                        module = %unit.module,
                        "{e}; links for this module will be missing"
                    );
                }
            }
        }
        GlobSource::Combined(path) => {
            if let Err(e) = index.merge_glob_file(None, path) {
                tracing::warn!("{e}; no cross-reference links will be produced");
            }
        }
    }

    for unit in units {
        index.register_module(&unit.module);
    }
}
