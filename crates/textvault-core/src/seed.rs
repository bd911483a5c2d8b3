//! Sample input files in mixed encodings

use crate::activity::ActivityLog;
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// A sample file: name, content, and the encoding it is written in.
pub const SAMPLES: &[(&str, &str, TextEncoding)] = &[
    ("example1.txt", "Hello, World!", TextEncoding::Utf8),
    ("example2.txt", "Привет, мир!", TextEncoding::Utf8),
    ("example3.txt", "¡Hola mundo!", TextEncoding::Latin1),
    ("example4.txt", "Hola mundo!", TextEncoding::Ascii),
    ("example5.txt", "Hello, World", TextEncoding::Ascii),
];

/// Write [`SAMPLES`] into `raw_dir`, overwriting files of the same name.
pub fn seed_samples(raw_dir: &Utf8Path, log: &ActivityLog) -> Result<Vec<Utf8PathBuf>> {
    fs::create_dir_all(raw_dir)?;

    let mut written = Vec::with_capacity(SAMPLES.len());
    for (name, content, encoding) in SAMPLES {
        let path = raw_dir.join(name);
        let bytes = encoding
            .encode(content)
            .ok_or_else(|| Error::encode(*name, encoding.label()))?;
        fs::write(&path, bytes)?;

        log.record(format!(
            "File '{}' created with encoding '{}' and content: {}",
            path, encoding, content
        ));
        written.push(path);
    }

    log.record("Example files created successfully.");
    Ok(written)
}
