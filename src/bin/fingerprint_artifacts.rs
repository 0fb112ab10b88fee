//! Record artifact fingerprints in a deployment manifest.
//!
//! Hashes every file `manifest.json` references and rewrites its `files`
//! map, so a later load with fingerprint verification detects edits.
//!
//! # Usage
//!
//! ```bash
//! fingerprint_artifacts <artifacts_dir>
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use cardiorisk::adapters::artifacts::{sha256_file, short_fingerprint, ArtifactManifest};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(dir) = args.next().map(PathBuf::from) else {
        bail!("Usage: fingerprint_artifacts <artifacts_dir>");
    };
    if args.next().is_some() {
        bail!("Unexpected extra arguments");
    }

    let mut manifest = ArtifactManifest::load(&dir)?;

    let mut files = BTreeMap::new();
    for file in manifest.referenced_files() {
        let digest = sha256_file(&dir.join(file))?;
        println!("{file}: sha256:{}", short_fingerprint(&digest));
        files.insert(file.to_string(), digest);
    }
    manifest.files = files;

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(&manifest, &mut ser)?;
    out.push(b'\n');

    let path = dir.join(ArtifactManifest::FILE_NAME);
    fs::write(&path, out).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
