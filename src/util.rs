use std::io::Write;
use std::path::Path;

/// Write a string to `path` atomically: write to a sibling temp file,
/// then rename over the target so readers never observe a partial file.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)
}
