//! Output directory management
//!
//! Canonical file names for each stage, temporary file handling and
//! directory setup.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{FilterError, Result};

/// Suffix vcftools appends to the `--out` prefix of recoded output
pub const RECODE_SUFFIX: &str = ".recode.vcf";

/// Marker used for the names of intermediate blacklist files
pub const TEMP_MARKER: &str = "temp";

/// Output file names for one sample
#[derive(Debug, Clone)]
pub struct OutputLayout {
    out_dir: PathBuf,
    sample: String,
}

impl OutputLayout {
    pub fn new(out_dir: &Path, sample: &str) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            sample: sample.to_string(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// `--out` prefix for the quality filter
    pub fn quality_prefix(&self) -> PathBuf {
        self.out_dir.join(format!("{}_somatic_filtered", self.sample))
    }

    pub fn quality_vcf(&self) -> PathBuf {
        recoded(&self.quality_prefix())
    }

    pub fn blacklist_vcf(&self) -> PathBuf {
        self.out_dir
            .join(format!("{}_somatic_filtered_noblacklist.vcf", self.sample))
    }

    pub fn mq_vcf(&self) -> PathBuf {
        self.out_dir
            .join(format!("{}_somatic_filtered_noblacklist_MQ.vcf", self.sample))
    }

    /// `--out` prefix for the n-th (1-based) blacklist pass
    pub fn temp_prefix(&self, n: usize) -> PathBuf {
        self.out_dir.join(format!("{}{}", TEMP_MARKER, n))
    }
}

/// Path of the file vcftools writes for a given `--out` prefix
pub fn recoded(prefix: &Path) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(RECODE_SUFFIX);
    PathBuf::from(name)
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!("Creating output directory {:?}", path);
        fs::create_dir_all(path).map_err(|e| {
            FilterError::io(format!("Could not create output directory {:?}", path), e)
        })?;
    }
    Ok(())
}

/// Move a finished intermediate file to its canonical name
pub fn promote(from: &Path, to: &Path) -> Result<()> {
    debug!("Renaming {:?} to {:?}", from, to);
    fs::rename(from, to)
        .map_err(|e| FilterError::io(format!("Could not rename {:?} to {:?}", from, to), e))
}

/// True for names vcftools writes under a `temp<N>` prefix, e.g. `temp2.log`
pub fn is_temp_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix(TEMP_MARKER) else {
        return false;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && rest[digits..].starts_with('.')
}

/// Delete the `temp<N>.*` files directly inside `dir`
///
/// Other files are left alone, even when the sample name contains "temp".
/// Returns the removed paths.
pub fn remove_temp_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let is_temp = entry.file_name().to_str().map_or(false, is_temp_name);

        if is_temp && entry.file_type().is_file() {
            let path = entry.into_path();
            fs::remove_file(&path)
                .map_err(|e| FilterError::io(format!("Could not remove {:?}", path), e))?;
            debug!("Removed {:?}", path);
            removed.push(path);
        }
    }

    Ok(removed)
}

/// Size of a file in bytes, if it exists
pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_names() {
        let layout = OutputLayout::new(Path::new("/out"), "S1");

        assert_eq!(layout.quality_prefix(), PathBuf::from("/out/S1_somatic_filtered"));
        assert_eq!(
            layout.quality_vcf(),
            PathBuf::from("/out/S1_somatic_filtered.recode.vcf")
        );
        assert_eq!(
            layout.blacklist_vcf(),
            PathBuf::from("/out/S1_somatic_filtered_noblacklist.vcf")
        );
        assert_eq!(
            layout.mq_vcf(),
            PathBuf::from("/out/S1_somatic_filtered_noblacklist_MQ.vcf")
        );
        assert_eq!(recoded(&layout.temp_prefix(3)), PathBuf::from("/out/temp3.recode.vcf"));
    }

    #[test]
    fn test_ensure_output_dir_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a").join("b");

        ensure_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_output_dir(&dir).unwrap();
    }

    #[test]
    fn test_remove_temp_files_only_touches_temp_names() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        for name in ["temp1.recode.vcf", "temp1.log", "temp2.recode.vcf", "S1_somatic_filtered.recode.vcf"] {
            fs::write(dir.join(name), "x").unwrap();
        }

        let mut removed = remove_temp_files(dir).unwrap();
        removed.sort();

        assert_eq!(removed.len(), 3);
        assert!(dir.join("S1_somatic_filtered.recode.vcf").exists());
        assert!(!dir.join("temp1.log").exists());
    }

    #[test]
    fn test_is_temp_name() {
        assert!(is_temp_name("temp1.recode.vcf"));
        assert!(is_temp_name("temp12.log"));
        assert!(!is_temp_name("temp.log"));
        assert!(!is_temp_name("temp1"));
        assert!(!is_temp_name("temp_S1_somatic_filtered.recode.vcf"));
        assert!(!is_temp_name("temp1x.log"));
        assert!(!is_temp_name("S1_temp1.log"));
    }

    #[test]
    fn test_remove_temp_files_keeps_sample_named_temp() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let kept = [
            "temp_S1_somatic_filtered.recode.vcf",
            "temp_S1_somatic_filtered.log",
            "Contempo3_somatic_filtered_noblacklist.vcf",
        ];
        for name in kept.iter().chain(["temp1.recode.vcf", "temp2.log"].iter()) {
            fs::write(dir.join(name), "x").unwrap();
        }

        let removed = remove_temp_files(dir).unwrap();

        assert_eq!(removed.len(), 2);
        for name in kept {
            assert!(dir.join(name).exists(), "{} was removed", name);
        }
        assert!(!dir.join("temp1.recode.vcf").exists());
        assert!(!dir.join("temp2.log").exists());
    }

    #[test]
    fn test_remove_temp_files_ignores_parent_name() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("temp_results");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("S1_somatic_filtered_noblacklist.vcf"), "x").unwrap();

        let removed = remove_temp_files(&dir).unwrap();
        assert!(removed.is_empty());
        assert!(dir.join("S1_somatic_filtered_noblacklist.vcf").exists());
    }

    #[test]
    fn test_promote_and_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("temp2.recode.vcf");
        let to = temp_dir.path().join("final.vcf");
        fs::write(&from, "hello").unwrap();

        promote(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(file_size(&to), Some(5));
        assert_eq!(file_size(&from), None);
    }
}
