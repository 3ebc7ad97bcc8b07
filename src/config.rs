//! Configuration loading
//!
//! The filter is driven by an ini file with one `key<TAB>value` pair per
//! line. [`IniFile`] holds the raw mapping, [`FilterSettings`] the typed view
//! that the pipeline works from.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{FilterError, Result};
use crate::flags::{is_numeric, is_true, threshold};

/// Keys that must be present in every ini file
pub const REQUIRED_KEYS: &[&str] = &[
    "FILE",
    "OUT_DIR",
    "OVERWRITE",
    "only_snv",
    "only_indel",
    "chroms",
    "sample_name",
    "qual",
];

const DEFAULT_VCFTOOLS: &str = "vcftools";
const DEFAULT_JAVA: &str = "java";
const DEFAULT_JAVA_HEAP: &str = "4G";

/// Raw key/value mapping read from an ini file
#[derive(Debug, Clone, Default)]
pub struct IniFile {
    entries: HashMap<String, String>,
}

impl IniFile {
    /// Read an ini file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(FilterError::ConfigNotFound(path.to_path_buf()));
        }

        let file = File::open(path)
            .map_err(|e| FilterError::io(format!("Could not open ini file {:?}", path), e))?;

        let ini = Self::from_reader(BufReader::new(file))
            .map_err(|e| FilterError::io(format!("Could not read ini file {:?}", path), e))?;

        debug!("Read {} parameters from {:?}", ini.len(), path);
        Ok(ini)
    }

    /// Parse ini content from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut entries = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once('\t') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (line, ""),
            };
            entries.insert(key.to_string(), value.to_string());
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value of an optional key, empty if absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Keys from `keys` that are absent, in the order given
    pub fn missing(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter(|k| !self.contains(k))
            .map(|k| k.to_string())
            .collect()
    }

    /// Fail with every absent key if any of `keys` is missing
    pub fn require(&self, keys: &[&str]) -> Result<()> {
        let missing = self.missing(keys);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FilterError::MissingKeys(missing))
        }
    }
}

/// Typed filter settings, built once and never mutated
#[derive(Debug, Clone)]
pub struct FilterSettings {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub overwrite: bool,
    pub only_snv: bool,
    pub only_indel: bool,
    pub chroms: Vec<String>,
    pub sample_name: String,
    /// Minimum QUAL, passed verbatim to vcftools
    pub qual: Option<String>,
    pub max_alleles: Option<String>,
    pub blacklists: Vec<PathBuf>,
    /// Minimum MQ, passed verbatim to SnpSift
    pub mq: Option<String>,
    pub snpsift: Option<PathBuf>,
    pub vcftools: String,
    pub java: String,
    pub java_heap: String,
}

impl FilterSettings {
    /// Load and validate settings from an ini file
    pub fn load(path: &Path) -> Result<Self> {
        let ini = IniFile::from_path(path)?;
        Self::from_ini(&ini)
    }

    pub fn from_ini(ini: &IniFile) -> Result<Self> {
        ini.require(REQUIRED_KEYS)?;

        let get = |key: &str| ini.get_or_empty(key);
        let opt = |key: &str| {
            let value = threshold(get(key)).map(str::to_string);
            if let Some(ref v) = value {
                if !is_numeric(v) {
                    warn!("Threshold {} = '{}' is not numeric, passing it through as is", key, v);
                }
            }
            value
        };

        let mq = opt("MQ");
        let snpsift = Some(get("snpsift"))
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        if mq.is_some() && snpsift.is_none() {
            return Err(FilterError::MissingDependentKey {
                key: "snpsift".to_string(),
                reason: "MQ filtering is enabled".to_string(),
            });
        }

        let settings = Self {
            input: PathBuf::from(get("FILE")),
            out_dir: PathBuf::from(get("OUT_DIR")),
            overwrite: is_true(get("OVERWRITE")),
            only_snv: is_true(get("only_snv")),
            only_indel: is_true(get("only_indel")),
            chroms: split_list(get("chroms")),
            sample_name: get("sample_name").to_string(),
            qual: opt("qual"),
            max_alleles: opt("max_alleles"),
            blacklists: split_list(get("blacklists"))
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            mq,
            snpsift,
            vcftools: or_default(get("vcftools"), DEFAULT_VCFTOOLS),
            java: or_default(get("java"), DEFAULT_JAVA),
            java_heap: or_default(get("java_heap"), DEFAULT_JAVA_HEAP),
        };

        debug!("{:?}", settings);
        Ok(settings)
    }

    /// Force every stage to re-run
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite |= overwrite;
        self
    }

    /// True if the input is a gzip compressed VCF
    pub fn input_is_gzipped(&self) -> bool {
        self.input.to_string_lossy().ends_with(".gz")
    }
}

fn or_default(value: &str, default: &str) -> String {
    (if value.is_empty() { default } else { value }).to_string()
}

/// Split a comma separated list, dropping empty entries
fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const FULL_INI: &str = "\
# Somatic filter settings
FILE\t/data/sample.vcf.gz
OUT_DIR\t/data/out

OVERWRITE\tfalse
only_snv\ttrue
only_indel\tno
chroms\t1,2,X
sample_name\tCPCT0001
qual\t30
max_alleles\t2
blacklists\t/bl/a.txt, /bl/b.txt
MQ\t40
snpsift\t/opt/SnpSift.jar
";

    fn parse(s: &str) -> IniFile {
        IniFile::from_reader(s.as_bytes()).unwrap()
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let ini = parse("# comment\n\n   \nFILE\ta.vcf\n#qual\t30\nqual\t20\n");
        assert_eq!(ini.len(), 2);
        assert_eq!(ini.get("FILE"), Some("a.vcf"));
        assert_eq!(ini.get("qual"), Some("20"));
    }

    #[test]
    fn test_key_without_tab_has_empty_value() {
        let ini = parse("chroms\nsample_name\tS1\n");
        assert_eq!(ini.get("chroms"), Some(""));
        assert_eq!(ini.get("sample_name"), Some("S1"));
    }

    #[test]
    fn test_splits_on_first_tab_only() {
        let ini = parse("key\tvalue\twith tab\n");
        assert_eq!(ini.get("key"), Some("value\twith tab"));
    }

    #[test]
    fn test_missing_keys_are_all_reported() {
        let ini = parse("FILE\ta.vcf\nOUT_DIR\tout\nchroms\t1\n");
        match FilterSettings::from_ini(&ini) {
            Err(FilterError::MissingKeys(keys)) => assert_eq!(
                keys,
                vec!["OVERWRITE", "only_snv", "only_indel", "sample_name", "qual"]
            ),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_single_key() {
        let content = FULL_INI.replace("sample_name\tCPCT0001\n", "");
        match FilterSettings::from_ini(&parse(&content)) {
            Err(FilterError::MissingKeys(keys)) => assert_eq!(keys, vec!["sample_name"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_full_settings() {
        let settings = FilterSettings::from_ini(&parse(FULL_INI)).unwrap();

        assert_eq!(settings.input, PathBuf::from("/data/sample.vcf.gz"));
        assert!(settings.input_is_gzipped());
        assert_eq!(settings.out_dir, PathBuf::from("/data/out"));
        assert!(!settings.overwrite);
        assert!(settings.only_snv);
        assert!(!settings.only_indel);
        assert_eq!(settings.chroms, vec!["1", "2", "X"]);
        assert_eq!(settings.qual.as_deref(), Some("30"));
        assert_eq!(settings.max_alleles.as_deref(), Some("2"));
        assert_eq!(
            settings.blacklists,
            vec![PathBuf::from("/bl/a.txt"), PathBuf::from("/bl/b.txt")]
        );
        assert_eq!(settings.mq.as_deref(), Some("40"));
        assert_eq!(settings.snpsift, Some(PathBuf::from("/opt/SnpSift.jar")));
        assert_eq!(settings.vcftools, "vcftools");
        assert_eq!(settings.java, "java");
        assert_eq!(settings.java_heap, "4G");
    }

    #[test]
    fn test_optional_keys_default_to_disabled() {
        let ini = parse(
            "FILE\ta.vcf\nOUT_DIR\tout\nOVERWRITE\tyes\nonly_snv\tf\nonly_indel\tf\n\
             chroms\t\nsample_name\tS\nqual\t0\n",
        );
        let settings = FilterSettings::from_ini(&ini).unwrap();

        assert!(settings.overwrite);
        assert!(settings.chroms.is_empty());
        assert_eq!(settings.qual, None);
        assert_eq!(settings.max_alleles, None);
        assert!(settings.blacklists.is_empty());
        assert_eq!(settings.mq, None);
        assert!(!settings.input_is_gzipped());
    }

    #[test]
    fn test_mq_requires_snpsift() {
        let content = FULL_INI.replace("snpsift\t/opt/SnpSift.jar\n", "");
        match FilterSettings::from_ini(&parse(&content)) {
            Err(FilterError::MissingDependentKey { key, .. }) => assert_eq!(key, "snpsift"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_with_overwrite_only_turns_it_on() {
        let settings = FilterSettings::from_ini(&parse(FULL_INI)).unwrap();
        assert!(settings.clone().with_overwrite(true).overwrite);
        assert!(!settings.with_overwrite(false).overwrite);
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.ini");
        assert!(matches!(
            IniFile::from_path(&path),
            Err(FilterError::ConfigNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("filter.ini");
        let mut file = File::create(&path).unwrap();
        file.write_all(FULL_INI.as_bytes()).unwrap();

        let settings = FilterSettings::load(&path).unwrap();
        assert_eq!(settings.sample_name, "CPCT0001");
    }
}
