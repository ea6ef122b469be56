//! Storage options for a table, and the partial update applied by
//! `SetOptions`.

use crate::errors::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on option comment length.
const MAX_COMMENT_LENGTH: usize = 1024;

/// Upper bound on gc grace, one year in seconds.
const MAX_GC_GRACE_SECONDS: u32 = 365 * 24 * 3600;

/// Compaction strategy for a table's data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactionStrategy {
    SizeTiered,
    Leveled,
}

impl FromStr for CompactionStrategy {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "size_tiered" => Ok(CompactionStrategy::SizeTiered),
            "leveled" => Ok(CompactionStrategy::Leveled),
            other => Err(CommonError::invalid_input(format!(
                "unknown compaction strategy: {}",
                other
            ))),
        }
    }
}

/// On-disk compression algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    None,
    Lz4,
    Snappy,
    Deflate,
}

impl FromStr for Compression {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Compression::None),
            "lz4" => Ok(Compression::Lz4),
            "snappy" => Ok(Compression::Snappy),
            "deflate" => Ok(Compression::Deflate),
            other => Err(CommonError::invalid_input(format!(
                "unknown compression algorithm: {}",
                other
            ))),
        }
    }
}

/// Row/key cache population policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachingPolicy {
    All,
    KeysOnly,
    RowsOnly,
    None,
}

impl FromStr for CachingPolicy {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CachingPolicy::All),
            "keys_only" => Ok(CachingPolicy::KeysOnly),
            "rows_only" => Ok(CachingPolicy::RowsOnly),
            "none" => Ok(CachingPolicy::None),
            other => Err(CommonError::invalid_input(format!(
                "unknown caching policy: {}",
                other
            ))),
        }
    }
}

/// Storage options attached to a table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Free-form table comment.
    #[serde(default)]
    pub comment: String,

    /// Chance of read-repairing a read, in `[0, 1]`.
    #[serde(default = "default_read_repair_chance")]
    pub read_repair_chance: f64,

    /// Grace period before tombstones are collected, in seconds.
    #[serde(default = "default_gc_grace_seconds")]
    pub gc_grace_seconds: u32,

    /// Bloom filter false-positive target, in `(0, 1]`; `None` keeps the
    /// engine default.
    #[serde(default)]
    pub bloom_filter_fp_chance: Option<f64>,

    #[serde(default = "default_compaction_strategy")]
    pub compaction_strategy: CompactionStrategy,

    #[serde(default = "default_compression")]
    pub compression: Compression,

    #[serde(default = "default_caching")]
    pub caching: CachingPolicy,
}

fn default_read_repair_chance() -> f64 {
    0.1
}

fn default_gc_grace_seconds() -> u32 {
    864_000
}

fn default_compaction_strategy() -> CompactionStrategy {
    CompactionStrategy::SizeTiered
}

fn default_compression() -> Compression {
    Compression::Snappy
}

fn default_caching() -> CachingPolicy {
    CachingPolicy::KeysOnly
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            comment: String::new(),
            read_repair_chance: default_read_repair_chance(),
            gc_grace_seconds: default_gc_grace_seconds(),
            bloom_filter_fp_chance: None,
            compaction_strategy: default_compaction_strategy(),
            compression: default_compression(),
            caching: default_caching(),
        }
    }
}

/// Partial update over [`TableOptions`].
///
/// `None` fields are left unchanged. The whole update validates before any
/// field is applied, so an invalid update never half-applies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableOptionsUpdate {
    pub comment: Option<String>,
    pub read_repair_chance: Option<f64>,
    pub gc_grace_seconds: Option<u32>,
    pub bloom_filter_fp_chance: Option<f64>,
    pub compaction_strategy: Option<CompactionStrategy>,
    pub compression: Option<Compression>,
    pub caching: Option<CachingPolicy>,
}

impl TableOptionsUpdate {
    /// Validates every provided option against its legality rules.
    pub fn validate(&self) -> Result<(), CommonError> {
        if let Some(comment) = &self.comment {
            if comment.len() > MAX_COMMENT_LENGTH {
                return Err(CommonError::invalid_input(format!(
                    "comment exceeds {} bytes",
                    MAX_COMMENT_LENGTH
                )));
            }
        }
        if let Some(chance) = self.read_repair_chance {
            if !(0.0..=1.0).contains(&chance) {
                return Err(CommonError::invalid_input(format!(
                    "read_repair_chance must be between 0 and 1, got {}",
                    chance
                )));
            }
        }
        if let Some(grace) = self.gc_grace_seconds {
            if grace > MAX_GC_GRACE_SECONDS {
                return Err(CommonError::invalid_input(format!(
                    "gc_grace_seconds must not exceed {}, got {}",
                    MAX_GC_GRACE_SECONDS, grace
                )));
            }
        }
        if let Some(fp) = self.bloom_filter_fp_chance {
            if !(fp > 0.0 && fp <= 1.0) {
                return Err(CommonError::invalid_input(format!(
                    "bloom_filter_fp_chance must be in (0, 1], got {}",
                    fp
                )));
            }
        }
        Ok(())
    }

    /// Applies every provided option to `options`. Callers validate first.
    pub fn apply_to(&self, options: &mut TableOptions) {
        if let Some(comment) = &self.comment {
            options.comment = comment.clone();
        }
        if let Some(chance) = self.read_repair_chance {
            options.read_repair_chance = chance;
        }
        if let Some(grace) = self.gc_grace_seconds {
            options.gc_grace_seconds = grace;
        }
        if let Some(fp) = self.bloom_filter_fp_chance {
            options.bloom_filter_fp_chance = Some(fp);
        }
        if let Some(strategy) = self.compaction_strategy {
            options.compaction_strategy = strategy;
        }
        if let Some(compression) = self.compression {
            options.compression = compression;
        }
        if let Some(caching) = self.caching {
            options.caching = caching;
        }
    }
}

impl fmt::Display for TableOptionsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(c) = &self.comment {
            parts.push(format!("comment={:?}", c));
        }
        if let Some(v) = self.read_repair_chance {
            parts.push(format!("read_repair_chance={}", v));
        }
        if let Some(v) = self.gc_grace_seconds {
            parts.push(format!("gc_grace_seconds={}", v));
        }
        if let Some(v) = self.bloom_filter_fp_chance {
            parts.push(format!("bloom_filter_fp_chance={}", v));
        }
        if let Some(v) = self.compaction_strategy {
            parts.push(format!("compaction_strategy={:?}", v));
        }
        if let Some(v) = self.compression {
            parts.push(format!("compression={:?}", v));
        }
        if let Some(v) = self.caching {
            parts.push(format!("caching={:?}", v));
        }
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bounds() {
        assert!(TableOptionsUpdate::default().validate().is_ok());

        let bad_chance = TableOptionsUpdate {
            read_repair_chance: Some(1.5),
            ..Default::default()
        };
        assert!(bad_chance.validate().is_err());

        let bad_bloom = TableOptionsUpdate {
            bloom_filter_fp_chance: Some(0.0),
            ..Default::default()
        };
        assert!(bad_bloom.validate().is_err());

        let bad_grace = TableOptionsUpdate {
            gc_grace_seconds: Some(MAX_GC_GRACE_SECONDS + 1),
            ..Default::default()
        };
        assert!(bad_grace.validate().is_err());

        let long_comment = TableOptionsUpdate {
            comment: Some("x".repeat(MAX_COMMENT_LENGTH + 1)),
            ..Default::default()
        };
        assert!(long_comment.validate().is_err());
    }

    #[test]
    fn test_apply_is_partial() {
        let mut options = TableOptions::default();
        let update = TableOptionsUpdate {
            compression: Some(Compression::Lz4),
            gc_grace_seconds: Some(3600),
            ..Default::default()
        };
        update.validate().unwrap();
        update.apply_to(&mut options);

        assert_eq!(options.compression, Compression::Lz4);
        assert_eq!(options.gc_grace_seconds, 3600);
        // Untouched fields keep their defaults.
        assert_eq!(options.caching, CachingPolicy::KeysOnly);
        assert_eq!(options.read_repair_chance, 0.1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let update = TableOptionsUpdate {
            comment: Some("events by day".to_string()),
            compaction_strategy: Some(CompactionStrategy::Leveled),
            ..Default::default()
        };
        let mut once = TableOptions::default();
        update.apply_to(&mut once);
        let mut twice = once.clone();
        update.apply_to(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(
            "leveled".parse::<CompactionStrategy>().unwrap(),
            CompactionStrategy::Leveled
        );
        assert_eq!("lz4".parse::<Compression>().unwrap(), Compression::Lz4);
        assert_eq!(
            "keys_only".parse::<CachingPolicy>().unwrap(),
            CachingPolicy::KeysOnly
        );
        assert!("zstd9".parse::<Compression>().is_err());
    }
}
