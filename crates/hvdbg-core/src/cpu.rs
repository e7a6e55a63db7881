//! # CPU Report
//!
//! Backs the `cpu` command with what user mode can learn about the
//! processor.

use std::io::{self, Write};

/// Processor summary printed by `cpu`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuReport
{
    /// Target architecture of this build
    pub architecture: &'static str,
    /// Number of logical processors
    pub logical_cores: u32,
    /// Feature name and whether the running CPU has it
    pub features: Vec<(&'static str, bool)>,
}

impl CpuReport
{
    /// Probe the running CPU
    pub fn detect(logical_cores: u32) -> Self
    {
        Self {
            architecture: std::env::consts::ARCH,
            logical_cores,
            features: detect_features(),
        }
    }

    /// Print the report
    ///
    /// ## Errors
    ///
    /// Propagates write failures.
    pub fn render(&self, out: &mut dyn Write) -> io::Result<()>
    {
        writeln!(out, "architecture       : {}", self.architecture)?;
        writeln!(out, "logical processors : {}", self.logical_cores)?;
        if self.features.is_empty() {
            writeln!(out, "feature detection is not available on this architecture")?;
        }
        for (name, present) in &self.features {
            let state = if *present { "supported" } else { "not supported" };
            writeln!(out, "{name:<19}: {state}")?;
        }
        Ok(())
    }
}

#[cfg(target_arch = "x86_64")]
fn detect_features() -> Vec<(&'static str, bool)>
{
    vec![
        ("sse2", is_x86_feature_detected!("sse2")),
        ("sse4.2", is_x86_feature_detected!("sse4.2")),
        ("avx", is_x86_feature_detected!("avx")),
        ("avx2", is_x86_feature_detected!("avx2")),
        ("avx512f", is_x86_feature_detected!("avx512f")),
        ("aes", is_x86_feature_detected!("aes")),
        ("rdrand", is_x86_feature_detected!("rdrand")),
        ("rdseed", is_x86_feature_detected!("rdseed")),
        ("xsave", is_x86_feature_detected!("xsave")),
        ("bmi2", is_x86_feature_detected!("bmi2")),
    ]
}

#[cfg(not(target_arch = "x86_64"))]
fn detect_features() -> Vec<(&'static str, bool)>
{
    Vec::new()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_render_lists_features()
    {
        let report = CpuReport {
            architecture: "x86_64",
            logical_cores: 4,
            features: vec![("avx2", true), ("avx512f", false)],
        };
        let mut out = Vec::new();
        report.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("logical processors : 4\n"));
        assert!(text.contains("avx2               : supported\n"));
        assert!(text.contains("avx512f            : not supported\n"));
    }
}
