/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// `0.1.0 (abc1234, clean)`
    pub fn summary(&self) -> String {
        format!("{} ({}, {})", self.version, self.git_hash, self.git_status)
    }

    pub fn rows(&self) -> [(&'static str, &'static str); 6] {
        [
            ("Wersja", self.version),
            ("Commit", self.git_hash),
            ("Zbudowano", self.timestamp),
            ("Platforma", self.target),
            ("Profil", self.profile),
            ("Rustc", self.rustc),
        ]
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("OSK_MANAGER_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("OSK_MANAGER_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("OSK_MANAGER_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("OSK_MANAGER_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("OSK_MANAGER_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("OSK_MANAGER_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_starts_with_package_version() {
        let meta = current();
        assert!(meta.summary().starts_with(env!("CARGO_PKG_VERSION")));
        assert_eq!(meta.rows()[0].1, meta.version);
    }
}
