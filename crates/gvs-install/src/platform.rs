use std::fmt;

/// Operating system and architecture as named by the release listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os:   String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os:   os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was built for.
    pub fn current() -> Self { Self::new(os_name(std::env::consts::OS), arch_name(std::env::consts::ARCH)) }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}/{}", self.os, self.arch) }
}

fn os_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "arm" => "armv6l",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
