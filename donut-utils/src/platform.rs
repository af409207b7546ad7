//! Runtime OS and architecture identifiers, spelled the way release assets name them.
//!
//! Release tooling for the donut-utils binaries labels assets with Go-style platform
//! names (`linux`, `darwin`, `amd64`, `arm64`), so Rust's own identifiers are mapped
//! onto those before matching.

/// OS identifier as it appears in asset names.
pub fn os_name() -> &'static str {
    map_os(std::env::consts::OS)
}

/// Architecture identifier as it appears in asset names.
pub fn arch_name() -> &'static str {
    map_arch(std::env::consts::ARCH, cfg!(target_endian = "little"))
}

fn map_os(os: &'static str) -> &'static str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn map_arch(arch: &'static str, little_endian: bool) -> &'static str {
    match arch {
        "powerpc64" if little_endian => "ppc64le",
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
