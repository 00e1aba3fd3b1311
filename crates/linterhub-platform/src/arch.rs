//! Architecture detection.

/// Raw architecture string reported by the OS, falling back to the
/// compile-time target when the OS reports nothing.
pub fn detect_raw() -> String {
    let cpu_arch = sysinfo::System::cpu_arch();
    if cpu_arch.trim().is_empty() {
        std::env::consts::ARCH.to_string()
    } else {
        cpu_arch
    }
}
