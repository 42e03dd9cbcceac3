// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device path handling — maps the short device ids used in requests and
// certificates onto the platform paths the wipe engine expects.

/// Normalize a requested device id to a platform device path.
///
/// Bare ids get the platform prefix (`/dev/` on unix, `\\.\` on windows);
/// ids that already look like device paths pass through untouched.
/// Certificates and artifact files are always keyed by the id as requested,
/// not by this normalized form.
pub fn normalize_device_path(device_id: &str) -> String {
    #[cfg(windows)]
    {
        if device_id.starts_with(r"\\.\") {
            device_id.to_owned()
        } else {
            format!(r"\\.\{device_id}")
        }
    }
    #[cfg(not(windows))]
    {
        if device_id.starts_with('/') {
            device_id.to_owned()
        } else {
            format!("/dev/{device_id}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn bare_id_gets_dev_prefix() {
        assert_eq!(normalize_device_path("sda1"), "/dev/sda1");
    }

    #[test]
    #[cfg(not(windows))]
    fn absolute_path_passes_through() {
        assert_eq!(normalize_device_path("/dev/nvme0n1"), "/dev/nvme0n1");
    }

    #[test]
    #[cfg(windows)]
    fn bare_id_gets_unc_prefix() {
        assert_eq!(normalize_device_path("PhysicalDrive0"), r"\\.\PhysicalDrive0");
    }
}
