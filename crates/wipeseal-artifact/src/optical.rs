// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optical code — QR rendering of the canonical-form string.
//
// The QR payload is the canonical string itself, so a scanner plus the
// public key is enough to re-run verification with no network access.  The
// module matrix from `qrcode` is rasterised by hand into an `image` buffer
// rather than through the crate's own renderer, keeping every pixel choice
// (scale, quiet zone) in one place.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::QrCode;
use tracing::{debug, instrument};

use wipeseal_core::error::{Result, WipesealError};

/// Pixels per QR module.
const MODULE_PX: u32 = 8;
/// Quiet zone width in modules (the QR spec minimum).
const QUIET_ZONE: u32 = 4;

fn render_err(detail: impl std::fmt::Display) -> WipesealError {
    WipesealError::ArtifactWrite {
        artifact: "optical-code".into(),
        detail: detail.to_string(),
    }
}

/// Render `data` as a QR code and return the encoded PNG bytes.
///
/// Fails only if the payload exceeds QR capacity or PNG encoding fails;
/// both surface as `ArtifactWrite` for the optical-code artifact.
#[instrument(skip_all, fields(payload_len = data.len()))]
pub fn render(data: &str) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes()).map_err(render_err)?;
    let modules = code.width() as u32;
    let size = (modules + 2 * QUIET_ZONE) * MODULE_PX;

    let mut img = GrayImage::from_pixel(size, size, Luma([0xFF]));
    for y in 0..modules {
        for x in 0..modules {
            if code[(x as usize, y as usize)] == qrcode::Color::Dark {
                let px0 = (x + QUIET_ZONE) * MODULE_PX;
                let py0 = (y + QUIET_ZONE) * MODULE_PX;
                for py in py0..py0 + MODULE_PX {
                    for px in px0..px0 + MODULE_PX {
                        img.put_pixel(px, py, Luma([0x00]));
                    }
                }
            }
        }
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(render_err)?;

    debug!(modules, png_bytes = png.len(), "QR code rendered");
    Ok(png)
}
