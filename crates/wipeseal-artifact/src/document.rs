// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF certificate document — fixed-layout rendering via `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised
// via `PdfDocument::save()`.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, instrument};

use wipeseal_core::types::WipeRecord;

/// US Letter, matching the certificate's original print target.
const PAGE_W_MM: f32 = 216.0;
const PAGE_H_MM: f32 = 279.0;

/// One labelled line on the certificate.
fn text_line(x_pt: f32, y_pt: f32, size_pt: f32, text: &str) -> [Op; 5] {
    [
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point {
                x: Pt(x_pt),
                y: Pt(y_pt),
            },
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(size_pt),
            font: BuiltinFont::Helvetica,
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_owned())],
            font: BuiltinFont::Helvetica,
        },
        Op::EndTextSection,
    ]
}

/// Render the single-page certificate PDF for one wipe record.
///
/// Layout is fixed: title, then Device / Method / Date / Status lines, then
/// the certificate fingerprint in smaller type.  The PDF is a derived,
/// non-authoritative rendering — verification always goes through the
/// manifest, never through this document.
#[instrument(skip_all, fields(device_id = record.device_id()))]
pub fn render(record: &WipeRecord, fingerprint: &str) -> Vec<u8> {
    let title = format!("{} Certificate", record.app_label());
    let mut doc = PdfDocument::new(&title);

    let mut ops: Vec<Op> = Vec::new();
    ops.extend(text_line(100.0, 750.0, 18.0, &title));
    ops.extend(text_line(
        100.0,
        700.0,
        12.0,
        &format!("Device: {}", record.device_id()),
    ));
    ops.extend(text_line(
        100.0,
        650.0,
        12.0,
        &format!("Method: {}", record.method()),
    ));
    ops.extend(text_line(
        100.0,
        600.0,
        12.0,
        &format!(
            "Date: {}",
            record
                .timestamp()
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ),
    ));
    ops.extend(text_line(
        100.0,
        550.0,
        12.0,
        &format!("Status: {}", record.status()),
    ));
    ops.extend(text_line(
        100.0,
        500.0,
        8.0,
        &format!("Fingerprint: {fingerprint}"),
    ));

    doc.with_pages(vec![PdfPage::new(Mm(PAGE_W_MM), Mm(PAGE_H_MM), ops)]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

    debug!(bytes = output.len(), "certificate PDF rendered");
    output
}
