//! Single-page PDF holding one Flate-compressed RGB image

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Write `rgb` (row-major, 3 bytes per pixel) as a page sized for `dpi`
pub(super) fn write_pdf(path: &Path, size: (u32, u32), rgb: &[u8], dpi: f64) -> Result<()> {
    let bytes = build_pdf(size, rgb, dpi)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn build_pdf((width, height): (u32, u32), rgb: &[u8], dpi: f64) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(rgb)?;
    let image = encoder.finish()?;

    let page_w = width as f64 * 72.0 / dpi;
    let page_h = height as f64 * 72.0 / dpi;
    let content = format!("q {:.2} 0 0 {:.2} 0 0 cm /Im0 Do Q\n", page_w, page_h);

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(5);

    let mut object = |out: &mut Vec<u8>, body: &[u8]| {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", offsets.len()).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    };

    object(&mut out, b"<< /Type /Catalog /Pages 2 0 R >>");
    object(&mut out, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    object(
        &mut out,
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>",
            page_w, page_h
        )
        .as_bytes(),
    );
    object(&mut out, &stream(
        &format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
             /BitsPerComponent 8 /Filter /FlateDecode",
            width, height
        ),
        &image,
    ));
    object(&mut out, &stream("", content.as_bytes()));

    let xref = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref
        )
        .as_bytes(),
    );
    Ok(out)
}

fn stream(dict: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!("<< {} /Length {} >>\nstream\n", dict, data.len()).into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}
