//! Integration tests for the ReportBuilder API
//!
//! These tests drive the public API the way a front-end would: draw on a
//! sketch surface, fill in a report and export it.

use std::collections::HashMap;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use printpdf::lopdf::{self, Object, content::Content};

use inspekt::{
    InspektError, ReportBuilder,
    config::AppConfig,
    export::{Exporter, ExportFormat, svg::SvgExporter},
    geometry::{Point, Size},
    layout::ImageKind,
    photo::{PhotoErrorPolicy, PhotoSource},
    raster::RasterImage,
    report::{Brand, BrandList, Report},
};

fn png_bytes() -> Vec<u8> {
    let pixels = RgbaImage::from_pixel(40, 20, Rgba([200, 40, 40, 255]));
    RasterImage::encode_png(&pixels).unwrap().bytes().to_vec()
}

fn jpeg_bytes() -> Vec<u8> {
    let pixels = RgbImage::from_pixel(30, 30, Rgb([20, 120, 20]));
    RasterImage::encode_jpeg(&pixels, 85).unwrap().bytes().to_vec()
}

fn jana_report() -> Report {
    let mut report = Report::new();
    report.set_client_name("Jana");
    report.set_notes("test");
    report.set_max_price("500");
    *report.brands_mut() = BrandList::from_brands([Some(Brand::Samsung)]);
    report
}

/// Decodes the strings shown by `Tj` operators on one page of a PDF.
///
/// Embedded fonts write two-byte glyph ids, which are mapped back to
/// characters through the font's ToUnicode table.
fn pdf_page_texts(bytes: &[u8], page_number: u32) -> Vec<String> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();

    let mut glyphs = HashMap::new();
    for object in doc.objects.values() {
        let Ok(stream) = object.as_stream() else {
            continue;
        };
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let cmap = String::from_utf8_lossy(&data);
        let entries = cmap
            .split("beginbfchar")
            .skip(1)
            .filter_map(|block| block.split("endbfchar").next());
        for line in entries.flat_map(str::lines) {
            let codes: Vec<u32> = line
                .split(['<', '>', ' '])
                .filter(|part| !part.is_empty())
                .filter_map(|part| u32::from_str_radix(part.trim(), 16).ok())
                .collect();
            if let [gid, unicode] = codes[..] {
                glyphs.insert(gid, char::from_u32(unicode).unwrap());
            }
        }
    }

    let page_id = doc.get_pages()[&page_number];
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(
                bytes
                    .chunks(2)
                    .map(|pair| {
                        let gid = (u32::from(pair[0]) << 8) | u32::from(pair[1]);
                        glyphs.get(&gid).copied().unwrap_or('\u{fffd}')
                    })
                    .collect(),
            ),
            _ => None,
        })
        .collect()
}

fn report_with_sketches(builder: &ReportBuilder, count: usize) -> Report {
    let mut report = jana_report();
    let mut surface = builder.sketch_surface(Size::new(800.0, 600.0)).unwrap();
    for i in 0..count {
        surface.pointer_down(Point::new(10.0, 10.0 + i as f32 * 20.0));
        surface.pointer_move(Point::new(300.0, 200.0));
        surface.pointer_up();
        report.sketches_mut().push(surface.commit().unwrap());
    }
    report
}

#[test]
fn test_builder_api_exists() {
    let _builder = ReportBuilder::default();
}

#[test]
fn test_single_page_report() {
    let builder = ReportBuilder::default();
    let layout = builder.layout(&jana_report()).unwrap();

    assert_eq!(layout.page_count(), 1);
    let page = &layout.pages()[0];
    for expected in ["Jana", "test", "1. Samsung", "500 €"] {
        assert!(
            page.find_text(expected).is_some(),
            "`{expected}` missing from the page"
        );
    }
    assert_eq!(
        page.find_text("500 €").unwrap().position(),
        Point::new(60.0, 100.0)
    );
    assert!(page.images().next().is_none());
}

#[test]
fn test_pdf_export() {
    let builder = ReportBuilder::default();
    let artifact = builder.export(&jana_report()).unwrap();

    assert_eq!(artifact.file_name(), "Jana.pdf");
    assert_eq!(artifact.page_count(), 1);
    assert!(artifact.bytes().starts_with(b"%PDF"));
    assert!(artifact.skipped().is_empty());
}

#[test]
fn test_pdf_keeps_accented_text() {
    let builder = ReportBuilder::default();
    let mut report = jana_report();
    report.set_client_name("Ján Čierny");
    report.set_notes("Vonkajšia jednotka na južnej stene");

    let artifact = builder.export(&report).unwrap();
    let texts = pdf_page_texts(artifact.bytes(), 1);
    for expected in [
        "Obhliadka klímy",
        "Ján Čierny",
        "Vybrané značky:",
        "Maximálna cena:",
        "Vonkajšia jednotka na južnej stene",
        "500 €",
    ] {
        assert!(
            texts.iter().any(|text| text == expected),
            "`{expected}` missing from {texts:?}"
        );
    }
}

#[test]
fn test_blank_client_uses_default_file_name() {
    let builder = ReportBuilder::default();
    let artifact = builder.export(&Report::new()).unwrap();
    assert_eq!(artifact.file_name(), "obhliadka.pdf");
}

#[test]
fn test_three_sketches_span_two_pages() {
    let builder = ReportBuilder::default();
    let report = report_with_sketches(&builder, 3);

    let layout = builder.layout(&report).unwrap();
    assert_eq!(layout.page_count(), 2);
    assert_eq!(layout.pages()[0].images().count(), 2);
    assert_eq!(layout.pages()[1].images().count(), 1);
    assert!(
        layout
            .pages()
            .iter()
            .flat_map(|p| p.images())
            .all(|i| i.kind() == ImageKind::Sketch)
    );

    let artifact = builder.export(&report).unwrap();
    assert_eq!(artifact.page_count(), 2);
    assert!(artifact.bytes().starts_with(b"%PDF"));
}

#[test]
fn test_unreadable_photo_is_skipped() {
    let builder = ReportBuilder::default();
    let mut report = jana_report();
    report
        .photos_mut()
        .add(PhotoSource::file("front.png", png_bytes()))
        .unwrap();
    report
        .photos_mut()
        .add(PhotoSource::file("corrupt.jpg", b"not really a jpeg".to_vec()))
        .unwrap();
    report
        .photos_mut()
        .add(PhotoSource::file("back.jpg", jpeg_bytes()))
        .unwrap();

    let artifact = builder.export(&report).unwrap();
    assert_eq!(artifact.skipped().len(), 1);
    assert_eq!(artifact.skipped()[0].name(), "corrupt.jpg");

    let layout = builder.layout(&report).unwrap();
    let photos = layout
        .pages()
        .iter()
        .flat_map(|p| p.images())
        .filter(|i| i.kind() == ImageKind::Photo)
        .count();
    assert_eq!(photos, 2);
}

#[test]
fn test_truncated_encoded_photo_is_skipped() {
    let builder = ReportBuilder::default();

    let pixels = RgbaImage::from_pixel(64, 64, Rgba([9, 9, 9, 255]));
    let mut truncated = RasterImage::encode_png(&pixels).unwrap().bytes().to_vec();
    truncated.truncate(60);

    let mut report = jana_report();
    report
        .photos_mut()
        .add(PhotoSource::file("front.png", png_bytes()))
        .unwrap();
    report
        .photos_mut()
        .add(PhotoSource::Encoded(RasterImage::from_encoded(truncated).unwrap()))
        .unwrap();
    report
        .photos_mut()
        .add(PhotoSource::file("back.jpg", jpeg_bytes()))
        .unwrap();

    let artifact = builder.export(&report).unwrap();
    assert!(artifact.bytes().starts_with(b"%PDF"));
    assert_eq!(artifact.skipped().len(), 1);
    assert!(artifact.skipped()[0].name().starts_with("encoded"));

    let layout = builder.layout(&report).unwrap();
    let photos = layout
        .pages()
        .iter()
        .flat_map(|p| p.images())
        .filter(|i| i.kind() == ImageKind::Photo)
        .count();
    assert_eq!(photos, 2);
}

#[test]
fn test_unreadable_photo_aborts() {
    let mut config = AppConfig::default();
    config.export_mut().set_photo_errors(PhotoErrorPolicy::Abort);
    let builder = ReportBuilder::new(config);

    let mut report = jana_report();
    report
        .photos_mut()
        .add(PhotoSource::file("front.png", png_bytes()))
        .unwrap();
    report
        .photos_mut()
        .add(PhotoSource::file("corrupt.jpg", b"not really a jpeg".to_vec()))
        .unwrap();

    let result = builder.export(&report);
    assert!(matches!(
        result,
        Err(InspektError::Photo { ref name, .. }) if name == "corrupt.jpg"
    ));
}

#[test]
fn test_svg_export() {
    let mut config = AppConfig::default();
    config.export_mut().set_format(ExportFormat::Svg);
    let builder = ReportBuilder::new(config);

    let artifact = builder.export(&report_with_sketches(&builder, 1)).unwrap();
    assert_eq!(artifact.file_name(), "Jana.svg");
    let svg = String::from_utf8(artifact.into_bytes()).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
}

#[test]
fn test_export_with_custom_exporter() {
    let builder = ReportBuilder::default();
    let mut exporter = SvgExporter::new().with_page_gap(0.0);
    assert_eq!(exporter.extension(), "svg");

    let artifact = builder.export_with(&jana_report(), &mut exporter).unwrap();
    assert_eq!(artifact.file_name(), "Jana.svg");
}

#[test]
fn test_builder_reusability() {
    let builder = ReportBuilder::default();
    let first = builder.export(&jana_report()).unwrap();
    let second = builder.export(&report_with_sketches(&builder, 2)).unwrap();
    assert_eq!(first.page_count(), 1);
    assert_eq!(second.page_count(), 1);
}
