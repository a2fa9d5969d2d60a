//! Minimal WordprocessingML package writer for the slide report.

use crate::EMU_PER_INCH;
use quick_xml::escape::escape;
use slidepick_core::{Error, RasterPage, Result};
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Layout options for the report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Level-1 heading at the top of the document.
    pub title: String,

    /// Display width of every slide image, in EMUs.
    pub image_width_emu: i64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Slides with Visual Elements".to_string(),
            image_width_emu: 6 * EMU_PER_INCH,
        }
    }
}

/// One "Slide N" section.
#[derive(Debug)]
struct Section {
    heading: String,
    png: Vec<u8>,
    width_emu: i64,
    height_emu: i64,
}

/// Collects rasterized pages and writes them out as a DOCX package.
#[derive(Debug)]
pub struct ReportBuilder {
    options: ReportOptions,
    sections: Vec<Section>,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            sections: Vec::new(),
        }
    }

    /// Append a section for `page`. Sections keep the order they are added in.
    pub fn add_page(&mut self, page: &RasterPage) -> Result<&mut Self> {
        if page.width == 0 || page.height == 0 {
            return Err(Error::ReportError(format!(
                "slide {} has an empty {}x{} image",
                page.slide_number, page.width, page.height
            )));
        }

        let width_emu = self.options.image_width_emu;
        let height_emu = width_emu * i64::from(page.height) / i64::from(page.width);

        self.sections.push(Section {
            heading: format!("Slide {}", page.slide_number),
            png: page.png.clone(),
            width_emu,
            height_emu,
        });
        Ok(self)
    }

    /// Serialize the document.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        // Fixed entry timestamps keep the output byte-identical across runs
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        write_part(&mut zip, options, "[Content_Types].xml", content_types().as_bytes())?;
        write_part(&mut zip, options, "_rels/.rels", package_rels().as_bytes())?;
        write_part(
            &mut zip,
            options,
            "docProps/core.xml",
            self.core_properties().as_bytes(),
        )?;
        write_part(&mut zip, options, "word/styles.xml", styles().as_bytes())?;
        write_part(
            &mut zip,
            options,
            "word/_rels/document.xml.rels",
            self.document_rels()?.as_bytes(),
        )?;
        write_part(&mut zip, options, "word/document.xml", self.document()?.as_bytes())?;

        // PNG data is already compressed
        let stored = options.compression_method(CompressionMethod::Stored);
        for (idx, section) in self.sections.iter().enumerate() {
            write_part(&mut zip, stored, &media_name(idx), &section.png)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish DOCX: {}", e)))?;
        let bytes = cursor.into_inner();

        log::info!(
            "Assembled report with {} section(s), {} byte(s)",
            self.sections.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    fn core_properties(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title></cp:coreProperties>"#,
            escape(&self.options.title)
        )
    }

    fn document_rels(&self) -> Result<String> {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/styles" Target="styles.xml"/>"#
        )
        .map_err(fmt_error)?;

        for idx in 0..self.sections.len() {
            write!(
                xml,
                r#"<Relationship Id="{}" Type="{REL_BASE}/image" Target="media/image{}.png"/>"#,
                image_rel_id(idx),
                idx + 1
            )
            .map_err(fmt_error)?;
        }

        xml.push_str("</Relationships>");
        Ok(xml)
    }

    fn document(&self) -> Result<String> {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<w:document xmlns:w="{NS_W}" xmlns:r="{NS_R}" xmlns:wp="{NS_WP}" xmlns:a="{NS_A}" xmlns:pic="{NS_PIC}"><w:body>"#
        )
        .map_err(fmt_error)?;

        heading(&mut xml, "Heading1", &self.options.title)?;

        for (idx, section) in self.sections.iter().enumerate() {
            heading(&mut xml, "Heading2", &section.heading)?;
            inline_image(&mut xml, idx, section)?;
        }

        // US Letter, 1" top/bottom and 1.25" side margins leave 6" of text width
        xml.push_str(
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1800" w:bottom="1440" w:left="1800" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        );
        Ok(xml)
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

/// Build a report with default options from pages in display order.
pub fn build_report(pages: &[RasterPage]) -> Result<Vec<u8>> {
    let mut builder = ReportBuilder::default();
    for page in pages {
        builder.add_page(page)?;
    }
    builder.build()
}

fn heading(xml: &mut String, style: &str, text: &str) -> Result<()> {
    write!(
        xml,
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        style,
        escape(text)
    )
    .map_err(fmt_error)
}

fn inline_image(xml: &mut String, idx: usize, section: &Section) -> Result<()> {
    // docPr ids must be unique within the document
    let id = idx + 1;
    let name = escape(&section.heading);
    write!(
        xml,
        r#"<w:p><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id="{id}" name="Picture {id}" descr="{name}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="{NS_PIC}"><pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="image{id}.png"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        cx = section.width_emu,
        cy = section.height_emu,
        id = id,
        name = name,
        rel = image_rel_id(idx),
    )
    .map_err(fmt_error)
}

fn image_rel_id(idx: usize) -> String {
    // rId1 is the styles part
    format!("rId{}", idx + 2)
}

fn media_name(idx: usize) -> String {
    format!("word/media/image{}.png", idx + 1)
}

fn write_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    name: &str,
    data: &[u8],
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
    zip.write_all(data)
        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
    Ok(())
}

fn fmt_error(e: std::fmt::Error) -> Error {
    Error::ReportError(e.to_string())
}

fn content_types() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#
        .to_string()
}

fn package_rels() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#
    )
}

fn styles() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{NS_W}"><w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="365F91"/><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="0"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:color w:val="4F81BD"/><w:sz w:val="26"/></w:rPr></w:style></w:styles>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use std::io::Read;
    use zip::ZipArchive;

    fn page(slide_number: usize, width: u32, height: u32) -> RasterPage {
        RasterPage {
            slide_number,
            width,
            height,
            png: format!("png-{}", slide_number).into_bytes(),
        }
    }

    fn read_part(docx: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        content
    }

    /// (style, text) of every styled paragraph in document order.
    fn headings(document_xml: &str) -> Vec<(String, String)> {
        let mut reader = Reader::from_str(document_xml);
        let mut headings = Vec::new();
        let mut style: Option<String> = None;
        let mut text = String::new();

        loop {
            match reader.read_event().unwrap() {
                Event::Empty(e) if e.name().as_ref() == b"w:pStyle" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"w:val" {
                            style = Some(String::from_utf8_lossy(&attr.value).to_string());
                        }
                    }
                }
                Event::Text(e) if style.is_some() => {
                    text.push_str(&e.unescape().unwrap());
                }
                Event::End(e) if e.name().as_ref() == b"w:p" => {
                    if let Some(s) = style.take() {
                        headings.push((s, std::mem::take(&mut text)));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        headings
    }

    #[test]
    fn test_headings_follow_pages() {
        let docx = build_report(&[page(1, 200, 100), page(3, 200, 100)]).unwrap();
        let document = String::from_utf8(read_part(&docx, "word/document.xml")).unwrap();

        assert_eq!(
            headings(&document),
            vec![
                ("Heading1".to_string(), "Slides with Visual Elements".to_string()),
                ("Heading2".to_string(), "Slide 1".to_string()),
                ("Heading2".to_string(), "Slide 3".to_string()),
            ]
        );
    }

    #[test]
    fn test_images_are_embedded_in_order() {
        let docx = build_report(&[page(2, 200, 100), page(5, 100, 100)]).unwrap();

        assert_eq!(read_part(&docx, "word/media/image1.png"), b"png-2");
        assert_eq!(read_part(&docx, "word/media/image2.png"), b"png-5");

        let rels = String::from_utf8(read_part(&docx, "word/_rels/document.xml.rels")).unwrap();
        assert!(rels.contains(r#"Id="rId2""#) && rels.contains(r#"Target="media/image1.png""#));
        assert!(rels.contains(r#"Id="rId3""#) && rels.contains(r#"Target="media/image2.png""#));

        let document = String::from_utf8(read_part(&docx, "word/document.xml")).unwrap();
        let first = document.find(r#"r:embed="rId2""#).unwrap();
        let second = document.find(r#"r:embed="rId3""#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_fixed_width_keeps_aspect_ratio() {
        let docx = build_report(&[page(1, 200, 100)]).unwrap();
        let document = String::from_utf8(read_part(&docx, "word/document.xml")).unwrap();
        assert!(document.contains(r#"<wp:extent cx="5486400" cy="2743200"/>"#));
    }

    #[test]
    fn test_empty_report_has_only_title() {
        let docx = build_report(&[]).unwrap();
        let document = String::from_utf8(read_part(&docx, "word/document.xml")).unwrap();

        assert_eq!(headings(&document).len(), 1);
        assert!(!document.contains("<w:drawing>"));
        let content_types = String::from_utf8(read_part(&docx, "[Content_Types].xml")).unwrap();
        assert!(content_types.contains("wordprocessingml.document.main+xml"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let pages = [page(1, 640, 480), page(4, 640, 480)];
        let a = build_report(&pages).unwrap();
        let b = build_report(&pages).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_entries_carry_fixed_timestamp() {
        let docx = build_report(&[page(2, 320, 240)]).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
        for idx in 0..archive.len() {
            let file = archive.by_index(idx).unwrap();
            let modified = file.last_modified();
            assert_eq!(
                (modified.year(), modified.month(), modified.day()),
                (1980, 1, 1),
                "{}",
                file.name()
            );
        }
    }

    #[test]
    fn test_custom_title_is_escaped() {
        let mut builder = ReportBuilder::new(ReportOptions {
            title: "Q3 <Review> & Plans".to_string(),
            ..ReportOptions::default()
        });
        builder.add_page(&page(1, 10, 10)).unwrap();
        let docx = builder.build().unwrap();
        let document = String::from_utf8(read_part(&docx, "word/document.xml")).unwrap();

        assert!(document.contains("Q3 &lt;Review&gt; &amp; Plans"));
        assert_eq!(headings(&document)[0].1, "Q3 <Review> & Plans");
    }

    #[test]
    fn test_empty_page_is_rejected() {
        let mut builder = ReportBuilder::default();
        assert!(matches!(
            builder.add_page(&page(1, 0, 10)),
            Err(Error::ReportError(_))
        ));
    }
}
