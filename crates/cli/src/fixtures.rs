//! In-memory presentations shared by the CLI tests.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Slide 1: text box + png picture; slide 2: text only; slide 3: table.
pub fn three_slide_deck() -> Vec<u8> {
    let slides = [
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="TextBox 1"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:prstGeom prst="rect"/></p:spPr></p:sp><p:pic><p:nvPicPr><p:cNvPr id="3" name="Picture 2"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic>"#,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="2" name="Table 1"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl/></a:graphicData></a:graphic></p:graphicFrame>"#,
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut part = |name: &str, data: &[u8]| {
        zip.start_file(name, FileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    };

    let mut ids = String::new();
    let mut rels = String::new();
    for n in 1..=slides.len() {
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{n}"/>"#, 255 + n));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{REL_BASE}/slide" Target="slides/slide{n}.xml"/>"#
        ));
    }
    part(
        "ppt/presentation.xml",
        format!(r#"<p:presentation {NS}><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#)
            .as_bytes(),
    );
    part(
        "ppt/_rels/presentation.xml.rels",
        format!(r#"<Relationships xmlns="{RELS}">{rels}</Relationships>"#).as_bytes(),
    );

    for (idx, shapes) in slides.iter().enumerate() {
        let n = idx + 1;
        part(
            &format!("ppt/slides/slide{n}.xml"),
            format!(r#"<p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:sld>"#)
                .as_bytes(),
        );
    }
    part(
        "ppt/slides/_rels/slide1.xml.rels",
        format!(r#"<Relationships xmlns="{RELS}"><Relationship Id="rId2" Type="{REL_BASE}/image" Target="../media/image1.png"/></Relationships>"#)
            .as_bytes(),
    );
    part("ppt/media/image1.png", b"\x89PNG\r\n\x1a\n");

    zip.finish().unwrap().into_inner()
}
