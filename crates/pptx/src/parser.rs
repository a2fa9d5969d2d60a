//! PPTX decoder implementation.

use crate::rels::{parse_relationships, rels_path_for, resolve_target, Relationships};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidepick_core::{Error, Presentation, Result, Shape, ShapeImage, ShapeKind, Slide};
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";
const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";
const CHART_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

/// Decoder for PPTX (Office Open XML) files.
pub struct PptxDecoder;

impl PptxDecoder {
    /// Create a new PPTX decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode a PPTX file held in memory.
    pub fn decode_bytes(&self, bytes: &[u8], filename: &str) -> Result<Presentation> {
        self.decode(Cursor::new(bytes), filename)
    }

    /// Decode a PPTX file from a reader.
    pub fn decode<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Presentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new(filename);

        let presentation_part = self.presentation_part(&mut archive)?;
        let slide_order = self.get_slide_order(&mut archive, &presentation_part)?;
        log::debug!(
            "{}: {} slide(s) listed in {}",
            filename,
            slide_order.len(),
            presentation_part
        );

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Locate the main presentation part through the package relationships.
    fn presentation_part<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<String> {
        let root_rels = match self.read_optional_file(archive, &rels_path_for(""))? {
            Some(xml) => parse_relationships(&xml)?,
            None => return Ok(DEFAULT_PRESENTATION_PART.to_string()),
        };

        Ok(root_rels
            .values()
            .find(|rel| rel.rel_type == OFFICE_DOCUMENT_REL && !rel.external)
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string()))
    }

    /// Get the ordered list of slide paths from `p:sldIdLst`.
    fn get_slide_order<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        presentation_part: &str,
    ) -> Result<Vec<String>> {
        let content = self.read_file_from_archive(archive, presentation_part)?;
        let slide_ids = slide_relationship_ids(&content)?;
        if slide_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rels_content = self.read_file_from_archive(archive, &rels_path_for(presentation_part))?;
        let rels = parse_relationships(&rels_content)?;

        slide_ids
            .iter()
            .map(|id| {
                let rel = rels.get(id).ok_or_else(|| {
                    Error::PptxParseError(format!("Slide relationship '{}' not found", id))
                })?;
                Ok(resolve_target(presentation_part, &rel.target))
            })
            .collect()
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let rels = match self.read_optional_file(archive, &rels_path_for(slide_path))? {
            Some(xml) => parse_relationships(&xml)?,
            None => Relationships::new(),
        };

        let mut slide = Slide::new(slide_number);
        for info in extract_shapes_from_xml(&content)? {
            let kind = info.kind();
            let image = match info.image_rel_id() {
                Some(rel_id) => self.load_image(archive, slide_path, &rels, rel_id)?,
                None => None,
            };

            log::debug!(
                "Slide {}: shape '{}' {:?}{}",
                slide_number,
                info.name,
                kind,
                image
                    .as_ref()
                    .map(|i| format!(" ({})", i.filename))
                    .unwrap_or_default()
            );

            let mut shape = Shape::new(info.name, kind);
            shape.image = image;
            slide.add_shape(shape);
        }

        Ok(slide)
    }

    /// Load the image part referenced by a picture's blip.
    ///
    /// Linked (external) images and dangling references carry no image.
    fn load_image<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        rels: &Relationships,
        rel_id: &str,
    ) -> Result<Option<ShapeImage>> {
        let Some(rel) = rels.get(rel_id) else {
            log::warn!("{}: image relationship '{}' not found", slide_path, rel_id);
            return Ok(None);
        };
        if rel.external {
            return Ok(None);
        }

        let part = resolve_target(slide_path, &rel.target);
        let Some(data) = self.read_optional_bytes(archive, &part)? else {
            log::warn!("{}: image part '{}' missing from archive", slide_path, part);
            return Ok(None);
        };

        let filename = part.rsplit('/').next().unwrap_or(&part).to_string();
        Ok(Some(ShapeImage::new(filename, data)))
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        self.read_optional_file(archive, path)?
            .ok_or_else(|| Error::PptxParseError(format!("File not found in archive '{}'", path)))
    }

    /// Read a text file from the ZIP archive, `None` if it does not exist.
    fn read_optional_file<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<Option<String>> {
        let Some(bytes) = self.read_optional_bytes(archive, path)? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| Error::XmlError(format!("'{}' is not valid UTF-8: {}", path, e)))
    }

    /// Read a binary file from the ZIP archive, `None` if it does not exist.
    fn read_optional_bytes<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<Option<Vec<u8>>> {
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(Error::ZipError(format!("Failed to open '{}': {}", path, e)));
            }
        };

        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(Some(content))
    }
}

impl Default for PptxDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Relationship ids of `p:sldIdLst/p:sldId`, in presentation order.
fn slide_relationship_ids(xml_content: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);
    let mut in_list = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = true;
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = false;
            }
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if in_list && local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = relationship_attr(e, b"id") {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// The top-level shape elements of a slide's shape tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeElement {
    Sp,
    Pic,
    GraphicFrame,
    GrpSp,
    CxnSp,
    ContentPart,
}

impl ShapeElement {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Sp),
            b"pic" => Some(Self::Pic),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::GrpSp),
            b"cxnSp" => Some(Self::CxnSp),
            b"contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }
}

/// Information about a shape extracted from XML.
#[derive(Debug)]
struct ShapeInfo {
    element: ShapeElement,
    name: String,
    placeholder: bool,
    media: bool,
    custom_geometry: bool,
    preset_geometry: bool,
    text_box: bool,
    graphic_uri: Option<String>,
    blip_embed: Option<String>,
}

impl ShapeInfo {
    fn new(element: ShapeElement) -> Self {
        Self {
            element,
            name: String::new(),
            placeholder: false,
            media: false,
            custom_geometry: false,
            preset_geometry: false,
            text_box: false,
            graphic_uri: None,
            blip_embed: None,
        }
    }

    /// Record what a descendant element says about the shape.
    fn observe(&mut self, e: &BytesStart<'_>) {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"cNvPr" if self.name.is_empty() => {
                if let Some(value) = plain_attr(e, b"name") {
                    self.name = value;
                }
            }
            b"cNvSpPr" => {
                if let Some(value) = plain_attr(e, b"txBox") {
                    self.text_box = value == "1" || value == "true";
                }
            }
            b"ph" => self.placeholder = true,
            b"videoFile" | b"audioFile" | b"quickTimeFile" | b"media" => self.media = true,
            b"custGeom" => self.custom_geometry = true,
            b"prstGeom" => self.preset_geometry = true,
            b"graphicData" if self.graphic_uri.is_none() => {
                self.graphic_uri = plain_attr(e, b"uri");
            }
            b"blip" if self.blip_embed.is_none() => {
                self.blip_embed = relationship_attr(e, b"embed");
            }
            _ => {}
        }
    }

    fn kind(&self) -> ShapeKind {
        match self.element {
            ShapeElement::Pic if self.media || self.placeholder => ShapeKind::Other,
            ShapeElement::Pic => ShapeKind::Picture,
            ShapeElement::Sp if self.placeholder || self.custom_geometry => ShapeKind::Other,
            ShapeElement::Sp if self.preset_geometry && !self.text_box => ShapeKind::AutoShape,
            ShapeElement::Sp => ShapeKind::Other,
            ShapeElement::GraphicFrame => match self.graphic_uri.as_deref() {
                Some(TABLE_URI) => ShapeKind::Table,
                Some(CHART_URI) => ShapeKind::Chart,
                _ => ShapeKind::Other,
            },
            ShapeElement::GrpSp => ShapeKind::Group,
            ShapeElement::CxnSp | ShapeElement::ContentPart => ShapeKind::Other,
        }
    }

    /// Relationship id of the embedded image, for pictures that have one.
    fn image_rel_id(&self) -> Option<&str> {
        match self.element {
            ShapeElement::Pic if !self.media => self.blip_embed.as_deref(),
            _ => None,
        }
    }
}

/// Extract the top-level shapes of `p:cSld/p:spTree`, in document order.
///
/// Shapes nested inside groups are part of their group and not listed.
fn extract_shapes_from_xml(xml_content: &str) -> Result<Vec<ShapeInfo>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut tree_done = false;
    let mut current: Option<ShapeInfo> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = e.name();
                let name = local_name(name.as_ref());

                match (tree_depth, current.as_mut()) {
                    (None, _) if !tree_done && name == b"spTree" => tree_depth = Some(depth),
                    (Some(td), None) if depth == td + 1 => {
                        current = ShapeElement::from_local_name(name).map(ShapeInfo::new);
                    }
                    (Some(_), Some(shape)) => shape.observe(e),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let name = local_name(name.as_ref());

                match (tree_depth, current.as_mut()) {
                    (Some(td), None) if depth == td => {
                        if let Some(element) = ShapeElement::from_local_name(name) {
                            shapes.push(ShapeInfo::new(element));
                        }
                    }
                    (Some(_), Some(shape)) => shape.observe(e),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                match tree_depth {
                    Some(td) if depth == td + 1 => {
                        // End of a top-level child: save it if it was a shape
                        if let Some(shape) = current.take() {
                            shapes.push(shape);
                        }
                    }
                    Some(td) if depth == td => {
                        tree_depth = None;
                        tree_done = true;
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Value of an unprefixed attribute.
fn plain_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Value of a namespace-prefixed attribute such as `r:id` or `r:embed`.
fn relationship_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| {
            let full = attr.key.as_ref();
            full != key && local_name(full) == key
        })
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
