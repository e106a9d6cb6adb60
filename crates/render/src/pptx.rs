//! Minimal PresentationML package writer.
//!
//! Produces a `.pptx` ZIP with one blank master/layout pair, a plain theme,
//! and one part per slide. Slide bodies are written with `quick-xml` so all
//! text is escaped on the way out.

use ebook_core::sanitize::{escape_markup, strip_invalid_xml_chars};
use ebook_core::{Error, ImageFormat, Result};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Slide width in EMU (13.333in, 16:9).
pub const SLIDE_WIDTH: i64 = 12_192_000;

/// Slide height in EMU (7.5in).
pub const SLIDE_HEIGHT: i64 = 6_858_000;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Placement in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// Largest rectangle with the given height/width ratio that fits inside
    /// this one, centered. Unknown ratios fill the whole box.
    pub fn fit(&self, aspect: Option<f64>) -> Rect {
        let Some(aspect) = aspect.filter(|a| a.is_finite() && *a > 0.0) else {
            return *self;
        };

        let mut cx = self.cx as f64;
        let mut cy = cx * aspect;
        if cy > self.cy as f64 {
            cy = self.cy as f64;
            cx = cy / aspect;
        }

        let (cx, cy) = (cx.round() as i64, cy.round() as i64);
        Rect::new(self.x + (self.cx - cx) / 2, self.y + (self.cy - cy) / 2, cx, cy)
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(&self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Vertical text anchoring inside a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

impl Anchor {
    fn as_attr(&self) -> &'static str {
        match self {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        }
    }
}

/// A text box on a slide.
#[derive(Debug, Clone)]
pub struct TextBox {
    pub name: String,
    pub rect: Rect,
    pub paragraphs: Vec<String>,
    /// Font size in hundredths of a point.
    pub size: u32,
    pub bold: bool,
    pub align: Align,
    pub anchor: Anchor,
    /// RGB hex color, e.g. `"595959"`.
    pub color: Option<&'static str>,
}

impl TextBox {
    pub fn new(name: impl Into<String>, rect: Rect, text: &str, size: u32) -> Self {
        Self {
            name: name.into(),
            rect,
            paragraphs: text.lines().map(str::to_string).collect(),
            size,
            bold: false,
            align: Align::Left,
            anchor: Anchor::Top,
            color: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn colored(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }
}

/// Something drawn on a slide.
#[derive(Debug, Clone)]
pub enum Shape {
    Text(TextBox),
    /// An image previously registered with [`PptxPackage::add_media`].
    Picture { media: usize, rect: Rect },
}

struct Media {
    format: ImageFormat,
    data: Vec<u8>,
}

/// Accumulates slides and media, then writes the package.
pub struct PptxPackage {
    title: String,
    slides: Vec<Vec<Shape>>,
    media: Vec<Media>,
}

impl PptxPackage {
    /// Start an empty deck with the given document title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Register image bytes and return the handle used by [`Shape::Picture`].
    pub fn add_media(&mut self, format: ImageFormat, data: Vec<u8>) -> usize {
        self.media.push(Media { format, data });
        self.media.len() - 1
    }

    /// Append a slide.
    pub fn add_slide(&mut self, shapes: Vec<Shape>) {
        self.slides.push(shapes);
    }

    /// Number of slides added so far.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Write the whole package into memory.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let slide_count = self.slides.len();

        write_part(&mut zip, options, "[Content_Types].xml", &self.content_types())?;
        write_part(&mut zip, options, "_rels/.rels", ROOT_RELS)?;
        write_part(&mut zip, options, "docProps/core.xml", &core_props(&self.title))?;
        write_part(&mut zip, options, "docProps/app.xml", &app_props(slide_count))?;
        write_part(&mut zip, options, "ppt/presentation.xml", &presentation_xml(slide_count))?;
        write_part(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels(slide_count),
        )?;
        write_part(&mut zip, options, "ppt/presProps.xml", PRES_PROPS)?;
        write_part(&mut zip, options, "ppt/viewProps.xml", VIEW_PROPS)?;
        write_part(&mut zip, options, "ppt/tableStyles.xml", TABLE_STYLES)?;
        write_part(&mut zip, options, "ppt/theme/theme1.xml", THEME)?;
        write_part(&mut zip, options, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER)?;
        write_part(
            &mut zip,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            SLIDE_MASTER_RELS,
        )?;
        write_part(&mut zip, options, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT)?;
        write_part(
            &mut zip,
            options,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            SLIDE_LAYOUT_RELS,
        )?;

        for (idx, shapes) in self.slides.iter().enumerate() {
            let number = idx + 1;
            let (xml, pictures) = slide_xml(shapes)?;
            write_part(&mut zip, options, &format!("ppt/slides/slide{}.xml", number), &xml)?;
            write_part(
                &mut zip,
                options,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &self.slide_rels(&pictures),
            )?;
        }

        for (idx, media) in self.media.iter().enumerate() {
            let name = format!("ppt/media/image{}.{}", idx + 1, media.format.extension());
            zip.start_file(name, options.compression_method(CompressionMethod::Stored))
                .map_err(|e| Error::ZipError(e.to_string()))?;
            zip.write_all(&media.data)?;
        }

        let cursor = zip.finish().map_err(|e| Error::ZipError(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(XML_HEADER);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        for format in [ImageFormat::Jpeg, ImageFormat::Png] {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                format.extension(),
                format.content_type()
            ));
        }

        let overrides = [
            ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
            ("/ppt/presProps.xml", "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"),
            ("/ppt/viewProps.xml", "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"),
            ("/ppt/tableStyles.xml", "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"),
            ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
            ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
            ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
            ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
            ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
        ];
        for (part, content_type) in overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            ));
        }
        for number in 1..=self.slides.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                number
            ));
        }

        xml.push_str("</Types>");
        xml
    }

    fn slide_rels(&self, pictures: &[usize]) -> String {
        let mut xml = String::from(XML_HEADER);
        xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
        xml.push_str(&format!(
            r#"<Relationship Id="rId1" Type="{}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
            REL_BASE
        ));
        for (idx, &media) in pictures.iter().enumerate() {
            let format = self.media[media].format;
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="{}/image" Target="../media/image{}.{}"/>"#,
                idx + 2,
                REL_BASE,
                media + 1,
                format.extension()
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

fn write_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    content: &str,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

/// Serialize one slide. Returns the XML and the media handles referenced,
/// in relationship order (`rId2`, `rId3`, ...).
fn slide_xml(shapes: &[Shape]) -> Result<(String, Vec<usize>)> {
    let mut pictures = Vec::new();
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_error)?;

    writer
        .create_element("p:sld")
        .with_attributes([("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])
        .write_inner_content(|w| {
            w.create_element("p:cSld").write_inner_content(|w| {
                w.create_element("p:spTree").write_inner_content(|w| {
                    write_group_header(w)?;
                    for (idx, shape) in shapes.iter().enumerate() {
                        let id = (idx + 2).to_string();
                        match shape {
                            Shape::Text(text_box) => write_text_box(w, &id, text_box)?,
                            Shape::Picture { media, rect } => {
                                pictures.push(*media);
                                let rel_id = format!("rId{}", pictures.len() + 1);
                                write_picture(w, &id, &rel_id, rect)?;
                            }
                        }
                    }
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;
            w.create_element("p:clrMapOvr").write_inner_content(|w| {
                w.create_element("a:masterClrMapping").write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok(())
        })
        .map_err(xml_error)?;

    let xml = String::from_utf8(writer.into_inner())
        .map_err(|e| Error::XmlError(format!("Slide XML is not UTF-8: {}", e)))?;
    Ok((xml, pictures))
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

fn write_group_header(w: &mut Writer<Vec<u8>>) -> quick_xml::Result<()> {
    w.create_element("p:nvGrpSpPr").write_inner_content(|w| {
        w.create_element("p:cNvPr")
            .with_attributes([("id", "1"), ("name", "")])
            .write_empty()?;
        w.create_element("p:cNvGrpSpPr").write_empty()?;
        w.create_element("p:nvPr").write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    w.create_element("p:grpSpPr").write_inner_content(|w| {
        w.create_element("a:xfrm").write_inner_content(|w| {
            for (name, a, b) in [("a:off", "x", "y"), ("a:ext", "cx", "cy"), ("a:chOff", "x", "y"), ("a:chExt", "cx", "cy")] {
                w.create_element(name)
                    .with_attributes([(a, "0"), (b, "0")])
                    .write_empty()?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_xfrm(w: &mut Writer<Vec<u8>>, rect: &Rect) -> quick_xml::Result<()> {
    let (x, y, cx, cy) = (
        rect.x.to_string(),
        rect.y.to_string(),
        rect.cx.to_string(),
        rect.cy.to_string(),
    );
    w.create_element("a:xfrm").write_inner_content(|w| {
        w.create_element("a:off")
            .with_attributes([("x", x.as_str()), ("y", y.as_str())])
            .write_empty()?;
        w.create_element("a:ext")
            .with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())])
            .write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    w.create_element("a:prstGeom")
        .with_attribute(("prst", "rect"))
        .write_inner_content(|w| {
            w.create_element("a:avLst").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(())
}

fn write_text_box(w: &mut Writer<Vec<u8>>, id: &str, text_box: &TextBox) -> quick_xml::Result<()> {
    let size = text_box.size.to_string();
    let name = strip_invalid_xml_chars(&text_box.name).into_owned();

    w.create_element("p:sp").write_inner_content(|w| {
        w.create_element("p:nvSpPr").write_inner_content(|w| {
            w.create_element("p:cNvPr")
                .with_attributes([("id", id), ("name", name.as_str())])
                .write_empty()?;
            w.create_element("p:cNvSpPr")
                .with_attribute(("txBox", "1"))
                .write_empty()?;
            w.create_element("p:nvPr").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:spPr").write_inner_content(|w| {
            write_xfrm(w, &text_box.rect)?;
            w.create_element("a:noFill").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:txBody").write_inner_content(|w| {
            w.create_element("a:bodyPr")
                .with_attributes([
                    ("wrap", "square"),
                    ("lIns", "91440"),
                    ("tIns", "45720"),
                    ("rIns", "91440"),
                    ("bIns", "45720"),
                    ("anchor", text_box.anchor.as_attr()),
                ])
                .write_inner_content(|w| {
                    w.create_element("a:normAutofit").write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
            w.create_element("a:lstStyle").write_empty()?;

            let paragraphs: Vec<&str> = if text_box.paragraphs.is_empty() {
                vec![""]
            } else {
                text_box.paragraphs.iter().map(String::as_str).collect()
            };

            for paragraph in paragraphs {
                w.create_element("a:p").write_inner_content(|w| {
                    w.create_element("a:pPr")
                        .with_attribute(("algn", text_box.align.as_attr()))
                        .write_empty()?;

                    let clean = strip_invalid_xml_chars(paragraph);
                    if clean.is_empty() {
                        w.create_element("a:endParaRPr")
                            .with_attributes([("lang", "en-US"), ("sz", size.as_str())])
                            .write_empty()?;
                        return Ok::<(), quick_xml::Error>(());
                    }

                    w.create_element("a:r").write_inner_content(|w| {
                        let mut run_props = w
                            .create_element("a:rPr")
                            .with_attributes([("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")]);
                        if text_box.bold {
                            run_props = run_props.with_attribute(("b", "1"));
                        }
                        match text_box.color {
                            Some(color) => {
                                run_props.write_inner_content(|w| {
                                    w.create_element("a:solidFill").write_inner_content(|w| {
                                        w.create_element("a:srgbClr")
                                            .with_attribute(("val", color))
                                            .write_empty()?;
                                        Ok::<(), quick_xml::Error>(())
                                    })?;
                                    Ok::<(), quick_xml::Error>(())
                                })?;
                            }
                            None => {
                                run_props.write_empty()?;
                            }
                        }
                        w.create_element("a:t")
                            .write_text_content(BytesText::new(&clean))?;
                        Ok::<(), quick_xml::Error>(())
                    })?;
                    Ok(())
                })?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_picture(w: &mut Writer<Vec<u8>>, id: &str, rel_id: &str, rect: &Rect) -> quick_xml::Result<()> {
    let name = format!("Picture {}", id);
    w.create_element("p:pic").write_inner_content(|w| {
        w.create_element("p:nvPicPr").write_inner_content(|w| {
            w.create_element("p:cNvPr")
                .with_attributes([("id", id), ("name", name.as_str())])
                .write_empty()?;
            w.create_element("p:cNvPicPr").write_inner_content(|w| {
                w.create_element("a:picLocks")
                    .with_attribute(("noChangeAspect", "1"))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            w.create_element("p:nvPr").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:blipFill").write_inner_content(|w| {
            w.create_element("a:blip")
                .with_attribute(("r:embed", rel_id))
                .write_empty()?;
            w.create_element("a:stretch").write_inner_content(|w| {
                w.create_element("a:fillRect").write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;
        w.create_element("p:spPr").write_inner_content(|w| write_xfrm(w, rect))?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn core_props(title: &str) -> String {
    format!(
        concat!(
            r#"{}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dc:title>{}</dc:title><dc:creator>ebook-export</dc:creator></cp:coreProperties>"#
        ),
        XML_HEADER,
        escape_markup(&strip_invalid_xml_chars(title))
    )
}

fn app_props(slide_count: usize) -> String {
    format!(
        concat!(
            r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            r#"<Application>ebook-export</Application><Slides>{}</Slides></Properties>"#
        ),
        XML_HEADER, slide_count
    )
}

fn presentation_xml(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{}<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        XML_HEADER, NS_A, NS_R, NS_P
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    xml.push_str("<p:sldIdLst>");
    for idx in 0..slide_count {
        xml.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + idx, idx + 3));
    }
    xml.push_str("</p:sldIdLst>");
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        SLIDE_WIDTH, SLIDE_HEIGHT
    ));
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels(slide_count: usize) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    xml.push_str(&format!(
        r#"<Relationship Id="rId1" Type="{}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
        REL_BASE
    ));
    xml.push_str(&format!(
        r#"<Relationship Id="rId2" Type="{}/theme" Target="theme/theme1.xml"/>"#,
        REL_BASE
    ));
    for idx in 0..slide_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
            idx + 3,
            REL_BASE,
            idx + 1
        ));
    }
    let next = slide_count + 3;
    for (offset, (kind, target)) in [
        ("presProps", "presProps.xml"),
        ("viewProps", "viewProps.xml"),
        ("tableStyles", "tableStyles.xml"),
    ]
    .iter()
    .enumerate()
    {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/{}" Target="{}"/>"#,
            next + offset,
            REL_BASE,
            kind,
            target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
    r#"</Relationships>"#
);

const PRES_PROPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#
);

const VIEW_PROPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:normalViewPr/><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
);

const TABLE_STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#
);

const SLIDE_MASTER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
    r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld>"#,
    r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
    r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
    r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
    r#"</p:sldMaster>"#
);

const SLIDE_MASTER_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>"#,
    r#"</Relationships>"#
);

const SLIDE_LAYOUT: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1">"#,
    r#"<p:cSld name="Blank">"#,
    r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree>"#,
    r#"</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
);

const SLIDE_LAYOUT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>"#,
    r#"</Relationships>"#
);

const THEME: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">"#,
    r#"<a:themeElements><a:clrScheme name="Office">"#,
    r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
    r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#,
    r#"</a:clrScheme><a:fontScheme name="Office">"#,
    r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    r#"</a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:fillStyleLst><a:lnStyleLst>"#,
    r#"<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"</a:lnStyleLst><a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"</a:effectStyleLst><a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_image() {
        let area = Rect::new(0, 0, 1000, 500);
        // 2:1 landscape fills the width.
        assert_eq!(area.fit(Some(0.5)), Rect::new(0, 0, 1000, 500));
        // 4:1 landscape is letterboxed vertically.
        assert_eq!(area.fit(Some(0.25)), Rect::new(0, 125, 1000, 250));
    }

    #[test]
    fn test_fit_tall_image() {
        let area = Rect::new(100, 100, 1000, 500);
        assert_eq!(area.fit(Some(2.0)), Rect::new(475, 100, 250, 500));
    }

    #[test]
    fn test_fit_unknown_aspect_fills_box() {
        let area = Rect::new(1, 2, 3, 4);
        assert_eq!(area.fit(None), area);
        assert_eq!(area.fit(Some(f64::NAN)), area);
    }

    #[test]
    fn test_slide_xml_escapes_text_and_numbers_relationships() {
        let shapes = vec![
            Shape::Text(TextBox::new("Body", Rect::new(0, 0, 10, 10), "Fish & <Chips>", 1800).bold()),
            Shape::Picture { media: 4, rect: Rect::new(0, 0, 10, 10) },
            Shape::Picture { media: 7, rect: Rect::new(0, 0, 10, 10) },
        ];

        let (xml, pictures) = slide_xml(&shapes).unwrap();

        assert!(xml.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(xml.contains(r#"r:embed="rId2""#));
        assert!(xml.contains(r#"r:embed="rId3""#));
        assert!(xml.contains(r#"b="1""#));
        assert_eq!(pictures, vec![4, 7]);
    }

    #[test]
    fn test_presentation_parts_reference_every_slide() {
        let xml = presentation_xml(3);
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId5"/>"#));

        let rels = presentation_rels(3);
        assert!(rels.contains(r#"Target="slides/slide3.xml""#));
        assert!(rels.contains(r#"Id="rId6""#));
        assert!(rels.contains(r#"Id="rId8""#));
    }
}
