use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use resvg::render;
use std::io::Cursor;
use tiny_skia::Pixmap;
use usvg::{Options, Tree};

use super::{Word, WordBoundingRegion};

pub struct OverlayStyle {
    pub stroke_color: String,
    pub fill_opacity: f32,
    /// Highlight colors, picked per word so every segment of one token
    /// shares a color.
    pub palette: Vec<String>,
}

impl OverlayStyle {
    fn color_for(&self, word: usize) -> &str {
        if self.palette.is_empty() {
            return self.stroke_color.as_str();
        }
        self.palette[word % self.palette.len()].as_str()
    }
}

/// Draws the regions over the page image in the order given, so the
/// smallest boxes land on top. Each box carries a `<title>` with the
/// token's surface form and reading.
pub fn render_region_svg(
    page_image: Option<(&[u8], &str)>,
    width: f32,
    height: f32,
    regions: &[WordBoundingRegion],
    words: &[Word],
    style: &OverlayStyle,
) -> Result<String> {
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    ));
    match page_image {
        Some((bytes, mime)) => {
            let encoded = BASE64.encode(bytes);
            let data_uri = format!("data:{};base64,{}", mime, encoded);
            svg.push_str(&format!(
                r#"<image href="{uri}" xlink:href="{uri}" x="0" y="0" width="{w}" height="{h}" preserveAspectRatio="none"/>"#,
                uri = data_uri,
                w = width,
                h = height
            ));
        }
        None => {
            svg.push_str(&format!(
                r##"<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>"##,
                w = width,
                h = height
            ));
        }
    }

    for region in regions {
        let word = words
            .get(region.word)
            .ok_or_else(|| anyhow!("region refers to unknown word #{}", region.word))?;
        let color = escape_xml(style.color_for(region.word));
        svg.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{color}" fill-opacity="{opacity}" stroke="{stroke}" stroke-width="1">"#,
            x = region.x,
            y = region.y,
            w = region.width,
            h = region.height,
            color = color,
            opacity = style.fill_opacity.clamp(0.0, 1.0),
            stroke = escape_xml(&style.stroke_color)
        ));
        let title = if word.reading.is_empty() {
            word.surface_form.clone()
        } else {
            format!("{} ({})", word.surface_form, word.reading)
        };
        svg.push_str(&format!("<title>{}</title></rect>", escape_xml(&title)));
    }

    svg.push_str("</svg>");
    Ok(svg)
}

pub fn render_svg_bytes(svg: &str, output_mime: &str) -> Result<Vec<u8>> {
    let options = Options::default();
    let tree = Tree::from_str(svg, &options).with_context(|| "failed to parse SVG")?;
    let size = tree.size().to_int_size();
    let mut pixmap =
        Pixmap::new(size.width(), size.height()).ok_or_else(|| anyhow!("empty SVG size"))?;
    let mut pixmap_mut = pixmap.as_mut();
    render(&tree, tiny_skia::Transform::identity(), &mut pixmap_mut);
    let image = image::RgbaImage::from_raw(size.width(), size.height(), pixmap.data().to_vec())
        .ok_or_else(|| anyhow!("failed to build image buffer from SVG"))?;
    let format = image_format_from_mime(output_mime)
        .ok_or_else(|| anyhow!("unsupported output image mime '{}'", output_mime))?;
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut cursor, format)
        .with_context(|| "failed to encode image from SVG")?;
    Ok(bytes)
}

pub(crate) fn image_format_from_mime(mime: &str) -> Option<image::ImageFormat> {
    match mime {
        "image/png" => Some(image::ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(image::ImageFormat::Jpeg),
        "image/webp" => Some(image::ImageFormat::WebP),
        "image/bmp" => Some(image::ImageFormat::Bmp),
        _ => None,
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
