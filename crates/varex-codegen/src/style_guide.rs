//! Style guide generator.
//!
//! Lays out the flat view of an export as a tree of auto-layout frames, text
//! and color swatches. The tree is host-agnostic; a [`Canvas`] turns it into
//! real document nodes.

use serde::{Deserialize, Serialize};
use varex_model::{OrganizedExport, ResolvedValue, Rgba, VariableType};
use varex_organizer::HostError;

use crate::js_string;

const PADDING: f64 = 40.0;
const ITEM_SPACING: f64 = 20.0;
const SECTION_SPACING: f64 = 60.0;
const COLOR_SWATCH_SIZE: f64 = 80.0;
const SWATCH_CORNER_RADIUS: f64 = 4.0;
const ITEMS_PER_ROW: usize = 20;

const TITLE_SIZE: f64 = 24.0;
const SECTION_TITLE_SIZE: f64 = 18.0;
const LABEL_SIZE: f64 = 12.0;
const VALUE_SIZE: f64 = 10.0;

const FONT_FAMILY: &str = "Inter";

/// A font the host must load before text can be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn regular() -> Self {
        Self {
            family: FONT_FAMILY.into(),
            style: "Regular".into(),
        }
    }

    pub fn bold() -> Self {
        Self {
            family: FONT_FAMILY.into(),
            style: "Bold".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Layout {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Align {
    Min,
}

/// An auto-layout frame that hugs its content on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub name: String,
    pub layout: Layout,
    pub padding: f64,
    pub item_spacing: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_axis_align: Option<Align>,
    pub children: Vec<StyleNode>,
}

impl Frame {
    fn new(name: impl Into<String>, layout: Layout, item_spacing: f64) -> Self {
        Self {
            name: name.into(),
            layout,
            padding: 0.0,
            item_spacing,
            counter_axis_align: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub font: FontName,
    pub font_size: f64,
    pub characters: String,
}

impl Text {
    fn new(font: FontName, font_size: f64, characters: impl Into<String>) -> Self {
        Self {
            font,
            font_size,
            characters: characters.into(),
        }
    }
}

/// A filled rounded square showing a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    pub name: String,
    pub size: f64,
    pub color: Rgba,
    pub opacity: f64,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StyleNode {
    Frame(Frame),
    Text(Text),
    Swatch(Swatch),
}

impl StyleNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Frame(frame) => &frame.name,
            Self::Text(text) => &text.characters,
            Self::Swatch(swatch) => &swatch.name,
        }
    }

    pub fn children(&self) -> &[StyleNode] {
        match self {
            Self::Frame(frame) => &frame.children,
            _ => &[],
        }
    }
}

/// The host's drawing surface.
#[allow(async_fn_in_trait)]
pub trait Canvas {
    async fn load_font(&self, font: &FontName) -> Result<(), HostError>;

    /// Create `root` and its descendants on the current page and bring it into view.
    async fn insert(&self, root: &StyleNode) -> Result<(), HostError>;
}

impl<C: Canvas + ?Sized> Canvas for &C {
    async fn load_font(&self, font: &FontName) -> Result<(), HostError> {
        (**self).load_font(font).await
    }

    async fn insert(&self, root: &StyleNode) -> Result<(), HostError> {
        (**self).insert(root).await
    }
}

/// Style guide rendering error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("could not load font {family} {style}: {source}")]
    Font {
        family: String,
        style: String,
        source: HostError,
    },
    #[error(transparent)]
    Canvas(#[from] HostError),
}

/// Lay out the flat view of `export` as a style guide tree.
pub fn build(export: &OrganizedExport) -> StyleNode {
    let file_name = &export.metadata.file_name;

    let mut root = Frame::new(
        format!("Variable Style Guide - {file_name}"),
        Layout::Vertical,
        SECTION_SPACING,
    );
    root.padding = PADDING;
    root.children.push(StyleNode::Text(Text::new(
        FontName::bold(),
        TITLE_SIZE,
        format!("Variable Style Guide: {file_name}"),
    )));

    for (ty, bucket) in &export.variables_by_type {
        if bucket.variables.is_empty() {
            continue;
        }

        let mut section = Frame::new(
            format!("{ty} Variables"),
            Layout::Vertical,
            ITEM_SPACING * 2.0,
        );
        section.children.push(StyleNode::Text(Text::new(
            FontName::bold(),
            SECTION_TITLE_SIZE,
            ty.as_str(),
        )));

        let mut container = Frame::new(format!("{ty} Container"), Layout::Vertical, ITEM_SPACING);
        for (index, chunk) in bucket.variables.chunks(ITEMS_PER_ROW).enumerate() {
            let mut row = Frame::new(
                format!("{ty} Row {}", index + 1),
                Layout::Horizontal,
                ITEM_SPACING,
            );
            row.counter_axis_align = Some(Align::Min);

            for variable in chunk {
                let mut item =
                    Frame::new(variable.name.clone(), Layout::Vertical, ITEM_SPACING / 2.0);
                let label = Text::new(FontName::regular(), LABEL_SIZE, variable.name.clone());

                match &variable.value {
                    Some(ResolvedValue::Color(color)) if variable.ty == VariableType::Color => {
                        item.children.push(StyleNode::Swatch(Swatch {
                            name: "Color Swatch".into(),
                            size: COLOR_SWATCH_SIZE,
                            color: Rgba::rgb(color.rgb.r, color.rgb.g, color.rgb.b),
                            opacity: color.rgb.a.unwrap_or(1.0),
                            corner_radius: SWATCH_CORNER_RADIUS,
                        }));
                        item.children.push(StyleNode::Text(label));
                        item.children.push(StyleNode::Text(Text::new(
                            FontName::regular(),
                            VALUE_SIZE,
                            color.hex.clone(),
                        )));
                    }
                    value => {
                        item.children.push(StyleNode::Text(label));
                        item.children.push(StyleNode::Text(Text::new(
                            FontName::regular(),
                            VALUE_SIZE,
                            js_string(value.as_ref()),
                        )));
                    }
                }

                row.children.push(StyleNode::Frame(item));
            }

            container.children.push(StyleNode::Frame(row));
        }

        section.children.push(StyleNode::Frame(container));
        root.children.push(StyleNode::Frame(section));
    }

    StyleNode::Frame(root)
}

/// Load the fonts, build the style guide for `export` and insert it on `canvas`.
pub async fn render<C: Canvas>(canvas: &C, export: &OrganizedExport) -> Result<(), RenderError> {
    for font in [FontName::regular(), FontName::bold()] {
        if let Err(source) = canvas.load_font(&font).await {
            return Err(RenderError::Font {
                family: font.family,
                style: font.style,
                source,
            });
        }
    }

    canvas.insert(&build(export)).await?;
    Ok(())
}
