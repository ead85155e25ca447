//! # Structured Style Metadata
//!
//! Sub-models that don't fit a single flat `property: value` string: shadow
//! stacks, transform chains, filter chains, transitions and multi-layer
//! backgrounds. Each is an ordered list whose entries can be toggled off
//! without being deleted, so an editor can keep a disabled layer around.
//!
//! Metadata compiles down to flat declarations via [`StyleMetadata::to_declarations`];
//! disabled entries are skipped and an empty (or fully disabled) list emits nothing.

use serde::{Deserialize, Serialize};

/// One entry of a metadata list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer<T> {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub value: T,
}

fn enabled_by_default() -> bool {
    true
}

impl<T> Layer<T> {
    pub fn new(value: T) -> Self {
        Self { enabled: true, value }
    }

    pub fn disabled(value: T) -> Self {
        Self { enabled: false, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    #[serde(default)]
    pub inset: bool,
    pub offset_x: String,
    pub offset_y: String,
    pub blur: String,
    pub spread: String,
    pub color: String,
}

impl Shadow {
    fn to_css(&self) -> String {
        let body = format!(
            "{} {} {} {} {}",
            self.offset_x, self.offset_y, self.blur, self.spread, self.color
        );
        if self.inset {
            format!("inset {}", body)
        } else {
            body
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Transform {
    Translate { x: String, y: String },
    Scale { x: String, y: String },
    Rotate { angle: String },
    Skew { x: String, y: String },
}

impl Transform {
    fn to_css(&self) -> String {
        match self {
            Transform::Translate { x, y } => format!("translate({}, {})", x, y),
            Transform::Scale { x, y } => format!("scale({}, {})", x, y),
            Transform::Rotate { angle } => format!("rotate({})", angle),
            Transform::Skew { x, y } => format!("skew({}, {})", x, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterFunction {
    Blur,
    Brightness,
    Contrast,
    Grayscale,
    HueRotate,
    Invert,
    Opacity,
    Saturate,
    Sepia,
}

impl FilterFunction {
    fn css_name(self) -> &'static str {
        match self {
            FilterFunction::Blur => "blur",
            FilterFunction::Brightness => "brightness",
            FilterFunction::Contrast => "contrast",
            FilterFunction::Grayscale => "grayscale",
            FilterFunction::HueRotate => "hue-rotate",
            FilterFunction::Invert => "invert",
            FilterFunction::Opacity => "opacity",
            FilterFunction::Saturate => "saturate",
            FilterFunction::Sepia => "sepia",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub function: FilterFunction,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub property: String,
    pub duration_ms: u32,
    #[serde(default = "default_easing")]
    pub easing: String,
    #[serde(default)]
    pub delay_ms: u32,
}

fn default_easing() -> String {
    "ease".to_string()
}

impl Transition {
    fn to_css(&self) -> String {
        if self.delay_ms > 0 {
            format!("{} {}ms {} {}ms", self.property, self.duration_ms, self.easing, self.delay_ms)
        } else {
            format!("{} {}ms {}", self.property, self.duration_ms, self.easing)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Background {
    /// Solid fill, expressed as a flat gradient so it can stack with images
    Color { color: String },
    Image { url: String },
    LinearGradient { angle: String, stops: Vec<String> },
    RadialGradient { stops: Vec<String> },
}

impl Background {
    fn to_css(&self) -> String {
        match self {
            Background::Color { color } => format!("linear-gradient({}, {})", color, color),
            Background::Image { url } => format!("url(\"{}\")", url),
            Background::LinearGradient { angle, stops } => {
                format!("linear-gradient({}, {})", angle, stops.join(", "))
            }
            Background::RadialGradient { stops } => {
                format!("radial-gradient({})", stops.join(", "))
            }
        }
    }
}

/// Structured sub-models attached to a style source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shadows: Vec<Layer<Shadow>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Layer<Transform>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Layer<Filter>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<Layer<Transition>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backgrounds: Vec<Layer<Background>>,
}

impl StyleMetadata {
    pub fn is_empty(&self) -> bool {
        self.shadows.is_empty()
            && self.transforms.is_empty()
            && self.filters.is_empty()
            && self.transitions.is_empty()
            && self.backgrounds.is_empty()
    }

    /// Compile enabled entries to flat `(property, value)` pairs
    pub fn to_declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        if let Some(value) = join_enabled(&self.shadows, ", ", Shadow::to_css) {
            out.push(("box-shadow", value));
        }
        if let Some(value) = join_enabled(&self.transforms, " ", Transform::to_css) {
            out.push(("transform", value));
        }
        if let Some(value) = join_enabled(&self.filters, " ", |f: &Filter| {
            format!("{}({})", f.function.css_name(), f.amount)
        }) {
            out.push(("filter", value));
        }
        if let Some(value) = join_enabled(&self.transitions, ", ", Transition::to_css) {
            out.push(("transition", value));
        }
        if let Some(value) = join_enabled(&self.backgrounds, ", ", Background::to_css) {
            out.push(("background-image", value));
        }

        out
    }
}

fn join_enabled<T>(
    layers: &[Layer<T>],
    sep: &str,
    render: impl Fn(&T) -> String,
) -> Option<String> {
    let parts: Vec<String> = layers
        .iter()
        .filter(|layer| layer.enabled)
        .map(|layer| render(&layer.value))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(sep))
    }
}
