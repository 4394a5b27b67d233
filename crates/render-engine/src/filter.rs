//! Typed ffmpeg filter graphs.
//!
//! Each [`Filter`] renders one filter instance; a [`FilterChain`] joins them
//! with `,` between optional input and output pad labels; a [`FilterGraph`]
//! joins chains with `;`. Nothing outside this module formats filter text.

use std::fmt;

use vibe_project_model::category::ColorGrade;

/// How `scale` treats the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectFit {
    /// Grow until both sides cover the frame (crop afterwards).
    Cover,
    /// Shrink until the whole image fits inside the frame.
    Contain,
}

/// Where `crop` takes its window from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropAnchor {
    /// Encoder default (centred).
    Default,
    /// Explicit centre offsets.
    Center,
}

/// A single filter instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Scale {
        width: u32,
        height: u32,
        fit: AspectFit,
    },
    Crop {
        width: u32,
        height: u32,
        anchor: CropAnchor,
    },
    GaussianBlur {
        sigma: f64,
    },
    /// Overlay the second input centred on the first.
    OverlayCentered,
    /// Slow centred zoom-in ("Ken Burns").
    ZoomIn {
        step: f64,
        max_zoom: f64,
        frames: u64,
        width: u32,
        height: u32,
        fps: u32,
    },
    ColorGrade(ColorGrade),
    Volume(f64),
    /// `amix` whose length follows its first input.
    Mix {
        inputs: usize,
        dropout_transition: f64,
        normalize: bool,
    },
}

impl Filter {
    pub fn scale(width: u32, height: u32, fit: AspectFit) -> Self {
        Filter::Scale { width, height, fit }
    }

    pub fn crop(width: u32, height: u32, anchor: CropAnchor) -> Self {
        Filter::Crop {
            width,
            height,
            anchor,
        }
    }

    pub fn blur(sigma: f64) -> Self {
        Filter::GaussianBlur { sigma }
    }

    pub fn volume(gain: f64) -> Self {
        Filter::Volume(gain)
    }

    /// Fixed-weight mix bounded by the first input, no normalisation.
    pub fn mix(inputs: usize) -> Self {
        Filter::Mix {
            inputs,
            dropout_transition: 0.0,
            normalize: false,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Scale { width, height, fit } => match fit {
                AspectFit::Cover => write!(
                    f,
                    "scale={width}:{height}:force_original_aspect_ratio=increase"
                ),
                AspectFit::Contain => write!(
                    f,
                    "scale={width}:{height}:force_original_aspect_ratio=decrease"
                ),
            },
            Filter::Crop {
                width,
                height,
                anchor,
            } => match anchor {
                CropAnchor::Default => write!(f, "crop={width}:{height}"),
                CropAnchor::Center => write!(
                    f,
                    "crop={width}:{height}:(iw-{width})/2:(ih-{height})/2"
                ),
            },
            Filter::GaussianBlur { sigma } => write!(f, "gblur=sigma={sigma}"),
            Filter::OverlayCentered => f.write_str("overlay=(W-w)/2:(H-h)/2"),
            Filter::ZoomIn {
                step,
                max_zoom,
                frames,
                width,
                height,
                fps,
            } => write!(
                f,
                "zoompan=z='min(zoom+{step},{max_zoom})':x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d={frames}:s={width}x{height}:fps={fps}"
            ),
            Filter::ColorGrade(grade) => {
                if grade.is_identity() {
                    return f.write_str("null");
                }
                f.write_str("eq")?;
                let mut sep = '=';
                for (key, value) in [
                    ("brightness", grade.brightness),
                    ("contrast", grade.contrast),
                    ("saturation", grade.saturation),
                    ("gamma", grade.gamma),
                ] {
                    if let Some(value) = value {
                        write!(f, "{sep}{key}={value}")?;
                        sep = ':';
                    }
                }
                Ok(())
            }
            Filter::Volume(gain) => write!(f, "volume={gain}"),
            Filter::Mix {
                inputs,
                dropout_transition,
                normalize,
            } => write!(
                f,
                "amix=inputs={inputs}:duration=first:dropout_transition={dropout_transition}:normalize={}",
                u8::from(*normalize)
            ),
        }
    }
}

/// Stream reference inside a filter graph (`0:v`, `bg`, `aout`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pad(String);

impl Pad {
    pub fn new(label: impl Into<String>) -> Self {
        Pad(label.into())
    }

    pub fn video_input(index: usize) -> Self {
        Pad(format!("{index}:v"))
    }

    pub fn audio_input(index: usize) -> Self {
        Pad(format!("{index}:a"))
    }

    /// The label as used with `-map`, e.g. `[aout]`.
    pub fn map_arg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Linear sequence of filters between pad labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    inputs: Vec<Pad>,
    filters: Vec<Filter>,
    outputs: Vec<Pad>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, pad: Pad) -> Self {
        self.inputs.push(pad);
        self
    }

    pub fn inputs(mut self, pads: impl IntoIterator<Item = Pad>) -> Self {
        self.inputs.extend(pads);
        self
    }

    pub fn then(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn output(mut self, pad: Pad) -> Self {
        self.outputs.push(pad);
        self
    }

}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pad in &self.inputs {
            write!(f, "{pad}")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        for pad in &self.outputs {
            write!(f, "{pad}")?;
        }
        Ok(())
    }
}

/// A complete `-filter_complex` expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(mut self, chain: FilterChain) -> Self {
        self.chains.push(chain);
        self
    }

    pub fn push(&mut self, chain: FilterChain) {
        self.chains.push(chain);
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.chains.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{chain}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_project_model::category::Category;

    #[test]
    fn test_scale_variants() {
        assert_eq!(
            Filter::scale(1080, 1920, AspectFit::Cover).to_string(),
            "scale=1080:1920:force_original_aspect_ratio=increase"
        );
        assert_eq!(
            Filter::scale(1080, 1920, AspectFit::Contain).to_string(),
            "scale=1080:1920:force_original_aspect_ratio=decrease"
        );
    }

    #[test]
    fn test_crop_variants() {
        assert_eq!(
            Filter::crop(1080, 1920, CropAnchor::Center).to_string(),
            "crop=1080:1920:(iw-1080)/2:(ih-1920)/2"
        );
        assert_eq!(
            Filter::crop(1080, 1920, CropAnchor::Default).to_string(),
            "crop=1080:1920"
        );
    }

    #[test]
    fn test_zoom_in() {
        let zoom = Filter::ZoomIn {
            step: 0.0005,
            max_zoom: 1.06,
            frames: 300,
            width: 1080,
            height: 1920,
            fps: 30,
        };
        assert_eq!(
            zoom.to_string(),
            "zoompan=z='min(zoom+0.0005,1.06)':x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d=300:s=1080x1920:fps=30"
        );
    }

    #[test]
    fn test_color_grades_render_as_eq() {
        assert_eq!(
            Filter::ColorGrade(Category::Motivational.color_grade()).to_string(),
            "eq=brightness=0.06:saturation=1.3"
        );
        assert_eq!(
            Filter::ColorGrade(Category::Fitness.color_grade()).to_string(),
            "eq=contrast=1.2:saturation=1.2"
        );
        assert_eq!(
            Filter::ColorGrade(Category::Religious.color_grade()).to_string(),
            "eq=brightness=0.03:saturation=0.85:gamma=1.05"
        );
        assert_eq!(
            Filter::ColorGrade(ColorGrade::default()).to_string(),
            "null"
        );
    }

    #[test]
    fn test_volume_and_mix() {
        assert_eq!(Filter::volume(0.5).to_string(), "volume=0.5");
        assert_eq!(Filter::volume(1.0).to_string(), "volume=1");
        assert_eq!(
            Filter::mix(3).to_string(),
            "amix=inputs=3:duration=first:dropout_transition=0:normalize=0"
        );
    }

    #[test]
    fn test_chain_and_graph_join() {
        let graph = FilterGraph::new()
            .chain(
                FilterChain::new()
                    .input(Pad::audio_input(1))
                    .then(Filter::volume(0.5))
                    .output(Pad::new("a0")),
            )
            .chain(
                FilterChain::new()
                    .input(Pad::audio_input(2))
                    .then(Filter::volume(0.25))
                    .output(Pad::new("a1")),
            )
            .chain(
                FilterChain::new()
                    .inputs([Pad::new("a0"), Pad::new("a1")])
                    .then(Filter::mix(2))
                    .output(Pad::new("aout")),
            );
        assert_eq!(
            graph.to_string(),
            "[1:a]volume=0.5[a0];[2:a]volume=0.25[a1];[a0][a1]amix=inputs=2:duration=first:dropout_transition=0:normalize=0[aout]"
        );
    }

    #[test]
    fn test_unlabelled_chain_is_plain_filter_list() {
        let chain = FilterChain::new()
            .then(Filter::blur(30.0))
            .then(Filter::OverlayCentered);
        assert_eq!(chain.to_string(), "gblur=sigma=30,overlay=(W-w)/2:(H-h)/2");
        assert_eq!(Pad::new("vout").map_arg(), "[vout]");
    }
}
