//! Chart lifecycle.
//!
//! A canvas holds at most one live chart. [`ChartSlot::acquire`] always
//! releases the previous chart before creating the next one, because
//! backends refuse to draw on a canvas that is still in use.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::utils::format_number;

/// Handle to a live chart.
pub type ChartId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

/// Everything needed to draw one single-series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub label: String,
    pub axis_title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Fixed y range; `None` starts at zero and fits the data
    pub bounds: Option<(f64, f64)>,
}

/// Rendering sink for charts.
pub trait ChartBackend: Send {
    fn create(&mut self, canvas: &str, spec: &ChartSpec) -> Result<ChartId>;
    fn destroy(&mut self, id: ChartId);
}

/// A canvas and the chart currently drawn on it.
#[derive(Debug)]
pub struct ChartSlot {
    canvas: String,
    live: Option<ChartId>,
}

impl ChartSlot {
    pub fn new(canvas: impl Into<String>) -> Self {
        Self {
            canvas: canvas.into(),
            live: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Release the current chart, then draw `spec`.
    pub fn acquire(&mut self, backend: &mut dyn ChartBackend, spec: &ChartSpec) -> Result<()> {
        self.release(backend);
        self.live = Some(backend.create(&self.canvas, spec)?);
        Ok(())
    }

    pub fn release(&mut self, backend: &mut dyn ChartBackend) {
        if let Some(id) = self.live.take() {
            backend.destroy(id);
        }
    }
}

/// Draws charts as text bars.
#[derive(Debug, Default)]
pub struct TextChartBackend {
    next_id: ChartId,
    canvases: HashMap<String, (ChartId, String)>,
    echo: bool,
}

const BAR_WIDTH: f64 = 40.0;

impl TextChartBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that also prints every chart to stdout when drawn.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Current drawing on a canvas.
    pub fn drawing(&self, canvas: &str) -> Option<&str> {
        self.canvases.get(canvas).map(|(_, text)| text.as_str())
    }

    pub fn live_count(&self) -> usize {
        self.canvases.len()
    }

    fn draw(spec: &ChartSpec) -> String {
        let (low, high) = spec.bounds.unwrap_or_else(|| {
            let max = spec.values.iter().copied().fold(0.0_f64, f64::max);
            (0.0, max)
        });
        let span = (high - low).max(f64::EPSILON);
        let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let glyph = match spec.kind {
            ChartKind::Bar => '█',
            ChartKind::Line => '•',
        };

        let mut out = String::new();
        out.push_str(&format!("{} ({})\n", spec.label, spec.axis_title));
        for (label, value) in spec.labels.iter().zip(&spec.values) {
            let filled = (((value - low) / span).clamp(0.0, 1.0) * BAR_WIDTH).round() as usize;
            let bar: String = match spec.kind {
                ChartKind::Bar => std::iter::repeat_n(glyph, filled).collect(),
                ChartKind::Line => {
                    let mut row = " ".repeat(filled);
                    row.push(glyph);
                    row
                }
            };
            out.push_str(&format!("{label:>label_width$} | {bar} {}\n", format_number(*value)));
        }
        out
    }
}

impl ChartBackend for TextChartBackend {
    fn create(&mut self, canvas: &str, spec: &ChartSpec) -> Result<ChartId> {
        if self.canvases.contains_key(canvas) {
            return Err(AppError::CanvasInUse(canvas.to_string()));
        }
        self.next_id += 1;
        let id = self.next_id;
        let text = Self::draw(spec);
        if self.echo {
            println!("{text}");
        }
        self.canvases.insert(canvas.to_string(), (id, text));
        Ok(id)
    }

    fn destroy(&mut self, id: ChartId) {
        self.canvases.retain(|_, (live, _)| *live != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(values: Vec<f64>) -> ChartSpec {
        ChartSpec {
            kind: ChartKind::Bar,
            label: "Questões Feitas".into(),
            axis_title: "Nº de Questões".into(),
            labels: values.iter().enumerate().map(|(i, _)| format!("0{}/01", i + 1)).collect(),
            values,
            bounds: None,
        }
    }

    #[test]
    fn backend_refuses_reuse_of_canvas() {
        let mut backend = TextChartBackend::new();
        backend.create("graficoQuantidade", &spec(vec![1.0])).unwrap();
        let err = backend
            .create("graficoQuantidade", &spec(vec![2.0]))
            .unwrap_err();
        assert!(matches!(err, AppError::CanvasInUse(_)));
    }

    #[test]
    fn slot_releases_before_acquiring() {
        let mut backend = TextChartBackend::new();
        let mut slot = ChartSlot::new("graficoQuantidade");

        slot.acquire(&mut backend, &spec(vec![10.0, 20.0])).unwrap();
        slot.acquire(&mut backend, &spec(vec![5.0])).unwrap();

        assert_eq!(backend.live_count(), 1);
        assert!(backend.drawing("graficoQuantidade").unwrap().contains(" 5"));
    }

    #[test]
    fn release_clears_canvas() {
        let mut backend = TextChartBackend::new();
        let mut slot = ChartSlot::new("graficoPercentual");
        slot.acquire(&mut backend, &spec(vec![50.0])).unwrap();

        slot.release(&mut backend);
        assert!(!slot.is_live());
        assert_eq!(backend.live_count(), 0);
        slot.release(&mut backend);
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        let text = TextChartBackend::draw(&spec(vec![20.0, 40.0]));
        let lines: Vec<_> = text.lines().skip(1).collect();
        assert_eq!(lines[0].matches('█').count(), 20);
        assert_eq!(lines[1].matches('█').count(), 40);
    }
}
