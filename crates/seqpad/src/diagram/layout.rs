//! Column/row placement for compiled diagrams
//!
//! One column per actor (header box plus lifeline), one row band per
//! exchange. Column gaps widen to fit the widest label that has to span
//! them. Pixel geometry is out of scope here; everything is in character
//! cells.

use unicode_width::UnicodeWidthStr;

use super::model::{CompiledDiagram, LineStyle};
use crate::core::DiagramError;

/// An actor placed at a concrete column
#[derive(Debug, Clone)]
pub struct PlacedActor {
    pub id: String,
    pub label: String,
    /// Center column of the header box and lifeline
    pub x: usize,
    /// Header box width
    pub width: usize,
}

/// An exchange placed at a concrete row
#[derive(Debug, Clone)]
pub struct PlacedExchange {
    pub from_x: usize,
    pub to_x: usize,
    pub y: usize,
    pub label: Option<String>,
    pub line: LineStyle,
}

/// The complete placement handed to the renderer
#[derive(Debug)]
pub struct DiagramLayout {
    pub actors: Vec<PlacedActor>,
    pub exchanges: Vec<PlacedExchange>,
    pub width: usize,
    pub height: usize,
    /// Row where lifelines start, right below the header boxes
    pub lifeline_top: usize,
}

/// Spacing rules for the placement
pub struct LayoutEngine {
    header_padding: usize,
    actor_gap: usize,
    exchange_stride: usize,
    header_height: usize,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            header_padding: 2,
            actor_gap: 6,
            exchange_stride: 2,
            header_height: 3,
        }
    }

    fn header_width(&self, label: &str) -> usize {
        UnicodeWidthStr::width(label) + self.header_padding * 2
    }

    /// Place every actor and exchange of the diagram
    pub fn layout(&self, diagram: &CompiledDiagram) -> Result<DiagramLayout, DiagramError> {
        if diagram.is_empty() {
            return Ok(DiagramLayout {
                actors: Vec::new(),
                exchanges: Vec::new(),
                width: 0,
                height: 0,
                lifeline_top: 0,
            });
        }

        let actors = diagram.actors();
        let widths: Vec<usize> = actors.iter().map(|a| self.header_width(&a.label)).collect();

        // Start from the uniform gap, then widen the gaps a label spans
        // whenever the label would not fit between the two lifelines.
        let mut gaps = vec![self.actor_gap; actors.len().saturating_sub(1)];
        for exchange in diagram.exchanges() {
            let (Some(from_idx), Some(to_idx)) = (
                diagram.actor_index(&exchange.from),
                diagram.actor_index(&exchange.to),
            ) else {
                return Err(DiagramError::layout(format!(
                    "exchange references unknown actor {} or {}",
                    exchange.from, exchange.to
                )));
            };
            let Some(label) = &exchange.label else {
                continue;
            };

            let (left, right) = if from_idx <= to_idx {
                (from_idx, to_idx)
            } else {
                (to_idx, from_idx)
            };
            if left == right {
                continue;
            }

            // Room needed: label plus arrow head and breathing space.
            let needed = UnicodeWidthStr::width(label.as_str()) + 4;
            let mut span = widths[left] / 2 + widths[right] / 2;
            for i in left..right {
                span += gaps[i];
            }
            for i in (left + 1)..right {
                span += widths[i];
            }

            if needed > span {
                let extra = needed - span;
                let slots = right - left;
                let per_slot = extra.div_ceil(slots);
                for gap in gaps.iter_mut().take(right).skip(left) {
                    *gap += per_slot;
                }
            }
        }

        let mut placed_actors = Vec::with_capacity(actors.len());
        let mut x = 1; // Left margin
        for (i, actor) in actors.iter().enumerate() {
            let width = widths[i];
            placed_actors.push(PlacedActor {
                id: actor.id.clone(),
                label: actor.label.clone(),
                x: x + width / 2,
                width,
            });
            x += width;
            if i + 1 < actors.len() {
                x += gaps[i];
            }
        }
        let total_width = x + 1; // Right margin

        let mut placed_exchanges = Vec::with_capacity(diagram.exchange_count());
        let mut y = self.header_height + 1;
        for exchange in diagram.exchanges() {
            // Indices were validated in the gap pass above.
            let from_idx = diagram.actor_index(&exchange.from).unwrap_or(0);
            let to_idx = diagram.actor_index(&exchange.to).unwrap_or(0);
            placed_exchanges.push(PlacedExchange {
                from_x: placed_actors[from_idx].x,
                to_x: placed_actors[to_idx].x,
                y,
                label: exchange.label.clone(),
                line: exchange.line,
            });
            y += self.exchange_stride;
        }

        Ok(DiagramLayout {
            actors: placed_actors,
            exchanges: placed_exchanges,
            width: total_width,
            height: y + 1,
            lifeline_top: self.header_height,
        })
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}
