//! Grid layout of tagged cells on a page.
//!
//! Positions are top-left corners in millimetres with the origin at the top
//! left of the page. Rows advance down the page and columns across it; cells
//! are stored row-major.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::config::{SheetConfig, SheetSettings};
use crate::error::SheetError;
use crate::tag::{IndexSource, TagGenerator};

/// A (width, height) pair, used for both positions and extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub width: f64,
    pub height: f64,
}

impl Coordinate {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.width, self.height)
    }
}

/// One grid position with its tag.
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub tag: String,
    pub position: Coordinate,
    /// Encoded symbol image, filled in by a `SymbolEncoder`
    pub image: Option<Vec<u8>>,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}) Position = {}", self.tag, self.row, self.column, self.position)
    }
}

/// Instruction handed to the rendering collaborator for one cell.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub text: &'a str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub image: Option<&'a [u8]>,
}

/// Turns a payload string into opaque image bytes.
pub trait SymbolEncoder {
    type Error;

    fn encode(&self, payload: &str) -> Result<Vec<u8>, Self::Error>;
}

/// A printable page holding the grid of cells.
#[derive(Debug, Clone)]
pub struct Sheet {
    rows: usize,
    cols: usize,
    margin: Coordinate,
    page: Coordinate,
    content_area: Coordinate,
    cell_size: Coordinate,
    prefix: Option<String>,
    cells: Vec<Cell>,
}

/// Validate `settings` and lay out a sheet, drawing tags from `source`.
pub fn create_sheet<S: IndexSource>(settings: &SheetSettings, source: S) -> Result<Sheet, SheetError> {
    let config = SheetConfig::validate(settings)?;
    let mut generator = TagGenerator::new(config.alphabet().clone(), source);
    Ok(Sheet::layout(&config, &mut generator))
}

impl Sheet {
    /// Partition the content area of a validated configuration into cells.
    pub fn layout<S: IndexSource>(config: &SheetConfig, generator: &mut TagGenerator<S>) -> Self {
        let (rows, cols) = (config.rows(), config.cols());
        let margin = config.margin();
        let page = config.page();
        let content_area = Coordinate::new(
            page.width - 2.0 * margin.width,
            page.height - 2.0 * margin.height,
        );
        let cell_size = Coordinate::new(
            content_area.width / cols as f64,
            content_area.height / rows as f64,
        );

        let mut issued = HashSet::with_capacity(rows * cols);
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for column in 0..cols {
                let tag = loop {
                    let candidate = generator.generate();
                    if issued.insert(candidate.clone()) {
                        break candidate;
                    }
                    warn!(tag = %candidate, "Tag collision, drawing again");
                };
                let position = Coordinate::new(
                    margin.width + column as f64 * cell_size.width,
                    margin.height + row as f64 * cell_size.height,
                );
                debug!("Creating tag {} at ({}, {})", tag, row, column);
                cells.push(Cell {
                    row,
                    column,
                    tag,
                    position,
                    image: None,
                });
            }
        }

        Self {
            rows,
            cols,
            margin,
            page,
            content_area,
            cell_size,
            prefix: config.prefix().map(str::to_string),
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn margin(&self) -> Coordinate {
        self.margin
    }

    pub fn page(&self) -> Coordinate {
        self.page
    }

    pub fn content_area(&self) -> Coordinate {
        self.content_area
    }

    pub fn cell_size(&self) -> Coordinate {
        self.cell_size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        if row < self.rows && column < self.cols {
            self.cells.get(row * self.cols + column)
        } else {
            None
        }
    }

    /// What a cell's symbol encodes: the prefix followed by the tag.
    pub fn symbol_payload(&self, cell: &Cell) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, cell.tag),
            None => cell.tag.clone(),
        }
    }

    /// Attach an encoded symbol to every cell.
    pub fn with_symbols<E: SymbolEncoder>(self, encoder: &E) -> Result<Self, E::Error> {
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                let image = encoder.encode(&self.symbol_payload(cell))?;
                Ok(Cell {
                    image: Some(image),
                    ..cell.clone()
                })
            })
            .collect::<Result<Vec<_>, E::Error>>()?;
        Ok(Self { cells, ..self })
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement<'_>> {
        self.cells.iter().map(|cell| Placement {
            text: &cell.tag,
            x: cell.position.width,
            y: cell.position.height,
            width: self.cell_size.width,
            height: self.cell_size.height,
            image: cell.image.as_deref(),
        })
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} x {}) {}", self.rows, self.cols, self.cell_size)?;
        for cell in &self.cells {
            write!(f, "\n{}", cell)?;
        }
        Ok(())
    }
}
