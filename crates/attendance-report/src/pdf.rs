//! One-page PDF report per student.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use attendance_core::{ReportRenderer, StudentReport, deduplicate};
use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::fonts::{FontFace, PageFont, TextRun};
use crate::images::RasterImage;

const MARGIN: f32 = 36.0;
const BANNER_HEIGHT: f32 = 219.0;
const LOGO_WIDTH: f32 = 49.0;
const LOGO_HEIGHT: f32 = 197.0;
const TITLE_SIZE: f32 = 24.0;
const NAME_SIZE: f32 = 16.0;
const HEADER_CELL_SIZE: f32 = 12.0;
const BODY_CELL_SIZE: f32 = 10.0;
const HEADER_ROW_HEIGHT: f32 = 30.0;
const BODY_ROW_HEIGHT: f32 = 22.0;

const METRIC_WIDTHS: [f32; 3] = [180.0, 90.0, 110.0];
const WEEK_WIDTHS: [f32; 2] = [280.0, 140.0];

type Rgb = (f32, f32, f32);
const BLACK: Rgb = (0.0, 0.0, 0.0);
const WHITE: Rgb = (1.0, 1.0, 1.0);
const GREY: Rgb = (0.5, 0.5, 0.5);
const WHITESMOKE: Rgb = (0.96, 0.96, 0.96);
const BEIGE: Rgb = (0.96, 0.96, 0.86);

/// Writes student reports as PDF files under `<output>/<sheet>/`.
#[derive(Debug)]
pub struct PdfRenderer {
    config: ReportConfig,
    output_dir: PathBuf,
    /// Directory name given to each sheet under `output_dir`.
    sheet_dirs: BTreeMap<String, String>,
    regular: FontFace,
    bold: FontFace,
    background: Option<RasterImage>,
    logo: Option<RasterImage>,
}

impl PdfRenderer {
    /// Loads the configured assets. Unusable assets are logged and replaced
    /// (fonts) or left out (images).
    pub fn new(config: ReportConfig, output_dir: impl Into<PathBuf>) -> Self {
        let assets = &config.assets;
        let regular = FontFace::load_or(assets.font_regular.as_deref(), "Helvetica");
        let bold = FontFace::load_or(assets.font_bold.as_deref(), "Helvetica-Bold");
        let background = RasterImage::load_optional(assets.background.as_deref(), "background");
        let logo = RasterImage::load_optional(assets.logo.as_deref(), "logo");
        debug!(
            embedded_fonts = regular.is_embedded() && bold.is_embedded(),
            background = background.is_some(),
            logo = logo.is_some(),
            "report assets loaded"
        );
        Self {
            config,
            output_dir: output_dir.into(),
            sheet_dirs: BTreeMap::new(),
            regular,
            bold,
            background,
            logo,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Redirects subsequent sheets to another output root.
    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.output_dir = output_dir.into();
        self.sheet_dirs.clear();
    }

    /// Directory receiving the reports of one sheet.
    ///
    /// Sheets whose sanitized names collide get `_1`, `_2`, ... suffixes in
    /// the order they begin.
    pub fn sheet_dir(&self, sheet: &str) -> PathBuf {
        match self.sheet_dirs.get(sheet) {
            Some(name) => self.output_dir.join(name),
            None => self.output_dir.join(sanitize_component(sheet)),
        }
    }

    fn assign_sheet_dir(&mut self, sheet: &str) -> PathBuf {
        if !self.sheet_dirs.contains_key(sheet) {
            let candidate = sanitize_component(sheet);
            let mut names: Vec<&str> = self.sheet_dirs.values().map(String::as_str).collect();
            names.push(&candidate);
            if let Some(name) = deduplicate(&names).pop() {
                self.sheet_dirs.insert(sheet.to_owned(), name);
            }
        }
        self.sheet_dir(sheet)
    }

    /// Renders one report into PDF bytes.
    pub fn render_document(&self, report: &StudentReport<'_>) -> Result<Vec<u8>> {
        let (width, height) = self.config.page_size.dimensions();
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut regular = PageFont::new("F1", &self.regular);
        let mut bold = PageFont::new("F2", &self.bold);
        let mut canvas = Canvas::default();
        let mut xobjects = Dictionary::new();

        if let Some(background) = &self.background {
            xobjects.set("Im1", background.write(&mut doc));
            canvas.image("Im1", 0.0, height - BANNER_HEIGHT, width, BANNER_HEIGHT);
        }
        if let Some(logo) = &self.logo {
            xobjects.set("Im2", logo.write(&mut doc));
            canvas.image(
                "Im2",
                width - LOGO_WIDTH - MARGIN,
                height - MARGIN - LOGO_HEIGHT,
                LOGO_WIDTH,
                LOGO_HEIGHT,
            );
        }

        let title_color = if self.background.is_some() { WHITE } else { BLACK };
        let title = bold.run(&self.config.title, TITLE_SIZE);
        let title_x = (width - title.width) / 2.0;
        canvas.text(&bold, title, TITLE_SIZE, title_x, height - 1.5 * 72.0, title_color);

        let mut y = height - BANNER_HEIGHT - 20.0 - NAME_SIZE;
        let label = bold.run(&self.config.name_label, NAME_SIZE);
        let label_x = width - MARGIN - label.width;
        canvas.text(&bold, label, NAME_SIZE, label_x, y, BLACK);
        y -= NAME_SIZE + 8.0;
        let name = regular.run(&report.name, NAME_SIZE);
        let name_x = width - MARGIN - name.width;
        canvas.text(&regular, name, NAME_SIZE, name_x, y, BLACK);
        y -= 28.0 + NAME_SIZE;

        let tally = &report.tally;
        let metrics = [
            ["Metric".to_string(), "Count".to_string(), "Percentage".to_string()],
            [
                "Total presence count:".to_string(),
                tally.present.to_string(),
                format!("{:.2}%", tally.present_pct()),
            ],
            [
                "Total moderate count:".to_string(),
                tally.moderate.to_string(),
                format!("{:.2}%", tally.moderate_pct()),
            ],
            [
                "Total absence count:".to_string(),
                tally.absent.to_string(),
                format!("{:.2}%", tally.absent_pct()),
            ],
        ];
        let metric_rows: Vec<&[String]> = metrics.iter().map(|row| row.as_slice()).collect();
        y = draw_table(&mut canvas, &mut bold, &mut regular, width, y, &METRIC_WIDTHS, &metric_rows);
        y -= 28.0;

        let mut weeks = vec![vec!["Week".to_string(), "Status".to_string()]];
        weeks.extend(report.weeks.iter().map(|week| {
            let value = if week.value.is_empty() {
                "-".to_string()
            } else {
                week.value.clone()
            };
            vec![week.column.clone(), value]
        }));
        let week_rows: Vec<&[String]> = weeks.iter().map(Vec::as_slice).collect();
        draw_table(&mut canvas, &mut bold, &mut regular, width, y, &WEEK_WIDTHS, &week_rows);

        let regular_id = regular.write(&mut doc);
        let bold_id = bold.write(&mut doc);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
            "XObject" => xobjects,
        });
        let content = Content {
            operations: canvas.operations,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), width.into(), height.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(&format!("{} - {}", self.config.title, report.name)),
            "Producer" => Object::string_literal("attendance-reports"),
            "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
        Ok(bytes)
    }
}

impl ReportRenderer for PdfRenderer {
    type Error = ReportError;

    fn begin_sheet(&mut self, sheet: &str) -> Result<()> {
        let dir = self.assign_sheet_dir(sheet);
        std::fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;
        debug!(sheet, dir = %dir.display(), "sheet output directory ready");
        Ok(())
    }

    fn render(&mut self, report: &StudentReport<'_>) -> Result<Option<PathBuf>> {
        let dir = self.assign_sheet_dir(report.sheet);
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;
        }
        let path = dir.join(self.config.report_file_name(report.index));
        let bytes = self.render_document(report)?;
        std::fs::write(&path, bytes).map_err(|e| ReportError::io(&path, e))?;
        debug!(index = report.index, path = %path.display(), "wrote report");
        Ok(Some(path))
    }
}

/// Content stream under construction.
#[derive(Default)]
struct Canvas {
    operations: Vec<Operation>,
}

impl Canvas {
    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn image(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![width.into(), 0.into(), 0.into(), height.into(), x.into(), y.into()],
        );
        self.push("Do", vec![name.into()]);
        self.push("Q", vec![]);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.push("q", vec![]);
        self.push("rg", vec![color.0.into(), color.1.into(), color.2.into()]);
        self.push("re", vec![x.into(), y.into(), width.into(), height.into()]);
        self.push("f", vec![]);
        self.push("Q", vec![]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push("q", vec![]);
        self.push("RG", vec![BLACK.0.into(), BLACK.1.into(), BLACK.2.into()]);
        self.push("w", vec![1.into()]);
        self.push("re", vec![x.into(), y.into(), width.into(), height.into()]);
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    fn text(&mut self, font: &PageFont<'_>, run: TextRun, size: f32, x: f32, y: f32, color: Rgb) {
        self.push("BT", vec![]);
        self.push("Tf", vec![font.resource().into(), size.into()]);
        self.push("rg", vec![color.0.into(), color.1.into(), color.2.into()]);
        self.push("Td", vec![x.into(), y.into()]);
        self.push("Tj", vec![run.operand]);
        self.push("ET", vec![]);
    }
}

/// Draws a centered grid table whose first row is the header. Returns the
/// y coordinate of the table's bottom edge.
fn draw_table<'f>(
    canvas: &mut Canvas,
    header_font: &mut PageFont<'f>,
    body_font: &mut PageFont<'f>,
    page_width: f32,
    top: f32,
    widths: &[f32],
    rows: &[&[String]],
) -> f32 {
    let table_width: f32 = widths.iter().sum();
    let left = (page_width - table_width) / 2.0;
    let mut y = top;
    for (row_index, row) in rows.iter().enumerate() {
        let header = row_index == 0;
        let (row_height, size, fill, color) = if header {
            (HEADER_ROW_HEIGHT, HEADER_CELL_SIZE, GREY, WHITESMOKE)
        } else {
            (BODY_ROW_HEIGHT, BODY_CELL_SIZE, BEIGE, BLACK)
        };
        y -= row_height;
        canvas.fill_rect(left, y, table_width, row_height, fill);
        let mut x = left;
        for (cell, &cell_width) in row.iter().zip(widths) {
            let font = if header { &mut *header_font } else { &mut *body_font };
            let run = font.run(cell, size);
            let text_x = x + (cell_width - run.width) / 2.0;
            let text_y = y + (row_height - size) / 2.0 + size * 0.2;
            canvas.text(font, run, size, text_x, text_y, color);
            canvas.stroke_rect(x, y, cell_width, row_height);
            x += cell_width;
        }
    }
    y
}

/// PDF text string in UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Turns a sheet name into a single safe path component.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|ch: char| ch == '.' || ch.is_whitespace());
    if trimmed.is_empty() {
        "sheet".to_string()
    } else {
        trimmed.to_string()
    }
}
