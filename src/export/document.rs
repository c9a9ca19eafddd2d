//! `grammar_quiz_results.pdf`: A4 pages, title block, one block per result row,
//! then the total score and percentage.
//!
//! Pages are laid out by hand with the base-14 Helvetica fonts so no font files are
//! embedded. Text is encoded as WinAnsi; characters outside it print as `?`.
//! Content streams are left uncompressed and no /ID or dates are written, so the
//! same input always yields the same bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::ExportError;
use crate::domain::{ResultRow, Score};

pub const TITLE: &str = "Grammar Quiz Results";

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
// 10 mm side/top margins, 20 mm bottom break.
const MARGIN: f32 = 28.35;
const BOTTOM: f32 = 56.7;
const LINE_HEIGHT: f32 = 28.35;

const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;

// Advance widths of ' '..='~' in 1/1000 em, from the standard Helvetica AFMs.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
  278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
  1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
  667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
  333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
  556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
  278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
  975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
  667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
  333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
  611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[derive(Clone, Copy)]
enum Font {
  Regular,
  Bold,
}

impl Font {
  fn resource(self) -> &'static str {
    match self {
      Font::Regular => "F1",
      Font::Bold => "F2",
    }
  }

  /// Advance of one WinAnsi byte in 1/1000 em.
  fn advance(self, byte: u8) -> u16 {
    match (self, byte) {
      (Font::Regular, 0x20..=0x7e) => HELVETICA[usize::from(byte - 0x20)],
      (Font::Bold, 0x20..=0x7e) => HELVETICA_BOLD[usize::from(byte - 0x20)],
      (Font::Regular, 0x91 | 0x92) => 222,
      (Font::Bold, 0x91 | 0x92) => 278,
      (Font::Regular, 0x93 | 0x94) => 333,
      (Font::Bold, 0x93 | 0x94) => 500,
      // Upper bound for the rest of WinAnsi.
      _ => 1000,
    }
  }

  /// Rendered width of `text` in points.
  fn width(self, size: f32, text: &str) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(self.advance(win_ansi_byte(c)))).sum();
    units as f32 * size / 1000.0
  }
}

/// Cursor over a growing list of pages; each page is its own operation list.
struct Layout {
  pages: Vec<Vec<Operation>>,
  y: f32,
}

impl Layout {
  fn new() -> Self {
    let mut l = Layout { pages: Vec::new(), y: 0.0 };
    l.new_page();
    l
  }

  /// Every page opens with the centred title and a blank line under it.
  fn new_page(&mut self) {
    self.pages.push(Vec::new());
    self.y = PAGE_HEIGHT - MARGIN;
    let x = (PAGE_WIDTH - Font::Bold.width(TITLE_SIZE, TITLE)) / 2.0;
    self.put(Font::Bold, TITLE_SIZE, x, TITLE);
    self.y -= LINE_HEIGHT;
  }

  fn put(&mut self, font: Font, size: f32, x: f32, text: &str) {
    let baseline = self.y - LINE_HEIGHT / 2.0 - 0.3 * size;
    let ops = vec![
      Operation::new("BT", vec![]),
      Operation::new("Tf", vec![font.resource().into(), size.into()]),
      Operation::new("Td", vec![x.into(), baseline.into()]),
      Operation::new("Tj", vec![Object::String(win_ansi(text), StringFormat::Literal)]),
      Operation::new("ET", vec![]),
    ];
    if let Some(page) = self.pages.last_mut() {
      page.extend(ops);
    }
    self.y -= LINE_HEIGHT;
  }

  /// Left-aligned body text, wrapped and broken across pages as needed.
  fn line(&mut self, font: Font, text: &str) {
    for chunk in wrap(font, BODY_SIZE, text, TEXT_WIDTH) {
      if self.y - LINE_HEIGHT < BOTTOM {
        self.new_page();
      }
      self.put(font, BODY_SIZE, MARGIN, &chunk);
    }
  }

  fn gap(&mut self) {
    self.y -= LINE_HEIGHT;
  }
}

pub fn render(rows: &[ResultRow], score: &Score) -> Result<Vec<u8>, ExportError> {
  let mut layout = Layout::new();
  for (i, r) in rows.iter().enumerate() {
    layout.line(Font::Bold, &format!("{}. {}", i + 1, r.question));
    layout.line(Font::Regular, format!("Your Answer: {}", r.your_answer_text()).trim_end());
    layout.line(Font::Regular, &format!("Correct Answer: {}", r.correct_answer));
    layout.gap();
  }
  layout.line(Font::Regular, &format!("Total Score: {} out of {}", score.correct, score.total));
  layout.line(Font::Regular, &format!("Percentage: {}%", score.percentage_display()));

  assemble(layout.pages)
}

fn assemble(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, ExportError> {
  let mut doc = Document::with_version("1.4");
  let pages_id = doc.new_object_id();

  let regular = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Helvetica",
    "Encoding" => "WinAnsiEncoding",
  });
  let bold = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Helvetica-Bold",
    "Encoding" => "WinAnsiEncoding",
  });
  let resources = doc.add_object(dictionary! {
    "Font" => dictionary! {
      "F1" => regular,
      "F2" => bold,
    },
  });

  let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
  for operations in pages {
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id: ObjectId = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
    });
    kids.push(page_id.into());
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "Resources" => resources,
      "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    }),
  );
  let catalog = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  let info = doc.add_object(dictionary! {
    "Title" => Object::string_literal(TITLE),
  });
  doc.trailer.set("Root", catalog);
  doc.trailer.set("Info", info);

  let mut out = Vec::new();
  doc.save_to(&mut out)?;
  Ok(out)
}

/// Greedy word wrap measured in points. Words wider than `max` are split between characters.
fn wrap(font: Font, size: f32, text: &str, max: f32) -> Vec<String> {
  let fits = |s: &str| font.width(size, s) <= max;
  let mut lines = Vec::new();
  let mut cur = String::new();
  for word in text.split(' ') {
    let mut word = word;
    while !fits(word) {
      if !cur.is_empty() {
        lines.push(std::mem::take(&mut cur));
      }
      let end = fitting_prefix(font, size, word, max);
      lines.push(word[..end].to_string());
      word = &word[end..];
    }
    let joined = if cur.is_empty() { word.to_string() } else { format!("{cur} {word}") };
    if cur.is_empty() || fits(&joined) {
      cur = joined;
    } else {
      lines.push(std::mem::replace(&mut cur, word.to_string()));
    }
  }
  if !cur.is_empty() || lines.is_empty() {
    lines.push(cur);
  }
  lines
}

/// Byte length of the longest prefix of `word` that fits in `max`; at least one char.
fn fitting_prefix(font: Font, size: f32, word: &str, max: f32) -> usize {
  let mut end = 0;
  for (i, c) in word.char_indices() {
    let next = i + c.len_utf8();
    if end > 0 && font.width(size, &word[..next]) > max {
      break;
    }
    end = next;
  }
  end
}

/// Map text into the WinAnsi code page used by the standard fonts.
fn win_ansi(text: &str) -> Vec<u8> {
  text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
  match c {
    ' '..='~' => c as u8,
    '\u{a0}'..='\u{ff}' => c as u32 as u8,
    '€' => 0x80,
    '…' => 0x85,
    '‘' => 0x91,
    '’' => 0x92,
    '“' => 0x93,
    '”' => 0x94,
    '•' => 0x95,
    '–' => 0x96,
    '—' => 0x97,
    _ => b'?',
  }
}
