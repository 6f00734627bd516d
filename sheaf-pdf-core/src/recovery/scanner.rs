//! Lenient structural scanner for PDF files.
//!
//! The scanner never parses the object graph. It looks for page dictionaries
//! and the document information dictionary by byte pattern, which is enough
//! to recover page geometry and metadata from files written by this crate and
//! from most simple producers.

use crate::document::{Document, DocumentMetadata};
use crate::page::Page;
use crate::page_size::{PageOrientation, PageSize};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use std::ops::Range;
use tracing::{debug, warn};

/// Options controlling how scanned pages are mapped onto page sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Maximum difference in points, per side, for a media box to count as
    /// a catalog size.
    pub size_tolerance: f64,
    /// Size used for pages that match no catalog entry. With
    /// `PageSize::Custom` such pages keep their exact dimensions.
    pub default_size: PageSize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            size_tolerance: 10.0,
            default_size: PageSize::A4,
        }
    }
}

impl ScanOptions {
    pub fn with_size_tolerance(mut self, tolerance: f64) -> Self {
        self.size_tolerance = tolerance;
        self
    }

    pub fn with_default_size(mut self, size: PageSize) -> Self {
        self.default_size = size;
        self
    }
}

/// Rebuilds a [`Document`] from raw PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    options: ScanOptions,
}

impl DocumentScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans `data` and returns whatever could be recovered. This never
    /// fails: input that does not look like a PDF yields a document with no
    /// pages and empty metadata.
    pub fn scan(&self, data: &[u8]) -> Document {
        if !has_header(data) {
            warn!(bytes = data.len(), "No PDF header found; scanning anyway");
        }

        let map = SyntaxMap::new(data);
        let mut document = Document::with_metadata(self.scan_metadata(&map));
        let fallback_box = map
            .find(b"/MediaBox", 0..data.len())
            .and_then(|pos| parse_media_box(&data[pos..]));

        for marker in page_markers(&map) {
            let region = object_region(&map, marker);
            let media_box = map
                .find(b"/MediaBox", region.clone())
                .and_then(|pos| parse_media_box(&data[pos..region.end]))
                .or_else(|| {
                    warn!(offset = marker, "Page without a media box; using inherited or default size");
                    fallback_box
                });

            let mut page = self.page_for(media_box);
            if let Some(rotation) = map
                .find(b"/Rotate", region.clone())
                .and_then(|pos| parse_integer(&data[pos + 7..region.end]))
            {
                let normalized = rotation.rem_euclid(360);
                if u16::try_from(normalized)
                    .ok()
                    .and_then(|degrees| page.set_rotation(degrees).ok())
                    .is_none()
                {
                    warn!(offset = marker, rotation, "Ignoring rotation that is not a multiple of 90");
                }
            }
            document.push_page(page);
        }

        debug!(
            pages = document.page_count(),
            title = document.metadata().title.as_deref().unwrap_or(""),
            "Scanned PDF structure"
        );
        document
    }

    fn page_for(&self, media_box: Option<(f64, f64)>) -> Page {
        let Some((width, height)) = media_box else {
            return Page::new(self.options.default_size, PageOrientation::Portrait)
                .unwrap_or_else(|_| Page::a4());
        };

        if let Some((size, orientation)) =
            PageSize::match_dimensions(width, height, self.options.size_tolerance)
        {
            if let Ok(page) = Page::new(size, orientation) {
                return page;
            }
        }

        let orientation = PageOrientation::from_dimensions(width, height);
        Page::new(self.options.default_size, orientation)
            .or_else(|_| Page::custom(width, height))
            .unwrap_or_else(|_| Page::a4())
    }

    fn scan_metadata(&self, map: &SyntaxMap<'_>) -> DocumentMetadata {
        let info = info_region(map);
        if info.is_none() {
            debug!("No /Info reference in trailer; falling back to whole-file search");
        }

        let text = |key: &str| {
            let value = match &info {
                Some(region) => find_string_value(map, key.as_bytes(), region.clone(), false),
                None => find_string_value(map, key.as_bytes(), 0..map.data.len(), true),
            };
            value.filter(|value| !value.is_empty())
        };
        let date = |key: &str| text(key).and_then(|value| parse_pdf_date(&value));

        DocumentMetadata {
            title: text("/Title"),
            author: text("/Author"),
            subject: text("/Subject"),
            keywords: text("/Keywords"),
            creator: text("/Creator"),
            producer: text("/Producer"),
            creation_date: date("/CreationDate"),
            modification_date: date("/ModDate"),
        }
    }
}

/// The scanned bytes plus a mask of those inside strings, comments and
/// stream data. Keywords are only matched where the mask is clear.
struct SyntaxMap<'a> {
    data: &'a [u8],
    opaque: Vec<bool>,
}

impl<'a> SyntaxMap<'a> {
    fn new(data: &'a [u8]) -> Self {
        let mut opaque = vec![false; data.len()];
        let mut i = 0;

        while i < data.len() {
            let end = match data[i] {
                b'(' => literal_end(data, i + 1),
                b'<' if data.get(i + 1) == Some(&b'<') => {
                    i += 2;
                    continue;
                }
                b'<' => data[i..].iter().position(|&b| b == b'>').map_or(data.len(), |p| i + p + 1),
                b'%' => data[i..]
                    .iter()
                    .position(|&b| b == b'\r' || b == b'\n')
                    .map_or(data.len(), |p| i + p),
                b's' if is_stream_keyword(data, i) => {
                    find(&data[i..], b"endstream").map_or(data.len(), |p| i + p)
                }
                _ => {
                    i += 1;
                    continue;
                }
            };
            opaque[i..end].fill(true);
            i = end;
        }

        Self { data, opaque }
    }

    /// Start offsets in `range` where `needle` fits entirely inside it.
    fn candidates(&self, needle: &[u8], range: Range<usize>) -> Range<usize> {
        let end = range.end.min(self.data.len());
        if needle.is_empty() || end < needle.len() {
            return 0..0;
        }
        range.start..end - needle.len() + 1
    }

    fn is_match(&self, needle: &[u8], at: usize) -> bool {
        !self.opaque[at] && self.data[at..].starts_with(needle)
    }

    fn find(&self, needle: &[u8], range: Range<usize>) -> Option<usize> {
        self.candidates(needle, range)
            .find(|&at| self.is_match(needle, at))
    }

    fn rfind(&self, needle: &[u8], range: Range<usize>) -> Option<usize> {
        self.candidates(needle, range)
            .rev()
            .find(|&at| self.is_match(needle, at))
    }
}

/// Offset just past the `)` closing a literal string whose body starts at
/// `start`.
fn literal_end(data: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < data.len() {
        match data[i] {
            b'\\' => i += 1,
            b'(' => depth += 1,
            b')' if depth == 0 => return i + 1,
            b')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    data.len()
}

fn is_stream_keyword(data: &[u8], at: usize) -> bool {
    data[at..].starts_with(b"stream")
        && (at == 0 || is_delimiter(data[at - 1]))
        && matches!(data.get(at + 6), Some(&(b'\r' | b'\n')))
}

fn has_header(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    find(head, b"%PDF-").is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\0')
}

fn is_delimiter(byte: u8) -> bool {
    is_whitespace(byte) || matches!(byte, b'/' | b'[' | b']' | b'<' | b'>' | b'(' | b')' | b'%')
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data.iter().position(|&b| !is_whitespace(b)).unwrap_or(data.len());
    &data[start..]
}

/// Offsets of every `/Type /Page` entry. `/Type /Pages` is not a page.
fn page_markers(map: &SyntaxMap<'_>) -> Vec<usize> {
    let data = map.data;
    let mut markers = Vec::new();
    let mut offset = 0;

    while let Some(start) = map.find(b"/Type", offset..data.len()) {
        offset = start + 5;

        let rest = skip_whitespace(&data[offset..]);
        if let Some(after) = rest.strip_prefix(b"/Page") {
            if after.first().map_or(true, |&b| is_delimiter(b)) {
                markers.push(start);
            }
        }
    }
    markers
}

/// The indirect object containing `offset`, from its `obj` keyword to its
/// `endobj`.
fn object_region(map: &SyntaxMap<'_>, offset: usize) -> Range<usize> {
    let len = map.data.len();
    let start = map.rfind(b" obj", 0..offset).unwrap_or(0);
    let end = map.find(b"endobj", offset..len).unwrap_or(len);
    start..end
}

/// Width and height of a `/MediaBox [x0 y0 x1 y1]` entry at the start of
/// `data`.
fn parse_media_box(data: &[u8]) -> Option<(f64, f64)> {
    let rest = skip_whitespace(data.strip_prefix(b"/MediaBox")?);
    let rest = rest.strip_prefix(b"[")?;
    let close = rest.iter().position(|&b| b == b']')?;
    let body = std::str::from_utf8(&rest[..close]).ok()?;

    let values: Vec<f64> = body
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    let [x0, y0, x1, y1] = <[f64; 4]>::try_from(values).ok()?;

    let width = (x1 - x0).abs();
    let height = (y1 - y0).abs();
    (width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0)
        .then_some((width, height))
}

fn parse_integer(data: &[u8]) -> Option<i64> {
    let rest = skip_whitespace(data);
    let len = rest
        .iter()
        .enumerate()
        .take_while(|&(i, &b)| b.is_ascii_digit() || (i == 0 && (b == b'-' || b == b'+')))
        .count();
    std::str::from_utf8(&rest[..len]).ok()?.parse().ok()
}

/// Body of the information dictionary named by the last trailer's `/Info`
/// entry.
fn info_region(map: &SyntaxMap<'_>) -> Option<Range<usize>> {
    let data = map.data;
    let trailer = map.rfind(b"trailer", 0..data.len())?;
    let info = map.find(b"/Info", trailer..data.len())?;

    let reference = &data[info + 5..];
    let end = reference.iter().position(|&b| b == b'R').unwrap_or(reference.len());
    let rest = std::str::from_utf8(&reference[..end]).ok()?;
    let mut parts = rest.split_whitespace();
    let number: u32 = parts.next()?.parse().ok()?;
    let generation: u16 = parts.next()?.parse().ok()?;

    let header = format!("{number} {generation} obj");
    let mut offset = 0;
    while let Some(start) = map.find(header.as_bytes(), offset..data.len()) {
        offset = start + header.len();
        if start == 0 || !data[start - 1].is_ascii_digit() {
            let end = map.find(b"endobj", offset..data.len()).unwrap_or(data.len());
            return Some(offset..end);
        }
    }
    None
}

/// Decoded string value of `key` inside `range`. With `last` the final
/// occurrence wins.
fn find_string_value(map: &SyntaxMap<'_>, key: &[u8], range: Range<usize>, last: bool) -> Option<String> {
    let data = map.data;
    let mut found = None;
    let mut offset = range.start;

    while let Some(start) = map.find(key, offset..range.end) {
        offset = start + key.len();

        if data.get(offset).is_some_and(|&b| !is_delimiter(b)) {
            continue;
        }
        if let Some(value) = parse_string(skip_whitespace(&data[offset..range.end])) {
            found = Some(value);
            if !last {
                break;
            }
        }
    }
    found
}

/// Decodes a literal `( ... )` or hex `< ... >` string at the start of `data`.
fn parse_string(data: &[u8]) -> Option<String> {
    match data.first()? {
        b'(' => parse_literal(&data[1..]).map(|bytes| decode_text(&bytes)),
        b'<' if data.get(1) != Some(&b'<') => parse_hex(&data[1..]).map(|bytes| decode_text(&bytes)),
        _ => None,
    }
}

fn parse_literal(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        match byte {
            b'\\' => {
                i += 1;
                let escaped = *data.get(i)?;
                match escaped {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'0'..=b'7' => {
                        let digits = data[i..]
                            .iter()
                            .take(3)
                            .take_while(|b| (b'0'..=b'7').contains(b))
                            .count();
                        let octal = std::str::from_utf8(&data[i..i + digits]).ok()?;
                        // High-order overflow is ignored.
                        let code = u16::from_str_radix(octal, 8).ok()?;
                        out.push((code & 0xff) as u8);
                        i += digits - 1;
                    }
                    b'\r' => {
                        if data.get(i + 1) == Some(&b'\n') {
                            i += 1;
                        }
                    }
                    b'\n' => {}
                    other => out.push(other),
                }
            }
            b'(' => {
                depth += 1;
                out.push(byte);
            }
            b')' => {
                if depth == 0 {
                    return Some(out);
                }
                depth -= 1;
                out.push(byte);
            }
            _ => out.push(byte),
        }
        i += 1;
    }
    None
}

fn parse_hex(data: &[u8]) -> Option<Vec<u8>> {
    let close = data.iter().position(|&b| b == b'>')?;
    let mut digits: Vec<u8> = data[..close]
        .iter()
        .copied()
        .filter(|b| !is_whitespace(*b))
        .collect();
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }

    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}

/// UTF-16BE with a byte order mark, otherwise one byte per character.
fn decode_text(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Parses `D:YYYYMMDDHHmmSSOHH'mm'`. Everything after the year is optional;
/// a missing offset means UTC.
pub(crate) fn parse_pdf_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let value = value.strip_prefix("D:").unwrap_or(value);

    let digits = value.bytes().take_while(u8::is_ascii_digit).count();
    if digits < 4 {
        return None;
    }
    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        if start + len <= digits {
            value[start..start + len].parse().ok()
        } else {
            Some(default)
        }
    };

    let year: i32 = value[..4].parse().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;

    let offset_seconds = parse_offset(&value[digits..])?;
    let offset = FixedOffset::east_opt(offset_seconds)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|date| date.with_timezone(&Utc))
}

fn parse_offset(suffix: &str) -> Option<i32> {
    let mut chars = suffix.chars();
    let sign = match chars.next() {
        None | Some('Z') => return Some(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return Some(0),
    };

    let numbers: Vec<u32> = chars
        .as_str()
        .split('\'')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().ok())
        .collect::<Option<_>>()?;
    let hours = numbers.first().copied().unwrap_or(0);
    let minutes = numbers.get(1).copied().unwrap_or(0);
    if hours > 23 || minutes > 59 {
        return None;
    }
    let seconds = i32::try_from(hours * 3600 + minutes * 60).ok()?;
    Some(sign * seconds)
}
