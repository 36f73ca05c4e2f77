//! Built-in 5×7 bitmap font and rectangle helpers
//!
//! Glyphs are stored column-major, bit 0 is the top row. Each glyph advances
//! 6 pixels (5 + 1 spacing) at scale 1. Characters outside printable ASCII
//! are drawn as '?'.

pub const GLYPH_HEIGHT: i32 = 7;
pub const GLYPH_ADVANCE: i32 = 6;

#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

fn glyph(ch: char) -> &'static [u8; 5] {
    let code = ch as u32;
    if (0x20..0x7F).contains(&code) {
        &GLYPHS[(code - 0x20) as usize]
    } else {
        &GLYPHS[('?' as u32 - 0x20) as usize]
    }
}

/// Width in pixels of `text` drawn at `scale`
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 {
        0
    } else {
        (n * GLYPH_ADVANCE - 1) * scale
    }
}

pub fn text_height(scale: i32) -> i32 {
    GLYPH_HEIGHT * scale
}

#[inline]
fn put(fb: &mut [u32], stride: usize, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 || x as usize >= stride {
        return;
    }
    let idx = y as usize * stride + x as usize;
    if let Some(px) = fb.get_mut(idx) {
        *px = color;
    }
}

/// Draw `text` with its top-left corner at (x, y)
pub fn draw_text(fb: &mut [u32], stride: usize, x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    let mut cx = x;
    for ch in text.chars() {
        for (col, bits) in glyph(ch).iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let px = cx + col as i32 * scale;
                let py = y + row * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        put(fb, stride, px + dx, py + dy, color);
                    }
                }
            }
        }
        cx += GLYPH_ADVANCE * scale;
    }
}

/// Text with a 1-pixel dark drop shadow
pub fn draw_text_shadow(fb: &mut [u32], stride: usize, x: i32, y: i32, text: &str, color: u32, scale: i32) {
    draw_text(fb, stride, x + 1, y + 1, text, 0xFF000000, scale);
    draw_text(fb, stride, x, y, text, color, scale);
}

/// Text horizontally centered on `cx`
pub fn draw_text_centered(fb: &mut [u32], stride: usize, cx: i32, y: i32, text: &str, color: u32, scale: i32) {
    draw_text(fb, stride, cx - text_width(text, scale) / 2, y, text, color, scale);
}

pub fn draw_rect(fb: &mut [u32], stride: usize, x: i32, y: i32, w: i32, h: i32, color: u32) {
    for yy in y.max(0)..y + h {
        for xx in x.max(0)..(x + w).min(stride as i32) {
            put(fb, stride, xx, yy, color);
        }
    }
}

pub fn draw_rect_outline(fb: &mut [u32], stride: usize, x: i32, y: i32, w: i32, h: i32, color: u32) {
    if w <= 0 || h <= 0 {
        return;
    }
    for xx in x..x + w {
        put(fb, stride, xx, y, color);
        put(fb, stride, xx, y + h - 1, color);
    }
    for yy in y..y + h {
        put(fb, stride, x, yy, color);
        put(fb, stride, x + w - 1, yy, color);
    }
}

/// Greedy word wrap to lines no wider than `max_width` pixels
pub fn wrap_text(text: &str, max_width: i32, scale: i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if text_width(&candidate, scale) > max_width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line = word.to_string();
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("ab", 1), 11);
        assert_eq!(text_width("ab", 2), 22);
    }

    #[test]
    fn draws_inside_buffer_only() {
        let mut fb = vec![0u32; 20 * 10];
        draw_text(&mut fb, 20, 15, 5, "W", 0xFFFFFFFF, 1);
        assert!(fb.iter().any(|&p| p == 0xFFFFFFFF));
        draw_rect(&mut fb, 20, -5, -5, 100, 100, 0xFF0000FF);
        assert!(fb.iter().all(|&p| p == 0xFF0000FF));
    }

    #[test]
    fn wrap_breaks_on_spaces() {
        let lines = wrap_text("Incorrect. The correct word was 'said'.", 120, 1);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width(l, 1) <= 120));
        assert_eq!(lines.join(" "), "Incorrect. The correct word was 'said'.");
    }

    #[test]
    fn unknown_chars_fall_back() {
        assert_eq!(glyph('é'), glyph('?'));
    }
}
