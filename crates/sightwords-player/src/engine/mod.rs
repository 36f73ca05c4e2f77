//! Game engine: minifb window, input and frame loop
//!
//! Renders into an 800×600 framebuffer of 32-bit ARGB pixels, which is
//! scaled to whatever size the window currently has.

pub mod font;
pub mod sound_engine;
pub mod speech;
pub mod stage;

use anyhow::Result;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::assets::DecodedBitmap;
use crate::game::host::UiAction;
use crate::game::GameState;
use stage::Stage;

pub const SCREEN_WIDTH: usize = 800;
pub const SCREEN_HEIGHT: usize = 600;
const FPS: usize = 30;
const CLEAR_COLOR: u32 = 0xFFF4F0E6;

/// Scale the 800×600 framebuffer to the window size (nearest neighbour)
fn scale_to_size(src: &[u32], dst: &mut [u32], dst_w: usize, dst_h: usize) {
    for dy in 0..dst_h {
        let sy = (dy * SCREEN_HEIGHT) / dst_h;
        let dst_row = dy * dst_w;
        let src_row = sy * SCREEN_WIDTH;
        for dx in 0..dst_w {
            let sx = (dx * SCREEN_WIDTH) / dst_w;
            dst[dst_row + dx] = src[src_row + sx];
        }
    }
}

/// Blit an RGBA bitmap onto the ARGB framebuffer with alpha blending
pub(crate) fn blit_bitmap(fb: &mut [u32], stride: usize, bmp: &DecodedBitmap, x: i32, y: i32) {
    let rows = (fb.len() / stride.max(1)) as i32;
    let bw = bmp.width as i32;
    let bh = bmp.height as i32;

    for sy in 0..bh {
        let dy = y + sy;
        if dy < 0 || dy >= rows {
            continue;
        }
        for sx in 0..bw {
            let dx = x + sx;
            if dx < 0 || dx >= stride as i32 {
                continue;
            }

            let src_idx = (sy * bw + sx) as usize * 4;
            let Some(px) = bmp.pixels.get(src_idx..src_idx + 4) else {
                continue;
            };
            let (r, g, b, a) = (px[0] as u32, px[1] as u32, px[2] as u32, px[3] as u32);
            if a == 0 {
                continue;
            }

            let dst_idx = dy as usize * stride + dx as usize;
            if a >= 255 {
                fb[dst_idx] = 0xFF000000 | (r << 16) | (g << 8) | b;
            } else {
                let dst = fb[dst_idx];
                let dr = (dst >> 16) & 0xFF;
                let dg = (dst >> 8) & 0xFF;
                let db = dst & 0xFF;
                let inv_a = 255 - a;
                let out_r = (r * a + dr * inv_a) / 255;
                let out_g = (g * a + dg * inv_a) / 255;
                let out_b = (b * a + db * inv_a) / 255;
                fb[dst_idx] = 0xFF000000 | (out_r << 16) | (out_g << 8) | out_b;
            }
        }
    }
}

/// Open the window and run until it is closed or the game is over
pub fn run(mut game: GameState, window_size: (usize, usize)) -> Result<()> {
    let mut stage = Stage::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    game.start(&mut stage);

    let (win_w, win_h) = window_size;
    let options = WindowOptions {
        resize: true,
        scale_mode: minifb::ScaleMode::AspectRatioStretch,
        ..Default::default()
    };
    let mut window = Window::new(stage.title(), win_w.max(1), win_h.max(1), options)
        .map_err(|e| anyhow::anyhow!("Window creation failed: {}", e))?;
    window.set_target_fps(FPS);

    tracing::info!("Engine initialized, entering game loop");
    tracing::info!("Controls: click a word | R/Space = replay | Esc = quit");

    let mut framebuffer = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
    let mut out_w = win_w.max(1);
    let mut out_h = win_h.max(1);
    let mut scaled_buf = vec![0u32; out_w * out_h];
    let mut prev_mouse_down = false;
    let mut shown_title = stage.title().to_string();

    while window.is_open() {
        let (actual_w, actual_h) = window.get_size();
        if actual_w > 0 && actual_h > 0 && (actual_w != out_w || actual_h != out_h) {
            out_w = actual_w;
            out_h = actual_h;
            scaled_buf.resize(out_w * out_h, 0);
        }

        // Mouse → logical 800×600
        let (mouse_x, mouse_y) = window.get_mouse_pos(MouseMode::Clamp).unwrap_or((0.0, 0.0));
        let mx = ((mouse_x as usize * SCREEN_WIDTH) / out_w) as i32;
        let my = ((mouse_y as usize * SCREEN_HEIGHT) / out_h) as i32;
        let mx = mx.clamp(0, SCREEN_WIDTH as i32 - 1);
        let my = my.clamp(0, SCREEN_HEIGHT as i32 - 1);

        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            tracing::info!("Quit requested");
            break;
        }

        let mouse_down = window.get_mouse_down(MouseButton::Left);
        let mouse_clicked = mouse_down && !prev_mouse_down;
        prev_mouse_down = mouse_down;

        if stage.has_notice() {
            let key_dismiss = window.is_key_pressed(Key::Enter, KeyRepeat::No)
                || window.is_key_pressed(Key::Space, KeyRepeat::No);
            if mouse_clicked || key_dismiss {
                stage.pop_notice();
            }
        } else {
            if mouse_clicked {
                if let Some(action) = stage.action_at(mx, my) {
                    game.dispatch(action, &mut stage);
                }
            }
            if window.is_key_pressed(Key::R, KeyRepeat::No)
                || window.is_key_pressed(Key::Space, KeyRepeat::No)
            {
                game.dispatch(UiAction::Replay, &mut stage);
            }
        }

        if game.quit_requested() && !stage.has_notice() {
            tracing::info!("Game finished");
            break;
        }

        stage.set_hover(mx, my);
        framebuffer.fill(CLEAR_COLOR);
        stage.draw(&mut framebuffer);

        if stage.title() != shown_title {
            shown_title = stage.title().to_string();
            window.set_title(&shown_title);
        }

        scale_to_size(&framebuffer, &mut scaled_buf, out_w, out_h);
        window
            .update_with_buffer(&scaled_buf, out_w, out_h)
            .map_err(|e| anyhow::anyhow!("Display error: {}", e))?;
    }

    tracing::info!("Engine shutdown");
    Ok(())
}
