//! Render pass.
//!
//! Draws the whole frame into the fixed-resolution render target, then
//! blits it letterboxed to the window. Entities are drawn as flat-colored
//! primitives; sprite art is a substitutable concern that lives outside
//! the simulation. The pass is an exclusive system: it snapshots entity
//! state up front, then takes the raylib handles out of the world for the
//! duration of the draw.

use bevy_ecs::prelude::*;
use raylib::ffi;
use raylib::prelude::*;
use std::ffi::CString;

use crate::components::enemy::{Enemy, EnemyKind};
use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::player::{PLAYER_H, PLAYER_W, Player, PlayerAnim};
use crate::components::popup::ScorePopup;
use crate::resources::audio::Muted;
use crate::resources::camera::ScrollCamera;
use crate::resources::effects::{ComboPopup, SHAKE_MIN, ScreenShake};
use crate::resources::gamestate::{GameState, GameStates};
use crate::resources::level::{ActiveLevel, CollectedHearts, TILE_SIZE, Tile};
use crate::resources::rendertarget::RenderTarget;
use crate::resources::score::ScoreBoard;
use crate::resources::screensize::ScreenSize;
use crate::resources::transition::Transition;
use crate::resources::worldtime::WorldTime;
use crate::systems::gameflow::REPLAY_UNLOCK_FRAMES;

struct PlayerSnap {
    pos: Vector2,
    facing: f32,
    anim: PlayerAnim,
    squash: Vector2,
    invincible_timer: f32,
    hearts: u32,
}

struct EnemySnap {
    pos: Vector2,
    kind: EnemyKind,
    alive: bool,
    alpha: f32,
    bob: f32,
}

struct ParticleSnap {
    pos: Vector2,
    size: f32,
    color: Color,
    heart: bool,
    alpha: f32,
}

struct PopupSnap {
    pos: Vector2,
    text: String,
    progress: f32,
}

fn faded(c: Color, alpha: f32) -> Color {
    Color::new(c.r, c.g, c.b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

fn text_width(text: &str, size: i32) -> i32 {
    match CString::new(text) {
        Ok(c) => unsafe { ffi::MeasureText(c.as_ptr(), size) },
        Err(_) => 0,
    }
}

/// Theme palette: (sky, ground surface, ground fill, platform).
fn theme_colors(level: &ActiveLevel) -> (Color, Color, Color, Color) {
    use crate::events::audio::Theme;
    match level.theme {
        Theme::Istanbul => (
            Color::new(24, 16, 58, 255),
            Color::new(140, 102, 66, 255),
            Color::new(96, 70, 46, 255),
            Color::new(170, 126, 82, 255),
        ),
        Theme::Baku => (
            Color::new(12, 30, 48, 255),
            Color::new(90, 106, 122, 255),
            Color::new(62, 74, 86, 255),
            Color::new(120, 140, 158, 255),
        ),
        Theme::Cappadocia => (
            Color::new(52, 26, 44, 255),
            Color::new(186, 140, 104, 255),
            Color::new(140, 104, 78, 255),
            Color::new(208, 162, 122, 255),
        ),
        _ => (
            Color::new(11, 11, 43, 255),
            Color::new(104, 88, 140, 255),
            Color::new(76, 64, 104, 255),
            Color::new(130, 112, 170, 255),
        ),
    }
}

fn draw_mini_heart(d: &mut impl RaylibDraw, x: i32, y: i32, color: Color) {
    d.draw_rectangle(x, y, 2, 2, color);
    d.draw_rectangle(x + 3, y, 2, 2, color);
    d.draw_rectangle(x, y + 1, 5, 2, color);
    d.draw_rectangle(x + 1, y + 3, 3, 1, color);
    d.draw_rectangle(x + 2, y + 4, 1, 1, color);
}

fn draw_heart(d: &mut impl RaylibDraw, x: i32, y: i32, pulse: f32, color: Color) {
    let grow = (pulse.sin() * 1.5) as i32;
    d.draw_rectangle(x - grow / 2, y - grow / 2, 3 + grow, 3 + grow, color);
    d.draw_rectangle(x + 4 - grow / 2, y - grow / 2, 3 + grow, 3 + grow, color);
    d.draw_rectangle(x - grow / 2, y + 2, 7 + grow, 3 + grow, color);
    d.draw_rectangle(x + 1, y + 5 + grow / 2, 5, 2, color);
    d.draw_rectangle(x + 3, y + 7 + grow / 2, 1, 1, color);
}

pub fn render_system(world: &mut World) {
    // Snapshot entity state before the raylib handles leave the world.
    let mut player_query = world.query::<(&MapPosition, &Player)>();
    let players: Vec<PlayerSnap> = player_query
        .iter(world)
        .map(|(pos, p)| PlayerSnap {
            pos: pos.pos,
            facing: p.facing,
            anim: p.anim,
            squash: p.squash,
            invincible_timer: p.invincible_timer,
            hearts: p.hearts_collected,
        })
        .collect();

    let mut enemy_query = world.query::<(&MapPosition, &Enemy)>();
    let enemies: Vec<EnemySnap> = enemy_query
        .iter(world)
        .filter(|(_, e)| e.alive || e.death_timer > 0.0)
        .map(|(pos, e)| EnemySnap {
            pos: pos.pos,
            kind: e.kind,
            alive: e.alive,
            alpha: e.fade_alpha(),
            bob: e.bob_offset,
        })
        .collect();

    let mut particle_query = world.query::<(&MapPosition, &Particle)>();
    let particles: Vec<ParticleSnap> = particle_query
        .iter(world)
        .map(|(pos, p)| ParticleSnap {
            pos: pos.pos,
            size: p.size,
            color: p.color,
            heart: p.heart_shaped,
            alpha: p.alpha(),
        })
        .collect();

    let mut popup_query = world.query::<(&MapPosition, &ScorePopup)>();
    let popups: Vec<PopupSnap> = popup_query
        .iter(world)
        .map(|(pos, p)| PopupSnap {
            pos: pos.pos,
            text: p.text.clone(),
            progress: p.progress(),
        })
        .collect();

    let state = world.resource::<GameState>().clone();
    let time = *world.resource::<WorldTime>();
    let shake = *world.resource::<ScreenShake>();
    let camera = *world.resource::<ScrollCamera>();
    let score = *world.resource::<ScoreBoard>();
    let combo = world.resource::<ComboPopup>().clone();
    let overlay_alpha = world.resource::<Transition>().overlay_alpha();
    let muted = world.resource::<Muted>().0;
    let screen = *world.resource::<ScreenSize>();
    let level = world.get_resource::<ActiveLevel>().cloned();
    let collected: Vec<(i32, i32)> = world
        .get_resource::<CollectedHearts>()
        .map(|c| c.0.iter().copied().collect())
        .unwrap_or_default();

    let mut rl = world
        .remove_non_send_resource::<raylib::RaylibHandle>()
        .expect("RaylibHandle missing in render");
    let th = world
        .remove_non_send_resource::<raylib::RaylibThread>()
        .expect("RaylibThread missing in render");
    let mut target = world
        .remove_non_send_resource::<RenderTarget>()
        .expect("RenderTarget missing in render");

    {
        let mut d = rl.begin_drawing(&th);
        {
            let mut dt = d.begin_texture_mode(&th, &mut target.texture);

            match state.get() {
                GameStates::Loading => draw_loading(&mut dt, screen, &state),
                GameStates::Title => draw_title(&mut dt, screen, &time, &state),
                GameStates::LevelIntro | GameStates::Playing | GameStates::LevelComplete => {
                    draw_world(
                        &mut dt, screen, &state, &time, &shake, &camera, &score, &combo,
                        level.as_ref(), &collected, &players, &enemies, &particles, &popups,
                    );
                }
                GameStates::MemoryCard => {
                    draw_memory_card(&mut dt, screen, &score, level.as_ref(), &players)
                }
                GameStates::Finale => draw_finale(&mut dt, screen, &time, &state, &score),
            }

            if muted {
                dt.draw_text("MUTED", screen.w - 40, screen.h - 12, 10, Color::GRAY);
            }

            if overlay_alpha > 0.0 {
                dt.draw_rectangle(0, 0, screen.w, screen.h, faded(Color::BLACK, overlay_alpha));
            }
        }

        // Letterboxed blit of the fixed-resolution frame.
        d.clear_background(Color::BLACK);
        let (win_w, win_h) = (d.get_screen_width() as f32, d.get_screen_height() as f32);
        let scale = (win_w / screen.w as f32).min(win_h / screen.h as f32);
        let dest = Rectangle {
            x: (win_w - screen.w as f32 * scale) / 2.0,
            y: (win_h - screen.h as f32 * scale) / 2.0,
            width: screen.w as f32 * scale,
            height: screen.h as f32 * scale,
        };
        unsafe {
            ffi::DrawTexturePro(
                target.texture.texture,
                target.source_rect().into(),
                dest.into(),
                Vector2::zero().into(),
                0.0,
                Color::WHITE.into(),
            );
        }
    }

    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(th);
    world.insert_non_send_resource(target);
}

fn draw_loading(d: &mut impl RaylibDraw, screen: ScreenSize, state: &GameState) {
    d.clear_background(Color::new(11, 11, 43, 255));
    let dots = ((state.state_timer / 20.0) as usize) % 4;
    let text = format!("loading{}", ".".repeat(dots));
    d.draw_text(&text, screen.w / 2 - 30, screen.h / 2 - 5, 10, Color::PINK);
}

fn draw_title(d: &mut impl RaylibDraw, screen: ScreenSize, time: &WorldTime, state: &GameState) {
    d.clear_background(Color::new(11, 11, 43, 255));

    // Deterministic starfield with a slow twinkle.
    for i in 0..90 {
        let sx = (i * 53 + 17) % screen.w;
        let sy = (i * 37 + 11) % screen.h;
        let twinkle = ((time.elapsed * 1.2 + i as f32 * 0.7).sin() * 0.4 + 0.6) * 0.7;
        d.draw_rectangle(sx, sy, 1, 1, faded(Color::WHITE, twinkle));
    }

    let cx = screen.w / 2;
    let cy = screen.h / 2;
    draw_heart(
        d,
        cx - 4,
        cy - 30,
        time.elapsed * 2.4,
        Color::new(255, 20, 147, 255),
    );

    let title = "HEARTRUSH";
    d.draw_text(title, cx - text_width(title, 20) / 2, cy - 8, 20, Color::PINK);
    let sub = "a tiny love-powered platformer";
    d.draw_text(sub, cx - text_width(sub, 10) / 2, cy + 16, 10, Color::new(255, 182, 193, 255));

    if state.state_timer % 60.0 < 40.0 {
        let hint = "PRESS ENTER";
        d.draw_text(hint, cx - text_width(hint, 10) / 2, cy + 42, 10, Color::GOLD);
    }
}

fn draw_world(
    d: &mut impl RaylibDraw,
    screen: ScreenSize,
    state: &GameState,
    time: &WorldTime,
    shake: &ScreenShake,
    camera: &ScrollCamera,
    score: &ScoreBoard,
    combo: &ComboPopup,
    level: Option<&ActiveLevel>,
    collected: &[(i32, i32)],
    players: &[PlayerSnap],
    enemies: &[EnemySnap],
    particles: &[ParticleSnap],
    popups: &[PopupSnap],
) {
    let Some(level) = level else {
        d.clear_background(Color::BLACK);
        return;
    };

    let (sky, ground, fill, platform) = theme_colors(level);
    d.clear_background(sky);

    let (ox, oy) = if shake.intensity > SHAKE_MIN {
        (
            -(camera.x.floor()) + shake.offset.x.round(),
            shake.offset.y.round(),
        )
    } else {
        (-(camera.x.floor()), 0.0)
    };

    // Visible tile range only.
    let cam_x = camera.x.floor();
    let start_col = ((cam_x / TILE_SIZE) as i32 - 1).max(0);
    let end_col = (((cam_x + screen.w as f32) / TILE_SIZE) as i32 + 1)
        .min(level.tilemap.width() as i32);
    let ts = TILE_SIZE as i32;

    for row in 0..level.tilemap.height() as i32 {
        for col in start_col..end_col {
            let x = (col * ts) as f32 + ox;
            let y = (row * ts) as f32 + oy;
            match level.tilemap.tile_at(col, row) {
                Tile::Solid => {
                    let above = level.tilemap.tile_at(col, row - 1);
                    let color = if above == Tile::Solid || above == Tile::SolidFill {
                        fill
                    } else {
                        ground
                    };
                    d.draw_rectangle(x as i32, y as i32, ts, ts, color);
                }
                Tile::SolidFill => {
                    d.draw_rectangle(x as i32, y as i32, ts, ts, fill);
                }
                Tile::Platform => {
                    d.draw_rectangle(x as i32, y as i32, ts, ts / 2, platform);
                }
                Tile::Heart => {
                    if !collected.contains(&(col, row)) {
                        draw_heart(
                            d,
                            x as i32 + 4,
                            y as i32 + 4,
                            time.elapsed * 3.0 + col as f32,
                            Color::new(255, 20, 147, 255),
                        );
                    }
                }
                Tile::Portal => {
                    let pulse = ((time.elapsed * 4.0).sin() * 0.25 + 0.75).clamp(0.0, 1.0);
                    d.draw_rectangle(x as i32 + 2, y as i32 - ts, ts - 4, ts * 2, faded(Color::MAGENTA, 0.35 * pulse));
                    d.draw_rectangle_lines(x as i32 + 2, y as i32 - ts, ts - 4, ts * 2, Color::MAGENTA);
                }
                Tile::Empty => {}
            }
        }
    }

    for e in enemies {
        let size = e.kind.size();
        let x = e.pos.x + ox;
        let y = e.pos.y + e.bob + oy;
        let shrink = if e.alive { 0.0 } else { (1.0 - e.alpha) * size.x / 2.0 };
        let color = faded(e.kind.burst_color(), e.alpha);
        d.draw_rectangle(
            (x + shrink) as i32,
            (y + shrink) as i32,
            (size.x - shrink * 2.0) as i32,
            (size.y - shrink * 2.0) as i32,
            color,
        );
        if e.kind == EnemyKind::Thorn {
            // Spike row along the top edge.
            for i in 0..3 {
                d.draw_rectangle(x as i32 + 1 + i * 5, y as i32 - 3, 2, 3, color);
            }
        }
    }

    for p in players {
        // Invincibility flash: skip drawing in a 3-frame cadence.
        if p.invincible_timer > 0.0 && (p.invincible_timer / 3.0) as i32 % 2 == 0 {
            continue;
        }

        // Squash about the bottom-center pivot.
        let w = PLAYER_W * p.squash.x;
        let h = PLAYER_H * p.squash.y;
        let x = p.pos.x + PLAYER_W / 2.0 - w / 2.0 + ox;
        let y = p.pos.y + PLAYER_H - h + oy;

        let body = Color::new(255, 230, 240, 255);
        d.draw_rectangle(x as i32, y as i32, w as i32, h as i32, body);
        // Face strip marks the facing direction.
        let eye_x = if p.facing > 0.0 {
            x + w - 3.0
        } else {
            x + 1.0
        };
        d.draw_rectangle(eye_x as i32, (y + 3.0) as i32, 2, 2, Color::new(60, 30, 60, 255));
        if p.anim == PlayerAnim::Run {
            d.draw_rectangle(x as i32, (y + h - 2.0) as i32, w as i32, 2, Color::new(230, 190, 210, 255));
        }
    }

    for p in particles {
        let x = (p.pos.x + ox) as i32;
        let y = (p.pos.y + oy) as i32;
        if p.heart {
            draw_mini_heart(d, x, y, faded(p.color, p.alpha));
        } else {
            let s = ((p.size * p.alpha).floor() as i32).max(1);
            d.draw_rectangle(x, y, s, s, faded(p.color, p.alpha));
        }
    }

    for p in popups {
        let alpha = (1.0 - p.progress * 1.5).max(0.0);
        let y = p.pos.y - p.progress * 18.0 + oy;
        let x = p.pos.x + ox - text_width(&p.text, 10) as f32 / 2.0;
        d.draw_text(&p.text, x as i32, y as i32, 10, faded(Color::GOLD, alpha));
    }

    if combo.active() {
        let progress = combo.progress();
        let alpha = (1.0 - progress * 1.2).max(0.0);
        let y = combo.pos.y - progress * 25.0 + oy;
        let x = combo.pos.x + ox - text_width(&combo.text, 10) as f32 / 2.0;
        d.draw_text(&combo.text, x as i32 + 1, y as i32 + 1, 10, faded(Color::BLACK, alpha));
        d.draw_text(&combo.text, x as i32, y as i32, 10, faded(Color::new(255, 68, 102, 255), alpha));
    }

    // HUD.
    d.draw_text(&level.title, 4, 4, 10, Color::WHITE);
    let hearts = players.first().map(|p| p.hearts).unwrap_or(0);
    let hearts_text = format!("{}/{}", hearts, level.total_hearts);
    draw_mini_heart(d, screen.w / 2 - 20, 6, Color::new(255, 20, 147, 255));
    d.draw_text(&hearts_text, screen.w / 2 - 12, 4, 10, Color::WHITE);
    let score_text = format!("* {}", score.get());
    d.draw_text(&score_text, screen.w - 8 - text_width(&score_text, 10), 4, 10, Color::GOLD);

    match state.get() {
        GameStates::LevelIntro => {
            let alpha = if state.state_timer < 30.0 {
                1.0
            } else {
                (1.0 - (state.state_timer - 120.0) / 30.0).clamp(0.0, 1.0)
            };
            d.draw_rectangle(0, 0, screen.w, screen.h, faded(Color::BLACK, 0.7 * alpha));
            let x = screen.w / 2 - text_width(&level.title, 20) / 2;
            d.draw_text(&level.title, x, screen.h / 2 - 14, 20, faded(Color::PINK, alpha));
        }
        GameStates::LevelComplete => {
            let alpha = (state.state_timer / 60.0).min(0.6);
            d.draw_rectangle(0, 0, screen.w, screen.h, faded(Color::BLACK, alpha));
            if state.state_timer > 20.0 {
                let beat = time.elapsed * 9.0;
                draw_heart(d, screen.w / 2 - 4, screen.h / 2 - 24, beat, Color::new(255, 20, 147, 255));
                let text = "Level Complete!";
                d.draw_text(text, screen.w / 2 - text_width(text, 10) / 2, screen.h / 2 + 2, 10, Color::new(255, 182, 193, 255));
                let hearts_line = format!("{}/{} hearts", hearts, level.total_hearts);
                d.draw_text(&hearts_line, screen.w / 2 - text_width(&hearts_line, 10) / 2, screen.h / 2 + 16, 10, Color::new(255, 105, 180, 255));
                let score_line = format!("* {}", score.get());
                d.draw_text(&score_line, screen.w / 2 - text_width(&score_line, 10) / 2, screen.h / 2 + 30, 10, Color::GOLD);
            }
        }
        _ => {}
    }
}

fn draw_memory_card(
    d: &mut impl RaylibDraw,
    screen: ScreenSize,
    score: &ScoreBoard,
    level: Option<&ActiveLevel>,
    players: &[PlayerSnap],
) {
    d.clear_background(Color::new(11, 11, 43, 255));

    let (w, h) = (260, 140);
    let x = screen.w / 2 - w / 2;
    let y = screen.h / 2 - h / 2;
    d.draw_rectangle(x, y, w, h, Color::new(30, 22, 54, 255));
    d.draw_rectangle_lines(x, y, w, h, Color::new(255, 105, 180, 255));

    if let Some(level) = level {
        let tx = screen.w / 2 - text_width(&level.title, 10) / 2;
        d.draw_text(&level.title, tx, y + 12, 10, Color::PINK);

        let hearts = players.first().map(|p| p.hearts).unwrap_or(0);
        let line = format!("hearts kept safe: {}/{}", hearts, level.total_hearts);
        d.draw_text(&line, screen.w / 2 - text_width(&line, 10) / 2, y + 48, 10, Color::WHITE);
    }
    let line = format!("score so far: {}", score.get());
    d.draw_text(&line, screen.w / 2 - text_width(&line, 10) / 2, y + 66, 10, Color::GOLD);

    let hint = "PRESS ENTER to continue";
    d.draw_text(hint, screen.w / 2 - text_width(hint, 10) / 2, y + h - 20, 10, Color::new(255, 182, 193, 255));
}

fn draw_finale(
    d: &mut impl RaylibDraw,
    screen: ScreenSize,
    time: &WorldTime,
    state: &GameState,
    score: &ScoreBoard,
) {
    d.clear_background(Color::new(11, 11, 43, 255));

    for i in 0..6 {
        let hx = ((time.elapsed * 9.0 + i as f32 * 110.0) as i32) % (screen.w + 10) - 5;
        let hy = 30.0 + (time.elapsed * 0.9 + i as f32 * 2.0).sin() * 20.0 + i as f32 * 30.0;
        draw_heart(d, hx, hy as i32, time.elapsed * 2.0 + i as f32, faded(Color::new(255, 105, 180, 255), 0.5));
    }

    let title = "THE END";
    d.draw_text(title, screen.w / 2 - text_width(title, 20) / 2, 60, 20, Color::PINK);
    let line = format!("final score: {}", score.get());
    d.draw_text(&line, screen.w / 2 - text_width(&line, 10) / 2, 100, 10, Color::GOLD);
    let thanks = "thank you for playing";
    d.draw_text(thanks, screen.w / 2 - text_width(thanks, 10) / 2, 120, 10, Color::new(255, 182, 193, 255));

    if state.state_timer > REPLAY_UNLOCK_FRAMES && state.state_timer % 60.0 < 40.0 {
        let hint = "PRESS ENTER to replay";
        d.draw_text(hint, screen.w / 2 - text_width(hint, 10) / 2, 170, 10, Color::GOLD);
    }
}
