//! Layout and drawing: board, falling tiles, removal flashes, sidebar, pause overlay.

use crate::theme::{Theme, tile_glyph};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use swaptui::{Pos, RemovedTile, Simulation, Tile};
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Terminal cells per tile. Terminal cells are roughly twice as tall as wide.
const TILE_W: u16 = 4;
const TILE_H: u16 = 2;

const SIDEBAR_WIDTH: u16 = 24;

/// Duration of the removal fade (TachyonFX).
const FLASH_FADE_MS: u32 = 300;

/// Where the board landed on screen; maps terminal cells back to grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Tile area inside the border.
    pub board: Rect,
    pub width: usize,
    pub height: usize,
}

impl BoardLayout {
    /// Grid-unit position (`x` right, `y` up) of the center of a terminal cell,
    /// or None when the cell is outside the tile area.
    pub fn to_grid(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        if !self.board.contains(Position::new(column, row)) {
            return None;
        }
        let fx = (f32::from(column - self.board.x) + 0.5) / f32::from(TILE_W);
        let fy = self.height as f32 - (f32::from(row - self.board.y) + 0.5) / f32::from(TILE_H);
        Some((fx, fy))
    }

    /// Top-left terminal cell of a visible tile, shifted up by `lift` terminal rows.
    /// None if the tile would start above the board.
    fn tile_origin(&self, pos: Pos, lift: u16) -> Option<(u16, u16)> {
        let x = self.board.x + pos.x as u16 * TILE_W;
        let row_from_top = (self.height - 1 - pos.y) as u16 * TILE_H;
        let y = (self.board.y + row_from_top).checked_sub(lift)?;
        (y >= self.board.y).then_some((x, y))
    }

    fn tile_cells(&self, pos: Pos) -> impl Iterator<Item = (u16, u16)> + use<> {
        let origin = self.tile_origin(pos, 0);
        let board = self.board;
        origin.into_iter().flat_map(move |(x0, y0)| {
            (y0..y0 + TILE_H)
                .flat_map(move |y| (x0..x0 + TILE_W).map(move |x| (x, y)))
                .filter(move |&(x, y)| board.contains(Position::new(x, y)))
        })
    }
}

/// Outer size (border included) of the board for a grid.
fn board_outer_size(width: usize, height: usize) -> (u16, u16) {
    (width as u16 * TILE_W + 2, height as u16 * TILE_H + 2)
}

/// Board and sidebar rects, centered in `area`.
pub fn board_layout(area: Rect, width: usize, height: usize) -> (BoardLayout, Rect, Rect) {
    let (pw, ph) = board_outer_size(width, height);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let outer = inner[0];
    let board = Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: (width as u16 * TILE_W).min(outer.width.saturating_sub(2)),
        height: (height as u16 * TILE_H).min(outer.height.saturating_sub(2)),
    };
    (
        BoardLayout {
            board,
            width,
            height,
        },
        outer,
        inner[1],
    )
}

/// Fading overlay for one removal batch.
pub struct Flash {
    tiles: Vec<RemovedTile>,
    effect: Option<Effect>,
}

impl Flash {
    pub fn new(tiles: Vec<RemovedTile>) -> Self {
        Self {
            tiles,
            effect: None,
        }
    }

    pub fn done(&self) -> bool {
        self.effect.as_ref().is_some_and(Effect::done)
    }
}

/// Everything the frame needs besides the simulation itself.
pub struct View<'a> {
    pub theme: &'a Theme,
    pub paused: bool,
    pub status: Option<&'a str>,
    pub flashes: &'a mut Vec<Flash>,
    /// Wall time since the previous frame, for effects.
    pub delta_ms: u32,
}

/// Draw the game screen and return the board layout used for pointer mapping.
pub fn draw(frame: &mut Frame, sim: &Simulation, view: &mut View<'_>) -> BoardLayout {
    let area = frame.area();
    let grid = sim.grid();
    let (layout, outer, sidebar) = board_layout(area, grid.width(), grid.height());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(view.theme.div_line).bg(view.theme.bg))
        .title(Span::styled(" Swaptui ", view.theme.title));
    block.render(outer, frame.buffer_mut());

    draw_board(frame, sim, view.theme, &layout);
    draw_flashes(frame, view, &layout);
    draw_sidebar(frame, sim, view, sidebar);
    if view.paused {
        draw_pause_overlay(frame, view.theme, outer);
    }
    layout
}

fn draw_board(frame: &mut Frame, sim: &Simulation, theme: &Theme, layout: &BoardLayout) {
    let buf = frame.buffer_mut();
    let bg = Style::default().bg(theme.bg);
    for y in layout.board.top()..layout.board.bottom() {
        for x in layout.board.left()..layout.board.right() {
            buf[(x, y)].set_symbol(" ").set_style(bg);
        }
    }

    let grid = sim.grid();
    let mask = sim.fall_mask();
    // Tiles that just fell start one tile higher and glide down as the step runs.
    let lift = if sim.is_falling() {
        ((1.0 - sim.fall_progress()) * f32::from(TILE_H)).round() as u16
    } else {
        0
    };
    let drag = sim.drag_start();

    let mut falling = Vec::new();
    for (y, row) in grid.rows().enumerate() {
        for (x, &tile) in row.iter().enumerate() {
            let pos = Pos::new(x, y);
            if mask.fell(pos) && lift > 0 {
                falling.push((pos, tile));
            } else {
                draw_tile(frame, theme, layout, pos, tile, 0, drag == Some(pos));
            }
        }
    }
    for (pos, tile) in falling {
        draw_tile(frame, theme, layout, pos, tile, lift, false);
    }
}

fn draw_tile(
    frame: &mut Frame,
    theme: &Theme,
    layout: &BoardLayout,
    pos: Pos,
    tile: Tile,
    lift: u16,
    selected: bool,
) {
    let Tile::Kind(kind) = tile else {
        return;
    };
    let Some((x0, y0)) = layout.tile_origin(pos, lift) else {
        return;
    };
    let color = theme.tile_color(kind);
    let style = Style::default().fg(Color::Black).bg(color);
    let board = layout.board;
    let buf = frame.buffer_mut();
    for dy in 0..TILE_H {
        for dx in 0..TILE_W {
            let (x, y) = (x0 + dx, y0 + dy);
            if !board.contains(Position::new(x, y)) {
                continue;
            }
            let symbol = match (dx, dy) {
                (0, _) if selected => "▐",
                (dx, _) if selected && dx == TILE_W - 1 => "▌",
                (1, 0) => tile_glyph(kind),
                _ => " ",
            };
            let style = if selected && (dx == 0 || dx == TILE_W - 1) {
                Style::default().fg(theme.selected).bg(color)
            } else {
                style
            };
            buf[(x, y)].set_symbol(symbol).set_style(style);
        }
    }
}

/// Paint removed tiles back in and let TachyonFX fade them into the background.
fn draw_flashes(frame: &mut Frame, view: &mut View<'_>, layout: &BoardLayout) {
    let delta = TfxDuration::from_millis(view.delta_ms);
    let theme = view.theme;
    for flash in view.flashes.iter_mut() {
        let positions: HashSet<(u16, u16)> = flash
            .tiles
            .iter()
            .flat_map(|t| layout.tile_cells(t.pos))
            .collect();
        {
            let buf = frame.buffer_mut();
            for t in &flash.tiles {
                let style = Style::default().fg(Color::White).bg(theme.tile_color(t.kind));
                for (x, y) in layout.tile_cells(t.pos) {
                    buf[(x, y)].set_symbol("░").set_style(style);
                }
            }
        }
        let effect = flash.effect.get_or_insert_with(|| {
            let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
                positions.contains(&(pos.x, pos.y))
            }));
            fx::fade_to(theme.bg, theme.bg, (FLASH_FADE_MS, Interpolation::Linear))
                .with_filter(filter)
                .with_area(layout.board)
        });
        frame.render_effect(effect, layout.board, delta);
    }
    view.flashes.retain(|f| !f.done());
}

fn draw_sidebar(frame: &mut Frame, sim: &Simulation, view: &View<'_>, area: Rect) {
    let theme = view.theme;
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Score, best
            Constraint::Length(1),
            Constraint::Length(4), // Combo + fall gauge
            Constraint::Length(1),
            Constraint::Min(3), // Status + help
        ])
        .split(area);

    let stats_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    let stats = vec![
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(sim.score().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Best:  ", title_style),
            Span::styled(sim.best_score().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Board: ", title_style),
            Span::styled(
                format!("{}x{}", sim.grid().width(), sim.grid().height()),
                fg_style,
            ),
        ]),
    ];
    Paragraph::new(Text::from(stats)).render(stats_inner, frame.buffer_mut());

    let combo_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let combo_inner = combo_block.inner(chunks[2]);
    combo_block.render(chunks[2], frame.buffer_mut());
    let combo_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(combo_inner);
    let combo_label = if sim.combo() > 1 {
        format!("Combo x{}", sim.combo())
    } else {
        "Combo".to_string()
    };
    Paragraph::new(Line::from(Span::styled(combo_label, title_style)))
        .render(combo_layout[0], frame.buffer_mut());
    let ratio = if sim.is_falling() {
        f64::from(sim.fall_progress())
    } else {
        0.0
    };
    Gauge::default()
        .ratio(ratio.clamp(0.0, 1.0))
        .label("")
        .gauge_style(Style::default().fg(theme.title))
        .render(combo_layout[1], frame.buffer_mut());

    let mut lines = Vec::new();
    if let Some(status) = view.status {
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(theme.selected).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Drag a tile onto", fg_style)));
    lines.push(Line::from(Span::styled("a neighbour to swap.", fg_style)));
    lines.push(Line::from(Span::styled("P pause  R restart", fg_style)));
    lines.push(Line::from(Span::styled("Q quit", fg_style)));
    Paragraph::new(Text::from(lines)).render(chunks[4], frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let w = 16.min(area.width);
    let h = 3.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    };
    Clear.render(rect, frame.buffer_mut());
    Paragraph::new(Line::from(Span::styled("PAUSED", theme.title)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(rect, frame.buffer_mut());
}
