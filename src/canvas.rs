use crate::generators::Generator;
use crate::grids::block_grid::{BlockGrid, BlockId};
use crate::grids::Direction;
use crate::renderer::Vertex;

pub const MARKER_SCALE: f32 = 0.33;
pub const WALL_THICKNESS: f32 = 1.0;
const MARKER_SEGMENTS: usize = 24;

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Paint {
    Background,
    Erase,
    Wall,
    CurrentMarker,
    HistoryMarker,
}

impl From<Paint> for [f32; 4] {
    fn from(paint: Paint) -> Self {
        match paint {
            Paint::Background => [0.8, 0.8, 0.8, 1.0],
            Paint::Erase => [1.0, 1.0, 1.0, 1.0],
            Paint::Wall => [0.0, 0.0, 0.0, 1.0],
            Paint::CurrentMarker => [1.0, 0.6, 0.6, 1.0],
            Paint::HistoryMarker => [0.6, 0.6, 1.0, 1.0],
        }
    }
}

/// Pixel geometry of the drawing surface and of one block on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub surface_width: f32,
    pub surface_height: f32,
    pub block_width: f32,
    pub block_height: f32,
}

impl Layout {
    pub fn new(surface_width: u32, surface_height: u32, columns: usize, rows: usize) -> Self {
        let surface_width = surface_width as f32;
        let surface_height = surface_height as f32;
        Self {
            surface_width,
            surface_height,
            block_width: surface_width / columns as f32,
            block_height: surface_height / rows as f32,
        }
    }

    // pixels have y pointing down, ndc has it pointing up
    fn to_ndc(&self, point: [f32; 2]) -> [f32; 2] {
        [
            (2.0 * point[0] / self.surface_width) - 1.0,
            1.0 - (2.0 * point[1] / self.surface_height),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect {
        origin: [f32; 2],
        size: [f32; 2],
        paint: Paint,
    },
    Wall {
        side: Direction,
        from: [f32; 2],
        to: [f32; 2],
    },
    Marker {
        center: [f32; 2],
        radius: f32,
        paint: Paint,
    },
}

impl Shape {
    pub fn tessellate(&self, layout: &Layout, out: &mut Vec<Vertex>) {
        match *self {
            Shape::Rect {
                origin,
                size,
                paint,
            } => {
                let low = origin;
                let up = [origin[0] + size[0], origin[1] + size[1]];
                quad(layout, low, up, paint.into(), out);
            }
            Shape::Wall { side, from, to } => {
                // thickness goes across the wall only, the ends stay flush with the segment
                let half = WALL_THICKNESS / 2.0;
                let (pad_x, pad_y) = match side {
                    Direction::Up | Direction::Down => (0.0, half),
                    Direction::Left | Direction::Right => (half, 0.0),
                };
                let low = [from[0].min(to[0]) - pad_x, from[1].min(to[1]) - pad_y];
                let up = [from[0].max(to[0]) + pad_x, from[1].max(to[1]) + pad_y];
                quad(layout, low, up, Paint::Wall.into(), out);
            }
            Shape::Marker {
                center,
                radius,
                paint,
            } => {
                let color: [f32; 4] = paint.into();
                let step = std::f32::consts::TAU / MARKER_SEGMENTS as f32;
                let rim = |i: usize| {
                    let angle = step * i as f32;
                    [
                        center[0] + radius * angle.cos(),
                        center[1] + radius * angle.sin(),
                    ]
                };

                for i in 0..MARKER_SEGMENTS {
                    for point in &[center, rim(i), rim(i + 1)] {
                        out.push(Vertex {
                            position: layout.to_ndc(*point),
                            color,
                        });
                    }
                }
            }
        }
    }
}

fn quad(layout: &Layout, low: [f32; 2], up: [f32; 2], color: [f32; 4], out: &mut Vec<Vertex>) {
    let corners = [
        // first triangle
        [low[0], low[1]],
        [up[0], low[1]],
        [low[0], up[1]],
        // second triangle
        [low[0], up[1]],
        [up[0], low[1]],
        [up[0], up[1]],
    ];

    out.extend(corners.iter().map(|corner| Vertex {
        position: layout.to_ndc(*corner),
        color,
    }));
}

/// Everything needed to redraw one block from scratch: erase, walls, then the path marker.
///
/// Top, bottom and right walls show wherever there is no tree edge to that side. The left
/// wall only shows once the block has been occupied.
pub fn paint_block(
    grid: &BlockGrid,
    current: Option<BlockId>,
    id: BlockId,
    layout: &Layout,
) -> Vec<Shape> {
    let block = grid.block(id);
    let (width, height) = (layout.block_width, layout.block_height);
    let left = block.x as f32 * width;
    let top = block.y as f32 * height;
    let right = left + width;
    let bottom = top + height;

    let mut shapes = vec![Shape::Rect {
        origin: [left, top],
        size: [width, height],
        paint: Paint::Erase,
    }];

    for side in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ] {
        if side == Direction::Left && !block.occupied {
            continue;
        }
        if block.connected_to(grid.neighbor_in(id, side)) {
            continue;
        }

        let (from, to) = match side {
            Direction::Up => ([left, top], [right, top]),
            Direction::Down => ([left, bottom], [right, bottom]),
            Direction::Left => ([left, top], [left, bottom]),
            Direction::Right => ([right, top], [right, bottom]),
        };
        shapes.push(Shape::Wall { side, from, to });
    }

    if block.in_history {
        let paint = if current == Some(id) {
            Paint::CurrentMarker
        } else {
            Paint::HistoryMarker
        };
        shapes.push(Shape::Marker {
            center: [left + width / 2.0, top + height / 2.0],
            radius: width.min(height) * MARKER_SCALE,
            paint,
        });
    }

    shapes
}

/// Triangles for every block that has been drawn so far, one cached mesh per block.
pub struct Canvas {
    layout: Layout,
    meshes: Vec<Vec<Vertex>>,
}

impl Canvas {
    pub fn new(layout: Layout, blocks: usize) -> Self {
        Self {
            layout,
            meshes: vec![Vec::new(); blocks],
        }
    }

    pub fn repaint(&mut self, generator: &dyn Generator, id: BlockId) {
        let layout = self.layout;
        let mesh = &mut self.meshes[id];
        mesh.clear();

        for shape in paint_block(generator.grid(), generator.current(), id, &layout) {
            shape.tessellate(&layout, mesh);
        }
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.meshes.concat()
    }
}
