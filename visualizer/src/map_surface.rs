use crate::Message;
use gpstrackcore::display::{DisplayModel, MarkerView};
use gpstrackcore::geo::{LatLon, MapType, WebMercator};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};

const GRID_SPACING_PX: f64 = 128.0;

struct Palette {
    background: Color,
    grid: Color,
    grid_width: f32,
}

fn palette(map_type: MapType) -> Palette {
    match map_type {
        MapType::Roadmap => Palette {
            background: Color::from_rgb8(0xe8, 0xe6, 0xe1),
            grid: Color::from_rgb8(0xff, 0xff, 0xff),
            grid_width: 3.0,
        },
        MapType::Satellite => Palette {
            background: Color::from_rgb8(0x2b, 0x3a, 0x26),
            grid: Color::from_rgba8(0x55, 0x66, 0x4a, 0.6),
            grid_width: 1.0,
        },
        MapType::Hybrid => Palette {
            background: Color::from_rgb8(0x2b, 0x3a, 0x26),
            grid: Color::from_rgb8(0xf2, 0xd4, 0x6b),
            grid_width: 2.0,
        },
        MapType::Terrain => Palette {
            background: Color::from_rgb8(0xdf, 0xd8, 0xc0),
            grid: Color::from_rgb8(0xb9, 0xae, 0x8e),
            grid_width: 1.0,
        },
    }
}

/// Map canvas centred on the current view, with the vehicle arrow on top.
pub struct MapSurface {
    map_type: MapType,
    projection: WebMercator,
    center: LatLon,
    marker: Option<MarkerView>,
}

impl MapSurface {
    pub fn new(map_type: MapType, model: &DisplayModel) -> Self {
        Self {
            map_type,
            projection: WebMercator::new(model.zoom),
            center: model.view_center,
            marker: model.marker.clone(),
        }
    }

    fn draw_grid(&self, frame: &mut Frame, bounds: Rectangle, palette: &Palette) {
        let (cx, cy) = self.projection.to_world(self.center);
        let half_w = bounds.width as f64 / 2.0;
        let half_h = bounds.height as f64 / 2.0;
        // Screen position of world line k*S is half + k*S - center.
        let first_x = (half_w - cx).rem_euclid(GRID_SPACING_PX);
        let first_y = (half_h - cy).rem_euclid(GRID_SPACING_PX);

        let grid = Path::new(|builder| {
            let mut x = first_x;
            while x < bounds.width as f64 {
                builder.move_to(Point::new(x as f32, 0.0));
                builder.line_to(Point::new(x as f32, bounds.height));
                x += GRID_SPACING_PX;
            }
            let mut y = first_y;
            while y < bounds.height as f64 {
                builder.move_to(Point::new(0.0, y as f32));
                builder.line_to(Point::new(bounds.width, y as f32));
                y += GRID_SPACING_PX;
            }
        });
        frame.stroke(
            &grid,
            Stroke::default()
                .with_width(palette.grid_width)
                .with_color(palette.grid),
        );
    }

    fn draw_marker(&self, frame: &mut Frame, bounds: Rectangle, marker: &MarkerView) {
        let (dx, dy) = self.projection.offset(self.center, marker.position);
        let origin = Point::new(
            bounds.width / 2.0 + dx as f32,
            bounds.height / 2.0 + dy as f32,
        );

        // Arrow outline pointing north in symbol units, y down.
        let outline: [(f32, f32); 4] = [(0.0, -3.0), (2.2, 2.0), (0.0, 1.0), (-2.2, 2.0)];
        let (sin, cos) = (marker.icon.rotation as f32).to_radians().sin_cos();
        let scale = marker.icon.scale;
        let arrow = Path::new(|builder| {
            for (idx, (x, y)) in outline.iter().enumerate() {
                let point = Point::new(
                    origin.x + (x * cos - y * sin) * scale,
                    origin.y + (x * sin + y * cos) * scale,
                );
                if idx == 0 {
                    builder.move_to(point);
                } else {
                    builder.line_to(point);
                }
            }
            builder.close();
        });

        let fill =
            parse_hex_color(&marker.icon.fill_color).unwrap_or(Color::from_rgb(0.0, 0.0, 1.0));
        frame.fill(
            &arrow,
            Color {
                a: marker.icon.fill_opacity,
                ..fill
            },
        );
        frame.stroke(
            &arrow,
            Stroke::default()
                .with_width(marker.icon.stroke_weight)
                .with_color(Color::BLACK),
        );
    }
}

impl canvas::Program<Message> for MapSurface {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let palette = palette(self.map_type);
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette.background);
        self.draw_grid(&mut frame, bounds, &palette);

        if let Some(marker) = &self.marker {
            self.draw_marker(&mut frame, bounds, marker);
        }

        vec![frame.into_geometry()]
    }
}

/// Accepts `#rgb` and `#rrggbb`.
fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').filter(|d| d.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
            Some(Color::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some(Color::from_rgb8(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}
