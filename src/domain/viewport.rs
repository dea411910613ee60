// Viewport geometry for pan/zoom over a vector graphic
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_ZOOM: f64 = 0.9;
pub const MAX_ZOOM: f64 = 50.0;

/// Share of the viewport that must stay over the original extent on each axis.
pub const MIN_VISIBLE_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// The rendered element's box in client (page) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a client point into element-relative pixels.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }

    fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A rectangle in graphic coordinates, as in an SVG `viewBox` attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Length of the overlap with `other` along the x and y axes.
    pub fn overlap(&self, other: &ViewBox) -> (f64, f64) {
        let x = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let y = (self.y + self.height).min(other.y + other.height) - self.y.max(other.y);
        (x.max(0.0), y.max(0.0))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ViewBoxParseError {
    #[error("viewBox needs 4 numbers, got {0}")]
    WrongArity(usize),
    #[error("invalid viewBox number '{0}'")]
    InvalidNumber(String),
    #[error("viewBox width and height must be positive")]
    NonPositiveSize,
}

impl FromStr for ViewBox {
    type Err = ViewBoxParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ViewBoxParseError::InvalidNumber(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let [x, y, width, height] = numbers[..] else {
            return Err(ViewBoxParseError::WrongArity(numbers.len()));
        };
        if width <= 0.0 || height <= 0.0 {
            return Err(ViewBoxParseError::NonPositiveSize);
        }
        Ok(ViewBox::new(x, y, width, height))
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// The current view box together with the full extent it started from.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    original: ViewBox,
    current: ViewBox,
}

impl Viewport {
    pub fn new(original: ViewBox) -> Self {
        Self {
            original,
            current: original,
        }
    }

    pub fn view_box(&self) -> ViewBox {
        self.current
    }

    pub fn original(&self) -> ViewBox {
        self.original
    }

    pub fn zoom_ratio(&self) -> f64 {
        self.original.width / self.current.width
    }

    pub fn reset(&mut self) {
        self.current = self.original;
    }

    /// Zoom by `scale` keeping `center` (element pixels) visually fixed.
    ///
    /// Returns `false` and leaves the view untouched when the zoom would
    /// leave the allowed zoom range.
    pub fn zoom(&mut self, scale: f64, center: Point, element: &ElementRect) -> bool {
        if !scale.is_finite() || scale <= 0.0 || !element.has_area() {
            return false;
        }

        let new_width = self.current.width / scale;
        let new_height = self.current.height / scale;

        let ratio = self.original.width / new_width;
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&ratio) {
            return false;
        }

        self.current.x += (self.current.width - new_width) * (center.x / element.width);
        self.current.y += (self.current.height - new_height) * (center.y / element.height);
        self.current.width = new_width;
        self.current.height = new_height;

        self.clamp();
        true
    }

    /// Place the origin at `start` moved against a pointer drag of `delta`
    /// element pixels.
    pub fn pan_from(&mut self, start: Point, delta: Point, element: &ElementRect) {
        if !element.has_area() {
            return;
        }
        let dx = delta.x * (self.current.width / element.width);
        let dy = delta.y * (self.current.height / element.height);

        self.current.x = start.x - dx;
        self.current.y = start.y - dy;

        self.clamp();
    }

    fn clamp(&mut self) {
        let o = &self.original;
        let v = &mut self.current;

        let max_x = o.x + o.width - v.width * MIN_VISIBLE_RATIO;
        let min_x = o.x - v.width * (1.0 - MIN_VISIBLE_RATIO);
        let max_y = o.y + o.height - v.height * MIN_VISIBLE_RATIO;
        let min_y = o.y - v.height * (1.0 - MIN_VISIBLE_RATIO);

        v.x = v.x.max(min_x).min(max_x);
        v.y = v.y.max(min_y).min(max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn element() -> ElementRect {
        ElementRect::new(0.0, 0.0, 400.0, 300.0)
    }

    fn assert_visible(viewport: &Viewport) {
        let v = viewport.view_box();
        let (ox, oy) = v.overlap(&viewport.original());
        assert!(ox + EPS >= v.width * MIN_VISIBLE_RATIO, "x overlap {ox} for {v}");
        assert!(oy + EPS >= v.height * MIN_VISIBLE_RATIO, "y overlap {oy} for {v}");
    }

    #[test]
    fn test_parse_view_box() {
        assert_eq!(
            "0 0 800 600".parse::<ViewBox>(),
            Ok(ViewBox::new(0.0, 0.0, 800.0, 600.0))
        );
        assert_eq!(
            " -10,5.5  20 ,40 ".parse::<ViewBox>(),
            Ok(ViewBox::new(-10.0, 5.5, 20.0, 40.0))
        );
        assert_eq!(
            "0 0 800".parse::<ViewBox>(),
            Err(ViewBoxParseError::WrongArity(3))
        );
        assert_eq!(
            "0 0 a 600".parse::<ViewBox>(),
            Err(ViewBoxParseError::InvalidNumber("a".to_string()))
        );
        assert_eq!(
            "0 0 0 600".parse::<ViewBox>(),
            Err(ViewBoxParseError::NonPositiveSize)
        );
        assert_eq!(ViewBox::new(0.0, 0.0, 800.0, 600.0).to_string(), "0 0 800 600");
    }

    #[test]
    fn test_zoom_keeps_center_fixed() {
        let mut viewport = Viewport::new(ViewBox::new(0.0, 0.0, 800.0, 600.0));
        let center = Point::new(100.0, 150.0);

        // Graphic coordinate under the cursor before zooming.
        let before = viewport.view_box();
        let gx = before.x + center.x / 400.0 * before.width;
        let gy = before.y + center.y / 300.0 * before.height;

        assert!(viewport.zoom(2.0, center, &element()));

        let after = viewport.view_box();
        assert!((after.width - 400.0).abs() < EPS);
        assert!((after.height - 300.0).abs() < EPS);
        assert!((after.x + center.x / 400.0 * after.width - gx).abs() < EPS);
        assert!((after.y + center.y / 300.0 * after.height - gy).abs() < EPS);
    }

    #[test]
    fn test_zoom_ratio_stays_in_bounds() {
        let mut viewport = Viewport::new(ViewBox::new(0.0, 0.0, 800.0, 600.0));
        let center = Point::new(200.0, 150.0);

        for _ in 0..200 {
            viewport.zoom(1.1, center, &element());
            let ratio = viewport.zoom_ratio();
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&ratio), "ratio {ratio}");
            assert_visible(&viewport);
        }
        assert!(viewport.zoom_ratio() > 45.0);

        for _ in 0..200 {
            viewport.zoom(0.9, center, &element());
            let ratio = viewport.zoom_ratio();
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&ratio), "ratio {ratio}");
            assert_visible(&viewport);
        }
        assert!(viewport.zoom_ratio() < 1.0);
    }

    #[test]
    fn test_rejected_zoom_is_a_no_op() {
        let mut viewport = Viewport::new(ViewBox::new(0.0, 0.0, 800.0, 600.0));
        let before = viewport.clone();

        assert!(!viewport.zoom(0.5, Point::new(10.0, 10.0), &element()));
        assert!(!viewport.zoom(100.0, Point::new(10.0, 10.0), &element()));
        assert!(!viewport.zoom(f64::INFINITY, Point::new(10.0, 10.0), &element()));
        assert!(!viewport.zoom(0.0, Point::new(10.0, 10.0), &element()));
        assert_eq!(viewport, before);
    }

    #[test]
    fn test_pan_is_clamped() {
        let mut viewport = Viewport::new(ViewBox::new(0.0, 0.0, 800.0, 600.0));
        let start = viewport.view_box().origin();

        // Drag far to the right and down: content moves right, origin goes negative.
        viewport.pan_from(start, Point::new(10_000.0, 10_000.0), &element());
        let v = viewport.view_box();
        assert!((v.x - -720.0).abs() < EPS);
        assert!((v.y - -540.0).abs() < EPS);
        assert_visible(&viewport);

        viewport.pan_from(start, Point::new(-10_000.0, -10_000.0), &element());
        let v = viewport.view_box();
        assert!((v.x - 720.0).abs() < EPS);
        assert!((v.y - 540.0).abs() < EPS);
        assert_visible(&viewport);
    }

    #[test]
    fn test_pan_scales_by_view_size() {
        let mut viewport = Viewport::new(ViewBox::new(0.0, 0.0, 800.0, 600.0));

        viewport.pan_from(Point::new(0.0, 0.0), Point::new(-40.0, -30.0), &element());
        let v = viewport.view_box();
        assert!((v.x - 80.0).abs() < EPS);
        assert!((v.y - 60.0).abs() < EPS);
    }

    #[test]
    fn test_mixed_gestures_stay_visible() {
        let mut viewport = Viewport::new(ViewBox::new(-50.0, 20.0, 1000.0, 500.0));
        let gestures: [(f64, f64, f64); 6] = [
            (1.1, 399.0, 0.0),
            (0.9, 0.0, 299.0),
            (1.5, 200.0, 150.0),
            (3.0, 400.0, 300.0),
            (0.7, 10.0, 290.0),
            (1.1, 380.0, 20.0),
        ];

        for (i, (scale, cx, cy)) in gestures.iter().cycle().take(120).enumerate() {
            viewport.zoom(*scale, Point::new(*cx, *cy), &element());
            assert_visible(&viewport);

            let delta = if i % 2 == 0 {
                Point::new(5_000.0, -300.0)
            } else {
                Point::new(-700.0, 4_000.0)
            };
            viewport.pan_from(viewport.view_box().origin(), delta, &element());
            assert_visible(&viewport);

            let ratio = viewport.zoom_ratio();
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&ratio));
        }
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::new(ViewBox::new(0.0, 0.0, 800.0, 600.0));
        viewport.zoom(2.0, Point::new(0.0, 0.0), &element());
        viewport.reset();
        assert_eq!(viewport.view_box(), viewport.original());
    }
}
