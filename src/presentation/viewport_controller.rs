// Pan/zoom input state machine for a zoomable vector graphic
use crate::domain::viewport::{ElementRect, Point, ViewBox, Viewport};

const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

/// Host input events. Positions are client (page) pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown { button: MouseButton, position: Point },
    MouseMove { position: Point },
    MouseUp,
    Wheel { delta_y: f64, position: Point },
    Click,
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Panning { anchor: Point, origin: Point },
    Pinching { distance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

/// What the host should do with the event it just delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    pub prevent_default: bool,
    pub view_changed: bool,
}

impl EventOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled(view_changed: bool) -> Self {
        Self {
            prevent_default: true,
            view_changed,
        }
    }
}

/// Owns the viewport of one zoomable graphic and turns input events into
/// view box updates.
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    element: ElementRect,
    state: GestureState,
    mouse_panning: bool,
    suppress_click: bool,
}

impl ViewportController {
    pub fn new(view_box: ViewBox, element: ElementRect) -> Self {
        Self {
            viewport: Viewport::new(view_box),
            element,
            state: GestureState::Idle,
            mouse_panning: false,
            suppress_click: false,
        }
    }

    pub fn view_box(&self) -> ViewBox {
        self.viewport.view_box()
    }

    pub fn zoom_ratio(&self) -> f64 {
        self.viewport.zoom_ratio()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        if self.mouse_panning {
            Cursor::Grabbing
        } else {
            Cursor::Grab
        }
    }

    /// Update the rendered element box after a layout change.
    pub fn set_element_rect(&mut self, element: ElementRect) {
        self.element = element;
    }

    pub fn reset(&mut self) {
        self.viewport.reset();
        self.state = GestureState::Idle;
        self.mouse_panning = false;
        self.suppress_click = false;
    }

    pub fn handle(&mut self, event: InputEvent) -> EventOutcome {
        match event {
            InputEvent::MouseDown { button, position } => {
                if button != MouseButton::Primary {
                    return EventOutcome::ignored();
                }
                self.start_pan(position);
                self.mouse_panning = true;
                EventOutcome::handled(false)
            }
            InputEvent::MouseMove { position } => match self.state {
                GestureState::Panning { anchor, origin } => {
                    self.pan_to(anchor, origin, position);
                    EventOutcome::handled(true)
                }
                _ => EventOutcome::ignored(),
            },
            InputEvent::MouseUp => {
                self.mouse_panning = false;
                if matches!(self.state, GestureState::Panning { .. }) {
                    self.state = GestureState::Idle;
                }
                EventOutcome::ignored()
            }
            InputEvent::Wheel { delta_y, position } => {
                let scale = if delta_y < 0.0 {
                    WHEEL_ZOOM_IN
                } else {
                    WHEEL_ZOOM_OUT
                };
                let center = self.element.to_local(position);
                EventOutcome::handled(self.viewport.zoom(scale, center, &self.element))
            }
            InputEvent::Click => {
                if self.suppress_click {
                    self.suppress_click = false;
                    EventOutcome::handled(false)
                } else {
                    EventOutcome::ignored()
                }
            }
            InputEvent::TouchStart { touches } => match touches.as_slice() {
                [touch] => {
                    self.start_pan(*touch);
                    EventOutcome::handled(false)
                }
                [first, second] => {
                    self.state = GestureState::Pinching {
                        distance: first.distance(second),
                    };
                    EventOutcome::handled(false)
                }
                _ => EventOutcome::ignored(),
            },
            InputEvent::TouchMove { touches } => {
                let view_changed = match (self.state, touches.as_slice()) {
                    (GestureState::Panning { anchor, origin }, [touch]) => {
                        self.pan_to(anchor, origin, *touch);
                        true
                    }
                    (GestureState::Pinching { distance }, [first, second]) => {
                        self.pinch(distance, *first, *second)
                    }
                    _ => false,
                };
                EventOutcome::handled(view_changed)
            }
            InputEvent::TouchEnd => {
                self.state = GestureState::Idle;
                EventOutcome::ignored()
            }
        }
    }

    fn start_pan(&mut self, client: Point) {
        self.state = GestureState::Panning {
            anchor: self.element.to_local(client),
            origin: self.viewport.view_box().origin(),
        };
    }

    fn pan_to(&mut self, anchor: Point, origin: Point, client: Point) {
        let point = self.element.to_local(client);
        let delta = Point::new(point.x - anchor.x, point.y - anchor.y);
        self.viewport.pan_from(origin, delta, &self.element);
        self.suppress_click = true;
    }

    fn pinch(&mut self, last_distance: f64, first: Point, second: Point) -> bool {
        let distance = first.distance(&second);
        self.state = GestureState::Pinching { distance };
        if last_distance <= 0.0 {
            return false;
        }

        let scale = distance / last_distance;
        let center = self.element.to_local(first.midpoint(&second));
        self.viewport.zoom(scale, center, &self.element)
    }
}
