//! Canvas program for the waveform overview
//!
//! Translates toolkit events into [`OverviewMessage`]s and paints a
//! [`RenderState`] snapshot of the widget. All state changes go through the
//! host, which routes the messages back to [`OverviewWidget`].

use std::path::PathBuf;

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke, Text};
use iced::{font, mouse, window, Color, Font, Point, Rectangle, Size, Theme, Vector};

use super::layout::MARKER_FONT_SIZE;
use super::mapping::Orientation;
use super::state::{MarkRender, OverviewWidget, RangeRender, RenderState};
use crate::theme::with_alpha;

/// Opacity of enabled mark range rectangles
const RANGE_OPACITY: f32 = 0.4;

/// Opacity of disabled mark range rectangles
const DISABLED_RANGE_OPACITY: f32 = 0.2;

/// Events the overview publishes to its host
///
/// Pointer events carry the canvas size they were measured against so the
/// widget can resize before mapping the position.
#[derive(Debug, Clone, PartialEq)]
pub enum OverviewMessage {
    /// Canvas bounds differ from the widget's size
    Resized(Size),
    /// Left button pressed; canvas-relative position
    Pressed { position: Point, size: Size },
    /// Pointer moved while the button is held
    Dragged { position: Point, size: Size },
    /// Left button released after a press on the overview
    Released { position: Point, size: Size },
    FileHovered(PathBuf),
    FileDropped(PathBuf),
    HoverLeft,
}

impl OverviewMessage {
    /// Canvas size the message was measured against
    pub fn size(&self) -> Option<Size> {
        match self {
            OverviewMessage::Resized(size)
            | OverviewMessage::Pressed { size, .. }
            | OverviewMessage::Dragged { size, .. }
            | OverviewMessage::Released { size, .. } => Some(*size),
            OverviewMessage::FileHovered(_) | OverviewMessage::FileDropped(_) | OverviewMessage::HoverLeft => None,
        }
    }
}

/// Canvas-local interaction state
#[derive(Debug, Clone, Copy, Default)]
pub struct OverviewInteraction {
    /// Left button went down on the overview and is still held
    pub is_dragging: bool,
    /// Last size sent to the host
    pub reported_size: Option<Size>,
}

pub struct OverviewCanvas<'a, Message, F>
where
    F: Fn(OverviewMessage) -> Message,
{
    pub widget: &'a OverviewWidget,
    pub on_message: F,
}

fn relative(cursor: mouse::Cursor, bounds: Rectangle) -> Option<Point> {
    cursor
        .position()
        .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
}

impl<'a, Message, F> OverviewCanvas<'a, Message, F>
where
    F: Fn(OverviewMessage) -> Message,
{
    fn translate(
        &self,
        interaction: &mut OverviewInteraction,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<OverviewMessage> {
        let size = bounds.size();
        let message = match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                interaction.is_dragging = true;
                OverviewMessage::Pressed { position, size }
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) if interaction.is_dragging => {
                OverviewMessage::Dragged {
                    position: relative(cursor, bounds)?,
                    size,
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) if interaction.is_dragging => {
                interaction.is_dragging = false;
                // Released outside the window: keep the last dragged pixel
                let position = relative(cursor, bounds).unwrap_or_else(|| {
                    let pixel = self.widget.play_pixel() as f32;
                    match self.widget.skin().orientation {
                        Orientation::Horizontal => Point::new(pixel, 0.0),
                        Orientation::Vertical => Point::new(0.0, pixel),
                    }
                });
                OverviewMessage::Released { position, size }
            }
            Event::Window(window::Event::FileHovered(path)) if cursor_over_or_unknown(cursor, bounds) => {
                OverviewMessage::FileHovered(path.clone())
            }
            Event::Window(window::Event::FileDropped(path)) if cursor_over_or_unknown(cursor, bounds) => {
                OverviewMessage::FileDropped(path.clone())
            }
            Event::Window(window::Event::FilesHoveredLeft) => OverviewMessage::HoverLeft,
            _ => return None,
        };
        Some(message)
    }
}

impl<'a, Message, F> Program<Message> for OverviewCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(OverviewMessage) -> Message,
{
    type State = OverviewInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if let Some(message) = self.translate(interaction, event, bounds, cursor) {
            if let Some(size) = message.size() {
                interaction.reported_size = Some(size);
            }
            return Some(canvas::Action::publish((self.on_message)(message)));
        }

        let size = bounds.size();
        let (width, height) = self.widget.size();
        if (size.width != width || size.height != height) && interaction.reported_size != Some(size) {
            interaction.reported_size = Some(size);
            return Some(canvas::Action::publish((self.on_message)(OverviewMessage::Resized(size))));
        }
        None
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.is_dragging {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let state = self.widget.render_state();
        draw_overview(&mut frame, &state, bounds.size());
        vec![frame.into_geometry()]
    }
}

// Window file events carry no position; accept them when the cursor is
// unknown
fn cursor_over_or_unknown(cursor: mouse::Cursor, bounds: Rectangle) -> bool {
    cursor.position().map_or(true, |p| bounds.contains(p))
}

/// Point at `along` on the principal axis and `across` on the other
fn axis_point(orientation: Orientation, along: f32, across: f32) -> Point {
    match orientation {
        Orientation::Horizontal => Point::new(along, across),
        Orientation::Vertical => Point::new(across, along),
    }
}

/// Rectangle spanning the full breadth between two principal positions
fn axis_span(orientation: Orientation, from: f32, to: f32, breadth: f32) -> (Point, Size) {
    let (start, extent) = if from <= to { (from, to - from) } else { (to, from - to) };
    match orientation {
        Orientation::Horizontal => (Point::new(start, 0.0), Size::new(extent, breadth)),
        Orientation::Vertical => (Point::new(0.0, start), Size::new(breadth, extent)),
    }
}

fn line_across(frame: &mut Frame, orientation: Orientation, along: f32, breadth: f32, stroke: Stroke) {
    frame.stroke(
        &Path::line(
            axis_point(orientation, along, 0.0),
            axis_point(orientation, along, breadth),
        ),
        stroke,
    );
}

fn draw_overview(frame: &mut Frame, state: &RenderState, size: Size) {
    let orientation = state.orientation;
    let length = orientation.length(size.width, size.height);
    let breadth = orientation.breadth(size.width, size.height);
    let scale = state.scale_factor;

    frame.fill_rectangle(Point::ORIGIN, size, state.background_color);

    if let Some(image) = &state.background_image {
        frame.draw_image(Rectangle::new(Point::ORIGIN, size), canvas::Image::new(image.clone()));
    }

    if !state.has_track {
        return;
    }

    if state.end_of_track {
        frame.fill_rectangle(
            Point::new(1.0, 1.0),
            Size::new((size.width - 2.0).max(0.0), (size.height - 2.0).max(0.0)),
            with_alpha(state.end_of_track_color, 0.3),
        );
        frame.stroke(
            &Path::rectangle(Point::ORIGIN, size),
            Stroke::default()
                .with_color(with_alpha(state.end_of_track_color, 0.8))
                .with_width(1.5 * scale),
        );
    }

    // Center axis
    frame.stroke(
        &Path::line(
            axis_point(orientation, 0.0, breadth / 2.0),
            axis_point(orientation, length, breadth / 2.0),
        ),
        Stroke::default()
            .with_color(state.signal_colors.axes)
            .with_width(1.0 * scale),
    );

    if let Some(waveform) = &state.waveform {
        frame.draw_image(Rectangle::new(Point::ORIGIN, size), canvas::Image::new(waveform.clone()));

        let overlay = state.signal_colors.played_overlay;
        if overlay.a > 0.0 && state.play_pixel > 0 {
            let (origin, span) = axis_span(orientation, 0.0, state.play_pixel as f32, breadth);
            frame.fill_rectangle(origin, span, overlay);
        }
    }

    draw_progress(frame, state);

    if !state.show_overlays {
        return;
    }

    for range in &state.ranges {
        let (origin, span) = axis_span(orientation, range.layout.start, range.layout.end, breadth);
        frame.fill_rectangle(origin, span, range_fill(range));

        if let Some(label) = &range.layout.label {
            frame.fill_text(Text {
                content: label.text.clone(),
                position: axis_point(orientation, label.position, breadth - 0.5),
                size: (MARKER_FONT_SIZE * scale).into(),
                color: range.text_color,
                align_x: Horizontal::Left.into(),
                align_y: Vertical::Bottom.into(),
                ..Text::default()
            });
        }
    }

    for mark in &state.marks {
        // Contrast shadow under the mark line
        line_across(
            frame,
            orientation,
            mark.position,
            breadth,
            Stroke::default()
                .with_color(mark.border_color)
                .with_width(2.5 * scale),
        );
        line_across(
            frame,
            orientation,
            mark.position,
            breadth,
            Stroke::default()
                .with_color(mark.fill_color)
                .with_width(1.0 * scale),
        );

        if !mark.text.is_empty() {
            let text = Text {
                content: mark.text.clone(),
                position: mark.text_origin,
                size: mark.font_size.into(),
                align_x: Horizontal::Left.into(),
                align_y: Vertical::Bottom.into(),
                ..Text::default()
            };
            for (color, font) in mark_label_passes(mark) {
                frame.fill_text(Text {
                    color,
                    font,
                    ..text.clone()
                });
            }
        }
    }

    draw_playhead(frame, state, breadth);
}

fn range_fill(range: &RangeRender) -> Color {
    let opacity = if range.layout.enabled {
        RANGE_OPACITY
    } else {
        DISABLED_RANGE_OPACITY
    };
    with_alpha(range.color, range.color.a * opacity)
}

/// Label passes in paint order: bold border-colored outline, then the text
fn mark_label_passes(mark: &MarkRender) -> [(Color, Font); 2] {
    let bold = Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    };
    [(mark.border_color, bold), (mark.text_color, Font::DEFAULT)]
}

fn draw_progress(frame: &mut Frame, state: &RenderState) {
    if let Some((from, to)) = state.progress_line {
        frame.stroke(
            &Path::line(from, to),
            Stroke::default()
                .with_color(state.signal_colors.axes)
                .with_width(3.0 * state.scale_factor),
        );
    }

    if let Some(caption) = state.caption {
        frame.with_save(|frame| {
            frame.translate(Vector::new(caption.pivot.x, caption.pivot.y));
            frame.rotate(caption.rotation);
            frame.fill_text(Text {
                content: caption.text.to_string(),
                position: caption.origin,
                size: caption.font_size.into(),
                color: with_alpha(state.signal_colors.low, 0.5),
                align_x: Horizontal::Left.into(),
                align_y: Vertical::Bottom.into(),
                ..Text::default()
            });
        });
    }
}

fn draw_playhead(frame: &mut Frame, state: &RenderState, breadth: f32) {
    let orientation = state.orientation;
    let pos = state.play_pixel as f32;
    let scale = state.scale_factor;

    // Background-colored side lines keep the playhead visible on any waveform
    let side = Stroke::default()
        .with_color(with_alpha(state.background_color, 0.5))
        .with_width(1.0 * scale);
    line_across(frame, orientation, pos - 1.0, breadth, side);
    line_across(frame, orientation, pos + 1.0, breadth, side);

    let color = state.signal_colors.play_position;
    line_across(
        frame,
        orientation,
        pos,
        breadth,
        Stroke::default().with_color(color).with_width(1.0 * scale),
    );

    for (edge, tip) in [(0.0, 2.0), (breadth - 1.0, breadth - 3.0)] {
        let flag = Path::new(|builder| {
            builder.move_to(axis_point(orientation, pos - 2.0, edge));
            builder.line_to(axis_point(orientation, pos, tip));
            builder.line_to(axis_point(orientation, pos + 2.0, edge));
            builder.close();
        });
        frame.fill(&flag, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overview::layout::RangeLayout;
    use crate::overview::{OverviewSettings, OverviewSkin};
    use deckview_core::ControlRegistry;

    #[test]
    fn test_axis_helpers() {
        assert_eq!(axis_point(Orientation::Horizontal, 10.0, 3.0), Point::new(10.0, 3.0));
        assert_eq!(axis_point(Orientation::Vertical, 10.0, 3.0), Point::new(3.0, 10.0));

        let (origin, span) = axis_span(Orientation::Horizontal, 30.0, 10.0, 40.0);
        assert_eq!(origin, Point::new(10.0, 0.0));
        assert_eq!(span, Size::new(20.0, 40.0));

        let (origin, span) = axis_span(Orientation::Vertical, 5.0, 25.0, 40.0);
        assert_eq!(origin, Point::new(0.0, 5.0));
        assert_eq!(span, Size::new(40.0, 20.0));
    }

    #[test]
    fn test_relative_cursor() {
        let bounds = Rectangle::new(Point::new(100.0, 50.0), Size::new(200.0, 40.0));
        let cursor = mouse::Cursor::Available(Point::new(150.0, 60.0));
        assert_eq!(relative(cursor, bounds), Some(Point::new(50.0, 10.0)));
        assert_eq!(relative(mouse::Cursor::Unavailable, bounds), None);
        assert!(cursor_over_or_unknown(mouse::Cursor::Unavailable, bounds));
        assert!(!cursor_over_or_unknown(mouse::Cursor::Available(Point::ORIGIN), bounds));
    }

    fn widget() -> OverviewWidget {
        let mut registry = ControlRegistry::new();
        OverviewWidget::new(
            "[Channel1]",
            OverviewSkin::default(),
            OverviewSettings::default(),
            &mut registry,
        )
    }

    /// Run one event through the canvas program and return what it publishes
    fn publish(
        widget: &OverviewWidget,
        interaction: &mut OverviewInteraction,
        event: Event,
        bounds: Rectangle,
        cursor: Point,
    ) -> Option<OverviewMessage> {
        let canvas = OverviewCanvas {
            widget,
            on_message: |message: OverviewMessage| message,
        };
        canvas
            .update(interaction, &event, bounds, mouse::Cursor::Available(cursor))
            .and_then(|action| action.into_inner().0)
    }

    fn left(pressed: bool) -> Event {
        if pressed {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
        } else {
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
        }
    }

    fn moved(position: Point) -> Event {
        Event::Mouse(mouse::Event::CursorMoved { position })
    }

    #[test]
    fn test_first_press_is_not_swallowed_by_resize() {
        let mut widget = widget();
        let mut interaction = OverviewInteraction::default();
        let bounds = Rectangle::new(Point::new(10.0, 10.0), Size::new(201.0, 48.0));

        let message = publish(&widget, &mut interaction, left(true), bounds, Point::new(110.0, 30.0));
        assert_eq!(
            message,
            Some(OverviewMessage::Pressed {
                position: Point::new(100.0, 20.0),
                size: Size::new(201.0, 48.0),
            })
        );
        assert!(interaction.is_dragging);

        widget.handle_message(&message.unwrap());
        assert!(widget.is_dragging());
        assert_eq!(widget.size(), (201.0, 48.0));
        assert_eq!(widget.play_pixel(), 100);
    }

    #[test]
    fn test_drag_round_trip_across_resize() {
        let mut widget = widget();
        let mut interaction = OverviewInteraction::default();
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(201.0, 48.0));

        let press = publish(&widget, &mut interaction, left(true), bounds, Point::new(20.0, 10.0)).unwrap();
        assert_eq!(widget.handle_message(&press), None);

        let drag = publish(&widget, &mut interaction, moved(Point::new(60.0, 10.0)), bounds, Point::new(60.0, 10.0)).unwrap();
        assert!(matches!(drag, OverviewMessage::Dragged { .. }));
        assert_eq!(widget.handle_message(&drag), None);
        assert_eq!(widget.play_pixel(), 60);

        // Window grew while the button was held
        let wider = Rectangle::new(Point::ORIGIN, Size::new(301.0, 48.0));
        let release = publish(&widget, &mut interaction, left(false), wider, Point::new(150.0, 10.0)).unwrap();
        assert_eq!(
            release,
            OverviewMessage::Released {
                position: Point::new(150.0, 10.0),
                size: Size::new(301.0, 48.0),
            }
        );
        assert!(!interaction.is_dragging);

        let seek = widget.handle_message(&release);
        assert_eq!(seek, Some(0.5), "Mapped against the new 301px length");
        assert!(!widget.is_dragging(), "External positions are followed again");
        assert!(widget.on_play_position_changed(1.0));

        // Sizes agree now: a stray move publishes nothing
        assert_eq!(
            publish(&widget, &mut interaction, moved(Point::new(5.0, 5.0)), wider, Point::new(5.0, 5.0)),
            None
        );
    }

    #[test]
    fn test_resize_reported_without_input() {
        let widget = widget();
        let mut interaction = OverviewInteraction::default();
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(120.0, 48.0));

        let message = publish(&widget, &mut interaction, moved(Point::new(5.0, 5.0)), bounds, Point::new(5.0, 5.0));
        assert_eq!(message, Some(OverviewMessage::Resized(Size::new(120.0, 48.0))));
        assert_eq!(
            publish(&widget, &mut interaction, moved(Point::new(6.0, 5.0)), bounds, Point::new(6.0, 5.0)),
            None,
            "Same size is reported once"
        );
    }

    #[test]
    fn test_release_without_press_publishes_nothing() {
        let widget = widget();
        let mut interaction = OverviewInteraction {
            is_dragging: false,
            reported_size: Some(Size::new(120.0, 48.0)),
        };
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(120.0, 48.0));
        let message = publish(&widget, &mut interaction, left(false), bounds, Point::new(5.0, 5.0));
        assert_eq!(message, None);
    }

    #[test]
    fn test_range_fill_opacity() {
        let range = |enabled| RangeRender {
            layout: RangeLayout {
                start: 0.0,
                end: 10.0,
                enabled,
                label: None,
            },
            color: Color::from_rgb(0.0, 1.0, 0.0),
            text_color: Color::WHITE,
        };
        assert_eq!(range_fill(&range(true)).a, 0.4);
        assert_eq!(range_fill(&range(false)).a, 0.2);
    }

    #[test]
    fn test_mark_label_outline_first() {
        let mark = MarkRender {
            position: 10.0,
            fill_color: Color::WHITE,
            border_color: Color::BLACK,
            text_color: Color::from_rgb(1.0, 0.0, 0.0),
            text: "1".to_string(),
            text_origin: Point::ORIGIN,
            font_size: MARKER_FONT_SIZE,
        };
        let [outline, label] = mark_label_passes(&mark);
        assert_eq!(outline.0, Color::BLACK);
        assert_eq!(outline.1.weight, font::Weight::Bold);
        assert_eq!(label.0, mark.text_color);
        assert_eq!(label.1, Font::DEFAULT);
    }
}
