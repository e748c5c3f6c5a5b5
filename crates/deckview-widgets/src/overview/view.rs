//! Overview view function
//!
//! ```ignore
//! fn view(&self) -> Element<Message> {
//!     column![
//!         waveform_overview(&self.overview, Message::Overview),
//!         /* other widgets */
//!     ]
//!     .into()
//! }
//! ```

use iced::widget::Canvas;
use iced::{Element, Length};

use super::canvas::{OverviewCanvas, OverviewMessage};
use super::mapping::Orientation;
use super::state::{OverviewWidget, OVERVIEW_HEIGHT};

/// Create an overview element for `widget`
///
/// `on_message` wraps the overview's events into the host's message type;
/// the host hands them back to the widget in its update function.
/// Horizontal overviews fill the available width at [`OVERVIEW_HEIGHT`],
/// vertical ones fill the available height at the same breadth.
pub fn waveform_overview<'a, Message>(
    widget: &'a OverviewWidget,
    on_message: impl Fn(OverviewMessage) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let canvas = Canvas::new(OverviewCanvas { widget, on_message });
    match widget.skin().orientation {
        Orientation::Horizontal => canvas
            .width(Length::Fill)
            .height(Length::Fixed(OVERVIEW_HEIGHT))
            .into(),
        Orientation::Vertical => canvas
            .width(Length::Fixed(OVERVIEW_HEIGHT))
            .height(Length::Fill)
            .into(),
    }
}
